//! Labeling interface of the hitting set engine.
use varisat::Lit;

use crate::errors::DiagnosisError;

/// Labeling parameters of one node of the hitting set DAG.
///
/// The engine treats the triple as opaque and only passes it between a
/// node and the labeler. QuickXPlain reads it as (C, B, D): the candidate
/// set still under consideration, the background committed during the
/// search (empty for every node, the search commits nothing), and the
/// instance background carried through unchanged.
#[derive(Clone, Debug)]
pub struct LabelParameters {
    pub candidates: Vec<Lit>,
    pub background: Vec<Lit>,
    pub delta: Vec<Lit>,
}

/// A conflict labeler driving the hitting set engine.
///
/// Implementations compute node labels and derive the parameters of child
/// nodes. The engine holds the labeler as a trait object, so alternative
/// labelers (a diagnosis labeler for the dual search, say) can be plugged
/// in without engine changes.
pub trait Labeler {
    /// Parameters of the root node.
    fn initial_parameters(&self) -> LabelParameters;

    /// Compute a minimal conflict for the node described by `params`.
    ///
    /// An empty result means the node is consistent and its path is a
    /// diagnosis.
    fn get_label(&mut self, params: &LabelParameters) -> Result<Vec<Lit>, DiagnosisError>;

    /// Partition a conflict into groups whose members share one
    /// child-parameter derivation rule.
    ///
    /// QuickXPlain derives every child the same way, so the whole conflict
    /// forms a single group.
    fn identify_groups(&self, conflict: &[Lit]) -> Vec<Vec<Lit>> {
        vec![conflict.to_vec()]
    }

    /// Parameters of the child reached from `parent` over `arc_label`.
    fn get_child_parameters(
        &self,
        parent: &LabelParameters,
        arc_label: Lit,
    ) -> LabelParameters;

    /// Restore solver state between labeling calls.
    ///
    /// Assumption based backends leave no state behind, so the default
    /// does nothing.
    fn rollback(&mut self) {}
}
