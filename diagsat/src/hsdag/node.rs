//! Nodes of the hitting set DAG.
use varisat::Lit;

use crate::labeler::LabelParameters;

/// Index of a node in the engine's arena.
pub type NodeId = usize;

/// Lifecycle states of a node.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum NodeStatus {
    /// Awaiting expansion.
    Open,
    /// The node's path contains a known diagnosis.
    Closed,
    /// The node's label turned out to be a non-minimal conflict.
    Pruned,
    /// The node's path is a minimal diagnosis.
    Checked,
}

/// One node of the hitting set DAG.
///
/// Nodes are owned by the engine's arena and reference each other by
/// [`NodeId`]. Ids are assigned in creation order starting from the root,
/// so arcs always point from a lower to a higher id and the graph is
/// acyclic by construction.
#[derive(Debug)]
pub struct Node {
    pub(crate) id: NodeId,
    pub(crate) level: usize,
    pub(crate) arc_label: Option<Lit>,
    pub(crate) path_label: Vec<Lit>,
    pub(crate) label: Vec<Lit>,
    pub(crate) status: NodeStatus,
    pub(crate) parents: Vec<NodeId>,
    pub(crate) children: Vec<(Lit, NodeId)>,
    pub(crate) parameters: LabelParameters,
}

impl Node {
    /// Create the root node.
    pub(crate) fn root(label: Vec<Lit>, parameters: LabelParameters) -> Node {
        Node {
            id: 0,
            level: 0,
            arc_label: None,
            path_label: vec![],
            label,
            status: NodeStatus::Open,
            parents: vec![],
            children: vec![],
            parameters,
        }
    }

    /// Create a node below `parent`, reached over the arc `arc_label`.
    pub(crate) fn child(
        id: NodeId,
        parent: &Node,
        arc_label: Lit,
        parameters: LabelParameters,
    ) -> Node {
        let mut path_label = parent.path_label.clone();
        path_label.push(arc_label);
        Node {
            id,
            level: parent.level + 1,
            arc_label: Some(arc_label),
            path_label,
            label: vec![],
            status: NodeStatus::Open,
            parents: vec![parent.id],
            children: vec![],
            parameters,
        }
    }

    /// Record an additional parent after a reuse merge.
    pub(crate) fn add_parent(&mut self, parent: NodeId) {
        if !self.parents.contains(&parent) {
            self.parents.push(parent);
        }
    }

    /// The node's position in creation order.
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Distance from the root.
    pub fn level(&self) -> usize {
        self.level
    }

    /// The literal labelling the incoming arc, absent for the root.
    pub fn arc_label(&self) -> Option<Lit> {
        self.arc_label
    }

    /// Arc labels from the root to this node, in discovery order.
    pub fn path_label(&self) -> &[Lit] {
        &self.path_label
    }

    /// The node's conflict label, empty while unlabeled and for checked or
    /// closed nodes.
    pub fn label(&self) -> &[Lit] {
        &self.label
    }

    /// The node's lifecycle state.
    pub fn status(&self) -> NodeStatus {
        self.status
    }

    /// Ids of the parents, more than one after reuse merges.
    pub fn parents(&self) -> &[NodeId] {
        &self.parents
    }

    /// Outgoing arcs with the child they lead to.
    pub fn children(&self) -> &[(Lit, NodeId)] {
        &self.children
    }

    /// Whether this is the root node.
    pub fn is_root(&self) -> bool {
        self.parents.is_empty()
    }
}
