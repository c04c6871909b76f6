//! Breadth-first construction of Reiter's hitting set DAG.
//!
//! The engine grows a DAG whose nodes are labelled with minimal conflicts
//! and whose arcs are labelled with conflict elements. A path from the
//! root hits every conflict along the way; when a node's label comes back
//! empty its path is a minimal diagnosis. Three rules keep the DAG small:
//! node reuse collapses paths that cover the same set, known conflicts
//! disjoint from a path label new nodes without a solver call, and
//! conflicts that later turn out non-minimal are pruned together with the
//! open nodes they label.
use std::collections::VecDeque;

use log::{debug, info};
use rustc_hash::FxHashMap;
use varisat::Lit;

use crate::errors::DiagnosisError;
use crate::labeler::Labeler;

pub use self::node::{Node, NodeId, NodeStatus};

mod node;

/// The hitting set engine.
pub struct HsDag {
    labeler: Box<dyn Labeler>,
    /// Maximum number of conflicts to discover, -1 for no limit.
    pub max_number_conflicts: i64,
    /// Maximum expansion depth, 0 for no limit.
    pub max_depth: usize,

    nodes: Vec<Node>,
    open_nodes: VecDeque<NodeId>,
    node_labels: Vec<Vec<Lit>>,
    path_labels: Vec<Vec<Lit>>,
    nodes_lookup: FxHashMap<Vec<Lit>, NodeId>,
}

impl HsDag {
    /// Create an engine driven by the given labeler, with no bounds set.
    pub fn new(labeler: Box<dyn Labeler>) -> HsDag {
        HsDag {
            labeler,
            max_number_conflicts: -1,
            max_depth: 0,
            nodes: vec![],
            open_nodes: VecDeque::new(),
            node_labels: vec![],
            path_labels: vec![],
            nodes_lookup: FxHashMap::default(),
        }
    }

    /// Build the DAG until the open queue is exhausted.
    ///
    /// A root label of ∅ means the instance is consistent (or its
    /// background alone is unsatisfiable); no root is created and both
    /// result sets stay empty.
    pub fn construct(&mut self) -> Result<(), DiagnosisError> {
        self.nodes.clear();
        self.open_nodes.clear();
        self.node_labels.clear();
        self.path_labels.clear();
        self.nodes_lookup.clear();

        let parameters = self.labeler.initial_parameters();
        let label = self.labeler.get_label(&parameters)?;
        self.labeler.rollback();
        if label.is_empty() {
            info!("instance is consistent or degenerate, nothing to diagnose");
            return Ok(());
        }
        debug!("root conflict {:?}", label);
        self.node_labels.push(label.clone());
        self.nodes_lookup.insert(vec![], 0);
        self.nodes.push(Node::root(label, parameters));
        self.open_nodes.push_back(0);

        while let Some(id) = self.open_nodes.pop_front() {
            if self.nodes[id].status != NodeStatus::Open {
                continue;
            }
            if self.max_depth > 0 && self.nodes[id].level >= self.max_depth {
                continue;
            }
            if self.conflict_bound_reached() {
                continue;
            }
            self.expand(id)?;
        }

        info!(
            "constructed {} nodes, {} conflicts, {} diagnoses",
            self.nodes.len(),
            self.node_labels.len(),
            self.path_labels.len()
        );
        Ok(())
    }

    /// Minimal conflicts found, canonically sorted.
    pub fn get_conflicts(&self) -> Vec<Vec<Lit>> {
        canonicalize(&self.node_labels)
    }

    /// Minimal diagnoses found, canonically sorted.
    pub fn get_diagnoses(&self) -> Vec<Vec<Lit>> {
        canonicalize(&self.path_labels)
    }

    /// All nodes in creation order.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    fn conflict_bound_reached(&self) -> bool {
        self.max_number_conflicts > 0
            && self.node_labels.len() as i64 >= self.max_number_conflicts
    }

    fn expand(&mut self, id: NodeId) -> Result<(), DiagnosisError> {
        debug!(
            "expanding node {} at level {} with label {:?}",
            id, self.nodes[id].level, self.nodes[id].label
        );
        let label = self.nodes[id].label.clone();
        for group in self.labeler.identify_groups(&label) {
            for &arc_label in group.iter() {
                // the node may have been pruned by a conflict found while
                // expanding an earlier arc
                if self.nodes[id].status != NodeStatus::Open {
                    return Ok(());
                }
                self.expand_arc(id, arc_label)?;
            }
        }
        Ok(())
    }

    fn expand_arc(&mut self, parent: NodeId, arc_label: Lit) -> Result<(), DiagnosisError> {
        let mut path = self.nodes[parent].path_label.clone();
        path.push(arc_label);

        // reuse: a node covering the same path set already exists; if a
        // recorded diagnosis is contained in the path, that node is
        // already closed
        if let Some(&existing) = self.nodes_lookup.get(&sorted_key(&path)) {
            self.nodes[existing].add_parent(parent);
            self.nodes[parent].children.push((arc_label, existing));
            return Ok(());
        }

        // closure: the path contains a known diagnosis
        if self
            .path_labels
            .iter()
            .any(|diagnosis| is_subset(diagnosis, &path))
        {
            let child = self.create_child(parent, arc_label);
            self.nodes[child].status = NodeStatus::Closed;
            return Ok(());
        }

        // a known conflict disjoint from the path labels the child without
        // consulting the labeler
        let known = self
            .node_labels
            .iter()
            .find(|conflict| is_disjoint(conflict, &path))
            .cloned();
        if let Some(label) = known {
            let child = self.create_child(parent, arc_label);
            self.nodes[child].label = label;
            self.open_nodes.push_back(child);
            return Ok(());
        }

        // fresh labels would exceed the conflict bound, leave the arc
        // unexpanded
        if self.conflict_bound_reached() {
            return Ok(());
        }

        let child = self.create_child(parent, arc_label);
        let label = self.labeler.get_label(&self.nodes[child].parameters)?;
        self.labeler.rollback();
        if label.is_empty() {
            debug!("diagnosis {:?}", path);
            self.nodes[child].status = NodeStatus::Checked;
            self.path_labels.push(path);
            self.close_superset_paths();
        } else {
            debug!("conflict {:?} at node {}", label, child);
            self.nodes[child].label = label.clone();
            self.node_labels.push(label.clone());
            self.prune_stale_conflicts(&label);
            self.open_nodes.push_back(child);
        }
        Ok(())
    }

    fn create_child(&mut self, parent: NodeId, arc_label: Lit) -> NodeId {
        let id = self.nodes.len();
        let parameters = self
            .labeler
            .get_child_parameters(&self.nodes[parent].parameters, arc_label);
        let node = Node::child(id, &self.nodes[parent], arc_label, parameters);
        self.nodes_lookup.insert(sorted_key(&node.path_label), id);
        self.nodes[parent].children.push((arc_label, id));
        self.nodes.push(node);
        id
    }

    /// Drop recorded conflicts that `fresh` strictly refines and prune the
    /// open nodes they label.
    fn prune_stale_conflicts(&mut self, fresh: &[Lit]) {
        let fresh_key = sorted_key(fresh);
        let mut stale: Vec<Vec<Lit>> = vec![];
        self.node_labels.retain(|known| {
            let known_key = sorted_key(known);
            if known_key != fresh_key && is_subset(fresh, known) {
                stale.push(known_key);
                false
            } else {
                true
            }
        });
        if stale.is_empty() {
            return;
        }
        for node in self.nodes.iter_mut() {
            if node.status == NodeStatus::Open
                && stale.iter().any(|key| *key == sorted_key(&node.label))
            {
                debug!("pruning node {} labelled {:?}", node.id, node.label);
                node.status = NodeStatus::Pruned;
            }
        }
    }

    /// Close open nodes whose path grew a superset of a recorded
    /// diagnosis.
    fn close_superset_paths(&mut self) {
        let path_labels = &self.path_labels;
        for node in self.nodes.iter_mut() {
            if node.status == NodeStatus::Open
                && path_labels
                    .iter()
                    .any(|diagnosis| is_subset(diagnosis, &node.path_label))
            {
                node.status = NodeStatus::Closed;
            }
        }
    }
}

/// Sort the result sets canonically: each set by literal order, the list
/// ascending by size and then lexicographically.
pub(crate) fn canonicalize(sets: &[Vec<Lit>]) -> Vec<Vec<Lit>> {
    let mut result: Vec<Vec<Lit>> = sets.iter().map(|set| sorted_key(set)).collect();
    result.sort_unstable_by(|a, b| a.len().cmp(&b.len()).then_with(|| a.cmp(b)));
    result
}

fn sorted_key(lits: &[Lit]) -> Vec<Lit> {
    let mut key = lits.to_vec();
    key.sort_unstable();
    key
}

fn is_subset(small: &[Lit], large: &[Lit]) -> bool {
    small.iter().all(|lit| large.contains(lit))
}

fn is_disjoint(left: &[Lit], right: &[Lit]) -> bool {
    left.iter().all(|lit| !right.contains(lit))
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::cell::RefCell;
    use std::rc::Rc;

    use varisat::{CnfFormula, ExtendFormula};

    use crate::checker::ConsistencyChecker;
    use crate::labeler::LabelParameters;
    use crate::quickxplain::QuickXPlain;
    use crate::solver::{solver_by_name, DEFAULT_SOLVER};

    fn lits(numbers: &[isize]) -> Vec<Lit> {
        numbers.iter().map(|&n| Lit::from_dimacs(n)).collect()
    }

    fn sets(numbers: &[&[isize]]) -> Vec<Vec<Lit>> {
        numbers.iter().map(|set| lits(set)).collect()
    }

    fn engine_for(kb: &[Vec<isize>], candidates: &[isize], background: &[isize]) -> HsDag {
        let mut formula = CnfFormula::new();
        for clause in kb {
            formula.add_clause(&lits(clause));
        }
        let mut assumptions = lits(background);
        assumptions.extend_from_slice(&lits(candidates));
        let solver = solver_by_name(DEFAULT_SOLVER, &formula).unwrap();
        let checker = ConsistencyChecker::new(solver, assumptions);
        let labeler = QuickXPlain::new(checker, lits(candidates), lits(background));
        HsDag::new(Box::new(labeler))
    }

    /// Labeler with a predetermined label sequence, for exercising engine
    /// rules in isolation.
    struct StubLabeler {
        candidates: Vec<Lit>,
        script: Rc<RefCell<VecDeque<Vec<Lit>>>>,
    }

    impl StubLabeler {
        fn new(candidates: &[isize], script: &[&[isize]]) -> (StubLabeler, Rc<RefCell<VecDeque<Vec<Lit>>>>) {
            let script: VecDeque<Vec<Lit>> = script.iter().map(|label| lits(label)).collect();
            let script = Rc::new(RefCell::new(script));
            let labeler = StubLabeler {
                candidates: lits(candidates),
                script: Rc::clone(&script),
            };
            (labeler, script)
        }
    }

    impl Labeler for StubLabeler {
        fn initial_parameters(&self) -> LabelParameters {
            LabelParameters {
                candidates: self.candidates.clone(),
                background: vec![],
                delta: vec![],
            }
        }

        fn get_label(&mut self, _params: &LabelParameters) -> Result<Vec<Lit>, DiagnosisError> {
            Ok(self
                .script
                .borrow_mut()
                .pop_front()
                .expect("unexpected labeler call"))
        }

        fn get_child_parameters(
            &self,
            parent: &LabelParameters,
            arc_label: Lit,
        ) -> LabelParameters {
            LabelParameters {
                candidates: parent
                    .candidates
                    .iter()
                    .copied()
                    .filter(|&lit| lit != arc_label)
                    .collect(),
                background: parent.background.clone(),
                delta: parent.delta.clone(),
            }
        }
    }

    #[test]
    fn enumerates_all_minimal_conflicts_and_diagnoses() {
        // at most one of 1, 2, 3 may hold, yet one of them must
        let kb = vec![vec![1, 2, 3], vec![-1, -2], vec![-1, -3], vec![-2, -3]];
        let mut engine = engine_for(&kb, &[1, 2, 3], &[]);
        engine.construct().unwrap();

        assert_eq!(
            engine.get_conflicts(),
            sets(&[&[1, 2], &[1, 3], &[2, 3]])
        );
        assert_eq!(
            engine.get_diagnoses(),
            sets(&[&[1, 2], &[1, 3], &[2, 3]])
        );

        // the duplicate path 2-1 was merged into the checked 1-2 node
        // rather than re-checked
        let merged: Vec<&Node> = engine
            .nodes()
            .iter()
            .filter(|node| node.parents().len() == 2)
            .collect();
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].status(), NodeStatus::Checked);
        assert_eq!(sorted_key(merged[0].path_label()), lits(&[1, 2]));
    }

    #[test]
    fn reuse_merges_paths_reached_in_different_orders() {
        // pairwise exclusions over four candidates, no positive clause
        let kb = vec![vec![-1, -2], vec![-1, -3], vec![-2, -3], vec![-3, -4]];
        let mut engine = engine_for(&kb, &[1, 2, 3, 4], &[]);
        engine.construct().unwrap();

        assert_eq!(
            engine.get_conflicts(),
            sets(&[&[1, 2], &[1, 3], &[2, 3], &[3, 4]])
        );
        assert_eq!(
            engine.get_diagnoses(),
            sets(&[&[1, 3], &[2, 3], &[1, 2, 4]])
        );

        // the path {1, 2} is reachable over 1-2 and 2-1 and must exist
        // only once, with both parents recorded
        let merged: Vec<&Node> = engine
            .nodes()
            .iter()
            .filter(|node| node.parents().len() == 2)
            .collect();
        assert_eq!(merged.len(), 1);
        assert_eq!(sorted_key(merged[0].path_label()), lits(&[1, 2]));

        // the path 1-2-3 grew past the diagnosis {1, 3} and was closed
        assert!(engine
            .nodes()
            .iter()
            .any(|node| node.status() == NodeStatus::Closed));
    }

    #[test]
    fn a_refined_conflict_prunes_its_superset() {
        // scripted: the root label is not minimal, the first child label
        // strictly refines it
        let (labeler, script) =
            StubLabeler::new(&[1, 2, 3], &[&[1, 2, 3], &[2, 3], &[], &[]]);
        let mut engine = HsDag::new(Box::new(labeler));
        engine.construct().unwrap();

        assert!(script.borrow().is_empty());
        assert_eq!(engine.get_conflicts(), sets(&[&[2, 3]]));
        assert_eq!(engine.get_diagnoses(), sets(&[&[1, 2], &[1, 3]]));
        assert_eq!(engine.nodes()[0].status(), NodeStatus::Pruned);
    }

    #[test]
    fn disjoint_known_conflicts_label_without_a_labeler_call() {
        let (labeler, script) =
            StubLabeler::new(&[1, 2, 3, 4], &[&[1, 2], &[3, 4], &[], &[], &[], &[]]);
        let mut engine = HsDag::new(Box::new(labeler));
        engine.construct().unwrap();

        // six calls: root, the 1-child, and the four leaves; the 2-child
        // reused the recorded conflict {3, 4}
        assert!(script.borrow().is_empty());
        assert_eq!(engine.get_conflicts(), sets(&[&[1, 2], &[3, 4]]));
        assert_eq!(
            engine.get_diagnoses(),
            sets(&[&[1, 3], &[1, 4], &[2, 3], &[2, 4]])
        );
    }

    #[test]
    fn conflict_bound_stops_discovery() {
        let kb = vec![vec![1, 2, 3], vec![-1, -2], vec![-1, -3], vec![-2, -3]];
        let mut engine = engine_for(&kb, &[1, 2, 3], &[]);
        engine.max_number_conflicts = 1;
        engine.construct().unwrap();

        assert_eq!(engine.get_conflicts(), sets(&[&[1, 2]]));
        assert!(engine.get_diagnoses().is_empty());
    }

    #[test]
    fn depth_bound_stops_expansion() {
        let kb = vec![vec![1, 2, 3], vec![-1, -2], vec![-1, -3], vec![-2, -3]];
        let mut engine = engine_for(&kb, &[1, 2, 3], &[]);
        engine.max_depth = 1;
        engine.construct().unwrap();

        // no singleton hitting set exists, so no diagnosis fits the bound
        assert!(engine.get_diagnoses().is_empty());
        assert!(engine
            .nodes()
            .iter()
            .all(|node| node.level() <= engine.max_depth));
    }

    #[test]
    fn consistent_instance_builds_no_dag() {
        let mut engine = engine_for(&[vec![1, 2]], &[1, 2], &[]);
        engine.construct().unwrap();

        assert!(engine.nodes().is_empty());
        assert!(engine.get_conflicts().is_empty());
        assert!(engine.get_diagnoses().is_empty());
    }

    #[test]
    fn canonical_order_is_by_size_then_lexicographic() {
        let sets_in = sets(&[&[2, 1, 3], &[3, 1], &[2]]);
        let expected = sets(&[&[2], &[1, 3], &[1, 2, 3]]);
        assert_eq!(canonicalize(&sets_in), expected);
    }
}
