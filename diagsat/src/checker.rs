//! Consistency checking against the knowledge base.
use varisat::Lit;

use crate::errors::DiagnosisError;
use crate::solver::SatSolver;

/// Decides whether subsets of the assumption universe are consistent with
/// the knowledge base.
///
/// The checker owns the solver backend and the reference set A = B ∪ C of
/// all controllable assumption literals, fixed at construction. A query
/// asserts the given subset and negates every other literal of A, so the
/// remaining assumptions cannot act as support for the clauses under test.
pub struct ConsistencyChecker {
    solver: Box<dyn SatSolver>,
    assumptions: Vec<Lit>,
}

impl ConsistencyChecker {
    /// Create a checker over the given backend and reference assumption
    /// set.
    pub fn new(solver: Box<dyn SatSolver>, assumptions: Vec<Lit>) -> ConsistencyChecker {
        ConsistencyChecker {
            solver,
            assumptions,
        }
    }

    /// Check whether KB ∪ `set_c` ∪ ¬(A \ `set_c`) is satisfiable.
    pub fn is_consistent(&mut self, set_c: &[Lit]) -> Result<bool, DiagnosisError> {
        let mut assumptions = set_c.to_vec();
        for &lit in self.assumptions.iter() {
            if !set_c.contains(&lit) {
                assumptions.push(!lit);
            }
        }
        self.solver.solve(&assumptions)
    }

    /// Check whether KB ∪ `lits` is satisfiable, leaving all other
    /// assumption literals unconstrained.
    pub fn is_satisfiable(&mut self, lits: &[Lit]) -> Result<bool, DiagnosisError> {
        self.solver.solve(lits)
    }
}
