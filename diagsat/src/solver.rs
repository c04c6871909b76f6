//! SAT solver backends.
use log::trace;
use varisat::{CnfFormula, Lit, Solver};

use crate::errors::DiagnosisError;

/// Name of the default backend.
pub const DEFAULT_SOLVER: &str = "varisat";

/// An incremental SAT solver answering repeated assumption queries.
///
/// A backend is created with the complete knowledge base loaded and stays
/// usable for any number of [`solve`](SatSolver::solve) calls on the same
/// instance. Backend resources are owned by the boxed value and released
/// when it is dropped, so every exit path of a run disposes of the solver.
pub trait SatSolver {
    /// Decide satisfiability of the knowledge base under the given unit
    /// assumptions.
    ///
    /// The assumptions only hold for this call; the next call starts from
    /// the bare knowledge base again.
    fn solve(&mut self, assumptions: &[Lit]) -> Result<bool, DiagnosisError>;
}

/// Create the backend selected by name, loaded with the knowledge base.
pub fn solver_by_name(
    name: &str,
    kb: &CnfFormula,
) -> Result<Box<dyn SatSolver>, DiagnosisError> {
    match name {
        DEFAULT_SOLVER => Ok(Box::new(VarisatSolver::new(kb))),
        _ => Err(DiagnosisError::UnknownSolver {
            name: name.to_owned(),
        }),
    }
}

/// Backend wrapping the varisat CDCL solver.
pub struct VarisatSolver {
    solver: Solver<'static>,
}

impl VarisatSolver {
    /// Create a solver with all clauses of the knowledge base loaded.
    pub fn new(kb: &CnfFormula) -> VarisatSolver {
        let mut solver = Solver::new();
        solver.add_formula(kb);
        VarisatSolver { solver }
    }
}

impl SatSolver for VarisatSolver {
    fn solve(&mut self, assumptions: &[Lit]) -> Result<bool, DiagnosisError> {
        self.solver.assume(assumptions);
        let result = self
            .solver
            .solve()
            .map_err(|err| DiagnosisError::SolverFailure {
                reason: err.to_string(),
            })?;
        trace!("solve under {:?}: {}", assumptions, result);
        Ok(result)
    }
}
