//! Error types of the diagnosis engine.
use thiserror::Error;

/// Possible errors while preparing or running a diagnosis.
///
/// All variants are fatal for the run that raised them: the engine never
/// retries a failed solver query and never repairs a malformed input model.
/// An unsatisfiable background is not an error but an expected (empty)
/// result.
#[derive(Debug, Error)]
pub enum DiagnosisError {
    #[error("solver backend failed: {}", reason)]
    SolverFailure { reason: String },
    #[error("unknown solver backend '{}'", name)]
    UnknownSolver { name: String },
    #[error("{} must be {}, got {}", option, expected, value)]
    InvalidBound {
        option: &'static str,
        expected: &'static str,
        value: i64,
    },
    #[error("{}: literal 0 is not allowed", context)]
    ZeroLiteral { context: String },
    #[error("{}: '{}' is not a literal", context, token)]
    NotALiteral { context: String, token: String },
    #[error("{}: duplicate literal {}", context, literal)]
    DuplicateLiteral { context: String, literal: isize },
    #[error(
        "literal {} is both a candidate and a background assumption",
        literal
    )]
    OverlappingAssumptions { literal: isize },
}
