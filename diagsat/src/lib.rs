//! Minimal conflict and diagnosis engine for over-constrained CNF
//! knowledge bases.
//!
//! Given a knowledge base of permanent clauses, a background set B of
//! trusted assumption literals and a candidate set C of possibly faulty
//! ones, diagsat enumerates all minimal conflicts (subsets of C that are
//! unsatisfiable together with B) and all minimal diagnoses (subsets of C
//! whose removal restores satisfiability). Conflicts are produced by the
//! QuickXPlain labeler, diagnoses by breadth-first construction of
//! Reiter's hitting set DAG; all satisfiability queries go through an
//! incremental SAT solver using assumption literals.
//!
//! ```
//! use diagsat::{compute_conflicts_and_diagnoses, DiagnosisConfig, DiagnosisModel};
//!
//! let kb: Vec<Vec<isize>> = vec![vec![1, 2, 3], vec![-1, -2], vec![-1, -3], vec![-2, -3]];
//! let model = DiagnosisModel::from_dimacs(&kb, &[1, 2, 3], &[])?;
//! let result = compute_conflicts_and_diagnoses(&model, &DiagnosisConfig::default())?;
//!
//! assert_eq!(result.conflicts.len(), 3);
//! assert_eq!(result.diagnoses.len(), 3);
//! # Ok::<(), diagsat::DiagnosisError>(())
//! ```
pub mod checker;
pub mod config;
pub mod errors;
pub mod fastdiag;
pub mod hsdag;
pub mod labeler;
pub mod model;
pub mod ops;
pub mod quickxplain;
pub mod solver;


pub use varisat::{CnfFormula, ExtendFormula, Lit};

pub use crate::config::{DiagnosisConfig, DiagnosisConfigUpdate};
pub use crate::errors::DiagnosisError;
pub use crate::model::{parse_literals, DiagnosisModel};
pub use crate::ops::{compute_conflicts_and_diagnoses, DiagnosisResult};
