//! Diagnosis run configuration.
use serde::{Deserialize, Serialize};

use crate::errors::DiagnosisError;
use crate::solver::DEFAULT_SOLVER;

/// Configurable parameters of a diagnosis run.
#[derive(Clone, Debug)]
pub struct DiagnosisConfig {
    /// Name of the SAT solver backend. (Default: "varisat")
    pub solver_name: String,
    /// Maximum number of conflicts to discover, -1 for no limit. (Default: -1)
    pub max_conflicts: i64,
    /// Maximum expansion depth of the hitting set DAG, 0 for no limit. (Default: 0)
    pub max_depth: usize,
}

impl Default for DiagnosisConfig {
    fn default() -> DiagnosisConfig {
        DiagnosisConfig {
            solver_name: DEFAULT_SOLVER.to_owned(),
            max_conflicts: -1,
            max_depth: 0,
        }
    }
}

impl DiagnosisConfig {
    /// Check the bounds for consistency.
    pub fn check(&self) -> Result<(), DiagnosisError> {
        if self.max_conflicts < -1 || self.max_conflicts == 0 {
            return Err(DiagnosisError::InvalidBound {
                option: "max_conflicts",
                expected: "positive or -1",
                value: self.max_conflicts,
            });
        }
        Ok(())
    }
}

/// A partial update of a [`DiagnosisConfig`].
///
/// Fields that are not present are left unchanged when the update is
/// applied. Deserializable from TOML, so updates can be collected from
/// configuration files and command line options before a single
/// [`apply`](DiagnosisConfigUpdate::apply).
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DiagnosisConfigUpdate {
    pub solver_name: Option<String>,
    pub max_conflicts: Option<i64>,
    pub max_depth: Option<usize>,
}

impl DiagnosisConfigUpdate {
    /// Create an empty update.
    pub fn new() -> DiagnosisConfigUpdate {
        DiagnosisConfigUpdate::default()
    }

    /// Merge another update into this one, the other taking precedence.
    pub fn merge(&mut self, other: DiagnosisConfigUpdate) {
        if let Some(solver_name) = other.solver_name {
            self.solver_name = Some(solver_name);
        }
        if let Some(max_conflicts) = other.max_conflicts {
            self.max_conflicts = Some(max_conflicts);
        }
        if let Some(max_depth) = other.max_depth {
            self.max_depth = Some(max_depth);
        }
    }

    /// Apply this update to a configuration.
    pub fn apply(&self, config: &mut DiagnosisConfig) {
        if let Some(ref solver_name) = self.solver_name {
            config.solver_name = solver_name.clone();
        }
        if let Some(max_conflicts) = self.max_conflicts {
            config.max_conflicts = max_conflicts;
        }
        if let Some(max_depth) = self.max_depth {
            config.max_depth = max_depth;
        }
    }
}
