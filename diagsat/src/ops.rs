//! Operation façades wiring model, checker, labeler and engine together.
use log::info;
use varisat::Lit;

use crate::checker::ConsistencyChecker;
use crate::config::DiagnosisConfig;
use crate::errors::DiagnosisError;
use crate::fastdiag::FastDiag;
use crate::hsdag::{canonicalize, HsDag};
use crate::model::DiagnosisModel;
use crate::quickxplain::QuickXPlain;
use crate::solver::solver_by_name;

/// Structured result of a diagnosis operation.
///
/// `messages` holds the human readable summary, the conflicts message
/// before the diagnoses message.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DiagnosisResult {
    pub conflicts: Vec<Vec<Lit>>,
    pub diagnoses: Vec<Vec<Lit>>,
    pub messages: Vec<String>,
}

/// Enumerate all minimal conflicts and all minimal diagnoses of the model.
pub fn compute_conflicts_and_diagnoses(
    model: &DiagnosisModel,
    config: &DiagnosisConfig,
) -> Result<DiagnosisResult, DiagnosisError> {
    config.check()?;
    let solver = solver_by_name(&config.solver_name, model.kb())?;
    let mut checker = ConsistencyChecker::new(solver, model.assumptions());

    if model.candidates().is_empty() {
        // nothing to label: the empty set is the only possible diagnosis,
        // and it is one exactly when the background is satisfiable
        let diagnoses = if checker.is_satisfiable(model.background())? {
            vec![vec![]]
        } else {
            vec![]
        };
        let messages = vec![conflicts_message(&[]), diagnoses_message(&diagnoses)];
        return Ok(DiagnosisResult {
            conflicts: vec![],
            diagnoses,
            messages,
        });
    }

    let labeler = QuickXPlain::new(
        checker,
        model.candidates().to_vec(),
        model.background().to_vec(),
    );
    let mut hsdag = HsDag::new(Box::new(labeler));
    hsdag.max_number_conflicts = config.max_conflicts;
    hsdag.max_depth = config.max_depth;
    hsdag.construct()?;

    let conflicts = hsdag.get_conflicts();
    let diagnoses = hsdag.get_diagnoses();
    info!(
        "{} minimal conflicts, {} minimal diagnoses",
        conflicts.len(),
        diagnoses.len()
    );
    let messages = vec![conflicts_message(&conflicts), diagnoses_message(&diagnoses)];
    Ok(DiagnosisResult {
        conflicts,
        diagnoses,
        messages,
    })
}

/// Compute one preferred minimal diagnosis with FastDiag.
///
/// The result carries no conflicts and a single diagnoses message.
pub fn fastdiag(
    model: &DiagnosisModel,
    config: &DiagnosisConfig,
) -> Result<DiagnosisResult, DiagnosisError> {
    config.check()?;
    let solver = solver_by_name(&config.solver_name, model.kb())?;
    let checker = ConsistencyChecker::new(solver, model.assumptions());

    let mut algorithm = FastDiag::new(checker);
    let diagnosis = algorithm.find_diagnosis(model.candidates(), model.background())?;
    let diagnoses = if diagnosis.is_empty() {
        vec![]
    } else {
        canonicalize(&[diagnosis])
    };
    let messages = vec![diagnoses_message(&diagnoses)];
    Ok(DiagnosisResult {
        conflicts: vec![],
        diagnoses,
        messages,
    })
}

fn conflicts_message(conflicts: &[Vec<Lit>]) -> String {
    match conflicts.len() {
        0 => "No conflicts found".to_owned(),
        1 => format!("Conflict: {}", render_sets(conflicts)),
        _ => format!("Conflicts: {}", render_sets(conflicts)),
    }
}

fn diagnoses_message(diagnoses: &[Vec<Lit>]) -> String {
    match diagnoses.len() {
        0 => "No diagnosis found".to_owned(),
        1 => format!("Diagnosis: {}", render_sets(diagnoses)),
        _ => format!("Diagnoses: {}", render_sets(diagnoses)),
    }
}

fn render_sets(sets: &[Vec<Lit>]) -> String {
    let rendered: Vec<String> = sets
        .iter()
        .map(|set| {
            let elements: Vec<String> = set.iter().map(|lit| lit.to_dimacs().to_string()).collect();
            format!("[{}]", elements.join(", "))
        })
        .collect();
    rendered.join(", ")
}
