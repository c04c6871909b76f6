//! Input model of a diagnosis run.
use varisat::{CnfFormula, ExtendFormula, Lit};

use crate::errors::DiagnosisError;

/// A knowledge base partitioned into permanent clauses and two assumption
/// sets.
///
/// The clauses of `kb` are always asserted. The `candidates` are the
/// possibly faulty unit assumptions C, the `background` the trusted unit
/// assumptions B. Candidates and background must be disjoint and free of
/// duplicates; the union B ∪ C is the reference set of all controllable
/// assumptions.
#[derive(Debug)]
pub struct DiagnosisModel {
    kb: CnfFormula,
    candidates: Vec<Lit>,
    background: Vec<Lit>,
}

impl DiagnosisModel {
    /// Create a model from an already built formula and assumption sets.
    ///
    /// Checks the input invariants: no duplicate literal within a clause,
    /// within the candidate set or within the background set, and no
    /// literal occurring in both assumption sets.
    pub fn new(
        kb: CnfFormula,
        candidates: Vec<Lit>,
        background: Vec<Lit>,
    ) -> Result<DiagnosisModel, DiagnosisError> {
        for (index, clause) in kb.iter().enumerate() {
            check_distinct(clause, &format!("clause {}", index))?;
        }
        check_distinct(&candidates, "candidate set")?;
        check_distinct(&background, "background set")?;
        for &lit in candidates.iter() {
            if background.contains(&lit) {
                return Err(DiagnosisError::OverlappingAssumptions {
                    literal: lit.to_dimacs(),
                });
            }
        }
        Ok(DiagnosisModel {
            kb,
            candidates,
            background,
        })
    }

    /// Create a model from DIMACS encoded integers.
    pub fn from_dimacs(
        kb: &[Vec<isize>],
        candidates: &[isize],
        background: &[isize],
    ) -> Result<DiagnosisModel, DiagnosisError> {
        let mut formula = CnfFormula::new();
        for (index, clause) in kb.iter().enumerate() {
            let lits = dimacs_lits(clause, &format!("clause {}", index))?;
            formula.add_clause(&lits);
        }
        let candidates = dimacs_lits(candidates, "candidate set")?;
        let background = dimacs_lits(background, "background set")?;
        DiagnosisModel::new(formula, candidates, background)
    }

    /// The permanent clauses.
    pub fn kb(&self) -> &CnfFormula {
        &self.kb
    }

    /// The candidate assumptions C.
    pub fn candidates(&self) -> &[Lit] {
        &self.candidates
    }

    /// The background assumptions B.
    pub fn background(&self) -> &[Lit] {
        &self.background
    }

    /// The reference assumption set A = B ∪ C.
    pub fn assumptions(&self) -> Vec<Lit> {
        let mut assumptions = self.background.clone();
        assumptions.extend_from_slice(&self.candidates);
        assumptions
    }
}

/// Parse a whitespace or comma separated list of DIMACS literals.
///
/// `context` names the input in error messages.
pub fn parse_literals(input: &str, context: &str) -> Result<Vec<Lit>, DiagnosisError> {
    let mut numbers = vec![];
    for token in input.split(|c: char| c.is_whitespace() || c == ',') {
        if token.is_empty() {
            continue;
        }
        let number: isize = token.parse().map_err(|_| DiagnosisError::NotALiteral {
            context: context.to_owned(),
            token: token.to_owned(),
        })?;
        numbers.push(number);
    }
    dimacs_lits(&numbers, context)
}

fn dimacs_lits(numbers: &[isize], context: &str) -> Result<Vec<Lit>, DiagnosisError> {
    let mut lits = Vec::with_capacity(numbers.len());
    for &number in numbers.iter() {
        if number == 0 {
            return Err(DiagnosisError::ZeroLiteral {
                context: context.to_owned(),
            });
        }
        lits.push(Lit::from_dimacs(number));
    }
    check_distinct(&lits, context)?;
    Ok(lits)
}

fn check_distinct(lits: &[Lit], context: &str) -> Result<(), DiagnosisError> {
    for (index, &lit) in lits.iter().enumerate() {
        if lits[..index].contains(&lit) {
            return Err(DiagnosisError::DuplicateLiteral {
                context: context.to_owned(),
                literal: lit.to_dimacs(),
            });
        }
    }
    Ok(())
}
