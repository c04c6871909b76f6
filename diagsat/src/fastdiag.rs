//! FastDiag preferred diagnosis computation.
//!
//! The divide and conquer dual of QuickXPlain: instead of shrinking an
//! inconsistent set to a minimal conflict, FastDiag shrinks the removed
//! part to a minimal diagnosis. One invocation yields a single preferred
//! minimal diagnosis without enumerating any conflicts.
use log::debug;
use varisat::Lit;

use crate::checker::ConsistencyChecker;
use crate::errors::DiagnosisError;

/// Computes one preferred minimal diagnosis.
pub struct FastDiag {
    checker: ConsistencyChecker,
}

impl FastDiag {
    /// Create the algorithm over a prepared checker.
    pub fn new(checker: ConsistencyChecker) -> FastDiag {
        FastDiag { checker }
    }

    /// Compute one minimal diagnosis of `set_c` under the background
    /// `set_b`, or an empty vector if there is none.
    ///
    /// Returns an empty vector when the candidates are already consistent
    /// under the background (nothing needs removal) and when the
    /// background alone is unsatisfiable (no removal can help).
    pub fn find_diagnosis(
        &mut self,
        set_c: &[Lit],
        set_b: &[Lit],
    ) -> Result<Vec<Lit>, DiagnosisError> {
        if set_c.is_empty() {
            return Ok(vec![]);
        }
        let mut all = set_b.to_vec();
        all.extend_from_slice(set_c);
        if self.checker.is_consistent(&all)? {
            return Ok(vec![]);
        }
        if !self.checker.is_satisfiable(set_b)? {
            debug!("background alone is unsatisfiable, no diagnosis exists");
            return Ok(vec![]);
        }
        self.fd(&[], set_c, &all)
    }

    /// The recursion: find a minimal diagnosis within `set_c`, where
    /// `set_ac` is the whole assumption universe minus the removals made
    /// so far and `set_d` holds the candidates the caller just removed.
    fn fd(
        &mut self,
        set_d: &[Lit],
        set_c: &[Lit],
        set_ac: &[Lit],
    ) -> Result<Vec<Lit>, DiagnosisError> {
        if !set_d.is_empty() && self.checker.is_consistent(set_ac)? {
            // the removals made so far already restored consistency
            return Ok(vec![]);
        }
        if set_c.len() == 1 {
            return Ok(set_c.to_vec());
        }
        let (c1, c2) = set_c.split_at(set_c.len() / 2);

        let a1 = difference(set_ac, c1);
        let d1 = self.fd(c1, c2, &a1)?;

        let a2 = difference(set_ac, &d1);
        let d2 = self.fd(&d1, c1, &a2)?;

        // d2 ⊆ c1 comes first, keeping the result in candidate order
        let mut diagnosis = d2;
        diagnosis.extend_from_slice(&d1);
        Ok(diagnosis)
    }
}

fn difference(set: &[Lit], minus: &[Lit]) -> Vec<Lit> {
    set.iter()
        .copied()
        .filter(|lit| !minus.contains(lit))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    use varisat::{CnfFormula, ExtendFormula};

    use crate::solver::{solver_by_name, DEFAULT_SOLVER};

    fn lits(numbers: &[isize]) -> Vec<Lit> {
        numbers.iter().map(|&n| Lit::from_dimacs(n)).collect()
    }

    fn fastdiag(kb: &[Vec<isize>], candidates: &[isize], background: &[isize]) -> FastDiag {
        let mut formula = CnfFormula::new();
        for clause in kb {
            formula.add_clause(&lits(clause));
        }
        let mut assumptions = lits(background);
        assumptions.extend_from_slice(&lits(candidates));
        let solver = solver_by_name(DEFAULT_SOLVER, &formula).unwrap();
        FastDiag::new(ConsistencyChecker::new(solver, assumptions))
    }

    #[test]
    fn finds_one_minimal_diagnosis() {
        let kb = vec![vec![1, 2, 3], vec![-1, -2], vec![-1, -3], vec![-2, -3]];
        let mut algorithm = fastdiag(&kb, &[1, 2, 3], &[]);
        let diagnosis = algorithm.find_diagnosis(&lits(&[1, 2, 3]), &[]).unwrap();
        assert_eq!(diagnosis, lits(&[1, 2]));

        // removing the diagnosis restores consistency, removing less does not
        assert!(algorithm.checker.is_consistent(&lits(&[3])).unwrap());
        assert!(!algorithm.checker.is_consistent(&lits(&[2, 3])).unwrap());
        assert!(!algorithm.checker.is_consistent(&lits(&[1, 3])).unwrap());
    }

    #[test]
    fn consistent_candidates_need_no_diagnosis() {
        let mut algorithm = fastdiag(&[vec![1, 2]], &[1, 2], &[]);
        let diagnosis = algorithm.find_diagnosis(&lits(&[1, 2]), &[]).unwrap();
        assert!(diagnosis.is_empty());
    }

    #[test]
    fn degenerate_background_has_no_diagnosis() {
        let mut algorithm = fastdiag(&[vec![1], vec![-1]], &[2], &[]);
        let diagnosis = algorithm.find_diagnosis(&lits(&[2]), &[]).unwrap();
        assert!(diagnosis.is_empty());
    }

    #[test]
    fn forced_candidate_is_the_diagnosis() {
        // KB = (1 ∨ ¬2) ∧ (2), B = {2}, C = {-1}
        let mut algorithm = fastdiag(&[vec![1, -2], vec![2]], &[-1], &[2]);
        let diagnosis = algorithm
            .find_diagnosis(&lits(&[-1]), &lits(&[2]))
            .unwrap();
        assert_eq!(diagnosis, lits(&[-1]));
    }
}
