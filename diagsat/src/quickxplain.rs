//! QuickXPlain minimal conflict computation.
//!
//! Junker's divide and conquer algorithm: split the candidate set, commit
//! one half to the background and recurse into the other, so consistency
//! checks cover many candidates at once. Each invocation returns one
//! conflict that is minimal under set inclusion, with its elements in the
//! order they appear in the candidate set.
use log::debug;
use varisat::Lit;

use crate::checker::ConsistencyChecker;
use crate::errors::DiagnosisError;
use crate::labeler::{LabelParameters, Labeler};

/// Labeler computing one minimal conflict per invocation.
pub struct QuickXPlain {
    checker: ConsistencyChecker,
    initial: LabelParameters,
    background_sat: Option<bool>,
}

impl QuickXPlain {
    /// Create a labeler for the given candidate and background sets.
    pub fn new(
        checker: ConsistencyChecker,
        candidates: Vec<Lit>,
        background: Vec<Lit>,
    ) -> QuickXPlain {
        QuickXPlain {
            checker,
            initial: LabelParameters {
                candidates,
                background: vec![],
                delta: background,
            },
            background_sat: None,
        }
    }

    /// Satisfiability of the knowledge base under the background alone,
    /// with candidate literals left unconstrained.
    ///
    /// The background never changes during a run, so the answer is
    /// computed once and cached. A negated-rest consistency query cannot
    /// express this check: it would also force every candidate false and
    /// misreport knowledge bases that require some candidate to hold.
    fn background_satisfiable(&mut self, background: &[Lit]) -> Result<bool, DiagnosisError> {
        match self.background_sat {
            Some(value) => Ok(value),
            None => {
                let value = self.checker.is_satisfiable(background)?;
                self.background_sat = Some(value);
                Ok(value)
            }
        }
    }

    /// Compute a minimal conflict within `set_c` under the background
    /// `set_b`, or an empty vector if there is none.
    ///
    /// Returns an empty vector when `set_c` is consistent under the
    /// background, and also when the background alone is unsatisfiable:
    /// such an instance is degenerate and has no conflict within the
    /// candidates.
    pub fn find_conflict_set(
        &mut self,
        set_c: &[Lit],
        set_b: &[Lit],
    ) -> Result<Vec<Lit>, DiagnosisError> {
        if set_c.is_empty() {
            return Ok(vec![]);
        }
        let mut union = set_b.to_vec();
        union.extend_from_slice(set_c);
        if self.checker.is_consistent(&union)? {
            return Ok(vec![]);
        }
        if !self.background_satisfiable(set_b)? {
            debug!("background alone is unsatisfiable, no conflict within candidates");
            return Ok(vec![]);
        }
        self.qx(&[], set_c, set_b)
    }

    /// The recursion: find a minimal conflict of `set_c` relative to
    /// `set_b`, where `set_d` holds the candidates committed to the
    /// background by the caller.
    fn qx(
        &mut self,
        set_d: &[Lit],
        set_c: &[Lit],
        set_b: &[Lit],
    ) -> Result<Vec<Lit>, DiagnosisError> {
        if !set_d.is_empty() && !self.checker.is_consistent(set_b)? {
            // the committed part is already inconsistent, nothing of set_c
            // is needed
            return Ok(vec![]);
        }
        if set_c.len() == 1 {
            return Ok(set_c.to_vec());
        }
        let (c1, c2) = set_c.split_at(set_c.len() / 2);

        let mut b1 = set_b.to_vec();
        b1.extend_from_slice(c1);
        let d1 = self.qx(c1, c2, &b1)?;

        let mut b2 = set_b.to_vec();
        b2.extend_from_slice(&d1);
        let d2 = self.qx(&d1, c1, &b2)?;

        // d2 ⊆ c1 comes first, keeping the result in candidate order
        let mut conflict = d2;
        conflict.extend_from_slice(&d1);
        Ok(conflict)
    }
}

impl Labeler for QuickXPlain {
    fn initial_parameters(&self) -> LabelParameters {
        self.initial.clone()
    }

    fn get_label(&mut self, params: &LabelParameters) -> Result<Vec<Lit>, DiagnosisError> {
        let mut background = params.background.clone();
        background.extend_from_slice(&params.delta);
        self.find_conflict_set(&params.candidates, &background)
    }

    fn get_child_parameters(&self, parent: &LabelParameters, arc_label: Lit) -> LabelParameters {
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
