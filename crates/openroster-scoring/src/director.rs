//! Incremental score director.
//!
//! Owns the working roster and the constraint set, keeping a cached
//! score in sync through the retract/insert protocol. The full and the
//! incremental paths must agree exactly; `full_score` exists so tests
//! and debug assertions can verify that equivalence.

use openroster_core::{HardMediumSoftScore, Result, Roster, RosterError};

use crate::constraint::{ConstraintResult, RosterConstraints};

/// Evaluates roster scores, supporting full recomputation and delta
/// evaluation keyed on a single changed shift.
pub struct ScoreDirector {
    roster: Roster,
    constraints: RosterConstraints,
    cached_score: HardMediumSoftScore,
    initialized: bool,
}

impl ScoreDirector {
    /// Creates a director for the given roster.
    ///
    /// The roster is validated first: dangling references or negative
    /// weights are a configuration error reported before any search.
    pub fn new(roster: Roster) -> Result<Self> {
        roster.validate()?;
        let constraints = RosterConstraints::new(&roster.parametrization);
        Ok(Self {
            roster,
            constraints,
            cached_score: HardMediumSoftScore::ZERO,
            initialized: false,
        })
    }

    /// Returns a reference to the working roster.
    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    /// Returns a mutable reference to the working roster.
    ///
    /// Only `Shift::employee` may be mutated through this reference,
    /// and only between `before_variable_changed` and
    /// `after_variable_changed` calls for that shift. Any other edit
    /// requires a `reset`.
    pub fn roster_mut(&mut self) -> &mut Roster {
        &mut self.roster
    }

    /// Calculates and returns the current score.
    ///
    /// The first call initializes every constraint's internal state;
    /// subsequent calls return the cached score.
    pub fn calculate_score(&mut self) -> HardMediumSoftScore {
        if !self.initialized {
            self.cached_score = self.constraints.initialize_all(&self.roster);
            self.initialized = true;
        }
        self.roster.score = Some(self.cached_score);
        self.cached_score
    }

    /// Returns the cached score without recalculation.
    #[inline]
    pub fn get_score(&self) -> HardMediumSoftScore {
        self.cached_score
    }

    /// Retracts a shift from all constraints before its employee
    /// variable changes.
    #[inline]
    pub fn before_variable_changed(&mut self, shift_index: usize) -> Result<()> {
        if !self.initialized {
            return Ok(());
        }
        let delta = self.constraints.on_retract_all(&self.roster, shift_index);
        self.accumulate(delta, shift_index)
    }

    /// Re-inserts a shift into all constraints after its employee
    /// variable changed.
    #[inline]
    pub fn after_variable_changed(&mut self, shift_index: usize) -> Result<()> {
        if !self.initialized {
            return Ok(());
        }
        let delta = self.constraints.on_insert_all(&self.roster, shift_index);
        self.accumulate(delta, shift_index)
    }

    /// Convenience for a complete variable change cycle: retract,
    /// apply `change_fn`, insert. Returns the updated score.
    pub fn do_change<F>(&mut self, shift_index: usize, change_fn: F) -> Result<HardMediumSoftScore>
    where
        F: FnOnce(&mut Roster),
    {
        self.before_variable_changed(shift_index)?;
        change_fn(&mut self.roster);
        self.after_variable_changed(shift_index)?;
        Ok(self.cached_score)
    }

    /// Pure full recomputation of the current roster's score.
    ///
    /// Does not touch incremental state; `full_score()` must always
    /// equal the cached score after any sequence of variable changes.
    pub fn full_score(&self) -> HardMediumSoftScore {
        self.constraints.evaluate_all(&self.roster)
    }

    /// Per-constraint contributions for score explanation.
    pub fn score_breakdown(&self) -> Vec<ConstraintResult> {
        self.constraints.evaluate_each(&self.roster)
    }

    /// Panics if the cached score has drifted from a full
    /// recomputation. Debug aid for the incremental bookkeeping.
    #[cfg(debug_assertions)]
    pub fn assert_score_consistency(&self) {
        if self.initialized {
            let full = self.full_score();
            assert_eq!(
                self.cached_score, full,
                "incremental score drifted from full recomputation"
            );
        }
    }

    /// Resets all incremental state; the next `calculate_score` starts
    /// from scratch.
    pub fn reset(&mut self) {
        self.constraints.reset_all();
        self.initialized = false;
        self.cached_score = HardMediumSoftScore::ZERO;
    }

    /// Clones the working roster with its score attached.
    pub fn clone_roster(&self) -> Roster {
        let mut roster = self.roster.clone();
        roster.score = Some(self.cached_score);
        roster
    }

    /// Consumes the director and returns the roster with its score.
    pub fn take_roster(mut self) -> Roster {
        self.roster.score = Some(self.cached_score);
        self.roster
    }

    fn accumulate(&mut self, delta: HardMediumSoftScore, shift_index: usize) -> Result<()> {
        match self.cached_score.checked_add(delta) {
            Some(score) => {
                self.cached_score = score;
                Ok(())
            }
            None => Err(RosterError::Scoring(format!(
                "score accumulator overflow while re-evaluating shift {shift_index}"
            ))),
        }
    }
}
