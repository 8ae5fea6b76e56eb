//! Constraint library for employee rostering.
//!
//! Each constraint contributes to exactly one severity level and keeps
//! just enough internal state (violation sets plus an employee-scoped
//! reverse index) to re-evaluate only the changed shift's neighborhood
//! on a move, instead of rescanning the whole roster.
//!
//! # Incremental protocol
//!
//! 1. `initialize` once to populate internal state from the roster.
//! 2. Before a shift's employee changes: `on_retract` with the old state.
//! 3. After the change: `on_insert` with the new state.
//! 4. The returned deltas keep the caller's cached score exact.

mod assignment;
mod availability;
mod contract_minutes;
mod required_skill;
mod shift_spacing;

pub use assignment::{AssignEveryShiftConstraint, RotationMatchConstraint};
pub use availability::{
    DesiredTimeSlotConstraint, UnavailableTimeSlotConstraint, UndesiredTimeSlotConstraint,
};
pub use contract_minutes::ContractMinutesConstraint;
pub use required_skill::RequiredSkillConstraint;
pub use shift_spacing::{OneShiftPerDayConstraint, TenHourRestConstraint};

use openroster_core::{HardMediumSoftScore, Roster, RosterParametrization};

/// Severity level a constraint contributes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintLevel {
    Hard,
    Medium,
    Soft,
}

/// A single constraint with incremental scoring capability.
///
/// `evaluate` is a pure full pass used for baseline scoring and for
/// verifying the incremental bookkeeping; `initialize`/`on_insert`/
/// `on_retract` maintain internal state so a single-shift change costs
/// only its neighborhood.
pub trait IncrementalConstraint: Send + Sync {
    /// Full evaluation of this constraint over the whole roster.
    fn evaluate(&self, roster: &Roster) -> HardMediumSoftScore;

    /// Number of matches (violations or rewards) in the roster.
    fn match_count(&self, roster: &Roster) -> usize;

    /// Populates internal state by inserting every shift.
    /// Returns the total contribution.
    fn initialize(&mut self, roster: &Roster) -> HardMediumSoftScore;

    /// Called after a shift's employee variable changed (or on initial
    /// insertion). Returns the score delta.
    fn on_insert(&mut self, roster: &Roster, shift_index: usize) -> HardMediumSoftScore;

    /// Called before a shift's employee variable changes, while the
    /// roster still holds the old value. Returns the score delta.
    fn on_retract(&mut self, roster: &Roster, shift_index: usize) -> HardMediumSoftScore;

    /// Clears internal state for a new solving session.
    fn reset(&mut self);

    /// Constraint name for reporting.
    fn name(&self) -> &str;

    /// Severity level this constraint contributes to.
    fn level(&self) -> ConstraintLevel;
}

/// Per-constraint contribution, used for score explanation.
#[derive(Debug, Clone)]
pub struct ConstraintResult {
    pub name: String,
    pub score: HardMediumSoftScore,
    pub match_count: usize,
    pub level: ConstraintLevel,
}

/// The full rostering constraint set.
///
/// Weighted constraints read their weight from the roster's
/// parametrization once, at construction; a weight of zero acts as a
/// kill switch that skips the constraint body entirely.
pub struct RosterConstraints {
    required_skill: RequiredSkillConstraint,
    unavailable: UnavailableTimeSlotConstraint,
    one_shift_per_day: OneShiftPerDayConstraint,
    ten_hour_rest: TenHourRestConstraint,
    contract_minutes: ContractMinutesConstraint,
    assign_every_shift: AssignEveryShiftConstraint,
    undesired: UndesiredTimeSlotConstraint,
    desired: DesiredTimeSlotConstraint,
    rotation_match: RotationMatchConstraint,
}

impl RosterConstraints {
    /// Builds the constraint set for a roster's parametrization.
    pub fn new(parametrization: &RosterParametrization) -> Self {
        Self {
            required_skill: RequiredSkillConstraint::new(),
            unavailable: UnavailableTimeSlotConstraint::new(),
            one_shift_per_day: OneShiftPerDayConstraint::new(),
            ten_hour_rest: TenHourRestConstraint::new(),
            contract_minutes: ContractMinutesConstraint::new(),
            assign_every_shift: AssignEveryShiftConstraint::new(),
            undesired: UndesiredTimeSlotConstraint::new(parametrization.undesired_time_slot_weight),
            desired: DesiredTimeSlotConstraint::new(parametrization.desired_time_slot_weight),
            rotation_match: RotationMatchConstraint::new(
                parametrization.rotation_employee_match_weight,
            ),
        }
    }

    fn all(&self) -> [&dyn IncrementalConstraint; 9] {
        [
            &self.required_skill,
            &self.unavailable,
            &self.one_shift_per_day,
            &self.ten_hour_rest,
            &self.contract_minutes,
            &self.assign_every_shift,
            &self.undesired,
            &self.desired,
            &self.rotation_match,
        ]
    }

    fn all_mut(&mut self) -> [&mut dyn IncrementalConstraint; 9] {
        [
            &mut self.required_skill,
            &mut self.unavailable,
            &mut self.one_shift_per_day,
            &mut self.ten_hour_rest,
            &mut self.contract_minutes,
            &mut self.assign_every_shift,
            &mut self.undesired,
            &mut self.desired,
            &mut self.rotation_match,
        ]
    }

    /// Pure full evaluation over all constraints.
    pub fn evaluate_all(&self, roster: &Roster) -> HardMediumSoftScore {
        self.all()
            .into_iter()
            .fold(HardMediumSoftScore::ZERO, |total, c| {
                total + c.evaluate(roster)
            })
    }

    /// Per-constraint contributions for score explanation.
    pub fn evaluate_each(&self, roster: &Roster) -> Vec<ConstraintResult> {
        self.all()
            .into_iter()
            .map(|c| ConstraintResult {
                name: c.name().to_string(),
                score: c.evaluate(roster),
                match_count: c.match_count(roster),
                level: c.level(),
            })
            .collect()
    }

    /// Initializes all constraints and returns the total score.
    pub fn initialize_all(&mut self, roster: &Roster) -> HardMediumSoftScore {
        self.all_mut()
            .into_iter()
            .fold(HardMediumSoftScore::ZERO, |total, c| {
                total + c.initialize(roster)
            })
    }

    /// Inserts one shift into every constraint, returning the total delta.
    pub fn on_insert_all(&mut self, roster: &Roster, shift_index: usize) -> HardMediumSoftScore {
        self.all_mut()
            .into_iter()
            .fold(HardMediumSoftScore::ZERO, |total, c| {
                total + c.on_insert(roster, shift_index)
            })
    }

    /// Retracts one shift from every constraint, returning the total delta.
    pub fn on_retract_all(&mut self, roster: &Roster, shift_index: usize) -> HardMediumSoftScore {
        self.all_mut()
            .into_iter()
            .fold(HardMediumSoftScore::ZERO, |total, c| {
                total + c.on_retract(roster, shift_index)
            })
    }

    /// Resets every constraint for a new solving session.
    pub fn reset_all(&mut self) {
        for c in self.all_mut() {
            c.reset();
        }
    }

    /// Number of constraints in the set.
    pub fn constraint_count(&self) -> usize {
        self.all().len()
    }
}
