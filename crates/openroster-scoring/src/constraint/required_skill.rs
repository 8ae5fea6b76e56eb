//! Required skill for a shift (hard).

use std::collections::HashSet;

use openroster_core::{HardMediumSoftScore, Roster};

use super::{ConstraintLevel, IncrementalConstraint};

/// Penalty per assigned shift whose employee lacks a required skill.
const WEIGHT: i64 = 100;

/// An assigned shift's employee must hold every skill its spot requires.
pub struct RequiredSkillConstraint {
    /// Shift indices currently in violation.
    violations: HashSet<usize>,
}

impl RequiredSkillConstraint {
    pub fn new() -> Self {
        Self {
            violations: HashSet::new(),
        }
    }

    fn is_violation(roster: &Roster, shift_index: usize) -> bool {
        let shift = &roster.shifts[shift_index];
        let Some(employee_index) = shift.employee else {
            return false;
        };
        let employee = &roster.employees[employee_index];
        let spot = &roster.spots[shift.spot];
        !employee.has_all_skills(&spot.required_skills)
    }
}

impl Default for RequiredSkillConstraint {
    fn default() -> Self {
        Self::new()
    }
}

impl IncrementalConstraint for RequiredSkillConstraint {
    fn evaluate(&self, roster: &Roster) -> HardMediumSoftScore {
        let count = (0..roster.shifts.len())
            .filter(|&i| Self::is_violation(roster, i))
            .count() as i64;
        HardMediumSoftScore::of_hard(-WEIGHT * count)
    }

    fn match_count(&self, roster: &Roster) -> usize {
        (0..roster.shifts.len())
            .filter(|&i| Self::is_violation(roster, i))
            .count()
    }

    fn initialize(&mut self, roster: &Roster) -> HardMediumSoftScore {
        self.violations.clear();
        let mut total = 0i64;
        for i in 0..roster.shifts.len() {
            if Self::is_violation(roster, i) {
                self.violations.insert(i);
                total -= WEIGHT;
            }
        }
        HardMediumSoftScore::of_hard(total)
    }

    fn on_insert(&mut self, roster: &Roster, shift_index: usize) -> HardMediumSoftScore {
        if Self::is_violation(roster, shift_index) && self.violations.insert(shift_index) {
            return HardMediumSoftScore::of_hard(-WEIGHT);
        }
        HardMediumSoftScore::ZERO
    }

    fn on_retract(&mut self, _roster: &Roster, shift_index: usize) -> HardMediumSoftScore {
        if self.violations.remove(&shift_index) {
            return HardMediumSoftScore::of_hard(WEIGHT);
        }
        HardMediumSoftScore::ZERO
    }

    fn reset(&mut self) {
        self.violations.clear();
    }

    fn name(&self) -> &str {
        "Required skill for a shift"
    }

    fn level(&self) -> ConstraintLevel {
        ConstraintLevel::Hard
    }
}
