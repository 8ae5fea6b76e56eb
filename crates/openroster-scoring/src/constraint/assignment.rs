//! Assignment completeness (medium) and rotation adherence (soft).

use std::collections::HashSet;

use openroster_core::{HardMediumSoftScore, Roster};

use super::{ConstraintLevel, IncrementalConstraint};

/// Every shift should have an employee. One medium point per
/// unassigned shift.
pub struct AssignEveryShiftConstraint {
    unassigned: HashSet<usize>,
}

impl AssignEveryShiftConstraint {
    pub fn new() -> Self {
        Self {
            unassigned: HashSet::new(),
        }
    }
}

impl Default for AssignEveryShiftConstraint {
    fn default() -> Self {
        Self::new()
    }
}

impl IncrementalConstraint for AssignEveryShiftConstraint {
    fn evaluate(&self, roster: &Roster) -> HardMediumSoftScore {
        HardMediumSoftScore::of_medium(-(roster.unassigned_count() as i64))
    }

    fn match_count(&self, roster: &Roster) -> usize {
        roster.unassigned_count()
    }

    fn initialize(&mut self, roster: &Roster) -> HardMediumSoftScore {
        self.unassigned.clear();
        let mut total = 0i64;
        for (i, shift) in roster.shifts.iter().enumerate() {
            if shift.employee.is_none() {
                self.unassigned.insert(i);
                total -= 1;
            }
        }
        HardMediumSoftScore::of_medium(total)
    }

    fn on_insert(&mut self, roster: &Roster, shift_index: usize) -> HardMediumSoftScore {
        if roster.shifts[shift_index].employee.is_none() && self.unassigned.insert(shift_index) {
            return HardMediumSoftScore::of_medium(-1);
        }
        HardMediumSoftScore::ZERO
    }

    fn on_retract(&mut self, _roster: &Roster, shift_index: usize) -> HardMediumSoftScore {
        if self.unassigned.remove(&shift_index) {
            return HardMediumSoftScore::of_medium(1);
        }
        HardMediumSoftScore::ZERO
    }

    fn reset(&mut self) {
        self.unassigned.clear();
    }

    fn name(&self) -> &str {
        "Assign every shift"
    }

    fn level(&self) -> ConstraintLevel {
        ConstraintLevel::Medium
    }
}

/// Penalize shifts assigned to someone other than their rotation
/// employee, weighted by the tenant parametrization. Weight 0 disables
/// the constraint entirely.
pub struct RotationMatchConstraint {
    weight: i64,
    mismatches: HashSet<usize>,
}

impl RotationMatchConstraint {
    pub fn new(weight: i64) -> Self {
        Self {
            weight,
            mismatches: HashSet::new(),
        }
    }

    #[inline]
    fn is_mismatch(roster: &Roster, shift_index: usize) -> bool {
        let shift = &roster.shifts[shift_index];
        matches!(shift.employee, Some(employee) if employee != shift.rotation_employee)
    }
}

impl IncrementalConstraint for RotationMatchConstraint {
    fn evaluate(&self, roster: &Roster) -> HardMediumSoftScore {
        if self.weight == 0 {
            return HardMediumSoftScore::ZERO;
        }
        let count = (0..roster.shifts.len())
            .filter(|&i| Self::is_mismatch(roster, i))
            .count() as i64;
        HardMediumSoftScore::of_soft(-self.weight * count)
    }

    fn match_count(&self, roster: &Roster) -> usize {
        if self.weight == 0 {
            return 0;
        }
        (0..roster.shifts.len())
            .filter(|&i| Self::is_mismatch(roster, i))
            .count()
    }

    fn initialize(&mut self, roster: &Roster) -> HardMediumSoftScore {
        self.mismatches.clear();
        if self.weight == 0 {
            return HardMediumSoftScore::ZERO;
        }
        let mut count = 0i64;
        for i in 0..roster.shifts.len() {
            if Self::is_mismatch(roster, i) {
                self.mismatches.insert(i);
                count += 1;
            }
        }
        HardMediumSoftScore::of_soft(-self.weight * count)
    }

    fn on_insert(&mut self, roster: &Roster, shift_index: usize) -> HardMediumSoftScore {
        if self.weight == 0 {
            return HardMediumSoftScore::ZERO;
        }
        if Self::is_mismatch(roster, shift_index) && self.mismatches.insert(shift_index) {
            return HardMediumSoftScore::of_soft(-self.weight);
        }
        HardMediumSoftScore::ZERO
    }

    fn on_retract(&mut self, _roster: &Roster, shift_index: usize) -> HardMediumSoftScore {
        if self.weight == 0 {
            return HardMediumSoftScore::ZERO;
        }
        if self.mismatches.remove(&shift_index) {
            return HardMediumSoftScore::of_soft(self.weight);
        }
        HardMediumSoftScore::ZERO
    }

    fn reset(&mut self) {
        self.mismatches.clear();
    }

    fn name(&self) -> &str {
        "Employee is not rotation employee"
    }

    fn level(&self) -> ConstraintLevel {
        ConstraintLevel::Soft
    }
}
