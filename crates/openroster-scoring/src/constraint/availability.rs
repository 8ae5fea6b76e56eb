//! Availability time-slot constraints (unavailable / undesired / desired).
//!
//! All three count intersecting (availability, shift) pairs for the
//! shift's employee. Availabilities are immutable problem facts, so an
//! employee-keyed index built once per solving session is enough to
//! keep insert/retract at the changed shift's neighborhood.

use std::collections::HashMap;

use openroster_core::domain::EmployeeId;
use openroster_core::{AvailabilityState, HardMediumSoftScore, Roster};

use super::{ConstraintLevel, IncrementalConstraint};

/// Penalty per intersecting UNAVAILABLE pair.
const UNAVAILABLE_WEIGHT: i64 = 50;

/// Employee-keyed index over availabilities of one state.
struct SlotIndex {
    state: AvailabilityState,
    by_employee: HashMap<EmployeeId, Vec<usize>>,
}

impl SlotIndex {
    fn new(state: AvailabilityState) -> Self {
        Self {
            state,
            by_employee: HashMap::new(),
        }
    }

    fn build(&mut self, roster: &Roster) {
        self.by_employee.clear();
        for (i, availability) in roster.availabilities.iter().enumerate() {
            if availability.state == self.state {
                self.by_employee
                    .entry(availability.employee)
                    .or_default()
                    .push(i);
            }
        }
    }

    /// Counts availabilities of this state intersecting the shift, for
    /// the shift's assigned employee. Uses the index.
    fn indexed_pairs(&self, roster: &Roster, shift_index: usize) -> i64 {
        let shift = &roster.shifts[shift_index];
        let Some(employee) = shift.employee else {
            return 0;
        };
        let Some(slots) = self.by_employee.get(&employee) else {
            return 0;
        };
        slots
            .iter()
            .filter(|&&i| roster.availabilities[i].intersects(shift.start, shift.end))
            .count() as i64
    }
}

/// Index-free pair count, used by the pure full evaluation.
fn scan_pairs(roster: &Roster, shift_index: usize, state: AvailabilityState) -> i64 {
    let shift = &roster.shifts[shift_index];
    let Some(employee) = shift.employee else {
        return 0;
    };
    roster
        .availabilities
        .iter()
        .filter(|a| a.state == state && a.employee == employee)
        .filter(|a| a.intersects(shift.start, shift.end))
        .count() as i64
}

/// Shared incremental machinery for the three availability constraints.
/// `weight` is the score magnitude per pair; `signum` is -1 for
/// penalties and +1 for the desired-slot reward.
struct SlotConstraint {
    weight: i64,
    signum: i64,
    index: SlotIndex,
    /// shift index -> matched pair count while inserted.
    matched: HashMap<usize, i64>,
}

impl SlotConstraint {
    fn new(state: AvailabilityState, weight: i64, signum: i64) -> Self {
        Self {
            weight,
            signum,
            index: SlotIndex::new(state),
            matched: HashMap::new(),
        }
    }

    /// Weight 0 is a kill switch: the constraint body never runs.
    #[inline]
    fn disabled(&self) -> bool {
        self.weight == 0
    }

    fn evaluate(&self, roster: &Roster) -> HardMediumSoftScore {
        if self.disabled() {
            return HardMediumSoftScore::ZERO;
        }
        let pairs: i64 = (0..roster.shifts.len())
            .map(|i| scan_pairs(roster, i, self.index.state))
            .sum();
        self.contribution(pairs)
    }

    fn match_count(&self, roster: &Roster) -> usize {
        if self.disabled() {
            return 0;
        }
        (0..roster.shifts.len())
            .map(|i| scan_pairs(roster, i, self.index.state) as usize)
            .sum()
    }

    fn initialize(&mut self, roster: &Roster) -> HardMediumSoftScore {
        self.matched.clear();
        if self.disabled() {
            return HardMediumSoftScore::ZERO;
        }
        self.index.build(roster);
        let mut pairs = 0i64;
        for i in 0..roster.shifts.len() {
            let count = self.index.indexed_pairs(roster, i);
            if count > 0 {
                self.matched.insert(i, count);
                pairs += count;
            }
        }
        self.contribution(pairs)
    }

    fn on_insert(&mut self, roster: &Roster, shift_index: usize) -> HardMediumSoftScore {
        if self.disabled() {
            return HardMediumSoftScore::ZERO;
        }
        let count = self.index.indexed_pairs(roster, shift_index);
        if count > 0 {
            self.matched.insert(shift_index, count);
            return self.contribution(count);
        }
        HardMediumSoftScore::ZERO
    }

    fn on_retract(&mut self, _roster: &Roster, shift_index: usize) -> HardMediumSoftScore {
        if self.disabled() {
            return HardMediumSoftScore::ZERO;
        }
        if let Some(count) = self.matched.remove(&shift_index) {
            return -self.contribution(count);
        }
        HardMediumSoftScore::ZERO
    }

    fn reset(&mut self) {
        self.matched.clear();
        self.index.by_employee.clear();
    }

    fn contribution(&self, pairs: i64) -> HardMediumSoftScore {
        let value = self.signum * self.weight * pairs;
        match self.index.state {
            AvailabilityState::Unavailable => HardMediumSoftScore::of_hard(value),
            _ => HardMediumSoftScore::of_soft(value),
        }
    }
}

/// An employee must not work a shift intersecting an UNAVAILABLE slot.
pub struct UnavailableTimeSlotConstraint {
    inner: SlotConstraint,
}

impl UnavailableTimeSlotConstraint {
    pub fn new() -> Self {
        Self {
            inner: SlotConstraint::new(AvailabilityState::Unavailable, UNAVAILABLE_WEIGHT, -1),
        }
    }
}

impl Default for UnavailableTimeSlotConstraint {
    fn default() -> Self {
        Self::new()
    }
}

/// Penalize shifts intersecting an UNDESIRED slot by the tenant weight.
pub struct UndesiredTimeSlotConstraint {
    inner: SlotConstraint,
}

impl UndesiredTimeSlotConstraint {
    pub fn new(weight: i64) -> Self {
        Self {
            inner: SlotConstraint::new(AvailabilityState::Undesired, weight, -1),
        }
    }
}

/// Reward shifts intersecting a DESIRED slot by the tenant weight.
pub struct DesiredTimeSlotConstraint {
    inner: SlotConstraint,
}

impl DesiredTimeSlotConstraint {
    pub fn new(weight: i64) -> Self {
        Self {
            inner: SlotConstraint::new(AvailabilityState::Desired, weight, 1),
        }
    }
}

macro_rules! delegate_slot_constraint {
    ($type:ident, $name:literal, $level:expr) => {
        impl IncrementalConstraint for $type {
            fn evaluate(&self, roster: &Roster) -> HardMediumSoftScore {
                self.inner.evaluate(roster)
            }

            fn match_count(&self, roster: &Roster) -> usize {
                self.inner.match_count(roster)
            }

            fn initialize(&mut self, roster: &Roster) -> HardMediumSoftScore {
                self.inner.initialize(roster)
            }

            fn on_insert(&mut self, roster: &Roster, shift_index: usize) -> HardMediumSoftScore {
                self.inner.on_insert(roster, shift_index)
            }

            fn on_retract(&mut self, roster: &Roster, shift_index: usize) -> HardMediumSoftScore {
                self.inner.on_retract(roster, shift_index)
            }

            fn reset(&mut self) {
                self.inner.reset();
            }

            fn name(&self) -> &str {
                $name
            }

            fn level(&self) -> ConstraintLevel {
                $level
            }
        }
    };
}

delegate_slot_constraint!(
    UnavailableTimeSlotConstraint,
    "Unavailable time slot for an employee",
    ConstraintLevel::Hard
);
delegate_slot_constraint!(
    UndesiredTimeSlotConstraint,
    "Undesired time slot for an employee",
    ConstraintLevel::Soft
);
delegate_slot_constraint!(
    DesiredTimeSlotConstraint,
    "Desired time slot for an employee",
    ConstraintLevel::Soft
);
