//! Pairwise shift spacing constraints (one per day, 10-hour rest).
//!
//! Both rules fire once per *ordered* pair of distinct shifts, matching
//! the documented rule multiplicity: two shifts on the same day cost
//! the daily rule twice (once per direction), and the rest rule is
//! keyed by end-time ordering so identical end times can match in both
//! directions. Each constraint maintains an employee-to-shifts reverse
//! index so a single change touches only that employee's shifts.

use std::collections::{HashMap, HashSet};

use openroster_core::domain::EmployeeId;
use openroster_core::{HardMediumSoftScore, Roster, Shift};

use super::{ConstraintLevel, IncrementalConstraint};

/// Penalty per ordered same-day pair.
const ONE_PER_DAY_WEIGHT: i64 = 10;

/// Minimum rest between shifts, in minutes.
const MIN_REST_MINUTES: i64 = 10 * 60;

fn unordered(a: usize, b: usize) -> (usize, usize) {
    if a < b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Employee-to-shifts reverse index shared by both spacing constraints.
#[derive(Default)]
struct EmployeeShiftIndex {
    by_employee: HashMap<EmployeeId, HashSet<usize>>,
}

impl EmployeeShiftIndex {
    fn insert(&mut self, employee: EmployeeId, shift_index: usize) {
        self.by_employee
            .entry(employee)
            .or_default()
            .insert(shift_index);
    }

    fn remove(&mut self, employee: EmployeeId, shift_index: usize) {
        if let Some(shifts) = self.by_employee.get_mut(&employee) {
            shifts.remove(&shift_index);
            if shifts.is_empty() {
                self.by_employee.remove(&employee);
            }
        }
    }

    fn peers(&self, employee: EmployeeId) -> Option<&HashSet<usize>> {
        self.by_employee.get(&employee)
    }

    fn clear(&mut self) {
        self.by_employee.clear();
    }
}

// ============================================================================
// HARD: At most one shift per day per employee
// ============================================================================

/// Two distinct shifts of one employee must not start on the same
/// calendar date. Scored per ordered pair, so one conflicting unordered
/// pair contributes twice.
pub struct OneShiftPerDayConstraint {
    /// Conflicting unordered pairs; each is worth two ordered matches.
    conflicts: HashSet<(usize, usize)>,
    /// shift index -> conflicts involving it.
    by_shift: HashMap<usize, HashSet<(usize, usize)>>,
    index: EmployeeShiftIndex,
}

impl OneShiftPerDayConstraint {
    pub fn new() -> Self {
        Self {
            conflicts: HashSet::new(),
            by_shift: HashMap::new(),
            index: EmployeeShiftIndex::default(),
        }
    }

    #[inline]
    fn same_day(a: &Shift, b: &Shift) -> bool {
        a.date() == b.date()
    }

    fn register(&mut self, pair: (usize, usize)) -> bool {
        if self.conflicts.insert(pair) {
            self.by_shift.entry(pair.0).or_default().insert(pair);
            self.by_shift.entry(pair.1).or_default().insert(pair);
            true
        } else {
            false
        }
    }
}

impl Default for OneShiftPerDayConstraint {
    fn default() -> Self {
        Self::new()
    }
}

impl IncrementalConstraint for OneShiftPerDayConstraint {
    fn evaluate(&self, roster: &Roster) -> HardMediumSoftScore {
        let shifts = &roster.shifts;
        let mut ordered_pairs = 0i64;
        for i in 0..shifts.len() {
            for j in (i + 1)..shifts.len() {
                if let (Some(a), Some(b)) = (shifts[i].employee, shifts[j].employee) {
                    if a == b && Self::same_day(&shifts[i], &shifts[j]) {
                        ordered_pairs += 2;
                    }
                }
            }
        }
        HardMediumSoftScore::of_hard(-ONE_PER_DAY_WEIGHT * ordered_pairs)
    }

    fn match_count(&self, roster: &Roster) -> usize {
        let shifts = &roster.shifts;
        let mut ordered_pairs = 0usize;
        for i in 0..shifts.len() {
            for j in (i + 1)..shifts.len() {
                if let (Some(a), Some(b)) = (shifts[i].employee, shifts[j].employee) {
                    if a == b && Self::same_day(&shifts[i], &shifts[j]) {
                        ordered_pairs += 2;
                    }
                }
            }
        }
        ordered_pairs
    }

    fn initialize(&mut self, roster: &Roster) -> HardMediumSoftScore {
        self.reset();
        let mut total = HardMediumSoftScore::ZERO;
        for i in 0..roster.shifts.len() {
            total = total + self.on_insert(roster, i);
        }
        total
    }

    fn on_insert(&mut self, roster: &Roster, shift_index: usize) -> HardMediumSoftScore {
        let shift = &roster.shifts[shift_index];
        let Some(employee) = shift.employee else {
            return HardMediumSoftScore::ZERO;
        };

        let mut new_pairs = 0i64;
        if let Some(peers) = self.index.peers(employee) {
            let matching: Vec<usize> = peers
                .iter()
                .copied()
                .filter(|&other| {
                    other != shift_index && Self::same_day(shift, &roster.shifts[other])
                })
                .collect();
            for other in matching {
                if self.register(unordered(shift_index, other)) {
                    new_pairs += 2;
                }
            }
        }
        self.index.insert(employee, shift_index);
        HardMediumSoftScore::of_hard(-ONE_PER_DAY_WEIGHT * new_pairs)
    }

    fn on_retract(&mut self, roster: &Roster, shift_index: usize) -> HardMediumSoftScore {
        let shift = &roster.shifts[shift_index];
        if let Some(employee) = shift.employee {
            self.index.remove(employee, shift_index);
        }

        let Some(pairs) = self.by_shift.remove(&shift_index) else {
            return HardMediumSoftScore::ZERO;
        };
        let mut removed = 0i64;
        for pair in pairs {
            if self.conflicts.remove(&pair) {
                removed += 2;
            }
            let other = if pair.0 == shift_index { pair.1 } else { pair.0 };
            if let Some(set) = self.by_shift.get_mut(&other) {
                set.remove(&pair);
            }
        }
        HardMediumSoftScore::of_hard(ONE_PER_DAY_WEIGHT * removed)
    }

    fn reset(&mut self) {
        self.conflicts.clear();
        self.by_shift.clear();
        self.index.clear();
    }

    fn name(&self) -> &str {
        "At most one shift per day per employee"
    }

    fn level(&self) -> ConstraintLevel {
        ConstraintLevel::Hard
    }
}

// ============================================================================
// HARD: No two shifts within 10 hours
// ============================================================================

/// The rest between one shift's end and the next shift's start must be
/// at least 10 hours. A directed pair (s, t) matches when both belong
/// to the same employee, `s.end <= t.end`, and the time from `s.end` to
/// `t.start` is under 10 hours (overlapping shifts qualify).
pub struct TenHourRestConstraint {
    /// Directed violating pairs (earlier-ending, later-ending).
    conflicts: HashSet<(usize, usize)>,
    /// shift index -> directed conflicts involving it (either side).
    by_shift: HashMap<usize, HashSet<(usize, usize)>>,
    index: EmployeeShiftIndex,
}

impl TenHourRestConstraint {
    pub fn new() -> Self {
        Self {
            conflicts: HashSet::new(),
            by_shift: HashMap::new(),
            index: EmployeeShiftIndex::default(),
        }
    }

    /// Directed check: does `(first, second)` violate the rest rule?
    #[inline]
    fn violates(first: &Shift, second: &Shift) -> bool {
        first.end <= second.end && (second.start - first.end).num_minutes() < MIN_REST_MINUTES
    }

    fn register(&mut self, pair: (usize, usize)) -> bool {
        if self.conflicts.insert(pair) {
            self.by_shift.entry(pair.0).or_default().insert(pair);
            self.by_shift.entry(pair.1).or_default().insert(pair);
            true
        } else {
            false
        }
    }
}

impl Default for TenHourRestConstraint {
    fn default() -> Self {
        Self::new()
    }
}

impl IncrementalConstraint for TenHourRestConstraint {
    fn evaluate(&self, roster: &Roster) -> HardMediumSoftScore {
        HardMediumSoftScore::of_hard(-(self.match_count(roster) as i64))
    }

    fn match_count(&self, roster: &Roster) -> usize {
        let shifts = &roster.shifts;
        let mut count = 0usize;
        for i in 0..shifts.len() {
            for j in 0..shifts.len() {
                if i == j {
                    continue;
                }
                if let (Some(a), Some(b)) = (shifts[i].employee, shifts[j].employee) {
                    if a == b && Self::violates(&shifts[i], &shifts[j]) {
                        count += 1;
                    }
                }
            }
        }
        count
    }

    fn initialize(&mut self, roster: &Roster) -> HardMediumSoftScore {
        self.reset();
        let mut total = HardMediumSoftScore::ZERO;
        for i in 0..roster.shifts.len() {
            total = total + self.on_insert(roster, i);
        }
        total
    }

    fn on_insert(&mut self, roster: &Roster, shift_index: usize) -> HardMediumSoftScore {
        let shift = &roster.shifts[shift_index];
        let Some(employee) = shift.employee else {
            return HardMediumSoftScore::ZERO;
        };

        let mut new_pairs = 0i64;
        if let Some(peers) = self.index.peers(employee) {
            let peers: Vec<usize> = peers
                .iter()
                .copied()
                .filter(|&other| other != shift_index)
                .collect();
            for other in peers {
                let other_shift = &roster.shifts[other];
                if Self::violates(shift, other_shift) && self.register((shift_index, other)) {
                    new_pairs += 1;
                }
                if Self::violates(other_shift, shift) && self.register((other, shift_index)) {
                    new_pairs += 1;
                }
            }
        }
        self.index.insert(employee, shift_index);
        HardMediumSoftScore::of_hard(-new_pairs)
    }

    fn on_retract(&mut self, roster: &Roster, shift_index: usize) -> HardMediumSoftScore {
        let shift = &roster.shifts[shift_index];
        if let Some(employee) = shift.employee {
            self.index.remove(employee, shift_index);
        }

        let Some(pairs) = self.by_shift.remove(&shift_index) else {
            return HardMediumSoftScore::ZERO;
        };
        let mut removed = 0i64;
        for pair in pairs {
            if self.conflicts.remove(&pair) {
                removed += 1;
            }
            let other = if pair.0 == shift_index { pair.1 } else { pair.0 };
            if let Some(set) = self.by_shift.get_mut(&other) {
                set.remove(&pair);
            }
        }
        HardMediumSoftScore::of_hard(removed)
    }

    fn reset(&mut self) {
        self.conflicts.clear();
        self.by_shift.clear();
        self.index.clear();
    }

    fn name(&self) -> &str {
        "No two shifts within 10 hours"
    }

    fn level(&self) -> ConstraintLevel {
        ConstraintLevel::Hard
    }
}
