//! Contract working-time limits (hard).
//!
//! One violation per (employee, period) whose summed assigned minutes
//! exceed the employee's contract maximum for that period, for each of
//! day, ISO week, month and year. A shift's full duration is attributed
//! to the period containing its start.

use std::collections::{HashMap, HashSet};

use chrono::{Datelike, NaiveDate};

use openroster_core::domain::EmployeeId;
use openroster_core::{Contract, HardMediumSoftScore, Roster};

use super::{ConstraintLevel, IncrementalConstraint};

/// A calendar period an employee's minutes are summed over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum PeriodKey {
    Day(NaiveDate),
    Week(i32, u32),
    Month(i32, u32),
    Year(i32),
}

/// The contract maximum applying to one period kind, if any.
fn period_limits(contract: &Contract, date: NaiveDate) -> [(PeriodKey, Option<i64>); 4] {
    let iso = date.iso_week();
    [
        (PeriodKey::Day(date), contract.max_minutes_per_day),
        (
            PeriodKey::Week(iso.year(), iso.week()),
            contract.max_minutes_per_week,
        ),
        (
            PeriodKey::Month(date.year(), date.month()),
            contract.max_minutes_per_month,
        ),
        (PeriodKey::Year(date.year()), contract.max_minutes_per_year),
    ]
}

/// Assigned minutes per employee-period must not exceed the contract
/// maximum for that period.
pub struct ContractMinutesConstraint {
    /// (employee, period) -> assigned minutes.
    usage: HashMap<(EmployeeId, PeriodKey), i64>,
    /// Employee-periods currently over their maximum.
    violations: HashSet<(EmployeeId, PeriodKey)>,
}

impl ContractMinutesConstraint {
    pub fn new() -> Self {
        Self {
            usage: HashMap::new(),
            violations: HashSet::new(),
        }
    }

    /// Recomputes usage from scratch. Shared by the pure evaluation.
    fn full_usage(roster: &Roster) -> HashMap<(EmployeeId, PeriodKey), (i64, i64)> {
        let mut usage: HashMap<(EmployeeId, PeriodKey), (i64, i64)> = HashMap::new();
        for shift in &roster.shifts {
            let Some(employee) = shift.employee else {
                continue;
            };
            let contract = &roster.contracts[roster.employees[employee].contract];
            let minutes = shift.duration_minutes();
            for (key, limit) in period_limits(contract, shift.date()) {
                if let Some(max) = limit {
                    let entry = usage.entry((employee, key)).or_insert((0, max));
                    entry.0 += minutes;
                }
            }
        }
        usage
    }
}

impl Default for ContractMinutesConstraint {
    fn default() -> Self {
        Self::new()
    }
}

impl IncrementalConstraint for ContractMinutesConstraint {
    fn evaluate(&self, roster: &Roster) -> HardMediumSoftScore {
        HardMediumSoftScore::of_hard(-(self.match_count(roster) as i64))
    }

    fn match_count(&self, roster: &Roster) -> usize {
        Self::full_usage(roster)
            .values()
            .filter(|&&(minutes, max)| minutes > max)
            .count()
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
        let contract = &roster.contracts[roster.employees[employee].contract];
        let minutes = shift.duration_minutes();

        let mut delta = 0i64;
        for (key, limit) in period_limits(contract, shift.date()) {
            let Some(max) = limit else {
                continue;
            };
            let entry = self.usage.entry((employee, key)).or_insert(0);
            *entry += minutes;
            // Membership in the violation set is the delta guard, so a
            // period that is over its maximum from the very first shift
            // (a negative maximum) is still counted exactly once.
            if *entry > max && self.violations.insert((employee, key)) {
                delta -= 1;
            }
        }
        HardMediumSoftScore::of_hard(delta)
    }

    fn on_retract(&mut self, roster: &Roster, shift_index: usize) -> HardMediumSoftScore {
        let shift = &roster.shifts[shift_index];
        let Some(employee) = shift.employee else {
            return HardMediumSoftScore::ZERO;
        };
        let contract = &roster.contracts[roster.employees[employee].contract];
        let minutes = shift.duration_minutes();

        let mut delta = 0i64;
        for (key, limit) in period_limits(contract, shift.date()) {
            let Some(max) = limit else {
                continue;
            };
            let Some(entry) = self.usage.get_mut(&(employee, key)) else {
                continue;
            };
            *entry -= minutes;
            let after = *entry;
            if after == 0 {
                self.usage.remove(&(employee, key));
            }
            // Shift durations are positive, so usage 0 means no shifts
            // remain in the period; the full evaluation does not count
            // empty periods even against a negative maximum.
            if (after <= max || after == 0) && self.violations.remove(&(employee, key)) {
                delta += 1;
            }
        }
        HardMediumSoftScore::of_hard(delta)
    }

    fn reset(&mut self) {
        self.usage.clear();
        self.violations.clear();
    }

    fn name(&self) -> &str {
        "Contract minutes exceeded"
    }

    fn level(&self) -> ConstraintLevel {
        ConstraintLevel::Hard
    }
}
