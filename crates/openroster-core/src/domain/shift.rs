//! The shift planning entity.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::{EmployeeId, SpotId};

/// A time-boxed unit of work on a spot. The sole planning entity:
/// `employee` is the decision variable (`None` means unassigned) and is
/// mutated exclusively by the solver's moves. `rotation_employee` is
/// the standing default assignment and is never changed by the solver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shift {
    pub spot: SpotId,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    #[serde(rename = "rotationEmployee")]
    pub rotation_employee: EmployeeId,
    pub employee: Option<EmployeeId>,
}

impl Shift {
    pub fn new(
        spot: SpotId,
        start: NaiveDateTime,
        end: NaiveDateTime,
        rotation_employee: EmployeeId,
    ) -> Self {
        Self {
            spot,
            start,
            end,
            rotation_employee,
            employee: None,
        }
    }

    pub fn with_employee(mut self, employee: EmployeeId) -> Self {
        self.employee = Some(employee);
        self
    }

    /// Returns the calendar date of the shift start.
    #[inline]
    pub fn date(&self) -> NaiveDate {
        self.start.date()
    }

    /// Returns the shift length in minutes.
    #[inline]
    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }

    /// Half-open interval intersection with `[start, end)`.
    #[inline]
    pub fn overlaps(&self, start: NaiveDateTime, end: NaiveDateTime) -> bool {
        self.start < end && start < self.end
    }
}
