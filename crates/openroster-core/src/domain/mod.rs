//! Domain model for employee rostering.
//!
//! All relations are index-based: a [`Shift`] stores the index of its
//! spot and employee inside the owning [`Roster`]'s fact lists, never an
//! owning reference. Problem facts are constructed once from external
//! input and stay immutable for the duration of a solve; the only field
//! mutated during search is [`Shift::employee`].

mod roster;
mod shift;

pub use roster::{Roster, RosterParametrization, RosterState};
pub use shift::Shift;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Index of an [`Employee`] in `Roster::employees`.
pub type EmployeeId = usize;
/// Index of a [`Skill`] in `Roster::skills`.
pub type SkillId = usize;
/// Index of a [`Spot`] in `Roster::spots`.
pub type SpotId = usize;
/// Index of a [`Contract`] in `Roster::contracts`.
pub type ContractId = usize;

/// A named capability an employee can hold and a spot can require.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Skill {
    pub name: String,
}

impl Skill {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// A work station or role with a set of required skills.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Spot {
    pub name: String,
    #[serde(rename = "requiredSkills", default)]
    pub required_skills: Vec<SkillId>,
}

impl Spot {
    pub fn new(name: impl Into<String>, required_skills: Vec<SkillId>) -> Self {
        Self {
            name: name.into(),
            required_skills,
        }
    }
}

/// Per-employee working-time limits. Each maximum is optional; a `None`
/// period is unconstrained.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contract {
    pub name: String,
    #[serde(rename = "maximumMinutesPerDay")]
    pub max_minutes_per_day: Option<i64>,
    #[serde(rename = "maximumMinutesPerWeek")]
    pub max_minutes_per_week: Option<i64>,
    #[serde(rename = "maximumMinutesPerMonth")]
    pub max_minutes_per_month: Option<i64>,
    #[serde(rename = "maximumMinutesPerYear")]
    pub max_minutes_per_year: Option<i64>,
}

impl Contract {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_max_minutes_per_day(mut self, minutes: i64) -> Self {
        self.max_minutes_per_day = Some(minutes);
        self
    }

    pub fn with_max_minutes_per_week(mut self, minutes: i64) -> Self {
        self.max_minutes_per_week = Some(minutes);
        self
    }

    pub fn with_max_minutes_per_month(mut self, minutes: i64) -> Self {
        self.max_minutes_per_month = Some(minutes);
        self
    }

    pub fn with_max_minutes_per_year(mut self, minutes: i64) -> Self {
        self.max_minutes_per_year = Some(minutes);
        self
    }
}

/// An employee who can be assigned to shifts. Immutable problem fact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    pub name: String,
    pub contract: ContractId,
    #[serde(default)]
    pub skills: Vec<SkillId>,
}

impl Employee {
    pub fn new(name: impl Into<String>, contract: ContractId) -> Self {
        Self {
            name: name.into(),
            contract,
            skills: Vec::new(),
        }
    }

    pub fn with_skills(mut self, skills: impl IntoIterator<Item = SkillId>) -> Self {
        self.skills.extend(skills);
        self
    }

    /// Returns true if this employee holds every skill in `required`.
    pub fn has_all_skills(&self, required: &[SkillId]) -> bool {
        required.iter().all(|s| self.skills.contains(s))
    }
}

/// How an employee relates to a time slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AvailabilityState {
    /// Assigning a shift intersecting this slot violates a hard rule.
    Unavailable,
    /// Assigning a shift intersecting this slot is penalized softly.
    Undesired,
    /// Assigning a shift intersecting this slot is rewarded softly.
    Desired,
}

/// A time slot during which an employee is unavailable, would rather
/// not work, or would like to work. Immutable problem fact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeAvailability {
    pub employee: EmployeeId,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub state: AvailabilityState,
}

impl EmployeeAvailability {
    pub fn new(
        employee: EmployeeId,
        start: NaiveDateTime,
        end: NaiveDateTime,
        state: AvailabilityState,
    ) -> Self {
        Self {
            employee,
            start,
            end,
            state,
        }
    }

    /// Half-open interval intersection: `[s1, e1)` meets `[s2, e2)`
    /// iff `s1 < e2 && s2 < e1`.
    #[inline]
    pub fn intersects(&self, start: NaiveDateTime, end: NaiveDateTime) -> bool {
        self.start < end && start < self.end
    }
}

#[cfg(test)]
mod tests;
