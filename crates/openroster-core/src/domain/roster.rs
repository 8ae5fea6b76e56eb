//! The roster planning solution and its tenant-wide configuration.

use chrono::NaiveDate;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::{Result, RosterError};
use crate::score::HardMediumSoftScore;

use super::{Contract, Employee, EmployeeAvailability, Shift, Skill, Spot};

/// Tenant-wide tunable constraint weights.
///
/// A weight of 0 disables the corresponding constraint's contribution
/// entirely; the constraint body is skipped, not evaluated and zeroed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterParametrization {
    #[serde(rename = "undesiredTimeSlotWeight")]
    pub undesired_time_slot_weight: i64,
    #[serde(rename = "desiredTimeSlotWeight")]
    pub desired_time_slot_weight: i64,
    #[serde(rename = "rotationEmployeeMatchWeight")]
    pub rotation_employee_match_weight: i64,
}

impl Default for RosterParametrization {
    fn default() -> Self {
        Self {
            undesired_time_slot_weight: 100,
            desired_time_slot_weight: 10,
            rotation_employee_match_weight: 500,
        }
    }
}

/// Scheduling-horizon bookkeeping. Read-only input to the optimizer;
/// none of these fields is scored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterState {
    #[serde(rename = "lastHistoricDate")]
    pub last_historic_date: NaiveDate,
    #[serde(rename = "firstDraftDate")]
    pub first_draft_date: NaiveDate,
    #[serde(rename = "draftLength")]
    pub draft_length: u32,
    #[serde(rename = "publishLength")]
    pub publish_length: u32,
    #[serde(rename = "publishNotice")]
    pub publish_notice: u32,
    #[serde(rename = "rotationLength")]
    pub rotation_length: u32,
    #[serde(rename = "unplannedRotationOffset")]
    pub unplanned_rotation_offset: u32,
    pub timezone: Tz,
}

impl Default for RosterState {
    fn default() -> Self {
        Self {
            last_historic_date: NaiveDate::from_ymd_opt(1970, 1, 1).expect("valid epoch date"),
            first_draft_date: NaiveDate::from_ymd_opt(1970, 1, 2).expect("valid epoch date"),
            draft_length: 14,
            publish_length: 7,
            publish_notice: 7,
            rotation_length: 28,
            unplanned_rotation_offset: 0,
            timezone: chrono_tz::UTC,
        }
    }
}

/// The planning solution: all problem facts, the shift list whose
/// `employee` fields are the decision variables, tenant configuration
/// and the resulting score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Roster {
    #[serde(default)]
    pub skills: Vec<Skill>,
    #[serde(default)]
    pub spots: Vec<Spot>,
    #[serde(default)]
    pub contracts: Vec<Contract>,
    #[serde(default)]
    pub employees: Vec<Employee>,
    #[serde(default)]
    pub availabilities: Vec<EmployeeAvailability>,
    #[serde(default)]
    pub shifts: Vec<Shift>,
    pub parametrization: RosterParametrization,
    pub state: RosterState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<HardMediumSoftScore>,
}

impl Roster {
    pub fn new(
        skills: Vec<Skill>,
        spots: Vec<Spot>,
        contracts: Vec<Contract>,
        employees: Vec<Employee>,
        availabilities: Vec<EmployeeAvailability>,
        shifts: Vec<Shift>,
    ) -> Self {
        Self {
            skills,
            spots,
            contracts,
            employees,
            availabilities,
            shifts,
            parametrization: RosterParametrization::default(),
            state: RosterState::default(),
            score: None,
        }
    }

    pub fn with_parametrization(mut self, parametrization: RosterParametrization) -> Self {
        self.parametrization = parametrization;
        self
    }

    pub fn with_state(mut self, state: RosterState) -> Self {
        self.state = state;
        self
    }

    /// Number of shifts whose employee variable is still `None`.
    pub fn unassigned_count(&self) -> usize {
        self.shifts.iter().filter(|s| s.employee.is_none()).count()
    }

    /// Number of shifts with an assigned employee.
    pub fn assigned_count(&self) -> usize {
        self.shifts.len() - self.unassigned_count()
    }

    /// Checks every cross-reference and tunable for consistency.
    ///
    /// Run before search starts: a roster that fails here is a
    /// configuration error and is never partially solved. Each failure
    /// names the offending entity.
    pub fn validate(&self) -> Result<()> {
        let p = &self.parametrization;
        if p.undesired_time_slot_weight < 0
            || p.desired_time_slot_weight < 0
            || p.rotation_employee_match_weight < 0
        {
            return Err(RosterError::Configuration(format!(
                "negative parametrization weight: undesired={} desired={} rotation={}",
                p.undesired_time_slot_weight,
                p.desired_time_slot_weight,
                p.rotation_employee_match_weight
            )));
        }

        for (i, spot) in self.spots.iter().enumerate() {
            for &skill in &spot.required_skills {
                if skill >= self.skills.len() {
                    return Err(RosterError::Configuration(format!(
                        "spot '{}' (index {i}) requires unknown skill index {skill}",
                        spot.name
                    )));
                }
            }
        }

        for (i, employee) in self.employees.iter().enumerate() {
            if employee.contract >= self.contracts.len() {
                return Err(RosterError::Configuration(format!(
                    "employee '{}' (index {i}) references unknown contract index {}",
                    employee.name, employee.contract
                )));
            }
            for &skill in &employee.skills {
                if skill >= self.skills.len() {
                    return Err(RosterError::Configuration(format!(
                        "employee '{}' (index {i}) holds unknown skill index {skill}",
                        employee.name
                    )));
                }
            }
        }

        for (i, availability) in self.availabilities.iter().enumerate() {
            if availability.employee >= self.employees.len() {
                return Err(RosterError::Configuration(format!(
                    "availability {i} references unknown employee index {}",
                    availability.employee
                )));
            }
            if availability.end <= availability.start {
                return Err(RosterError::Configuration(format!(
                    "availability {i} has an inverted interval ({} >= {})",
                    availability.start, availability.end
                )));
            }
        }

        for (i, shift) in self.shifts.iter().enumerate() {
            if shift.spot >= self.spots.len() {
                return Err(RosterError::Configuration(format!(
                    "shift {i} references unknown spot index {}",
                    shift.spot
                )));
            }
            if shift.rotation_employee >= self.employees.len() {
                return Err(RosterError::Configuration(format!(
                    "shift {i} has rotation employee index {} outside the employee list",
                    shift.rotation_employee
                )));
            }
            if let Some(employee) = shift.employee {
                if employee >= self.employees.len() {
                    return Err(RosterError::Configuration(format!(
                        "shift {i} is assigned to unknown employee index {employee}"
                    )));
                }
            }
            if shift.end <= shift.start {
                return Err(RosterError::Configuration(format!(
                    "shift {i} has an inverted interval ({} >= {})",
                    shift.start, shift.end
                )));
            }
        }

        Ok(())
    }
}
