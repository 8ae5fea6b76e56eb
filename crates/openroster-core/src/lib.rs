//! Core types for the OpenRoster employee rostering engine.
//!
//! This crate holds the immutable problem facts (employees, spots,
//! skills, contracts, availabilities), the one mutable planning entity
//! ([`domain::Shift`], whose `employee` field is the decision variable),
//! the planning solution aggregate ([`domain::Roster`]) and the
//! three-level [`score::HardMediumSoftScore`] that the scoring and
//! solver crates optimize.

pub mod domain;
pub mod error;
pub mod score;

pub use domain::{
    AvailabilityState, Contract, Employee, EmployeeAvailability, Roster, RosterParametrization,
    RosterState, Shift, Skill, Spot,
};
pub use error::{Result, RosterError};
pub use score::HardMediumSoftScore;
