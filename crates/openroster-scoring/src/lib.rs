//! Incremental constraint scoring for the OpenRoster engine.
//!
//! The constraint library maps subsets of a roster's facts and shifts
//! to weighted contributions on one of three severity levels (hard,
//! medium, soft). Every constraint supports a pure full evaluation and
//! an incremental retract/insert protocol keyed on the changed shift,
//! so the [`ScoreDirector`] can keep a cached score in sync with
//! single-shift moves without rescoring the whole roster.

pub mod constraint;
pub mod director;

pub use constraint::{
    ConstraintLevel, ConstraintResult, IncrementalConstraint, RosterConstraints,
};
pub use director::ScoreDirector;
