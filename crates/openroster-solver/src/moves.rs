//! Moves over the shift assignment variable.
//!
//! A move mutates `Shift::employee` through the score director's
//! retract/insert protocol so the cached score stays exact. Applying a
//! move returns its inverse; applying the inverse restores both the
//! roster and the score.

use openroster_core::domain::EmployeeId;
use openroster_core::{Result, Roster};
use openroster_scoring::ScoreDirector;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

/// A reversible change to the shift assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Move {
    /// Assign (or unassign) one shift.
    Reassign {
        shift: usize,
        employee: Option<EmployeeId>,
    },
    /// Exchange the employees of two shifts.
    Swap { a: usize, b: usize },
}

impl Move {
    /// Returns true if the move is in range and is not a no-op.
    ///
    /// Stale or pointless moves are filtered here and regenerated by
    /// the caller rather than applied or reported.
    pub fn is_doable(&self, roster: &Roster) -> bool {
        match *self {
            Move::Reassign { shift, employee } => {
                if shift >= roster.shifts.len() {
                    return false;
                }
                if let Some(e) = employee {
                    if e >= roster.employees.len() {
                        return false;
                    }
                }
                roster.shifts[shift].employee != employee
            }
            Move::Swap { a, b } => {
                if a == b || a >= roster.shifts.len() || b >= roster.shifts.len() {
                    return false;
                }
                roster.shifts[a].employee != roster.shifts[b].employee
            }
        }
    }

    /// Applies the move through the director and returns the inverse.
    pub fn apply(&self, director: &mut ScoreDirector) -> Result<Move> {
        match *self {
            Move::Reassign { shift, employee } => {
                let previous = director.roster().shifts[shift].employee;
                director.do_change(shift, |roster| {
                    roster.shifts[shift].employee = employee;
                })?;
                Ok(Move::Reassign {
                    shift,
                    employee: previous,
                })
            }
            Move::Swap { a, b } => {
                director.before_variable_changed(a)?;
                director.before_variable_changed(b)?;
                let roster = director.roster_mut();
                let held = roster.shifts[a].employee;
                roster.shifts[a].employee = roster.shifts[b].employee;
                roster.shifts[b].employee = held;
                director.after_variable_changed(a)?;
                director.after_variable_changed(b)?;
                // A swap is its own inverse.
                Ok(*self)
            }
        }
    }
}

/// Random move stream over reassigns and swaps.
///
/// Candidates are drawn uniformly and may be undoable (no-ops, stale
/// indices); the search loop filters those out and draws again.
pub struct MoveSelector {
    rng: ChaCha8Rng,
    swap_probability: f64,
}

impl MoveSelector {
    pub fn new(rng: ChaCha8Rng, swap_probability: f64) -> Self {
        Self {
            rng,
            swap_probability,
        }
    }

    /// Draws the next candidate move. Returns `None` when the roster
    /// has no shifts to move.
    pub fn next_candidate(&mut self, roster: &Roster) -> Option<Move> {
        let shift_count = roster.shifts.len();
        if shift_count == 0 || roster.employees.is_empty() {
            return None;
        }
        if shift_count >= 2 && self.rng.random_bool(self.swap_probability) {
            let a = self.rng.random_range(0..shift_count);
            let b = self.rng.random_range(0..shift_count);
            return Some(Move::Swap { a, b });
        }
        let shift = self.rng.random_range(0..shift_count);
        // One extra slot in the range stands for "unassign".
        let pick = self.rng.random_range(0..=roster.employees.len());
        let employee = if pick == roster.employees.len() {
            None
        } else {
            Some(pick)
        };
        Some(Move::Reassign { shift, employee })
    }
}
