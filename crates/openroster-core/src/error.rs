//! Error types for OpenRoster.

use thiserror::Error;

/// Main error type for OpenRoster operations.
#[derive(Debug, Error)]
pub enum RosterError {
    /// Malformed or inconsistent problem facts. Fatal, reported before
    /// search begins; a roster that fails validation is never partially
    /// solved.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Constraint evaluation produced a value outside its declared
    /// domain (e.g. score accumulator overflow). Aborts the solve.
    #[error("Scoring error: {0}")]
    Scoring(String),

    /// Solve was cancelled before completion.
    #[error("Solve was cancelled")]
    Cancelled,

    /// Invalid operation for the current solver state.
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Internal error (should not occur in normal operation).
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for OpenRoster operations.
pub type Result<T> = std::result::Result<T, RosterError>;
