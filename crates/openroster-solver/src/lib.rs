//! Local search solver for the OpenRoster engine.
//!
//! The solver walks the shift assignment space with reversible moves
//! ([`moves::Move`]), scored incrementally by the scoring crate. A
//! pluggable [`acceptor::Acceptor`] decides which moves become the new
//! step, [`termination`] budgets bound the search, and the best roster
//! seen is returned when any budget expires. [`manager::SolverManager`]
//! runs solves on background threads with a cancel/status control
//! surface, and [`multi_start`] fans independent seeded solves out
//! across a thread pool.

pub mod acceptor;
pub mod config;
pub mod manager;
pub mod moves;
pub mod multi_start;
pub mod solver;
pub mod termination;

pub use acceptor::{
    Acceptor, HillClimbingAcceptor, LateAcceptanceAcceptor, SimulatedAnnealingAcceptor,
};
pub use config::{AcceptorConfig, SolverConfig};
pub use manager::{SolverJob, SolverManager, SolverStatus};
pub use moves::{Move, MoveSelector};
pub use multi_start::solve_multi_start;
pub use solver::Solver;
pub use termination::{
    OrTermination, SearchScope, StepCountTermination, Termination, TimeTermination,
    UnimprovedStepCountTermination,
};
