//! Solver configuration.

use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use openroster_core::{Result, RosterError};

use crate::acceptor::{
    Acceptor, HillClimbingAcceptor, LateAcceptanceAcceptor, SimulatedAnnealingAcceptor,
};
use crate::termination::{
    OrTermination, StepCountTermination, Termination, TimeTermination,
    UnimprovedStepCountTermination,
};

/// Acceptance strategy selection with its parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum AcceptorConfig {
    HillClimbing,
    #[serde(rename_all = "camelCase")]
    SimulatedAnnealing {
        starting_temperature: f64,
        decay_rate: f64,
    },
    #[serde(rename_all = "camelCase")]
    LateAcceptance { size: usize },
}

impl Default for AcceptorConfig {
    fn default() -> Self {
        AcceptorConfig::LateAcceptance { size: 400 }
    }
}

/// Tunables for one solve. Serializable so an orchestrating layer can
/// ship it alongside the roster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SolverConfig {
    pub acceptor: AcceptorConfig,
    /// Wall-clock budget in milliseconds. `None` means unlimited.
    pub time_limit_millis: Option<u64>,
    /// Step budget. `None` means unlimited.
    pub step_limit: Option<u64>,
    /// Patience window: stop after this many steps without a best-score
    /// improvement, once feasible and fully assigned.
    pub unimproved_step_limit: Option<u64>,
    /// Probability that a generated move is a swap instead of a
    /// reassign. Must be within `[0, 1]`.
    pub swap_probability: f64,
    /// Seed for the move selection and acceptance RNG. Equal seeds give
    /// equal runs.
    pub random_seed: u64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            acceptor: AcceptorConfig::default(),
            time_limit_millis: None,
            step_limit: Some(200_000),
            unimproved_step_limit: Some(20_000),
            swap_probability: 0.2,
            random_seed: 0,
        }
    }
}

impl SolverConfig {
    /// Checks the tunables before any search starts.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.swap_probability) {
            return Err(RosterError::Configuration(format!(
                "swap probability {} is outside [0, 1]",
                self.swap_probability
            )));
        }
        if let AcceptorConfig::SimulatedAnnealing {
            starting_temperature,
            decay_rate,
        } = self.acceptor
        {
            if starting_temperature < 0.0 || !starting_temperature.is_finite() {
                return Err(RosterError::Configuration(format!(
                    "starting temperature {starting_temperature} must be finite and non-negative"
                )));
            }
            if !(0.0..=1.0).contains(&decay_rate) {
                return Err(RosterError::Configuration(format!(
                    "decay rate {decay_rate} is outside [0, 1]"
                )));
            }
        }
        if self.time_limit_millis.is_none()
            && self.step_limit.is_none()
            && self.unimproved_step_limit.is_none()
        {
            return Err(RosterError::Configuration(
                "no termination configured: set a time, step or patience limit".to_string(),
            ));
        }
        Ok(())
    }

    pub(crate) fn build_acceptor(&self, rng: ChaCha8Rng) -> Box<dyn Acceptor> {
        match self.acceptor {
            AcceptorConfig::HillClimbing => Box::new(HillClimbingAcceptor::new()),
            AcceptorConfig::SimulatedAnnealing {
                starting_temperature,
                decay_rate,
            } => Box::new(SimulatedAnnealingAcceptor::new(
                starting_temperature,
                decay_rate,
                rng,
            )),
            AcceptorConfig::LateAcceptance { size } => Box::new(LateAcceptanceAcceptor::new(size)),
        }
    }

    pub(crate) fn build_termination(&self) -> Box<dyn Termination> {
        let mut parts: Vec<Box<dyn Termination>> = Vec::new();
        if let Some(millis) = self.time_limit_millis {
            parts.push(Box::new(TimeTermination::millis(millis)));
        }
        if let Some(limit) = self.step_limit {
            parts.push(Box::new(StepCountTermination::new(limit)));
        }
        if let Some(patience) = self.unimproved_step_limit {
            // The feasibility gate keeps the search fighting violations
            // while a time or step budget bounds it. As the sole budget
            // the patience window must fire unconditionally, or an
            // infeasible instance would never terminate.
            let mut patience_term = UnimprovedStepCountTermination::new(patience);
            if self.time_limit_millis.is_some() || self.step_limit.is_some() {
                patience_term = patience_term.feasible_only();
            }
            parts.push(Box::new(patience_term));
        }
        Box::new(OrTermination::new(parts))
    }
}
