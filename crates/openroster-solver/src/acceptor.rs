//! Acceptance strategies for local search.
//!
//! An acceptor decides whether a candidate move's score is taken as the
//! new step score. All strategies accept improvement; they differ in
//! how they escape local optima.

use openroster_core::HardMediumSoftScore;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

/// Decides move acceptance from the last step score and the candidate
/// move score.
pub trait Acceptor: Send {
    /// Returns true if a move resulting in `move_score` should be
    /// accepted, given the previous step's score.
    fn is_accepted(
        &mut self,
        last_step_score: HardMediumSoftScore,
        move_score: HardMediumSoftScore,
    ) -> bool;

    /// Called once when the search phase starts.
    fn phase_started(&mut self, _initial_score: HardMediumSoftScore) {}

    /// Called after every step with the accepted step score.
    fn step_ended(&mut self, _step_score: HardMediumSoftScore) {}
}

/// Accepts only moves that do not worsen the score.
#[derive(Debug, Default, Clone)]
pub struct HillClimbingAcceptor;

impl HillClimbingAcceptor {
    pub fn new() -> Self {
        Self
    }
}

impl Acceptor for HillClimbingAcceptor {
    fn is_accepted(
        &mut self,
        last_step_score: HardMediumSoftScore,
        move_score: HardMediumSoftScore,
    ) -> bool {
        move_score >= last_step_score
    }
}

/// Flattens the three score levels into one scalar for the annealing
/// probability. Level gaps keep the ordering lexicographic for any
/// realistic per-move delta.
fn scalar_worsening(last: HardMediumSoftScore, candidate: HardMediumSoftScore) -> f64 {
    let dh = (last.hard() - candidate.hard()) as f64;
    let dm = (last.medium() - candidate.medium()) as f64;
    let ds = (last.soft() - candidate.soft()) as f64;
    dh * 1_000_000.0 + dm * 1_000.0 + ds
}

/// Accepts worsening moves with probability `exp(-delta / temperature)`,
/// cooling multiplicatively every step.
pub struct SimulatedAnnealingAcceptor {
    starting_temperature: f64,
    current_temperature: f64,
    decay_rate: f64,
    rng: ChaCha8Rng,
}

impl SimulatedAnnealingAcceptor {
    /// `starting_temperature` is in flattened score units; `decay_rate`
    /// is the multiplicative cooling factor per step (e.g. 0.9999).
    pub fn new(starting_temperature: f64, decay_rate: f64, rng: ChaCha8Rng) -> Self {
        Self {
            starting_temperature,
            current_temperature: starting_temperature,
            decay_rate,
            rng,
        }
    }
}

impl Acceptor for SimulatedAnnealingAcceptor {
    fn is_accepted(
        &mut self,
        last_step_score: HardMediumSoftScore,
        move_score: HardMediumSoftScore,
    ) -> bool {
        if move_score >= last_step_score {
            return true;
        }
        if self.current_temperature <= f64::EPSILON {
            return false;
        }
        let delta = scalar_worsening(last_step_score, move_score);
        let probability = (-delta / self.current_temperature).exp();
        self.rng.random::<f64>() < probability
    }

    fn phase_started(&mut self, _initial_score: HardMediumSoftScore) {
        self.current_temperature = self.starting_temperature;
    }

    fn step_ended(&mut self, _step_score: HardMediumSoftScore) {
        self.current_temperature *= self.decay_rate;
    }
}

/// Accepts moves that beat the step score recorded `size` steps ago,
/// or the last step score itself.
pub struct LateAcceptanceAcceptor {
    history: Vec<Option<HardMediumSoftScore>>,
    cursor: usize,
}

impl LateAcceptanceAcceptor {
    pub fn new(size: usize) -> Self {
        Self {
            history: vec![None; size.max(1)],
            cursor: 0,
        }
    }
}

impl Acceptor for LateAcceptanceAcceptor {
    fn is_accepted(
        &mut self,
        last_step_score: HardMediumSoftScore,
        move_score: HardMediumSoftScore,
    ) -> bool {
        match self.history[self.cursor] {
            Some(late_score) => move_score >= late_score || move_score >= last_step_score,
            None => true,
        }
    }

    fn phase_started(&mut self, initial_score: HardMediumSoftScore) {
        self.history.fill(Some(initial_score));
        self.cursor = 0;
    }

    fn step_ended(&mut self, step_score: HardMediumSoftScore) {
        self.history[self.cursor] = Some(step_score);
        self.cursor = (self.cursor + 1) % self.history.len();
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;

    use super::*;

    fn score(hard: i64, medium: i64, soft: i64) -> HardMediumSoftScore {
        HardMediumSoftScore::of(hard, medium, soft)
    }

    #[test]
    fn hill_climbing_accepts_equal_or_better() {
        let mut acceptor = HillClimbingAcceptor::new();
        let last = score(-1, 0, -5);
        assert!(acceptor.is_accepted(last, score(-1, 0, -4)));
        assert!(acceptor.is_accepted(last, last));
        assert!(acceptor.is_accepted(last, score(0, 0, -50)));
        assert!(!acceptor.is_accepted(last, score(-1, 0, -6)));
        assert!(!acceptor.is_accepted(last, score(-2, 0, 0)));
    }

    #[test]
    fn annealing_always_accepts_improvement() {
        let rng = ChaCha8Rng::seed_from_u64(3);
        let mut acceptor = SimulatedAnnealingAcceptor::new(0.0, 0.5, rng);
        acceptor.phase_started(score(-5, 0, 0));
        assert!(acceptor.is_accepted(score(-5, 0, 0), score(-4, 0, 0)));
        // Zero temperature never accepts worsening.
        assert!(!acceptor.is_accepted(score(-5, 0, 0), score(-6, 0, 0)));
    }

    #[test]
    fn annealing_accepts_small_worsening_while_hot() {
        let rng = ChaCha8Rng::seed_from_u64(3);
        let mut acceptor = SimulatedAnnealingAcceptor::new(1_000_000.0, 0.99, rng);
        acceptor.phase_started(score(0, 0, 0));
        let mut accepted = 0;
        for _ in 0..100 {
            if acceptor.is_accepted(score(0, 0, 0), score(0, 0, -1)) {
                accepted += 1;
            }
        }
        assert!(accepted > 50, "hot acceptor accepted only {accepted}/100");
    }

    #[test]
    fn annealing_cools_down() {
        let rng = ChaCha8Rng::seed_from_u64(3);
        let mut acceptor = SimulatedAnnealingAcceptor::new(100.0, 0.5, rng);
        acceptor.phase_started(score(0, 0, 0));
        for _ in 0..200 {
            acceptor.step_ended(score(0, 0, 0));
        }
        // Temperature has decayed to effectively zero.
        assert!(!acceptor.is_accepted(score(0, 0, 0), score(-1, 0, 0)));
    }

    #[test]
    fn late_acceptance_compares_against_history() {
        let mut acceptor = LateAcceptanceAcceptor::new(2);
        acceptor.phase_started(score(0, 0, -10));

        // Worse than both history and last step: rejected.
        assert!(!acceptor.is_accepted(score(0, 0, -10), score(0, 0, -20)));
        // Better than the score two steps back: accepted even though it
        // worsens the last step.
        acceptor.step_ended(score(0, 0, -30));
        acceptor.step_ended(score(0, 0, -30));
        assert!(acceptor.is_accepted(score(0, 0, -5), score(0, 0, -8)));
    }
}
