//! Termination conditions for the search loop.

use std::time::{Duration, Instant};

use openroster_core::HardMediumSoftScore;

/// Progress snapshot the terminations are evaluated against, updated by
/// the search loop once per step.
#[derive(Debug, Clone, Copy)]
pub struct SearchScope {
    pub started_at: Instant,
    pub step_count: u64,
    pub best_score: HardMediumSoftScore,
    pub steps_since_improvement: u64,
}

impl SearchScope {
    pub fn new(best_score: HardMediumSoftScore) -> Self {
        Self {
            started_at: Instant::now(),
            step_count: 0,
            best_score,
            steps_since_improvement: 0,
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.started_at.elapsed()
    }
}

/// Decides when solving should stop.
pub trait Termination: Send {
    fn is_terminated(&self, scope: &SearchScope) -> bool;
}

/// Terminates after a wall-clock time limit.
#[derive(Debug, Clone)]
pub struct TimeTermination {
    limit: Duration,
}

impl TimeTermination {
    pub fn new(limit: Duration) -> Self {
        Self { limit }
    }

    pub fn millis(ms: u64) -> Self {
        Self::new(Duration::from_millis(ms))
    }

    pub fn seconds(secs: u64) -> Self {
        Self::new(Duration::from_secs(secs))
    }
}

impl Termination for TimeTermination {
    fn is_terminated(&self, scope: &SearchScope) -> bool {
        scope.elapsed() >= self.limit
    }
}

/// Terminates after a fixed number of steps.
#[derive(Debug, Clone)]
pub struct StepCountTermination {
    limit: u64,
}

impl StepCountTermination {
    pub fn new(limit: u64) -> Self {
        Self { limit }
    }
}

impl Termination for StepCountTermination {
    fn is_terminated(&self, scope: &SearchScope) -> bool {
        scope.step_count >= self.limit
    }
}

/// Terminates once the best score has not improved for a patience
/// window of steps.
///
/// With `feasible_only` set, the window only counts when the best
/// roster is already feasible and fully assigned (hard and medium both
/// zero), so the search keeps fighting violations until the budget
/// runs out.
#[derive(Debug, Clone)]
pub struct UnimprovedStepCountTermination {
    patience: u64,
    feasible_only: bool,
}

impl UnimprovedStepCountTermination {
    pub fn new(patience: u64) -> Self {
        Self {
            patience,
            feasible_only: false,
        }
    }

    pub fn feasible_only(mut self) -> Self {
        self.feasible_only = true;
        self
    }
}

impl Termination for UnimprovedStepCountTermination {
    fn is_terminated(&self, scope: &SearchScope) -> bool {
        if scope.steps_since_improvement < self.patience {
            return false;
        }
        if self.feasible_only {
            return scope.best_score.hard() == 0 && scope.best_score.medium() == 0;
        }
        true
    }
}

/// Terminates when any inner termination does.
pub struct OrTermination {
    inner: Vec<Box<dyn Termination>>,
}

impl OrTermination {
    pub fn new(inner: Vec<Box<dyn Termination>>) -> Self {
        Self { inner }
    }
}

impl Termination for OrTermination {
    fn is_terminated(&self, scope: &SearchScope) -> bool {
        self.inner.iter().any(|t| t.is_terminated(scope))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scope_with(step_count: u64, unimproved: u64, score: HardMediumSoftScore) -> SearchScope {
        SearchScope {
            started_at: Instant::now(),
            step_count,
            best_score: score,
            steps_since_improvement: unimproved,
        }
    }

    #[test]
    fn step_count_termination_fires_at_limit() {
        let term = StepCountTermination::new(100);
        assert!(!term.is_terminated(&scope_with(99, 0, HardMediumSoftScore::ZERO)));
        assert!(term.is_terminated(&scope_with(100, 0, HardMediumSoftScore::ZERO)));
    }

    #[test]
    fn time_termination_with_zero_limit_fires_immediately() {
        let term = TimeTermination::millis(0);
        assert!(term.is_terminated(&scope_with(0, 0, HardMediumSoftScore::ZERO)));
    }

    #[test]
    fn unimproved_termination_respects_patience() {
        let term = UnimprovedStepCountTermination::new(50);
        assert!(!term.is_terminated(&scope_with(1000, 49, HardMediumSoftScore::ZERO)));
        assert!(term.is_terminated(&scope_with(1000, 50, HardMediumSoftScore::ZERO)));
    }

    #[test]
    fn feasible_only_gate_keeps_searching_while_infeasible() {
        let term = UnimprovedStepCountTermination::new(50).feasible_only();
        let infeasible = HardMediumSoftScore::of_hard(-10);
        let unassigned = HardMediumSoftScore::of_medium(-1);
        let feasible = HardMediumSoftScore::of_soft(-300);
        assert!(!term.is_terminated(&scope_with(0, 500, infeasible)));
        assert!(!term.is_terminated(&scope_with(0, 500, unassigned)));
        assert!(term.is_terminated(&scope_with(0, 500, feasible)));
    }

    #[test]
    fn or_termination_fires_on_any_member() {
        let term = OrTermination::new(vec![
            Box::new(StepCountTermination::new(10)),
            Box::new(UnimprovedStepCountTermination::new(5)),
        ]);
        assert!(!term.is_terminated(&scope_with(3, 2, HardMediumSoftScore::ZERO)));
        assert!(term.is_terminated(&scope_with(3, 5, HardMediumSoftScore::ZERO)));
        assert!(term.is_terminated(&scope_with(10, 0, HardMediumSoftScore::ZERO)));
    }
}
