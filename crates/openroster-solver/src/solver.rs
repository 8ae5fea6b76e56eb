//! The local search driver.
//!
//! Owns one score director for the duration of a solve and walks the
//! assignment space move by move: select, apply, accept or undo, track
//! the best roster seen. Terminations and cancellation are checked
//! between steps, never mid-evaluation, so a solve always ends on a
//! consistent roster.

use std::sync::atomic::{AtomicBool, Ordering};

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info};

use openroster_core::{Result, Roster};
use openroster_scoring::ScoreDirector;

use crate::config::SolverConfig;
use crate::moves::MoveSelector;
use crate::termination::SearchScope;

/// Candidate draws per step before the step is abandoned. Undoable
/// candidates (stale indices, no-ops) are discarded and redrawn within
/// this budget.
const MAX_CANDIDATE_ATTEMPTS: u32 = 64;

/// How often the search loop emits a progress line.
const PROGRESS_LOG_INTERVAL: u64 = 10_000;

/// Single-threaded local search solver.
pub struct Solver {
    config: SolverConfig,
}

impl Solver {
    /// Creates a solver, rejecting invalid tunables up front.
    pub fn new(config: SolverConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Solves to completion and returns the best roster found, with its
    /// score attached. Budget expiry is not an error: the result may
    /// still be infeasible and the caller checks `hard == 0`.
    pub fn solve(&self, roster: Roster) -> Result<Roster> {
        let cancel = AtomicBool::new(false);
        self.solve_with_control(roster, &cancel, |_| {})
    }

    /// Solve variant with an external cancellation flag and a callback
    /// invoked with every new best roster. Cancellation is honored
    /// between steps and yields the best roster found so far.
    pub fn solve_with_control<F>(
        &self,
        roster: Roster,
        cancel: &AtomicBool,
        mut on_best: F,
    ) -> Result<Roster>
    where
        F: FnMut(&Roster),
    {
        let mut director = ScoreDirector::new(roster)?;
        director.calculate_score();

        info!(
            shifts = director.roster().shifts.len(),
            employees = director.roster().employees.len(),
            score = %director.get_score(),
            "solve started"
        );

        self.seed_rotation_defaults(&mut director)?;

        let mut best_score = director.get_score();
        let mut best_roster = director.clone_roster();
        on_best(&best_roster);

        let seed = self.config.random_seed;
        let mut selector = MoveSelector::new(
            ChaCha8Rng::seed_from_u64(seed),
            self.config.swap_probability,
        );
        let mut acceptor = self
            .config
            .build_acceptor(ChaCha8Rng::seed_from_u64(seed.wrapping_add(1)));
        let termination = self.config.build_termination();

        acceptor.phase_started(best_score);
        let mut scope = SearchScope::new(best_score);
        let mut last_step_score = best_score;

        while !termination.is_terminated(&scope) {
            if cancel.load(Ordering::Relaxed) {
                info!(steps = scope.step_count, "solve cancelled");
                break;
            }

            let Some(mv) = self.next_doable_move(&mut selector, director.roster()) else {
                debug!(
                    steps = scope.step_count,
                    "no doable move found, ending search"
                );
                break;
            };

            let inverse = mv.apply(&mut director)?;
            let move_score = director.get_score();

            if acceptor.is_accepted(last_step_score, move_score) {
                last_step_score = move_score;
                if move_score > best_score {
                    best_score = move_score;
                    best_roster = director.clone_roster();
                    scope.steps_since_improvement = 0;
                    scope.best_score = best_score;
                    debug!(step = scope.step_count, score = %best_score, "new best");
                    on_best(&best_roster);
                } else {
                    scope.steps_since_improvement += 1;
                }
            } else {
                inverse.apply(&mut director)?;
                scope.steps_since_improvement += 1;
            }
            acceptor.step_ended(last_step_score);
            scope.step_count += 1;

            if scope.step_count % PROGRESS_LOG_INTERVAL == 0 {
                debug!(
                    step = scope.step_count,
                    current = %last_step_score,
                    best = %best_score,
                    "search progress"
                );
            }
        }

        info!(
            steps = scope.step_count,
            best = %best_score,
            feasible = best_score.is_feasible(),
            "solve finished"
        );
        Ok(best_roster)
    }

    /// Assigns each open shift to its rotation employee when doing so
    /// does not worsen the hard score, and rolls the assignment back
    /// otherwise.
    fn seed_rotation_defaults(&self, director: &mut ScoreDirector) -> Result<()> {
        let mut seeded = 0usize;
        for shift_index in 0..director.roster().shifts.len() {
            let shift = &director.roster().shifts[shift_index];
            if shift.employee.is_some() {
                continue;
            }
            let rotation_employee = shift.rotation_employee;
            let before_hard = director.get_score().hard();
            let after = director.do_change(shift_index, |roster| {
                roster.shifts[shift_index].employee = Some(rotation_employee);
            })?;
            if after.hard() < before_hard {
                director.do_change(shift_index, |roster| {
                    roster.shifts[shift_index].employee = None;
                })?;
            } else {
                seeded += 1;
            }
        }
        debug!(seeded, score = %director.get_score(), "rotation defaults seeded");
        Ok(())
    }

    fn next_doable_move(
        &self,
        selector: &mut MoveSelector,
        roster: &Roster,
    ) -> Option<crate::moves::Move> {
        for _ in 0..MAX_CANDIDATE_ATTEMPTS {
            let candidate = selector.next_candidate(roster)?;
            if candidate.is_doable(roster) {
                return Some(candidate);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, NaiveDateTime};

    use openroster_core::{
        AvailabilityState, Contract, Employee, EmployeeAvailability, Roster, RosterError, Shift,
        Skill, Spot,
    };

    use crate::config::AcceptorConfig;

    use super::*;

    fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    }

    fn dt(day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    /// Two interchangeable employees, one shift per day for four days.
    /// Trivially feasible.
    fn feasible_roster() -> Roster {
        let skills = vec![Skill::new("Till")];
        let spots = vec![Spot::new("Shop", vec![0])];
        let contracts = vec![Contract::new("Standard")];
        let employees = vec![
            Employee::new("Ann", 0).with_skills([0]),
            Employee::new("Ben", 0).with_skills([0]),
        ];
        let shifts = (1..=4)
            .map(|day| Shift::new(0, dt(day, 9), dt(day, 17), (day as usize) % 2))
            .collect();
        Roster::new(skills, spots, contracts, employees, Vec::new(), shifts)
    }

    fn quick_config() -> SolverConfig {
        SolverConfig {
            acceptor: AcceptorConfig::HillClimbing,
            time_limit_millis: None,
            step_limit: Some(5_000),
            unimproved_step_limit: Some(500),
            swap_probability: 0.2,
            random_seed: 1,
        }
    }

    #[test]
    fn solves_small_instance_to_feasibility() {
        init_tracing();
        let solver = Solver::new(quick_config()).unwrap();
        let solved = solver.solve(feasible_roster()).unwrap();

        let score = solved.score.unwrap();
        assert_eq!(score.hard(), 0, "expected feasible, got {score}");
        assert_eq!(score.medium(), 0, "expected all assigned, got {score}");
        assert_eq!(solved.unassigned_count(), 0);
    }

    #[test]
    fn equal_seeds_give_equal_results() {
        let solver = Solver::new(quick_config()).unwrap();
        let first = solver.solve(feasible_roster()).unwrap();
        let second = solver.solve(feasible_roster()).unwrap();
        assert_eq!(first.score, second.score);
        assert_eq!(first.shifts, second.shifts);
    }

    #[test]
    fn budget_expiry_yields_best_even_if_infeasible() {
        // The only employee lacks the required skill; no assignment is
        // ever feasible, but the solve still returns a scored roster.
        let roster = Roster::new(
            vec![Skill::new("Pilot")],
            vec![Spot::new("Cockpit", vec![0])],
            vec![Contract::new("Standard")],
            vec![Employee::new("Ann", 0)],
            Vec::new(),
            vec![Shift::new(0, dt(1, 9), dt(1, 17), 0)],
        );
        let solver = Solver::new(SolverConfig {
            step_limit: Some(50),
            unimproved_step_limit: None,
            ..quick_config()
        })
        .unwrap();
        let solved = solver.solve(roster).unwrap();
        assert!(solved.score.is_some());
    }

    #[test]
    fn patience_only_budget_terminates_on_infeasible_instance() {
        // The only employee lacks the required skill, so the best
        // roster keeps an open shift and never reaches medium 0. The
        // patience window must still end the search on its own.
        let roster = Roster::new(
            vec![Skill::new("Pilot")],
            vec![Spot::new("Cockpit", vec![0])],
            vec![Contract::new("Standard")],
            vec![Employee::new("Ann", 0)],
            Vec::new(),
            vec![Shift::new(0, dt(1, 9), dt(1, 17), 0)],
        );
        let solver = Solver::new(SolverConfig {
            time_limit_millis: None,
            step_limit: None,
            unimproved_step_limit: Some(200),
            ..quick_config()
        })
        .unwrap();
        let solved = solver.solve(roster).unwrap();
        let score = solved.score.unwrap();
        assert_eq!(score.hard(), 0);
        assert_eq!(score.medium(), -1);
    }

    #[test]
    fn invalid_roster_fails_before_search() {
        let mut roster = feasible_roster();
        roster.shifts[0].rotation_employee = 42;
        let solver = Solver::new(quick_config()).unwrap();
        assert!(matches!(
            solver.solve(roster),
            Err(RosterError::Configuration(_))
        ));
    }

    #[test]
    fn cancellation_returns_best_so_far() {
        let solver = Solver::new(SolverConfig {
            step_limit: None,
            unimproved_step_limit: None,
            time_limit_millis: Some(60_000),
            ..quick_config()
        })
        .unwrap();
        let cancel = AtomicBool::new(true);
        let solved = solver
            .solve_with_control(feasible_roster(), &cancel, |_| {})
            .unwrap();
        // Cancelled before the first step: the rotation-seeded roster
        // comes back with its score.
        assert!(solved.score.is_some());
        assert_eq!(solved.unassigned_count(), 0);
    }

    #[test]
    fn rotation_seeding_skips_hard_violations() {
        // Ann is unavailable on day 1, so the day-1 shift must stay
        // open after seeding while the day-2 shift gets assigned.
        let roster = Roster::new(
            vec![Skill::new("Till")],
            vec![Spot::new("Shop", vec![0])],
            vec![Contract::new("Standard")],
            vec![Employee::new("Ann", 0).with_skills([0])],
            vec![EmployeeAvailability::new(
                0,
                dt(1, 0),
                dt(2, 0),
                AvailabilityState::Unavailable,
            )],
            vec![
                Shift::new(0, dt(1, 9), dt(1, 17), 0),
                Shift::new(0, dt(2, 9), dt(2, 17), 0),
            ],
        );
        let solver = Solver::new(SolverConfig {
            step_limit: Some(0),
            unimproved_step_limit: None,
            ..quick_config()
        })
        .unwrap();
        let solved = solver.solve(roster).unwrap();
        assert_eq!(solved.shifts[0].employee, None);
        assert_eq!(solved.shifts[1].employee, Some(0));
    }

    #[test]
    fn annealing_also_reaches_feasibility() {
        let solver = Solver::new(SolverConfig {
            acceptor: AcceptorConfig::SimulatedAnnealing {
                starting_temperature: 1_000.0,
                decay_rate: 0.995,
            },
            step_limit: Some(20_000),
            ..quick_config()
        })
        .unwrap();
        let solved = solver.solve(feasible_roster()).unwrap();
        assert_eq!(solved.score.unwrap().hard(), 0);
    }
}
