//! Racing whole solves from different starting corners.

use super::config::RaceConfig;
use super::phase::{build_pool, install};
use crate::basis::Corner;
use crate::error::{Result, TransportError};
use crate::model::{SolveStatus, TransportProblem, TransportSolution};
use crate::modi::Solver;
use rayon::prelude::*;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{info, instrument};

/// How one racer finished.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RaceReport {
    pub corner: Corner,
    pub status: SolveStatus,
    pub iterations: usize,
    pub total_cost: i64,
}

/// Outcome of a race.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RaceResult {
    /// The winner's solution, or the best partial one when no racer won.
    pub solution: TransportSolution,

    /// Corner of the first racer to prove optimality. `None` when the
    /// caller cancelled the race before any racer finished.
    pub winner: Option<Corner>,

    /// One report per racer, in configuration order.
    pub reports: Vec<RaceReport>,
}

/// Runs one independent [`Solver`] per corner on a shared pool.
///
/// Every racer owns its allocation; the only shared mutable value is the
/// cancellation flag. The first racer to reach optimality raises it and the
/// others stop at their next iteration.
///
/// # Usage
///
/// ```
/// use u_transport::model::TransportProblem;
/// use u_transport::parallel::{RaceConfig, RaceRunner};
///
/// let problem = TransportProblem::new(
///     vec![vec![8, 2, 6], vec![10, 9, 9], vec![7, 10, 7]],
///     vec![100, 120, 80],
///     vec![100, 100, 100],
/// )
/// .unwrap();
/// let result = RaceRunner::run(&problem, &RaceConfig::default()).unwrap();
/// assert!(result.winner.is_some());
/// assert_eq!(result.solution.total_cost, 1860);
/// ```
pub struct RaceRunner;

impl RaceRunner {
    /// Races all configured corners to the first optimal solution.
    pub fn run(problem: &TransportProblem, config: &RaceConfig) -> Result<RaceResult> {
        Self::run_with_cancel(problem, config, None)
    }

    /// Races with a caller-supplied flag.
    ///
    /// The flag doubles as the race's own stop signal: it is `true` after
    /// the race whenever some racer won. Setting it externally stops every
    /// racer; the result then has no winner.
    #[instrument(
        level = "info",
        skip_all,
        fields(rows = problem.rows(), cols = problem.cols(), racers = config.corners.len())
    )]
    pub fn run_with_cancel(
        problem: &TransportProblem,
        config: &RaceConfig,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<RaceResult> {
        config.validate().map_err(TransportError::InvalidConfig)?;

        let flag = cancel.unwrap_or_default();
        let pool = build_pool(config.workers)?;

        let finished: Vec<(TransportSolution, bool)> = install(&pool, || {
            config
                .corners
                .par_iter()
                .map(|&corner| stop_on_fault(race_one(problem, config, corner, &flag), &flag))
                .collect::<Result<Vec<_>>>()
        })??;

        let reports = finished
            .iter()
            .map(|(s, _)| RaceReport {
                corner: s.corner,
                status: s.status,
                iterations: s.iterations,
                total_cost: s.total_cost,
            })
            .collect();

        let winner = finished.iter().position(|(_, won)| *won);
        let chosen = match winner {
            Some(k) => k,
            None => finished
                .iter()
                .enumerate()
                .min_by_key(|(_, (s, _))| (!s.is_optimal(), s.total_cost))
                .map(|(k, _)| k)
                .ok_or_else(|| TransportError::InvalidConfig("no corners raced".into()))?,
        };
        let solution = finished
            .into_iter()
            .nth(chosen)
            .map(|(s, _)| s)
            .ok_or_else(|| TransportError::InvalidConfig("no corners raced".into()))?;

        let winner = winner.map(|_| solution.corner);
        match winner {
            Some(corner) => info!(
                winner = %corner,
                iterations = solution.iterations,
                cost = solution.total_cost,
                "race won"
            ),
            None => info!(cost = solution.total_cost, "race stopped without a winner"),
        }

        Ok(RaceResult {
            solution,
            winner,
            reports,
        })
    }
}

/// Solves from `corner` until optimal or stopped; `true` if this racer won.
fn race_one(
    problem: &TransportProblem,
    config: &RaceConfig,
    corner: Corner,
    flag: &AtomicBool,
) -> Result<(TransportSolution, bool)> {
    let solver_config = config.solver.clone().with_corner(corner);
    let mut solver = Solver::new(problem, &solver_config)?;
    let status = solver.run(Some(flag))?;
    let won = status == SolveStatus::Optimal
        && flag
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok();
    Ok((solver.into_solution(status), won))
}

/// Raises `flag` when a racer faults so the others stop early.
fn stop_on_fault<T>(result: Result<T>, flag: &AtomicBool) -> Result<T> {
    if result.is_err() {
        flag.store(true, Ordering::Release);
    }
    result
}
