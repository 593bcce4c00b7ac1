//! Single-strategy solve to convergence.

use super::config::SolverConfig;
use super::solver::Solver;
use crate::error::Result;
use crate::model::{TransportProblem, TransportSolution};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::instrument;

/// Runs one [`Solver`] from its initial basis until it stops.
///
/// # Usage
///
/// ```
/// use u_transport::basis::Corner;
/// use u_transport::model::TransportProblem;
/// use u_transport::modi::{ModiRunner, SolverConfig};
///
/// let problem = TransportProblem::new(
///     vec![vec![7, 10, 5], vec![4, 2, 1], vec![9, 6, 6]],
///     vec![95, 73, 45],
///     vec![89, 47, 77],
/// )
/// .unwrap();
/// let config = SolverConfig::default().with_corner(Corner::SouthWest);
/// let solution = ModiRunner::run(&problem, &config).unwrap();
/// assert!(solution.is_optimal());
/// assert_eq!(solution.total_cost, 998);
/// ```
pub struct ModiRunner;

impl ModiRunner {
    /// Solves `problem` to optimality (or to `max_iterations`).
    pub fn run(problem: &TransportProblem, config: &SolverConfig) -> Result<TransportSolution> {
        Self::run_with_cancel(problem, config, None)
    }

    /// Solves with an optional cancellation flag.
    ///
    /// The flag is polled once per iteration. A cancelled run returns the
    /// current feasible allocation with [`SolveStatus::Cancelled`].
    ///
    /// [`SolveStatus::Cancelled`]: crate::model::SolveStatus::Cancelled
    #[instrument(
        level = "info",
        skip_all,
        fields(rows = problem.rows(), cols = problem.cols(), corner = %config.corner)
    )]
    pub fn run_with_cancel(
        problem: &TransportProblem,
        config: &SolverConfig,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<TransportSolution> {
        let mut solver = Solver::new(problem, config)?;
        let status = solver.run(cancel.as_deref())?;
        Ok(solver.into_solution(status))
    }
}
