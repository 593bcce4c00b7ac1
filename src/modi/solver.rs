//! The MODI state machine.

use super::config::SolverConfig;
use super::cycle::build_cycle;
use super::evaluator::{evaluate, EnteringCell, Evaluation, OpportunityCosts};
use super::pivot::{apply_pivot, PivotOutcome};
use super::potentials::{PotentialMethod, Potentials};
use crate::basis::{build_initial_basis, Allocation};
use crate::error::{Result, TransportError};
use crate::model::{SolveStatus, TransportProblem, TransportSolution};
use crate::parallel::{build_pool, evaluate_chunked, pivot_by_rows, potentials_by_level};
use rayon::ThreadPool;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info, warn};

/// Position of a [`Solver`] within one iteration.
///
/// `Init → PotentialsComputed → DeltaComputed → Optimal`, or
/// `DeltaComputed → CycleBuilt → Adjusted → PotentialsComputed → …`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Init,
    PotentialsComputed,
    DeltaComputed,
    CycleBuilt,
    Adjusted,
    Optimal,
}

/// Result of [`Solver::step`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    /// No opportunity cost is negative; the allocation is unchanged.
    Optimal,

    /// One pivot was applied.
    Pivoted(PivotOutcome),
}

/// Owns all mutable state of one solve: allocation, potentials,
/// opportunity costs and, in parallel mode, the worker pool.
///
/// # Examples
///
/// ```
/// use u_transport::model::{SolveStatus, TransportProblem};
/// use u_transport::modi::{Phase, Solver, SolverConfig};
///
/// let problem = TransportProblem::new(vec![vec![4]], vec![5], vec![5]).unwrap();
/// let mut solver = Solver::new(&problem, &SolverConfig::default()).unwrap();
/// assert_eq!(solver.run(None).unwrap(), SolveStatus::Optimal);
/// assert_eq!(solver.phase(), Phase::Optimal);
/// assert_eq!(solver.iterations(), 0);
/// ```
pub struct Solver<'p> {
    problem: &'p TransportProblem,
    config: SolverConfig,
    allocation: Allocation,
    potentials: Option<Potentials>,
    deltas: OpportunityCosts,
    phase: Phase,
    iterations: usize,
    pool: Option<ThreadPool>,
}

impl<'p> Solver<'p> {
    /// Builds the initial basis and, in parallel mode, the worker pool.
    ///
    /// # Errors
    ///
    /// [`TransportError::InvalidConfig`] for an invalid configuration,
    /// [`TransportError::ThreadPool`] if the pool cannot be created.
    pub fn new(problem: &'p TransportProblem, config: &SolverConfig) -> Result<Self> {
        config.validate().map_err(TransportError::InvalidConfig)?;

        let pool = match &config.parallel {
            Some(parallel) => Some(build_pool(parallel.workers)?),
            None => None,
        };
        let allocation = build_initial_basis(problem, config.corner);
        debug!(
            corner = %config.corner,
            basic = allocation.basic_count(),
            cost = allocation.total_cost(problem),
            "initial basis"
        );

        Ok(Self {
            problem,
            config: config.clone(),
            allocation,
            potentials: None,
            deltas: OpportunityCosts::new(problem.rows(), problem.cols()),
            phase: Phase::Init,
            iterations: 0,
            pool,
        })
    }

    pub fn problem(&self) -> &TransportProblem {
        self.problem
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Pivots applied so far.
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    pub fn allocation(&self) -> &Allocation {
        &self.allocation
    }

    /// Potentials of the current basis; `None` until computed and again
    /// after each pivot.
    pub fn potentials(&self) -> Option<&Potentials> {
        self.potentials.as_ref()
    }

    /// Opportunity costs from the last evaluation.
    pub fn opportunity_costs(&self) -> &OpportunityCosts {
        &self.deltas
    }

    /// Recomputes potentials for the current basis.
    pub fn compute_potentials(&mut self) -> Result<&Potentials> {
        let potentials = self.propagate()?;
        self.phase = Phase::PotentialsComputed;
        Ok(self.potentials.insert(potentials))
    }

    fn propagate(&self) -> Result<Potentials> {
        match (&self.pool, &self.config.parallel, self.config.potentials) {
            (Some(pool), Some(parallel), PotentialMethod::Bfs) => {
                potentials_by_level(pool, parallel, self.problem, &self.allocation)
            }
            (_, _, method) => Potentials::compute(self.problem, &self.allocation, method),
        }
    }

    /// Computes every opportunity cost of the current basis and picks the
    /// entering cell. Potentials are recomputed first if stale.
    ///
    /// Does not modify the allocation, so repeated calls agree.
    pub fn evaluate(&mut self) -> Result<Evaluation> {
        let potentials = match self.potentials.take() {
            Some(potentials) => potentials,
            None => {
                let potentials = self.propagate()?;
                self.phase = Phase::PotentialsComputed;
                potentials
            }
        };

        let evaluation = match (&self.pool, &self.config.parallel) {
            (Some(pool), Some(parallel)) => evaluate_chunked(
                pool,
                parallel,
                self.problem,
                &self.allocation,
                &potentials,
                &mut self.deltas,
            ),
            _ => Ok(evaluate(
                self.problem,
                &self.allocation,
                &potentials,
                &mut self.deltas,
            )),
        };
        self.potentials = Some(potentials);
        let evaluation = evaluation?;

        self.phase = if evaluation.optimal {
            Phase::Optimal
        } else {
            Phase::DeltaComputed
        };
        Ok(evaluation)
    }

    /// Runs one full iteration: potentials, evaluation and, unless the
    /// basis is optimal, one pivot.
    pub fn step(&mut self) -> Result<StepOutcome> {
        match self.evaluate()?.entering {
            Some(entering) => self.pivot(entering).map(StepOutcome::Pivoted),
            None => Ok(StepOutcome::Optimal),
        }
    }

    fn pivot(&mut self, entering: EnteringCell) -> Result<PivotOutcome> {
        let chain = build_cycle(self.problem, &self.allocation, entering.row, entering.col)?;
        self.phase = Phase::CycleBuilt;

        let outcome = match (&self.pool, &self.config.parallel) {
            (Some(pool), Some(parallel)) => {
                pivot_by_rows(pool, parallel, self.problem, &mut self.allocation, &chain)?
            }
            _ => apply_pivot(self.problem, &mut self.allocation, &chain),
        };
        self.potentials = None;
        self.phase = Phase::Adjusted;
        self.iterations += 1;

        debug!(
            iteration = self.iterations,
            row = entering.row,
            col = entering.col,
            delta = entering.delta,
            theta = outcome.theta,
            chain_len = chain.len(),
            "pivot"
        );
        Ok(outcome)
    }

    /// Iterates until optimal, cancelled or out of iterations.
    ///
    /// `cancel` is read once per iteration, before the evaluation.
    pub fn run(&mut self, cancel: Option<&AtomicBool>) -> Result<SolveStatus> {
        loop {
            if cancel.is_some_and(|flag| flag.load(Ordering::Relaxed)) {
                debug!(iterations = self.iterations, "cancelled");
                return Ok(SolveStatus::Cancelled);
            }

            let Some(entering) = self.evaluate()?.entering else {
                info!(
                    iterations = self.iterations,
                    cost = self.allocation.total_cost(self.problem),
                    "optimal"
                );
                return Ok(SolveStatus::Optimal);
            };

            if self.config.max_iterations > 0 && self.iterations >= self.config.max_iterations {
                warn!(
                    iterations = self.iterations,
                    "iteration limit reached before optimality"
                );
                return Ok(SolveStatus::IterationLimit);
            }

            self.pivot(entering)?;
        }
    }

    /// Consumes the solver into its current allocation.
    pub fn into_solution(self, status: SolveStatus) -> TransportSolution {
        TransportSolution {
            allocation: self.allocation.to_matrix(),
            total_cost: self.allocation.total_cost(self.problem),
            iterations: self.iterations,
            status,
            corner: self.config.corner,
        }
    }
}
