//! Parallel execution parameters.

use crate::basis::Corner;
use crate::modi::SolverConfig;
use std::thread;

fn available_workers() -> usize {
    thread::available_parallelism().map_or(1, |n| n.get())
}

/// Fan-out of the data-parallel phases inside one solver.
///
/// Rows are split into contiguous chunks of at least `min_rows_per_task`
/// rows; below that size the work runs on a single worker.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PhaseParallelism {
    /// Size of the solver's fixed worker pool.
    pub workers: usize,

    /// Smallest number of rows handed to one task.
    pub min_rows_per_task: usize,
}

impl Default for PhaseParallelism {
    fn default() -> Self {
        Self {
            workers: available_workers(),
            min_rows_per_task: 4,
        }
    }
}

impl PhaseParallelism {
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn with_min_rows_per_task(mut self, rows: usize) -> Self {
        self.min_rows_per_task = rows;
        self
    }

    /// Rows per chunk for an `m`-row grid.
    pub(crate) fn rows_per_chunk(&self, rows: usize) -> usize {
        rows.div_ceil(self.workers.max(1))
            .max(self.min_rows_per_task)
            .max(1)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.workers == 0 {
            return Err("workers must be at least 1".into());
        }
        if self.min_rows_per_task == 0 {
            return Err("min_rows_per_task must be at least 1".into());
        }
        Ok(())
    }
}

/// Configuration for racing whole solves from different corners.
///
/// # Examples
///
/// ```
/// use u_transport::basis::Corner;
/// use u_transport::parallel::RaceConfig;
///
/// let config = RaceConfig::default()
///     .with_corners(vec![Corner::NorthWest, Corner::SouthEast])
///     .with_workers(2);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RaceConfig {
    /// One racer per corner. Must be non-empty and duplicate-free.
    pub corners: Vec<Corner>,

    /// Size of the race's worker pool.
    pub workers: usize,

    /// Settings shared by every racer; its `corner` is overridden.
    pub solver: SolverConfig,
}

impl Default for RaceConfig {
    fn default() -> Self {
        Self {
            corners: Corner::ALL.to_vec(),
            workers: Corner::ALL.len(),
            solver: SolverConfig::default(),
        }
    }
}

impl RaceConfig {
    pub fn with_corners(mut self, corners: Vec<Corner>) -> Self {
        self.corners = corners;
        self
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn with_solver(mut self, solver: SolverConfig) -> Self {
        self.solver = solver;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.corners.is_empty() {
            return Err("at least one corner must race".into());
        }
        for (k, corner) in self.corners.iter().enumerate() {
            if self.corners[..k].contains(corner) {
                return Err(format!("corner {corner} listed twice"));
            }
        }
        if self.workers == 0 {
            return Err("workers must be at least 1".into());
        }
        self.solver.validate()
    }
}
