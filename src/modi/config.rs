//! Solver configuration.

use super::potentials::PotentialMethod;
use crate::basis::Corner;
use crate::parallel::PhaseParallelism;

/// Configuration for a single MODI solve.
///
/// # Examples
///
/// ```
/// use u_transport::basis::Corner;
/// use u_transport::modi::{PotentialMethod, SolverConfig};
/// use u_transport::parallel::PhaseParallelism;
///
/// let config = SolverConfig::default()
///     .with_corner(Corner::SouthEast)
///     .with_potentials(PotentialMethod::Scan)
///     .with_parallel(PhaseParallelism::default().with_workers(4));
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SolverConfig {
    /// Starting corner of the initial basis.
    pub corner: Corner,

    /// Potential propagation method.
    ///
    /// With [`parallel`](Self::parallel) set, `Bfs` runs level by level on
    /// the worker pool; `Scan` always runs sequentially.
    pub potentials: PotentialMethod,

    /// Maximum number of pivots. 0 = no limit.
    pub max_iterations: usize,

    /// Phase data-parallelism. `None` runs every phase on the calling
    /// thread.
    pub parallel: Option<PhaseParallelism>,
}

impl SolverConfig {
    pub fn with_corner(mut self, corner: Corner) -> Self {
        self.corner = corner;
        self
    }

    pub fn with_potentials(mut self, method: PotentialMethod) -> Self {
        self.potentials = method;
        self
    }

    pub fn with_max_iterations(mut self, n: usize) -> Self {
        self.max_iterations = n;
        self
    }

    /// Enables phase data-parallelism.
    pub fn with_parallel(mut self, parallel: PhaseParallelism) -> Self {
        self.parallel = Some(parallel);
        self
    }

    /// Disables phase data-parallelism.
    pub fn sequential(mut self) -> Self {
        self.parallel = None;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        match &self.parallel {
            Some(parallel) => parallel.validate(),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SolverConfig::default();
        assert_eq!(config.corner, Corner::NorthWest);
        assert_eq!(config.potentials, PotentialMethod::Bfs);
        assert_eq!(config.max_iterations, 0);
        assert!(config.parallel.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let config = SolverConfig::default()
            .with_corner(Corner::NorthEast)
            .with_max_iterations(10)
            .with_parallel(PhaseParallelism::default().with_workers(2));
        assert_eq!(config.corner, Corner::NorthEast);
        assert_eq!(config.max_iterations, 10);
        assert_eq!(config.parallel.as_ref().map(|p| p.workers), Some(2));
        assert!(config.sequential().parallel.is_none());
    }

    #[test]
    fn test_validate_bad_parallelism() {
        let config =
            SolverConfig::default().with_parallel(PhaseParallelism::default().with_workers(0));
        assert!(config.validate().is_err());
    }
}
