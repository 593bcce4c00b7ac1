//! Seeded random instance generation.
//!
//! Produces balanced problems for tests and benchmarks. Quantities are
//! drawn independently and then nudged one unit at a time until total
//! supply equals total demand.

use super::problem::{checked_sum, TransportProblem};
use crate::error::{Result, TransportError};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Parameters of a random instance.
///
/// # Examples
///
/// ```
/// use u_transport::model::{GeneratorConfig, ProblemGenerator};
///
/// let config = GeneratorConfig::new(5, 7).with_max_cost(20).with_seed(7);
/// let problem = ProblemGenerator::generate(&config).unwrap();
/// assert_eq!(problem.rows(), 5);
/// assert_eq!(problem.cols(), 7);
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeneratorConfig {
    /// Number of sources.
    pub rows: usize,

    /// Number of sinks.
    pub cols: usize,

    /// Costs are drawn uniformly from `1..=max_cost`.
    pub max_cost: i64,

    /// Supplies are drawn uniformly from `1..=max_supply` before balancing.
    pub max_supply: i64,

    /// Demands are drawn uniformly from `1..=max_demand` before balancing.
    pub max_demand: i64,

    /// Random seed. `None` draws a fresh seed.
    pub seed: Option<u64>,
}

impl GeneratorConfig {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            ..Self::default()
        }
    }

    pub fn with_max_cost(mut self, max_cost: i64) -> Self {
        self.max_cost = max_cost;
        self
    }

    pub fn with_max_supply(mut self, max_supply: i64) -> Self {
        self.max_supply = max_supply;
        self
    }

    pub fn with_max_demand(mut self, max_demand: i64) -> Self {
        self.max_demand = max_demand;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.rows == 0 || self.cols == 0 {
            return Err("rows and cols must be at least 1".into());
        }
        if self.max_cost < 1 {
            return Err(format!("max_cost must be at least 1, got {}", self.max_cost));
        }
        if self.max_supply < 1 || self.max_demand < 1 {
            return Err("max_supply and max_demand must be at least 1".into());
        }
        Ok(())
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            rows: 10,
            cols: 10,
            max_cost: 10,
            max_supply: 100,
            max_demand: 100,
            seed: None,
        }
    }
}

/// Builds random balanced problems.
pub struct ProblemGenerator;

impl ProblemGenerator {
    /// Generates a balanced instance.
    ///
    /// # Errors
    ///
    /// [`TransportError::InvalidConfig`] if the configuration is invalid,
    /// [`TransportError::Overflow`] if the drawn quantities do not sum
    /// within `i64`.
    pub fn generate(config: &GeneratorConfig) -> Result<TransportProblem> {
        config.validate().map_err(TransportError::InvalidConfig)?;

        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::seed_from_u64(rand::random()),
        };

        let cost: Vec<Vec<i64>> = (0..config.rows)
            .map(|_| {
                (0..config.cols)
                    .map(|_| rng.random_range(1..=config.max_cost))
                    .collect()
            })
            .collect();
        let mut supply: Vec<i64> = (0..config.rows)
            .map(|_| rng.random_range(1..=config.max_supply))
            .collect();
        let mut demand: Vec<i64> = (0..config.cols)
            .map(|_| rng.random_range(1..=config.max_demand))
            .collect();

        let mut balance = checked_sum(&supply)?
            .checked_sub(checked_sum(&demand)?)
            .ok_or(TransportError::Overflow)?;
        while balance != 0 {
            if balance > 0 {
                shrink_or_grow(&mut rng, &mut supply, &mut demand);
                balance -= 1;
            } else {
                shrink_or_grow(&mut rng, &mut demand, &mut supply);
                balance += 1;
            }
        }

        TransportProblem::new(cost, supply, demand)
    }
}

/// Removes one unit from a random entry of `excess` that can spare it, or
/// adds one unit to a random entry of `deficit` when every entry of
/// `excess` is already 1.
fn shrink_or_grow<R: Rng>(rng: &mut R, excess: &mut [i64], deficit: &mut [i64]) {
    if excess.iter().any(|&x| x > 1) {
        loop {
            let k = rng.random_range(0..excess.len());
            if excess[k] > 1 {
                excess[k] -= 1;
                return;
            }
        }
    }
    let k = rng.random_range(0..deficit.len());
    deficit[k] += 1;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_problem_is_balanced() {
        for seed in 0..20 {
            let config = GeneratorConfig::new(6, 9).with_seed(seed);
            let p = ProblemGenerator::generate(&config).unwrap();
            let supply: i64 = p.supply().iter().sum();
            let demand: i64 = p.demand().iter().sum();
            assert_eq!(supply, demand);
            assert!(p.supply().iter().all(|&s| s >= 1));
            assert!(p.demand().iter().all(|&d| d >= 1));
        }
    }

    #[test]
    fn test_same_seed_same_problem() {
        let config = GeneratorConfig::new(4, 5).with_max_cost(50).with_seed(42);
        let a = ProblemGenerator::generate(&config).unwrap();
        let b = ProblemGenerator::generate(&config).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_costs_within_range() {
        let config = GeneratorConfig::new(8, 8).with_max_cost(3).with_seed(1);
        let p = ProblemGenerator::generate(&config).unwrap();
        for i in 0..p.rows() {
            assert!(p.cost_row(i).iter().all(|&c| (1..=3).contains(&c)));
        }
    }

    #[test]
    fn test_unit_quantities_terminate() {
        // Every supply is 1, so surplus demand must be absorbed by growing supply.
        let config = GeneratorConfig::new(3, 1)
            .with_max_supply(1)
            .with_max_demand(50)
            .with_seed(3);
        let p = ProblemGenerator::generate(&config).unwrap();
        assert_eq!(p.total_supply(), p.demand()[0]);
    }

    #[test]
    fn test_quantity_overflow_is_reported() {
        let config = GeneratorConfig::new(64, 1)
            .with_max_supply(i64::MAX)
            .with_seed(9);
        assert_eq!(
            ProblemGenerator::generate(&config),
            Err(TransportError::Overflow)
        );
    }

    #[test]
    fn test_invalid_config() {
        let config = GeneratorConfig::new(0, 3);
        assert!(matches!(
            ProblemGenerator::generate(&config),
            Err(TransportError::InvalidConfig(_))
        ));
        assert!(GeneratorConfig::default().with_max_cost(0).validate().is_err());
    }
}
