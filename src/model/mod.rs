//! Problem data, instance generation and solver output.
//!
//! # Key Types
//!
//! - [`TransportProblem`]: validated cost matrix with supply and demand
//! - [`ProblemGenerator`] / [`GeneratorConfig`]: seeded random balanced instances
//! - [`TransportSolution`]: allocation, total cost and termination status

mod generator;
mod problem;
mod solution;

pub use generator::{GeneratorConfig, ProblemGenerator};
pub use problem::TransportProblem;
pub use solution::{same_allocation, SolveStatus, TransportSolution};
