//! Stepping-stone / MODI optimization.
//!
//! Each iteration computes dual potentials over the spanning-tree basis,
//! derives the opportunity cost of every non-basic cell, and, while some
//! cost is negative, routes flow around the cycle closed by the most
//! negative cell.
//!
//! # Key Types
//!
//! - [`Solver`]: state machine owning one allocation
//! - [`ModiRunner`]: solve to convergence
//! - [`SolverConfig`]: corner, potential method, iteration budget, parallelism
//!
//! # References
//!
//! - Charnes & Cooper (1954), "The Stepping Stone Method of Explaining
//!   Linear Programming Calculations in Transportation Problems"
//! - Ford & Fulkerson (1955), "Solving the Transportation Problem"

pub mod cycle;
pub mod evaluator;
pub mod pivot;
pub mod potentials;

mod config;
mod runner;
mod solver;

pub use config::SolverConfig;
pub use cycle::{build_cycle, Chain, ChainElement, Sign};
pub use evaluator::{evaluate, EnteringCell, Evaluation, OpportunityCosts};
pub use pivot::{apply_pivot, repair_degeneracy, PivotOutcome};
pub use potentials::{PotentialMethod, Potentials};
pub use runner::ModiRunner;
pub use solver::{Phase, Solver, StepOutcome};
