//! Balanced transportation problem solver.
//!
//! Solves `min Σ cost[i][j] * x[i][j]` subject to row sums equal to supply
//! and column sums equal to demand, using the stepping-stone / MODI
//! (modified distribution) method:
//!
//! - **Model**: validated, immutable problem data plus a seeded instance
//!   generator and solution helpers.
//! - **Basis**: the allocation grid with explicit basic/non-basic cells and
//!   the four-corner initial basic feasible solution.
//! - **MODI**: dual potentials, opportunity costs, stepping-stone cycle
//!   search and pivoting, orchestrated by a single [`modi::Solver`].
//! - **Parallel**: phase data-parallelism on a fixed rayon pool and
//!   multi-corner racing with cooperative cancellation.
//!
//! # Example
//!
//! ```
//! use u_transport::model::TransportProblem;
//! use u_transport::modi::{ModiRunner, SolverConfig};
//!
//! let problem = TransportProblem::new(
//!     vec![vec![8, 2, 6], vec![10, 9, 9], vec![7, 10, 7]],
//!     vec![100, 120, 80],
//!     vec![100, 100, 100],
//! )
//! .unwrap();
//!
//! let solution = ModiRunner::run(&problem, &SolverConfig::default()).unwrap();
//! assert_eq!(solution.total_cost, 1860);
//! ```
//!
//! # References
//!
//! - Charnes & Cooper (1954), "The Stepping Stone Method of Explaining
//!   Linear Programming Calculations in Transportation Problems"
//! - Dantzig (1951), "Application of the Simplex Method to a Transportation
//!   Problem"

pub mod basis;
mod error;
pub mod model;
pub mod modi;
pub mod parallel;

pub use error::{Result, TransportError};
