//! Solver output.

use crate::basis::Corner;

/// Why a solve stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SolveStatus {
    /// Every opportunity cost is non-negative.
    Optimal,

    /// A shared cancellation flag was raised before convergence.
    Cancelled,

    /// The configured iteration budget ran out before convergence.
    IterationLimit,
}

/// A feasible allocation and its objective value.
///
/// Non-basic cells and degenerate basic cells are both reported as `0`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TransportSolution {
    /// Shipped quantity per `(source, sink)`.
    pub allocation: Vec<Vec<i64>>,

    /// `Σ allocation[i][j] * cost[i][j]`.
    pub total_cost: i64,

    /// Number of pivots performed.
    pub iterations: usize,

    /// Termination reason.
    pub status: SolveStatus,

    /// Corner used for the initial basis.
    pub corner: Corner,
}

impl TransportSolution {
    /// Returns `true` if the solver proved optimality.
    pub fn is_optimal(&self) -> bool {
        self.status == SolveStatus::Optimal
    }
}

/// Structural equality of two allocation matrices.
///
/// Returns `false` when the dimensions differ.
pub fn same_allocation(a: &[Vec<i64>], b: &[Vec<i64>]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(ra, rb)| ra == rb)
}
