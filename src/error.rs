//! Error type shared by every stage of the solver.

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, TransportError>;

/// Errors raised while building a problem or solving it.
///
/// Input validation errors are fatal at construction time. The
/// `DisconnectedBasis` and `CycleNotFound` variants signal a broken
/// spanning-tree basis and are never produced by a correctly maintained
/// solver.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("problem must have at least one source and one sink")]
    Empty,

    #[error("cost row {row} has {found} columns, expected {expected}")]
    DimensionMismatch {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("cost at ({row}, {col}) is negative: {cost}")]
    NegativeCost { row: usize, col: usize, cost: i64 },

    #[error("supply of source {row} must be positive, got {amount}")]
    NonPositiveSupply { row: usize, amount: i64 },

    #[error("demand of sink {col} must be positive, got {amount}")]
    NonPositiveDemand { col: usize, amount: i64 },

    #[error("total supply {supply} does not match total demand {demand}")]
    Imbalanced { supply: i64, demand: i64 },

    #[error("problem magnitudes overflow 64-bit arithmetic")]
    Overflow,

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("basis is not connected: potentials left undefined")]
    DisconnectedBasis,

    #[error("no closed cycle through the basis for entering cell ({row}, {col})")]
    CycleNotFound { row: usize, col: usize },

    #[error("failed to build worker pool: {0}")]
    ThreadPool(String),

    #[error("worker panicked: {0}")]
    WorkerPanicked(String),
}
