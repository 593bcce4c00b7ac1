//! Parallel execution of the MODI solver.
//!
//! Two independent levels:
//!
//! - **Phase data-parallelism** ([`PhaseParallelism`]): inside one solver,
//!   opportunity costs and pivots are split into contiguous row blocks and
//!   potentials propagate one BFS level at a time, all on the solver's own
//!   fixed-size pool. Results equal the sequential ones exactly.
//! - **Strategy racing** ([`RaceRunner`]): one complete solver per starting
//!   corner, cancelled cooperatively once the first proves optimality.
//!
//! Worker panics are caught at the pool boundary and reported as
//! [`TransportError::WorkerPanicked`](crate::TransportError::WorkerPanicked).

mod config;
mod phase;
mod race;

pub use config::{PhaseParallelism, RaceConfig};
pub use phase::{evaluate_chunked, pivot_by_rows, potentials_by_level};
pub use race::{RaceReport, RaceResult, RaceRunner};

pub(crate) use phase::build_pool;
