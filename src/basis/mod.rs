//! Allocation grid and initial basic feasible solutions.
//!
//! # Key Types
//!
//! - [`Cell`]: basic (`Allocated`, possibly zero) or non-basic cell
//! - [`Allocation`]: the `m × n` grid owned by one solver
//! - [`Corner`]: starting corner of the initial allocation walk
//!
//! [`build_initial_basis`] produces a spanning-tree basis of exactly
//! `m + n - 1` cells, recording degenerate zero cells where supply and
//! demand exhaust together.

mod corner;
mod grid;

pub use corner::{build_initial_basis, Corner};
pub use grid::{Allocation, Cell};
