//! Corner method for the initial basic feasible solution.

use super::grid::{Allocation, Cell};
use crate::model::TransportProblem;
use std::fmt;

/// Grid corner the initial allocation walk starts from.
///
/// The corner fixes both traversal directions: `North*` walks rows in
/// ascending order, `South*` in descending order; `*West` walks columns in
/// ascending order, `*East` in descending order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Corner {
    #[default]
    NorthWest,
    NorthEast,
    SouthWest,
    SouthEast,
}

impl Corner {
    /// All four corners, in racing order.
    pub const ALL: [Corner; 4] = [
        Corner::NorthWest,
        Corner::NorthEast,
        Corner::SouthWest,
        Corner::SouthEast,
    ];

    #[inline]
    pub fn rows_descending(self) -> bool {
        matches!(self, Corner::SouthWest | Corner::SouthEast)
    }

    #[inline]
    pub fn cols_descending(self) -> bool {
        matches!(self, Corner::NorthEast | Corner::SouthEast)
    }
}

impl fmt::Display for Corner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Corner::NorthWest => "north-west",
            Corner::NorthEast => "north-east",
            Corner::SouthWest => "south-west",
            Corner::SouthEast => "south-east",
        };
        f.write_str(name)
    }
}

/// Builds the initial basis by greedily saturating supply and demand from
/// `corner`.
///
/// Each step ships `min(remaining supply, remaining demand)` to the current
/// cell and records it as basic, even when the amount is zero. The walk
/// moves to the next row once the row's supply is exhausted and to the next
/// column otherwise. When supply and demand run out together only the row
/// advances, so the following step lands in the same exhausted column and
/// records a degenerate `Allocated(0)` cell. The result always has exactly
/// `m + n - 1` basic cells forming a staircase spanning tree.
pub fn build_initial_basis(problem: &TransportProblem, corner: Corner) -> Allocation {
    let (m, n) = (problem.rows(), problem.cols());
    let mut supply = problem.supply().to_vec();
    let mut demand = problem.demand().to_vec();
    let mut allocation = Allocation::new(m, n);

    let row_at = |p: usize| if corner.rows_descending() { m - 1 - p } else { p };
    let col_at = |q: usize| if corner.cols_descending() { n - 1 - q } else { q };

    let (mut p, mut q) = (0, 0);
    while p < m && q < n {
        let (i, j) = (row_at(p), col_at(q));
        let amount = supply[i].min(demand[j]);
        allocation.set(i, j, Cell::Allocated(amount));
        supply[i] -= amount;
        demand[j] -= amount;
        if supply[i] == 0 {
            p += 1;
        } else {
            q += 1;
        }
    }

    allocation
}
