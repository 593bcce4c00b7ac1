//! Opportunity costs and entering-cell selection.

use super::potentials::Potentials;
use crate::basis::Allocation;
use crate::model::TransportProblem;

/// Non-basic cell chosen to enter the basis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnteringCell {
    pub row: usize,
    pub col: usize,

    /// Opportunity cost of the cell; always negative.
    pub delta: i64,
}

impl EnteringCell {
    /// Returns the preferred of two candidates: the more negative delta,
    /// then the earlier cell in row-major order.
    #[inline]
    pub(crate) fn better(a: Option<Self>, b: Option<Self>) -> Option<Self> {
        match (a, b) {
            (Some(x), Some(y)) => {
                if (y.delta, y.row, y.col) < (x.delta, x.row, x.col) {
                    Some(y)
                } else {
                    Some(x)
                }
            }
            (x, None) => x,
            (None, y) => y,
        }
    }
}

/// Result of one optimality check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Evaluation {
    /// `true` iff every opportunity cost is non-negative.
    pub optimal: bool,

    /// Most negative cell, `None` when optimal.
    pub entering: Option<EnteringCell>,
}

/// Row-major grid of opportunity costs; `None` on basic cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpportunityCosts {
    cols: usize,
    values: Vec<Option<i64>>,
}

impl OpportunityCosts {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            cols,
            values: vec![None; rows * cols],
        }
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Option<i64> {
        self.values[row * self.cols + col]
    }

    /// Smallest defined opportunity cost, if any cell is non-basic.
    pub fn min(&self) -> Option<i64> {
        self.values.iter().flatten().copied().min()
    }

    pub(crate) fn values_mut(&mut self) -> &mut [Option<i64>] {
        &mut self.values
    }
}

/// Recomputes every opportunity cost and picks the entering cell.
///
/// Ties between equally negative cells go to the first one in row-major
/// order.
pub fn evaluate(
    problem: &TransportProblem,
    allocation: &Allocation,
    potentials: &Potentials,
    deltas: &mut OpportunityCosts,
) -> Evaluation {
    debug_assert_eq!(
        (allocation.rows(), allocation.cols()),
        (problem.rows(), problem.cols()),
        "allocation shape does not match problem"
    );
    let entering = evaluate_rows(problem, allocation, potentials, 0, deltas.values_mut());
    Evaluation {
        optimal: entering.is_none(),
        entering,
    }
}

/// Fills the delta rows starting at `first_row` and returns their most
/// negative cell. `rows` holds whole rows only.
pub(crate) fn evaluate_rows(
    problem: &TransportProblem,
    allocation: &Allocation,
    potentials: &Potentials,
    first_row: usize,
    rows: &mut [Option<i64>],
) -> Option<EnteringCell> {
    let cols = problem.cols();
    let mut best: Option<EnteringCell> = None;

    for (offset, delta_row) in rows.chunks_mut(cols).enumerate() {
        let i = first_row + offset;
        for (j, (slot, cell)) in delta_row.iter_mut().zip(allocation.row(i)).enumerate() {
            if cell.is_basic() {
                *slot = None;
                continue;
            }
            let delta = potentials.reduced_cost(problem, i, j);
            *slot = Some(delta);
            if delta < 0 && best.is_none_or(|b| delta < b.delta) {
                best = Some(EnteringCell { row: i, col: j, delta });
            }
        }
    }

    best
}
