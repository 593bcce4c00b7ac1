//! Stepping-stone cycle search.
//!
//! Adding a non-basic cell to a spanning-tree basis closes exactly one
//! cycle. [`build_cycle`] finds it by depth-first search that alternates
//! between row moves and column moves, always trying the nearest basic cell
//! first and backtracking out of dead ends.

use crate::basis::Allocation;
use crate::error::{Result, TransportError};
use crate::model::TransportProblem;

/// Direction of the flow change on a cycle cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sign {
    Plus,
    Minus,
}

/// One cell of a cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChainElement {
    pub row: usize,
    pub col: usize,
    pub cost: i64,

    /// Quantity at the time the cell joined the chain.
    pub amount: i64,

    pub sign: Sign,
}

/// Ordered cycle through the basis, starting at the entering cell.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Chain {
    elements: Vec<ChainElement>,
}

impl Chain {
    /// Appends a cell. It is signed `Minus` when a `Plus` cell already
    /// occupies its row or column, `Plus` otherwise.
    fn push(&mut self, row: usize, col: usize, cost: i64, amount: i64) {
        let blocked = self
            .elements
            .iter()
            .any(|e| e.sign == Sign::Plus && (e.row == row || e.col == col));
        self.elements.push(ChainElement {
            row,
            col,
            cost,
            amount,
            sign: if blocked { Sign::Minus } else { Sign::Plus },
        });
    }

    fn pop(&mut self) -> Option<ChainElement> {
        self.elements.pop()
    }

    pub fn elements(&self) -> &[ChainElement] {
        &self.elements
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Returns `true` once the chain has at least four cells, every
    /// consecutive pair shares a row or column, and the last cell shares a
    /// row or column with the first.
    pub fn is_closed(&self) -> bool {
        let (Some(first), Some(last)) = (self.elements.first(), self.elements.last()) else {
            return false;
        };
        self.elements.len() >= 4
            && (first.row == last.row || first.col == last.col)
            && self
                .elements
                .windows(2)
                .all(|w| w[0].row == w[1].row || w[0].col == w[1].col)
    }

    /// Largest amount that can move around the cycle: the smallest
    /// quantity on a `Minus` cell.
    pub fn theta(&self) -> i64 {
        self.elements
            .iter()
            .filter(|e| e.sign == Sign::Minus)
            .map(|e| e.amount)
            .min()
            .unwrap_or(0)
    }
}

/// Builds the cycle closed by adding `(row, col)` to the basis.
///
/// The entering cell is signed `Plus`. Moves alternate row, column, row,
/// and so on; each move picks the unvisited basic cell nearest by index on
/// the current cell's row or column. A dead end pops the path and removes
/// the popped cell from the chain; the next move then retries the same axis
/// from the parent.
///
/// # Errors
///
/// [`TransportError::CycleNotFound`] if the search exhausts the basis
/// without closing, which only happens when the basis is not a spanning
/// tree.
pub fn build_cycle(
    problem: &TransportProblem,
    allocation: &Allocation,
    row: usize,
    col: usize,
) -> Result<Chain> {
    debug_assert_eq!(
        (allocation.rows(), allocation.cols()),
        (problem.rows(), problem.cols()),
        "allocation shape does not match problem"
    );
    let (m, n) = (problem.rows(), problem.cols());
    let not_found = TransportError::CycleNotFound { row, col };

    let mut visited = vec![false; m * n];
    let mut path = vec![(row, col)];
    let mut chain = Chain::default();
    chain.push(row, col, problem.cost(row, col), allocation.get(row, col).amount());

    // Every basic cell is pushed at most once and popped at most once.
    let budget = 2 * (allocation.basic_count() + 1);
    let mut search_column = true;

    for _ in 0..budget {
        if chain.is_closed() {
            return Ok(chain);
        }
        search_column = !search_column;

        let &(r, c) = path.last().ok_or_else(|| not_found.clone())?;
        visited[r * n + c] = true;

        let next = if search_column {
            nearest(r, m, |i| i != r && !visited[i * n + c] && allocation.is_basic(i, c))
                .map(|i| (i, c))
        } else {
            nearest(c, n, |j| j != c && !visited[r * n + j] && allocation.is_basic(r, j))
                .map(|j| (r, j))
        };

        match next {
            Some((i, j)) => {
                path.push((i, j));
                chain.push(i, j, problem.cost(i, j), allocation.get(i, j).amount());
            }
            None => {
                path.pop();
                chain.pop();
                if path.is_empty() {
                    return Err(not_found);
                }
            }
        }
    }

    if chain.is_closed() {
        Ok(chain)
    } else {
        Err(not_found)
    }
}

/// Index in `0..len` nearest to `from` accepted by `eligible`; the lower
/// index wins on equal distance.
fn nearest(from: usize, len: usize, eligible: impl Fn(usize) -> bool) -> Option<usize> {
    (0..len)
        .filter(|&k| eligible(k))
        .min_by_key(|&k| k.abs_diff(from))
}
