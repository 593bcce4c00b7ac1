//! Validated problem data.

use crate::error::{Result, TransportError};

/// A balanced transportation problem.
///
/// Holds an `m × n` cost matrix (row-major) together with the supply of
/// each source row and the demand of each sink column. Construction
/// validates the data; afterwards the problem is immutable and solvers
/// only ever read from it.
///
/// # Examples
///
/// ```
/// use u_transport::model::TransportProblem;
///
/// let problem = TransportProblem::new(
///     vec![vec![4, 6], vec![5, 3]],
///     vec![30, 20],
///     vec![25, 25],
/// )
/// .unwrap();
///
/// assert_eq!(problem.rows(), 2);
/// assert_eq!(problem.cols(), 2);
/// assert_eq!(problem.total_supply(), 50);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct TransportProblem {
    rows: usize,
    cols: usize,
    cost: Vec<i64>,
    supply: Vec<i64>,
    demand: Vec<i64>,
    total: i64,
}

impl TransportProblem {
    /// Creates a problem from a cost matrix and supply/demand vectors.
    ///
    /// # Errors
    ///
    /// - [`TransportError::Empty`] if there are no sources or no sinks.
    /// - [`TransportError::DimensionMismatch`] if the cost matrix is not
    ///   `supply.len() × demand.len()`.
    /// - [`TransportError::NegativeCost`] for any negative cost.
    /// - [`TransportError::NonPositiveSupply`] / [`TransportError::NonPositiveDemand`]
    ///   for zero or negative quantities.
    /// - [`TransportError::Imbalanced`] if total supply differs from total demand.
    /// - [`TransportError::Overflow`] if totals, objective values or
    ///   potentials could exceed `i64`.
    pub fn new(cost: Vec<Vec<i64>>, supply: Vec<i64>, demand: Vec<i64>) -> Result<Self> {
        let rows = supply.len();
        let cols = demand.len();
        if rows == 0 || cols == 0 {
            return Err(TransportError::Empty);
        }
        if cost.len() != rows {
            let row = cost.len().min(rows);
            return Err(TransportError::DimensionMismatch {
                row,
                expected: cols,
                found: cost.get(row).map_or(0, Vec::len),
            });
        }

        let mut flat = Vec::with_capacity(rows * cols);
        let mut max_cost = 0i64;
        for (i, row) in cost.into_iter().enumerate() {
            if row.len() != cols {
                return Err(TransportError::DimensionMismatch {
                    row: i,
                    expected: cols,
                    found: row.len(),
                });
            }
            for (j, &c) in row.iter().enumerate() {
                if c < 0 {
                    return Err(TransportError::NegativeCost {
                        row: i,
                        col: j,
                        cost: c,
                    });
                }
                max_cost = max_cost.max(c);
            }
            flat.extend(row);
        }

        if let Some((row, &amount)) = supply.iter().enumerate().find(|(_, &s)| s <= 0) {
            return Err(TransportError::NonPositiveSupply { row, amount });
        }
        if let Some((col, &amount)) = demand.iter().enumerate().find(|(_, &d)| d <= 0) {
            return Err(TransportError::NonPositiveDemand { col, amount });
        }

        let total_supply = checked_sum(&supply)?;
        let total_demand = checked_sum(&demand)?;
        if total_supply != total_demand {
            return Err(TransportError::Imbalanced {
                supply: total_supply,
                demand: total_demand,
            });
        }

        // Objective is bounded by total * max_cost; potentials along a tree
        // path by (m + n) * max_cost, and a reduced cost adds two of them.
        let span = i64::try_from(2 * (rows + cols) + 1).map_err(|_| TransportError::Overflow)?;
        total_supply
            .checked_mul(max_cost)
            .and(max_cost.checked_mul(span))
            .ok_or(TransportError::Overflow)?;

        Ok(Self {
            rows,
            cols,
            cost: flat,
            supply,
            demand,
            total: total_supply,
        })
    }

    /// Number of sources (rows).
    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of sinks (columns).
    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Unit shipping cost from source `row` to sink `col`.
    #[inline]
    pub fn cost(&self, row: usize, col: usize) -> i64 {
        self.cost[row * self.cols + col]
    }

    /// Cost row of a single source.
    #[inline]
    pub fn cost_row(&self, row: usize) -> &[i64] {
        &self.cost[row * self.cols..(row + 1) * self.cols]
    }

    pub fn supply(&self) -> &[i64] {
        &self.supply
    }

    pub fn demand(&self) -> &[i64] {
        &self.demand
    }

    /// Total supply, equal to total demand.
    pub fn total_supply(&self) -> i64 {
        self.total
    }

    /// Size of a non-degenerate basis: `m + n - 1`.
    #[inline]
    pub fn basis_size(&self) -> usize {
        self.rows + self.cols - 1
    }

    /// Objective value of an externally supplied `m × n` allocation.
    ///
    /// Rows or columns beyond the problem dimensions are ignored.
    ///
    /// # Errors
    ///
    /// [`TransportError::Overflow`] if the objective exceeds `i64`.
    pub fn cost_of(&self, allocation: &[Vec<i64>]) -> Result<i64> {
        allocation
            .iter()
            .take(self.rows)
            .enumerate()
            .flat_map(move |(i, row)| row.iter().take(self.cols).zip(self.cost_row(i)))
            .try_fold(0i64, |acc, (&x, &c)| x.checked_mul(c)?.checked_add(acc))
            .ok_or(TransportError::Overflow)
    }
}

/// Sum of `values`, or [`TransportError::Overflow`].
pub(super) fn checked_sum(values: &[i64]) -> Result<i64> {
    values
        .iter()
        .try_fold(0i64, |acc, &v| acc.checked_add(v))
        .ok_or(TransportError::Overflow)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_problem() {
        let p = TransportProblem::new(
            vec![vec![3, 1, 4, 8], vec![5, 1, 1, 4], vec![9, 2, 5, 4], vec![1, 9, 7, 3]],
            vec![26, 9, 28, 15],
            vec![73, 1, 3, 1],
        )
        .unwrap();
        assert_eq!(p.rows(), 4);
        assert_eq!(p.cols(), 4);
        assert_eq!(p.cost(2, 1), 2);
        assert_eq!(p.cost_row(3), &[1, 9, 7, 3]);
        assert_eq!(p.total_supply(), 78);
        assert_eq!(p.basis_size(), 7);
    }

    #[test]
    fn test_imbalanced_rejected() {
        let err = TransportProblem::new(vec![vec![1, 2]], vec![10], vec![4, 5]).unwrap_err();
        assert_eq!(
            err,
            TransportError::Imbalanced {
                supply: 10,
                demand: 9
            }
        );
    }

    #[test]
    fn test_empty_rejected() {
        assert_eq!(
            TransportProblem::new(vec![], vec![], vec![1]).unwrap_err(),
            TransportError::Empty
        );
        assert_eq!(
            TransportProblem::new(vec![vec![]], vec![1], vec![]).unwrap_err(),
            TransportError::Empty
        );
    }

    #[test]
    fn test_ragged_cost_rejected() {
        let err =
            TransportProblem::new(vec![vec![1, 2], vec![3]], vec![1, 1], vec![1, 1]).unwrap_err();
        assert_eq!(
            err,
            TransportError::DimensionMismatch {
                row: 1,
                expected: 2,
                found: 1
            }
        );

        let err = TransportProblem::new(vec![vec![1, 2]], vec![1, 1], vec![1, 1]).unwrap_err();
        assert!(matches!(err, TransportError::DimensionMismatch { .. }));
    }

    #[test]
    fn test_negative_cost_rejected() {
        let err = TransportProblem::new(vec![vec![1, -2]], vec![2], vec![1, 1]).unwrap_err();
        assert_eq!(
            err,
            TransportError::NegativeCost {
                row: 0,
                col: 1,
                cost: -2
            }
        );
    }

    #[test]
    fn test_non_positive_quantities_rejected() {
        let err = TransportProblem::new(vec![vec![1], vec![1]], vec![3, 0], vec![3]).unwrap_err();
        assert_eq!(err, TransportError::NonPositiveSupply { row: 1, amount: 0 });

        let err = TransportProblem::new(vec![vec![1, 1]], vec![3], vec![4, -1]).unwrap_err();
        assert_eq!(err, TransportError::NonPositiveDemand { col: 1, amount: -1 });
    }

    #[test]
    fn test_overflow_rejected() {
        let err = TransportProblem::new(
            vec![vec![1], vec![1]],
            vec![i64::MAX, 1],
            vec![i64::MAX],
        )
        .unwrap_err();
        assert_eq!(err, TransportError::Overflow);

        let err = TransportProblem::new(vec![vec![i64::MAX / 2]], vec![4], vec![4]).unwrap_err();
        assert_eq!(err, TransportError::Overflow);
    }

    #[test]
    fn test_cost_of_allocation() {
        let p = TransportProblem::new(vec![vec![4, 6], vec![5, 3]], vec![30, 20], vec![25, 25])
            .unwrap();
        let x = vec![vec![25, 5], vec![0, 20]];
        assert_eq!(p.cost_of(&x), Ok(25 * 4 + 5 * 6 + 20 * 3));
    }

    #[test]
    fn test_cost_of_overflow() {
        let p = TransportProblem::new(vec![vec![4, 6], vec![5, 3]], vec![30, 20], vec![25, 25])
            .unwrap();
        assert_eq!(
            p.cost_of(&[vec![i64::MAX, 0], vec![0, 0]]),
            Err(TransportError::Overflow)
        );
        assert_eq!(
            p.cost_of(&[vec![i64::MAX / 4, 0], vec![i64::MAX / 5, 0]]),
            Err(TransportError::Overflow)
        );
    }
}
