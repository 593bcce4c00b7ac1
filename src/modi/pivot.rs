//! Pivoting an allocation along a stepping-stone cycle.

use super::cycle::{Chain, Sign};
use crate::basis::{Allocation, Cell};
use crate::model::TransportProblem;
use std::cmp::Reverse;

/// Summary of one pivot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PivotOutcome {
    /// Quantity moved around the cycle.
    pub theta: i64,

    /// Cells that left the basis.
    pub leaving: Vec<(usize, usize)>,

    /// Cells kept in the basis as degenerate `Allocated(0)` placeholders.
    pub promoted: Vec<(usize, usize)>,
}

/// New state of a cycle cell after moving `theta` units.
///
/// `Plus` cells gain `theta` and are basic afterwards, so the entering cell
/// becomes `Allocated(theta)` even when `theta` is zero. `Minus` cells lose
/// `theta` and leave the basis when they reach zero.
#[inline]
pub(crate) fn shifted(cell: Cell, sign: Sign, theta: i64) -> Cell {
    match sign {
        Sign::Plus => Cell::Allocated(cell.amount() + theta),
        Sign::Minus => match cell.amount() - theta {
            0 => Cell::NotAllocated,
            rest => Cell::Allocated(rest),
        },
    }
}

/// Moves `theta` around `chain` and restores a basis of `m + n - 1` cells.
pub fn apply_pivot(
    problem: &TransportProblem,
    allocation: &mut Allocation,
    chain: &Chain,
) -> PivotOutcome {
    debug_assert_eq!(
        (allocation.rows(), allocation.cols()),
        (problem.rows(), problem.cols()),
        "allocation shape does not match problem"
    );
    let theta = chain.theta();
    let mut leaving = Vec::new();

    for e in chain.elements() {
        let before = allocation.get(e.row, e.col);
        let after = shifted(before, e.sign, theta);
        if before.is_basic() && !after.is_basic() {
            leaving.push((e.row, e.col));
        }
        allocation.set(e.row, e.col, after);
    }

    let promoted = repair_degeneracy(problem, allocation, chain);
    leaving.retain(|cell| !promoted.contains(cell));

    PivotOutcome {
        theta,
        leaving,
        promoted,
    }
}

/// Promotes non-basic cycle cells to `Allocated(0)` until the basis has
/// `m + n - 1` cells again.
///
/// When several `Minus` cells hit zero in the same pivot only one may leave.
/// Candidates are taken by descending cost; equal costs keep cycle order.
/// Returns the promoted cells.
pub fn repair_degeneracy(
    problem: &TransportProblem,
    allocation: &mut Allocation,
    chain: &Chain,
) -> Vec<(usize, usize)> {
    let missing = problem.basis_size().saturating_sub(allocation.basic_count());
    if missing == 0 {
        return Vec::new();
    }

    let mut candidates: Vec<_> = chain
        .elements()
        .iter()
        .filter(|e| !allocation.is_basic(e.row, e.col))
        .collect();
    candidates.sort_by_key(|e| Reverse(e.cost));

    let promoted: Vec<(usize, usize)> = candidates
        .into_iter()
        .take(missing)
        .map(|e| (e.row, e.col))
        .collect();
    for &(i, j) in &promoted {
        allocation.set(i, j, Cell::Allocated(0));
    }

    tracing::trace!(?promoted, "degenerate cells kept in basis");
    promoted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::basis::{build_initial_basis, Corner};
    use crate::modi::cycle::build_cycle;

    #[test]
    fn test_shifted_cells() {
        assert_eq!(shifted(Cell::NotAllocated, Sign::Plus, 7), Cell::Allocated(7));
        assert_eq!(shifted(Cell::NotAllocated, Sign::Plus, 0), Cell::Allocated(0));
        assert_eq!(shifted(Cell::Allocated(3), Sign::Plus, 2), Cell::Allocated(5));
        assert_eq!(shifted(Cell::Allocated(3), Sign::Minus, 2), Cell::Allocated(1));
        assert_eq!(shifted(Cell::Allocated(3), Sign::Minus, 3), Cell::NotAllocated);
        assert_eq!(shifted(Cell::Allocated(0), Sign::Minus, 0), Cell::NotAllocated);
    }

    #[test]
    fn test_degenerate_pivot_keeps_costliest_zero_cell() {
        let p = TransportProblem::new(
            vec![vec![8, 2, 6], vec![10, 9, 9], vec![7, 10, 7]],
            vec![100, 120, 80],
            vec![100, 100, 100],
        )
        .unwrap();
        let mut a = build_initial_basis(&p, Corner::NorthWest);
        let chain = build_cycle(&p, &a, 0, 1).unwrap();

        let outcome = apply_pivot(&p, &mut a, &chain);

        // (0, 0) and (1, 1) both drop to zero; (1, 1) costs more and stays.
        assert_eq!(outcome.theta, 100);
        assert_eq!(outcome.promoted, vec![(1, 1)]);
        assert_eq!(outcome.leaving, vec![(0, 0)]);
        assert_eq!(a.get(0, 0), Cell::NotAllocated);
        assert_eq!(a.get(1, 1), Cell::Allocated(0));
        assert_eq!(a.get(0, 1), Cell::Allocated(100));
        assert_eq!(a.get(1, 0), Cell::Allocated(100));
        assert_eq!(a.basic_count(), 5);
        assert!(a.is_feasible(&p));
    }

    #[test]
    fn test_non_degenerate_pivot() {
        let p = TransportProblem::new(
            vec![vec![6, 3, 7, 7], vec![9, 6, 8, 3], vec![3, 7, 8, 4], vec![3, 2, 6, 1]],
            vec![13, 4, 11, 26],
            vec![20, 18, 5, 11],
        )
        .unwrap();
        let mut a = build_initial_basis(&p, Corner::NorthWest);
        let before = a.total_cost(&p);
        let chain = build_cycle(&p, &a, 1, 2).unwrap();

        let outcome = apply_pivot(&p, &mut a, &chain);

        assert_eq!(outcome.theta, 4);
        assert_eq!(outcome.leaving, vec![(1, 0)]);
        assert!(outcome.promoted.is_empty());
        assert_eq!(a.get(1, 2), Cell::Allocated(4));
        assert_eq!(a.get(3, 2), Cell::Allocated(1));
        assert_eq!(a.basic_count(), p.basis_size());
        assert!(a.is_feasible(&p));
        // Entering delta was -9 and four units moved.
        assert_eq!(a.total_cost(&p), before - 9 * 4);
    }

    #[test]
    fn test_repair_is_noop_on_full_basis() {
        let p = TransportProblem::new(vec![vec![1, 2], vec![3, 4]], vec![5, 5], vec![5, 5])
            .unwrap();
        let mut a = build_initial_basis(&p, Corner::NorthWest);
        let chain = Chain::default();
        assert!(repair_degeneracy(&p, &mut a, &chain).is_empty());
        assert_eq!(a.basic_count(), 3);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_reloaded_basis_still_repairs_degeneracy() {
        let p = TransportProblem::new(
            vec![vec![8, 2, 6], vec![10, 9, 9], vec![7, 10, 7]],
            vec![100, 120, 80],
            vec![100, 100, 100],
        )
        .unwrap();
        let basis = build_initial_basis(&p, Corner::NorthWest);
        let mut json: serde_json::Value = serde_json::to_value(&basis).unwrap();
        json["basic"] = serde_json::json!(99);
        let mut a: Allocation = serde_json::from_value(json).unwrap();
        assert_eq!(a.basic_count(), 5);

        let chain = build_cycle(&p, &a, 0, 1).unwrap();
        let outcome = apply_pivot(&p, &mut a, &chain);

        assert_eq!(outcome.promoted, vec![(1, 1)]);
        assert_eq!(a.basic_count(), 5);
        assert_eq!(a.basic_cells().count(), 5);
    }

    #[cfg(debug_assertions)]
    #[test]
    #[should_panic(expected = "allocation shape does not match problem")]
    fn test_mismatched_allocation_is_rejected() {
        let p = TransportProblem::new(vec![vec![1, 2], vec![3, 4]], vec![5, 5], vec![5, 5])
            .unwrap();
        let mut a = Allocation::new(2, 3);
        apply_pivot(&p, &mut a, &Chain::default());
    }
}
