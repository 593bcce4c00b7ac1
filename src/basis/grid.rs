//! Allocation grid with explicit basic/non-basic cells.

use crate::model::TransportProblem;

/// State of one `(source, sink)` cell.
///
/// `Allocated(0)` is a degenerate basic cell: part of the spanning-tree
/// basis while carrying no flow. It is distinct from `NotAllocated`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Cell {
    #[default]
    NotAllocated,
    Allocated(i64),
}

impl Cell {
    /// Returns `true` if the cell belongs to the basis.
    #[inline]
    pub fn is_basic(self) -> bool {
        matches!(self, Cell::Allocated(_))
    }

    /// Shipped quantity; `0` for non-basic cells.
    #[inline]
    pub fn amount(self) -> i64 {
        match self {
            Cell::Allocated(x) => x,
            Cell::NotAllocated => 0,
        }
    }
}

/// Row-major `m × n` grid of [`Cell`]s.
///
/// Tracks the number of basic cells so the basis-size invariant can be
/// checked in O(1). Deserialization checks the grid shape and rebuilds the
/// count from the cells.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawAllocation"))]
pub struct Allocation {
    rows: usize,
    cols: usize,
    cells: Vec<Cell>,
    #[cfg_attr(feature = "serde", serde(skip_serializing))]
    basic: usize,
}

/// Serialized form of an [`Allocation`].
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawAllocation {
    rows: usize,
    cols: usize,
    cells: Vec<Cell>,
}

#[cfg(feature = "serde")]
impl TryFrom<RawAllocation> for Allocation {
    type Error = String;

    fn try_from(raw: RawAllocation) -> Result<Self, Self::Error> {
        let expected = raw
            .rows
            .checked_mul(raw.cols)
            .ok_or("grid size overflows usize")?;
        if raw.cells.len() != expected {
            return Err(format!(
                "{}x{} grid needs {expected} cells, found {}",
                raw.rows,
                raw.cols,
                raw.cells.len()
            ));
        }
        if let Some(k) = raw.cells.iter().position(|c| c.amount() < 0) {
            return Err(format!(
                "cell ({}, {}) has a negative amount",
                k / raw.cols,
                k % raw.cols
            ));
        }
        let basic = raw.cells.iter().filter(|c| c.is_basic()).count();
        Ok(Self {
            rows: raw.rows,
            cols: raw.cols,
            cells: raw.cells,
            basic,
        })
    }
}

impl Allocation {
    /// Creates a grid with every cell non-basic.
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            cells: vec![Cell::NotAllocated; rows * cols],
            basic: 0,
        }
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Cell {
        self.cells[row * self.cols + col]
    }

    #[inline]
    pub fn is_basic(&self, row: usize, col: usize) -> bool {
        self.get(row, col).is_basic()
    }

    /// Overwrites a cell, keeping the basic count in sync.
    pub fn set(&mut self, row: usize, col: usize, cell: Cell) {
        let slot = &mut self.cells[row * self.cols + col];
        match (slot.is_basic(), cell.is_basic()) {
            (false, true) => self.basic += 1,
            (true, false) => self.basic -= 1,
            _ => {}
        }
        *slot = cell;
    }

    /// Number of basic cells, degenerate ones included.
    #[inline]
    pub fn basic_count(&self) -> usize {
        self.basic
    }

    /// Cells of one source row.
    #[inline]
    pub fn row(&self, row: usize) -> &[Cell] {
        &self.cells[row * self.cols..(row + 1) * self.cols]
    }

    /// Iterates `(row, col, amount)` over basic cells in row-major order.
    pub fn basic_cells(&self) -> impl Iterator<Item = (usize, usize, i64)> + '_ {
        let cols = self.cols;
        self.cells.iter().enumerate().filter_map(move |(k, cell)| match cell {
            Cell::Allocated(x) => Some((k / cols, k % cols, *x)),
            Cell::NotAllocated => None,
        })
    }

    pub fn row_sum(&self, row: usize) -> i64 {
        self.row(row).iter().map(|c| c.amount()).sum()
    }

    pub fn col_sum(&self, col: usize) -> i64 {
        (0..self.rows).map(|i| self.get(i, col).amount()).sum()
    }

    /// Plain quantity matrix; non-basic and degenerate cells become `0`.
    pub fn to_matrix(&self) -> Vec<Vec<i64>> {
        (0..self.rows)
            .map(|i| self.row(i).iter().map(|c| c.amount()).collect())
            .collect()
    }

    /// `Σ amount * cost` over basic cells.
    pub fn total_cost(&self, problem: &TransportProblem) -> i64 {
        self.basic_cells()
            .map(|(i, j, x)| x * problem.cost(i, j))
            .sum()
    }

    /// Returns `true` if row sums equal supply and column sums equal demand.
    pub fn is_feasible(&self, problem: &TransportProblem) -> bool {
        (0..self.rows).all(|i| self.row_sum(i) == problem.supply()[i])
            && (0..self.cols).all(|j| self.col_sum(j) == problem.demand()[j])
    }

    /// Raw cells for row-partitioned parallel writes. Callers must restore
    /// the basic count with [`shift_basic_count`](Self::shift_basic_count).
    pub(crate) fn cells_mut(&mut self) -> &mut [Cell] {
        &mut self.cells
    }

    pub(crate) fn shift_basic_count(&mut self, change: isize) {
        self.basic = self.basic.saturating_add_signed(change);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_semantics() {
        assert!(!Cell::NotAllocated.is_basic());
        assert!(Cell::Allocated(0).is_basic());
        assert_eq!(Cell::Allocated(0).amount(), 0);
        assert_eq!(Cell::NotAllocated.amount(), 0);
        assert_eq!(Cell::Allocated(7).amount(), 7);
    }

    #[test]
    fn test_set_tracks_basic_count() {
        let mut a = Allocation::new(2, 3);
        assert_eq!(a.basic_count(), 0);
        a.set(0, 1, Cell::Allocated(4));
        a.set(1, 2, Cell::Allocated(0));
        assert_eq!(a.basic_count(), 2);
        a.set(0, 1, Cell::Allocated(9));
        assert_eq!(a.basic_count(), 2);
        a.set(1, 2, Cell::NotAllocated);
        assert_eq!(a.basic_count(), 1);
        a.set(1, 0, Cell::NotAllocated);
        assert_eq!(a.basic_count(), 1);
    }

    #[test]
    fn test_sums_and_matrix() {
        let mut a = Allocation::new(2, 2);
        a.set(0, 0, Cell::Allocated(3));
        a.set(0, 1, Cell::Allocated(0));
        a.set(1, 1, Cell::Allocated(5));
        assert_eq!(a.row_sum(0), 3);
        assert_eq!(a.col_sum(1), 5);
        assert_eq!(a.to_matrix(), vec![vec![3, 0], vec![0, 5]]);
        let basic: Vec<_> = a.basic_cells().collect();
        assert_eq!(basic, vec![(0, 0, 3), (0, 1, 0), (1, 1, 5)]);
    }

    #[test]
    fn test_total_cost_and_feasibility() {
        let p = TransportProblem::new(vec![vec![4, 6], vec![5, 3]], vec![3, 5], vec![3, 5])
            .unwrap();
        let mut a = Allocation::new(2, 2);
        a.set(0, 0, Cell::Allocated(3));
        a.set(1, 1, Cell::Allocated(5));
        assert!(a.is_feasible(&p));
        assert_eq!(a.total_cost(&p), 12 + 15);

        a.set(1, 1, Cell::Allocated(4));
        assert!(!a.is_feasible(&p));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_deserialize_rebuilds_basic_count() {
        let mut a = Allocation::new(2, 2);
        a.set(0, 0, Cell::Allocated(3));
        a.set(0, 1, Cell::Allocated(0));
        a.set(1, 1, Cell::Allocated(5));

        let json = serde_json::to_string(&a).unwrap();
        let back: Allocation = serde_json::from_str(&json).unwrap();
        assert_eq!(back, a);

        // A stale count in the input is ignored.
        let tampered = r#"{"rows":2,"cols":2,"basic":99,
            "cells":[{"Allocated":3},{"Allocated":0},"NotAllocated",{"Allocated":5}]}"#;
        let back: Allocation = serde_json::from_str(tampered).unwrap();
        assert_eq!(back.basic_count(), 3);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_deserialize_rejects_malformed_grid() {
        let short = r#"{"rows":3,"cols":3,"cells":["NotAllocated"]}"#;
        assert!(serde_json::from_str::<Allocation>(short).is_err());

        let negative = r#"{"rows":1,"cols":2,"cells":[{"Allocated":-4},"NotAllocated"]}"#;
        assert!(serde_json::from_str::<Allocation>(negative).is_err());
    }
}
