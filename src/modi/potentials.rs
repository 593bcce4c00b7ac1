//! Dual potentials `u`, `v` with `u[i] + v[j] = cost[i][j]` on basic cells.
//!
//! Potentials are defined up to an additive constant, so propagation seeds
//! `u[0] = 0` and walks the spanning-tree basis from there.

use crate::basis::Allocation;
use crate::error::{Result, TransportError};
use crate::model::TransportProblem;
use std::collections::VecDeque;

/// How potentials are propagated over the basis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PotentialMethod {
    /// Repeated full scans of the grid, deriving any potential whose
    /// partner across a basic cell is known, until a scan changes nothing.
    /// O(m·n) per round, at most O(m + n) rounds.
    Scan,

    /// Breadth-first search over row/column adjacency lists of basic
    /// cells. O(m·n) to build the lists, O(m + n) to propagate.
    #[default]
    Bfs,
}

/// Row and column potentials of the current basis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Potentials {
    u: Vec<i64>,
    v: Vec<i64>,
}

impl Potentials {
    /// Computes potentials with the chosen method.
    ///
    /// # Errors
    ///
    /// [`TransportError::DisconnectedBasis`] if the basic cells do not
    /// connect every row and column.
    pub fn compute(
        problem: &TransportProblem,
        allocation: &Allocation,
        method: PotentialMethod,
    ) -> Result<Self> {
        match method {
            PotentialMethod::Scan => Self::scan(problem, allocation),
            PotentialMethod::Bfs => Self::bfs(problem, allocation),
        }
    }

    /// Flood fill by repeated scans.
    pub fn scan(problem: &TransportProblem, allocation: &Allocation) -> Result<Self> {
        let mut u = vec![None; problem.rows()];
        let mut v = vec![None; problem.cols()];
        u[0] = Some(0);

        let mut updated = true;
        while updated {
            updated = false;
            for (i, j, _) in allocation.basic_cells() {
                let c = problem.cost(i, j);
                match (u[i], v[j]) {
                    (Some(ui), None) => {
                        v[j] = Some(c - ui);
                        updated = true;
                    }
                    (None, Some(vj)) => {
                        u[i] = Some(c - vj);
                        updated = true;
                    }
                    _ => {}
                }
            }
        }

        Self::from_partial(u, v)
    }

    /// Breadth-first propagation through alternating row and column queues.
    pub fn bfs(problem: &TransportProblem, allocation: &Allocation) -> Result<Self> {
        let adjacency = BasisAdjacency::new(allocation);
        let mut u = vec![None; problem.rows()];
        let mut v = vec![None; problem.cols()];
        u[0] = Some(0);

        let mut row_queue = VecDeque::from([0usize]);
        let mut col_queue = VecDeque::new();

        while !row_queue.is_empty() {
            while let Some(i) = row_queue.pop_front() {
                let Some(ui) = u[i] else { continue };
                for &j in &adjacency.by_row[i] {
                    if v[j].is_none() {
                        v[j] = Some(problem.cost(i, j) - ui);
                        col_queue.push_back(j);
                    }
                }
            }
            while let Some(j) = col_queue.pop_front() {
                let Some(vj) = v[j] else { continue };
                for &i in &adjacency.by_col[j] {
                    if u[i].is_none() {
                        u[i] = Some(problem.cost(i, j) - vj);
                        row_queue.push_back(i);
                    }
                }
            }
        }

        Self::from_partial(u, v)
    }

    /// Finalizes propagation output, failing if any potential is undefined.
    pub(crate) fn from_partial(u: Vec<Option<i64>>, v: Vec<Option<i64>>) -> Result<Self> {
        let u = u
            .into_iter()
            .collect::<Option<Vec<_>>>()
            .ok_or(TransportError::DisconnectedBasis)?;
        let v = v
            .into_iter()
            .collect::<Option<Vec<_>>>()
            .ok_or(TransportError::DisconnectedBasis)?;
        Ok(Self { u, v })
    }

    /// Row potentials.
    pub fn u(&self) -> &[i64] {
        &self.u
    }

    /// Column potentials.
    pub fn v(&self) -> &[i64] {
        &self.v
    }

    /// Opportunity cost `cost[i][j] - (u[i] + v[j])`.
    #[inline]
    pub fn reduced_cost(&self, problem: &TransportProblem, row: usize, col: usize) -> i64 {
        problem.cost(row, col) - (self.u[row] + self.v[col])
    }
}

/// Basic cells indexed by row and by column.
#[derive(Debug, Clone)]
pub(crate) struct BasisAdjacency {
    pub(crate) by_row: Vec<Vec<usize>>,
    pub(crate) by_col: Vec<Vec<usize>>,
}

impl BasisAdjacency {
    pub(crate) fn new(allocation: &Allocation) -> Self {
        let mut by_row = vec![Vec::new(); allocation.rows()];
        let mut by_col = vec![Vec::new(); allocation.cols()];
        for (i, j, _) in allocation.basic_cells() {
            by_row[i].push(j);
            by_col[j].push(i);
        }
        Self { by_row, by_col }
    }
}
