//! Data-parallel versions of the solver phases.
//!
//! Every kernel reads the problem, allocation and potentials as shared
//! data and writes only into the region it was handed: a contiguous block
//! of delta rows, a contiguous block of allocation rows, or the values of
//! one BFS level collected before they are stored. Joins between phases
//! are the only synchronization.

use super::config::PhaseParallelism;
use crate::basis::Allocation;
use crate::error::{Result, TransportError};
use crate::model::TransportProblem;
use crate::modi::cycle::{Chain, Sign};
use crate::modi::evaluator::{evaluate_rows, EnteringCell, Evaluation, OpportunityCosts};
use crate::modi::pivot::{repair_degeneracy, shifted, PivotOutcome};
use crate::modi::potentials::{BasisAdjacency, Potentials};
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

/// Builds a fixed-size worker pool.
pub(crate) fn build_pool(workers: usize) -> Result<ThreadPool> {
    ThreadPoolBuilder::new()
        .num_threads(workers)
        .build()
        .map_err(|e| TransportError::ThreadPool(e.to_string()))
}

/// Runs `f` on `pool`, turning a worker panic into an error.
pub(crate) fn install<T, F>(pool: &ThreadPool, f: F) -> Result<T>
where
    T: Send,
    F: FnOnce() -> T + Send,
{
    panic::catch_unwind(AssertUnwindSafe(|| pool.install(f)))
        .map_err(|payload| TransportError::WorkerPanicked(panic_message(&*payload)))
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

/// Breadth-first potentials, one parallel fan-out per tree level.
///
/// In a spanning tree every node outside the visited set has exactly one
/// neighbour in the current frontier, so each level's values can be
/// computed independently and stored after the level joins.
pub fn potentials_by_level(
    pool: &ThreadPool,
    parallel: &PhaseParallelism,
    problem: &TransportProblem,
    allocation: &Allocation,
) -> Result<Potentials> {
    let adjacency = BasisAdjacency::new(allocation);
    let mut u: Vec<Option<i64>> = vec![None; problem.rows()];
    let mut v: Vec<Option<i64>> = vec![None; problem.cols()];
    u[0] = Some(0);
    let min_len = parallel.min_rows_per_task;

    install(pool, || {
        let mut frontier: Vec<(usize, i64)> = vec![(0, 0)];
        let mut from_rows = true;

        while !frontier.is_empty() {
            let next: Vec<(usize, i64)> = if from_rows {
                let (lists, seen) = (&adjacency.by_row, &v);
                frontier
                    .par_iter()
                    .with_min_len(min_len)
                    .flat_map_iter(move |&(i, ui)| {
                        lists[i]
                            .iter()
                            .filter(move |&&j| seen[j].is_none())
                            .map(move |&j| (j, problem.cost(i, j) - ui))
                    })
                    .collect()
            } else {
                let (lists, seen) = (&adjacency.by_col, &u);
                frontier
                    .par_iter()
                    .with_min_len(min_len)
                    .flat_map_iter(move |&(j, vj)| {
                        lists[j]
                            .iter()
                            .filter(move |&&i| seen[i].is_none())
                            .map(move |&i| (i, problem.cost(i, j) - vj))
                    })
                    .collect()
            };

            // Level barrier: store the new values, then they form the next frontier.
            let slots = if from_rows { &mut v } else { &mut u };
            frontier = next
                .into_iter()
                .filter(|&(k, value)| {
                    if slots[k].is_some() {
                        return false;
                    }
                    slots[k] = Some(value);
                    true
                })
                .collect();
            from_rows = !from_rows;
        }
    })?;

    Potentials::from_partial(u, v)
}

/// Opportunity costs over contiguous row chunks, one chunk per task.
///
/// Each task returns its own most negative cell; the reduction applies the
/// same `(delta, row, col)` order as the sequential scan, so the entering
/// cell does not depend on the chunking.
pub fn evaluate_chunked(
    pool: &ThreadPool,
    parallel: &PhaseParallelism,
    problem: &TransportProblem,
    allocation: &Allocation,
    potentials: &Potentials,
    deltas: &mut OpportunityCosts,
) -> Result<Evaluation> {
    debug_assert_eq!(
        (allocation.rows(), allocation.cols()),
        (problem.rows(), problem.cols()),
        "allocation shape does not match problem"
    );
    let chunk_rows = parallel.rows_per_chunk(problem.rows());
    let chunk_len = chunk_rows * problem.cols();

    let entering = install(pool, || {
        deltas
            .values_mut()
            .par_chunks_mut(chunk_len)
            .enumerate()
            .map(|(k, rows)| evaluate_rows(problem, allocation, potentials, k * chunk_rows, rows))
            .reduce(|| None, EnteringCell::better)
    })?;

    Ok(Evaluation {
        optimal: entering.is_none(),
        entering,
    })
}

/// Pivot with the cycle cells applied by the worker owning their row.
///
/// Cycle cells are distinct coordinates and each row block belongs to one
/// task, so writes never overlap. Degeneracy repair runs after the join.
pub fn pivot_by_rows(
    pool: &ThreadPool,
    parallel: &PhaseParallelism,
    problem: &TransportProblem,
    allocation: &mut Allocation,
    chain: &Chain,
) -> Result<PivotOutcome> {
    debug_assert_eq!(
        (allocation.rows(), allocation.cols()),
        (problem.rows(), problem.cols()),
        "allocation shape does not match problem"
    );
    let (m, n) = (problem.rows(), problem.cols());
    let theta = chain.theta();
    let chunk_rows = parallel.rows_per_chunk(m);

    let mut updates: Vec<Vec<(usize, Sign)>> = vec![Vec::new(); m];
    for e in chain.elements() {
        updates[e.row].push((e.col, e.sign));
    }

    let (change, mut leaving) = install(pool, || {
        allocation
            .cells_mut()
            .par_chunks_mut(chunk_rows * n)
            .zip(updates.par_chunks(chunk_rows))
            .enumerate()
            .map(|(k, (cells, row_updates))| {
                let mut change = 0isize;
                let mut leaving = Vec::new();
                for (offset, (row, ups)) in cells.chunks_mut(n).zip(row_updates).enumerate() {
                    let i = k * chunk_rows + offset;
                    for &(j, sign) in ups {
                        let before = row[j];
                        let after = shifted(before, sign, theta);
                        match (before.is_basic(), after.is_basic()) {
                            (false, true) => change += 1,
                            (true, false) => {
                                change -= 1;
                                leaving.push((i, j));
                            }
                            _ => {}
                        }
                        row[j] = after;
                    }
                }
                (change, leaving)
            })
            .reduce(
                || (0, Vec::new()),
                |(a, mut left), (b, right)| {
                    left.extend(right);
                    (a + b, left)
                },
            )
    })?;
    allocation.shift_basic_count(change);

    let promoted = repair_degeneracy(problem, allocation, chain);
    leaving.retain(|cell| !promoted.contains(cell));

    Ok(PivotOutcome {
        theta,
        leaving,
        promoted,
    })
}
