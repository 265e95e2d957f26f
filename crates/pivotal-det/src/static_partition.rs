//! Statically partitioned elimination with persistent barrier-synced
//! workers.
//!
//! A fixed set of workers is spawned once per call and lives across every
//! pivot column. Worker 0 selects and swaps the pivot row; two barrier
//! rendezvous per column order the phases: no worker reads the pivot
//! entry until the swap and the degeneracy verdict are published (A), and
//! no worker advances the pivot index until every row update of the
//! current column has landed (B). Row ranges are recomputed each column
//! so the shrinking tail below the pivot stays evenly spread over the
//! workers.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Condvar, Mutex, PoisonError};
use std::thread;

use pivotal_matrix::SquareMatrix;

use crate::barrier::CycleBarrier;
use crate::grid::{eliminate_rows, pivot_search, ScratchGrid};
use crate::sequential;
use crate::strategy::EngineConfig;
use crate::SINGULARITY_TOLERANCE;

/// Computes the determinant with the static-partition strategy.
///
/// Falls back to the sequential engine when the matrix is smaller than
/// `config.static_threshold` (per-call thread start-up dominates small
/// problems), when the thread budget is one, or when a worker thread
/// cannot be spawned. Returns `0.0` for invalid and singular inputs.
#[must_use]
pub fn determinant_static(matrix: &SquareMatrix, config: &EngineConfig) -> f64 {
    if !matrix.is_valid() {
        return 0.0;
    }
    let n = matrix.size();
    if n < config.static_threshold.max(2) || config.max_threads <= 1 {
        return sequential::determinant(matrix);
    }
    let workers = config.max_threads.min(n - 1);
    if workers <= 1 {
        return sequential::determinant(matrix);
    }

    let grid = ScratchGrid::from_matrix(matrix);
    let barrier = CycleBarrier::new(workers);
    let stop = AtomicBool::new(false);
    let swaps = AtomicUsize::new(0);
    let launch = StartLatch::new();

    let mut spawned_all = true;
    thread::scope(|scope| {
        for worker_id in 1..workers {
            let ctx = WorkerContext {
                grid: &grid,
                barrier: &barrier,
                stop: &stop,
                swaps: &swaps,
                worker_id,
                workers,
            };
            let launch = &launch;
            let spawned = thread::Builder::new()
                .name(format!("static-elim-{worker_id}"))
                .spawn_scoped(scope, move || {
                    if launch.wait() {
                        run_worker(&ctx);
                    }
                });
            if spawned.is_err() {
                spawned_all = false;
                break;
            }
        }
        if spawned_all {
            launch.open(true);
            run_worker(&WorkerContext {
                grid: &grid,
                barrier: &barrier,
                stop: &stop,
                swaps: &swaps,
                worker_id: 0,
                workers,
            });
        } else {
            // Peers are still parked on the latch and have not touched
            // the barrier; send them home.
            launch.open(false);
        }
    });

    if !spawned_all {
        return sequential::determinant(matrix);
    }
    if stop.load(Ordering::SeqCst) {
        return 0.0;
    }

    // The determinant is assembled once, after every worker has joined:
    // diagonal product times swap parity, with the tolerance applied to
    // the one diagonal entry the elimination loop never pivoted on.
    let rows = grid.into_rows();
    let mut det = 1.0;
    for (i, row) in rows.iter().enumerate() {
        let d = row[i];
        if d.abs() < SINGULARITY_TOLERANCE {
            return 0.0;
        }
        det *= d;
    }
    if swaps.load(Ordering::SeqCst) % 2 == 0 {
        det
    } else {
        -det
    }
}

struct WorkerContext<'a> {
    grid: &'a ScratchGrid,
    barrier: &'a CycleBarrier,
    stop: &'a AtomicBool,
    swaps: &'a AtomicUsize,
    worker_id: usize,
    workers: usize,
}

/// Static row slice of `k + 1..n` for one worker, recomputed every
/// column: the first `remaining % workers` workers take one extra row,
/// so the ranges partition the tail exactly.
fn row_range(worker_id: usize, workers: usize, k: usize, n: usize) -> (usize, usize) {
    let remaining = n - k - 1;
    let base = remaining / workers;
    let extra = remaining % workers;
    let start = k + 1 + worker_id * base + worker_id.min(extra);
    let len = base + usize::from(worker_id < extra);
    (start, start + len)
}

fn run_worker(ctx: &WorkerContext<'_>) {
    let n = ctx.grid.size();
    for k in 0..n - 1 {
        if ctx.worker_id == 0 {
            // SAFETY: peers are parked between rendezvous B and A and do
            // not touch the grid while worker 0 pivots.
            unsafe {
                let max_row = pivot_search(ctx.grid, k);
                if max_row != k {
                    ctx.grid.swap_rows(k, max_row);
                    ctx.swaps.fetch_add(1, Ordering::SeqCst);
                }
                if ctx.grid.row(k)[k].abs() < SINGULARITY_TOLERANCE {
                    ctx.stop.store(true, Ordering::SeqCst);
                }
            }
        }

        // Rendezvous A: the pivot swap and the stop flag are visible to
        // every worker past this point.
        ctx.barrier.wait();
        if ctx.stop.load(Ordering::SeqCst) {
            // All workers observe the same flag for this column and
            // leave together.
            break;
        }

        let (start, end) = row_range(ctx.worker_id, ctx.workers, k, n);
        if start < end {
            // SAFETY: ranges of distinct workers partition `k + 1..n`
            // and never contain pivot row `k`.
            unsafe { eliminate_rows(ctx.grid, k, start, end) };
        }

        // Rendezvous B: every row update for column `k` has landed
        // before any worker advances the pivot index.
        ctx.barrier.wait();
    }
}

/// One-shot go/abort signal that parks spawned peers until every spawn
/// has been resolved, so a failed spawn can abort the call before any
/// peer reaches the barrier.
struct StartLatch {
    decision: Mutex<Option<bool>>,
    decided: Condvar,
}

impl StartLatch {
    fn new() -> Self {
        Self {
            decision: Mutex::new(None),
            decided: Condvar::new(),
        }
    }

    fn open(&self, run: bool) {
        let mut decision = self.decision.lock().unwrap_or_else(PoisonError::into_inner);
        *decision = Some(run);
        self.decided.notify_all();
    }

    fn wait(&self) -> bool {
        let mut decision = self.decision.lock().unwrap_or_else(PoisonError::into_inner);
        loop {
            if let Some(run) = *decision {
                return run;
            }
            decision = self
                .decided
                .wait(decision)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn random_matrix(size: usize, seed: u64) -> SquareMatrix {
        let mut m = SquareMatrix::zeros(size);
        m.fill_random(-10, 10, &mut ChaCha8Rng::seed_from_u64(seed));
        m
    }

    /// Threshold lowered so the parallel path runs on test-sized inputs.
    fn config(max_threads: usize) -> EngineConfig {
        EngineConfig {
            max_threads,
            static_threshold: 2,
            ..EngineConfig::default()
        }
    }

    fn assert_close(a: f64, b: f64) {
        let scale = a.abs().max(b.abs()).max(1.0);
        assert!((a - b).abs() <= 1e-6 * scale, "{a} != {b}");
    }

    #[test]
    fn test_matches_sequential() {
        for size in [4, 7, 16, 33] {
            let m = random_matrix(size, u64::try_from(size).unwrap());
            let expected = sequential::determinant(&m);
            for threads in [1, 2, 4, 8] {
                assert_close(determinant_static(&m, &config(threads)), expected);
            }
        }
    }

    #[test]
    fn test_textbook_three_by_three() {
        let m = SquareMatrix::from_rows(vec![
            vec![6.0, 1.0, 1.0],
            vec![4.0, -2.0, 5.0],
            vec![2.0, 8.0, 7.0],
        ]);
        for threads in [1, 2, 4, 8] {
            assert_close(determinant_static(&m, &config(threads)), -306.0);
        }
    }

    #[test]
    fn test_identity() {
        assert_close(
            determinant_static(&SquareMatrix::identity(16), &config(4)),
            1.0,
        );
    }

    #[test]
    fn test_singular_sets_stop() {
        let mut m = random_matrix(12, 9);
        let dup: Vec<f64> = m.row(1).to_vec();
        m.row_mut(10).copy_from_slice(&dup);
        assert_eq!(determinant_static(&m, &config(4)), 0.0);
    }

    #[test]
    fn test_more_threads_than_rows() {
        let m = random_matrix(5, 21);
        assert_close(
            determinant_static(&m, &config(32)),
            sequential::determinant(&m),
        );
    }

    #[test]
    fn test_small_sizes_fall_back() {
        // Size 2 leaves a single worker, which is the sequential path.
        let m = SquareMatrix::from_rows(vec![vec![1.0, 2.0], vec![3.0, 4.0]]);
        assert_eq!(determinant_static(&m, &config(8)), -2.0);
    }

    #[test]
    fn test_invalid_matrix() {
        assert_eq!(determinant_static(&SquareMatrix::zeros(0), &config(4)), 0.0);
    }

    #[test]
    fn test_row_ranges_partition_exactly() {
        for workers in 1..=6 {
            let n = 10;
            for k in 0..n - 1 {
                let mut next = k + 1;
                for id in 0..workers {
                    let (start, end) = row_range(id, workers, k, n);
                    assert_eq!(start, next);
                    next = end;
                }
                assert_eq!(next, n);
            }
        }
    }
}
