//! Dynamically scheduled block-parallel elimination.
//!
//! The outer pivot loop runs on the calling thread; the row updates below
//! each pivot are split into contiguous blocks and handed to short-lived
//! worker threads admitted through a [`ConcurrencyGate`]. Every block of
//! a column is joined before the next column begins, so the elimination
//! schedule matches the sequential engine operation for operation — only
//! the inner row/column loop is distributed.

use std::thread;

use pivotal_matrix::SquareMatrix;

use crate::gate::ConcurrencyGate;
use crate::grid::{eliminate_rows, pivot_search, ScratchGrid};
use crate::sequential;
use crate::strategy::EngineConfig;
use crate::SINGULARITY_TOLERANCE;

/// Smallest matrix worth the per-column spawn overhead.
const MIN_PARALLEL_SIZE: usize = 4;
/// Smallest number of rows handed to a spawned block.
const MIN_BLOCK_ROWS: usize = 2;

/// Block-parallel elimination engine with a bounded worker gate.
///
/// The gate lives as long as the engine: it is initialized at
/// construction and drained on drop, so no worker slot can leak past the
/// engine's lifetime.
pub struct BlockEngine {
    config: EngineConfig,
    gate: ConcurrencyGate,
}

impl BlockEngine {
    /// Creates an engine admitting at most `config.max_threads` workers
    /// at once.
    #[must_use]
    pub fn new(config: EngineConfig) -> Self {
        let gate = ConcurrencyGate::new(config.max_threads);
        Self { config, gate }
    }

    /// Computes the determinant of `matrix`, distributing each pivot
    /// column's row elimination over gated worker threads.
    ///
    /// Falls back to the sequential engine for matrices of size 3 or
    /// less and for a single-thread budget, where the spawn overhead is
    /// not justified. Returns `0.0` for invalid and singular inputs.
    #[must_use]
    pub fn determinant(&self, matrix: &SquareMatrix) -> f64 {
        if !matrix.is_valid() {
            return 0.0;
        }
        let n = matrix.size();
        if n < MIN_PARALLEL_SIZE || self.config.max_threads <= 1 {
            return sequential::determinant(matrix);
        }

        let grid = ScratchGrid::from_matrix(matrix);
        let mut det = 1.0;
        let mut swaps = 0usize;

        for k in 0..n {
            // SAFETY: all workers of the previous column have joined; the
            // coordinator is the only thread touching the grid here.
            let pivot = unsafe {
                let max_row = pivot_search(&grid, k);
                if max_row != k {
                    grid.swap_rows(k, max_row);
                    swaps += 1;
                }
                grid.row(k)[k]
            };
            if pivot.abs() < SINGULARITY_TOLERANCE {
                return 0.0;
            }
            det *= pivot;

            let first = k + 1;
            let remaining = n - first;
            if remaining == 0 {
                continue;
            }

            let block_rows = remaining
                .div_ceil(self.config.max_threads)
                .max(MIN_BLOCK_ROWS);
            if remaining <= block_rows {
                // Too few rows to farm out.
                // SAFETY: single-threaded between scopes.
                unsafe { eliminate_rows(&grid, k, first, n) };
                continue;
            }

            let grid = &grid;
            thread::scope(|scope| {
                let mut start = first;
                while start < n {
                    let end = (start + block_rows).min(n);
                    let permit = self.gate.acquire();
                    let spawned = thread::Builder::new()
                        .name(format!("block-elim-{start}"))
                        .spawn_scoped(scope, move || {
                            let _permit = permit;
                            // SAFETY: the blocks partition `first..n`, so
                            // rows `start..end` belong to this task alone;
                            // pivot row `k` is only read.
                            unsafe { eliminate_rows(grid, k, start, end) };
                        });
                    if spawned.is_err() {
                        // SAFETY: the task never started; rows
                        // `start..end` still belong to the coordinator.
                        unsafe { eliminate_rows(grid, k, start, end) };
                    }
                    start = end;
                }
                // Leaving the scope joins every block of this column
                // before the next pivot is selected.
            });
        }

        if swaps % 2 == 0 {
            det
        } else {
            -det
        }
    }

    /// The gate bounding this engine's worker concurrency.
    #[must_use]
    pub fn gate(&self) -> &ConcurrencyGate {
        &self.gate
    }
}

impl Drop for BlockEngine {
    fn drop(&mut self) {
        // No worker may outlive the engine.
        self.gate.drain();
    }
}

/// One-call convenience wrapper around [`BlockEngine`].
#[must_use]
pub fn determinant_block(matrix: &SquareMatrix, config: &EngineConfig) -> f64 {
    BlockEngine::new(config.clone()).determinant(matrix)
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

    fn config(max_threads: usize) -> EngineConfig {
        EngineConfig {
            max_threads,
            ..EngineConfig::default()
        }
    }

    fn assert_close(a: f64, b: f64) {
        let scale = a.abs().max(b.abs()).max(1.0);
        assert!((a - b).abs() <= 1e-6 * scale, "{a} != {b}");
    }

    #[test]
    fn test_matches_sequential() {
        for size in [4, 7, 12, 33] {
            let m = random_matrix(size, u64::try_from(size).unwrap());
            let expected = sequential::determinant(&m);
            for threads in [2, 4, 8] {
                assert_close(determinant_block(&m, &config(threads)), expected);
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
            assert_close(determinant_block(&m, &config(threads)), -306.0);
        }
    }

    #[test]
    fn test_identity() {
        let engine = BlockEngine::new(config(4));
        assert_close(engine.determinant(&SquareMatrix::identity(16)), 1.0);
    }

    #[test]
    fn test_singular() {
        let mut m = random_matrix(8, 3);
        let dup: Vec<f64> = m.row(2).to_vec();
        m.row_mut(6).copy_from_slice(&dup);
        assert_eq!(determinant_block(&m, &config(4)), 0.0);
    }

    #[test]
    fn test_invalid_matrix() {
        assert_eq!(determinant_block(&SquareMatrix::zeros(0), &config(4)), 0.0);
    }

    #[test]
    fn test_engine_reuse_and_drain() {
        let engine = BlockEngine::new(config(4));
        let m = random_matrix(10, 11);
        let first = engine.determinant(&m);
        let second = engine.determinant(&m);
        assert_eq!(first, second);
        assert_eq!(engine.gate().active(), 0);
    }
}
