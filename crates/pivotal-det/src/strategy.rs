//! Strategy selection for the determinant engines.
//!
//! One public surface dispatches over three implementations of the same
//! elimination: sequential, dynamically scheduled row blocks, and the
//! barrier-synchronized static partition. The choice is made from the
//! matrix size and the thread budget, with the cut-over points exposed
//! through [`EngineConfig`] so callers (and tests) can move them.

use std::num::NonZeroUsize;
use std::thread;

use pivotal_matrix::SquareMatrix;

use crate::{block, sequential, static_partition};

/// Elimination strategy run by [`determinant_with`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Strategy {
    /// Single-threaded elimination.
    Sequential,
    /// Per-pivot-column row blocks on gated worker threads.
    DynamicBlock,
    /// Persistent workers with barrier-synchronized pivot steps.
    StaticBarrier,
}

impl Strategy {
    /// Picks a strategy for a matrix of `size` under `config`.
    #[must_use]
    pub fn select(size: usize, config: &EngineConfig) -> Self {
        if config.max_threads <= 1 || size <= config.block_threshold {
            Strategy::Sequential
        } else if size >= config.static_threshold {
            Strategy::StaticBarrier
        } else {
            Strategy::DynamicBlock
        }
    }
}

/// Tuning knobs shared by the parallel engines.
#[derive(Clone, Debug)]
pub struct EngineConfig {
    /// Upper bound on concurrently active worker threads.
    pub max_threads: usize,
    /// Matrices at or below this size always run sequentially.
    pub block_threshold: usize,
    /// Smallest size for the static-partition strategy; per-call thread
    /// start-up dominates below it.
    pub static_threshold: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_threads: default_thread_count(),
            block_threshold: 3,
            static_threshold: 512,
        }
    }
}

impl EngineConfig {
    /// Config with an explicit thread budget and default thresholds.
    /// A zero budget is treated as one.
    #[must_use]
    pub fn with_threads(max_threads: usize) -> Self {
        Self {
            max_threads: max_threads.max(1),
            ..Self::default()
        }
    }
}

fn default_thread_count() -> usize {
    thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(4)
}

/// Computes the determinant with at most `max_threads` worker threads.
///
/// Agrees with [`crate::sequential::determinant`] up to floating-point
/// reduction order; returns `0.0` for invalid and singular inputs.
#[must_use]
pub fn determinant_parallel(matrix: &SquareMatrix, max_threads: usize) -> f64 {
    determinant_with(matrix, &EngineConfig::with_threads(max_threads))
}

/// Computes the determinant under an explicit engine configuration.
#[must_use]
pub fn determinant_with(matrix: &SquareMatrix, config: &EngineConfig) -> f64 {
    match Strategy::select(matrix.size(), config) {
        Strategy::Sequential => sequential::determinant(matrix),
        Strategy::DynamicBlock => block::determinant_block(matrix, config),
        Strategy::StaticBarrier => static_partition::determinant_static(matrix, config),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(max_threads: usize) -> EngineConfig {
        EngineConfig {
            max_threads,
            block_threshold: 3,
            static_threshold: 512,
        }
    }

    #[test]
    fn test_select_sequential_for_one_thread() {
        assert_eq!(Strategy::select(1000, &config(1)), Strategy::Sequential);
    }

    #[test]
    fn test_select_sequential_for_small_matrices() {
        assert_eq!(Strategy::select(3, &config(8)), Strategy::Sequential);
    }

    #[test]
    fn test_select_block_for_medium_matrices() {
        assert_eq!(Strategy::select(4, &config(8)), Strategy::DynamicBlock);
        assert_eq!(Strategy::select(511, &config(8)), Strategy::DynamicBlock);
    }

    #[test]
    fn test_select_static_for_large_matrices() {
        assert_eq!(Strategy::select(512, &config(8)), Strategy::StaticBarrier);
        assert_eq!(Strategy::select(2048, &config(8)), Strategy::StaticBarrier);
    }

    #[test]
    fn test_with_threads_clamps_zero() {
        assert_eq!(EngineConfig::with_threads(0).max_threads, 1);
    }

    #[test]
    fn test_parallel_entry_matches_sequential() {
        let m = SquareMatrix::from_rows(vec![
            vec![6.0, 1.0, 1.0],
            vec![4.0, -2.0, 5.0],
            vec![2.0, 8.0, 7.0],
        ]);
        for threads in [1, 2, 4, 8] {
            let d = determinant_parallel(&m, threads);
            assert!((d - (-306.0)).abs() < 1e-9);
        }
    }
}
