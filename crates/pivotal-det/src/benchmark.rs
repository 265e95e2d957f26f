//! Sequential-vs-parallel timing harness.
//!
//! Runs both engines on independent working copies of the same input,
//! averages a handful of timed repetitions after untimed warm-up rounds
//! (first-call timings are skewed by allocation and cache effects), and
//! derives the classic speedup and efficiency metrics. The two engines
//! reduce in different floating-point orders, so the harness cross-checks
//! their results and warns — never fails — on divergence.

use std::time::{Duration, Instant};

use pivotal_matrix::SquareMatrix;

use crate::sequential;
use crate::strategy::{determinant_with, EngineConfig};

/// Parallel times below this many seconds make the time ratio
/// meaningless; the metrics report zero instead of blowing up.
const TIME_EPSILON: f64 = 1e-9;

/// Timing knobs for [`benchmark_with`].
#[derive(Clone, Debug)]
pub struct BenchmarkConfig {
    /// Untimed runs of each engine before measurement.
    pub warmup_runs: usize,
    /// Timed runs averaged into each reported duration.
    pub timed_runs: usize,
    /// Relative divergence between the engines that triggers a warning.
    pub cross_check_tolerance: f64,
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        Self {
            warmup_runs: 5,
            timed_runs: 10,
            cross_check_tolerance: 1e-6,
        }
    }
}

/// Outcome of one sequential-vs-parallel comparison.
#[derive(Clone, Copy, Debug)]
pub struct BenchmarkResult {
    /// Determinant reported by the parallel engine.
    pub determinant: f64,
    /// Mean sequential wall-clock time.
    pub sequential_time: Duration,
    /// Mean parallel wall-clock time.
    pub parallel_time: Duration,
    /// Time ratio sequential/parallel; `0.0` when the parallel time
    /// underflows the epsilon.
    pub speedup: f64,
    /// Speedup divided by the thread budget; `0.0` under the same
    /// epsilon rule.
    pub efficiency: f64,
    /// Thread budget the parallel engine ran under.
    pub threads_used: usize,
}

impl BenchmarkResult {
    fn degenerate(threads_used: usize) -> Self {
        Self {
            determinant: 0.0,
            sequential_time: Duration::ZERO,
            parallel_time: Duration::ZERO,
            speedup: 0.0,
            efficiency: 0.0,
            threads_used,
        }
    }
}

/// Benchmarks the engines on `matrix` with default timing configuration.
#[must_use]
pub fn benchmark(matrix: &SquareMatrix, max_threads: usize) -> BenchmarkResult {
    benchmark_with(
        matrix,
        &EngineConfig::with_threads(max_threads),
        &BenchmarkConfig::default(),
    )
}

/// Benchmarks the sequential engine against the configured parallel
/// strategy.
///
/// Each call runs on its own scratch copy; neither engine observes the
/// other's state. An invalid matrix yields the all-zero result.
#[must_use]
pub fn benchmark_with(
    matrix: &SquareMatrix,
    engine: &EngineConfig,
    timing: &BenchmarkConfig,
) -> BenchmarkResult {
    if !matrix.is_valid() {
        return BenchmarkResult::degenerate(engine.max_threads);
    }

    for _ in 0..timing.warmup_runs {
        sequential::determinant(matrix);
        determinant_with(matrix, engine);
    }

    #[allow(clippy::cast_possible_truncation)]
    let runs = timing.timed_runs.clamp(1, u32::MAX as usize) as u32;

    let started = Instant::now();
    let mut det_seq = 0.0;
    for _ in 0..runs {
        det_seq = sequential::determinant(matrix);
    }
    let sequential_time = started.elapsed() / runs;

    let started = Instant::now();
    let mut det_par = 0.0;
    for _ in 0..runs {
        det_par = determinant_with(matrix, engine);
    }
    let parallel_time = started.elapsed() / runs;

    cross_check(det_seq, det_par, timing.cross_check_tolerance);

    let (speedup, efficiency) = derive_metrics(
        sequential_time.as_secs_f64(),
        parallel_time.as_secs_f64(),
        engine.max_threads,
    );

    BenchmarkResult {
        determinant: det_par,
        sequential_time,
        parallel_time,
        speedup,
        efficiency,
        threads_used: engine.max_threads,
    }
}

/// Speedup and efficiency, both `0.0` when the parallel time underflows
/// the epsilon or no threads were used.
#[allow(clippy::cast_precision_loss)]
fn derive_metrics(sequential_secs: f64, parallel_secs: f64, threads: usize) -> (f64, f64) {
    if parallel_secs <= TIME_EPSILON || threads == 0 {
        return (0.0, 0.0);
    }
    let speedup = sequential_secs / parallel_secs;
    (speedup, speedup / threads as f64)
}

fn cross_check(det_seq: f64, det_par: f64, tolerance: f64) {
    let divergence = (det_seq - det_par).abs();
    let scale = det_seq.abs().max(det_par.abs());
    let relative = if scale > f64::EPSILON {
        divergence / scale
    } else {
        divergence
    };
    if relative > tolerance {
        log::warn!(
            "sequential and parallel determinants diverge: {det_seq} vs {det_par} \
             (relative error {relative:.3e})"
        );
    }
}
