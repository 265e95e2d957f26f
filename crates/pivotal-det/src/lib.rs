//! # pivotal-det
//!
//! Determinant engines for dense square matrices: Gaussian elimination
//! with partial pivoting, run sequentially or across a bounded set of
//! worker threads.
//!
//! This crate provides:
//! - [`sequential::determinant`]: single-threaded elimination with
//!   size-1/size-2 fast paths
//! - [`block::BlockEngine`]: per-pivot-column row blocks on worker
//!   threads admitted through a counting gate
//! - [`static_partition::determinant_static`]: persistent workers with
//!   barrier-synchronized pivot steps
//! - [`benchmark::benchmark`]: sequential-vs-parallel timing with
//!   speedup and efficiency metrics
//!
//! [`determinant_parallel`] picks a strategy from the matrix size and the
//! requested thread count; the thresholds are adjustable through
//! [`EngineConfig`]. All engines copy the input into their own scratch
//! storage, treat a zero-size matrix as determinant `0.0`, and report a
//! singular matrix as `0.0` rather than an error.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod barrier;
pub mod benchmark;
pub mod block;
pub mod gate;
mod grid;
pub mod sequential;
pub mod static_partition;
pub mod strategy;

pub use barrier::CycleBarrier;
pub use benchmark::{benchmark, benchmark_with, BenchmarkConfig, BenchmarkResult};
pub use block::{determinant_block, BlockEngine};
pub use gate::{ConcurrencyGate, GatePermit};
pub use sequential::determinant;
pub use static_partition::determinant_static;
pub use strategy::{determinant_parallel, determinant_with, EngineConfig, Strategy};

/// Pivot magnitudes below this are treated as zero and the matrix as
/// singular. One tolerance is shared by every engine so their singularity
/// verdicts agree.
pub const SINGULARITY_TOLERANCE: f64 = 1e-10;
