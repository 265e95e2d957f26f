//! # Pivotal
//!
//! Parallel Gaussian-elimination determinants for dense square matrices.
//!
//! Pivotal computes determinants with partial pivoting three ways — a
//! sequential engine, dynamically scheduled row blocks behind a
//! concurrency gate, and a barrier-synchronized static partition — and
//! ships a harness that measures the speedup and efficiency of the
//! parallel runs.
//!
//! ## Quick Start
//!
//! ```
//! use pivotal::prelude::*;
//!
//! let m = SquareMatrix::from_rows(vec![
//!     vec![6.0, 1.0, 1.0],
//!     vec![4.0, -2.0, 5.0],
//!     vec![2.0, 8.0, 7.0],
//! ]);
//!
//! let sequential = determinant(&m);
//! let parallel = determinant_parallel(&m, 4);
//! assert!((sequential - (-306.0)).abs() < 1e-9);
//! assert!((sequential - parallel).abs() < 1e-9);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub use pivotal_det as det;
pub use pivotal_matrix as matrix;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use pivotal_det::{
        benchmark, determinant, determinant_parallel, BenchmarkResult, EngineConfig, Strategy,
    };
    pub use pivotal_matrix::SquareMatrix;
}
