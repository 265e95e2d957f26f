//! # pivotal-matrix
//!
//! Dense square matrix container for the Pivotal determinant engines.
//!
//! This crate provides:
//! - [`SquareMatrix`]: row-major `f64` storage with row-level operations
//! - Random integer-valued fill for generating benchmark inputs
//! - Text-file persistence (size header followed by row-major entries)
//!
//! The determinant engines only ever borrow a matrix; they copy it into
//! their own scratch storage and never mutate caller data.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod dense;
pub mod io;

pub use dense::SquareMatrix;
pub use io::{load_matrix, save_matrix, MatrixIoError, MAX_LOAD_SIZE};
