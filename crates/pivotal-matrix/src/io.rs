//! Text-file persistence for square matrices.
//!
//! Format: the first token is the matrix size `n`, followed by `n * n`
//! whitespace-separated real numbers in row-major order. Writers emit one
//! row per line; readers accept any whitespace layout.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::dense::SquareMatrix;

/// Largest matrix size accepted from a file.
pub const MAX_LOAD_SIZE: usize = 50;

/// Errors raised while loading or saving a matrix file.
#[derive(Debug, Error)]
pub enum MatrixIoError {
    /// Underlying file system failure.
    #[error("matrix file I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// The file did not start with a parseable size.
    #[error("missing or malformed matrix size header")]
    MalformedSize,

    /// The size header was outside the accepted range.
    #[error("matrix size {0} out of range (expected 1..={MAX_LOAD_SIZE})")]
    SizeOutOfRange(usize),

    /// The file ended before all entries were read.
    #[error("matrix file truncated: expected {expected} entries, found {found}")]
    Truncated {
        /// Number of entries the size header promised.
        expected: usize,
        /// Number of entries actually present.
        found: usize,
    },

    /// An entry could not be parsed as a real number.
    #[error("malformed entry at row {row}, column {col}: {token:?}")]
    MalformedEntry {
        /// Zero-based row of the bad entry.
        row: usize,
        /// Zero-based column of the bad entry.
        col: usize,
        /// The offending token.
        token: String,
    },

    /// Refused to write a zero-size matrix.
    #[error("cannot save an invalid (zero-size) matrix")]
    InvalidMatrix,
}

/// Loads a matrix from a text file.
///
/// The size header is capped at [`MAX_LOAD_SIZE`]; the cap belongs to the
/// loader, not to the determinant engines.
pub fn load_matrix(path: impl AsRef<Path>) -> Result<SquareMatrix, MatrixIoError> {
    let text = fs::read_to_string(path)?;
    parse_matrix(&text)
}

/// Saves a matrix to a text file, one row per line, six-decimal entries.
pub fn save_matrix(matrix: &SquareMatrix, path: impl AsRef<Path>) -> Result<(), MatrixIoError> {
    if !matrix.is_valid() {
        return Err(MatrixIoError::InvalidMatrix);
    }
    let size = matrix.size();
    let mut out = String::new();
    let _ = writeln!(out, "{size}");
    for row in 0..size {
        let line = matrix
            .row(row)
            .iter()
            .map(|v| format!("{v:.6}"))
            .collect::<Vec<_>>()
            .join(" ");
        let _ = writeln!(out, "{line}");
    }
    fs::write(path, out)?;
    Ok(())
}

fn parse_matrix(text: &str) -> Result<SquareMatrix, MatrixIoError> {
    let mut tokens = text.split_whitespace();

    let size: usize = tokens
        .next()
        .ok_or(MatrixIoError::MalformedSize)?
        .parse()
        .map_err(|_| MatrixIoError::MalformedSize)?;
    if !(1..=MAX_LOAD_SIZE).contains(&size) {
        return Err(MatrixIoError::SizeOutOfRange(size));
    }

    let mut matrix = SquareMatrix::zeros(size);
    let mut found = 0;
    for row in 0..size {
        for col in 0..size {
            let token = tokens.next().ok_or(MatrixIoError::Truncated {
                expected: size * size,
                found,
            })?;
            let value: f64 = token.parse().map_err(|_| MatrixIoError::MalformedEntry {
                row,
                col,
                token: token.to_string(),
            })?;
            matrix[(row, col)] = value;
            found += 1;
        }
    }

    Ok(matrix)
}
