//! Single-threaded partial-pivot Gaussian elimination.
//!
//! The engine copies the input into scratch rows, then for each pivot
//! column selects the largest-magnitude candidate row, swaps it up,
//! accumulates the pivot into the running product and eliminates the
//! rows below. Singular inputs short-circuit to `0.0` as soon as a pivot
//! falls under the tolerance.

use pivotal_matrix::SquareMatrix;

use crate::SINGULARITY_TOLERANCE;

/// Computes the determinant of `matrix`.
///
/// Returns `0.0` for an invalid (zero-size) matrix and for singular
/// matrices (every candidate pivot below [`SINGULARITY_TOLERANCE`]).
/// Sizes 1 and 2 are closed-form fast paths with no pivoting overhead.
#[must_use]
pub fn determinant(matrix: &SquareMatrix) -> f64 {
    if !matrix.is_valid() {
        return 0.0;
    }
    let n = matrix.size();
    if n == 1 {
        return matrix[(0, 0)];
    }
    if n == 2 {
        return matrix[(0, 0)] * matrix[(1, 1)] - matrix[(0, 1)] * matrix[(1, 0)];
    }

    let mut rows = matrix.to_rows();
    let mut det = 1.0;
    let mut swaps = 0usize;

    for k in 0..n {
        let mut max_row = k;
        for i in (k + 1)..n {
            if rows[i][k].abs() > rows[max_row][k].abs() {
                max_row = i;
            }
        }
        if max_row != k {
            rows.swap(k, max_row);
            swaps += 1;
        }

        let pivot = rows[k][k];
        if pivot.abs() < SINGULARITY_TOLERANCE {
            return 0.0;
        }
        det *= pivot;

        let (head, tail) = rows.split_at_mut(k + 1);
        let pivot_row = &head[k];
        for row in tail {
            let factor = row[k] / pivot;
            for j in (k + 1)..n {
                row[j] -= factor * pivot_row[j];
            }
        }
    }

    if swaps % 2 == 0 {
        det
    } else {
        -det
    }
}
