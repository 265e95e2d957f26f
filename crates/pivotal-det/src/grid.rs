//! Shared scratch grid for the parallel elimination engines.
//!
//! One elimination call owns one grid; worker threads reach rows through
//! unsafe accessors. The engines are responsible for handing out
//! non-overlapping rows per phase — a block partition joined at the end
//! of each pivot column, or a barrier-fenced static partition — and every
//! call site records that argument next to the access.
//!
//! Rows are boxed individually so a pivot swap exchanges two `Vec`
//! headers instead of copying entries.

use std::cell::UnsafeCell;

use pivotal_matrix::SquareMatrix;

/// Row-major working copy with interior mutability, shared read/write by
/// the worker threads of a single elimination call.
pub(crate) struct ScratchGrid {
    rows: UnsafeCell<Vec<Vec<f64>>>,
    size: usize,
}

// Workers only touch disjoint rows between synchronization points; the
// engines own the partitioning.
unsafe impl Sync for ScratchGrid {}

impl ScratchGrid {
    pub(crate) fn from_matrix(matrix: &SquareMatrix) -> Self {
        Self {
            rows: UnsafeCell::new(matrix.to_rows()),
            size: matrix.size(),
        }
    }

    pub(crate) fn size(&self) -> usize {
        self.size
    }

    /// # Safety
    ///
    /// No other thread may hold a mutable reference to row `i`.
    pub(crate) unsafe fn row(&self, i: usize) -> &[f64] {
        &(&*self.rows.get())[i]
    }

    /// # Safety
    ///
    /// No other thread may hold any reference to row `i`.
    #[allow(clippy::mut_from_ref)]
    pub(crate) unsafe fn row_mut(&self, i: usize) -> &mut [f64] {
        &mut (&mut *self.rows.get())[i]
    }

    /// # Safety
    ///
    /// No other thread may hold a reference to row `i` or row `j`.
    pub(crate) unsafe fn swap_rows(&self, i: usize, j: usize) {
        (*self.rows.get()).swap(i, j);
    }

    /// Consumes the grid after every worker has joined.
    pub(crate) fn into_rows(self) -> Vec<Vec<f64>> {
        self.rows.into_inner()
    }
}

/// Index of the largest-magnitude entry of column `k` at or below row
/// `k`. Ties go to the lowest row index.
///
/// # Safety
///
/// No other thread may mutate rows `k..size` during the search.
pub(crate) unsafe fn pivot_search(grid: &ScratchGrid, k: usize) -> usize {
    let n = grid.size();
    let mut max_row = k;
    for i in (k + 1)..n {
        if grid.row(i)[k].abs() > grid.row(max_row)[k].abs() {
            max_row = i;
        }
    }
    max_row
}

/// Eliminates rows `start..end` against pivot row `k`: each row gets
/// `(row[k] / pivot) * pivot_row` subtracted over columns `k + 1..n`.
/// Column `k` itself is never read again and is left untouched.
///
/// # Safety
///
/// Rows `start..end` must be exclusively owned by the calling thread for
/// the duration of the call, and row `k` must be outside `start..end`
/// and stable (no concurrent writer).
pub(crate) unsafe fn eliminate_rows(grid: &ScratchGrid, k: usize, start: usize, end: usize) {
    debug_assert!(start > k);
    let n = grid.size();
    let pivot_row = grid.row(k);
    let pivot = pivot_row[k];
    for i in start..end {
        let row = grid.row_mut(i);
        let factor = row[k] / pivot;
        for j in (k + 1)..n {
            row[j] -= factor * pivot_row[j];
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        let m = SquareMatrix::from_rows(vec![vec![1.0, 2.0], vec![3.0, 4.0]]);
        let grid = ScratchGrid::from_matrix(&m);
        assert_eq!(grid.size(), 2);
        assert_eq!(grid.into_rows(), vec![vec![1.0, 2.0], vec![3.0, 4.0]]);
    }

    #[test]
    fn test_pivot_search_prefers_largest_magnitude() {
        let m = SquareMatrix::from_rows(vec![
            vec![1.0, 0.0, 0.0],
            vec![-9.0, 1.0, 0.0],
            vec![4.0, 0.0, 1.0],
        ]);
        let grid = ScratchGrid::from_matrix(&m);
        assert_eq!(unsafe { pivot_search(&grid, 0) }, 1);
    }

    #[test]
    fn test_pivot_search_tie_takes_lowest_row() {
        let m = SquareMatrix::from_rows(vec![
            vec![2.0, 0.0, 0.0],
            vec![-2.0, 1.0, 0.0],
            vec![2.0, 0.0, 1.0],
        ]);
        let grid = ScratchGrid::from_matrix(&m);
        assert_eq!(unsafe { pivot_search(&grid, 0) }, 0);
    }

    #[test]
    fn test_eliminate_rows_zeroes_below_pivot() {
        let m = SquareMatrix::from_rows(vec![
            vec![2.0, 1.0, 1.0],
            vec![4.0, 3.0, 3.0],
            vec![8.0, 7.0, 9.0],
        ]);
        let grid = ScratchGrid::from_matrix(&m);
        unsafe { eliminate_rows(&grid, 0, 1, 3) };
        let rows = grid.into_rows();
        // Columns past the pivot carry the eliminated values; column 0 is
        // never read again and keeps its stale entries.
        assert_eq!(rows[1][1..], [1.0, 1.0]);
        assert_eq!(rows[2][1..], [3.0, 5.0]);
    }
}
