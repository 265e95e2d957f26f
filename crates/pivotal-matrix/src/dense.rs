//! Dense square matrix stored in row-major order.
//!
//! The container is deliberately dumb: it owns a grid of reals and offers
//! row-level operations, nothing else. Elimination lives in `pivotal-det`.

use std::ops::{Index, IndexMut};

use rand::Rng;

/// Square matrix of `f64` entries in row-major order.
#[derive(Debug, Clone, PartialEq)]
pub struct SquareMatrix {
    /// Matrix entries in row-major order.
    data: Vec<f64>,
    /// Number of rows (and columns).
    size: usize,
}

impl SquareMatrix {
    /// Creates a new matrix filled with zeros.
    #[must_use]
    pub fn zeros(size: usize) -> Self {
        Self {
            data: vec![0.0; size * size],
            size,
        }
    }

    /// Creates an identity matrix.
    #[must_use]
    pub fn identity(size: usize) -> Self {
        let mut m = Self::zeros(size);
        for i in 0..size {
            m[(i, i)] = 1.0;
        }
        m
    }

    /// Creates a matrix from a vector of rows.
    ///
    /// # Panics
    ///
    /// Panics if any row's length differs from the number of rows.
    #[must_use]
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Self {
        let size = rows.len();
        let mut data = Vec::with_capacity(size * size);
        for row in &rows {
            assert_eq!(row.len(), size, "matrix rows must all have length {size}");
            data.extend_from_slice(row);
        }
        Self { data, size }
    }

    /// Returns the number of rows (and columns).
    #[must_use]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Checks that the matrix has at least one row and that its storage
    /// matches its declared shape.
    ///
    /// The zero-size matrix is the degenerate case; every determinant
    /// engine maps it to `0.0` instead of panicking.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.size > 0 && self.data.len() == self.size * self.size
    }

    /// Returns a reference to the entry at (row, col).
    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> Option<&f64> {
        if row < self.size && col < self.size {
            Some(&self.data[row * self.size + col])
        } else {
            None
        }
    }

    /// Returns a mutable reference to the entry at (row, col).
    pub fn get_mut(&mut self, row: usize, col: usize) -> Option<&mut f64> {
        if row < self.size && col < self.size {
            Some(&mut self.data[row * self.size + col])
        } else {
            None
        }
    }

    /// Returns a slice of the specified row.
    #[must_use]
    pub fn row(&self, row: usize) -> &[f64] {
        let start = row * self.size;
        &self.data[start..start + self.size]
    }

    /// Returns a mutable slice of the specified row.
    pub fn row_mut(&mut self, row: usize) -> &mut [f64] {
        let start = row * self.size;
        &mut self.data[start..start + self.size]
    }

    /// Swaps two rows in-place.
    pub fn swap_rows(&mut self, i: usize, j: usize) {
        if i == j {
            return;
        }
        let i_start = i * self.size;
        let j_start = j * self.size;
        for k in 0..self.size {
            self.data.swap(i_start + k, j_start + k);
        }
    }

    /// Scales a row by a scalar.
    pub fn scale_row(&mut self, row: usize, scale: f64) {
        for value in self.row_mut(row) {
            *value *= scale;
        }
    }

    /// Fills the matrix with uniformly drawn integer values in
    /// `[min, max)`, stored as reals. Does nothing unless `min < max`.
    #[allow(clippy::cast_precision_loss)]
    pub fn fill_random<R: Rng>(&mut self, min: i64, max: i64, rng: &mut R) {
        if min >= max {
            return;
        }
        for value in &mut self.data {
            *value = rng.gen_range(min..max) as f64;
        }
    }

    /// Copies the entries into one owned `Vec` per row.
    ///
    /// This is the scratch-copy entry point for the elimination engines:
    /// the copy owns its storage, so an engine never aliases the matrix
    /// it was handed.
    #[must_use]
    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        if self.size == 0 {
            return Vec::new();
        }
        self.data.chunks(self.size).map(<[f64]>::to_vec).collect()
    }
}

impl Index<(usize, usize)> for SquareMatrix {
    type Output = f64;

    fn index(&self, (row, col): (usize, usize)) -> &Self::Output {
        &self.data[row * self.size + col]
    }
}

impl IndexMut<(usize, usize)> for SquareMatrix {
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut Self::Output {
        &mut self.data[row * self.size + col]
    }
}
