//! Dense row-major cost matrix produced by one alignment.

use std::ops::Index;

/// An `n_rows × n_cols` matrix of non-negative costs.
///
/// Row `i` corresponds to frame `i` of the first sequence, column `j` to
/// frame `j` of the second. For a cumulative matrix, entry `(i, j)` is the
/// minimum cost of aligning the first `i + 1` frames with the first `j + 1`.
#[derive(Debug, Clone, PartialEq)]
pub struct CostMatrix {
    n_rows: usize,
    n_cols: usize,
    data: Vec<f64>,
}

impl CostMatrix {
    /// Create a matrix from row-major data.
    ///
    /// `data` must contain exactly `n_rows * n_cols` elements.
    pub(crate) fn from_raw(n_rows: usize, n_cols: usize, data: Vec<f64>) -> Self {
        debug_assert_eq!(data.len(), n_rows * n_cols);
        Self { n_rows, n_cols, data }
    }

    /// Return the number of rows (frames of the first sequence).
    #[must_use]
    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    /// Return the number of columns (frames of the second sequence).
    #[must_use]
    pub fn n_cols(&self) -> usize {
        self.n_cols
    }

    /// Return the entry at `(i, j)`.
    ///
    /// # Panics
    ///
    /// Panics if `i >= n_rows` or `j >= n_cols`.
    #[must_use]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        assert!(i < self.n_rows, "row index {i} out of bounds for {} rows", self.n_rows);
        assert!(j < self.n_cols, "column index {j} out of bounds for {} columns", self.n_cols);
        self.data[i * self.n_cols + j]
    }

    /// Return row `i` as a slice.
    ///
    /// # Panics
    ///
    /// Panics if `i >= n_rows`.
    #[must_use]
    pub fn row(&self, i: usize) -> &[f64] {
        assert!(i < self.n_rows, "row index {i} out of bounds for {} rows", self.n_rows);
        &self.data[i * self.n_cols..(i + 1) * self.n_cols]
    }

    /// Iterate over the rows in order.
    pub fn rows(&self) -> impl Iterator<Item = &[f64]> + '_ {
        self.data.chunks_exact(self.n_cols)
    }

    /// Return the bottom-right entry, the total alignment cost of a cumulative matrix.
    #[must_use]
    pub fn final_cost(&self) -> f64 {
        self.data[self.data.len() - 1]
    }

    /// Return the row-major data.
    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Copy the matrix into nested row vectors.
    #[must_use]
    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        self.rows().map(<[f64]>::to_vec).collect()
    }
}

impl Index<(usize, usize)> for CostMatrix {
    type Output = f64;

    fn index(&self, (i, j): (usize, usize)) -> &Self::Output {
        assert!(i < self.n_rows && j < self.n_cols, "index ({i}, {j}) out of bounds");
        &self.data[i * self.n_cols + j]
    }
}
