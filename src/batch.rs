//! # Batches of realizations
//!
//! A noise analysis manipulates `k` realizations of an (n, 2) quantity at once:
//! first `k` perturbed control fields, then the `k` trajectories solved from them.
//! [`RealizationBatch`] stores them side by side in a single (n, 2·k) matrix using
//! a fixed **column-interleaving convention**:
//!
//! ```text
//! column:   0     1     2     3    ...   2i    2i+1   ...
//! content:  x₀    y₀    x₁    y₁   ...   xᵢ    yᵢ     ...
//! ```
//!
//! The convention is private to this module. Generation, solving and statistics
//! only go through the named accessors:
//!
//! * [`RealizationBatch::realization`] / [`RealizationBatch::realization_matrix`] – read realization `i`,
//! * [`RealizationBatch::set_realization`] – write realization `i`,
//! * [`RealizationBatch::axis_ensemble`] – iterate one axis of every realization at a fixed time index.
//!
//! so the layout used for writing and the one used for de-interleaving cannot
//! drift apart.

use nalgebra::{DMatrix, DVectorView};

use crate::{
    constants::{Axis, PathMatrix, N_AXES},
    noise_errors::NoiseError,
};

/// Column of `axis` for realization `index`.
#[inline]
fn column_of(index: usize, axis: Axis) -> usize {
    N_AXES * index + axis.column()
}

/// `k` realizations of an (n, 2) path or field, stored column-interleaved.
#[derive(Debug, Clone, PartialEq)]
pub struct RealizationBatch {
    data: DMatrix<f64>,
}

impl RealizationBatch {
    /// A zero-filled batch of `n_realizations` realizations with `n_points` rows each.
    pub fn zeros(n_points: usize, n_realizations: usize) -> Self {
        RealizationBatch {
            data: DMatrix::zeros(n_points, N_AXES * n_realizations),
        }
    }

    /// Stack (n, 2) realizations in order.
    ///
    /// Arguments
    /// -----------------
    /// * `n_points`: number of rows every realization must have.
    /// * `realizations`: the realizations, realization `i` being the `i`-th item.
    ///
    /// Return
    /// ----------
    /// * The batch, or [`NoiseError::InvalidInput`] if any item is not (n_points, 2).
    pub fn from_realizations<I>(n_points: usize, realizations: I) -> Result<Self, NoiseError>
    where
        I: IntoIterator<Item = PathMatrix>,
    {
        let realizations: Vec<PathMatrix> = realizations.into_iter().collect();
        let mut batch = RealizationBatch::zeros(n_points, realizations.len());
        for (i, realization) in realizations.iter().enumerate() {
            batch.set_realization(i, realization)?;
        }
        Ok(batch)
    }

    /// Wrap an already interleaved (n, 2·k) matrix.
    ///
    /// Fails with [`NoiseError::InvalidInput`] if the column count is odd.
    pub fn from_interleaved(data: DMatrix<f64>) -> Result<Self, NoiseError> {
        if data.ncols() % N_AXES != 0 {
            return Err(NoiseError::InvalidInput(format!(
                "an interleaved batch needs an even number of columns, got {}",
                data.ncols()
            )));
        }
        Ok(RealizationBatch { data })
    }

    /// Number of time points `n`.
    #[inline]
    pub fn n_points(&self) -> usize {
        self.data.nrows()
    }

    /// Number of realizations `k`.
    #[inline]
    pub fn n_realizations(&self) -> usize {
        self.data.ncols() / N_AXES
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.n_realizations() == 0
    }

    /// Borrow the x- and y-series of realization `index`.
    ///
    /// # Panics
    /// If `index >= n_realizations()`.
    pub fn realization(&self, index: usize) -> (DVectorView<'_, f64>, DVectorView<'_, f64>) {
        (
            self.data.column(column_of(index, Axis::X)),
            self.data.column(column_of(index, Axis::Y)),
        )
    }

    /// Copy realization `index` out as an owned (n, 2) matrix.
    ///
    /// # Panics
    /// If `index >= n_realizations()`.
    pub fn realization_matrix(&self, index: usize) -> PathMatrix {
        self.data
            .columns(column_of(index, Axis::X), N_AXES)
            .into_owned()
    }

    /// Overwrite realization `index` with an (n, 2) path.
    ///
    /// Arguments
    /// -----------------
    /// * `index`: realization index, `< n_realizations()`.
    /// * `path`: the new content, shape (n_points, 2).
    ///
    /// Return
    /// ----------
    /// * [`NoiseError::InvalidInput`] on an out-of-range index or a shape mismatch,
    ///   leaving the batch untouched.
    pub fn set_realization(&mut self, index: usize, path: &PathMatrix) -> Result<(), NoiseError> {
        if index >= self.n_realizations() {
            return Err(NoiseError::InvalidInput(format!(
                "realization index {index} out of range for a batch of {}",
                self.n_realizations()
            )));
        }
        if path.shape() != (self.n_points(), N_AXES) {
            return Err(NoiseError::InvalidInput(format!(
                "realization {index} has shape {:?}, expected ({}, {N_AXES})",
                path.shape(),
                self.n_points()
            )));
        }
        self.data
            .columns_mut(column_of(index, Axis::X), N_AXES)
            .copy_from(path);
        Ok(())
    }

    /// Values of `axis` at time index `row` across all realizations, in realization order.
    ///
    /// # Panics
    /// If `row >= n_points()`.
    pub fn axis_ensemble(
        &self,
        row: usize,
        axis: Axis,
    ) -> impl Iterator<Item = f64> + Clone + '_ {
        (0..self.n_realizations()).map(move |i| self.data[(row, column_of(i, axis))])
    }

    /// Iterate over all realizations as owned (n, 2) matrices.
    pub fn iter_realizations(&self) -> impl Iterator<Item = PathMatrix> + '_ {
        (0..self.n_realizations()).map(|i| self.realization_matrix(i))
    }

    /// Borrow the raw interleaved matrix.
    pub fn as_matrix(&self) -> &DMatrix<f64> {
        &self.data
    }

    pub fn into_matrix(self) -> DMatrix<f64> {
        self.data
    }
}
