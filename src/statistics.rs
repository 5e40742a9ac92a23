//! # Ensemble statistics of solved trajectories
//!
//! Reduce a [`RealizationBatch`] of `k` trajectories to a per-time-point,
//! per-axis **mean** and **population variance** (divisor `k`, not `k − 1`).
//!
//! For every time index `j` and axis `a ∈ {x, y}` the ensemble
//! `{ path_i[j, a] | i ∈ [0, k) }` is read through
//! [`RealizationBatch::axis_ensemble`], then
//!
//! ```text
//! mean[j, a]     = (1/k) Σᵢ vᵢ
//! variance[j, a] = (1/k) Σᵢ (vᵢ − mean[j, a])²
//! ```
//!
//! The variance is computed in two passes (mean first), which avoids the
//! cancellation of the `E[v²] − E[v]²` form when the spread is small compared to
//! the values themselves.
//!
//! An empty batch has no defined statistics and is rejected with
//! [`NoiseError::DegenerateBatch`].
use itertools::iproduct;
use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};

use crate::{
    batch::RealizationBatch,
    constants::{Axis, PathMatrix, N_AXES},
    noise_errors::NoiseError,
};

/// Mean and population variance of an ensemble of trajectories.
///
/// Both matrices have shape (n, 2): one row per time point, columns x and y.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoiseStatistics {
    pub mean: PathMatrix,
    pub variance: PathMatrix,
}

impl NoiseStatistics {
    /// Element-wise standard deviation (square root of the variance).
    pub fn standard_deviation(&self) -> PathMatrix {
        self.variance.map(f64::sqrt)
    }

    /// Number of time points.
    pub fn n_points(&self) -> usize {
        self.mean.nrows()
    }

    /// Split into `(mean, variance)`.
    pub fn into_parts(self) -> (PathMatrix, PathMatrix) {
        (self.mean, self.variance)
    }
}

/// Population mean and variance of a sample.
///
/// Returns `None` for an empty sample.
fn mean_and_population_variance<I>(values: I) -> Option<(f64, f64)>
where
    I: Iterator<Item = f64> + Clone,
{
    let (count, sum) = values
        .clone()
        .fold((0usize, 0.0), |(c, s), v| (c + 1, s + v));
    if count == 0 {
        return None;
    }
    let mean = sum / count as f64;
    let sq_dev: f64 = values.map(|v| (v - mean) * (v - mean)).sum();
    Some((mean, sq_dev / count as f64))
}

/// Compute per-time-point, per-axis mean and population variance of a batch.
///
/// Arguments
/// -----------------
/// * `batch`: `k` solved trajectories, each (n, 2).
///
/// Return
/// ----------
/// * [`NoiseStatistics`] with `mean` and `variance` of shape (n, 2).
/// * [`NoiseError::DegenerateBatch`] if `k = 0`.
///
/// See also
/// ------------
/// * [`RealizationBatch::axis_ensemble`] – De-interleaving accessor used here.
pub fn aggregate(batch: &RealizationBatch) -> Result<NoiseStatistics, NoiseError> {
    if batch.is_empty() {
        return Err(NoiseError::DegenerateBatch);
    }

    let n = batch.n_points();
    let mut mean = DMatrix::zeros(n, N_AXES);
    let mut variance = DMatrix::zeros(n, N_AXES);

    for (row, axis) in iproduct!(0..n, Axis::ALL) {
        let (m, v) = mean_and_population_variance(batch.axis_ensemble(row, axis))
            .ok_or(NoiseError::DegenerateBatch)?;
        mean[(row, axis.column())] = m;
        variance[(row, axis.column())] = v;
    }

    Ok(NoiseStatistics { mean, variance })
}
