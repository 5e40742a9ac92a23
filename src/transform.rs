//! # Desired-path preprocessing
//!
//! A [`PathTransform`] turns a user-supplied path into the uniformly sampled
//! trajectory the solvers work on, and reports the time step of that grid. The
//! resampling/smoothing algorithm itself lives outside this crate; only the
//! contract is fixed here.
//!
//! [`FixedStepTransform`] is the trivial implementation for paths that are already
//! uniformly sampled. Any closure with the right signature is also a transform.

use crate::{
    constants::{PathMatrix, TimeStep},
    noise_errors::NoiseError,
    validation::validate_time_step,
};

/// Preprocessing step producing a uniformly sampled path and its time step.
pub trait PathTransform {
    /// Resample `path` onto a uniform time grid.
    ///
    /// Arguments
    /// -----------------
    /// * `path`: a validated (n, 2) path.
    ///
    /// Return
    /// ----------
    /// * `(resampled, dt)` where `resampled` has shape (n', 2) and `dt` is the spacing
    ///   between adjacent rows.
    fn transform(&self, path: &PathMatrix) -> Result<(PathMatrix, TimeStep), NoiseError>;
}

impl<F> PathTransform for F
where
    F: Fn(&PathMatrix) -> Result<(PathMatrix, TimeStep), NoiseError>,
{
    fn transform(&self, path: &PathMatrix) -> Result<(PathMatrix, TimeStep), NoiseError> {
        self(path)
    }
}

/// Identity transform for paths already sampled every `dt`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedStepTransform {
    dt: TimeStep,
}

impl FixedStepTransform {
    /// Create the transform, rejecting a non-finite or non-positive `dt`.
    pub fn new(dt: TimeStep) -> Result<Self, NoiseError> {
        validate_time_step(dt)?;
        Ok(Self { dt })
    }

    pub fn dt(&self) -> TimeStep {
        self.dt
    }
}

impl PathTransform for FixedStepTransform {
    fn transform(&self, path: &PathMatrix) -> Result<(PathMatrix, TimeStep), NoiseError> {
        Ok((path.clone(), self.dt))
    }
}
