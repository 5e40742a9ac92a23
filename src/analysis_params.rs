//! # Noise analysis parameters
//!
//! This module defines [`AnalysisParams`] and its validating builder, which control
//! how [`NoiseAnalyser`](crate::noise_analyser::NoiseAnalyser) perturbs a nominal
//! field and fans the resulting solves out over worker threads.
//!
//! ## Pipeline overview
//!
//! 1. **Perturbation** – `n_realizations` copies of the nominal field are drawn with
//!    multiplicative Gaussian noise of standard deviation `noise_scale`.
//! 2. **Parallel solve** – each copy is handed to the external solver on a pool of
//!    `n_workers` threads; a failing solve is retried up to `max_solver_retries` times.
//! 3. **Aggregation** – per-time-point mean and population variance of the solved paths.
//!
//! ## Example
//!
//! ```rust
//! use fieldnoise::analysis_params::AnalysisParams;
//!
//! let params = AnalysisParams::builder()
//!     .noise_scale(0.05)
//!     .n_realizations(500)
//!     .n_workers(8)
//!     .build()
//!     .unwrap();
//!
//! println!("{params:#}");
//! ```
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{
    constants::{DEFAULT_NOISE_SCALE, DEFAULT_REALIZATIONS, DEFAULT_WORKERS},
    noise_errors::NoiseError,
};

/// Configuration of a noise analysis run.
///
/// Fields
/// -----------------
/// * `noise_scale` – standard deviation of the zero-mean multiplicative noise. Earlier
///   tooling named this value "variance" while using it as a standard deviation;
///   the standard-deviation behavior is the one implemented.
/// * `n_realizations` – number of perturbed fields (`k`). Zero is accepted here but
///   rejected by the analysis with [`NoiseError::DegenerateBatch`].
/// * `n_workers` – size of the solver thread pool. Does not change the result.
/// * `max_solver_retries` – extra attempts granted to a failing realization before
///   its error aborts the batch.
///
/// Defaults
/// -----------------
/// * `noise_scale`: 0.1
/// * `n_realizations`: 100
/// * `n_workers`: 4
/// * `max_solver_retries`: 0
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisParams {
    pub noise_scale: f64,
    pub n_realizations: usize,
    pub n_workers: usize,
    pub max_solver_retries: usize,
}

impl AnalysisParams {
    /// Equivalent to [`AnalysisParams::default()`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a validating [`AnalysisParamsBuilder`] from the default values.
    pub fn builder() -> AnalysisParamsBuilder {
        AnalysisParamsBuilder::new()
    }
}

impl Default for AnalysisParams {
    fn default() -> Self {
        AnalysisParams {
            noise_scale: DEFAULT_NOISE_SCALE,
            n_realizations: DEFAULT_REALIZATIONS,
            n_workers: DEFAULT_WORKERS,
            max_solver_retries: 0,
        }
    }
}

/// Builder for [`AnalysisParams`], with validation.
#[derive(Debug, Clone)]
pub struct AnalysisParamsBuilder {
    params: AnalysisParams,
}

impl Default for AnalysisParamsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl AnalysisParamsBuilder {
    /// Create a new builder initialized with default values.
    pub fn new() -> Self {
        Self {
            params: AnalysisParams::default(),
        }
    }

    pub fn noise_scale(mut self, v: f64) -> Self {
        self.params.noise_scale = v;
        self
    }
    pub fn n_realizations(mut self, v: usize) -> Self {
        self.params.n_realizations = v;
        self
    }
    pub fn n_workers(mut self, v: usize) -> Self {
        self.params.n_workers = v;
        self
    }
    pub fn max_solver_retries(mut self, v: usize) -> Self {
        self.params.max_solver_retries = v;
        self
    }

    /// Finalize the builder and produce an [`AnalysisParams`] instance.
    ///
    /// Validation rules
    /// -----------------
    /// * `noise_scale` finite and `>= 0.0`.
    /// * `n_workers >= 1`.
    ///
    /// Returns
    /// -----------------
    /// * `Ok(AnalysisParams)` if all values are valid.
    /// * `Err(NoiseError::InvalidAnalysisParameter)` otherwise.
    pub fn build(self) -> Result<AnalysisParams, NoiseError> {
        self.params.validate()?;
        Ok(self.params)
    }
}

impl AnalysisParams {
    /// Check the rules enforced by [`AnalysisParamsBuilder::build`].
    ///
    /// Public fields can be edited after building, so the analyser re-runs this check.
    pub fn validate(&self) -> Result<(), NoiseError> {
        if !(self.noise_scale.is_finite() && self.noise_scale >= 0.0) {
            return Err(NoiseError::InvalidAnalysisParameter(
                "noise_scale must be finite and non-negative".into(),
            ));
        }
        if self.n_workers == 0 {
            return Err(NoiseError::InvalidAnalysisParameter(
                "n_workers must be >= 1".into(),
            ));
        }
        Ok(())
    }
}

impl fmt::Display for AnalysisParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            writeln!(f, "Noise Analysis Parameters")?;
            writeln!(f, "-------------------------")?;
            writeln!(f, "  noise_scale        = {:<10} # sd of multiplicative noise", self.noise_scale)?;
            writeln!(f, "  n_realizations     = {:<10} # perturbed fields", self.n_realizations)?;
            writeln!(f, "  n_workers          = {:<10} # solver threads", self.n_workers)?;
            write!(f, "  max_solver_retries = {:<10} # extra attempts per realization", self.max_solver_retries)
        } else {
            write!(
                f,
                "noise_scale={}, n_realizations={}, n_workers={}, max_solver_retries={}",
                self.noise_scale, self.n_realizations, self.n_workers, self.max_solver_retries
            )
        }
    }
}
