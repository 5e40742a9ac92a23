//! # Noise analysis of a control field
//!
//! Estimate how multiplicative noise on a nominal control field propagates into
//! uncertainty of the trajectory it drives.
//!
//! ## Pipeline
//! -----------------
//! [`NoiseAnalyser::analyze`] runs three stages in strict order, each consuming the
//! complete output of the previous one:
//!
//! 1. **Generated** – [`NoiseAnalyser::perturb`] draws `n_realizations` perturbed
//!    copies of the field ([`crate::perturbation`]).
//! 2. **Solved** – [`NoiseAnalyser::solve`] hands each copy to the external solver
//!    on a worker pool ([`crate::parallel_solver`]).
//! 3. **Aggregated** – [`NoiseAnalyser::aggregate`] reduces the solved paths to a
//!    per-time-point mean and population variance ([`crate::statistics`]).
//!
//! A failing stage aborts the run; no later stage sees partial input. Every call
//! to `analyze` starts from a fresh batch.
//!
//! ## Reproducibility
//! -----------------
//! The random source is passed by the caller and only used by the (single-threaded)
//! generation stage. With a seeded RNG the statistics are bit-for-bit identical for
//! any worker count.
//!
//! ## Example
//! -----------------
//! ```rust
//! use fieldnoise::{analyze, NoiseError, PathMatrix};
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! // Toy solver: the trajectory is the running sum of the field.
//! let solver = |field: &PathMatrix, dt: f64| -> Result<PathMatrix, NoiseError> {
//!     let mut path = field.clone();
//!     for mut column in path.column_iter_mut() {
//!         let mut acc = 0.0;
//!         for v in column.iter_mut() {
//!             acc += *v * dt;
//!             *v = acc;
//!         }
//!     }
//!     Ok(path)
//! };
//!
//! let field = PathMatrix::from_fn(50, 2, |i, j| ((i + j) as f64 * 0.1).sin());
//! let mut rng = StdRng::seed_from_u64(42);
//! let stats = analyze(&field, 0.01, 0.05, 200, 4, &solver, &mut rng).unwrap();
//! assert_eq!(stats.mean.shape(), (50, 2));
//! ```
use rand::Rng;

use crate::{
    analysis_params::AnalysisParams,
    batch::RealizationBatch,
    constants::{ComplexField, PathMatrix, TimeStep},
    noise_errors::NoiseError,
    parallel_solver::solve_batch,
    perturbation::generate_perturbed_batch,
    solver::FieldSolver,
    statistics::{self, NoiseStatistics},
    validation::{validate_path, validate_time_step},
};

/// Noise analysis of one nominal field.
///
/// Holds the shared state of a run: the nominal field, its time step and the
/// [`AnalysisParams`]. Batches are created per call and never stored.
#[derive(Debug, Clone)]
pub struct NoiseAnalyser {
    field: PathMatrix,
    dt: TimeStep,
    params: AnalysisParams,
}

impl NoiseAnalyser {
    /// Create an analyser for a real (n, 2) field.
    ///
    /// Arguments
    /// -----------------
    /// * `field`: nominal control field, finite, shape (n, 2).
    /// * `dt`: time step between two rows of `field`.
    /// * `params`: noise scale, realization count, worker count, retries.
    ///
    /// Return
    /// ----------
    /// * [`NoiseError::InvalidInput`] for a malformed field or time step.
    /// * [`NoiseError::InvalidAnalysisParameter`] for invalid `params`.
    pub fn new(
        field: PathMatrix,
        dt: TimeStep,
        params: AnalysisParams,
    ) -> Result<Self, NoiseError> {
        validate_path(&field)?;
        validate_time_step(dt)?;
        params.validate()?;
        Ok(NoiseAnalyser { field, dt, params })
    }

    /// Create an analyser for a complex field, keeping its real part.
    pub fn from_complex_field(
        field: &ComplexField,
        dt: TimeStep,
        params: AnalysisParams,
    ) -> Result<Self, NoiseError> {
        Self::new(field.map(|e| e.re), dt, params)
    }

    pub fn field(&self) -> &PathMatrix {
        &self.field
    }

    pub fn dt(&self) -> TimeStep {
        self.dt
    }

    pub fn params(&self) -> &AnalysisParams {
        &self.params
    }

    /// Stage 1: draw `n_realizations` perturbed copies of the nominal field.
    pub fn perturb<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<RealizationBatch, NoiseError> {
        generate_perturbed_batch(
            &self.field,
            self.params.noise_scale,
            self.params.n_realizations,
            rng,
        )
    }

    /// Stage 2: solve every perturbed field on the configured worker pool.
    pub fn solve<S: FieldSolver + ?Sized>(
        &self,
        fields: &RealizationBatch,
        solver: &S,
    ) -> Result<RealizationBatch, NoiseError> {
        solve_batch(
            fields,
            self.dt,
            solver,
            self.params.n_workers,
            self.params.max_solver_retries,
        )
    }

    /// Stage 3: per-time-point mean and population variance of the solved paths.
    pub fn aggregate(&self, paths: &RealizationBatch) -> Result<NoiseStatistics, NoiseError> {
        statistics::aggregate(paths)
    }

    /// Run perturbation, solving and aggregation in order.
    ///
    /// Arguments
    /// -----------------
    /// * `solver`: external field → path solver.
    /// * `rng`: random source for the perturbation stage.
    ///
    /// Return
    /// ----------
    /// * [`NoiseStatistics`] with (n, 2) `mean` and `variance`.
    /// * [`NoiseError::DegenerateBatch`] if `n_realizations = 0`, before any work.
    /// * Any error of the three stages, unchanged.
    pub fn analyze<S, R>(&self, solver: &S, rng: &mut R) -> Result<NoiseStatistics, NoiseError>
    where
        S: FieldSolver + ?Sized,
        R: Rng + ?Sized,
    {
        if self.params.n_realizations == 0 {
            return Err(NoiseError::DegenerateBatch);
        }

        let fields = self.perturb(rng)?;
        log::debug!(
            "generated {} perturbed field(s) of {} point(s)",
            fields.n_realizations(),
            fields.n_points()
        );

        let paths = self.solve(&fields, solver)?;
        log::debug!("solved {} realization(s)", paths.n_realizations());

        let stats = self.aggregate(&paths)?;
        log::debug!("aggregated statistics over {} point(s)", stats.n_points());
        Ok(stats)
    }
}

/// One-shot noise analysis.
///
/// Arguments
/// -----------------
/// * `field`: nominal (n, 2) control field.
/// * `dt`: time step of the field.
/// * `noise_scale`: standard deviation of the multiplicative noise.
/// * `realization_count`: number of perturbed fields, `>= 1`.
/// * `worker_count`: solver threads, `>= 1`.
/// * `solver`: external field → path solver.
/// * `rng`: random source.
///
/// Return
/// ----------
/// * [`NoiseStatistics`], or the first error raised (see [`NoiseAnalyser::analyze`]).
pub fn analyze<S, R>(
    field: &PathMatrix,
    dt: TimeStep,
    noise_scale: f64,
    realization_count: usize,
    worker_count: usize,
    solver: &S,
    rng: &mut R,
) -> Result<NoiseStatistics, NoiseError>
where
    S: FieldSolver + ?Sized,
    R: Rng + ?Sized,
{
    let params = AnalysisParams::builder()
        .noise_scale(noise_scale)
        .n_realizations(realization_count)
        .n_workers(worker_count)
        .build()?;
    NoiseAnalyser::new(field.clone(), dt, params)?.analyze(solver, rng)
}
