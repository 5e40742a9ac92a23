//! # Per-path data container
//!
//! A [`PathContainer`] holds everything associated with one desired dipole-moment
//! path: the preprocessed trajectory, its time grid, and the slots later filled by
//! the solvers (control field, actual path, state) and by the noise analysis
//! (mean and standard deviation of the noisy paths).
//!
//! ## Construction
//! -----------------
//! The input path is validated **before** anything else: it must be a non-empty
//! two-column array of finite values, otherwise construction fails with
//! [`NoiseError::InvalidInput`]. The validated path then goes through a
//! [`PathTransform`], whose output fixes `n` and `dt` for the lifetime of the
//! container. All slots are allocated zero-filled with matching shapes.
//!
//! Array-like inputs whose shape is only known at run time go through
//! [`PathContainer::from_rows`] or [`PathContainer::from_shaped`].
//!
//! ## Slots
//! -----------------
//! | slot              | shape        | filled by                       |
//! |-------------------|--------------|---------------------------------|
//! | `field`           | (n, 2) ℂ     | path-to-field solver            |
//! | `path_actual`     | (n, 2)       | field-to-path solver            |
//! | `state`           | (m, n)       | path-to-field solver (optional) |
//! | `noise_stat_mean` | (n, 2)       | noise analysis                  |
//! | `noise_stat_sd`   | (n, 2)       | noise analysis                  |
use nalgebra::{DMatrix, DVector};
use rand::Rng;

use crate::{
    analysis_params::AnalysisParams,
    constants::{ComplexField, PathMatrix, TimeStep, N_AXES},
    noise_analyser::NoiseAnalyser,
    noise_errors::NoiseError,
    solver::FieldSolver,
    statistics::NoiseStatistics,
    transform::PathTransform,
    validation::{path_from_rows, path_from_shaped, validate_path, validate_time_step},
};

/// All data associated with a single desired path.
#[derive(Debug, Clone, PartialEq)]
pub struct PathContainer {
    path_desired: PathMatrix,
    n: usize,
    dt: TimeStep,
    t: DVector<f64>,
    field: ComplexField,
    path_actual: PathMatrix,
    state: Option<DMatrix<f64>>,
    noise_stat_mean: PathMatrix,
    noise_stat_sd: PathMatrix,
}

impl PathContainer {
    /// Build a container from a desired path.
    ///
    /// Arguments
    /// -----------------
    /// * `path`: (n, 2) matrix, each row holding the x- and y-projection of the dipole moment.
    /// * `transform`: preprocessing producing the uniformly sampled path and its time step.
    ///
    /// Return
    /// ----------
    /// * The container, with `n` and `dt` taken from the transform output.
    /// * [`NoiseError::InvalidInput`] if `path` is not a finite (n, 2) matrix (the transform
    ///   is not called), or if the transform output is malformed.
    pub fn new<T: PathTransform + ?Sized>(
        path: &PathMatrix,
        transform: &T,
    ) -> Result<Self, NoiseError> {
        validate_path(path)?;

        let (path_desired, dt) = transform.transform(path)?;
        validate_path(&path_desired)?;
        validate_time_step(dt)?;

        let n = path_desired.nrows();
        let t = DVector::from_fn(n, |i, _| i as f64 * dt);

        Ok(PathContainer {
            path_actual: PathMatrix::zeros(n, N_AXES),
            field: ComplexField::zeros(n, N_AXES),
            state: None,
            noise_stat_mean: PathMatrix::zeros(n, N_AXES),
            noise_stat_sd: PathMatrix::zeros(n, N_AXES),
            path_desired,
            n,
            dt,
            t,
        })
    }

    /// Build a container from a list of `[x, y]` rows.
    pub fn from_rows<R, T>(rows: &[R], transform: &T) -> Result<Self, NoiseError>
    where
        R: AsRef<[f64]>,
        T: PathTransform + ?Sized,
    {
        Self::new(&path_from_rows(rows)?, transform)
    }

    /// Build a container from flat row-major data and its shape (e.g. `&[n, 2]`).
    pub fn from_shaped<T: PathTransform + ?Sized>(
        data: &[f64],
        shape: &[usize],
        transform: &T,
    ) -> Result<Self, NoiseError> {
        Self::new(&path_from_shaped(data, shape)?, transform)
    }

    /// Number of time points.
    pub fn n(&self) -> usize {
        self.n
    }

    /// Time step between two adjacent time points.
    pub fn dt(&self) -> TimeStep {
        self.dt
    }

    /// Time grid `t[i] = i · dt`, `n` points.
    pub fn time_grid(&self) -> &DVector<f64> {
        &self.t
    }

    pub fn path_desired(&self) -> &PathMatrix {
        &self.path_desired
    }

    pub fn field(&self) -> &ComplexField {
        &self.field
    }

    pub fn path_actual(&self) -> &PathMatrix {
        &self.path_actual
    }

    pub fn state(&self) -> Option<&DMatrix<f64>> {
        self.state.as_ref()
    }

    pub fn noise_stat_mean(&self) -> &PathMatrix {
        &self.noise_stat_mean
    }

    pub fn noise_stat_sd(&self) -> &PathMatrix {
        &self.noise_stat_sd
    }

    fn check_shape(&self, what: &str, shape: (usize, usize)) -> Result<(), NoiseError> {
        if shape != (self.n, N_AXES) {
            return Err(NoiseError::InvalidInput(format!(
                "{what} has shape {shape:?}, expected ({}, {N_AXES})",
                self.n
            )));
        }
        Ok(())
    }

    /// Store the control field computed for this path.
    pub fn set_field(&mut self, field: ComplexField) -> Result<(), NoiseError> {
        self.check_shape("field", field.shape())?;
        if field.iter().any(|e| !(e.re.is_finite() && e.im.is_finite())) {
            return Err(NoiseError::InvalidInput(
                "field contains non-finite values".into(),
            ));
        }
        self.field = field;
        Ok(())
    }

    /// Store the path produced by the control field.
    pub fn set_path_actual(&mut self, path: PathMatrix) -> Result<(), NoiseError> {
        self.check_shape("path_actual", path.shape())?;
        validate_path(&path)?;
        self.path_actual = path;
        Ok(())
    }

    /// Store the basis weights describing the system, one column per time point.
    pub fn set_state(&mut self, state: DMatrix<f64>) -> Result<(), NoiseError> {
        if state.ncols() != self.n {
            return Err(NoiseError::InvalidInput(format!(
                "state has {} column(s), expected one per time point ({})",
                state.ncols(),
                self.n
            )));
        }
        self.state = Some(state);
        Ok(())
    }

    /// Record the outcome of a noise analysis: mean, and standard deviation from the variance.
    pub fn record_noise_statistics(&mut self, stats: &NoiseStatistics) -> Result<(), NoiseError> {
        self.check_shape("noise mean", stats.mean.shape())?;
        self.check_shape("noise variance", stats.variance.shape())?;
        self.noise_stat_mean = stats.mean.clone();
        self.noise_stat_sd = stats.standard_deviation();
        Ok(())
    }

    /// Run a noise analysis on the stored control field and record its statistics.
    ///
    /// The real part of [`field`](PathContainer::field) is perturbed; `dt` is the
    /// container's time step.
    ///
    /// Return
    /// ----------
    /// * The statistics, also written to `noise_stat_mean` / `noise_stat_sd`.
    /// * Any error of [`NoiseAnalyser::analyze`]; the slots are left untouched on error.
    pub fn run_noise_analysis<S, R>(
        &mut self,
        params: AnalysisParams,
        solver: &S,
        rng: &mut R,
    ) -> Result<NoiseStatistics, NoiseError>
    where
        S: FieldSolver + ?Sized,
        R: Rng + ?Sized,
    {
        let analyser = NoiseAnalyser::from_complex_field(&self.field, self.dt, params)?;
        let stats = analyser.analyze(solver, rng)?;
        self.record_noise_statistics(&stats)?;
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::FixedStepTransform;
    use approx::assert_relative_eq;

    fn ramp(n: usize) -> PathMatrix {
        PathMatrix::from_fn(n, 2, |i, j| (i + j) as f64)
    }

    #[test]
    fn test_new_allocates_slots() {
        let transform = FixedStepTransform::new(0.25).unwrap();
        let data = PathContainer::new(&ramp(10), &transform).unwrap();

        assert_eq!(data.n(), 10);
        assert_eq!(data.dt(), 0.25);
        assert_eq!(data.path_desired(), &ramp(10));
        assert_eq!(data.path_actual().shape(), (10, 2));
        assert_eq!(data.field().shape(), (10, 2));
        assert!(data.field().iter().all(|e| e.re == 0.0 && e.im == 0.0));
        assert_eq!(data.noise_stat_mean(), &PathMatrix::zeros(10, 2));
        assert_eq!(data.noise_stat_sd(), &PathMatrix::zeros(10, 2));
        assert!(data.state().is_none());

        let t = data.time_grid();
        assert_eq!(t.len(), 10);
        assert_relative_eq!(t[9], 2.25);
    }

    #[test]
    fn test_transform_not_called_on_invalid_input() {
        let called = std::cell::Cell::new(false);
        let transform = |p: &PathMatrix| -> Result<(PathMatrix, f64), NoiseError> {
            called.set(true);
            Ok((p.clone(), 1.0))
        };
        let mut bad = ramp(3);
        bad[(0, 1)] = f64::INFINITY;
        assert!(matches!(
            PathContainer::new(&bad, &transform),
            Err(NoiseError::InvalidInput(_))
        ));
        assert!(!called.get());
    }

    #[test]
    fn test_malformed_transform_output() {
        let zero_dt = |p: &PathMatrix| -> Result<(PathMatrix, f64), NoiseError> {
            Ok((p.clone(), 0.0))
        };
        assert!(PathContainer::new(&ramp(3), &zero_dt).is_err());
    }

    #[test]
    fn test_slot_shape_checks() {
        let transform = FixedStepTransform::new(1.0).unwrap();
        let mut data = PathContainer::new(&ramp(4), &transform).unwrap();

        assert!(data.set_path_actual(ramp(5)).is_err());
        assert!(data.set_path_actual(ramp(4)).is_ok());
        assert!(data.set_field(ComplexField::zeros(3, 2)).is_err());
        assert!(data.set_state(DMatrix::zeros(5, 3)).is_err());
        assert!(data.set_state(DMatrix::zeros(5, 4)).is_ok());
        assert_eq!(data.state().map(|s| s.shape()), Some((5, 4)));
    }

    #[test]
    fn test_record_noise_statistics() {
        let transform = FixedStepTransform::new(1.0).unwrap();
        let mut data = PathContainer::new(&ramp(2), &transform).unwrap();
        let stats = NoiseStatistics {
            mean: PathMatrix::from_element(2, 2, 1.5),
            variance: PathMatrix::from_element(2, 2, 4.0),
        };
        data.record_noise_statistics(&stats).unwrap();
        assert_eq!(data.noise_stat_mean(), &stats.mean);
        assert_eq!(data.noise_stat_sd(), &PathMatrix::from_element(2, 2, 2.0));

        let wrong = NoiseStatistics {
            mean: PathMatrix::zeros(3, 2),
            variance: PathMatrix::zeros(3, 2),
        };
        assert!(data.record_noise_statistics(&wrong).is_err());
    }
}
