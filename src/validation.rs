//! # Input validation at the crate boundary
//!
//! Every path or field entering the crate (container construction, analysis entry
//! point, solver output) goes through one of the checks below. Each check returns
//! `Ok(())` or a [`NoiseError::InvalidInput`] carrying the reason, so a rejected
//! input never reaches any numeric work.
//!
//! Accepted shape
//! -----------------
//! * exactly two columns (x, y),
//! * at least one row,
//! * every entry finite (no NaN, no ±Infinity).
//!
//! Raw, untyped inputs are converted with [`path_from_rows`] (row slices) or
//! [`path_from_shaped`] (flat row-major data plus an explicit shape). Both reject
//! anything that is not a 2-D, two-column array before building a matrix.

use nalgebra::DMatrix;

use crate::{
    constants::{PathMatrix, TimeStep, N_AXES},
    noise_errors::NoiseError,
};

/// Check that `path` is a non-empty (n, 2) matrix of finite values.
///
/// Arguments
/// -----------------
/// * `path`: the matrix to check.
///
/// Return
/// ----------
/// * `Ok(())` if the matrix is usable as a trajectory or field.
/// * `Err(NoiseError::InvalidInput)` describing the first violated rule.
pub fn validate_path(path: &DMatrix<f64>) -> Result<(), NoiseError> {
    if path.ncols() != N_AXES {
        return Err(NoiseError::InvalidInput(format!(
            "expected an n x 2 array, got {} column(s)",
            path.ncols()
        )));
    }
    if path.nrows() == 0 {
        return Err(NoiseError::InvalidInput(
            "expected at least one time point".into(),
        ));
    }
    if let Some((idx, value)) = path.iter().enumerate().find(|(_, v)| !v.is_finite()) {
        let (row, col) = (idx % path.nrows(), idx / path.nrows());
        return Err(NoiseError::InvalidInput(format!(
            "non-finite value {value} at row {row}, column {col}"
        )));
    }
    Ok(())
}

/// Check that a time step is finite and strictly positive.
pub fn validate_time_step(dt: TimeStep) -> Result<(), NoiseError> {
    if dt.is_finite() && dt > 0.0 {
        Ok(())
    } else {
        Err(NoiseError::InvalidInput(format!(
            "time step must be finite and > 0, got {dt}"
        )))
    }
}

/// Build a validated (n, 2) path from a list of rows.
///
/// Every row must hold exactly two values (x, y). Ragged input, rows of the wrong
/// width and non-finite values are rejected.
///
/// Arguments
/// -----------------
/// * `rows`: one `[x, y]` entry per time point.
///
/// Return
/// ----------
/// * The path as a [`PathMatrix`], or [`NoiseError::InvalidInput`].
pub fn path_from_rows<R: AsRef<[f64]>>(rows: &[R]) -> Result<PathMatrix, NoiseError> {
    if let Some((i, row)) = rows
        .iter()
        .enumerate()
        .find(|(_, r)| r.as_ref().len() != N_AXES)
    {
        return Err(NoiseError::InvalidInput(format!(
            "row {i} has {} value(s), expected 2",
            row.as_ref().len()
        )));
    }

    let flat: Vec<f64> = rows.iter().flat_map(|r| r.as_ref().iter().copied()).collect();
    let path = DMatrix::from_row_slice(rows.len(), N_AXES, &flat);
    validate_path(&path)?;
    Ok(path)
}

/// Build a validated (n, 2) path from flat row-major data and an explicit shape.
///
/// This is the entry point for array-like inputs whose dimensionality is only
/// known at run time. A 1-D shape, a rank above 2, a second dimension other than
/// 2, or a shape that does not match `data.len()` is rejected.
///
/// Arguments
/// -----------------
/// * `data`: values in row-major order.
/// * `shape`: dimensions of `data`, e.g. `&[n, 2]`.
///
/// Return
/// ----------
/// * The path as a [`PathMatrix`], or [`NoiseError::InvalidInput`].
pub fn path_from_shaped(data: &[f64], shape: &[usize]) -> Result<PathMatrix, NoiseError> {
    let [nrows, ncols] = shape else {
        return Err(NoiseError::InvalidInput(format!(
            "expected a 2-dimensional array, got {} dimension(s)",
            shape.len()
        )));
    };
    if *ncols != N_AXES {
        return Err(NoiseError::InvalidInput(format!(
            "expected an n x 2 array, got shape {nrows} x {ncols}"
        )));
    }
    if nrows.checked_mul(*ncols) != Some(data.len()) {
        return Err(NoiseError::InvalidInput(format!(
            "shape {nrows} x {ncols} does not match {} value(s)",
            data.len()
        )));
    }

    let path = DMatrix::from_row_slice(*nrows, *ncols, data);
    validate_path(&path)?;
    Ok(path)
}
