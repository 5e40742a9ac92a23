//! # Constants and type definitions for fieldnoise
//!
//! This module centralizes the **default configuration values** and the **common type
//! definitions** used throughout the crate: the matrix aliases every stage of the
//! noise pipeline exchanges, and the [`Axis`] identifier used to address the two
//! columns of a trajectory.
//!
//! ## Overview
//!
//! - Defaults for noise analysis (worker count, realization count, noise scale)
//! - Matrix aliases for paths and control fields
//! - Axis identifiers (x ↔ column 0, y ↔ column 1)

use nalgebra::{Complex, DMatrix};

// -------------------------------------------------------------------------------------------------
// Defaults
// -------------------------------------------------------------------------------------------------

/// Default number of parallel solver workers
pub const DEFAULT_WORKERS: usize = 4;

/// Default number of perturbed realizations per analysis
pub const DEFAULT_REALIZATIONS: usize = 100;

/// Default standard deviation of the multiplicative noise
pub const DEFAULT_NOISE_SCALE: f64 = 0.1;

/// Number of columns of every path and field matrix (x, y)
pub const N_AXES: usize = 2;

// -------------------------------------------------------------------------------------------------
// Type aliases
// -------------------------------------------------------------------------------------------------

/// Time step, in the solver's native time unit
pub type TimeStep = f64;

/// Real (n, 2) matrix: one row per time point, columns x and y
pub type PathMatrix = DMatrix<f64>;

/// Complex (n, 2) control field (e_x, e_y) as produced by a path-to-field solver
pub type ComplexField = DMatrix<Complex<f64>>;

// -------------------------------------------------------------------------------------------------
// Axis identifiers
// -------------------------------------------------------------------------------------------------

/// One of the two projections of a trajectory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Axis {
    /// x-projection, stored in column 0
    X,
    /// y-projection, stored in column 1
    Y,
}

impl Axis {
    /// Both axes, in column order.
    pub const ALL: [Axis; N_AXES] = [Axis::X, Axis::Y];

    /// Column index of this axis inside an (n, 2) matrix.
    #[inline]
    pub fn column(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
        }
    }
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Axis::X => write!(f, "x"),
            Axis::Y => write!(f, "y"),
        }
    }
}

impl TryFrom<usize> for Axis {
    type Error = usize;

    /// Column 0 → `X`, column 1 → `Y`; any other index is returned as the error.
    fn try_from(column: usize) -> Result<Self, Self::Error> {
        match column {
            0 => Ok(Axis::X),
            1 => Ok(Axis::Y),
            other => Err(other),
        }
    }
}
