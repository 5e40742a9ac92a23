//! # Field-to-path solver interface
//!
//! The numerical integrator that turns a control field into a dipole-moment
//! trajectory is an external component. [`FieldSolver`] fixes its contract:
//!
//! * input: a real (n, 2) field `(e_x, e_y)` and the time step `dt`,
//! * output: the (n, 2) trajectory `(x, y)` driven by that field,
//! * deterministic for identical inputs,
//! * allowed to fail on numerically pathological fields.
//!
//! Solvers are shared by every worker of the parallel adapter, hence the `Sync`
//! bound. Closures `Fn(&PathMatrix, TimeStep) -> Result<PathMatrix, NoiseError>`
//! implement the trait directly, which is what the tests and benches use.
//!
//! Failures should be reported as [`NoiseError::SolverFailure`]. A solver does not
//! know which realization it is working on:
//! [`solve_batch`](crate::parallel_solver::solve_batch) overwrites the
//! `realization` index, and wraps any other error variant into a
//! `SolverFailure` carrying the original message.

use crate::{
    constants::{PathMatrix, TimeStep},
    noise_errors::NoiseError,
};

/// External field → trajectory solver.
pub trait FieldSolver: Sync {
    /// Integrate the trajectory driven by `field` sampled every `dt`.
    fn solve(&self, field: &PathMatrix, dt: TimeStep) -> Result<PathMatrix, NoiseError>;
}

impl<F> FieldSolver for F
where
    F: Fn(&PathMatrix, TimeStep) -> Result<PathMatrix, NoiseError> + Sync,
{
    fn solve(&self, field: &PathMatrix, dt: TimeStep) -> Result<PathMatrix, NoiseError> {
        self(field, dt)
    }
}
