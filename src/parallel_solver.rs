//! # Parallel fan-out of independent solves
//!
//! Drive the external [`FieldSolver`] once per realization of a
//! [`RealizationBatch`] of perturbed fields, and assemble the resulting
//! trajectories into a batch of identical shape and layout.
//!
//! ## Execution model
//! -----------------
//! * A dedicated `rayon` pool with exactly `n_workers` threads is built for each
//!   call; the worker count bounds concurrency and has no influence on the output.
//! * Each unit of work reads only its own realization and produces one (n, 2)
//!   trajectory. No state is shared between units.
//! * Results are collected **by realization index**, not by completion order, then
//!   written back with [`RealizationBatch::set_realization`] on the calling thread.
//!
//! ## Error semantics
//! -----------------
//! * A realization whose solve fails is retried up to `max_retries` extra times.
//! * The first realization that still fails aborts the whole batch: no partial
//!   result is ever returned.
//! * A solver output that is not a finite (n, 2) matrix counts as a failure.
//! * There is no timeout: a solver call that never returns blocks the batch.
//!
//! ## Progress UI (feature: `progress`)
//! -----------------
//! With the `progress` feature an `indicatif` bar counts completed solves.
use rayon::prelude::*;

use crate::{
    batch::RealizationBatch,
    constants::{PathMatrix, TimeStep, N_AXES},
    noise_errors::NoiseError,
    solver::FieldSolver,
    validation::validate_path,
};

#[cfg(feature = "progress")]
use indicatif::{ProgressBar, ProgressStyle};

/// Turn any solver error into a [`NoiseError::SolverFailure`] tagged with the realization.
fn as_solver_failure(realization: usize, err: NoiseError) -> NoiseError {
    match err {
        NoiseError::SolverFailure { reason, .. } => NoiseError::SolverFailure {
            realization,
            reason,
        },
        other => NoiseError::SolverFailure {
            realization,
            reason: other.to_string(),
        },
    }
}

/// Solve one realization and check the shape of the returned trajectory.
fn solve_realization<S: FieldSolver + ?Sized>(
    solver: &S,
    field: &PathMatrix,
    dt: TimeStep,
    realization: usize,
) -> Result<PathMatrix, NoiseError> {
    let path = solver
        .solve(field, dt)
        .map_err(|e| as_solver_failure(realization, e))?;

    if path.shape() != (field.nrows(), N_AXES) {
        return Err(NoiseError::SolverFailure {
            realization,
            reason: format!(
                "solver returned shape {:?}, expected ({}, {N_AXES})",
                path.shape(),
                field.nrows()
            ),
        });
    }
    validate_path(&path).map_err(|e| as_solver_failure(realization, e))?;
    Ok(path)
}

/// Solve one realization, retrying up to `max_retries` extra times.
fn solve_with_retry<S: FieldSolver + ?Sized>(
    solver: &S,
    field: &PathMatrix,
    dt: TimeStep,
    realization: usize,
    max_retries: usize,
) -> Result<PathMatrix, NoiseError> {
    let mut attempt = 0;
    loop {
        match solve_realization(solver, field, dt, realization) {
            Ok(path) => return Ok(path),
            Err(err) if attempt < max_retries => {
                attempt += 1;
                log::warn!("realization {realization}: {err}; retry {attempt}/{max_retries}");
            }
            Err(err) => return Err(err),
        }
    }
}

/// Solve every realization of `fields` on `n_workers` threads.
///
/// Arguments
/// -----------------
/// * `fields`: batch of perturbed fields, shape (n, 2·k).
/// * `dt`: time step shared by all realizations.
/// * `solver`: external field → path solver.
/// * `n_workers`: number of worker threads, `>= 1`.
/// * `max_retries`: extra attempts per failing realization.
///
/// Return
/// ----------
/// * A batch of solved trajectories with the same shape and layout as `fields`;
///   realization `i` of the output is the solve of realization `i` of the input.
/// * [`NoiseError::SolverFailure`] of a realization that still failed after its
///   retries; when several fail, which one is reported is unspecified.
/// * [`NoiseError::InvalidAnalysisParameter`] if `n_workers = 0`,
///   [`NoiseError::WorkerPoolError`] if the pool cannot be created.
///
/// See also
/// ------------
/// * [`NoiseAnalyser::solve`](crate::noise_analyser::NoiseAnalyser::solve) – Orchestrated use.
pub fn solve_batch<S: FieldSolver + ?Sized>(
    fields: &RealizationBatch,
    dt: TimeStep,
    solver: &S,
    n_workers: usize,
    max_retries: usize,
) -> Result<RealizationBatch, NoiseError> {
    if n_workers == 0 {
        return Err(NoiseError::InvalidAnalysisParameter(
            "n_workers must be >= 1".into(),
        ));
    }
    let k = fields.n_realizations();
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(n_workers)
        .build()?;

    log::debug!("solving {k} realization(s) on {n_workers} worker(s)");

    #[cfg(feature = "progress")]
    let pb = {
        let pb = ProgressBar::new(k as u64);
        pb.set_style(
            ProgressStyle::with_template(
                "{bar:40.cyan/blue} {pos}/{len} ({percent:>3}%) | {per_sec} | ETA {eta_precise}",
            )
            .expect("indicatif template"),
        );
        pb
    };

    let paths: Vec<PathMatrix> = pool.install(|| {
        (0..k)
            .into_par_iter()
            .map(|i| {
                let field = fields.realization_matrix(i);
                let res = solve_with_retry(solver, &field, dt, i, max_retries);
                #[cfg(feature = "progress")]
                pb.inc(1);
                res
            })
            .collect::<Result<Vec<_>, _>>()
    })?;

    #[cfg(feature = "progress")]
    pb.finish_and_clear();

    let mut solved = RealizationBatch::zeros(fields.n_points(), k);
    for (i, path) in paths.iter().enumerate() {
        solved.set_realization(i, path)?;
    }
    Ok(solved)
}
