//! # fieldnoise
//!
//! Robustness analysis of control fields against multiplicative noise.
//!
//! Given a nominal control field, the crate draws many independently perturbed
//! copies, drives an external field-to-path solver with each one in parallel, and
//! reduces the resulting trajectories to a per-time-point mean and population
//! variance.
//!
//! ## Modules
//!
//! * [`data_container`] – validated storage for one desired path and its derived slots.
//! * [`perturbation`] – multiplicative Gaussian noise injection.
//! * [`parallel_solver`] – parallel fan-out of the external solver.
//! * [`statistics`] – per-time-point mean and variance.
//! * [`noise_analyser`] – the three-stage pipeline and the [`analyze`] entry point.
//! * [`batch`] – column-interleaved storage of realizations.
//! * [`solver`] / [`transform`] – interfaces of the external components.
pub mod analysis_params;
pub mod batch;
pub mod constants;
pub mod data_container;
pub mod noise_analyser;
pub mod noise_errors;
pub mod parallel_solver;
pub mod perturbation;
pub mod solver;
pub mod statistics;
pub mod transform;
pub mod validation;

pub use analysis_params::{AnalysisParams, AnalysisParamsBuilder};
pub use batch::RealizationBatch;
pub use constants::{Axis, ComplexField, PathMatrix, TimeStep};
pub use data_container::PathContainer;
pub use noise_analyser::{analyze, NoiseAnalyser};
pub use noise_errors::NoiseError;
pub use solver::FieldSolver;
pub use statistics::NoiseStatistics;
pub use transform::{FixedStepTransform, PathTransform};
