use thiserror::Error;

#[derive(Error, Debug)]
pub enum NoiseError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Solver failed for realization {realization}: {reason}")]
    SolverFailure { realization: usize, reason: String },

    #[error("Degenerate batch: statistics require at least one realization")]
    DegenerateBatch,

    #[error("Invalid noise analysis parameter: {0}")]
    InvalidAnalysisParameter(String),

    #[error("Gaussian noise generation failed: {0:?}")]
    NoiseInjectionError(rand_distr::NormalError),

    #[error("Unable to build the solver worker pool: {0}")]
    WorkerPoolError(String),
}

impl From<rand_distr::NormalError> for NoiseError {
    fn from(err: rand_distr::NormalError) -> Self {
        NoiseError::NoiseInjectionError(err)
    }
}

impl From<rayon::ThreadPoolBuildError> for NoiseError {
    fn from(err: rayon::ThreadPoolBuildError) -> Self {
        NoiseError::WorkerPoolError(err.to_string())
    }
}

impl PartialEq for NoiseError {
    fn eq(&self, other: &Self) -> bool {
        use NoiseError::*;
        match (self, other) {
            (InvalidInput(a), InvalidInput(b)) => a == b,
            (
                SolverFailure {
                    realization: ia,
                    reason: ra,
                },
                SolverFailure {
                    realization: ib,
                    reason: rb,
                },
            ) => ia == ib && ra == rb,
            (InvalidAnalysisParameter(a), InvalidAnalysisParameter(b)) => a == b,
            (NoiseInjectionError(a), NoiseInjectionError(b)) => a == b,
            (WorkerPoolError(a), WorkerPoolError(b)) => a == b,

            (DegenerateBatch, DegenerateBatch) => true,

            _ => false,
        }
    }
}
