use fieldnoise::{NoiseError, PathMatrix};

/// Toy field-to-path solver: each axis integrates `tanh(e)` with an explicit Euler step.
pub fn tanh_integrator(field: &PathMatrix, dt: f64) -> Result<PathMatrix, NoiseError> {
    let mut path = PathMatrix::zeros(field.nrows(), field.ncols());
    for (j, column) in field.column_iter().enumerate() {
        let mut acc = 0.0;
        for (i, e) in column.iter().enumerate() {
            acc += e.tanh() * dt;
            path[(i, j)] = acc;
        }
    }
    Ok(path)
}

/// Solver that refuses any field whose amplitude exceeds `limit`.
pub fn bounded_solver(limit: f64) -> impl Fn(&PathMatrix, f64) -> Result<PathMatrix, NoiseError> {
    move |field: &PathMatrix, dt: f64| {
        if field.amax() > limit {
            return Err(NoiseError::SolverFailure {
                realization: 0,
                reason: format!("field amplitude above {limit}"),
            });
        }
        tanh_integrator(field, dt)
    }
}

/// Smooth nominal field used across the integration tests.
pub fn nominal_field(n: usize) -> PathMatrix {
    PathMatrix::from_fn(n, 2, |i, j| {
        let t = i as f64 / n as f64;
        if j == 0 {
            (std::f64::consts::TAU * t).sin() + 1.5
        } else {
            (std::f64::consts::TAU * t).cos() - 1.5
        }
    })
}
