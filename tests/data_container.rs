mod common;

use common::{nominal_field, tanh_integrator};
use fieldnoise::{
    validation::path_from_rows, AnalysisParams, ComplexField, FixedStepTransform, NoiseError,
    PathContainer, PathMatrix, PathTransform, TimeStep,
};
use nalgebra::Complex;
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Doubles the sampling rate by repeating every row, halving the time step.
fn upsample(path: &PathMatrix) -> Result<(PathMatrix, TimeStep), NoiseError> {
    let rows = 2 * path.nrows();
    Ok((PathMatrix::from_fn(rows, 2, |i, j| path[(i / 2, j)]), 0.5))
}

fn fake_path() -> PathMatrix {
    // 10 x 2: column x = 0..10, column y = 1..11
    PathMatrix::from_fn(10, 2, |i, j| (i + j) as f64)
}

#[test]
fn test_init() {
    let path = fake_path();
    let (transformed, dt) = upsample(&path).unwrap();
    let data = PathContainer::new(&path, &upsample).unwrap();

    assert_eq!(data.n(), transformed.nrows());
    assert_eq!(data.dt(), dt);
    assert_eq!(data.path_desired(), &transformed);
    assert_eq!(data.path_actual().shape(), transformed.shape());
    assert_eq!(data.time_grid().len(), transformed.nrows());
}

#[test]
fn test_has_nan_inf() {
    let transform = FixedStepTransform::new(1.0).unwrap();
    let nan = PathMatrix::from_row_slice(1, 2, &[0.0, f64::NAN]);
    assert!(matches!(
        PathContainer::new(&nan, &transform),
        Err(NoiseError::InvalidInput(_))
    ));
    let inf = PathMatrix::from_row_slice(1, 2, &[1.0, f64::INFINITY]);
    assert!(matches!(
        PathContainer::new(&inf, &transform),
        Err(NoiseError::InvalidInput(_))
    ));
}

#[test]
fn test_input_type_and_shape() {
    let transform = FixedStepTransform::new(1.0).unwrap();

    // 1-D input
    assert!(matches!(
        PathContainer::from_shaped(&[0., 1., 2.], &[3], &transform),
        Err(NoiseError::InvalidInput(_))
    ));
    // wrong shape
    assert!(matches!(
        PathContainer::from_shaped(&[0., 1., 2., 3.], &[1, 4], &transform),
        Err(NoiseError::InvalidInput(_))
    ));
    assert!(matches!(
        PathContainer::new(&PathMatrix::zeros(4, 3), &transform),
        Err(NoiseError::InvalidInput(_))
    ));
    // ragged rows
    let ragged: Vec<Vec<f64>> = vec![vec![0.0, 1.0], vec![2.0, 3.0, 4.0]];
    assert!(matches!(
        PathContainer::from_rows(&ragged, &transform),
        Err(NoiseError::InvalidInput(_))
    ));

    let ok = PathContainer::from_rows(&[[0.0, 1.0], [1.0, 2.0]], &transform).unwrap();
    assert_eq!(ok.n(), 2);
}

#[test]
fn test_row_count_follows_transform() {
    for n in [1, 3, 17] {
        let path = path_from_rows(&vec![[0.5, -0.5]; n]).unwrap();
        let data = PathContainer::new(&path, &upsample).unwrap();
        let (expected, _) = upsample.transform(&path).unwrap();
        assert_eq!(data.n(), expected.nrows());
    }
}

#[test]
fn test_run_noise_analysis_fills_statistics() {
    let transform = FixedStepTransform::new(0.05).unwrap();
    let mut data = PathContainer::new(&fake_path(), &transform).unwrap();

    let field = nominal_field(10);
    let complex = ComplexField::from_fn(10, 2, |i, j| Complex::new(field[(i, j)], 0.3));
    data.set_field(complex).unwrap();

    let params = AnalysisParams::builder()
        .noise_scale(0.1)
        .n_realizations(64)
        .n_workers(4)
        .build()
        .unwrap();
    let mut rng = StdRng::seed_from_u64(31);
    let stats = data
        .run_noise_analysis(params, &tanh_integrator, &mut rng)
        .unwrap();

    assert_eq!(data.noise_stat_mean(), &stats.mean);
    assert_eq!(data.noise_stat_sd(), &stats.standard_deviation());
    assert!(data.noise_stat_sd().iter().any(|&sd| sd > 0.0));
}

#[test]
fn test_failed_analysis_leaves_slots_untouched() {
    let transform = FixedStepTransform::new(0.05).unwrap();
    let mut data = PathContainer::new(&fake_path(), &transform).unwrap();
    let before = data.clone();

    let params = AnalysisParams::builder().n_realizations(0).build().unwrap();
    let res = data.run_noise_analysis(params, &tanh_integrator, &mut StdRng::seed_from_u64(0));
    assert_eq!(res, Err(NoiseError::DegenerateBatch));
    assert_eq!(data, before);
}
