//! # Multiplicative noise injection
//!
//! Generate perturbed copies of a nominal control field to probe the robustness
//! of a designed field against random amplitude errors.
//!
//! ## Noise model
//!
//! For every realization, two independent noise vectors `s_x`, `s_y` of length `n`
//! are drawn element-wise from `Normal(0, noise_scale)`, and the field is perturbed
//! multiplicatively:
//!
//! ```text
//! e_x' = e_x + s_x ⊙ e_x
//! e_y' = e_y + s_y ⊙ e_y
//! ```
//!
//! so the perturbation at each time point is proportional to the nominal
//! amplitude there. `noise_scale` is the **standard deviation** of `s` (older
//! tooling called this parameter "variance"; the numeric behavior is kept).
//!
//! ## Reproducibility
//!
//! The random source is always supplied by the caller. Draw order is fixed:
//! realization by realization, `s_x` (n draws) before `s_y` (n draws). The lazy
//! [`perturbed_realizations`] and the eager [`generate_perturbed_batch`] share that
//! order, so the same seed yields the same batch through either path.
//!
//! ## Edge cases
//!
//! * `noise_scale = 0` → every realization equals the nominal field exactly.
//! * `n_realizations = 0` → an empty (n, 0) batch, not an error.
//! * complex fields: [`generate_perturbed_complex_batch`] keeps the real part only,
//!   the real-valued noise model has no use for the imaginary component.
//!
//! ## See also
//! ------------
//! * [`RealizationBatch`] – Storage of the generated realizations.
//! * [`NoiseAnalyser::perturb`](crate::noise_analyser::NoiseAnalyser::perturb) – Orchestrated use of this module.
use nalgebra::DVector;
use rand::Rng;
use rand_distr::{Distribution, Normal};

use crate::{
    batch::RealizationBatch,
    constants::{ComplexField, PathMatrix},
    noise_errors::NoiseError,
    validation::validate_path,
};

/// Lazily generate `n_realizations` perturbed copies of `field`.
///
/// Arguments
/// -----------------
/// * `field`: nominal (n, 2) real field.
/// * `noise_scale`: standard deviation of the multiplicative noise.
/// * `n_realizations`: number of copies to yield.
/// * `rng`: random source, advanced by `2·n` draws per yielded realization.
///
/// Return
/// ----------
/// * An iterator of (n, 2) perturbed fields.
/// * [`NoiseError::InvalidInput`] if `field` is not a finite (n, 2) matrix.
/// * [`NoiseError::InvalidAnalysisParameter`] if `noise_scale` is negative or NaN.
/// * [`NoiseError::NoiseInjectionError`] if `noise_scale` is infinite.
///
/// See also
/// ------------
/// * [`generate_perturbed_batch`] – Eager version collecting into a [`RealizationBatch`].
pub fn perturbed_realizations<'a, R: Rng + ?Sized>(
    field: &'a PathMatrix,
    noise_scale: f64,
    n_realizations: usize,
    rng: &'a mut R,
) -> Result<impl Iterator<Item = PathMatrix> + 'a, NoiseError> {
    validate_path(field)?;
    if !(noise_scale >= 0.0) {
        return Err(NoiseError::InvalidAnalysisParameter(format!(
            "noise_scale must be non-negative, got {noise_scale}"
        )));
    }
    let normal = Normal::new(0.0, noise_scale)?;
    let n = field.nrows();

    Ok((0..n_realizations).map(move |_| {
        let s_x = DVector::from_fn(n, |_, _| normal.sample(rng));
        let s_y = DVector::from_fn(n, |_, _| normal.sample(rng));

        let mut perturbed = field.clone();
        for (mut column, noise) in perturbed.column_iter_mut().zip([s_x, s_y]) {
            let nominal = column.clone_owned();
            column += noise.component_mul(&nominal);
        }
        perturbed
    }))
}

/// Generate a batch of `n_realizations` perturbed copies of `field`.
///
/// Realization `i` of the returned batch is the `i`-th item of
/// [`perturbed_realizations`] for the same arguments.
///
/// Return
/// ----------
/// * A [`RealizationBatch`] of shape (n, 2·n_realizations), or the errors of
///   [`perturbed_realizations`].
pub fn generate_perturbed_batch<R: Rng + ?Sized>(
    field: &PathMatrix,
    noise_scale: f64,
    n_realizations: usize,
    rng: &mut R,
) -> Result<RealizationBatch, NoiseError> {
    let n = field.nrows();
    let realizations = perturbed_realizations(field, noise_scale, n_realizations, rng)?;
    RealizationBatch::from_realizations(n, realizations)
}

/// Same as [`generate_perturbed_batch`] for a complex field; only the real part is perturbed.
pub fn generate_perturbed_complex_batch<R: Rng + ?Sized>(
    field: &ComplexField,
    noise_scale: f64,
    n_realizations: usize,
    rng: &mut R,
) -> Result<RealizationBatch, NoiseError> {
    generate_perturbed_batch(&field.map(|e| e.re), noise_scale, n_realizations, rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::Complex;
    use rand::{rngs::StdRng, SeedableRng};

    fn nominal(n: usize) -> PathMatrix {
        PathMatrix::from_fn(n, 2, |i, j| (i as f64 + 1.0) * if j == 0 { 1.0 } else { -2.0 })
    }

    #[test]
    fn test_batch_shape() {
        let mut rng = StdRng::seed_from_u64(42);
        let batch = generate_perturbed_batch(&nominal(7), 0.1, 5, &mut rng).unwrap();
        assert_eq!(batch.as_matrix().shape(), (7, 10));
        assert_eq!(batch.n_realizations(), 5);
    }

    #[test]
    fn test_zero_noise_gives_exact_copies() {
        let field = nominal(6);
        let mut rng = StdRng::seed_from_u64(7);
        let batch = generate_perturbed_batch(&field, 0.0, 4, &mut rng).unwrap();
        for realization in batch.iter_realizations() {
            assert_eq!(realization, field);
        }
    }

    #[test]
    fn test_zero_realizations_is_empty() {
        let mut rng = StdRng::seed_from_u64(7);
        let batch = generate_perturbed_batch(&nominal(3), 0.5, 0, &mut rng).unwrap();
        assert!(batch.is_empty());
        assert_eq!(batch.as_matrix().shape(), (3, 0));
    }

    #[test]
    fn test_same_seed_same_batch() {
        let field = nominal(5);
        let a = generate_perturbed_batch(&field, 0.3, 3, &mut StdRng::seed_from_u64(1)).unwrap();
        let b = generate_perturbed_batch(&field, 0.3, 3, &mut StdRng::seed_from_u64(1)).unwrap();
        let c = generate_perturbed_batch(&field, 0.3, 3, &mut StdRng::seed_from_u64(2)).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_lazy_and_eager_agree() {
        let field = nominal(4);
        let mut rng = StdRng::seed_from_u64(99);
        let lazy: Vec<PathMatrix> = perturbed_realizations(&field, 0.2, 3, &mut rng)
            .unwrap()
            .collect();
        let eager =
            generate_perturbed_batch(&field, 0.2, 3, &mut StdRng::seed_from_u64(99)).unwrap();
        assert_eq!(lazy, eager.iter_realizations().collect::<Vec<_>>());
    }

    #[test]
    fn test_noise_is_multiplicative() {
        // A zero entry of the nominal field stays zero whatever the noise.
        let mut field = nominal(4);
        field[(2, 0)] = 0.0;
        field[(3, 1)] = 0.0;
        let mut rng = StdRng::seed_from_u64(3);
        let batch = generate_perturbed_batch(&field, 1.0, 8, &mut rng).unwrap();
        for (x, y) in (0..8).map(|i| batch.realization(i)) {
            assert_eq!(x[2], 0.0);
            assert_eq!(y[3], 0.0);
        }
    }

    #[test]
    fn test_relative_spread_matches_noise_scale() {
        let field = PathMatrix::from_element(1, 2, 3.0);
        let mut rng = StdRng::seed_from_u64(2024);
        let k = 20_000;
        let batch = generate_perturbed_batch(&field, 0.1, k, &mut rng).unwrap();

        let rel: Vec<f64> = batch.axis_ensemble(0, crate::constants::Axis::X)
            .map(|v| v / 3.0 - 1.0)
            .collect();
        let mean = rel.iter().sum::<f64>() / k as f64;
        let sd = (rel.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / k as f64).sqrt();
        assert_relative_eq!(mean, 0.0, epsilon = 5e-3);
        assert_relative_eq!(sd, 0.1, epsilon = 5e-3);
    }

    #[test]
    fn test_invalid_inputs() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut bad = nominal(3);
        bad[(1, 1)] = f64::NAN;
        assert!(matches!(
            generate_perturbed_batch(&bad, 0.1, 2, &mut rng),
            Err(NoiseError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_invalid_noise_scale() {
        let mut rng = StdRng::seed_from_u64(0);
        for bad in [-0.1, -f64::MIN_POSITIVE, f64::NAN] {
            assert!(matches!(
                generate_perturbed_batch(&nominal(3), bad, 2, &mut rng),
                Err(NoiseError::InvalidAnalysisParameter(_))
            ));
        }
        assert!(matches!(
            generate_perturbed_batch(&nominal(3), f64::INFINITY, 2, &mut rng),
            Err(NoiseError::NoiseInjectionError(_))
        ));
        assert!(perturbed_realizations(&nominal(3), -1.0, 1, &mut rng).is_err());
    }

    #[test]
    fn test_complex_field_drops_imaginary_part() {
        let field = ComplexField::from_fn(3, 2, |i, j| Complex::new((i + j) as f64, 5.0));
        let mut rng = StdRng::seed_from_u64(11);
        let batch = generate_perturbed_complex_batch(&field, 0.0, 2, &mut rng).unwrap();
        assert_eq!(batch.realization_matrix(1), field.map(|e| e.re));
    }
}
