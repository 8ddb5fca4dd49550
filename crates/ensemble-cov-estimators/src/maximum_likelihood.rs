//! Maximum-likelihood covariance estimator
//!
//! Two normalisations, depending on where the centring point comes from:
//!
//! ```text
//! reference r given:  Σ = (1/T)     Σ_t (x_t - r)(x_t - r)^T
//! no reference:       Σ = (1/(T-1)) Σ_t (x_t - μ)(x_t - μ)^T
//! ```
//!
//! The first form measures spread around an externally supplied structure
//! and uses the population normalisation; the second is the usual unbiased
//! sample covariance. Both are kept as-is because callers depend on each.

use super::{CovarianceError, CovarianceEstimator, utils::center};
use ndarray::{Array1, Array2};

/// Sample (maximum-likelihood) covariance estimator
#[derive(Debug, Clone, Copy, Default)]
pub struct MaximumLikelihoodEstimator;

impl MaximumLikelihoodEstimator {
    /// Create a new maximum-likelihood estimator
    pub const fn new() -> Self {
        Self
    }
}

impl CovarianceEstimator for MaximumLikelihoodEstimator {
    fn estimate(
        &self,
        observations: &Array2<f64>,
        reference: Option<&Array1<f64>>,
    ) -> Result<Array2<f64>, CovarianceError> {
        let (n_frames, n_dims) = observations.dim();
        if n_dims == 0 {
            return Err(CovarianceError::EmptyDimensions);
        }

        let required = if reference.is_some() { 1 } else { 2 };
        if n_frames < required {
            return Err(CovarianceError::InsufficientData {
                required,
                actual: n_frames,
            });
        }

        tracing::debug!(
            n_frames,
            n_dims,
            with_reference = reference.is_some(),
            "maximum-likelihood covariance"
        );

        let offsets = center(observations, reference)?;
        let denominator = if reference.is_some() {
            n_frames as f64
        } else {
            (n_frames - 1) as f64
        };

        Ok(offsets.t().dot(&offsets) / denominator)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::is_symmetric;
    use approx::assert_relative_eq;
    use ndarray::array;

    #[test]
    fn test_unbiased_without_reference() {
        let obs = array![[1.0, 2.0], [3.0, 4.0], [5.0, 6.0]];
        let cov = MaximumLikelihoodEstimator.estimate(&obs, None).unwrap();

        assert_eq!(cov, array![[4.0, 4.0], [4.0, 4.0]]);
    }

    #[test]
    fn test_population_with_mean_reference() {
        let obs = array![[1.0, 2.0], [3.0, 4.0], [5.0, 6.0]];
        let mean = array![3.0, 4.0];
        let cov = MaximumLikelihoodEstimator
            .estimate(&obs, Some(&mean))
            .unwrap();

        for value in cov.iter() {
            assert_relative_eq!(*value, 8.0 / 3.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_reference_branch_differs_by_population_factor() {
        let obs = array![
            [0.3, -1.2, 2.0],
            [1.1, 0.4, -0.7],
            [-0.5, 0.9, 0.2],
            [2.2, -0.3, 1.4],
            [0.0, 1.7, -1.1]
        ];
        let t = obs.nrows() as f64;
        let mean = obs.mean_axis(ndarray::Axis(0)).unwrap();

        let unbiased = MaximumLikelihoodEstimator.estimate(&obs, None).unwrap();
        let population = MaximumLikelihoodEstimator
            .estimate(&obs, Some(&mean))
            .unwrap();

        for ((i, j), value) in population.indexed_iter() {
            assert_relative_eq!(*value, unbiased[[i, j]] * (t - 1.0) / t, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_reference_away_from_mean() {
        let obs = array![[1.0], [3.0]];
        let reference = array![0.0];
        let cov = MaximumLikelihoodEstimator
            .estimate(&obs, Some(&reference))
            .unwrap();

        // (1 + 9) / 2
        assert_relative_eq!(cov[[0, 0]], 5.0, epsilon = 1e-12);
    }

    #[test]
    fn test_single_frame_needs_reference() {
        let obs = array![[1.0, 2.0]];
        assert_eq!(
            MaximumLikelihoodEstimator.estimate(&obs, None),
            Err(CovarianceError::InsufficientData {
                required: 2,
                actual: 1
            })
        );

        let reference = array![0.0, 0.0];
        let cov = MaximumLikelihoodEstimator
            .estimate(&obs, Some(&reference))
            .unwrap();
        assert_eq!(cov, array![[1.0, 2.0], [2.0, 4.0]]);
    }

    #[test]
    fn test_reference_length_mismatch() {
        let obs = array![[1.0, 2.0], [3.0, 4.0]];
        let reference = array![1.0];
        assert_eq!(
            MaximumLikelihoodEstimator.estimate(&obs, Some(&reference)),
            Err(CovarianceError::DimensionMismatch {
                expected: 2,
                actual: 1
            })
        );
    }

    #[test]
    fn test_empty_dimensions() {
        let obs = Array2::<f64>::zeros((4, 0));
        assert_eq!(
            MaximumLikelihoodEstimator.estimate(&obs, None),
            Err(CovarianceError::EmptyDimensions)
        );
    }

    #[test]
    fn test_symmetric_with_non_negative_diagonal() {
        let obs = Array2::from_shape_fn((12, 4), |(t, d)| ((t * 7 + d * 3) as f64 * 0.37).sin());
        let cov = MaximumLikelihoodEstimator.estimate(&obs, None).unwrap();

        assert!(is_symmetric(&cov, 1e-12));
        assert!(cov.diag().iter().all(|&v| v >= 0.0));
    }
}
