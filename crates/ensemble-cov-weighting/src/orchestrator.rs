//! Covariance orchestration
//!
//! Pulls the observation matrix (and optional reference) for a selection
//! out of a source, runs the estimator and optionally applies per-dimension
//! weights through the congruence transform
//!
//! ```text
//! Σ_w = W Σ W,   W = diag(sqrt(w))
//! ```
//!
//! which keeps the result symmetric and positive semi-definite.

use super::{
    WeightingError,
    selection::Selection,
    source::{ObservationSource, ReferenceSource},
};
use ensemble_cov_estimators::{CovarianceEstimator, EstimatorConfig};
use ndarray::{Array1, Array2, Zip};
use serde::{Deserialize, Serialize};

/// Options for [`covariance_matrix`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CovarianceOptions {
    /// Atoms to include (default: all)
    pub selection: Selection,

    /// Estimator to build for the call (default: Ledoit-Wolf shrinkage)
    pub estimator: EstimatorConfig,

    /// Whether to weight dimensions by the source's weights (default: true)
    pub mass_weighted: bool,
}

impl Default for CovarianceOptions {
    fn default() -> Self {
        Self {
            selection: Selection::All,
            estimator: EstimatorConfig::default(),
            mass_weighted: true,
        }
    }
}

/// Compute the covariance matrix of an ensemble.
///
/// A new estimator is built from `options.estimator` on every call, so a
/// memoised shrinkage intensity never carries over between calls. Use
/// [`covariance_matrix_with`] to supply (and reuse) an estimator instance.
///
/// # Arguments
/// * `source` - Ensemble providing observations and weights
/// * `options` - Selection, estimator and weighting choices
/// * `reference` - Optional structure to centre on instead of the mean
pub fn covariance_matrix<S>(
    source: &S,
    options: &CovarianceOptions,
    reference: Option<&dyn ReferenceSource>,
) -> Result<Array2<f64>, WeightingError>
where
    S: ObservationSource + ?Sized,
{
    let estimator = options.estimator.build()?;
    tracing::debug!(estimator = estimator.name(), "built covariance estimator");
    covariance_matrix_with(
        source,
        &options.selection,
        &estimator,
        options.mass_weighted,
        reference,
    )
}

/// Compute the covariance matrix of an ensemble with a caller-owned estimator
pub fn covariance_matrix_with<S, E>(
    source: &S,
    selection: &Selection,
    estimator: &E,
    mass_weighted: bool,
    reference: Option<&dyn ReferenceSource>,
) -> Result<Array2<f64>, WeightingError>
where
    S: ObservationSource + ?Sized,
    E: CovarianceEstimator + ?Sized,
{
    let observations = source.observations(selection)?;
    let (n_frames, n_dims) = observations.dim();

    let reference = reference
        .map(|structure| structure.reference(selection))
        .transpose()?;
    if let Some(reference) = &reference {
        if reference.len() != n_dims {
            return Err(WeightingError::DimensionMismatch {
                what: "reference",
                expected: n_dims,
                actual: reference.len(),
            });
        }
    }

    tracing::debug!(
        n_frames,
        n_dims,
        with_reference = reference.is_some(),
        mass_weighted,
        "computing ensemble covariance"
    );

    // Weights are checked before estimating so a failure leaves a caller-owned
    // estimator's memoised intensity untouched
    let weights = if mass_weighted {
        let weights = source.weights(selection)?;
        validate_weights(&weights, n_dims)?;
        Some(weights)
    } else {
        None
    };

    let sigma = estimator.estimate(&observations, reference.as_ref())?;
    match weights {
        Some(weights) => apply_weights(&sigma, &weights),
        None => Ok(sigma),
    }
}

/// Apply the congruence `W Σ W` with `W = diag(sqrt(weights))`.
///
/// # Errors
/// Fails if `sigma` is not square, if `weights` has the wrong length, or if
/// any weight is not a positive finite number.
pub fn apply_weights(
    sigma: &Array2<f64>,
    weights: &Array1<f64>,
) -> Result<Array2<f64>, WeightingError> {
    let (n_rows, n_cols) = sigma.dim();
    if n_rows != n_cols {
        return Err(WeightingError::DimensionMismatch {
            what: "covariance columns",
            expected: n_rows,
            actual: n_cols,
        });
    }
    validate_weights(weights, n_rows)?;

    tracing::debug!(n_dims = n_rows, "applying per-dimension weights");

    let roots = weights.mapv(f64::sqrt);
    let mut weighted = sigma.clone();
    Zip::indexed(&mut weighted).par_for_each(|(i, j), value| *value *= roots[i] * roots[j]);

    Ok(weighted)
}

fn validate_weights(weights: &Array1<f64>, n_dims: usize) -> Result<(), WeightingError> {
    if weights.len() != n_dims {
        return Err(WeightingError::DimensionMismatch {
            what: "weights",
            expected: n_dims,
            actual: weights.len(),
        });
    }
    match weights
        .iter()
        .enumerate()
        .find(|&(_, &w)| !(w.is_finite() && w > 0.0))
    {
        Some((index, &value)) => Err(WeightingError::InvalidWeight { index, value }),
        None => Ok(()),
    }
}
