//! Ledoit-Wolf Shrinkage Covariance Estimator
//!
//! Implements the single-factor shrinkage estimator from:
//! "Improved Estimation of the Covariance Matrix of Stock Returns With an
//! Application to Portfolio Selection" (Ledoit & Wolf, Journal of Empirical
//! Finance 10(5), 2003)
//!
//! The row-wise average of the centred observations acts as a synthetic
//! "market" factor. The prior keeps the sample variances and replaces every
//! covariance with the one implied by that single factor:
//!
//! ```text
//! F[i][j] = covmkt[i] * covmkt[j] / varmkt   (i != j)
//! F[i][i] = S[i][i]
//! Σ_LW    = δ F + (1 - δ) S
//! ```
//!
//! δ is either supplied by the caller or estimated in closed form from
//! second and fourth moments of the centred data.
//!
//! # Memoisation
//!
//! An auto-estimated δ is cached on the estimator (when
//! [`ShrinkageConfig::memoize`] is set) and reused by later calls. The cache
//! lives in a [`Cell`], so the estimator is `!Sync` and cannot be shared
//! across threads. Build a fresh estimator, or call
//! [`LedoitWolfEstimator::reset`], to re-estimate δ for new data.

use super::{
    CovarianceError, CovarianceEstimator, intensity::ShrinkageIntensity,
    maximum_likelihood::MaximumLikelihoodEstimator, utils::center,
};
use ndarray::{Array1, Array2, Axis, s};
use serde::{Deserialize, Serialize};
use std::cell::Cell;

/// Ledoit-Wolf covariance estimator configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShrinkageConfig {
    /// Fixed shrinkage intensity in [0, 1] (None = estimate from data)
    pub intensity: Option<f64>,

    /// Cache the auto-estimated intensity for later calls (default: true)
    pub memoize: bool,

    /// Minimum number of frames required (default: 2, never less than 2)
    pub min_observations: usize,
}

impl Default for ShrinkageConfig {
    fn default() -> Self {
        Self {
            intensity: None,
            memoize: true,
            min_observations: 2,
        }
    }
}

/// Intermediate quantities of the single-factor model
#[derive(Debug, Clone)]
pub struct ShrinkageComponents {
    /// Population-normalised sample covariance (D x D)
    pub sample: Array2<f64>,
    /// Single-factor prior with the sample variances on the diagonal (D x D)
    pub prior: Array2<f64>,
    /// Covariance of each dimension with the market factor (D)
    pub covmkt: Array1<f64>,
    /// Variance of the market factor
    pub varmkt: f64,
    /// Intensity the estimator would apply without estimating: the explicit
    /// value, else the memoised one, else None
    pub intensity: Option<ShrinkageIntensity>,
}

/// Centred data kept alongside the components for the intensity estimate
struct FactorModel {
    centered: Array2<f64>,
    market: Array1<f64>,
    components: ShrinkageComponents,
}

/// Ledoit-Wolf single-factor shrinkage covariance estimator
#[derive(Debug)]
pub struct LedoitWolfEstimator {
    config: ShrinkageConfig,
    explicit: Option<ShrinkageIntensity>,
    memo: Cell<Option<ShrinkageIntensity>>,
}

impl Default for LedoitWolfEstimator {
    fn default() -> Self {
        Self {
            config: ShrinkageConfig::default(),
            explicit: None,
            memo: Cell::new(None),
        }
    }
}

impl LedoitWolfEstimator {
    /// Create a new Ledoit-Wolf estimator with the given configuration
    ///
    /// # Errors
    /// Returns [`CovarianceError::InvalidShrinkage`] if an explicit intensity
    /// lies outside [0, 1].
    pub fn new(config: ShrinkageConfig) -> Result<Self, CovarianceError> {
        let explicit = config
            .intensity
            .map(ShrinkageIntensity::try_new)
            .transpose()?;
        Ok(Self {
            config,
            explicit,
            memo: Cell::new(None),
        })
    }

    /// Create an estimator with a fixed shrinkage intensity
    ///
    /// # Errors
    /// Returns [`CovarianceError::InvalidShrinkage`] if `intensity` lies
    /// outside [0, 1].
    pub fn with_intensity(intensity: f64) -> Result<Self, CovarianceError> {
        Self::new(ShrinkageConfig {
            intensity: Some(intensity),
            ..Default::default()
        })
    }

    /// The configuration this estimator was built from
    pub const fn config(&self) -> &ShrinkageConfig {
        &self.config
    }

    /// Intensity the next call will use: the explicit value, else the
    /// memoised estimate, else None (it will be estimated).
    pub fn intensity(&self) -> Option<ShrinkageIntensity> {
        self.explicit.or_else(|| self.memo.get())
    }

    /// Forget a memoised intensity. Explicit intensities are kept.
    pub fn reset(&self) {
        self.memo.set(None);
    }

    /// Compute the sample covariance, market factor moments and prior
    pub fn decompose(
        &self,
        observations: &Array2<f64>,
        reference: Option<&Array1<f64>>,
    ) -> Result<ShrinkageComponents, CovarianceError> {
        Ok(self.factor_model(observations, reference)?.components)
    }

    /// Estimate the optimal intensity for the data without reading or
    /// updating the memoised value
    pub fn optimal_intensity(
        &self,
        observations: &Array2<f64>,
        reference: Option<&Array1<f64>>,
    ) -> Result<ShrinkageIntensity, CovarianceError> {
        let model = self.factor_model(observations, reference)?;
        Self::estimate_intensity(&model)
    }

    fn factor_model(
        &self,
        observations: &Array2<f64>,
        reference: Option<&Array1<f64>>,
    ) -> Result<FactorModel, CovarianceError> {
        let (n_frames, n_dims) = observations.dim();
        if n_dims == 0 {
            return Err(CovarianceError::EmptyDimensions);
        }

        let required = self.config.min_observations.max(2);
        if n_frames < required {
            return Err(CovarianceError::InsufficientData {
                required,
                actual: n_frames,
            });
        }

        let centered = center(observations, reference)?;
        let market = centered
            .mean_axis(Axis(1))
            .ok_or(CovarianceError::EmptyDimensions)?;

        // Covariance of [X | xmkt], treating the augmented matrix as already
        // centred, rescaled by (T-1)/T
        let mut augmented = Array2::<f64>::zeros((n_frames, n_dims + 1));
        augmented.slice_mut(s![.., ..n_dims]).assign(&centered);
        augmented.column_mut(n_dims).assign(&market);

        let t = n_frames as f64;
        let origin = Array1::<f64>::zeros(n_dims + 1);
        let joint =
            MaximumLikelihoodEstimator.estimate(&augmented, Some(&origin))? * ((t - 1.0) / t);

        let covmkt = joint.slice(s![..n_dims, n_dims]).to_owned();
        let varmkt = joint[[n_dims, n_dims]];
        let sample = joint.slice(s![..n_dims, ..n_dims]).to_owned();

        if varmkt.is_nan() || varmkt <= 0.0 {
            return Err(CovarianceError::DegenerateFactor(varmkt));
        }

        let column = covmkt.view().insert_axis(Axis(1));
        let row = covmkt.view().insert_axis(Axis(0));
        let mut prior = column.dot(&row) / varmkt;
        prior.diag_mut().assign(&sample.diag());

        Ok(FactorModel {
            centered,
            market,
            components: ShrinkageComponents {
                sample,
                prior,
                covmkt,
                varmkt,
                intensity: self.intensity(),
            },
        })
    }

    /// Closed-form risk-minimising intensity, clamped to [0, 1]
    fn estimate_intensity(model: &FactorModel) -> Result<ShrinkageIntensity, CovarianceError> {
        let x = &model.centered;
        let ShrinkageComponents {
            sample,
            prior,
            covmkt,
            varmkt,
            ..
        } = &model.components;
        let varmkt = *varmkt;
        let t = x.nrows() as f64;

        // Squared Frobenius distance between sample and prior
        let c = (sample - prior).mapv(|v| v * v).sum();

        let y = x.mapv(|v| v * v);
        let p = y.t().dot(&y).sum() / t - sample.mapv(|v| v * v).sum();
        let rdiag = y.mapv(|v| v * v).sum() / t - sample.diag().mapv(|v| v * v).sum();

        let z = x * &model.market.view().insert_axis(Axis(1));

        let v1 = y.t().dot(&z) / t - &(&covmkt.view().insert_axis(Axis(1)) * sample);
        let roff1 = (v1.dot(covmkt).sum() - (&v1.diag() * covmkt).sum()) / varmkt;

        let v3 = z.t().dot(&z) / t - sample * varmkt;
        let roff3 = (covmkt.dot(&v3.dot(covmkt))
            - (&v3.diag() * &covmkt.mapv(|v| v * v)).sum())
            / (varmkt * varmkt);

        let roff = 2.0 * roff1 - roff3;
        let r = rdiag + roff;

        if c <= 0.0 {
            // Sample already equals the prior; every intensity gives the same result
            tracing::debug!("sample covariance coincides with prior, intensity set to 0");
            return Ok(ShrinkageIntensity::NONE);
        }

        let raw = (p - r) / c / t;
        if !(0.0..=1.0).contains(&raw) {
            tracing::warn!(raw, "estimated shrinkage intensity outside [0, 1], clamping");
        }
        let intensity = ShrinkageIntensity::clamped(raw)?;
        tracing::debug!(raw, intensity = intensity.value(), "estimated shrinkage intensity");

        Ok(intensity)
    }
}

impl CovarianceEstimator for LedoitWolfEstimator {
    fn estimate(
        &self,
        observations: &Array2<f64>,
        reference: Option<&Array1<f64>>,
    ) -> Result<Array2<f64>, CovarianceError> {
        let model = self.factor_model(observations, reference)?;

        let intensity = if let Some(explicit) = self.explicit {
            explicit
        } else if let Some(cached) = self.memo.get() {
            tracing::debug!(intensity = cached.value(), "reusing memoised shrinkage intensity");
            cached
        } else {
            let estimated = Self::estimate_intensity(&model)?;
            if self.config.memoize {
                self.memo.set(Some(estimated));
            }
            estimated
        };

        let delta = intensity.value();
        let ShrinkageComponents { sample, prior, .. } = model.components;

        // Σ_LW = δ F + (1-δ) S
        Ok(prior * delta + sample * (1.0 - delta))
    }
}
