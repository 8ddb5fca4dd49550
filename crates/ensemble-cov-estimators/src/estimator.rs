//! Estimator selection
//!
//! Only two estimators exist, so selection is a closed enum rather than a
//! trait object. [`EstimatorConfig`] is the serialisable choice;
//! [`EstimatorConfig::build`] turns it into a fresh [`Estimator`].

use super::{
    CovarianceError, CovarianceEstimator,
    ledoit_wolf::{LedoitWolfEstimator, ShrinkageConfig},
    maximum_likelihood::MaximumLikelihoodEstimator,
};
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

/// Which covariance estimator to use
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum EstimatorConfig {
    /// Sample covariance
    MaximumLikelihood,
    /// Ledoit-Wolf single-factor shrinkage
    Shrinkage(ShrinkageConfig),
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self::Shrinkage(ShrinkageConfig::default())
    }
}

impl EstimatorConfig {
    /// Build a new estimator instance.
    ///
    /// Every call returns an independent instance, so a memoised shrinkage
    /// intensity never leaks from one build to the next.
    ///
    /// # Errors
    /// Returns [`CovarianceError::InvalidShrinkage`] for an explicit
    /// intensity outside [0, 1].
    pub fn build(&self) -> Result<Estimator, CovarianceError> {
        Ok(match self {
            Self::MaximumLikelihood => Estimator::MaximumLikelihood(MaximumLikelihoodEstimator),
            Self::Shrinkage(config) => {
                Estimator::Shrinkage(LedoitWolfEstimator::new(config.clone())?)
            }
        })
    }
}

/// A constructed covariance estimator
#[derive(Debug)]
pub enum Estimator {
    /// Sample covariance
    MaximumLikelihood(MaximumLikelihoodEstimator),
    /// Ledoit-Wolf single-factor shrinkage
    Shrinkage(LedoitWolfEstimator),
}

impl Default for Estimator {
    fn default() -> Self {
        Self::Shrinkage(LedoitWolfEstimator::default())
    }
}

impl Estimator {
    /// Short name used in logs
    pub const fn name(&self) -> &'static str {
        match self {
            Self::MaximumLikelihood(_) => "maximum_likelihood",
            Self::Shrinkage(_) => "shrinkage",
        }
    }
}

impl From<MaximumLikelihoodEstimator> for Estimator {
    fn from(estimator: MaximumLikelihoodEstimator) -> Self {
        Self::MaximumLikelihood(estimator)
    }
}

impl From<LedoitWolfEstimator> for Estimator {
    fn from(estimator: LedoitWolfEstimator) -> Self {
        Self::Shrinkage(estimator)
    }
}

impl CovarianceEstimator for Estimator {
    fn estimate(
        &self,
        observations: &Array2<f64>,
        reference: Option<&Array1<f64>>,
    ) -> Result<Array2<f64>, CovarianceError> {
        match self {
            Self::MaximumLikelihood(estimator) => estimator.estimate(observations, reference),
            Self::Shrinkage(estimator) => estimator.estimate(observations, reference),
        }
    }
}
