#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/ensemble-cov/ensemble-cov/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod estimator;
pub mod intensity;
pub mod ledoit_wolf;
pub mod maximum_likelihood;
pub mod utils;

pub use estimator::{Estimator, EstimatorConfig};
pub use intensity::ShrinkageIntensity;
pub use ledoit_wolf::{LedoitWolfEstimator, ShrinkageComponents, ShrinkageConfig};
pub use maximum_likelihood::MaximumLikelihoodEstimator;
pub use utils::{
    EigenDecomposition, center, is_positive_semidefinite, is_symmetric, jacobi_eigendecomp,
};

use ndarray::{Array1, Array2};
use thiserror::Error;

/// Errors that can occur during covariance estimation
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CovarianceError {
    /// Not enough frames for the requested estimator
    #[error("Insufficient data: need at least {required} frames, got {actual}")]
    InsufficientData {
        /// Required number of frames
        required: usize,
        /// Actual number of frames
        actual: usize,
    },

    /// The observation matrix has no columns
    #[error("Observation matrix has no dimensions")]
    EmptyDimensions,

    /// Reference (or other per-dimension vector) does not match the column count
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Expected dimension
        expected: usize,
        /// Actual dimension
        actual: usize,
    },

    /// The synthetic market factor has no variance, so the prior is undefined
    #[error("Degenerate market factor: variance is {0}")]
    DegenerateFactor(f64),

    /// Explicit shrinkage intensity outside [0, 1]
    #[error("Invalid shrinkage intensity: {0} (must be between 0 and 1)")]
    InvalidShrinkage(f64),

    /// The closed-form shrinkage intensity could not be evaluated
    #[error("Shrinkage intensity evaluated to a non-finite value")]
    NonFiniteIntensity,
}

/// Capability shared by every covariance estimator.
///
/// `observations` is a `T x D` matrix with one frame per row. When a
/// `reference` of length `D` is supplied it replaces the sample mean as the
/// centring point.
pub trait CovarianceEstimator {
    /// Estimate the `D x D` covariance matrix of the observations
    fn estimate(
        &self,
        observations: &Array2<f64>,
        reference: Option<&Array1<f64>>,
    ) -> Result<Array2<f64>, CovarianceError>;
}
