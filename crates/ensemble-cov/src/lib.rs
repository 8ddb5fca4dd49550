#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/ensemble-cov/ensemble-cov/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Re-export main types from sub-crates
pub use ensemble_cov_estimators as estimators;
pub use ensemble_cov_weighting as weighting;

pub use estimators::{
    CovarianceError, CovarianceEstimator, Estimator, EstimatorConfig, LedoitWolfEstimator,
    MaximumLikelihoodEstimator, ShrinkageConfig, ShrinkageIntensity,
};
pub use weighting::{
    CovarianceOptions, Ensemble, ObservationSource, ReferenceSource, Selection, SourceError,
    Structure, WeightingError, apply_weights, covariance_matrix, covariance_matrix_with,
};

/// Common imports
pub mod prelude {
    pub use crate::estimators::{
        CovarianceEstimator, EstimatorConfig, LedoitWolfEstimator, MaximumLikelihoodEstimator,
        ShrinkageConfig,
    };
    pub use crate::weighting::{
        CovarianceOptions, Ensemble, ObservationSource, ReferenceSource, Selection, Structure,
        covariance_matrix, covariance_matrix_with,
    };
}

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
