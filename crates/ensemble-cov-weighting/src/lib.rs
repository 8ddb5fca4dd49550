#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/ensemble-cov/ensemble-cov/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod ensemble;
pub mod orchestrator;
pub mod selection;
pub mod source;

pub use ensemble::{Ensemble, Structure};
pub use orchestrator::{
    CovarianceOptions, apply_weights, covariance_matrix, covariance_matrix_with,
};
pub use selection::Selection;
pub use source::{ObservationSource, ReferenceSource};

use ensemble_cov_estimators::CovarianceError;
use thiserror::Error;

/// Errors raised by observation and reference providers
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SourceError {
    /// Coordinates are not laid out as (frames, atoms, 3) or (atoms, 3)
    #[error("Expected 3 spatial components per atom, got {0}")]
    SpatialAxes(usize),

    /// Number of masses differs from the number of atoms
    #[error("Mass count mismatch: expected {expected} atoms, got {actual} masses")]
    MassCount {
        /// Number of atoms
        expected: usize,
        /// Number of masses
        actual: usize,
    },

    /// Mass that is not a positive finite number
    #[error("Invalid mass {value} for atom {atom}")]
    InvalidMass {
        /// Atom index
        atom: usize,
        /// Offending mass
        value: f64,
    },

    /// Selection resolved to no atoms
    #[error("Selection contains no atoms")]
    EmptySelection,

    /// Selection refers to an atom that does not exist
    #[error("Atom index {index} out of range for {n_atoms} atoms")]
    AtomOutOfRange {
        /// Requested atom index
        index: usize,
        /// Number of atoms available
        n_atoms: usize,
    },
}

/// Errors raised while computing a weighted covariance matrix
#[derive(Debug, Error, Clone, PartialEq)]
pub enum WeightingError {
    /// Estimation error
    #[error("Covariance error: {0}")]
    Covariance(#[from] CovarianceError),

    /// Observation or reference provider error
    #[error("Source error: {0}")]
    Source(#[from] SourceError),

    /// A per-dimension vector does not match the covariance dimension
    #[error("Dimension mismatch for {what}: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Which input was mismatched
        what: &'static str,
        /// Expected length
        expected: usize,
        /// Actual length
        actual: usize,
    },

    /// Weight that is not a positive finite number
    #[error("Invalid weight {value} at dimension {index}")]
    InvalidWeight {
        /// Dimension index
        index: usize,
        /// Offending weight
        value: f64,
    },
}
