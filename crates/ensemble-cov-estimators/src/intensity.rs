//! Shrinkage intensity
//!
//! A scalar in `[0, 1]` weighting the structured prior against the sample
//! covariance. Explicit values are validated; auto-estimated values are
//! clamped into range.

use super::CovarianceError;
use derive_more::{Display, Into};
use serde::{Deserialize, Serialize};

/// Shrinkage intensity, always within `[0, 1]`
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Display, Into, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct ShrinkageIntensity(f64);

impl ShrinkageIntensity {
    /// No shrinkage: the estimate is the sample covariance
    pub const NONE: Self = Self(0.0);

    /// Full shrinkage: the estimate is the structured prior
    pub const FULL: Self = Self(1.0);

    /// Validate an explicitly requested intensity.
    ///
    /// # Errors
    /// Returns [`CovarianceError::InvalidShrinkage`] when `value` is not a
    /// finite number in `[0, 1]`.
    pub fn try_new(value: f64) -> Result<Self, CovarianceError> {
        if (0.0..=1.0).contains(&value) {
            Ok(Self(value))
        } else {
            Err(CovarianceError::InvalidShrinkage(value))
        }
    }

    /// Clamp an estimated intensity into `[0, 1]`.
    ///
    /// # Errors
    /// Returns [`CovarianceError::NonFiniteIntensity`] for NaN input.
    pub fn clamped(value: f64) -> Result<Self, CovarianceError> {
        if value.is_nan() {
            return Err(CovarianceError::NonFiniteIntensity);
        }
        Ok(Self(value.clamp(0.0, 1.0)))
    }

    /// The raw value
    pub const fn value(self) -> f64 {
        self.0
    }
}

impl TryFrom<f64> for ShrinkageIntensity {
    type Error = CovarianceError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::try_new(value)
    }
}
