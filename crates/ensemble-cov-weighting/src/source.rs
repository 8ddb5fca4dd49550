//! Observation and reference provider contracts

use super::{SourceError, selection::Selection};
use ndarray::{Array1, Array2};

/// Supplies flattened observations and per-dimension weights.
///
/// Dimensions are ordered atom-major then by spatial axis, so atom `a`
/// occupies columns `3a`, `3a + 1`, `3a + 2` of the selection.
pub trait ObservationSource {
    /// `T x D` observation matrix for the selection, one frame per row
    fn observations(&self, selection: &Selection) -> Result<Array2<f64>, SourceError>;

    /// Length-`D` weights for the selection, one entry per column of
    /// [`ObservationSource::observations`]
    fn weights(&self, selection: &Selection) -> Result<Array1<f64>, SourceError>;
}

/// Supplies a single reference structure with the same layout as an
/// [`ObservationSource`] row
pub trait ReferenceSource {
    /// Length-`D` flattened reference coordinates for the selection
    fn reference(&self, selection: &Selection) -> Result<Array1<f64>, SourceError>;
}
