//! In-memory ensembles and reference structures
//!
//! An [`Ensemble`] holds already-aligned coordinates of shape
//! `(frames, atoms, 3)` together with one mass per atom. A [`Structure`]
//! is a single conformation of shape `(atoms, 3)` used as a centring
//! reference.

use super::{
    SourceError,
    selection::Selection,
    source::{ObservationSource, ReferenceSource},
};
use ndarray::{Array1, Array2, Array3};

const SPATIAL_AXES: usize = 3;

/// Aligned trajectory coordinates with per-atom masses
#[derive(Debug, Clone)]
pub struct Ensemble {
    coordinates: Array3<f64>,
    masses: Array1<f64>,
}

impl Ensemble {
    /// Create an ensemble from `(frames, atoms, 3)` coordinates and per-atom masses
    ///
    /// # Errors
    /// Fails if the last axis is not 3, if the mass count differs from the
    /// atom count, or if any mass is not a positive finite number.
    pub fn new(coordinates: Array3<f64>, masses: Array1<f64>) -> Result<Self, SourceError> {
        let (_, n_atoms, n_axes) = coordinates.dim();
        if n_axes != SPATIAL_AXES {
            return Err(SourceError::SpatialAxes(n_axes));
        }
        validate_masses(&masses, n_atoms)?;
        Ok(Self {
            coordinates,
            masses,
        })
    }

    /// Create an ensemble where every atom has unit mass
    pub fn unweighted(coordinates: Array3<f64>) -> Result<Self, SourceError> {
        let n_atoms = coordinates.dim().1;
        Self::new(coordinates, Array1::ones(n_atoms))
    }

    /// Number of frames
    pub fn n_frames(&self) -> usize {
        self.coordinates.dim().0
    }

    /// Number of atoms
    pub fn n_atoms(&self) -> usize {
        self.coordinates.dim().1
    }

    /// Per-atom masses
    pub const fn masses(&self) -> &Array1<f64> {
        &self.masses
    }
}

impl ObservationSource for Ensemble {
    fn observations(&self, selection: &Selection) -> Result<Array2<f64>, SourceError> {
        let atoms = selection.resolve(self.n_atoms())?;
        Ok(Array2::from_shape_fn(
            (self.n_frames(), atoms.len() * SPATIAL_AXES),
            |(frame, column)| {
                self.coordinates[[
                    frame,
                    atoms[column / SPATIAL_AXES],
                    column % SPATIAL_AXES,
                ]]
            },
        ))
    }

    fn weights(&self, selection: &Selection) -> Result<Array1<f64>, SourceError> {
        let atoms = selection.resolve(self.n_atoms())?;
        Ok(atoms
            .iter()
            .flat_map(|&atom| std::iter::repeat_n(self.masses[atom], SPATIAL_AXES))
            .collect())
    }
}

/// A single reference conformation
#[derive(Debug, Clone)]
pub struct Structure {
    positions: Array2<f64>,
}

impl Structure {
    /// Create a reference structure from `(atoms, 3)` positions
    ///
    /// # Errors
    /// Fails if the second axis is not 3.
    pub fn new(positions: Array2<f64>) -> Result<Self, SourceError> {
        let n_axes = positions.ncols();
        if n_axes != SPATIAL_AXES {
            return Err(SourceError::SpatialAxes(n_axes));
        }
        Ok(Self { positions })
    }

    /// Number of atoms
    pub fn n_atoms(&self) -> usize {
        self.positions.nrows()
    }
}

impl ReferenceSource for Structure {
    fn reference(&self, selection: &Selection) -> Result<Array1<f64>, SourceError> {
        let atoms = selection.resolve(self.n_atoms())?;
        Ok(atoms
            .iter()
            .flat_map(|&atom| self.positions.row(atom).to_vec())
            .collect())
    }
}

fn validate_masses(masses: &Array1<f64>, n_atoms: usize) -> Result<(), SourceError> {
    if masses.len() != n_atoms {
        return Err(SourceError::MassCount {
            expected: n_atoms,
            actual: masses.len(),
        });
    }
    match masses
        .iter()
        .enumerate()
        .find(|&(_, &m)| !(m.is_finite() && m > 0.0))
    {
        Some((atom, &value)) => Err(SourceError::InvalidMass { atom, value }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn two_atom_ensemble() -> Ensemble {
        // frame f, atom a, axis k -> 100 f + 10 a + k
        let coordinates =
            Array3::from_shape_fn((2, 2, 3), |(f, a, k)| (100 * f + 10 * a + k) as f64);
        Ensemble::new(coordinates, array![1.0, 16.0]).unwrap()
    }

    #[test]
    fn test_flattening_is_atom_major() {
        let ensemble = two_atom_ensemble();
        let obs = ensemble.observations(&Selection::All).unwrap();

        assert_eq!(
            obs,
            array![
                [0.0, 1.0, 2.0, 10.0, 11.0, 12.0],
                [100.0, 101.0, 102.0, 110.0, 111.0, 112.0]
            ]
        );
    }

    #[test]
    fn test_selection_subset() {
        let ensemble = two_atom_ensemble();
        let selection = Selection::Atoms(vec![1]);

        assert_eq!(
            ensemble.observations(&selection).unwrap(),
            array![[10.0, 11.0, 12.0], [110.0, 111.0, 112.0]]
        );
        assert_eq!(
            ensemble.weights(&selection).unwrap(),
            array![16.0, 16.0, 16.0]
        );
    }

    #[test]
    fn test_weights_repeat_per_axis() {
        let ensemble = two_atom_ensemble();
        assert_eq!(
            ensemble.weights(&Selection::All).unwrap(),
            array![1.0, 1.0, 1.0, 16.0, 16.0, 16.0]
        );
    }

    #[test]
    fn test_rejects_bad_layout() {
        let coordinates = Array3::<f64>::zeros((2, 2, 2));
        assert_eq!(
            Ensemble::unweighted(coordinates).unwrap_err(),
            SourceError::SpatialAxes(2)
        );
    }

    #[test]
    fn test_rejects_bad_masses() {
        let coordinates = Array3::<f64>::zeros((2, 2, 3));
        assert_eq!(
            Ensemble::new(coordinates.clone(), array![1.0]).unwrap_err(),
            SourceError::MassCount {
                expected: 2,
                actual: 1
            }
        );
        assert_eq!(
            Ensemble::new(coordinates, array![1.0, 0.0]).unwrap_err(),
            SourceError::InvalidMass {
                atom: 1,
                value: 0.0
            }
        );
    }

    #[test]
    fn test_structure_reference() {
        let structure = Structure::new(array![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]).unwrap();

        assert_eq!(
            structure.reference(&Selection::All).unwrap(),
            array![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]
        );
        assert_eq!(
            structure.reference(&Selection::Atoms(vec![1])).unwrap(),
            array![4.0, 5.0, 6.0]
        );
        assert!(Structure::new(array![[1.0, 2.0]]).is_err());
    }
}
