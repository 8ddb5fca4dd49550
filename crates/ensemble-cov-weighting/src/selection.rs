//! Atom selections
//!
//! Selections are already-resolved atom index lists; parsing of selection
//! languages happens upstream.

use super::SourceError;
use serde::{Deserialize, Serialize};

/// Which atoms contribute to the observation matrix
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Selection {
    /// Every atom, in storage order
    #[default]
    All,
    /// Explicit atom indices, in the given order
    Atoms(Vec<usize>),
}

impl Selection {
    /// Resolve to concrete atom indices for a system of `n_atoms` atoms
    ///
    /// # Errors
    /// Returns [`SourceError::EmptySelection`] when nothing is selected and
    /// [`SourceError::AtomOutOfRange`] for indices past the last atom.
    pub fn resolve(&self, n_atoms: usize) -> Result<Vec<usize>, SourceError> {
        let indices = match self {
            Self::All => (0..n_atoms).collect::<Vec<_>>(),
            Self::Atoms(indices) => indices.clone(),
        };

        if indices.is_empty() {
            return Err(SourceError::EmptySelection);
        }
        if let Some(&index) = indices.iter().find(|&&i| i >= n_atoms) {
            return Err(SourceError::AtomOutOfRange { index, n_atoms });
        }

        Ok(indices)
    }
}

impl From<Vec<usize>> for Selection {
    fn from(indices: Vec<usize>) -> Self {
        Self::Atoms(indices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all() {
        assert_eq!(Selection::All.resolve(3).unwrap(), vec![0, 1, 2]);
        assert_eq!(Selection::All.resolve(0), Err(SourceError::EmptySelection));
    }

    #[test]
    fn test_atoms() {
        let selection = Selection::from(vec![2, 0]);
        assert_eq!(selection.resolve(3).unwrap(), vec![2, 0]);
        assert_eq!(
            selection.resolve(2),
            Err(SourceError::AtomOutOfRange {
                index: 2,
                n_atoms: 2
            })
        );
        assert_eq!(
            Selection::Atoms(vec![]).resolve(4),
            Err(SourceError::EmptySelection)
        );
    }

    #[test]
    fn test_serde() {
        assert_eq!(serde_json::to_string(&Selection::All).unwrap(), r#""all""#);
        let atoms: Selection = serde_json::from_str(r#"{"atoms":[1,3]}"#).unwrap();
        assert_eq!(atoms, Selection::Atoms(vec![1, 3]));
    }
}
