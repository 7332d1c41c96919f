//! Error types for SMILES handling and molecular graph editing.

use thiserror::Error;

/// Errors raised while reading notation or editing a molecular graph.
///
/// None of these are fatal: callers treat each as a rejected interaction and
/// keep their previous molecule.
#[derive(Debug, Error)]
pub enum Error {
    /// The SMILES string could not be parsed.
    #[error("invalid SMILES at position {position}: {detail}")]
    Smiles {
        /// Byte offset into the input where parsing stopped.
        position: usize,
        /// Description of the problem.
        detail: String,
    },

    /// An atom ended up with a valence its element cannot take.
    #[error("valence error on atom {atom} ({symbol}): {detail}")]
    Valence {
        /// Atom index.
        atom: usize,
        /// Element symbol of the offending atom.
        symbol: &'static str,
        /// Description of the problem.
        detail: String,
    },

    /// An aromatic flag was found outside a ring.
    #[error("non-ring atom {0} marked aromatic")]
    AromaticOutsideRing(usize),

    /// The substituent could not be used as a fragment.
    #[error("invalid functional group '{smiles}': {detail}")]
    InvalidFragment {
        /// The fragment notation as supplied.
        smiles: String,
        /// Description of the problem.
        detail: String,
    },

    /// No heavy atom on the base molecule carries a hydrogen to replace.
    #[error("no hydrogen available for substitution")]
    NoHydrogen,

    /// Atom index out of range for a graph edit.
    #[error("atom index {index} out of range for molecule with {count} atoms")]
    AtomIndex {
        /// Requested index.
        index: usize,
        /// Number of atoms in the molecule.
        count: usize,
    },

    /// The molecule has no atoms.
    #[error("molecule is empty")]
    EmptyMolecule,
}

impl Error {
    /// Creates a [`Smiles`](Error::Smiles) error.
    pub fn smiles(position: usize, detail: impl Into<String>) -> Self {
        Self::Smiles {
            position,
            detail: detail.into(),
        }
    }

    /// Creates a [`Valence`](Error::Valence) error.
    pub fn valence(atom: usize, symbol: &'static str, detail: impl Into<String>) -> Self {
        Self::Valence {
            atom,
            symbol,
            detail: detail.into(),
        }
    }

    /// Creates an [`InvalidFragment`](Error::InvalidFragment) error.
    pub fn invalid_fragment(smiles: &str, detail: impl Into<String>) -> Self {
        Self::InvalidFragment {
            smiles: smiles.to_string(),
            detail: detail.into(),
        }
    }
}
