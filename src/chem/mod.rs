//! Small-molecule chemistry for the Lipinski design game.
//!
//! This module reads and writes SMILES, perceives implicit hydrogens, edits
//! molecular graphs through the [`MolecularGraph`] capability trait, computes
//! Rule-of-5 descriptors and generates depiction coordinates.
//!
//! # Substitution
//!
//! [`attach_functional_group`] swaps one hydrogen of a base molecule for a
//! substituent written with a `*` attachment point:
//!
//! ```
//! use pharmsim::chem::{attach_smiles, Molecule};
//!
//! let propane = attach_smiles::<Molecule>("CC", "[*:1]C").unwrap();
//! assert_eq!(propane, "CCC");
//! ```

mod attach;
mod descriptors;
mod embed;
mod error;
mod graph;
mod lipinski;
pub mod smiles;
mod valence;

pub use attach::{attach_functional_group, attach_smiles};
pub use descriptors::{
    Descriptors, crippen_logp, exact_molecular_weight, h_bond_acceptors, h_bond_donors,
};
pub use embed::{Dimensions, EmbedOptions, depict_2d, embed_3d};
pub use error::Error;
pub use graph::{MolecularGraph, add_hydrogens, remove_hydrogens};
pub use lipinski::{
    LipinskiReport, MAX_H_BOND_ACCEPTORS, MAX_H_BOND_DONORS, MAX_LOGP, MAX_MOLECULAR_WEIGHT,
    RULES_REQUIRED, Rule, RuleCheck,
};
pub use valence::{perceive_implicit_hydrogens, sanitize, validate};

pub use crate::model::molecule::Molecule;

/// Parses SMILES and evaluates the Rule of 5 in one step.
pub fn lipinski_profile(smiles: &str) -> Result<LipinskiReport, Error> {
    let mol = smiles::parse(smiles)?;
    Ok(LipinskiReport::evaluate(Descriptors::compute(&mol)))
}
