//! Core data structures representing molecules as graphs.
//!
//! - [`types`] – Supported elements and bond order classifications.
//! - [`atom`] – Atom with charge, isotope, aromaticity and hydrogen bookkeeping.
//! - [`molecule`] – Atoms plus bonds, with neighbour and ring queries.
//!
//! Hydrogens may live either as counts on their heavy atom (the usual state
//! after reading SMILES) or as explicit `H` atoms (after
//! [`crate::chem::add_hydrogens`]); [`molecule::Molecule::total_h`] sees both.

pub mod atom;
pub mod molecule;
pub mod types;
