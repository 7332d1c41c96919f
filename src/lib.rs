//! Interactive pharmaceutics and pharmacology models with a Rule-of-5 drug
//! design game.
//!
//! The library evaluates the classic equations taught in pharmaceutics and
//! pharmacology courses and returns the sampled curves, metrics and tables
//! behind each chart. A small cheminformatics layer (SMILES, descriptors,
//! functional-group attachment and depiction) drives the Lipinski game.
//!
//! # Features
//!
//! - **Dissolution and release**: First/zero-order dissolution, Higuchi,
//!   Korsmeyer-Peppas, biphasic and erosion kinetics, Fick's laws
//! - **Ionization**: Henderson-Hasselbalch profiles for weak acids and bases
//! - **Particle size**: Seeded lognormal sampling and Noyes-Whitney dissolution
//! - **Pharmacokinetics**: One- and two-compartment models, route comparison
//! - **Pharmacodynamics**: Occupancy, Hill, antagonism, therapeutic window
//! - **Physical pharmacy, interactions and excipients**: Solubility, buffers,
//!   rheology, stability, drug-drug interactions, excipient selection
//! - **Chemistry**: SMILES I/O, Rule-of-5 descriptors, substituent
//!   attachment, 2-D/3-D depiction as V2000 mol blocks
//!
//! # Quick Start
//!
//! ```
//! use pharmsim::chem::lipinski_profile;
//! use pharmsim::pharm::pk;
//!
//! // One-compartment IV bolus: 500 mg into 50 L.
//! assert_eq!(pk::iv_bolus(0.0, 500.0, 50.0, 0.5), 10.0);
//!
//! // Aspirin passes the Rule of 5.
//! let report = lipinski_profile("CC(=O)Oc1ccccc1C(=O)O")?;
//! assert!(report.compliant);
//! assert_eq!(report.descriptors.h_bond_donors, 1);
//! # Ok::<(), pharmsim::chem::Error>(())
//! ```
//!
//! # Module Organization
//!
//! - [`pharm`]: Formula evaluators, one submodule per topic
//! - [`chem`]: SMILES, descriptors, Lipinski rules and depiction
//! - [`game`]: Session record, action handler and render cache
//! - [`io`]: SDF, CSV and JSON output
//! - [`config`]: Embedded defaults and user overrides
//!
//! # Data Types
//!
//! - [`Molecule`]: Atoms and bonds with hydrogen bookkeeping
//! - [`Atom`]: Element, charge, isotope, aromaticity and coordinates
//! - [`Bond`]: Bond between two atoms with bond order
//! - [`Element`]: Chemical element, including the `*` placeholder
//! - [`BondOrder`]: Single, Double, Triple or Aromatic
//! - [`pharm::Profile`]: Labelled curves sharing one x grid

mod model;

pub mod chem;
pub mod config;
pub mod game;
pub mod io;
pub mod pharm;

pub use model::atom::Atom;
pub use model::molecule::{Bond, Molecule};
pub use model::types::{BondOrder, Element, ParseBondOrderError, ParseElementError};
