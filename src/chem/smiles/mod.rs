//! SMILES reading and writing.
//!
//! The reader covers the organic subset, bracket atoms (isotope, hydrogen
//! count, charge, atom map), the `*` wildcard, branches, ring closures and
//! `.` disconnections. Stereo markers are accepted and dropped.

mod parser;
mod writer;

pub use parser::parse;
pub use writer::write;
