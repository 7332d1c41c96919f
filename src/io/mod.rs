//! File output (and SDF input) for evaluated profiles and molecules.
//!
//! Profiles are written as CSV, any serializable result as JSON, and
//! molecules as V2000 mol blocks.

use std::fmt;

pub mod csv;
pub mod error;
pub mod json;
pub mod sdf;
pub mod util;

pub use error::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Sdf,
    Csv,
    Json,
}

impl Format {
    /// Maps a file extension (without the dot, any case) to a format.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "sdf" | "mol" => Some(Format::Sdf),
            "csv" => Some(Format::Csv),
            "json" => Some(Format::Json),
            _ => None,
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Format::Sdf => write!(f, "SDF"),
            Format::Csv => write!(f, "CSV"),
            Format::Json => write!(f, "JSON"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extensions_map_case_insensitively() {
        assert_eq!(Format::from_extension("SDF"), Some(Format::Sdf));
        assert_eq!(Format::from_extension("mol"), Some(Format::Sdf));
        assert_eq!(Format::from_extension("Json"), Some(Format::Json));
        assert_eq!(Format::from_extension("csv"), Some(Format::Csv));
        assert_eq!(Format::from_extension("pdb"), None);
    }
}
