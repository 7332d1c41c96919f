//! Pharmaceutics and pharmacology models.
//!
//! Each submodule covers one topic and exposes plain formula functions plus
//! curve builders that sample them onto a grid. Curves come back as a
//! [`Profile`]: a shared x axis with one or more labelled [`Series`].
//!
//! Formula functions are unguarded. Parameter structs and `validate_*`
//! helpers reject inputs outside a model's domain with [`Error`].
//!
//! ```
//! use pharmsim::pharm::dissolution::{self, DissolutionParams};
//!
//! let params = DissolutionParams::default();
//! let curve = dissolution::profile(&params, 24.0, 100);
//! let released = curve.get("Drug Released (mg)").unwrap();
//! assert_eq!(released[0], 0.0);
//! assert!(released[99] > 90.0);
//! ```

pub mod dissolution;
mod error;
pub mod excipient;
pub mod grid;
pub mod interaction;
pub mod ionization;
pub mod particle;
pub mod pd;
pub mod physical;
pub mod pk;
pub mod release;
mod series;

pub use error::Error;
pub use series::{Profile, Series};
