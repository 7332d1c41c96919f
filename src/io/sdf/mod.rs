//! V2000 mol blocks.

pub mod reader;
pub mod writer;

pub use reader::read;
pub use writer::{to_molblock, write};
