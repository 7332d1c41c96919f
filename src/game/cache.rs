//! Bounded memo of rendered mol blocks.

use std::num::NonZeroUsize;

use lru::LruCache;
use tracing::trace;

use super::error::Error;
use crate::chem::{Dimensions, EmbedOptions, Molecule, MolecularGraph, depict_2d, embed_3d};
use crate::io::sdf;

/// Least-recently-used cache of depictions keyed by canonical SMILES.
///
/// Spellings of the same molecule that write back to the same SMILES share
/// one entry.
pub struct RenderCache {
    entries: LruCache<(String, Dimensions), String>,
    options: EmbedOptions,
    hits: u64,
    misses: u64,
}

impl RenderCache {
    pub fn new(capacity: usize, options: EmbedOptions) -> Result<Self, Error> {
        let capacity = NonZeroUsize::new(capacity).ok_or(Error::ZeroCapacity)?;
        Ok(Self {
            entries: LruCache::new(capacity),
            options,
            hits: 0,
            misses: 0,
        })
    }

    /// Returns the V2000 mol block for `smiles`, rendering it on a miss.
    pub fn molblock(&mut self, smiles: &str, dims: Dimensions) -> Result<String, Error> {
        let mol = Molecule::parse(smiles)?;
        let key = (mol.to_smiles(), dims);
        if let Some(block) = self.entries.get(&key) {
            self.hits += 1;
            trace!(smiles = %key.0, ?dims, "render cache hit");
            return Ok(block.clone());
        }
        self.misses += 1;
        let placed = match dims {
            Dimensions::Two => depict_2d(&mol, self.options),
            Dimensions::Three => embed_3d(&mol, self.options),
        };
        let block = sdf::to_molblock(&placed, &key.0)?;
        self.entries.put(key, block.clone());
        Ok(block)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `(hits, misses)` since creation.
    pub fn stats(&self) -> (u64, u64) {
        (self.hits, self.misses)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cache(capacity: usize) -> RenderCache {
        RenderCache::new(capacity, EmbedOptions::default()).unwrap()
    }

    #[test]
    fn equivalent_spellings_share_an_entry() {
        let mut c = cache(4);
        let a = c.molblock("C(C)C", Dimensions::Three).unwrap();
        let b = c.molblock("CCC", Dimensions::Three).unwrap();
        assert_eq!(a, b);
        assert_eq!(c.len(), 1);
        assert_eq!(c.stats(), (1, 1));
    }

    #[test]
    fn dimensions_are_cached_separately() {
        let mut c = cache(4);
        let flat = c.molblock("CCO", Dimensions::Two).unwrap();
        let solid = c.molblock("CCO", Dimensions::Three).unwrap();
        assert_ne!(flat, solid);
        assert_eq!(c.len(), 2);
        // 3-D depiction carries explicit hydrogens.
        assert!(solid.lines().nth(3).unwrap().starts_with("  9"));
        assert!(flat.lines().nth(3).unwrap().starts_with("  3"));
    }

    #[test]
    fn least_recently_used_is_evicted() {
        let mut c = cache(2);
        c.molblock("C", Dimensions::Two).unwrap();
        c.molblock("N", Dimensions::Two).unwrap();
        c.molblock("C", Dimensions::Two).unwrap();
        c.molblock("O", Dimensions::Two).unwrap();
        assert_eq!(c.len(), 2);
        c.molblock("C", Dimensions::Two).unwrap();
        assert_eq!(c.stats(), (2, 3));
    }

    #[test]
    fn zero_capacity_and_bad_smiles_fail() {
        assert!(matches!(
            RenderCache::new(0, EmbedOptions::default()),
            Err(Error::ZeroCapacity)
        ));
        assert!(matches!(cache(1).molblock("C(", Dimensions::Two), Err(Error::Chem(_))));
    }
}
