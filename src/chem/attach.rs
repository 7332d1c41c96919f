//! Functional-group substitution for the Lipinski design game.

use tracing::{debug, warn};

use super::error::Error;
use super::graph::MolecularGraph;
use crate::model::types::{BondOrder, Element};

/// Replaces one hydrogen on `base` with a bond to `fragment`.
///
/// The substituted hydrogen is the first one after hydrogen expansion, which
/// sits on the lowest-index heavy atom that carries any. The fragment is
/// joined through the neighbour of its `*` placeholder (or through its first
/// atom when it has none), and the placeholder is dropped. Neither input is
/// modified; the result has been re-sanitized with hydrogens folded back into
/// counts.
///
/// # Errors
///
/// - [`Error::InvalidFragment`] if the fragment does not parse, has more than
///   one placeholder, or its placeholder is not bonded to exactly one atom.
/// - [`Error::NoHydrogen`] if no heavy atom of `base` carries a hydrogen.
/// - [`Error::Valence`] if the combined molecule fails validation.
pub fn attach_functional_group<G: MolecularGraph>(base: &G, fragment: &str) -> Result<G, Error> {
    let group = G::parse(fragment).map_err(|e| Error::invalid_fragment(fragment, e.to_string()))?;
    let (placeholder, anchor) = locate_anchor(&group, fragment)?;

    let mut combined = base.with_explicit_hydrogens();
    let (hydrogen, heavy) = first_substitutable_hydrogen(&combined)?;
    combined.remove_atom(hydrogen)?;
    let heavy = if heavy > hydrogen { heavy - 1 } else { heavy };

    let offset = combined.combine(&group);
    combined.add_bond(heavy, offset + anchor, BondOrder::Single)?;
    if let Some(placeholder) = placeholder {
        combined.remove_atom(offset + placeholder)?;
    }

    let mut result = combined.without_explicit_hydrogens();
    if let Err(e) = result.sanitize() {
        warn!(fragment, error = %e, "substituted molecule failed validation");
        return Err(e);
    }
    debug!(fragment, smiles = %result.to_smiles(), "attached functional group");
    Ok(result)
}

/// Same as [`attach_functional_group`], reading and writing SMILES.
pub fn attach_smiles<G: MolecularGraph>(base: &str, fragment: &str) -> Result<String, Error> {
    let mol = G::parse(base)?;
    attach_functional_group(&mol, fragment).map(|m| m.to_smiles())
}

fn locate_anchor<G: MolecularGraph>(
    group: &G,
    fragment: &str,
) -> Result<(Option<usize>, usize), Error> {
    let mut placeholders = Vec::new();
    for idx in 0..group.atom_count() {
        if group.element(idx)? == Element::Dummy {
            placeholders.push(idx);
        }
    }

    match placeholders.as_slice() {
        [] => Ok((None, 0)),
        [p] => match group.neighbors_of(*p)?.as_slice() {
            [anchor] if group.element(*anchor)? != Element::Dummy => Ok((Some(*p), *anchor)),
            _ => Err(Error::invalid_fragment(
                fragment,
                "attachment point must be bonded to exactly one atom",
            )),
        },
        _ => Err(Error::invalid_fragment(
            fragment,
            "more than one attachment point",
        )),
    }
}

fn first_substitutable_hydrogen<G: MolecularGraph>(mol: &G) -> Result<(usize, usize), Error> {
    for idx in 0..mol.atom_count() {
        if mol.element(idx)? != Element::H {
            continue;
        }
        if let [heavy] = mol.neighbors_of(idx)?.as_slice() {
            if mol.element(*heavy)?.is_heavy() {
                return Ok((idx, *heavy));
            }
        }
    }
    Err(Error::NoHydrogen)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::molecule::Molecule;

    fn attach(base: &str, fragment: &str) -> Result<String, Error> {
        attach_smiles::<Molecule>(base, fragment)
    }

    #[test]
    fn methyl_on_ethane_gives_propane() {
        let out = attach("CC", "[*:1]C").unwrap();
        assert_eq!(out, "CCC");
        let mol = Molecule::parse(&out).unwrap();
        assert_eq!(mol.count_element(Element::C), 3);
        assert_eq!(mol.count_element(Element::H), 8);
    }

    #[test]
    fn substitution_happens_on_first_hydrogen_bearing_atom() {
        assert_eq!(attach("OC", "[*:1]C").unwrap(), "COC");
        assert_eq!(attach("CC", "[*:1]O").unwrap(), "CCO");
        assert_eq!(attach("CC", "[*:1]C(=O)O").unwrap(), "CCC(=O)O");
    }

    #[test]
    fn phenyl_keeps_aromatic_ring() {
        let out = attach("CC", "[*:1]c1ccccc1").unwrap();
        let mol = Molecule::parse(&out).unwrap();
        assert_eq!(mol.atom_count(), 8);
        assert_eq!(mol.bonds.iter().filter(|b| b.order == BondOrder::Aromatic).count(), 6);
    }

    #[test]
    fn fully_substituted_base_has_no_hydrogen() {
        let err = attach("FC(F)(F)F", "[*:1]C").unwrap_err();
        assert!(matches!(err, Error::NoHydrogen));
    }

    #[test]
    fn inputs_are_left_untouched() {
        let base = Molecule::parse("CC").unwrap();
        let before = base.clone();
        let _ = attach_functional_group(&base, "[*:1]N").unwrap();
        assert_eq!(base, before);
    }

    #[test]
    fn broken_fragments_are_rejected() {
        assert!(matches!(attach("CC", "[*:1"), Err(Error::InvalidFragment { .. })));
        assert!(matches!(attach("CC", "[*]C[*]"), Err(Error::InvalidFragment { .. })));
        assert!(matches!(attach("CC", "[*]"), Err(Error::InvalidFragment { .. })));
    }

    #[test]
    fn fragment_without_placeholder_joins_through_first_atom() {
        assert_eq!(attach("CC", "O").unwrap(), "CCO");
    }

    #[test]
    fn bracket_hydrogens_are_consumed() {
        let out = attach("[NH4+]", "[*:1]C").unwrap();
        assert_eq!(out, "[NH3+]C");
    }
}
