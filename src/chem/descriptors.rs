//! Molecular descriptors used by the Lipinski rules.
//!
//! LogP uses Wildman-Crippen atom contributions over a reduced set of atom
//! types. Donor and acceptor counts follow the Lipinski SMARTS definitions
//! (`NumHDonors` / `NumHAcceptors` in common toolkits).

use serde::Serialize;

use super::valence;
use crate::model::molecule::Molecule;
use crate::model::types::{BondOrder, Element};

const H_MASS: f64 = 1.007_825_032;

/// Descriptor set for one molecule.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Descriptors {
    pub molecular_weight: f64,
    pub logp: f64,
    pub h_bond_donors: usize,
    pub h_bond_acceptors: usize,
}

impl Descriptors {
    pub fn compute(mol: &Molecule) -> Self {
        Self {
            molecular_weight: exact_molecular_weight(mol),
            logp: crippen_logp(mol),
            h_bond_donors: h_bond_donors(mol),
            h_bond_acceptors: h_bond_acceptors(mol),
        }
    }
}

/// Monoisotopic mass including implicit and bracket hydrogens.
///
/// Atoms with an isotope label contribute their mass number.
pub fn exact_molecular_weight(mol: &Molecule) -> f64 {
    mol.atoms
        .iter()
        .map(|atom| {
            let heavy = match atom.isotope {
                Some(mass_number) => mass_number as f64,
                None => atom.element.monoisotopic_mass(),
            };
            heavy + atom.attached_h() as f64 * H_MASS
        })
        .sum()
}

fn is_hetero(element: Element) -> bool {
    !matches!(element, Element::C | Element::H | Element::Dummy)
}

fn has_double_to(mol: &Molecule, idx: usize, pred: impl Fn(Element) -> bool) -> bool {
    mol.neighbors(idx)
        .any(|(n, order)| order == BondOrder::Double && pred(mol.atoms[n].element))
}

/// Total valence with aromatic bonds counted once, plus attached hydrogens.
fn total_valence(mol: &Molecule, idx: usize) -> u16 {
    valence::explicit_valence(mol, idx) + u16::from(mol.atoms[idx].implicit_h)
}

fn carbon_contribution(mol: &Molecule, idx: usize) -> f64 {
    let atom = &mol.atoms[idx];
    if atom.aromatic {
        let aromatic_bonds = mol
            .neighbors(idx)
            .filter(|&(_, o)| o == BondOrder::Aromatic)
            .count();
        let exocyclic_hetero = mol
            .neighbors(idx)
            .any(|(n, o)| o != BondOrder::Aromatic && is_hetero(mol.atoms[n].element));
        return if exocyclic_hetero {
            0.1360
        } else if mol.total_h(idx) > 0 {
            0.1581
        } else if aromatic_bonds >= 3 {
            0.2955
        } else {
            0.2713
        };
    }

    if mol.neighbors(idx).any(|(_, o)| o == BondOrder::Triple) {
        return 0.0017;
    }
    if has_double_to(mol, idx, is_hetero) {
        return -0.2783;
    }
    if has_double_to(mol, idx, |e| e == Element::C) {
        return 0.1551;
    }

    let branched = mol.heavy_degree(idx) >= 3;
    let hetero = mol
        .neighbors(idx)
        .any(|(n, _)| is_hetero(mol.atoms[n].element));
    match (hetero, branched) {
        (false, false) => 0.1441,
        (false, true) => 0.0,
        (true, false) => -0.2035,
        (true, true) => -0.2051,
    }
}

fn hydrogen_contribution(mol: &Molecule, heavy: usize) -> f64 {
    match mol.atoms[heavy].element {
        Element::C => 0.1230,
        Element::N => 0.2142,
        Element::O => {
            let acidic = mol.neighbors(heavy).any(|(n, _)| {
                let e = mol.atoms[n].element;
                matches!(e, Element::O | Element::S)
                    || (e == Element::C
                        && has_double_to(mol, n, |x| {
                            matches!(x, Element::C | Element::N | Element::O | Element::S)
                        }))
            });
            if acidic { 0.2980 } else { -0.2677 }
        }
        _ => -0.2677,
    }
}

fn heavy_contribution(mol: &Molecule, idx: usize) -> f64 {
    let atom = &mol.atoms[idx];
    match atom.element {
        Element::C => carbon_contribution(mol, idx),
        Element::N if atom.aromatic => -0.4806,
        Element::N => match mol.total_h(idx) {
            0 => -0.3187,
            1 => -0.7096,
            _ => -1.0190,
        },
        Element::O if atom.aromatic => 0.1552,
        Element::O if atom.charge < 0 => -1.3260,
        Element::O if has_double_to(mol, idx, |_| true) => -0.1526,
        Element::O if mol.total_h(idx) > 0 => -0.2893,
        Element::O => -0.0684,
        Element::S if atom.aromatic => 0.6237,
        Element::S => 0.6482,
        Element::P => 0.8612,
        Element::F => 0.4202,
        Element::Cl => 0.6895,
        Element::Br => 0.8456,
        Element::I => 0.8857,
        _ => 0.0,
    }
}

/// Octanol/water partition coefficient from atom contributions.
pub fn crippen_logp(mol: &Molecule) -> f64 {
    (0..mol.atom_count())
        .filter(|&idx| mol.atoms[idx].element.is_heavy())
        .map(|idx| {
            heavy_contribution(mol, idx)
                + mol.total_h(idx) as f64 * hydrogen_contribution(mol, idx)
        })
        .sum()
}

fn is_donor(mol: &Molecule, idx: usize) -> bool {
    let atom = &mol.atoms[idx];
    let h = mol.total_h(idx);
    if h == 0 {
        return false;
    }
    match atom.element {
        Element::N if atom.aromatic => h == 1 && atom.charge == 0,
        Element::N => {
            let v = total_valence(mol, idx);
            (atom.charge == 0 && v == 3) || (atom.charge == 1 && v == 4)
        }
        Element::O | Element::S => !atom.aromatic && h == 1 && atom.charge == 0,
        _ => false,
    }
}

/// Whether the neighbour carries a double bond to O, N, P or S.
fn is_multiply_bonded_to_hetero(mol: &Molecule, idx: usize, ring_ok: bool) -> bool {
    mol.bonds.iter().enumerate().any(|(k, b)| {
        let Some(partner) = b.partner(idx) else {
            return false;
        };
        b.order == BondOrder::Double
            && matches!(
                mol.atoms[partner].element,
                Element::O | Element::N | Element::P | Element::S
            )
            && (ring_ok || !mol.is_ring_bond(k))
    })
}

fn is_acceptor(mol: &Molecule, idx: usize) -> bool {
    let atom = &mol.atoms[idx];
    let h = mol.total_h(idx);
    match atom.element {
        Element::O | Element::S if atom.aromatic => atom.charge == 0,
        Element::O | Element::S => {
            if atom.charge < 0 {
                return true;
            }
            let v = total_valence(mol, idx);
            match (h, v) {
                (0, 2) => true,
                (1, 2) => mol.neighbors(idx).all(|(n, order)| {
                    mol.atoms[n].element.is_hydrogen()
                        || (order == BondOrder::Single && !is_multiply_bonded_to_hetero(mol, n, true))
                }),
                _ => false,
            }
        }
        Element::N if atom.aromatic => h == 0 && atom.charge == 0,
        Element::N => {
            total_valence(mol, idx) == 3
                && !mol.neighbors(idx).any(|(n, order)| {
                    order == BondOrder::Single && is_multiply_bonded_to_hetero(mol, n, false)
                })
        }
        Element::F => true,
        _ => false,
    }
}

pub fn h_bond_donors(mol: &Molecule) -> usize {
    (0..mol.atom_count()).filter(|&i| is_donor(mol, i)).count()
}

pub fn h_bond_acceptors(mol: &Molecule) -> usize {
    (0..mol.atom_count()).filter(|&i| is_acceptor(mol, i)).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chem::smiles::parse;

    fn descriptors(smiles: &str) -> Descriptors {
        Descriptors::compute(&parse(smiles).unwrap())
    }

    #[test]
    fn exact_weight_of_ethanol() {
        let d = descriptors("CCO");
        assert!((d.molecular_weight - 46.041_865).abs() < 1e-5);
    }

    #[test]
    fn logp_matches_reference_contributions() {
        assert!((descriptors("CCO").logp - (-0.0014)).abs() < 1e-4);
        assert!((descriptors("c1ccccc1").logp - 1.6866).abs() < 1e-4);
        assert!((descriptors("CC(=O)O").logp - 0.0909).abs() < 1e-4);
    }

    #[test]
    fn carboxylic_acid_donors_and_acceptors() {
        let d = descriptors("CC(=O)O");
        assert_eq!(d.h_bond_donors, 1);
        // The carbonyl oxygen accepts; the acid OH does not.
        assert_eq!(d.h_bond_acceptors, 1);
    }

    #[test]
    fn amine_and_amide_nitrogens() {
        let amine = descriptors("CCN");
        assert_eq!((amine.h_bond_donors, amine.h_bond_acceptors), (1, 1));
        let amide = descriptors("CC(=O)N");
        assert_eq!((amide.h_bond_donors, amide.h_bond_acceptors), (1, 1));
    }

    #[test]
    fn aromatic_nitrogens() {
        assert_eq!(descriptors("c1ccncc1").h_bond_acceptors, 1);
        let pyrrole = descriptors("c1cc[nH]c1");
        assert_eq!((pyrrole.h_bond_donors, pyrrole.h_bond_acceptors), (1, 0));
    }

    #[test]
    fn hydrocarbons_have_no_polar_counts() {
        let d = descriptors("CCCCCC");
        assert_eq!((d.h_bond_donors, d.h_bond_acceptors), (0, 0));
        assert!(d.logp > 2.0);
    }
}
