//! Graph-editing capability used by the substitution routines.
//!
//! [`MolecularGraph`] names the handful of edits functional-group
//! attachment needs, so the algorithm in [`super::attach`] does not depend on
//! how a molecule is stored. [`Molecule`] is the in-crate implementation.

use super::error::Error;
use super::{smiles, valence};
use crate::model::atom::Atom;
use crate::model::molecule::{Bond, Molecule};
use crate::model::types::{BondOrder, Element};

/// Editing operations over a molecular graph.
pub trait MolecularGraph: Clone + Sized {
    /// Reads a molecule from SMILES.
    fn parse(smiles: &str) -> Result<Self, Error>;

    /// Writes the molecule as SMILES.
    fn to_smiles(&self) -> String;

    fn atom_count(&self) -> usize;

    fn element(&self, idx: usize) -> Result<Element, Error>;

    /// Indices of atoms bonded to `idx`, in ascending order.
    fn neighbors_of(&self, idx: usize) -> Result<Vec<usize>, Error>;

    /// Appends an atom and returns its index.
    fn add_atom(&mut self, atom: Atom) -> usize;

    /// Removes an atom and its bonds. Higher indices shift down by one.
    fn remove_atom(&mut self, idx: usize) -> Result<Atom, Error>;

    fn add_bond(&mut self, a: usize, b: usize, order: BondOrder) -> Result<(), Error>;

    /// Appends `other` as a disconnected fragment, returning the index offset
    /// of its first atom.
    fn combine(&mut self, other: &Self) -> usize;

    /// Converts every hydrogen count into an explicit hydrogen atom.
    fn with_explicit_hydrogens(&self) -> Self;

    /// Folds explicit hydrogen atoms back into hydrogen counts.
    fn without_explicit_hydrogens(&self) -> Self;

    /// Re-perceives hydrogens and checks valences.
    fn sanitize(&mut self) -> Result<(), Error>;
}

impl Molecule {
    fn check_index(&self, idx: usize) -> Result<(), Error> {
        if idx < self.atoms.len() {
            Ok(())
        } else {
            Err(Error::AtomIndex {
                index: idx,
                count: self.atoms.len(),
            })
        }
    }
}

impl MolecularGraph for Molecule {
    fn parse(text: &str) -> Result<Self, Error> {
        smiles::parse(text)
    }

    fn to_smiles(&self) -> String {
        smiles::write(self)
    }

    fn atom_count(&self) -> usize {
        self.atoms.len()
    }

    fn element(&self, idx: usize) -> Result<Element, Error> {
        self.check_index(idx)?;
        Ok(self.atoms[idx].element)
    }

    fn neighbors_of(&self, idx: usize) -> Result<Vec<usize>, Error> {
        self.check_index(idx)?;
        let mut out: Vec<usize> = self.neighbors(idx).map(|(n, _)| n).collect();
        out.sort_unstable();
        Ok(out)
    }

    fn add_atom(&mut self, atom: Atom) -> usize {
        self.atoms.push(atom);
        self.atoms.len() - 1
    }

    fn remove_atom(&mut self, idx: usize) -> Result<Atom, Error> {
        self.check_index(idx)?;
        let atom = self.atoms.remove(idx);
        self.bonds.retain(|b| !b.contains(idx));
        let shift = |k: usize| if k > idx { k - 1 } else { k };
        for bond in &mut self.bonds {
            *bond = Bond::new(shift(bond.i), shift(bond.j), bond.order);
        }
        Ok(atom)
    }

    fn add_bond(&mut self, a: usize, b: usize, order: BondOrder) -> Result<(), Error> {
        self.check_index(a)?;
        self.check_index(b)?;
        if a == b {
            return Err(Error::valence(
                a,
                self.atoms[a].element.symbol(),
                "cannot bond an atom to itself",
            ));
        }
        if self.bond_between(a, b).is_some() {
            return Err(Error::valence(
                a,
                self.atoms[a].element.symbol(),
                format!("atoms {a} and {b} are already bonded"),
            ));
        }
        self.bonds.push(Bond::new(a, b, order));
        Ok(())
    }

    fn combine(&mut self, other: &Self) -> usize {
        let offset = self.atoms.len();
        self.atoms.extend(other.atoms.iter().cloned());
        self.bonds.extend(
            other
                .bonds
                .iter()
                .map(|b| Bond::new(b.i + offset, b.j + offset, b.order)),
        );
        offset
    }

    fn with_explicit_hydrogens(&self) -> Self {
        add_hydrogens(self)
    }

    fn without_explicit_hydrogens(&self) -> Self {
        remove_hydrogens(self)
    }

    fn sanitize(&mut self) -> Result<(), Error> {
        valence::sanitize(self)
    }
}

/// Returns a copy with each hydrogen count expanded into explicit H atoms.
///
/// Hydrogens are appended after all existing atoms, grouped by the heavy
/// atom they belong to in ascending order. Heavy atoms keep their bracket
/// status, so [`remove_hydrogens`] can restore the original counts.
pub fn add_hydrogens(mol: &Molecule) -> Molecule {
    let mut out = mol.clone();
    for idx in 0..mol.atoms.len() {
        let count = mol.atoms[idx].attached_h();
        out.atoms[idx].explicit_h = 0;
        out.atoms[idx].implicit_h = 0;
        for _ in 0..count {
            let mut h = Atom::new(Element::H, mol.atoms[idx].position);
            h.no_implicit = true;
            let h_idx = out.atoms.len();
            out.atoms.push(h);
            out.bonds.push(Bond::new(idx, h_idx, BondOrder::Single));
        }
    }
    out
}

/// Returns a copy with plain hydrogen atoms folded into their neighbours.
///
/// Hydrogens carrying an isotope, charge or map number, and hydrogens bonded
/// to other hydrogens or to nothing, stay explicit.
pub fn remove_hydrogens(mol: &Molecule) -> Molecule {
    let removable = |idx: usize| -> Option<usize> {
        let atom = &mol.atoms[idx];
        if !atom.element.is_hydrogen()
            || atom.charge != 0
            || atom.isotope.is_some()
            || atom.map_number.is_some()
        {
            return None;
        }
        let mut neighbours = mol.neighbors(idx);
        match (neighbours.next(), neighbours.next()) {
            (Some((n, BondOrder::Single)), None) if mol.atoms[n].element.is_heavy() => Some(n),
            _ => None,
        }
    };

    let mut out = mol.clone();
    let mut doomed = Vec::new();
    for idx in 0..mol.atoms.len() {
        if let Some(heavy) = removable(idx) {
            if out.atoms[heavy].no_implicit {
                out.atoms[heavy].explicit_h += 1;
            }
            doomed.push(idx);
        }
    }
    for &idx in doomed.iter().rev() {
        let _ = out.remove_atom(idx);
    }
    valence::perceive_implicit_hydrogens(&mut out);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_hydrogens_follow_heavy_atom_order() {
        let mol = Molecule::parse("CO").unwrap();
        let with_h = mol.with_explicit_hydrogens();
        assert_eq!(with_h.atom_count(), 6);
        assert_eq!(with_h.neighbors_of(2).unwrap(), vec![0]);
        assert_eq!(with_h.neighbors_of(5).unwrap(), vec![1]);
        assert!(with_h.atoms[..2].iter().all(|a| a.attached_h() == 0));
    }

    #[test]
    fn hydrogen_round_trip_restores_counts() {
        let mol = Molecule::parse("c1cc[nH]c1C[NH3+]").unwrap();
        let back = mol.with_explicit_hydrogens().without_explicit_hydrogens();
        assert_eq!(back.to_smiles(), mol.to_smiles());
    }

    #[test]
    fn remove_atom_reindexes_bonds() {
        let mut mol = Molecule::parse("CCO").unwrap();
        mol.remove_atom(0).unwrap();
        assert_eq!(mol.atom_count(), 2);
        assert_eq!(mol.bonds, vec![Bond::new(0, 1, BondOrder::Single)]);
        assert!(matches!(
            mol.remove_atom(9),
            Err(Error::AtomIndex { index: 9, count: 2 })
        ));
    }

    #[test]
    fn combine_offsets_fragment_indices() {
        let mut base = Molecule::parse("CC").unwrap();
        let frag = Molecule::parse("O=C").unwrap();
        let offset = base.combine(&frag);
        assert_eq!(offset, 2);
        assert_eq!(base.fragment_count(), 2);
        assert_eq!(base.bonds[1], Bond::new(2, 3, BondOrder::Double));
    }

    #[test]
    fn duplicate_bond_is_rejected() {
        let mut mol = Molecule::parse("CC").unwrap();
        assert!(mol.add_bond(0, 1, BondOrder::Single).is_err());
        assert!(mol.add_bond(0, 0, BondOrder::Single).is_err());
    }
}
