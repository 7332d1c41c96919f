//! Valence perception: implicit hydrogen assignment and validity checks.
//!
//! Implicit hydrogens fill an atom up to the lowest default valence that
//! accommodates its bonds. Aromatic atoms first try to reserve one extra
//! valence unit for their π bond; atoms that cannot (furan oxygen, pyridine
//! nitrogen with an exocyclic bond) fall back to the plain bond sum.

use super::error::Error;
use crate::model::molecule::Molecule;
use crate::model::types::{BondOrder, Element};

/// Sum of bond valence contributions plus bracket hydrogens.
pub fn explicit_valence(mol: &Molecule, idx: usize) -> u16 {
    let bonds: u16 = mol
        .neighbors(idx)
        .map(|(_, order)| u16::from(order.valence_contribution()))
        .sum();
    bonds + u16::from(mol.atoms[idx].explicit_h)
}

fn has_aromatic_bond(mol: &Molecule, idx: usize) -> bool {
    mol.neighbors(idx)
        .any(|(_, order)| order == BondOrder::Aromatic)
}

fn implicit_hydrogens_for(mol: &Molecule, idx: usize) -> u8 {
    let atom = &mol.atoms[idx];
    if atom.no_implicit || atom.element == Element::Dummy || atom.element.is_hydrogen() {
        return 0;
    }

    let used = explicit_valence(mol, idx);
    let valences = atom.element.valences_with_charge(atom.charge);

    let fill = |needed: u16| {
        valences
            .iter()
            .map(|&v| u16::from(v))
            .find(|&v| v >= needed)
            .and_then(|v| u8::try_from(v - needed).ok())
    };

    if atom.aromatic && has_aromatic_bond(mol, idx) {
        if let Some(h) = fill(used + 1) {
            return h;
        }
    }

    fill(used).unwrap_or(0)
}

/// Recomputes `implicit_h` on every atom from its current bonds.
pub fn perceive_implicit_hydrogens(mol: &mut Molecule) {
    let counts: Vec<u8> = (0..mol.atom_count())
        .map(|idx| implicit_hydrogens_for(mol, idx))
        .collect();
    for (atom, count) in mol.atoms.iter_mut().zip(counts) {
        atom.implicit_h = count;
    }
}

/// Checks that every atom's valence is attainable and that aromatic atoms
/// sit on rings.
pub fn validate(mol: &Molecule) -> Result<(), Error> {
    if mol.is_empty() {
        return Err(Error::EmptyMolecule);
    }

    for (idx, atom) in mol.atoms.iter().enumerate() {
        if atom.element == Element::Dummy {
            continue;
        }

        let total = explicit_valence(mol, idx) + u16::from(atom.implicit_h);
        let valences = atom.element.valences_with_charge(atom.charge);
        let Some(&max) = valences.iter().max() else {
            return Err(Error::valence(
                idx,
                atom.element.symbol(),
                format!("charge {} leaves no valid valence state", atom.charge),
            ));
        };
        if total > u16::from(max) {
            return Err(Error::valence(
                idx,
                atom.element.symbol(),
                format!("valence {total} exceeds maximum of {max}"),
            ));
        }

        if atom.aromatic {
            let on_ring = mol
                .bonds
                .iter()
                .enumerate()
                .any(|(k, b)| b.contains(idx) && mol.is_ring_bond(k));
            if !on_ring {
                return Err(Error::AromaticOutsideRing(idx));
            }
        }
    }

    Ok(())
}

/// Perceives implicit hydrogens, then validates.
pub fn sanitize(mol: &mut Molecule) -> Result<(), Error> {
    perceive_implicit_hydrogens(mol);
    validate(mol)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::atom::Atom;
    use crate::model::molecule::Bond;

    fn chain(elements: &[Element], orders: &[BondOrder]) -> Molecule {
        let mut mol = Molecule::new();
        for &e in elements {
            mol.atoms.push(Atom::organic(e, false));
        }
        for (k, &order) in orders.iter().enumerate() {
            mol.bonds.push(Bond::new(k, k + 1, order));
        }
        mol
    }

    #[test]
    fn ethane_gets_three_hydrogens_per_carbon() {
        let mut mol = chain(&[Element::C, Element::C], &[BondOrder::Single]);
        sanitize(&mut mol).unwrap();
        assert_eq!(mol.atoms[0].implicit_h, 3);
        assert_eq!(mol.atoms[1].implicit_h, 3);
    }

    #[test]
    fn carbonyl_oxygen_has_no_hydrogen() {
        let mut mol = chain(&[Element::C, Element::O], &[BondOrder::Double]);
        sanitize(&mut mol).unwrap();
        assert_eq!(mol.atoms[0].implicit_h, 2);
        assert_eq!(mol.atoms[1].implicit_h, 0);
    }

    #[test]
    fn pentavalent_carbon_is_rejected() {
        let mut mol = Molecule::new();
        mol.atoms.push(Atom::organic(Element::C, false));
        for _ in 0..5 {
            let idx = mol.atoms.len();
            mol.atoms.push(Atom::organic(Element::F, false));
            mol.bonds.push(Bond::new(0, idx, BondOrder::Single));
        }
        let err = sanitize(&mut mol).unwrap_err();
        assert!(matches!(err, Error::Valence { atom: 0, .. }));
    }

    #[test]
    fn aromatic_carbon_in_benzene_keeps_one_hydrogen() {
        let mut mol = Molecule::new();
        for _ in 0..6 {
            mol.atoms.push(Atom::organic(Element::C, true));
        }
        for k in 0..6 {
            mol.bonds.push(Bond::new(k, (k + 1) % 6, BondOrder::Aromatic));
        }
        sanitize(&mut mol).unwrap();
        assert!(mol.atoms.iter().all(|a| a.implicit_h == 1));
    }

    #[test]
    fn aromatic_atom_off_ring_is_rejected() {
        let mut mol = chain(&[Element::C, Element::C], &[BondOrder::Aromatic]);
        mol.atoms[0].aromatic = true;
        mol.atoms[1].aromatic = true;
        let err = sanitize(&mut mol).unwrap_err();
        assert!(matches!(err, Error::AromaticOutsideRing(_)));
    }

    #[test]
    fn ammonium_is_tetravalent() {
        let mut mol = Molecule::new();
        let mut n = Atom::organic(Element::N, false);
        n.charge = 1;
        mol.atoms.push(n);
        sanitize(&mut mol).unwrap();
        assert_eq!(mol.atoms[0].implicit_h, 4);
    }
}
