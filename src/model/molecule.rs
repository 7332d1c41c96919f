use super::atom::Atom;
use super::types::{BondOrder, Element};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Bond {
    pub i: usize,
    pub j: usize,
    pub order: BondOrder,
}

impl Bond {
    pub fn new(idx1: usize, idx2: usize, order: BondOrder) -> Self {
        if idx1 <= idx2 {
            Self { i: idx1, j: idx2, order }
        } else {
            Self { i: idx2, j: idx1, order }
        }
    }

    #[inline]
    pub fn contains(&self, idx: usize) -> bool {
        self.i == idx || self.j == idx
    }

    /// The atom on the other end of the bond, if `idx` is one of its ends.
    #[inline]
    pub fn partner(&self, idx: usize) -> Option<usize> {
        if self.i == idx {
            Some(self.j)
        } else if self.j == idx {
            Some(self.i)
        } else {
            None
        }
    }
}

/// A molecular graph: atoms, bonds and (optionally) embedded coordinates.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Molecule {
    pub atoms: Vec<Atom>,
    pub bonds: Vec<Bond>,
}

impl Molecule {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }

    #[inline]
    pub fn bond_count(&self) -> usize {
        self.bonds.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    pub fn heavy_atom_count(&self) -> usize {
        self.atoms.iter().filter(|a| a.element.is_heavy()).count()
    }

    pub fn neighbors(&self, idx: usize) -> impl Iterator<Item = (usize, BondOrder)> + '_ {
        self.bonds
            .iter()
            .filter_map(move |b| b.partner(idx).map(|p| (p, b.order)))
    }

    #[inline]
    pub fn degree(&self, idx: usize) -> usize {
        self.neighbors(idx).count()
    }

    pub fn bond_between(&self, a: usize, b: usize) -> Option<&Bond> {
        self.bonds.iter().find(|bond| bond.contains(a) && bond.contains(b) && a != b)
    }

    /// Hydrogens on an atom: bracket and implicit counts plus explicit H atoms.
    pub fn total_h(&self, idx: usize) -> usize {
        let neighbor_h = self
            .neighbors(idx)
            .filter(|&(n, _)| self.atoms[n].element.is_hydrogen())
            .count();
        self.atoms[idx].attached_h() as usize + neighbor_h
    }

    pub fn heavy_degree(&self, idx: usize) -> usize {
        self.neighbors(idx)
            .filter(|&(n, _)| self.atoms[n].element.is_heavy())
            .count()
    }

    pub fn count_element(&self, element: Element) -> usize {
        let direct = self.atoms.iter().filter(|a| a.element == element).count();
        if element.is_hydrogen() {
            direct
                + self
                    .atoms
                    .iter()
                    .map(|a| a.attached_h() as usize)
                    .sum::<usize>()
        } else {
            direct
        }
    }

    /// Number of disconnected fragments (`.`-separated components).
    pub fn fragment_count(&self) -> usize {
        let mut seen = vec![false; self.atoms.len()];
        let mut fragments = 0;
        for start in 0..self.atoms.len() {
            if seen[start] {
                continue;
            }
            fragments += 1;
            let mut stack = vec![start];
            seen[start] = true;
            while let Some(a) = stack.pop() {
                for (n, _) in self.neighbors(a) {
                    if !seen[n] {
                        seen[n] = true;
                        stack.push(n);
                    }
                }
            }
        }
        fragments
    }

    /// Whether a bond lies on a cycle, i.e. its ends stay connected without it.
    pub fn is_ring_bond(&self, bond_idx: usize) -> bool {
        let Some(bond) = self.bonds.get(bond_idx) else {
            return false;
        };
        let mut seen = vec![false; self.atoms.len()];
        let mut stack = vec![bond.i];
        seen[bond.i] = true;
        while let Some(a) = stack.pop() {
            for (k, b) in self.bonds.iter().enumerate() {
                if k == bond_idx {
                    continue;
                }
                if let Some(n) = b.partner(a) {
                    if n == bond.j {
                        return true;
                    }
                    if !seen[n] {
                        seen[n] = true;
                        stack.push(n);
                    }
                }
            }
        }
        false
    }

    pub fn is_ring_atom(&self, idx: usize) -> bool {
        self.bonds
            .iter()
            .enumerate()
            .any(|(k, b)| b.contains(idx) && self.is_ring_bond(k))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ring_of(n: usize) -> Molecule {
        let mut mol = Molecule::new();
        for _ in 0..n {
            mol.atoms.push(Atom::organic(Element::C, false));
        }
        for k in 0..n {
            mol.bonds.push(Bond::new(k, (k + 1) % n, BondOrder::Single));
        }
        mol
    }

    #[test]
    fn bond_normalizes_index_order() {
        let b = Bond::new(5, 2, BondOrder::Double);
        assert_eq!((b.i, b.j), (2, 5));
        assert_eq!(b.partner(2), Some(5));
        assert_eq!(b.partner(7), None);
    }

    #[test]
    fn ring_membership_is_detected() {
        let mut mol = ring_of(6);
        mol.atoms.push(Atom::organic(Element::O, false));
        mol.bonds.push(Bond::new(0, 6, BondOrder::Single));

        assert!(mol.is_ring_bond(0));
        assert!(!mol.is_ring_bond(6));
        assert!(mol.is_ring_atom(3));
        assert!(!mol.is_ring_atom(6));
    }

    #[test]
    fn fragments_are_counted() {
        let mut mol = ring_of(3);
        mol.atoms.push(Atom::organic(Element::Cl, false));
        assert_eq!(mol.fragment_count(), 2);
    }

    #[test]
    fn hydrogen_count_includes_all_sources() {
        let mut mol = Molecule::new();
        let mut c = Atom::organic(Element::C, false);
        c.implicit_h = 2;
        mol.atoms.push(c);
        mol.atoms.push(Atom::new(Element::H, [0.0; 3]));
        mol.bonds.push(Bond::new(0, 1, BondOrder::Single));

        assert_eq!(mol.total_h(0), 3);
        assert_eq!(mol.count_element(Element::H), 3);
        assert_eq!(mol.heavy_atom_count(), 1);
    }
}
