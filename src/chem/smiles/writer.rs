use std::fmt::Write;

use crate::model::atom::Atom;
use crate::model::molecule::Molecule;
use crate::model::types::{BondOrder, Element};

/// Writes a deterministic SMILES string.
///
/// Each connected component is traversed depth-first starting from its
/// lowest-index atom of minimal degree; neighbours are visited in index
/// order, with all but the last child written as branches. Components are
/// joined with `.`.
pub fn write(mol: &Molecule) -> String {
    let adjacency = adjacency(mol);
    let mut visited = vec![false; mol.atom_count()];
    let mut used_bond = vec![false; mol.bond_count()];
    let mut children: Vec<Vec<(usize, usize)>> = vec![Vec::new(); mol.atom_count()];
    let mut ring_bonds: Vec<Vec<usize>> = vec![Vec::new(); mol.atom_count()];
    let mut roots = Vec::new();

    while let Some(root) = component_root(mol, &visited) {
        roots.push(root);
        discover(
            root,
            &adjacency,
            &mut visited,
            &mut used_bond,
            &mut children,
            &mut ring_bonds,
        );
    }

    let mut emitter = Emitter {
        mol,
        children: &children,
        ring_bonds: &ring_bonds,
        ring_labels: vec![None; mol.bond_count()],
        labels_in_use: Vec::new(),
        out: String::new(),
    };
    for (k, &root) in roots.iter().enumerate() {
        if k > 0 {
            emitter.out.push('.');
        }
        emitter.emit(root);
    }
    emitter.out
}

fn adjacency(mol: &Molecule) -> Vec<Vec<(usize, usize)>> {
    let mut adj = vec![Vec::new(); mol.atom_count()];
    for (k, b) in mol.bonds.iter().enumerate() {
        adj[b.i].push((b.j, k));
        adj[b.j].push((b.i, k));
    }
    for list in &mut adj {
        list.sort_unstable();
    }
    adj
}

fn component_root(mol: &Molecule, visited: &[bool]) -> Option<usize> {
    let first = visited.iter().position(|v| !v)?;
    let mut stack = vec![first];
    let mut seen = vec![false; mol.atom_count()];
    seen[first] = true;
    let mut best = first;
    while let Some(a) = stack.pop() {
        let better = mol.degree(a) < mol.degree(best)
            || (mol.degree(a) == mol.degree(best) && a < best);
        if better {
            best = a;
        }
        for (n, _) in mol.neighbors(a) {
            if !seen[n] {
                seen[n] = true;
                stack.push(n);
            }
        }
    }
    Some(best)
}

fn discover(
    atom: usize,
    adjacency: &[Vec<(usize, usize)>],
    visited: &mut [bool],
    used_bond: &mut [bool],
    children: &mut [Vec<(usize, usize)>],
    ring_bonds: &mut [Vec<usize>],
) {
    visited[atom] = true;
    for &(next, bond) in &adjacency[atom] {
        if used_bond[bond] {
            continue;
        }
        used_bond[bond] = true;
        if visited[next] {
            ring_bonds[next].push(bond);
            ring_bonds[atom].push(bond);
        } else {
            children[atom].push((next, bond));
            discover(next, adjacency, visited, used_bond, children, ring_bonds);
        }
    }
}

struct Emitter<'a> {
    mol: &'a Molecule,
    children: &'a [Vec<(usize, usize)>],
    ring_bonds: &'a [Vec<usize>],
    ring_labels: Vec<Option<u32>>,
    labels_in_use: Vec<u32>,
    out: String,
}

impl Emitter<'_> {
    fn emit(&mut self, atom: usize) {
        write_atom(&mut self.out, &self.mol.atoms[atom]);

        let ring_bonds = self.ring_bonds;
        for &bond in &ring_bonds[atom] {
            match self.ring_labels[bond] {
                Some(label) => {
                    self.labels_in_use.retain(|&l| l != label);
                    write_label(&mut self.out, label);
                }
                None => {
                    let label = (1..)
                        .find(|l| !self.labels_in_use.contains(l))
                        .unwrap_or(1);
                    self.labels_in_use.push(label);
                    self.ring_labels[bond] = Some(label);
                    let b = &self.mol.bonds[bond];
                    self.out.push_str(bond_symbol(self.mol, b.i, b.j, b.order));
                    write_label(&mut self.out, label);
                }
            }
        }

        let children = self.children;
        let kids = &children[atom];
        for (k, &(child, bond)) in kids.iter().enumerate() {
            let last = k + 1 == kids.len();
            if !last {
                self.out.push('(');
            }
            let order = self.mol.bonds[bond].order;
            self.out.push_str(bond_symbol(self.mol, atom, child, order));
            self.emit(child);
            if !last {
                self.out.push(')');
            }
        }
    }
}

fn write_label(out: &mut String, label: u32) {
    if label < 10 {
        let _ = write!(out, "{label}");
    } else {
        let _ = write!(out, "%{label:02}");
    }
}

fn bond_symbol(mol: &Molecule, a: usize, b: usize, order: BondOrder) -> &'static str {
    let both_aromatic = mol.atoms[a].aromatic && mol.atoms[b].aromatic;
    match order {
        BondOrder::Single if both_aromatic => "-",
        BondOrder::Single => "",
        BondOrder::Double => "=",
        BondOrder::Triple => "#",
        BondOrder::Aromatic if both_aromatic => "",
        BondOrder::Aromatic => ":",
    }
}

fn needs_brackets(atom: &Atom) -> bool {
    if atom.element == Element::Dummy {
        return atom.map_number.is_some() || atom.isotope.is_some() || atom.charge != 0;
    }
    !atom.element.is_organic_subset()
        || atom.no_implicit
        || atom.charge != 0
        || atom.isotope.is_some()
        || atom.map_number.is_some()
}

fn write_atom(out: &mut String, atom: &Atom) {
    let symbol = if atom.aromatic {
        atom.element.symbol().to_ascii_lowercase()
    } else {
        atom.element.symbol().to_string()
    };

    if !needs_brackets(atom) {
        out.push_str(&symbol);
        return;
    }

    out.push('[');
    if let Some(isotope) = atom.isotope {
        let _ = write!(out, "{isotope}");
    }
    out.push_str(&symbol);
    let h = atom.attached_h();
    match h {
        0 => {}
        1 => out.push('H'),
        n => {
            let _ = write!(out, "H{n}");
        }
    }
    match atom.charge {
        0 => {}
        1 => out.push('+'),
        -1 => out.push('-'),
        c if c > 0 => {
            let _ = write!(out, "+{c}");
        }
        c => {
            let _ = write!(out, "-{}", -(c as i16));
        }
    }
    if let Some(map) = atom.map_number {
        let _ = write!(out, ":{map}");
    }
    out.push(']');
}

#[cfg(test)]
mod tests {
    use super::super::parser::parse;
    use super::*;

    fn roundtrip(smiles: &str) -> String {
        write(&parse(smiles).unwrap())
    }

    #[test]
    fn linear_chains_start_at_a_terminal_atom() {
        assert_eq!(roundtrip("CCC"), "CCC");
        assert_eq!(roundtrip("C(C)C"), "CCC");
        assert_eq!(roundtrip("OCC"), "OCC");
    }

    #[test]
    fn branches_are_parenthesized() {
        assert_eq!(roundtrip("CC(=O)O"), "CC(=O)O");
    }

    #[test]
    fn rings_get_closure_labels() {
        assert_eq!(roundtrip("c1ccccc1"), "c1ccccc1");
        assert_eq!(roundtrip("C1CCCCC1"), "C1CCCCC1");
    }

    #[test]
    fn bracket_atoms_keep_their_annotations() {
        assert_eq!(roundtrip("[NH4+]"), "[NH4+]");
        assert_eq!(roundtrip("[*:1]C"), "[*:1]C");
        assert_eq!(roundtrip("c1cc[nH]c1"), "c1cc[nH]c1");
    }

    #[test]
    fn fragments_are_dot_joined() {
        assert_eq!(roundtrip("[Na+].[Cl-]"), "[Na+].[Cl-]");
    }

    #[test]
    fn output_reparses_to_same_graph_size() {
        for smiles in ["CC(C)(C)O", "OC(=O)c1ccccc1O", "C1CC2CCC1C2", "N#CC=C"] {
            let mol = parse(smiles).unwrap();
            let again = parse(&write(&mol)).unwrap();
            assert_eq!(mol.atom_count(), again.atom_count(), "{smiles}");
            assert_eq!(mol.bond_count(), again.bond_count(), "{smiles}");
        }
    }
}
