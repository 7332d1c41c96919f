//! Coordinate generation for molecule depictions.
//!
//! Atoms are placed by breadth-first growth from the first atom of each
//! fragment with seeded random bond directions, then relaxed against bond
//! lengths, bond angles and a soft non-bonded repulsion. The same seed always
//! yields the same coordinates.

use std::collections::VecDeque;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use super::graph::add_hydrogens;
use crate::model::molecule::Molecule;
use crate::model::types::BondOrder;

/// Default RNG seed for embedding.
pub const DEFAULT_SEED: u64 = 42;
/// Default number of relaxation sweeps.
pub const DEFAULT_ITERATIONS: usize = 300;

const REPULSION_RANGE: f64 = 3.0;
const STEP: f64 = 0.1;
const FRAGMENT_SPACING: f64 = 6.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dimensions {
    Two,
    Three,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmbedOptions {
    pub seed: u64,
    pub iterations: usize,
}

impl Default for EmbedOptions {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            iterations: DEFAULT_ITERATIONS,
        }
    }
}

/// Returns a copy with explicit hydrogens and 3-D coordinates.
pub fn embed_3d(mol: &Molecule, options: EmbedOptions) -> Molecule {
    let mut out = add_hydrogens(mol);
    layout(&mut out, Dimensions::Three, options);
    out
}

/// Returns a copy with planar coordinates (z = 0) for the heavy-atom graph.
pub fn depict_2d(mol: &Molecule, options: EmbedOptions) -> Molecule {
    let mut out = mol.clone();
    layout(&mut out, Dimensions::Two, options);
    out
}

fn bond_length(mol: &Molecule, i: usize, j: usize, order: BondOrder) -> f64 {
    let single = mol.atoms[i].element.covalent_radius() + mol.atoms[j].element.covalent_radius();
    let factor = match order {
        BondOrder::Single => 1.0,
        BondOrder::Aromatic => 0.91,
        BondOrder::Double => 0.87,
        BondOrder::Triple => 0.78,
    };
    single * factor
}

/// Ideal angle at an atom, from the bonds it carries.
fn ideal_angle(mol: &Molecule, idx: usize) -> f64 {
    let mut doubles = 0;
    let mut triple = false;
    let mut aromatic = false;
    for (_, order) in mol.neighbors(idx) {
        match order {
            BondOrder::Double => doubles += 1,
            BondOrder::Triple => triple = true,
            BondOrder::Aromatic => aromatic = true,
            BondOrder::Single => {}
        }
    }
    let degrees: f64 = if triple || doubles >= 2 {
        180.0
    } else if doubles == 1 || aromatic {
        120.0
    } else {
        109.47
    };
    degrees.to_radians()
}

struct Restraint {
    i: usize,
    j: usize,
    target: f64,
    weight: f64,
}

fn restraints(mol: &Molecule) -> (Vec<Restraint>, Vec<Vec<bool>>) {
    let n = mol.atom_count();
    let mut near = vec![vec![false; n]; n];
    let mut out = Vec::new();

    for b in &mol.bonds {
        near[b.i][b.j] = true;
        near[b.j][b.i] = true;
        out.push(Restraint {
            i: b.i,
            j: b.j,
            target: bond_length(mol, b.i, b.j, b.order),
            weight: 1.0,
        });
    }

    for center in 0..n {
        let arms: Vec<(usize, BondOrder)> = mol.neighbors(center).collect();
        let theta = ideal_angle(mol, center);
        for (a, &(i, oi)) in arms.iter().enumerate() {
            for &(j, oj) in &arms[a + 1..] {
                let li = bond_length(mol, center, i, oi);
                let lj = bond_length(mol, center, j, oj);
                let target = (li * li + lj * lj - 2.0 * li * lj * theta.cos()).sqrt();
                near[i][j] = true;
                near[j][i] = true;
                out.push(Restraint {
                    i,
                    j,
                    target,
                    weight: 0.5,
                });
            }
        }
    }

    (out, near)
}

fn initial_positions(mol: &Molecule, dims: Dimensions, rng: &mut StdRng) -> Vec<[f64; 3]> {
    let n = mol.atom_count();
    let mut pos = vec![[0.0; 3]; n];
    let mut placed = vec![false; n];
    let mut fragment = 0usize;

    for start in 0..n {
        if placed[start] {
            continue;
        }
        pos[start] = [fragment as f64 * FRAGMENT_SPACING, 0.0, 0.0];
        placed[start] = true;
        fragment += 1;

        let mut queue = VecDeque::from([start]);
        while let Some(a) = queue.pop_front() {
            for (b, order) in mol.neighbors(a) {
                if placed[b] {
                    continue;
                }
                let dir = random_direction(rng, dims);
                let len = bond_length(mol, a, b, order);
                pos[b] = [
                    pos[a][0] + dir[0] * len,
                    pos[a][1] + dir[1] * len,
                    pos[a][2] + dir[2] * len,
                ];
                placed[b] = true;
                queue.push_back(b);
            }
        }
    }
    pos
}

fn random_direction(rng: &mut StdRng, dims: Dimensions) -> [f64; 3] {
    loop {
        let v: [f64; 3] = [
            rng.gen_range(-1.0..=1.0),
            rng.gen_range(-1.0..=1.0),
            match dims {
                Dimensions::Two => 0.0,
                Dimensions::Three => rng.gen_range(-1.0..=1.0),
            },
        ];
        let norm = (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt();
        if norm > 1e-3 && norm <= 1.0 {
            return [v[0] / norm, v[1] / norm, v[2] / norm];
        }
    }
}

fn distance(a: &[f64; 3], b: &[f64; 3]) -> (f64, [f64; 3]) {
    let d = [a[0] - b[0], a[1] - b[1], a[2] - b[2]];
    ((d[0] * d[0] + d[1] * d[1] + d[2] * d[2]).sqrt(), d)
}

fn layout(mol: &mut Molecule, dims: Dimensions, options: EmbedOptions) {
    let n = mol.atom_count();
    if n == 0 {
        return;
    }
    let mut rng = StdRng::seed_from_u64(options.seed);
    let mut pos = initial_positions(mol, dims, &mut rng);
    let (terms, near) = restraints(mol);

    for _ in 0..options.iterations {
        let mut force = vec![[0.0f64; 3]; n];

        for t in &terms {
            let (d, v) = distance(&pos[t.i], &pos[t.j]);
            if d < 1e-9 {
                continue;
            }
            let magnitude = t.weight * (t.target - d) / d;
            for k in 0..3 {
                force[t.i][k] += magnitude * v[k];
                force[t.j][k] -= magnitude * v[k];
            }
        }

        for i in 0..n {
            for j in i + 1..n {
                if near[i][j] {
                    continue;
                }
                let (d, v) = distance(&pos[i], &pos[j]);
                if d >= REPULSION_RANGE || d < 1e-9 {
                    continue;
                }
                let magnitude = 0.05 * (REPULSION_RANGE - d) / d;
                for k in 0..3 {
                    force[i][k] += magnitude * v[k];
                    force[j][k] -= magnitude * v[k];
                }
            }
        }

        for (p, f) in pos.iter_mut().zip(&force) {
            for k in 0..3 {
                p[k] += STEP * f[k];
            }
            if dims == Dimensions::Two {
                p[2] = 0.0;
            }
        }
    }

    center(&mut pos);
    for (atom, p) in mol.atoms.iter_mut().zip(pos) {
        atom.position = p;
    }
    debug!(atoms = n, ?dims, "embedded coordinates");
}

fn center(pos: &mut [[f64; 3]]) {
    let n = pos.len() as f64;
    let mut c = [0.0; 3];
    for p in pos.iter() {
        for k in 0..3 {
            c[k] += p[k] / n;
        }
    }
    for p in pos.iter_mut() {
        for k in 0..3 {
            p[k] -= c[k];
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chem::smiles::parse;

    #[test]
    fn embedding_adds_hydrogens_and_is_deterministic() {
        let mol = parse("CCO").unwrap();
        let a = embed_3d(&mol, EmbedOptions::default());
        let b = embed_3d(&mol, EmbedOptions::default());
        assert_eq!(a.atom_count(), 9);
        assert_eq!(a, b);
    }

    #[test]
    fn bonded_atoms_settle_near_ideal_length() {
        let mol = parse("CCO").unwrap();
        let out = embed_3d(&mol, EmbedOptions::default());
        let (d, _) = distance(&out.atoms[0].position, &out.atoms[1].position);
        assert!((d - 1.52).abs() < 0.2, "C-C distance {d}");
    }

    #[test]
    fn depiction_is_planar() {
        let mol = parse("c1ccccc1O").unwrap();
        let out = depict_2d(&mol, EmbedOptions::default());
        assert_eq!(out.atom_count(), mol.atom_count());
        assert!(out.atoms.iter().all(|a| a.position[2] == 0.0));
    }

    #[test]
    fn different_seeds_give_different_layouts() {
        let mol = parse("CCCC").unwrap();
        let a = embed_3d(&mol, EmbedOptions::default());
        let b = embed_3d(&mol, EmbedOptions { seed: 7, iterations: 300 });
        assert_ne!(a, b);
    }
}
