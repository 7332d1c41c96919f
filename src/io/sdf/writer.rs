use crate::io::{error::Error, util};
use crate::model::molecule::Molecule;
use std::io::Write;

/// Writes `mol` as a single SDF record titled `title`.
///
/// Atom positions are written as stored; run an embedding first for a
/// meaningful depiction. Formal charges go to `M  CHG` lines.
pub fn write<W: Write>(mut writer: W, mol: &Molecule, title: &str) -> Result<(), Error> {
    write_block(&mut writer, mol, title)?;
    writeln!(writer, "$$$$")?;
    Ok(())
}

/// Renders the mol block (without the `$$$$` record terminator).
pub fn to_molblock(mol: &Molecule, title: &str) -> Result<String, Error> {
    let mut buf = Vec::new();
    write_block(&mut buf, mol, title)?;
    String::from_utf8(buf).map_err(|e| Error::Io {
        source: std::io::Error::new(std::io::ErrorKind::InvalidData, e),
    })
}

fn write_block<W: Write>(writer: &mut W, mol: &Molecule, title: &str) -> Result<(), Error> {
    writeln!(writer, "{title}")?;
    writeln!(writer, "  pharmsim")?;
    writeln!(writer)?;
    writeln!(
        writer,
        "{:>3}{:>3}  0  0  0  0  0  0  0  0999 V2000",
        mol.atom_count(),
        mol.bond_count()
    )?;

    for atom in &mol.atoms {
        writeln!(
            writer,
            "{:>10.4}{:>10.4}{:>10.4} {:<3} 0  0  0  0  0  0  0  0  0  0  0  0",
            atom.position[0],
            atom.position[1],
            atom.position[2],
            atom.element.symbol()
        )?;
    }

    for bond in &mol.bonds {
        writeln!(
            writer,
            "{:>3}{:>3}{:>3}  0  0  0  0",
            bond.i + 1,
            bond.j + 1,
            util::bond_order_to_ctfile(bond.order)
        )?;
    }

    let charged: Vec<(usize, i8)> = mol
        .atoms
        .iter()
        .enumerate()
        .filter(|(_, a)| a.charge != 0)
        .map(|(i, a)| (i + 1, a.charge))
        .collect();
    for chunk in charged.chunks(8) {
        write!(writer, "M  CHG{:>3}", chunk.len())?;
        for (idx, charge) in chunk {
            write!(writer, " {idx:>3} {charge:>3}")?;
        }
        writeln!(writer)?;
    }

    writeln!(writer, "M  END")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::sdf::reader;
    use crate::model::{
        atom::Atom,
        molecule::Bond,
        types::{BondOrder, Element},
    };
    use std::io::Cursor;

    fn formaldehyde() -> Molecule {
        Molecule {
            atoms: vec![
                Atom::new(Element::C, [0.0, 0.0, 0.0]),
                Atom::new(Element::O, [1.2, 0.0, 0.0]),
                Atom::new(Element::H, [-0.5, 0.9, 0.0]),
            ],
            bonds: vec![
                Bond::new(0, 1, BondOrder::Double),
                Bond::new(0, 2, BondOrder::Single),
            ],
        }
    }

    #[test]
    fn writes_and_reads_roundtrip() {
        let mol = formaldehyde();

        let mut buf = Vec::new();
        write(&mut buf, &mol, "formaldehyde").expect("write sdf");
        let parsed = reader::read(Cursor::new(buf)).expect("read sdf");

        assert_eq!(parsed.atom_count(), mol.atom_count());
        assert_eq!(parsed.bond_count(), mol.bond_count());
        for (a, b) in mol.atoms.iter().zip(parsed.atoms.iter()) {
            assert_eq!(a.element, b.element);
            for k in 0..3 {
                assert!((a.position[k] - b.position[k]).abs() < 1e-4);
            }
        }
        assert_eq!(parsed.bonds, mol.bonds);
    }

    #[test]
    fn molblock_has_title_counts_and_charges() {
        let mut mol = formaldehyde();
        mol.atoms[1].charge = -1;
        let block = to_molblock(&mol, "test").unwrap();
        let lines: Vec<&str> = block.lines().collect();
        assert_eq!(lines[0], "test");
        assert!(lines[3].starts_with("  3  2"));
        assert!(lines[3].ends_with("V2000"));
        assert!(block.contains("M  CHG  1   2  -1"));
        assert_eq!(lines.last(), Some(&"M  END"));
        assert!(!block.contains("$$$$"));
    }
}
