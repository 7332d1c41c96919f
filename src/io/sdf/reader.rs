use crate::io::{Format, error::Error, util};
use crate::model::{
    atom::Atom,
    molecule::{Bond, Molecule},
    types::BondOrder,
};
use std::io::BufRead;

/// Reads the first record of an SDF stream.
///
/// Hydrogens present in the block stay as explicit atoms; atoms on aromatic
/// (type 4) bonds are flagged aromatic. Charges come from `M  CHG` lines,
/// falling back to the legacy atom-block charge column.
pub fn read<R: BufRead>(reader: R) -> Result<Molecule, Error> {
    let lines = collect_first_block(reader)?;
    if lines.len() < 4 {
        return Err(Error::parse(
            Format::Sdf,
            1,
            "SDF block must contain at least a header and counts line",
        ));
    }

    let counts_line_no = lines[3].0;
    let counts_line = &lines[3].1;
    if counts_line.contains("V3000") {
        return Err(Error::parse(
            Format::Sdf,
            counts_line_no,
            "V3000 is not supported",
        ));
    }

    let (atom_count, bond_count) = parse_counts(counts_line, counts_line_no)?;
    let atom_start = 4;
    let bond_start = atom_start + atom_count;

    if lines.len() < bond_start + bond_count {
        return Err(Error::parse(
            Format::Sdf,
            lines.last().map(|(ln, _)| *ln).unwrap_or(counts_line_no),
            "SDF block ended before atoms/bonds were fully specified",
        ));
    }

    let mut atoms = parse_atoms(&lines[atom_start..atom_start + atom_count])?;
    let bonds = parse_bonds(&lines[bond_start..bond_start + bond_count], atom_count)?;
    apply_properties(&lines[bond_start + bond_count..], &mut atoms)?;

    for bond in &bonds {
        if bond.order == BondOrder::Aromatic {
            atoms[bond.i].aromatic = true;
            atoms[bond.j].aromatic = true;
        }
    }

    Ok(Molecule { atoms, bonds })
}

fn collect_first_block<R: BufRead>(reader: R) -> Result<Vec<(usize, String)>, Error> {
    let mut lines = Vec::new();
    for (i, line) in reader.lines().enumerate() {
        let content = line.map_err(|e| Error::Io { source: e })?;
        let ln = i + 1;
        if content.trim() == "$$$$" && !lines.is_empty() {
            break;
        }
        lines.push((ln, content));
    }
    Ok(lines)
}

fn parse_counts(line: &str, line_no: usize) -> Result<(usize, usize), Error> {
    let padded = format!("{line:<6}");
    let atoms = padded[0..3]
        .trim()
        .parse::<usize>()
        .map_err(|_| Error::parse(Format::Sdf, line_no, "invalid atom count"))?;
    let bonds = padded[3..6]
        .trim()
        .parse::<usize>()
        .map_err(|_| Error::parse(Format::Sdf, line_no, "invalid bond count"))?;
    Ok((atoms, bonds))
}

fn parse_atoms(lines: &[(usize, String)]) -> Result<Vec<Atom>, Error> {
    let mut atoms = Vec::with_capacity(lines.len());
    for (ln, raw) in lines {
        let padded = format!("{raw:<40}");
        let x = padded[0..10]
            .trim()
            .parse::<f64>()
            .map_err(|_| Error::parse(Format::Sdf, *ln, "invalid x coordinate in atom line"))?;
        let y = padded[10..20]
            .trim()
            .parse::<f64>()
            .map_err(|_| Error::parse(Format::Sdf, *ln, "invalid y coordinate in atom line"))?;
        let z = padded[20..30]
            .trim()
            .parse::<f64>()
            .map_err(|_| Error::parse(Format::Sdf, *ln, "invalid z coordinate in atom line"))?;
        let element_token = padded[31..34].trim();
        let element = util::guess_element_symbol(element_token)
            .ok_or_else(|| Error::parse(Format::Sdf, *ln, "unable to infer element symbol"))?;

        let mut atom = Atom::new(element, [x, y, z]);
        let charge_code = padded[36..39].trim();
        if !charge_code.is_empty() {
            let code = charge_code
                .parse::<i32>()
                .map_err(|_| Error::parse(Format::Sdf, *ln, "invalid charge field"))?;
            atom.charge = util::charge_from_ctfile_code(code)
                .ok_or_else(|| Error::parse(Format::Sdf, *ln, "unsupported charge code"))?;
        }
        atoms.push(atom);
    }
    Ok(atoms)
}

fn parse_bonds(lines: &[(usize, String)], atom_count: usize) -> Result<Vec<Bond>, Error> {
    let mut bonds = Vec::with_capacity(lines.len());
    for (ln, raw) in lines {
        let padded = format!("{raw:<9}");
        let field = |range: std::ops::Range<usize>, what: &str| {
            padded[range]
                .trim()
                .parse::<usize>()
                .map_err(|_| Error::parse(Format::Sdf, *ln, format!("invalid {what}")))
        };
        let a1 = field(0..3, "first atom index")?;
        let a2 = field(3..6, "second atom index")?;
        let order_val = field(6..9, "bond order value")? as i32;

        let order = util::bond_order_from_ctfile(order_val)
            .ok_or_else(|| Error::parse(Format::Sdf, *ln, "unsupported bond order in bond line"))?;

        if a1 == 0 || a2 == 0 || a1 > atom_count || a2 > atom_count {
            return Err(Error::parse(
                Format::Sdf,
                *ln,
                "bond references atom outside declared range",
            ));
        }

        bonds.push(Bond::new(a1 - 1, a2 - 1, order));
    }
    Ok(bonds)
}

fn apply_properties(lines: &[(usize, String)], atoms: &mut [Atom]) -> Result<(), Error> {
    let mut cleared = false;
    for (ln, raw) in lines {
        if raw.starts_with("M  END") {
            break;
        }
        if !raw.starts_with("M  CHG") {
            continue;
        }
        // Any M  CHG line supersedes all atom-block charges.
        if !cleared {
            atoms.iter_mut().for_each(|a| a.charge = 0);
            cleared = true;
        }
        let tokens: Vec<&str> = raw[6..].split_whitespace().collect();
        let count = tokens
            .first()
            .and_then(|t| t.parse::<usize>().ok())
            .ok_or_else(|| Error::parse(Format::Sdf, *ln, "invalid M  CHG entry count"))?;
        if tokens.len() < 1 + 2 * count {
            return Err(Error::parse(Format::Sdf, *ln, "truncated M  CHG line"));
        }
        for pair in tokens[1..1 + 2 * count].chunks(2) {
            let idx = pair[0].parse::<usize>().ok().filter(|&i| i >= 1 && i <= atoms.len());
            let charge = pair[1].parse::<i8>().ok();
            match (idx, charge) {
                (Some(i), Some(c)) => atoms[i - 1].charge = c,
                _ => return Err(Error::parse(Format::Sdf, *ln, "invalid M  CHG atom/charge pair")),
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::types::Element;
    use std::io::Cursor;

    const ACETATE: &str = "acetate
  pharmsim

  4  3  0  0  0  0  0  0  0  0999 V2000
    0.0000    0.0000    0.0000 C   0  0  0  0  0  0  0  0  0  0  0  0
    1.5000    0.0000    0.0000 C   0  0  0  0  0  0  0  0  0  0  0  0
    2.2000    1.0000    0.0000 O   0  0  0  0  0  0  0  0  0  0  0  0
    2.2000   -1.0000    0.0000 O   0  0  0  0  0  0  0  0  0  0  0  0
  1  2  1  0  0  0  0
  2  3  2  0  0  0  0
  2  4  1  0  0  0  0
M  CHG  1   4  -1
M  END
$$$$
";

    #[test]
    fn reads_atoms_bonds_and_charges() {
        let mol = read(Cursor::new(ACETATE)).unwrap();
        assert_eq!(mol.atom_count(), 4);
        assert_eq!(mol.bond_count(), 3);
        assert_eq!(mol.atoms[2].element, Element::O);
        assert_eq!(mol.atoms[3].charge, -1);
        assert_eq!(mol.bonds[1].order, BondOrder::Double);
    }

    #[test]
    fn rejects_v3000_and_truncated_blocks() {
        let v3000 = "x\n\n\n  0  0  0     0  0            999 V3000\nM  END\n";
        assert!(matches!(read(Cursor::new(v3000)), Err(Error::Parse { line: 4, .. })));

        let truncated = ACETATE.lines().take(6).collect::<Vec<_>>().join("\n");
        assert!(read(Cursor::new(truncated)).is_err());
    }

    #[test]
    fn out_of_range_bond_is_rejected() {
        let bad = ACETATE.replace("  2  4  1", "  2  9  1");
        assert!(matches!(read(Cursor::new(bad)), Err(Error::Parse { line: 11, .. })));
    }
}
