use std::collections::HashMap;

use tracing::trace;

use crate::chem::error::Error;
use crate::chem::valence;
use crate::model::atom::Atom;
use crate::model::molecule::{Bond, Molecule};
use crate::model::types::{BondOrder, Element};

/// Parses a SMILES string into a sanitized [`Molecule`].
///
/// Stereo markers are accepted and discarded. The returned molecule has
/// implicit hydrogens perceived and has passed valence validation.
pub fn parse(smiles: &str) -> Result<Molecule, Error> {
    let trimmed = smiles.trim();
    if trimmed.is_empty() {
        return Err(Error::smiles(0, "empty input"));
    }
    let mut mol = Parser::new(trimmed).run()?;
    valence::sanitize(&mut mol)?;
    trace!(smiles = trimmed, atoms = mol.atom_count(), "parsed SMILES");
    Ok(mol)
}

const MAX_ISOTOPE: u32 = 999;
const MAX_BRACKET_H: u32 = 16;
const MAX_CHARGE: u32 = 15;

/// An open ring-closure label: the atom it started on and any bond symbol.
struct RingOpen {
    atom: usize,
    order: Option<BondOrder>,
    position: usize,
}

struct Parser<'a> {
    input: &'a [u8],
    pos: usize,
    mol: Molecule,
    prev: Option<usize>,
    branches: Vec<Option<usize>>,
    pending_bond: Option<(BondOrder, usize)>,
    rings: HashMap<u32, RingOpen>,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input: input.as_bytes(),
            pos: 0,
            mol: Molecule::new(),
            prev: None,
            branches: Vec::new(),
            pending_bond: None,
            rings: HashMap::new(),
        }
    }

    fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<u8> {
        let c = self.peek()?;
        self.pos += 1;
        Some(c)
    }

    fn run(mut self) -> Result<Molecule, Error> {
        while let Some(c) = self.peek() {
            match c {
                b'(' => {
                    if self.prev.is_none() {
                        return Err(Error::smiles(self.pos, "branch opened before any atom"));
                    }
                    self.branches.push(self.prev);
                    self.pos += 1;
                }
                b')' => {
                    if self.pending_bond.is_some() {
                        return Err(Error::smiles(self.pos, "bond symbol before ')'"));
                    }
                    let Some(restored) = self.branches.pop() else {
                        return Err(Error::smiles(self.pos, "unmatched ')'"));
                    };
                    self.prev = restored;
                    self.pos += 1;
                }
                b'.' => {
                    if self.pending_bond.is_some() {
                        return Err(Error::smiles(self.pos, "bond symbol before '.'"));
                    }
                    self.prev = None;
                    self.pos += 1;
                }
                b'-' | b'=' | b'#' | b':' | b'$' | b'/' | b'\\' => self.bond_symbol()?,
                b'0'..=b'9' | b'%' => self.ring_closure()?,
                b'[' => {
                    let atom = self.bracket_atom()?;
                    self.push_atom(atom)?;
                }
                _ => {
                    let atom = self.organic_atom()?;
                    self.push_atom(atom)?;
                }
            }
        }

        if let Some(&(_, position)) = self.pending_bond.as_ref() {
            return Err(Error::smiles(position, "dangling bond at end of input"));
        }
        if !self.branches.is_empty() {
            return Err(Error::smiles(self.pos, "unclosed branch"));
        }
        if let Some(open) = self.rings.values().min_by_key(|r| r.position) {
            return Err(Error::smiles(open.position, "unclosed ring"));
        }
        Ok(self.mol)
    }

    fn bond_symbol(&mut self) -> Result<(), Error> {
        let start = self.pos;
        if self.pending_bond.is_some() {
            return Err(Error::smiles(start, "two consecutive bond symbols"));
        }
        let order = match self.bump() {
            Some(b'=') => BondOrder::Double,
            Some(b'#') => BondOrder::Triple,
            Some(b':') => BondOrder::Aromatic,
            Some(b'$') => {
                return Err(Error::smiles(start, "quadruple bonds are not supported"));
            }
            _ => BondOrder::Single,
        };
        if self.prev.is_none() {
            return Err(Error::smiles(start, "bond symbol without a preceding atom"));
        }
        self.pending_bond = Some((order, start));
        Ok(())
    }

    fn ring_closure(&mut self) -> Result<(), Error> {
        let start = self.pos;
        let label = match self.bump() {
            Some(b'%') => {
                let hi = self.bump().filter(u8::is_ascii_digit);
                let lo = self.bump().filter(u8::is_ascii_digit);
                match (hi, lo) {
                    (Some(h), Some(l)) => ((h - b'0') * 10 + (l - b'0')) as u32,
                    _ => return Err(Error::smiles(start, "'%' must be followed by two digits")),
                }
            }
            Some(d) => (d - b'0') as u32,
            None => return Err(Error::smiles(start, "unexpected end of input")),
        };

        let Some(current) = self.prev else {
            return Err(Error::smiles(start, "ring label without a preceding atom"));
        };
        let order = self.pending_bond.take().map(|(o, _)| o);

        match self.rings.remove(&label) {
            Some(open) => {
                if open.atom == current {
                    return Err(Error::smiles(start, "ring closes on the atom that opened it"));
                }
                if self.mol.bond_between(open.atom, current).is_some() {
                    return Err(Error::smiles(start, "ring closure duplicates an existing bond"));
                }
                let order = match (open.order, order) {
                    (Some(a), Some(b)) if a != b => {
                        return Err(Error::smiles(start, "conflicting ring-closure bond symbols"));
                    }
                    (Some(a), _) | (None, Some(a)) => a,
                    (None, None) => self.default_order(open.atom, current),
                };
                self.mol.bonds.push(Bond::new(open.atom, current, order));
            }
            None => {
                self.rings.insert(
                    label,
                    RingOpen {
                        atom: current,
                        order,
                        position: start,
                    },
                );
            }
        }
        Ok(())
    }

    fn default_order(&self, a: usize, b: usize) -> BondOrder {
        if self.mol.atoms[a].aromatic && self.mol.atoms[b].aromatic {
            BondOrder::Aromatic
        } else {
            BondOrder::Single
        }
    }

    fn push_atom(&mut self, atom: Atom) -> Result<(), Error> {
        let idx = self.mol.atoms.len();
        self.mol.atoms.push(atom);
        let pending = self.pending_bond.take();
        if let Some(prev) = self.prev {
            let order = pending
                .map(|(o, _)| o)
                .unwrap_or_else(|| self.default_order(prev, idx));
            self.mol.bonds.push(Bond::new(prev, idx, order));
        }
        self.prev = Some(idx);
        Ok(())
    }

    fn organic_atom(&mut self) -> Result<Atom, Error> {
        let start = self.pos;
        let Some(c) = self.bump() else {
            return Err(Error::smiles(start, "unexpected end of input"));
        };
        let (element, aromatic) = match c {
            b'*' => {
                let mut atom = Atom::organic(Element::Dummy, false);
                atom.no_implicit = true;
                return Ok(atom);
            }
            b'B' if self.peek() == Some(b'r') => {
                self.pos += 1;
                (Element::Br, false)
            }
            b'C' if self.peek() == Some(b'l') => {
                self.pos += 1;
                (Element::Cl, false)
            }
            b'B' => (Element::B, false),
            b'C' => (Element::C, false),
            b'N' => (Element::N, false),
            b'O' => (Element::O, false),
            b'P' => (Element::P, false),
            b'S' => (Element::S, false),
            b'F' => (Element::F, false),
            b'I' => (Element::I, false),
            b'b' => (Element::B, true),
            b'c' => (Element::C, true),
            b'n' => (Element::N, true),
            b'o' => (Element::O, true),
            b'p' => (Element::P, true),
            b's' => (Element::S, true),
            other => {
                return Err(Error::smiles(
                    start,
                    format!("unexpected character '{}'", other as char),
                ));
            }
        };
        Ok(Atom::organic(element, aromatic))
    }

    /// Reads an unsigned decimal, rejecting values that overflow `u32`.
    fn number(&mut self) -> Result<Option<u32>, Error> {
        let start = self.pos;
        let mut value: Option<u32> = None;
        while let Some(c) = self.peek().filter(u8::is_ascii_digit) {
            let next = value
                .unwrap_or(0)
                .checked_mul(10)
                .and_then(|v| v.checked_add(u32::from(c - b'0')))
                .ok_or_else(|| Error::smiles(start, "number out of range"))?;
            value = Some(next);
            self.pos += 1;
        }
        Ok(value)
    }

    fn bounded(&mut self, what: &str, max: u32) -> Result<Option<u32>, Error> {
        let start = self.pos;
        match self.number()? {
            Some(n) if n > max => Err(Error::smiles(
                start,
                format!("{what} {n} out of range (max {max})"),
            )),
            other => Ok(other),
        }
    }

    fn bracket_atom(&mut self) -> Result<Atom, Error> {
        let open = self.pos;
        self.pos += 1;

        let isotope = self
            .bounded("isotope", MAX_ISOTOPE)?
            .map(|v| u16::try_from(v).map_err(|_| Error::smiles(open, "isotope out of range")))
            .transpose()?;
        let (element, aromatic) = self.bracket_symbol()?;

        while self.peek() == Some(b'@') {
            self.pos += 1;
        }
        // Extended chirality classes (@TH1, @SP2, ...) carry two letters and digits.
        if self.input.get(self.pos.wrapping_sub(1)) == Some(&b'@')
            && self.peek().is_some_and(|c| matches!(c, b'T' | b'A' | b'S' | b'O'))
        {
            let class = self.input.get(self.pos..self.pos + 2);
            if !class.is_some_and(|c| c.iter().all(u8::is_ascii_uppercase)) {
                return Err(Error::smiles(open, "unterminated bracket atom"));
            }
            self.pos += 2;
            self.number()?;
        }

        let mut explicit_h = 0u8;
        if self.peek() == Some(b'H') {
            self.pos += 1;
            let count = self.bounded("hydrogen count", MAX_BRACKET_H)?.unwrap_or(1);
            explicit_h = u8::try_from(count)
                .map_err(|_| Error::smiles(open, "hydrogen count out of range"))?;
        }

        let mut charge: i8 = 0;
        if let Some(sign @ (b'+' | b'-')) = self.peek() {
            let sign_at = self.pos;
            self.pos += 1;
            let unit: i8 = if sign == b'+' { 1 } else { -1 };
            let magnitude = match self.bounded("charge", MAX_CHARGE)? {
                Some(m) => m,
                None => {
                    let mut repeats = 1u32;
                    while self.peek() == Some(sign) {
                        self.pos += 1;
                        repeats += 1;
                        if repeats > MAX_CHARGE {
                            return Err(Error::smiles(
                                sign_at,
                                format!("charge out of range (max {MAX_CHARGE})"),
                            ));
                        }
                    }
                    repeats
                }
            };
            let magnitude = i8::try_from(magnitude)
                .map_err(|_| Error::smiles(sign_at, "charge out of range"))?;
            charge = unit * magnitude;
        }

        let mut map_number = None;
        if self.peek() == Some(b':') {
            self.pos += 1;
            map_number = match self.bounded("atom map", u32::from(u16::MAX))? {
                Some(n) => Some(
                    u16::try_from(n).map_err(|_| Error::smiles(open, "atom map out of range"))?,
                ),
                None => return Err(Error::smiles(self.pos, "atom map requires a number")),
            };
        }

        if self.bump() != Some(b']') {
            return Err(Error::smiles(open, "unterminated bracket atom"));
        }

        if aromatic && !element.can_be_aromatic() {
            return Err(Error::smiles(open, format!("{element} cannot be aromatic")));
        }

        Ok(Atom {
            element,
            charge,
            isotope,
            aromatic,
            explicit_h,
            implicit_h: 0,
            no_implicit: true,
            map_number,
            position: [0.0; 3],
        })
    }

    fn bracket_symbol(&mut self) -> Result<(Element, bool), Error> {
        let start = self.pos;
        let Some(first) = self.peek() else {
            return Err(Error::smiles(start, "unterminated bracket atom"));
        };

        if first == b'*' {
            self.pos += 1;
            return Ok((Element::Dummy, false));
        }

        if first.is_ascii_lowercase() {
            if self.input[start..].starts_with(b"se") {
                self.pos += 2;
                return Ok((Element::Se, true));
            }
            self.pos += 1;
            let upper = (first.to_ascii_uppercase() as char).to_string();
            return upper
                .parse::<Element>()
                .ok()
                .filter(Element::can_be_aromatic)
                .map(|e| (e, true))
                .ok_or_else(|| Error::smiles(start, format!("unknown aromatic symbol '{}'", first as char)));
        }

        if !first.is_ascii_uppercase() {
            return Err(Error::smiles(start, "expected element symbol"));
        }

        if let Some(&second) = self.input.get(start + 1) {
            if second.is_ascii_lowercase() {
                let two = [first, second];
                if let Ok(e) = std::str::from_utf8(&two).unwrap_or("").parse::<Element>() {
                    self.pos += 2;
                    return Ok((e, false));
                }
            }
        }

        self.pos += 1;
        (first as char)
            .to_string()
            .parse::<Element>()
            .map(|e| (e, false))
            .map_err(|_| Error::smiles(start, format!("unknown element '{}'", first as char)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ethanol_has_expected_hydrogens() {
        let mol = parse("CCO").unwrap();
        assert_eq!(mol.atom_count(), 3);
        assert_eq!(mol.bond_count(), 2);
        assert_eq!(mol.atoms[0].implicit_h, 3);
        assert_eq!(mol.atoms[1].implicit_h, 2);
        assert_eq!(mol.atoms[2].implicit_h, 1);
    }

    #[test]
    fn branches_and_double_bonds() {
        let mol = parse("CC(=O)O").unwrap();
        assert_eq!(mol.atom_count(), 4);
        assert_eq!(mol.bond_between(1, 2).unwrap().order, BondOrder::Double);
        assert_eq!(mol.bond_between(1, 3).unwrap().order, BondOrder::Single);
        assert_eq!(mol.atoms[3].implicit_h, 1);
    }

    #[test]
    fn benzene_ring_closure_is_aromatic() {
        let mol = parse("c1ccccc1").unwrap();
        assert_eq!(mol.bond_count(), 6);
        assert!(mol.bonds.iter().all(|b| b.order == BondOrder::Aromatic));
        assert!(mol.atoms.iter().all(|a| a.implicit_h == 1));
    }

    #[test]
    fn pyrrole_nitrogen_keeps_bracket_hydrogen() {
        let mol = parse("c1cc[nH]c1").unwrap();
        assert_eq!(mol.atoms[3].element, Element::N);
        assert_eq!(mol.atoms[3].explicit_h, 1);
        assert_eq!(mol.atoms[3].implicit_h, 0);
    }

    #[test]
    fn bracket_atom_fields_are_read() {
        let mol = parse("[13CH3:7][NH3+]").unwrap();
        assert_eq!(mol.atoms[0].isotope, Some(13));
        assert_eq!(mol.atoms[0].explicit_h, 3);
        assert_eq!(mol.atoms[0].map_number, Some(7));
        assert_eq!(mol.atoms[1].charge, 1);
        assert_eq!(mol.atoms[1].explicit_h, 3);
    }

    #[test]
    fn mapped_wildcard_is_a_dummy_atom() {
        let mol = parse("[*:1]C").unwrap();
        assert_eq!(mol.atoms[0].element, Element::Dummy);
        assert_eq!(mol.atoms[0].map_number, Some(1));
        assert_eq!(mol.atoms[1].implicit_h, 3);
    }

    #[test]
    fn percent_ring_labels_and_stereo_marks() {
        let mol = parse("C%10CCCC%10").unwrap();
        assert_eq!(mol.bond_count(), 5);
        let mol = parse("F/C=C/F").unwrap();
        assert_eq!(mol.atom_count(), 4);
        let mol = parse("N[C@@H](C)C(=O)O").unwrap();
        assert_eq!(mol.atoms[1].explicit_h, 1);
    }

    #[test]
    fn dot_separates_fragments() {
        let mol = parse("[Na+].[Cl-]").unwrap();
        assert_eq!(mol.fragment_count(), 2);
        assert_eq!(mol.bond_count(), 0);
    }

    #[test]
    fn malformed_input_reports_position() {
        assert!(matches!(parse("C1CC"), Err(Error::Smiles { position: 1, .. })));
        assert!(matches!(parse("CC)"), Err(Error::Smiles { position: 2, .. })));
        assert!(matches!(parse("C(C"), Err(Error::Smiles { .. })));
        assert!(matches!(parse("C="), Err(Error::Smiles { .. })));
        assert!(matches!(parse("Xy"), Err(Error::Smiles { position: 0, .. })));
        assert!(matches!(parse(""), Err(Error::Smiles { .. })));
    }

    #[test]
    fn impossible_valence_is_rejected() {
        assert!(matches!(parse("C(C)(C)(C)(C)C"), Err(Error::Valence { .. })));
        assert!(matches!(parse("O=O=O"), Err(Error::Valence { .. })));
    }

    #[test]
    fn truncated_chirality_class_is_rejected() {
        assert!(matches!(parse("[C@T"), Err(Error::Smiles { position: 0, .. })));
        assert!(matches!(parse("[C@TH"), Err(Error::Smiles { .. })));
        let mol = parse("F[C@TH1](Cl)(Br)I").unwrap();
        assert_eq!(mol.atom_count(), 5);
    }

    #[test]
    fn oversized_charges_are_rejected() {
        assert!(matches!(parse("[C-128]"), Err(Error::Smiles { .. })));
        assert!(matches!(parse("[C+16]"), Err(Error::Smiles { .. })));
        let many_plus = format!("[C{}]", "+".repeat(200));
        assert!(matches!(parse(&many_plus), Err(Error::Smiles { .. })));
        let mol = parse("[C--]").unwrap();
        assert_eq!(mol.atoms[0].charge, -2);
    }

    #[test]
    fn oversized_hydrogen_counts_are_rejected() {
        assert!(matches!(parse("[CH255]C"), Err(Error::Smiles { .. })));
        assert!(matches!(parse("[CH300]"), Err(Error::Smiles { .. })));
        assert!(matches!(parse("[CH99999999999]"), Err(Error::Smiles { .. })));
        assert!(matches!(parse("[CH16]"), Err(Error::Valence { .. })));
    }

    #[test]
    fn isotope_and_map_number_ranges() {
        assert!(matches!(parse("[70000C]"), Err(Error::Smiles { .. })));
        assert!(matches!(parse("[C:70000]"), Err(Error::Smiles { .. })));
        let mol = parse("[2H][C:65535]").unwrap();
        assert_eq!(mol.atoms[0].isotope, Some(2));
        assert_eq!(mol.atoms[1].map_number, Some(65535));
    }

    #[test]
    fn open_chain_aromatic_is_rejected() {
        assert!(matches!(parse("cc"), Err(Error::AromaticOutsideRing(_))));
    }
}
