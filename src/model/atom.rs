use super::types::Element;

#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    pub element: Element,
    pub charge: i8,
    pub isotope: Option<u16>,
    pub aromatic: bool,
    /// Hydrogens written inside a bracket atom (`[NH3+]` carries three).
    pub explicit_h: u8,
    /// Hydrogens implied by default valence, filled by valence perception.
    pub implicit_h: u8,
    /// Bracket atoms never receive implicit hydrogens.
    pub no_implicit: bool,
    pub map_number: Option<u16>,
    pub position: [f64; 3],
}

impl Atom {
    pub fn new(element: Element, position: [f64; 3]) -> Self {
        Self {
            element,
            charge: 0,
            isotope: None,
            aromatic: false,
            explicit_h: 0,
            implicit_h: 0,
            no_implicit: false,
            map_number: None,
            position,
        }
    }

    /// An unbracketed organic-subset atom as it appears in SMILES.
    pub fn organic(element: Element, aromatic: bool) -> Self {
        Self {
            aromatic,
            ..Self::new(element, [0.0; 3])
        }
    }

    /// Hydrogens carried on the atom itself, not counting hydrogen neighbours.
    #[inline]
    pub fn attached_h(&self) -> u8 {
        self.explicit_h.saturating_add(self.implicit_h)
    }
}
