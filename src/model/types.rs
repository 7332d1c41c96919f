use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid or unsupported element symbol: '{0}'")]
pub struct ParseElementError(String);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid bond order string: '{0}'")]
pub struct ParseBondOrderError(String);

/// Elements understood by the SMILES reader and the descriptor tables.
///
/// `Dummy` is the `*` wildcard used to mark attachment points on
/// substituent fragments; it carries no mass and no hydrogens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum Element {
    Dummy = 0,
    H = 1,
    Li = 3,
    B = 5,
    C = 6,
    N = 7,
    O = 8,
    F = 9,
    Na = 11,
    Mg = 12,
    Si = 14,
    P = 15,
    S = 16,
    Cl = 17,
    K = 19,
    Ca = 20,
    Se = 34,
    Br = 35,
    I = 53,
}

impl Element {
    pub fn atomic_mass(&self) -> f64 {
        match self {
            Element::Dummy => 0.0,
            Element::H => 1.008,
            Element::Li => 6.94,
            Element::B => 10.81,
            Element::C => 12.011,
            Element::N => 14.007,
            Element::O => 15.999,
            Element::F => 18.998,
            Element::Na => 22.99,
            Element::Mg => 24.305,
            Element::Si => 28.085,
            Element::P => 30.974,
            Element::S => 32.06,
            Element::Cl => 35.45,
            Element::K => 39.098,
            Element::Ca => 40.078,
            Element::Se => 78.971,
            Element::Br => 79.904,
            Element::I => 126.9,
        }
    }

    /// Mass of the most abundant isotope, used for exact molecular weight.
    pub fn monoisotopic_mass(&self) -> f64 {
        match self {
            Element::Dummy => 0.0,
            Element::H => 1.007_825_032,
            Element::Li => 7.016_003_4,
            Element::B => 11.009_305_4,
            Element::C => 12.0,
            Element::N => 14.003_074_004,
            Element::O => 15.994_914_620,
            Element::F => 18.998_403_163,
            Element::Na => 22.989_769_28,
            Element::Mg => 23.985_041_7,
            Element::Si => 27.976_926_53,
            Element::P => 30.973_761_998,
            Element::S => 31.972_071_174,
            Element::Cl => 34.968_852_68,
            Element::K => 38.963_706_5,
            Element::Ca => 39.962_590_9,
            Element::Se => 79.916_521_8,
            Element::Br => 78.918_337_6,
            Element::I => 126.904_473,
        }
    }

    /// Covalent radius in Ångströms.
    pub fn covalent_radius(&self) -> f64 {
        match self {
            Element::Dummy => 0.5,
            Element::H => 0.31,
            Element::Li => 1.28,
            Element::B => 0.84,
            Element::C => 0.76,
            Element::N => 0.71,
            Element::O => 0.66,
            Element::F => 0.57,
            Element::Na => 1.66,
            Element::Mg => 1.41,
            Element::Si => 1.11,
            Element::P => 1.07,
            Element::S => 1.05,
            Element::Cl => 1.02,
            Element::K => 2.03,
            Element::Ca => 1.76,
            Element::Se => 1.20,
            Element::Br => 1.20,
            Element::I => 1.39,
        }
    }

    /// Neutral-atom valence states, lowest first.
    pub fn default_valences(&self) -> &'static [u8] {
        match self {
            Element::Dummy => &[],
            Element::H | Element::Li | Element::Na | Element::K => &[1],
            Element::F | Element::Cl | Element::Br | Element::I => &[1],
            Element::Mg | Element::Ca => &[2],
            Element::B => &[3],
            Element::C | Element::Si => &[4],
            Element::N | Element::P => &[3, 5],
            Element::O => &[2],
            Element::S | Element::Se => &[2, 4, 6],
        }
    }

    /// Allowed valences after accounting for a formal charge.
    ///
    /// Elements right of carbon gain a bond per positive charge (N⁺ is
    /// tetravalent); boron, carbon, silicon and the metals lose one per unit
    /// of charge in either direction.
    pub fn valences_with_charge(&self, charge: i8) -> Vec<u8> {
        let shift = |v: u8, delta: i16| -> Option<u8> {
            let shifted = v as i16 + delta;
            (shifted >= 0).then_some(shifted as u8)
        };
        let delta = match self {
            Element::N
            | Element::O
            | Element::F
            | Element::P
            | Element::S
            | Element::Cl
            | Element::Se
            | Element::Br
            | Element::I => charge as i16,
            _ => -(charge as i16).abs(),
        };
        self.default_valences()
            .iter()
            .filter_map(|&v| shift(v, delta))
            .collect()
    }

    /// Members of the SMILES organic subset may be written without brackets.
    pub fn is_organic_subset(&self) -> bool {
        matches!(
            self,
            Element::B
                | Element::C
                | Element::N
                | Element::O
                | Element::P
                | Element::S
                | Element::F
                | Element::Cl
                | Element::Br
                | Element::I
        )
    }

    /// Elements that may appear lowercase (aromatic) in SMILES.
    pub fn can_be_aromatic(&self) -> bool {
        matches!(
            self,
            Element::B | Element::C | Element::N | Element::O | Element::P | Element::S | Element::Se
        )
    }

    #[inline]
    pub fn is_hydrogen(&self) -> bool {
        matches!(self, Element::H)
    }

    #[inline]
    pub fn is_heavy(&self) -> bool {
        !matches!(self, Element::H | Element::Dummy)
    }

    #[inline]
    pub fn atomic_number(&self) -> u8 {
        *self as u8
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Element::Dummy => "*",
            Element::H => "H",
            Element::Li => "Li",
            Element::B => "B",
            Element::C => "C",
            Element::N => "N",
            Element::O => "O",
            Element::F => "F",
            Element::Na => "Na",
            Element::Mg => "Mg",
            Element::Si => "Si",
            Element::P => "P",
            Element::S => "S",
            Element::Cl => "Cl",
            Element::K => "K",
            Element::Ca => "Ca",
            Element::Se => "Se",
            Element::Br => "Br",
            Element::I => "I",
        }
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

impl FromStr for Element {
    type Err = ParseElementError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "*" => Ok(Element::Dummy),
            "H" => Ok(Element::H),
            "Li" => Ok(Element::Li),
            "B" => Ok(Element::B),
            "C" => Ok(Element::C),
            "N" => Ok(Element::N),
            "O" => Ok(Element::O),
            "F" => Ok(Element::F),
            "Na" => Ok(Element::Na),
            "Mg" => Ok(Element::Mg),
            "Si" => Ok(Element::Si),
            "P" => Ok(Element::P),
            "S" => Ok(Element::S),
            "Cl" => Ok(Element::Cl),
            "K" => Ok(Element::K),
            "Ca" => Ok(Element::Ca),
            "Se" => Ok(Element::Se),
            "Br" => Ok(Element::Br),
            "I" => Ok(Element::I),
            _ => Err(ParseElementError(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BondOrder {
    Single,
    Double,
    Triple,
    Aromatic,
}

impl BondOrder {
    pub fn value(&self) -> f64 {
        match self {
            BondOrder::Single => 1.0,
            BondOrder::Double => 2.0,
            BondOrder::Triple => 3.0,
            BondOrder::Aromatic => 1.5,
        }
    }

    /// Integral valence contribution; aromatic bonds count as one and the
    /// extra π electron is accounted for per atom during valence perception.
    pub fn valence_contribution(&self) -> u8 {
        match self {
            BondOrder::Single | BondOrder::Aromatic => 1,
            BondOrder::Double => 2,
            BondOrder::Triple => 3,
        }
    }
}

impl fmt::Display for BondOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BondOrder::Single => write!(f, "Single"),
            BondOrder::Double => write!(f, "Double"),
            BondOrder::Triple => write!(f, "Triple"),
            BondOrder::Aromatic => write!(f, "Aromatic"),
        }
    }
}

impl FromStr for BondOrder {
    type Err = ParseBondOrderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "single" | "1" | "-" => Ok(BondOrder::Single),
            "double" | "2" | "=" => Ok(BondOrder::Double),
            "triple" | "3" | "#" => Ok(BondOrder::Triple),
            "aromatic" | "ar" | ":" => Ok(BondOrder::Aromatic),
            _ => Err(ParseBondOrderError(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn approx_eq(a: f64, b: f64, eps: f64) -> bool {
        (a - b).abs() <= eps
    }

    #[test]
    fn element_from_str_valid() {
        assert_eq!(Element::from_str("H").unwrap(), Element::H);
        assert_eq!(Element::from_str("Cl").unwrap(), Element::Cl);
        assert_eq!(Element::from_str("*").unwrap(), Element::Dummy);
        assert_eq!(Element::from_str("I").unwrap(), Element::I);
    }

    #[test]
    fn element_from_str_invalid_case() {
        let err = Element::from_str("cl").unwrap_err();
        let s = format!("{}", err);
        assert_eq!(s, "invalid or unsupported element symbol: 'cl'");
    }

    #[test]
    fn element_symbol_display_and_atomic_number() {
        let el = Element::Na;
        assert_eq!(el.symbol(), "Na");
        assert_eq!(el.to_string(), "Na");
        assert_eq!(el.atomic_number(), 11u8);
        assert_eq!(Element::Dummy.atomic_number(), 0u8);
    }

    #[test]
    fn mass_tables() {
        assert!(approx_eq(Element::C.atomic_mass(), 12.011, 1e-6));
        assert!(approx_eq(Element::C.monoisotopic_mass(), 12.0, 1e-12));
        assert!(approx_eq(Element::H.monoisotopic_mass(), 1.007825, 1e-6));
        assert!(approx_eq(Element::Dummy.monoisotopic_mass(), 0.0, 1e-12));
    }

    #[test]
    fn charged_valences() {
        assert_eq!(Element::N.valences_with_charge(1), vec![4, 6]);
        assert_eq!(Element::O.valences_with_charge(-1), vec![1]);
        assert_eq!(Element::C.valences_with_charge(-1), vec![3]);
        assert_eq!(Element::Na.valences_with_charge(1), vec![0]);
    }

    #[test]
    fn organic_subset_membership() {
        assert!(Element::C.is_organic_subset());
        assert!(Element::Br.is_organic_subset());
        assert!(!Element::Na.is_organic_subset());
        assert!(!Element::H.is_organic_subset());
    }

    #[test]
    fn bondorder_from_str_variants() {
        assert_eq!(BondOrder::from_str("single").unwrap(), BondOrder::Single);
        assert_eq!(BondOrder::from_str("=").unwrap(), BondOrder::Double);
        assert_eq!(BondOrder::from_str("3").unwrap(), BondOrder::Triple);
        assert_eq!(BondOrder::from_str("AR").unwrap(), BondOrder::Aromatic);
    }

    #[test]
    fn bondorder_from_str_invalid() {
        let err = BondOrder::from_str("quad").unwrap_err();
        let s = format!("{}", err);
        assert_eq!(s, "invalid bond order string: 'quad'");
    }

    #[test]
    fn bondorder_value_and_contribution() {
        assert!(approx_eq(BondOrder::Aromatic.value(), 1.5, 1e-12));
        assert_eq!(BondOrder::Aromatic.valence_contribution(), 1);
        assert_eq!(BondOrder::Triple.valence_contribution(), 3);
        assert_eq!(BondOrder::Double.to_string(), "Double");
    }
}
