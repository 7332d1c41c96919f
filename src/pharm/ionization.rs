//! Henderson-Hasselbalch ionization of weak acids and bases.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use super::error::Error;
use super::grid::linspace;
use super::series::Profile;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DrugKind {
    Acid,
    Base,
}

impl fmt::Display for DrugKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DrugKind::Acid => write!(f, "weak acid"),
            DrugKind::Base => write!(f, "weak base"),
        }
    }
}

/// Fraction (0..1) of drug in the ionized form at `ph`.
pub fn ionized_fraction(ph: f64, pka: f64, kind: DrugKind) -> f64 {
    match kind {
        DrugKind::Acid => 1.0 / (1.0 + 10f64.powf(pka - ph)),
        DrugKind::Base => 1.0 / (1.0 + 10f64.powf(ph - pka)),
    }
}

pub fn unionized_fraction(ph: f64, pka: f64, kind: DrugKind) -> f64 {
    1.0 - ionized_fraction(ph, pka, kind)
}

/// Ionized and unionized percentages over a pH range.
pub fn profile(pka: f64, kind: DrugKind, ph_min: f64, ph_max: f64, points: usize) -> Profile {
    let ph = linspace(ph_min, ph_max, points);
    let ionized: Vec<f64> = ph
        .iter()
        .map(|&p| ionized_fraction(p, pka, kind) * 100.0)
        .collect();
    let unionized = ionized.iter().map(|i| 100.0 - i).collect();
    Profile::new(format!("Ionization Profile (pKa = {pka:.1})"), "pH", ph)
        .with("Ionized (%)", ionized)
        .with("Unionized (%)", unionized)
}

/// A named physiological compartment at a fixed pH.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Compartment {
    pub name: &'static str,
    pub ph: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CompartmentIonization {
    pub name: &'static str,
    pub ph: f64,
    pub ionized_percent: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IonizationCase {
    Aspirin,
    Morphine,
    Lidocaine,
}

/// Reference data for one drug case study.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DrugCase {
    pub name: &'static str,
    pub pka: f64,
    pub kind: DrugKind,
    pub compartments: &'static [Compartment],
    pub notes: &'static [&'static str],
}

const ASPIRIN: DrugCase = DrugCase {
    name: "Aspirin",
    pka: 3.5,
    kind: DrugKind::Acid,
    compartments: &[
        Compartment { name: "Stomach", ph: 2.0 },
        Compartment { name: "Intestine", ph: 6.8 },
        Compartment { name: "Blood", ph: 7.4 },
    ],
    notes: &[
        "In stomach (pH 2.0): mostly unionized, rapid absorption",
        "In intestine (pH 6.8): mostly ionized, slower absorption",
        "In blood (pH 7.4): highly ionized, stays in circulation",
    ],
};

const MORPHINE: DrugCase = DrugCase {
    name: "Morphine",
    pka: 8.0,
    kind: DrugKind::Base,
    compartments: &[
        Compartment { name: "Blood", ph: 7.4 },
        Compartment { name: "Tissue", ph: 7.0 },
        Compartment { name: "Inflamed Tissue", ph: 6.5 },
    ],
    notes: &[
        "In blood (pH 7.4): mix of ionized and unionized forms",
        "In inflamed tissue (pH 6.5): more ionized, ion trapping",
    ],
};

const LIDOCAINE: DrugCase = DrugCase {
    name: "Lidocaine",
    pka: 7.9,
    kind: DrugKind::Base,
    compartments: &[
        Compartment { name: "Normal Tissue", ph: 7.4 },
        Compartment { name: "Infected Tissue", ph: 6.5 },
    ],
    notes: &[
        "Only the unionized form crosses nerve membranes",
        "Acidic infected tissue ionizes more drug and weakens the block",
        "pH affects both distribution and activity",
    ],
};

impl IonizationCase {
    pub const ALL: [IonizationCase; 3] = [
        IonizationCase::Aspirin,
        IonizationCase::Morphine,
        IonizationCase::Lidocaine,
    ];

    pub fn data(&self) -> &'static DrugCase {
        match self {
            IonizationCase::Aspirin => &ASPIRIN,
            IonizationCase::Morphine => &MORPHINE,
            IonizationCase::Lidocaine => &LIDOCAINE,
        }
    }

    /// Percent ionized in each of the case's compartments.
    pub fn compartments(&self) -> Vec<CompartmentIonization> {
        let case = self.data();
        case.compartments
            .iter()
            .map(|c| CompartmentIonization {
                name: c.name,
                ph: c.ph,
                ionized_percent: ionized_fraction(c.ph, case.pka, case.kind) * 100.0,
            })
            .collect()
    }
}

impl FromStr for IonizationCase {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "aspirin" => Ok(IonizationCase::Aspirin),
            "morphine" => Ok(IonizationCase::Morphine),
            "lidocaine" => Ok(IonizationCase::Lidocaine),
            _ => Err(Error::unknown("ionization case", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn half_ionized_at_pka() {
        for pka in [1.0, 3.5, 7.9, 12.25] {
            assert_eq!(ionized_fraction(pka, pka, DrugKind::Acid), 0.5);
            assert_eq!(ionized_fraction(pka, pka, DrugKind::Base), 0.5);
        }
    }

    #[test]
    fn acids_ionize_above_pka_bases_below() {
        assert!(ionized_fraction(7.4, 3.5, DrugKind::Acid) > 0.99);
        assert!(ionized_fraction(2.0, 3.5, DrugKind::Acid) < 0.05);
        assert!(ionized_fraction(6.5, 8.0, DrugKind::Base) > 0.95);
        let sum = ionized_fraction(5.0, 4.0, DrugKind::Acid) + unionized_fraction(5.0, 4.0, DrugKind::Acid);
        assert!((sum - 1.0).abs() < 1e-15);
    }

    #[test]
    fn profile_curves_are_complementary() {
        let p = profile(4.0, DrugKind::Acid, 0.0, 14.0, 100);
        assert_eq!(p.len(), 100);
        let ion = p.get("Ionized (%)").unwrap();
        let un = p.get("Unionized (%)").unwrap();
        assert!(ion.iter().zip(un).all(|(a, b)| (a + b - 100.0).abs() < 1e-9));
        assert!(ion.windows(2).all(|w| w[1] >= w[0]));
    }

    #[test]
    fn morphine_is_trapped_in_inflamed_tissue() {
        let rows = IonizationCase::Morphine.compartments();
        assert_eq!(rows.len(), 3);
        assert!(rows[2].ionized_percent > rows[0].ionized_percent);
        assert_eq!("LIDOCAINE".parse::<IonizationCase>().unwrap(), IonizationCase::Lidocaine);
        assert!("ibuprofen".parse::<IonizationCase>().is_err());
    }
}
