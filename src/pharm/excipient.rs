//! Excipient reference data, compatibility, flow and formulation tools.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use tracing::debug;

use super::error::{Error, require_positive};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Category {
    Filler,
    Binder,
    Disintegrant,
    Lubricant,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Filler,
        Category::Binder,
        Category::Disintegrant,
        Category::Lubricant,
    ];
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Category::Filler => "Fillers",
            Category::Binder => "Binders",
            Category::Disintegrant => "Disintegrants",
            Category::Lubricant => "Lubricants",
        };
        f.write_str(s)
    }
}

impl FromStr for Category {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        Category::ALL
            .into_iter()
            .find(|c| {
                let plural = c.to_string().to_ascii_lowercase();
                lower == plural || lower == plural.trim_end_matches('s')
            })
            .ok_or_else(|| Error::unknown("excipient category", s))
    }
}

/// One entry of the built-in excipient database.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Excipient {
    pub name: &'static str,
    pub category: Category,
    /// Named material properties, mostly on a 0-5 scale.
    pub properties: &'static [(&'static str, f64)],
    pub compatibility: &'static [&'static str],
    pub incompatibility: &'static [&'static str],
    pub use_range: &'static str,
    pub features: &'static [&'static str],
}

pub static DATABASE: [Excipient; 6] = [
    Excipient {
        name: "Lactose Monohydrate",
        category: Category::Filler,
        properties: &[
            ("moisture", 0.5),
            ("particle_size", 100.0),
            ("flow_index", 3.5),
            ("compressibility", 4.0),
        ],
        compatibility: &["most APIs", "starch", "cellulose"],
        incompatibility: &["strong oxidizing agents", "amines"],
        use_range: "20-90%",
        features: &["water soluble", "good flowability", "compressible"],
    },
    Excipient {
        name: "Microcrystalline Cellulose",
        category: Category::Filler,
        properties: &[
            ("moisture", 4.0),
            ("particle_size", 50.0),
            ("flow_index", 4.0),
            ("compressibility", 5.0),
        ],
        compatibility: &["most APIs", "lactose", "starch"],
        incompatibility: &["strong oxidizing agents"],
        use_range: "20-90%",
        features: &["highly compressible", "good flowability", "inert"],
    },
    Excipient {
        name: "Povidone",
        category: Category::Binder,
        properties: &[
            ("moisture", 5.0),
            ("viscosity", 3.0),
            ("adhesion", 4.5),
            ("stability", 4.0),
        ],
        compatibility: &["most APIs", "cellulose", "starch"],
        incompatibility: &["oxidizing agents", "some salts"],
        use_range: "2-10%",
        features: &["good binding", "soluble", "film forming"],
    },
    Excipient {
        name: "Starch",
        category: Category::Binder,
        properties: &[
            ("moisture", 10.0),
            ("viscosity", 2.5),
            ("adhesion", 3.5),
            ("stability", 4.5),
        ],
        compatibility: &["most APIs", "lactose", "cellulose"],
        incompatibility: &["strong oxidizing agents"],
        use_range: "5-20%",
        features: &["natural", "cheap", "biodegradable"],
    },
    Excipient {
        name: "Croscarmellose Sodium",
        category: Category::Disintegrant,
        properties: &[
            ("swelling", 4.5),
            ("moisture", 6.0),
            ("efficiency", 5.0),
            ("stability", 4.0),
        ],
        compatibility: &["most APIs", "fillers"],
        incompatibility: &["strong acids", "some salts"],
        use_range: "0.5-5%",
        features: &["super disintegrant", "rapid action", "efficient"],
    },
    Excipient {
        name: "Magnesium Stearate",
        category: Category::Lubricant,
        properties: &[
            ("lubricity", 5.0),
            ("moisture", 0.5),
            ("flow_impact", -1.0),
            ("stability", 4.5),
        ],
        compatibility: &["most excipients"],
        incompatibility: &["some acids", "oxidizing agents"],
        use_range: "0.25-1%",
        features: &["effective", "hydrophobic", "common"],
    },
];

/// Case-insensitive lookup; "MCC" is accepted for microcrystalline cellulose.
pub fn lookup(name: &str) -> Result<&'static Excipient, Error> {
    let wanted = name.trim();
    let wanted = if wanted.eq_ignore_ascii_case("mcc") {
        "Microcrystalline Cellulose"
    } else {
        wanted
    };
    DATABASE
        .iter()
        .find(|e| e.name.eq_ignore_ascii_case(wanted))
        .ok_or_else(|| Error::unknown("excipient", name))
}

pub fn by_category(category: Category) -> impl Iterator<Item = &'static Excipient> {
    DATABASE.iter().filter(move |e| e.category == category)
}

fn overlaps(a: &[&str], b: &[&str]) -> bool {
    a.iter().any(|x| b.contains(x))
}

/// Pairwise score in `[0, 1]`: each direction where one excipient's
/// incompatibilities name something the other is compatible with costs 0.5.
pub fn compatibility_score(a: &Excipient, b: &Excipient) -> f64 {
    let mut score = 1.0;
    if overlaps(a.incompatibility, b.compatibility) {
        score -= 0.5;
    }
    if overlaps(b.incompatibility, a.compatibility) {
        score -= 0.5;
    }
    f64::max(score, 0.0)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FlowQuality {
    Good,
    Fair,
    Poor,
}

impl fmt::Display for FlowQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FlowQuality::Good => "Good",
            FlowQuality::Fair => "Fair",
            FlowQuality::Poor => "Poor",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FlowAssessment {
    pub tapped_density: f64,
    pub carrs_index: f64,
    pub quality: FlowQuality,
}

/// Carr's index estimated from the angle of repose (degrees) and bulk density.
pub fn flow_properties(angle_of_repose: f64, bulk_density: f64) -> FlowAssessment {
    let tapped_density = bulk_density * (1.0 + (45.0 - angle_of_repose) / 100.0);
    let carrs_index = (tapped_density - bulk_density) / tapped_density * 100.0;
    let quality = if carrs_index < 15.0 {
        FlowQuality::Good
    } else if carrs_index < 25.0 {
        FlowQuality::Fair
    } else {
        FlowQuality::Poor
    };
    FlowAssessment {
        tapped_density,
        carrs_index,
        quality,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DosageForm {
    Tablet,
    Capsule,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Manufacturing {
    DirectCompression,
    WetGranulation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Solubility {
    High,
    Poor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Stability {
    MoistureSensitive,
    HeatSensitive,
    Stable,
}

macro_rules! parse_choice {
    ($ty:ty, $kind:literal, { $($($alias:literal)|+ => $variant:expr),+ $(,)? }) => {
        impl FromStr for $ty {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_ascii_lowercase().as_str() {
                    $($($alias)|+ => Ok($variant),)+
                    _ => Err(Error::unknown($kind, s)),
                }
            }
        }
    };
}

parse_choice!(DosageForm, "dosage form", {
    "tablet" => DosageForm::Tablet,
    "capsule" => DosageForm::Capsule,
});
parse_choice!(Manufacturing, "manufacturing method", {
    "direct" | "direct-compression" => Manufacturing::DirectCompression,
    "wet" | "wet-granulation" => Manufacturing::WetGranulation,
});
parse_choice!(Solubility, "solubility", {
    "high" | "highly-soluble" => Solubility::High,
    "poor" | "poorly-soluble" => Solubility::Poor,
});
parse_choice!(Stability, "stability", {
    "moisture" | "moisture-sensitive" => Stability::MoistureSensitive,
    "heat" | "heat-sensitive" => Stability::HeatSensitive,
    "stable" => Stability::Stable,
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Requirements {
    pub dosage_form: DosageForm,
    pub manufacturing: Manufacturing,
    pub solubility: Solubility,
    pub stability: Stability,
}

/// A recommended excipient: functional role, material and amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pick {
    pub role: &'static str,
    pub material: &'static str,
    pub amount: &'static str,
}

const fn pick(role: &'static str, material: &'static str, amount: &'static str) -> Pick {
    Pick { role, material, amount }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Recommendation {
    pub excipients: &'static [Pick],
    pub notes: &'static [&'static str],
}

/// Decision table for excipient selection.
///
/// Capsules ignore the manufacturing method. Wet granulation treats heat
/// sensitive and stable APIs alike, and so does every poorly soluble branch
/// that is not moisture sensitive.
pub fn recommend(req: &Requirements) -> Recommendation {
    use DosageForm::*;
    use Manufacturing::*;
    use Solubility::*;
    use Stability::*;

    let moisture = req.stability == MoistureSensitive;
    match (req.dosage_form, req.manufacturing, req.solubility) {
        (Tablet, DirectCompression, High) => match req.stability {
            MoistureSensitive => Recommendation {
                excipients: const { &[
                    pick("Filler", "Microcrystalline Cellulose (low moisture grade)", "60-80%"),
                    pick("Disintegrant", "Crospovidone (moisture-resistant)", "2-4%"),
                    pick("Lubricant", "Magnesium Stearate", "0.5-1%"),
                    pick("Glidant", "Colloidal Silicon Dioxide", "0.2%"),
                ] },
                notes: &[
                    "Low moisture content excipients selected",
                    "Crospovidone preferred for moisture sensitivity",
                    "Minimal hygroscopic components",
                ],
            },
            HeatSensitive => Recommendation {
                excipients: const { &[
                    pick("Filler", "Lactose Monohydrate", "60-80%"),
                    pick("Disintegrant", "Croscarmellose Sodium", "2-4%"),
                    pick("Lubricant", "Magnesium Stearate", "0.5%"),
                    pick("Glidant", "Colloidal Silicon Dioxide", "0.2%"),
                ] },
                notes: &[
                    "Direct compression avoids heat exposure",
                    "Standard excipients suitable",
                    "Minimal processing required",
                ],
            },
            Stable => Recommendation {
                excipients: const { &[
                    pick("Filler", "Microcrystalline Cellulose + Lactose", "40% + 40%"),
                    pick("Disintegrant", "Sodium Starch Glycolate", "2-4%"),
                    pick("Lubricant", "Magnesium Stearate", "0.5%"),
                    pick("Glidant", "Colloidal Silicon Dioxide", "0.2%"),
                ] },
                notes: &[
                    "Optimal filler combination for compressibility",
                    "Standard disintegration system",
                    "Good flowability and compression",
                ],
            },
        },
        (Tablet, DirectCompression, Poor) if moisture => Recommendation {
            excipients: const { &[
                pick("Filler", "Microcrystalline Cellulose (silicified)", "60-70%"),
                pick("Disintegrant", "Crospovidone", "4-5%"),
                pick("Surfactant", "Sodium Lauryl Sulfate", "0.5-1%"),
                pick("Lubricant", "Magnesium Stearate", "0.5%"),
            ] },
            notes: &[
                "Surfactant added for solubility enhancement",
                "Moisture-resistant components",
                "Enhanced dissolution properties",
            ],
        },
        (Tablet, DirectCompression, Poor) => Recommendation {
            excipients: const { &[
                pick("Filler", "Microcrystalline Cellulose + Pregelatinized Starch", "50% + 20%"),
                pick("Disintegrant", "Croscarmellose Sodium", "5%"),
                pick("Surfactant", "Polysorbate 80", "1%"),
                pick("Lubricant", "Magnesium Stearate", "0.5%"),
            ] },
            notes: &[
                "Dissolution enhancing components",
                "Good disintegration properties",
                "Enhanced wettability",
            ],
        },
        // Poorly soluble APIs are granulated the same way as soluble ones.
        (Tablet, WetGranulation, _) if moisture => Recommendation {
            excipients: const { &[
                pick("Filler", "Microcrystalline Cellulose + DCP", "50% + 20%"),
                pick("Binder", "Povidone K30 (added in solvent)", "3-5%"),
                pick("Disintegrant", "Crospovidone", "2% intra + 2% extragranular"),
                pick("Lubricant", "Magnesium Stearate", "1%"),
            ] },
            notes: &[
                "Use ethanol as granulation fluid",
                "Minimize granulation liquid",
                "Control drying conditions",
            ],
        },
        (Tablet, WetGranulation, _) => Recommendation {
            excipients: const { &[
                pick("Filler", "Lactose Monohydrate", "60%"),
                pick("Binder", "HPMC", "4-6%"),
                pick("Disintegrant", "Croscarmellose Sodium", "2% intra + 2% extragranular"),
                pick("Lubricant", "Magnesium Stearate", "1%"),
            ] },
            notes: &[
                "Aqueous granulation",
                "Standard processing conditions",
                "Optimize drying temperature",
            ],
        },
        (Capsule, _, High) if moisture => Recommendation {
            excipients: const { &[
                pick("Filler", "Microcrystalline Cellulose", "70-85%"),
                pick("Glidant", "Colloidal Silicon Dioxide", "0.5%"),
                pick("Lubricant", "Magnesium Stearate", "0.5%"),
            ] },
            notes: &[
                "Minimal excipients needed",
                "Low moisture content",
                "Good flow properties",
            ],
        },
        (Capsule, _, High) => Recommendation {
            excipients: const { &[
                pick("Filler", "Lactose Monohydrate", "70-85%"),
                pick("Glidant", "Colloidal Silicon Dioxide", "0.5%"),
                pick("Lubricant", "Magnesium Stearate", "0.5%"),
            ] },
            notes: &["Simple formulation", "Cost-effective", "Good flowability"],
        },
        (Capsule, _, Poor) if moisture => Recommendation {
            excipients: const { &[
                pick("Filler", "Microcrystalline Cellulose", "60%"),
                pick("Surfactant", "Sodium Lauryl Sulfate", "1-2%"),
                pick("Disintegrant", "Crospovidone", "5%"),
                pick("Glidant", "Colloidal Silicon Dioxide", "0.5%"),
                pick("Lubricant", "Magnesium Stearate", "0.5%"),
            ] },
            notes: &[
                "Solubility enhancement",
                "Moisture protection",
                "Quick dissolution",
            ],
        },
        (Capsule, _, Poor) => Recommendation {
            excipients: const { &[
                pick("Filler", "Microcrystalline Cellulose + Lactose", "50% + 20%"),
                pick("Surfactant", "Polysorbate 80", "1%"),
                pick("Disintegrant", "Croscarmellose Sodium", "5%"),
                pick("Glidant", "Colloidal Silicon Dioxide", "0.5%"),
                pick("Lubricant", "Magnesium Stearate", "0.5%"),
            ] },
            notes: &[
                "Balanced formulation",
                "Enhanced dissolution",
                "Good processability",
            ],
        },
    }
}

/// Factors to weigh alongside any recommendation.
pub const SELECTION_CONSIDERATIONS: [&str; 5] = [
    "Processing conditions and their impact on stability",
    "Excipient moisture content and hygroscopicity",
    "Particle size compatibility",
    "Cost considerations",
    "Regulatory status of excipients",
];

/// A tablet formulation: API load plus excipients as percentages of the
/// weight left after the API.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Formulation {
    pub tablet_weight_mg: f64,
    pub api_mg: f64,
    pub excipients: Vec<(String, f64)>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormulationRow {
    pub component: String,
    pub percentage: f64,
    pub weight_mg: f64,
}

impl Formulation {
    pub fn new(tablet_weight_mg: f64, api_mg: f64) -> Self {
        Self {
            tablet_weight_mg,
            api_mg,
            excipients: Vec::new(),
        }
    }

    /// Adds an excipient; a repeated name replaces the earlier percentage.
    pub fn with(mut self, name: impl Into<String>, percent: f64) -> Self {
        let name = name.into();
        match self.excipients.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = percent,
            None => self.excipients.push((name, percent)),
        }
        self
    }

    pub fn available_weight_mg(&self) -> f64 {
        self.tablet_weight_mg - self.api_mg
    }

    pub fn total_percent(&self) -> f64 {
        self.excipients.iter().map(|(_, p)| p).sum()
    }

    /// Builds the composition table.
    ///
    /// # Errors
    ///
    /// Returns [`Error::FormulationTotal`] unless the excipient percentages
    /// sum to exactly 100, or [`Error::InvalidParameter`] for a
    /// non-positive tablet weight.
    pub fn table(&self) -> Result<Vec<FormulationRow>, Error> {
        require_positive("tablet_weight_mg", self.tablet_weight_mg)?;
        let total = self.total_percent();
        if (total - 100.0).abs() > 1e-9 {
            return Err(Error::FormulationTotal { total });
        }
        let available = self.available_weight_mg();
        let mut rows = vec![FormulationRow {
            component: "API".to_string(),
            percentage: self.api_mg / self.tablet_weight_mg * 100.0,
            weight_mg: self.api_mg,
        }];
        rows.extend(self.excipients.iter().map(|(name, p)| FormulationRow {
            component: name.clone(),
            percentage: *p,
            weight_mg: available * p / 100.0,
        }));
        debug!(components = rows.len(), "built formulation table");
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_is_case_insensitive() {
        assert_eq!(lookup("starch").unwrap().category, Category::Binder);
        assert_eq!(lookup("MCC").unwrap().name, "Microcrystalline Cellulose");
        assert!(matches!(lookup("talc"), Err(Error::UnknownEntry { .. })));
        assert_eq!(by_category(Category::Filler).count(), 2);
        assert_eq!("binder".parse::<Category>().unwrap(), Category::Binder);
        assert_eq!("Lubricants".parse::<Category>().unwrap(), Category::Lubricant);
    }

    #[test]
    fn compatibility_scores() {
        let lactose = lookup("Lactose Monohydrate").unwrap();
        let mcc = lookup("MCC").unwrap();
        assert_eq!(compatibility_score(lactose, mcc), 1.0);
        assert_eq!(compatibility_score(lactose, lactose), 1.0);
        let fake = Excipient {
            name: "Oxidizer",
            incompatibility: &["starch"],
            compatibility: &["amines"],
            ..*lactose
        };
        // Both directions conflict.
        assert_eq!(compatibility_score(&fake, lactose), 0.0);
    }

    #[test]
    fn carr_index_classes() {
        let good = flow_properties(40.0, 0.5);
        assert_eq!(good.quality, FlowQuality::Good);
        assert!((good.tapped_density - 0.525).abs() < 1e-12);
        assert_eq!(flow_properties(25.0, 0.5).quality, FlowQuality::Fair);
        assert_eq!(flow_properties(5.0, 0.5).quality, FlowQuality::Poor);
    }

    #[test]
    fn selection_table() {
        let req = Requirements {
            dosage_form: DosageForm::Tablet,
            manufacturing: Manufacturing::DirectCompression,
            solubility: Solubility::High,
            stability: Stability::Stable,
        };
        assert_eq!(recommend(&req).excipients[1].material, "Sodium Starch Glycolate");
        let capsule = Requirements {
            dosage_form: DosageForm::Capsule,
            solubility: Solubility::Poor,
            stability: Stability::MoistureSensitive,
            ..req
        };
        assert_eq!(recommend(&capsule).excipients.len(), 5);
        let wet = Requirements {
            manufacturing: Manufacturing::WetGranulation,
            solubility: Solubility::Poor,
            ..req
        };
        assert_eq!(recommend(&wet).excipients[1].material, "HPMC");
        assert_eq!("wet".parse::<Manufacturing>().unwrap(), Manufacturing::WetGranulation);
        assert!("gel".parse::<DosageForm>().is_err());
    }

    #[test]
    fn every_selection_branch_returns_static_picks() {
        let mut seen: Vec<&'static [Pick]> = Vec::new();
        for dosage_form in [DosageForm::Tablet, DosageForm::Capsule] {
            for manufacturing in [Manufacturing::DirectCompression, Manufacturing::WetGranulation] {
                for solubility in [Solubility::High, Solubility::Poor] {
                    for stability in [
                        Stability::MoistureSensitive,
                        Stability::HeatSensitive,
                        Stability::Stable,
                    ] {
                        let rec = recommend(&Requirements {
                            dosage_form,
                            manufacturing,
                            solubility,
                            stability,
                        });
                        assert!(rec.excipients.len() >= 3);
                        assert_eq!(rec.notes.len(), 3);
                        seen.push(rec.excipients);
                    }
                }
            }
        }
        assert_eq!(seen.len(), 24);
        assert!(seen.iter().all(|picks| picks.iter().any(|p| p.role == "Lubricant")));
    }

    #[test]
    fn formulation_requires_full_total() {
        let f = Formulation::new(200.0, 50.0)
            .with("Lactose Monohydrate", 70.0)
            .with("Croscarmellose Sodium", 3.0)
            .with("Povidone", 5.0)
            .with("Magnesium Stearate", 1.0);
        match f.table() {
            Err(Error::FormulationTotal { total }) => assert_eq!(total, 79.0),
            other => panic!("unexpected {other:?}"),
        }

        let f = f.with("Lactose Monohydrate", 91.0);
        let rows = f.table().unwrap();
        assert_eq!(rows.len(), 5);
        assert_eq!(rows[0].percentage, 25.0);
        assert!((rows[1].weight_mg - 136.5).abs() < 1e-9);
    }
}
