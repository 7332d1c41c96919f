//! Drug-drug interactions: metabolic, pharmacokinetic and pharmacodynamic.

use std::fmt;
use std::str::FromStr;

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand_distr::{Distribution, Normal};
use serde::Serialize;

use super::error::{Error, require_fraction, require_positive};
use super::grid::{linspace, max, mean, trapezoid};
use super::series::Profile;

/// Clearance (1/h) of the victim drug without any interaction.
pub const BASELINE_CLEARANCE: f64 = 0.1;

pub fn inhibited_clearance(inhibitor_conc: f64, ki: f64) -> f64 {
    BASELINE_CLEARANCE / (1.0 + inhibitor_conc / ki)
}

/// Clearance after induction; `effect` is the fold-increase minus one.
pub fn induced_clearance(effect: f64) -> f64 {
    BASELINE_CLEARANCE * (1.0 + effect)
}

/// Combined effect (fractions) with interaction coefficient `beta`.
pub fn combined_effect(e1: f64, e2: f64, beta: f64) -> f64 {
    e1 + e2 + beta * e1 * e2
}

/// Concentration curves with and without an interaction, plus the AUC change.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetabolicInteraction {
    pub profile: Profile,
    /// Signed AUC change in percent (positive means more exposure).
    pub auc_change_pct: f64,
}

fn decay(t: &[f64], c0: f64, k: f64) -> Vec<f64> {
    t.iter().map(|&ti| c0 * (-k * ti).exp()).collect()
}

/// Competitive enzyme inhibition over 24 h.
pub fn metabolic_inhibition(c0: f64, inhibitor_conc: f64, ki: f64, points: usize) -> MetabolicInteraction {
    let t = linspace(0.0, 24.0, points);
    let baseline = decay(&t, c0, BASELINE_CLEARANCE);
    let inhibited = decay(&t, c0, inhibited_clearance(inhibitor_conc, ki));
    let auc_change_pct = (trapezoid(&inhibited, &t) / trapezoid(&baseline, &t) - 1.0) * 100.0;
    MetabolicInteraction {
        profile: Profile::new("Effect of Metabolic Inhibition", "Time (hours)", t)
            .with("Without Inhibitor", baseline)
            .with("With Inhibitor", inhibited),
        auc_change_pct,
    }
}

/// Enzyme induction by `fold` (1 = no induction) over 24 h.
pub fn enzyme_induction(c0: f64, fold: f64, points: usize) -> MetabolicInteraction {
    let t = linspace(0.0, 24.0, points);
    let baseline = decay(&t, c0, BASELINE_CLEARANCE);
    let induced = decay(&t, c0, induced_clearance(fold - 1.0));
    let auc_change_pct = (trapezoid(&induced, &t) / trapezoid(&baseline, &t) - 1.0) * 100.0;
    MetabolicInteraction {
        profile: Profile::new("Effect of Enzyme Induction", "Time (hours)", t)
            .with("Without Induction", baseline)
            .with("With Induction", induced),
        auc_change_pct,
    }
}

/// Absorption interaction scaling `ka` by `factor` over 12 h.
pub fn absorption_interaction(dose: f64, ka: f64, factor: f64, points: usize) -> Profile {
    let t = linspace(0.0, 12.0, points);
    let normal = t.iter().map(|&ti| dose * ka * (-0.1 * ti).exp()).collect();
    let altered = t
        .iter()
        .map(|&ti| dose * ka * factor * (-0.1 * ti).exp())
        .collect();
    Profile::new("Effect on Drug Absorption", "Time (hours)", t)
        .with("Normal Absorption", normal)
        .with("With Interaction", altered)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum RiskLevel {
    Low,
    Moderate,
    High,
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RiskLevel::Low => "Low",
            RiskLevel::Moderate => "Moderate",
            RiskLevel::High => "High",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProteinBindingParams {
    pub total_conc: f64,
    pub free_fraction: f64,
    pub displacement: f64,
    pub clearance: f64,
}

impl Default for ProteinBindingParams {
    fn default() -> Self {
        Self {
            total_conc: 100.0,
            free_fraction: 0.1,
            displacement: 2.0,
            clearance: 0.5,
        }
    }
}

impl ProteinBindingParams {
    pub fn validate(&self) -> Result<(), Error> {
        require_positive("total_conc", self.total_conc)?;
        require_fraction("free_fraction", self.free_fraction)?;
        require_positive("free_fraction", self.free_fraction)?;
        require_positive("displacement", self.displacement)?;
        require_positive("clearance", self.clearance)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplacementResult {
    pub profile: Profile,
    pub initial_free_increase_pct: f64,
    pub free_auc_increase_pct: f64,
    pub risk: RiskLevel,
}

impl DisplacementResult {
    pub fn advice(&self) -> &'static [&'static str] {
        match self.risk {
            RiskLevel::High => &[
                "Significant increase in free drug concentration",
                "Monitor for drug toxicity",
                "Consider dose reduction",
            ],
            RiskLevel::Moderate => &[
                "Monitor drug levels and clinical response",
                "Consider dose adjustment if necessary",
            ],
            RiskLevel::Low => &[
                "Routine monitoring adequate",
                "No immediate dose adjustment needed",
            ],
        }
    }
}

/// Protein-binding displacement over 24 h.
///
/// Free drug is cleared at the full rate, bound drug at a fifth of it.
pub fn protein_binding(p: &ProteinBindingParams, points: usize) -> DisplacementResult {
    let t = linspace(0.0, 24.0, points);
    let displaced_fraction = (p.free_fraction * p.displacement).min(1.0);
    let curve = |fraction: f64| -> (Vec<f64>, Vec<f64>) {
        let free0 = p.total_conc * fraction;
        let bound0 = p.total_conc * (1.0 - fraction);
        let free = decay(&t, free0, p.clearance);
        let total = t
            .iter()
            .zip(&free)
            .map(|(&ti, f)| f + bound0 * (-p.clearance * 0.2 * ti).exp())
            .collect();
        (free, total)
    };
    let (free_normal, total_normal) = curve(p.free_fraction);
    let (free_displaced, total_displaced) = curve(displaced_fraction);

    let initial_free_increase_pct = (displaced_fraction / p.free_fraction - 1.0) * 100.0;
    let free_auc_increase_pct =
        (trapezoid(&free_displaced, &t) / trapezoid(&free_normal, &t) - 1.0) * 100.0;
    let risk = if initial_free_increase_pct > 50.0 {
        RiskLevel::High
    } else if initial_free_increase_pct > 20.0 {
        RiskLevel::Moderate
    } else {
        RiskLevel::Low
    };

    DisplacementResult {
        profile: Profile::new("Effect of Protein Binding Displacement", "Time (hours)", t)
            .with("Normal Free Conc", free_normal)
            .with("Displaced Free Conc", free_displaced)
            .with("Normal Total Conc", total_normal)
            .with("Displaced Total Conc", total_displaced),
        initial_free_increase_pct,
        free_auc_increase_pct,
        risk,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum InteractionType {
    Additive,
    Synergistic,
    Antagonistic,
}

impl InteractionType {
    pub fn coefficient(&self) -> f64 {
        match self {
            InteractionType::Additive => 0.0,
            InteractionType::Synergistic => 0.5,
            InteractionType::Antagonistic => -0.3,
        }
    }

    /// Combined effect in percent from two individual effects in percent.
    pub fn combine(&self, e1_pct: f64, e2_pct: f64) -> f64 {
        combined_effect(e1_pct / 100.0, e2_pct / 100.0, self.coefficient()) * 100.0
    }
}

impl FromStr for InteractionType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "additive" => Ok(InteractionType::Additive),
            "synergistic" => Ok(InteractionType::Synergistic),
            "antagonistic" => Ok(InteractionType::Antagonistic),
            _ => Err(Error::unknown("interaction type", s)),
        }
    }
}

/// Checklist answers feeding the interaction risk score.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RiskFactors {
    pub narrow_therapeutic_index: bool,
    pub critical_drug: bool,
    pub strong_inhibitor_or_inducer: bool,
    pub alternative_available: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RiskAssessment {
    pub score: u8,
    pub level: RiskLevel,
}

/// Highest achievable risk score.
pub const MAX_RISK_SCORE: u8 = 8;

impl RiskFactors {
    pub fn assess(&self) -> RiskAssessment {
        let mut score = 0;
        if self.narrow_therapeutic_index {
            score += 3;
        }
        if self.critical_drug {
            score += 2;
        }
        if self.strong_inhibitor_or_inducer {
            score += 2;
        }
        if !self.alternative_available {
            score += 1;
        }
        let level = match score {
            0..=2 => RiskLevel::Low,
            3..=5 => RiskLevel::Moderate,
            _ => RiskLevel::High,
        };
        RiskAssessment { score, level }
    }
}

impl RiskAssessment {
    pub fn recommendations(&self) -> &'static [&'static str] {
        match self.level {
            RiskLevel::Low => &["Monitor routine clinical parameters"],
            RiskLevel::Moderate => &[
                "Consider alternative therapy",
                "Increase monitoring frequency",
                "Adjust dosing if needed",
            ],
            RiskLevel::High => &[
                "Avoid combination if possible",
                "Consider alternative therapy",
                "If necessary, implement intensive monitoring",
                "Adjust dosing with careful titration",
            ],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ClinicalCase {
    WarfarinAntibiotic,
    StatinInhibitor,
    SsriNsaid,
}

impl ClinicalCase {
    pub const ALL: [ClinicalCase; 3] = [
        ClinicalCase::WarfarinAntibiotic,
        ClinicalCase::StatinInhibitor,
        ClinicalCase::SsriNsaid,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            ClinicalCase::WarfarinAntibiotic => "Warfarin-Antibiotic Interaction",
            ClinicalCase::StatinInhibitor => "Statin-CYP3A4 Inhibitor Interaction",
            ClinicalCase::SsriNsaid => "SSRI-NSAID Interaction",
        }
    }
}

impl FromStr for ClinicalCase {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "warfarin" | "warfarin-antibiotic" => Ok(ClinicalCase::WarfarinAntibiotic),
            "statin" | "statin-cyp3a4" => Ok(ClinicalCase::StatinInhibitor),
            "ssri" | "ssri-nsaid" => Ok(ClinicalCase::SsriNsaid),
            _ => Err(Error::unknown("clinical case", s)),
        }
    }
}

/// Summary numbers shown with a clinical case.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum CaseMetrics {
    /// Days until the interacting INR first leaves the 2-3 range.
    Warfarin { days_to_supratherapeutic: Option<f64> },
    Statin { auc_increase_pct: f64, peak_increase_pct: f64 },
    Ssri { risk_increase_pct: f64, peak_risk: f64 },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClinicalSimulation {
    pub case: ClinicalCase,
    pub profile: Profile,
    pub metrics: CaseMetrics,
}

struct Noise {
    rng: StdRng,
}

impl Noise {
    fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    fn add(&mut self, base: impl Iterator<Item = f64>, sigma: f64) -> Result<Vec<f64>, Error> {
        let dist = Normal::new(0.0, sigma).map_err(|e| Error::invalid("sigma", sigma, e.to_string()))?;
        Ok(base.map(|b| b + dist.sample(&mut self.rng)).collect())
    }
}

/// Simulated monitoring data for a clinical case with seeded noise.
pub fn clinical_case(case: ClinicalCase, seed: u64, points: usize) -> Result<ClinicalSimulation, Error> {
    let mut noise = Noise::new(seed);
    let (profile, metrics) = match case {
        ClinicalCase::WarfarinAntibiotic => {
            let t = linspace(0.0, 14.0, points);
            let normal = noise.add(t.iter().map(|_| 2.5), 0.1)?;
            let altered = noise.add(t.iter().map(|&d| 2.5 * (0.1 * d).exp()), 0.2)?;
            let days_to_supratherapeutic = t.iter().zip(&altered).find(|&(_, &inr)| inr > 3.0).map(|(&d, _)| d);
            let profile = Profile::new("INR Changes with Antibiotic Therapy", "Days", t)
                .with("Normal INR", normal)
                .with("With Antibiotic", altered);
            (profile, CaseMetrics::Warfarin { days_to_supratherapeutic })
        }
        ClinicalCase::StatinInhibitor => {
            let t = linspace(0.0, 7.0, points);
            let normal = noise.add(t.iter().map(|&d| 100.0 * (-0.2 * d).exp()), 5.0)?;
            let inhibited = noise.add(t.iter().map(|&d| 100.0 * (-0.05 * d).exp()), 10.0)?;
            let metrics = CaseMetrics::Statin {
                auc_increase_pct: (trapezoid(&inhibited, &t) / trapezoid(&normal, &t) - 1.0) * 100.0,
                peak_increase_pct: (max(&inhibited) / max(&normal) - 1.0) * 100.0,
            };
            let profile = Profile::new("Statin Plasma Concentration with CYP3A4 Inhibition", "Days", t)
                .with("Normal Statin Level", normal)
                .with("With CYP3A4 Inhibitor", inhibited);
            (profile, metrics)
        }
        ClinicalCase::SsriNsaid => {
            let t = linspace(0.0, 30.0, points);
            let wave = |offset: f64, amp: f64| t.iter().map(move |&d| offset + amp * (d / 10.0).sin());
            let baseline = noise.add(wave(1.0, 0.5), 0.1)?;
            let ssri = noise.add(wave(2.0, 0.5), 0.1)?;
            let combined = noise.add(wave(4.0, 1.0), 0.2)?;
            let metrics = CaseMetrics::Ssri {
                risk_increase_pct: (mean(&combined) / mean(&baseline) - 1.0) * 100.0,
                peak_risk: max(&combined),
            };
            let profile = Profile::new("Bleeding Risk Assessment", "Days", t)
                .with("Baseline Risk", baseline)
                .with("SSRI Alone", ssri)
                .with("SSRI + NSAID", combined);
            (profile, metrics)
        }
    };
    Ok(ClinicalSimulation { case, profile, metrics })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_inhibitor_means_no_change() {
        let r = metabolic_inhibition(50.0, 0.0, 1.0, 100);
        assert!(r.auc_change_pct.abs() < 1e-12);
        let r = metabolic_inhibition(50.0, 1.0, 1.0, 100);
        assert!(r.auc_change_pct > 0.0);
    }

    #[test]
    fn induction_lowers_exposure() {
        let r = enzyme_induction(50.0, 2.0, 100);
        assert!(r.auc_change_pct < 0.0);
        assert_eq!(induced_clearance(1.0), 0.2);
        assert_eq!(inhibited_clearance(1.0, 1.0), 0.05);
    }

    #[test]
    fn displacement_tiers() {
        let doubled = protein_binding(&ProteinBindingParams::default(), 100);
        assert!((doubled.initial_free_increase_pct - 100.0).abs() < 1e-9);
        assert!((doubled.free_auc_increase_pct - 100.0).abs() < 1e-9);
        assert_eq!(doubled.risk, RiskLevel::High);

        let mild = ProteinBindingParams { displacement: 1.1, ..Default::default() };
        assert_eq!(protein_binding(&mild, 100).risk, RiskLevel::Low);
        let moderate = ProteinBindingParams { displacement: 1.3, ..Default::default() };
        assert_eq!(protein_binding(&moderate, 100).risk, RiskLevel::Moderate);
    }

    #[test]
    fn displaced_fraction_caps_at_one() {
        let p = ProteinBindingParams {
            free_fraction: 0.2,
            displacement: 5.0,
            ..Default::default()
        };
        let r = protein_binding(&p, 10);
        assert!((r.initial_free_increase_pct - 400.0).abs() < 1e-9);
        let free = r.profile.get("Displaced Free Conc").unwrap();
        assert_eq!(free[0], 100.0);
    }

    #[test]
    fn combination_effects() {
        assert!((InteractionType::Additive.combine(50.0, 30.0) - 80.0).abs() < 1e-9);
        assert!((InteractionType::Synergistic.combine(50.0, 30.0) - 87.5).abs() < 1e-9);
        assert!((InteractionType::Antagonistic.combine(50.0, 30.0) - 75.5).abs() < 1e-9);
    }

    #[test]
    fn risk_score_levels() {
        let none = RiskFactors { alternative_available: true, ..Default::default() };
        assert_eq!(none.assess(), RiskAssessment { score: 0, level: RiskLevel::Low });
        let worst = RiskFactors {
            narrow_therapeutic_index: true,
            critical_drug: true,
            strong_inhibitor_or_inducer: true,
            alternative_available: false,
        };
        assert_eq!(worst.assess().score, MAX_RISK_SCORE);
        assert_eq!(worst.assess().level, RiskLevel::High);
        let mid = RiskFactors { narrow_therapeutic_index: true, ..Default::default() };
        assert_eq!(mid.assess().level, RiskLevel::Moderate);
        assert_eq!(mid.assess().recommendations().len(), 3);
    }

    #[test]
    fn clinical_cases_are_seeded() {
        for case in ClinicalCase::ALL {
            let a = clinical_case(case, 11, 100).unwrap();
            let b = clinical_case(case, 11, 100).unwrap();
            assert_eq!(a, b);
            assert_eq!(a.profile.ragged(), None);
        }
        let statin = clinical_case(ClinicalCase::StatinInhibitor, 1, 100).unwrap();
        match statin.metrics {
            CaseMetrics::Statin { auc_increase_pct, .. } => assert!(auc_increase_pct > 0.0),
            other => panic!("unexpected metrics {other:?}"),
        }
    }
}
