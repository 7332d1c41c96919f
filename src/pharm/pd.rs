//! Pharmacodynamic dose-response relationships.

use serde::Serialize;

use super::error::{Error, require_non_negative, require_positive};
use super::grid::{linspace, logspace};
use super::ionization::{DrugKind, ionized_fraction};
use super::series::Profile;

/// Receptor occupancy (%) by the law of mass action.
pub fn receptor_occupancy(conc: f64, kd: f64) -> f64 {
    conc / (conc + kd) * 100.0
}

/// Hill equation effect (%).
pub fn hill(conc: f64, ec50: f64, n: f64) -> f64 {
    let cn = conc.powf(n);
    cn / (ec50.powf(n) + cn) * 100.0
}

/// Agonist effect (%) in the presence of a competitive antagonist.
pub fn competitive_antagonism(agonist: f64, antagonist: f64, ka_agonist: f64, kb: f64) -> f64 {
    let a = agonist / ka_agonist;
    a / (1.0 + a + antagonist / kb) * 100.0
}

/// Piecewise effect: none below the MEC, linear to 80% across the window,
/// and 100% (toxicity) above the toxic concentration.
pub fn therapeutic_window(conc: f64, mec: f64, toxic: f64) -> f64 {
    if conc < mec {
        0.0
    } else if conc > toxic {
        100.0
    } else {
        (conc - mec) / (toxic - mec) * 80.0
    }
}

pub fn binding_curve(kd: f64, max_conc: f64, points: usize) -> Profile {
    let x = logspace(-2.0, max_conc.log10(), points);
    let y = x.iter().map(|&c| receptor_occupancy(c, kd)).collect();
    Profile::new("Drug-Receptor Binding Curve", "Drug Concentration", x)
        .with("Receptor Occupancy (%)", y)
}

pub fn dose_response(ec50: f64, n: f64, points: usize) -> Profile {
    let x = logspace(-2.0, 2.0, points);
    let y = x.iter().map(|&c| hill(c, ec50, n)).collect();
    Profile::new("Dose-Response Curve", "Drug Concentration", x).with("Effect (%)", y)
}

/// Agonist curves with and without the antagonist.
pub fn antagonism_curve(antagonist: f64, ka_agonist: f64, kb: f64, points: usize) -> Profile {
    let x = logspace(-2.0, 2.0, points);
    let with = x
        .iter()
        .map(|&c| competitive_antagonism(c, antagonist, ka_agonist, kb))
        .collect();
    let without = x
        .iter()
        .map(|&c| competitive_antagonism(c, 0.0, ka_agonist, kb))
        .collect();
    Profile::new("Competitive Antagonism", "Agonist Concentration", x)
        .with("Effect (%)", with)
        .with("Agonist Alone (%)", without)
}

pub fn window_curve(mec: f64, toxic: f64, points: usize) -> Profile {
    let x = linspace(0.0, 200.0, points);
    let y = x.iter().map(|&c| therapeutic_window(c, mec, toxic)).collect();
    Profile::new("Therapeutic Window", "Drug Concentration", x).with("Effect (%)", y)
}

pub fn validate_window(mec: f64, toxic: f64) -> Result<(), Error> {
    require_non_negative("mec", mec)?;
    require_positive("toxic", toxic)?;
    if toxic <= mec {
        return Err(Error::invalid(
            "toxic",
            toxic,
            "must exceed the minimum effective concentration",
        ));
    }
    Ok(())
}

/// β-blocker: Hill effect (n = 1) and resulting heart rate.
///
/// Heart rate falls from `baseline_hr` towards 60 bpm at full effect.
pub fn beta_blocker(baseline_hr: f64, ic50: f64, points: usize) -> Profile {
    let x = logspace(-2.0, 2.0, points);
    let effect: Vec<f64> = x.iter().map(|&c| hill(c, ic50, 1.0)).collect();
    let hr = effect
        .iter()
        .map(|e| baseline_hr - (baseline_hr - 60.0) * e / 100.0)
        .collect();
    Profile::new("Beta Blocker Response", "Drug Concentration", x)
        .with("% Effect", effect)
        .with("Heart Rate (bpm)", hr)
}

/// Local anesthetic activity tracks the unionized fraction of the base.
pub fn anesthetic_effect(ph: f64, pka: f64) -> f64 {
    100.0 * (1.0 - ionized_fraction(ph, pka, DrugKind::Base))
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnestheticCase {
    pub profile: Profile,
    pub tissue_ph: f64,
    pub tissue_effect: f64,
}

pub fn local_anesthetic(pka: f64, tissue_ph: f64, points: usize) -> AnestheticCase {
    let x = linspace(6.0, 8.0, points);
    let y = x.iter().map(|&ph| anesthetic_effect(ph, pka)).collect();
    AnestheticCase {
        profile: Profile::new("pH Effect on Local Anesthetic Activity", "pH", x)
            .with("Anesthetic Effect (%)", y),
        tissue_ph,
        tissue_effect: anesthetic_effect(tissue_ph, pka),
    }
}

/// Anticoagulant INR with a fixed Hill response (EC50 2, n 1.5).
pub fn inr(conc: f64, baseline: f64, target: f64) -> f64 {
    baseline + hill(conc, 2.0, 1.5) * (target - baseline) / 100.0
}

/// Therapeutic INR band.
pub const INR_RANGE: (f64, f64) = (2.0, 3.0);

pub fn anticoagulant(baseline: f64, target: f64, points: usize) -> Profile {
    let x = linspace(0.0, 10.0, points);
    let y = x.iter().map(|&c| inr(c, baseline, target)).collect();
    Profile::new("Anticoagulant Effect on INR", "Drug Concentration", x).with("INR", y)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn half_occupancy_at_kd() {
        assert_eq!(receptor_occupancy(2.5, 2.5), 50.0);
        assert_eq!(hill(3.0, 3.0, 2.7), 50.0);
    }

    #[test]
    fn steeper_hill_is_sharper() {
        assert!(hill(2.0, 1.0, 3.0) > hill(2.0, 1.0, 1.0));
        assert!(hill(0.5, 1.0, 3.0) < hill(0.5, 1.0, 1.0));
    }

    #[test]
    fn antagonist_shifts_curve_right() {
        let plain = competitive_antagonism(1.0, 0.0, 1.0, 2.0);
        let blocked = competitive_antagonism(1.0, 4.0, 1.0, 2.0);
        assert_eq!(plain, 50.0);
        assert!(blocked < plain);
        // Surmountable: enough agonist restores most of the effect.
        assert!(competitive_antagonism(1000.0, 4.0, 1.0, 2.0) > 99.0);
    }

    #[test]
    fn window_segments() {
        assert_eq!(therapeutic_window(5.0, 10.0, 100.0), 0.0);
        assert_eq!(therapeutic_window(55.0, 10.0, 100.0), 40.0);
        assert_eq!(therapeutic_window(100.0, 10.0, 100.0), 80.0);
        assert_eq!(therapeutic_window(150.0, 10.0, 100.0), 100.0);
        assert!(validate_window(60.0, 50.0).is_err());
    }

    #[test]
    fn curves_span_requested_ranges() {
        let b = binding_curve(1.0, 50.0, 100);
        assert!((b.x[0] - 0.01).abs() < 1e-15);
        assert!((b.x[99] - 50.0).abs() < 1e-9);
        let w = window_curve(10.0, 100.0, 100);
        assert_eq!(w.x[99], 200.0);
    }

    #[test]
    fn heart_rate_bounds() {
        let p = beta_blocker(80.0, 1.0, 100);
        let hr = p.get("Heart Rate (bpm)").unwrap();
        assert!(hr.iter().all(|&h| (60.0..=80.0).contains(&h)));
        assert!(hr.windows(2).all(|w| w[1] <= w[0]));
    }

    #[test]
    fn anesthetic_weaker_in_acidic_tissue() {
        let case = local_anesthetic(7.9, 7.4, 100);
        assert!(anesthetic_effect(6.5, 7.9) < case.tissue_effect);
        assert_eq!(anesthetic_effect(7.9, 7.9), 50.0);
    }

    #[test]
    fn inr_starts_at_baseline_and_rises_towards_target() {
        assert_eq!(inr(0.0, 1.0, 2.5), 1.0);
        assert!((inr(2.0, 1.0, 2.5) - 1.75).abs() < 1e-12);
        assert!(inr(10.0, 1.0, 2.5) < 2.5);
    }
}
