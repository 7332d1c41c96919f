//! Compartmental pharmacokinetics.
//!
//! One-compartment models have closed forms. The two-compartment IV bolus
//! is integrated numerically with classical fourth-order Runge-Kutta.

use std::str::FromStr;

use serde::Serialize;
use tracing::debug;

use super::error::{Error, require_fraction, require_positive};
use super::grid::{linspace, max};
use super::series::Profile;

/// Largest internal RK4 step (hours).
const MAX_RK4_STEP: f64 = 0.01;

/// One-compartment IV bolus: `C = (D/V) e^{−kt}`.
pub fn iv_bolus(t: f64, dose: f64, volume: f64, k: f64) -> f64 {
    dose / volume * (-k * t).exp()
}

/// One-compartment zero-order infusion at `rate` for `duration`, then washout.
pub fn iv_infusion(t: f64, rate: f64, volume: f64, k: f64, duration: f64) -> f64 {
    let plateau = rate / k / volume;
    if t <= duration {
        plateau * (1.0 - (-k * t).exp())
    } else {
        plateau * (1.0 - (-k * duration).exp()) * (-k * (t - duration)).exp()
    }
}

/// One-compartment first-order absorption (Bateman function).
///
/// Serves oral, IM and SC routes, which differ only in `ka` and `f`.
pub fn first_order_absorption(t: f64, dose: f64, volume: f64, ka: f64, ke: f64, f: f64) -> f64 {
    f * dose * ka / (volume * (ka - ke)) * ((-ke * t).exp() - (-ka * t).exp())
}

pub fn half_life(k: f64) -> f64 {
    std::f64::consts::LN_2 / k
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TwoCompartment {
    pub dose: f64,
    /// Central volume (L).
    pub v1: f64,
    pub k12: f64,
    pub k21: f64,
    pub k10: f64,
}

impl Default for TwoCompartment {
    fn default() -> Self {
        Self {
            dose: 500.0,
            v1: 30.0,
            k12: 0.5,
            k21: 0.3,
            k10: 0.4,
        }
    }
}

impl TwoCompartment {
    pub fn validate(&self) -> Result<(), Error> {
        require_positive("dose", self.dose)?;
        require_positive("v1", self.v1)?;
        require_positive("k12", self.k12)?;
        require_positive("k21", self.k21)?;
        require_positive("k10", self.k10)
    }

    /// `dC/dt` and `dP/dt` for central and peripheral concentrations.
    fn derivatives(&self, c: f64, p: f64) -> (f64, f64) {
        (
            -self.k12 * c + self.k21 * p - self.k10 * c,
            self.k12 * c - self.k21 * p,
        )
    }

    fn rk4_step(&self, c: f64, p: f64, h: f64) -> (f64, f64) {
        let (a1, b1) = self.derivatives(c, p);
        let (a2, b2) = self.derivatives(c + 0.5 * h * a1, p + 0.5 * h * b1);
        let (a3, b3) = self.derivatives(c + 0.5 * h * a2, p + 0.5 * h * b2);
        let (a4, b4) = self.derivatives(c + h * a3, p + h * b3);
        (
            c + h / 6.0 * (a1 + 2.0 * a2 + 2.0 * a3 + a4),
            p + h / 6.0 * (b1 + 2.0 * b2 + 2.0 * b3 + b4),
        )
    }

    /// Central and peripheral concentrations at each time in `times`
    /// (ascending, starting at or after 0).
    pub fn solve(&self, times: &[f64]) -> (Vec<f64>, Vec<f64>) {
        let mut central = Vec::with_capacity(times.len());
        let mut peripheral = Vec::with_capacity(times.len());
        let (mut c, mut p) = (self.dose / self.v1, 0.0);
        let mut now = 0.0;

        for &target in times {
            let span = target - now;
            if span > 0.0 {
                let steps = (span / MAX_RK4_STEP).ceil().max(1.0) as usize;
                let h = span / steps as f64;
                for _ in 0..steps {
                    (c, p) = self.rk4_step(c, p, h);
                }
                now = target;
            }
            central.push(c);
            peripheral.push(p);
        }
        (central, peripheral)
    }

    /// Distribution rate constant, approximated as `k12 + k21 + k10`.
    pub fn alpha(&self) -> f64 {
        self.k12 + self.k21 + self.k10
    }

    pub fn distribution_half_life(&self) -> f64 {
        std::f64::consts::LN_2 / self.alpha()
    }

    pub fn profile(&self, duration_h: f64, points: usize) -> Profile {
        let t = linspace(0.0, duration_h, points);
        let (central, peripheral) = self.solve(&t);
        debug!(points, "integrated two-compartment model");
        Profile::new("Two-Compartment Model: Central Compartment", "Time (hours)", t)
            .with("Central Compartment", central)
            .with("Peripheral Compartment", peripheral)
    }
}

/// Inputs shared by the one-compartment and route-comparison views.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OneCompartment {
    pub dose: f64,
    pub volume: f64,
    pub k: f64,
    pub ka: f64,
}

impl Default for OneCompartment {
    fn default() -> Self {
        Self {
            dose: 500.0,
            volume: 50.0,
            k: 0.5,
            ka: 1.0,
        }
    }
}

impl OneCompartment {
    pub fn validate(&self) -> Result<(), Error> {
        require_positive("dose", self.dose)?;
        require_positive("volume", self.volume)?;
        require_positive("k", self.k)?;
        require_positive("ka", self.ka)?;
        if (self.ka - self.k).abs() < 1e-12 {
            return Err(Error::invalid(
                "ka",
                self.ka,
                "must differ from the elimination rate constant",
            ));
        }
        Ok(())
    }

    /// IV bolus and oral (F = 1) curves side by side.
    pub fn profile(&self, duration_h: f64, points: usize) -> Profile {
        let t = linspace(0.0, duration_h, points);
        let iv = t.iter().map(|&x| iv_bolus(x, self.dose, self.volume, self.k)).collect();
        let oral = t
            .iter()
            .map(|&x| first_order_absorption(x, self.dose, self.volume, self.ka, self.k, 1.0))
            .collect();
        Profile::new("One-Compartment Model: IV vs Oral", "Time (hours)", t)
            .with("IV Bolus", iv)
            .with("Oral", oral)
    }
}

/// An extravascular route: bioavailability and absorption-rate multiplier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Absorption {
    pub label: &'static str,
    pub f: f64,
    pub ka_factor: f64,
}

pub const ORAL: Absorption = Absorption { label: "Oral", f: 0.8, ka_factor: 1.0 };
pub const IM: Absorption = Absorption { label: "IM", f: 0.9, ka_factor: 1.5 };
pub const SC: Absorption = Absorption { label: "SC", f: 0.85, ka_factor: 0.7 };

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RoutePeak {
    pub route: &'static str,
    pub cmax: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteComparison {
    pub profile: Profile,
    pub peaks: Vec<RoutePeak>,
    pub half_life_h: f64,
}

/// IV bolus, IV infusion (`R = D/T`) and oral/IM/SC absorption curves.
pub fn compare_routes(
    p: &OneCompartment,
    infusion_h: f64,
    duration_h: f64,
    points: usize,
) -> RouteComparison {
    let t = linspace(0.0, duration_h, points);
    let rate = p.dose / infusion_h;
    let mut curves: Vec<(&'static str, Vec<f64>)> = vec![
        ("IV Bolus", t.iter().map(|&x| iv_bolus(x, p.dose, p.volume, p.k)).collect()),
        (
            "IV Infusion",
            t.iter()
                .map(|&x| iv_infusion(x, rate, p.volume, p.k, infusion_h))
                .collect(),
        ),
    ];
    for route in [ORAL, IM, SC] {
        let ka = p.ka * route.ka_factor;
        let curve = t
            .iter()
            .map(|&x| first_order_absorption(x, p.dose, p.volume, ka, p.k, route.f))
            .collect();
        curves.push((route.label, curve));
    }

    let peaks = curves
        .iter()
        .map(|(route, y)| RoutePeak {
            route: *route,
            cmax: max(y),
        })
        .collect();
    let mut profile = Profile::new("Route Comparison", "Time (hours)", t);
    for (label, y) in curves {
        profile.push(label, y);
    }
    RouteComparison {
        profile,
        peaks,
        half_life_h: half_life(p.k),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PkCase {
    Morphine,
    Lidocaine,
}

/// Which curves a case-study chart shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CaseView {
    #[default]
    AllRoutes,
    /// Morphine: IV routes and oral. Lidocaine: IV formulations only.
    Intravenous,
    /// Morphine: IV bolus and IM. Lidocaine: SC only.
    Parenteral,
}

impl FromStr for PkCase {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "morphine" => Ok(PkCase::Morphine),
            "lidocaine" => Ok(PkCase::Lidocaine),
            _ => Err(Error::unknown("pharmacokinetic case", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CaseMetrics {
    pub cmax_iv_bolus: f64,
    /// Grid fraction with the bolus curve above 20% of its peak, scaled to 24 h.
    pub time_above_mec_h: f64,
    pub terminal_half_life_h: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CaseStudy {
    pub profile: Profile,
    pub metrics: CaseMetrics,
}

impl PkCase {
    pub fn volume(&self) -> f64 {
        match self {
            PkCase::Morphine => 70.0,
            PkCase::Lidocaine => 40.0,
        }
    }

    pub fn k(&self) -> f64 {
        match self {
            PkCase::Morphine => 0.35,
            PkCase::Lidocaine => 0.45,
        }
    }

    pub fn duration_h(&self) -> f64 {
        match self {
            PkCase::Morphine => 12.0,
            PkCase::Lidocaine => 8.0,
        }
    }

    pub fn default_dose(&self) -> f64 {
        match self {
            PkCase::Morphine => 10.0,
            PkCase::Lidocaine => 100.0,
        }
    }

    pub fn simulate(&self, dose: f64, view: CaseView, points: usize) -> CaseStudy {
        let (v, k) = (self.volume(), self.k());
        let t = linspace(0.0, self.duration_h(), points);
        let curve = |f: &dyn Fn(f64) -> f64| -> Vec<f64> { t.iter().map(|&x| f(x)).collect() };

        let bolus = curve(&|x| iv_bolus(x, dose, v, k));
        let mut curves: Vec<(&str, Vec<f64>)> = Vec::new();
        match self {
            PkCase::Morphine => {
                let infusion = curve(&|x| iv_infusion(x, dose / 1.0, v, k, 1.0));
                let oral = curve(&|x| first_order_absorption(x, dose, v, 1.2, k, 0.3));
                let im = curve(&|x| first_order_absorption(x, dose, v, 1.5, k, 0.9));
                match view {
                    CaseView::AllRoutes => {
                        curves.push(("IV Bolus", bolus.clone()));
                        curves.push(("IV Infusion (1hr)", infusion));
                        curves.push(("Oral", oral));
                        curves.push(("IM", im));
                    }
                    CaseView::Intravenous => {
                        curves.push(("IV Bolus", bolus.clone()));
                        curves.push(("IV Infusion (1hr)", infusion));
                        curves.push(("Oral", oral));
                    }
                    CaseView::Parenteral => {
                        curves.push(("IV Bolus", bolus.clone()));
                        curves.push(("IM", im));
                    }
                }
            }
            PkCase::Lidocaine => {
                let infusion = curve(&|x| iv_infusion(x, dose / 0.5, v, k, 0.5));
                let sc = curve(&|x| first_order_absorption(x, dose, v, 0.8, k, 0.95));
                match view {
                    CaseView::AllRoutes => {
                        curves.push(("IV Bolus", bolus.clone()));
                        curves.push(("IV Infusion (30min)", infusion));
                        curves.push(("SC", sc));
                    }
                    CaseView::Intravenous => {
                        curves.push(("IV Bolus", bolus.clone()));
                        curves.push(("IV Infusion (30min)", infusion));
                    }
                    CaseView::Parenteral => curves.push(("SC", sc)),
                }
            }
        }

        let name = match self {
            PkCase::Morphine => "Morphine",
            PkCase::Lidocaine => "Lidocaine",
        };
        let mut profile = Profile::new(
            format!("{name} Concentration Profiles ({dose}mg dose)"),
            "Time (hours)",
            t.clone(),
        );
        for (label, y) in curves {
            profile.push(label, y);
        }

        let cmax = max(&bolus);
        let above = bolus.iter().filter(|&&c| c > cmax * 0.2).count();
        CaseStudy {
            profile,
            metrics: CaseMetrics {
                cmax_iv_bolus: cmax,
                time_above_mec_h: above as f64 / t.len() as f64 * 24.0,
                terminal_half_life_h: half_life(k),
            },
        }
    }
}

/// Validates an extravascular route's inputs.
pub fn validate_absorption(ka: f64, ke: f64, f: f64) -> Result<(), Error> {
    require_positive("ka", ka)?;
    require_positive("ke", ke)?;
    require_fraction("F", f)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn biexponential(m: &TwoCompartment, t: f64) -> f64 {
        let a = m.k12 + m.k21 + m.k10;
        let disc = (a * a - 4.0 * m.k21 * m.k10).sqrt();
        let alpha = 0.5 * (a + disc);
        let beta = 0.5 * (a - disc);
        let c0 = m.dose / m.v1;
        c0 * ((alpha - m.k21) * (-alpha * t).exp() + (m.k21 - beta) * (-beta * t).exp())
            / (alpha - beta)
    }

    #[test]
    fn bolus_starts_at_dose_over_volume_and_decays() {
        let t = linspace(0.0, 24.0, 100);
        let c: Vec<f64> = t.iter().map(|&x| iv_bolus(x, 500.0, 50.0, 0.5)).collect();
        assert_eq!(c[0], 10.0);
        assert!(c.windows(2).all(|w| w[1] < w[0]));
    }

    #[test]
    fn infusion_is_continuous_at_stop_time() {
        let before = iv_infusion(1.0, 500.0, 50.0, 0.5, 1.0);
        let after = iv_infusion(1.0 + 1e-9, 500.0, 50.0, 0.5, 1.0);
        assert!((before - after).abs() < 1e-6);
        assert_eq!(iv_infusion(0.0, 500.0, 50.0, 0.5, 1.0), 0.0);
    }

    #[test]
    fn absorption_curve_rises_then_falls() {
        let t = linspace(0.0, 24.0, 200);
        let c: Vec<f64> = t
            .iter()
            .map(|&x| first_order_absorption(x, 500.0, 50.0, 1.0, 0.5, 0.8))
            .collect();
        assert_eq!(c[0], 0.0);
        let peak = super::super::grid::argmax(&c).unwrap();
        // tmax = ln(ka/ke)/(ka-ke) = 1.386 h
        assert!((t[peak] - 1.386).abs() < 0.15);
    }

    #[test]
    fn rk4_matches_biexponential_solution() {
        let m = TwoCompartment::default();
        let t = linspace(0.0, 24.0, 100);
        let (central, _) = m.solve(&t);
        assert_eq!(central[0], m.dose / m.v1);
        for (i, &x) in t.iter().enumerate() {
            assert!((central[i] - biexponential(&m, x)).abs() < 1e-7, "t = {x}");
        }
    }

    #[test]
    fn mass_balance_without_elimination() {
        let m = TwoCompartment {
            k10: 1e-12,
            ..Default::default()
        };
        let (c, p) = m.solve(&[0.0, 5.0, 50.0]);
        let c0 = m.dose / m.v1;
        assert!((c[2] + p[2] - c0).abs() < 1e-6);
        // At equilibrium k12·C = k21·P.
        assert!((m.k12 * c[2] - m.k21 * p[2]).abs() < 1e-6);
    }

    #[test]
    fn distribution_half_life_uses_summed_rates() {
        let m = TwoCompartment::default();
        assert!((m.alpha() - 1.2).abs() < 1e-12);
        assert!((m.distribution_half_life() - 0.577_622_65).abs() < 1e-6);
    }

    #[test]
    fn route_peaks_order() {
        let cmp = compare_routes(&OneCompartment::default(), 1.0, 24.0, 200);
        assert_eq!(cmp.peaks.len(), 5);
        assert_eq!(cmp.peaks[0].route, "IV Bolus");
        assert_eq!(cmp.peaks[0].cmax, 10.0);
        assert!(cmp.peaks.iter().skip(1).all(|p| p.cmax < 10.0));
        assert!((cmp.half_life_h - 1.386_294_36).abs() < 1e-6);
    }

    #[test]
    fn morphine_case_metrics() {
        let study = PkCase::Morphine.simulate(10.0, CaseView::AllRoutes, 200);
        assert_eq!(study.profile.series.len(), 4);
        assert!((study.metrics.cmax_iv_bolus - 10.0 / 70.0).abs() < 1e-12);
        // C > 0.2·Cmax while t < ln 5 / 0.35 = 4.6 h of a 12 h grid.
        let expected = (4.598_f64 / 12.0 * 199.0).floor() + 1.0;
        assert!((study.metrics.time_above_mec_h - expected / 200.0 * 24.0).abs() < 0.25);
        let sc_only = PkCase::Lidocaine.simulate(100.0, CaseView::Parenteral, 200);
        assert_eq!(sc_only.profile.series.len(), 1);
        assert_eq!(sc_only.profile.series[0].label, "SC");
    }

    #[test]
    fn equal_rate_constants_are_rejected() {
        let p = OneCompartment {
            k: 1.0,
            ka: 1.0,
            ..Default::default()
        };
        assert!(p.validate().is_err());
        assert!(validate_absorption(1.0, 0.5, 1.2).is_err());
    }
}
