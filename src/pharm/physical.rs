//! Physical pharmacy: solubility, surfaces, buffers, rheology and stability.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use super::error::{Error, require_positive};
use super::grid::{linspace, logspace};
use super::series::Profile;

/// Gas constant in J/(mol·K).
pub const GAS_CONSTANT: f64 = 8.314;
/// Reference temperature (K) for van't Hoff solubility.
pub const REFERENCE_TEMPERATURE_K: f64 = 298.0;

/// van't Hoff solubility at `temp_c` given the heat of solution in J/mol.
pub fn solubility(temp_c: f64, heat_j_mol: f64, ref_solubility: f64) -> f64 {
    let t = temp_c + 273.15;
    ref_solubility * ((heat_j_mol / GAS_CONSTANT) * (1.0 / REFERENCE_TEMPERATURE_K - 1.0 / t)).exp()
}

/// Solubility over 0-100 °C; heat of solution in kJ/mol.
pub fn solubility_curve(heat_kj_mol: f64, ref_solubility: f64, points: usize) -> Profile {
    let x = linspace(0.0, 100.0, points);
    let y = x
        .iter()
        .map(|&t| solubility(t, heat_kj_mol * 1000.0, ref_solubility))
        .collect();
    Profile::new("Temperature-Dependent Solubility", "Temperature (°C)", x)
        .with("Solubility (mg/mL)", y)
}

pub fn surface_tension(conc: f64, gamma0: f64, k: f64) -> f64 {
    gamma0 - k * (1.0 + conc).ln()
}

pub fn surface_tension_curve(gamma0: f64, k: f64, points: usize) -> Profile {
    let x = logspace(-3.0, 1.0, points);
    let y = x.iter().map(|&c| surface_tension(c, gamma0, k)).collect();
    Profile::new("Surface Tension vs Surfactant Concentration", "Concentration (mM)", x)
        .with("Surface Tension (mN/m)", y)
}

/// Buffer capacity β; peaks where pH = pKa.
pub fn buffer_capacity(ka: f64, conc: f64, ph: f64) -> f64 {
    let h = 10f64.powf(-ph);
    2.303 * ka * h * conc / (ka + h).powi(2)
}

/// β over pKa ± 2.
pub fn buffer_curve(pka: f64, conc: f64, points: usize) -> Profile {
    let ka = 10f64.powf(-pka);
    let x = linspace(pka - 2.0, pka + 2.0, points);
    let y = x.iter().map(|&ph| buffer_capacity(ka, conc, ph)).collect();
    Profile::new("Buffer Capacity vs pH", "pH", x).with("Buffer Capacity (β)", y)
}

/// Power-law apparent viscosity `K γ̇^(n-1)`.
pub fn power_law_viscosity(shear_rate: f64, k: f64, n: f64) -> f64 {
    k * shear_rate.powf(n - 1.0)
}

/// Viscosity and shear stress over shear rates 0.1-1000 s⁻¹.
pub fn rheology_curve(k: f64, n: f64, points: usize) -> Profile {
    let x = logspace(-1.0, 3.0, points);
    let viscosity: Vec<f64> = x.iter().map(|&g| power_law_viscosity(g, k, n)).collect();
    let stress = viscosity.iter().zip(&x).map(|(v, g)| v * g).collect();
    Profile::new("Power-Law Rheology", "Shear Rate (1/s)", x)
        .with("Viscosity", viscosity)
        .with("Shear Stress", stress)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ReactionOrder {
    Zero,
    First,
    Second,
}

impl ReactionOrder {
    pub fn concentration(&self, t: f64, k: f64, c0: f64) -> f64 {
        match self {
            ReactionOrder::Zero => c0 - k * t,
            ReactionOrder::First => c0 * (-k * t).exp(),
            ReactionOrder::Second => 1.0 / (1.0 / c0 + k * t),
        }
    }

    /// Time to 90% potency.
    ///
    /// The second-order form measures from an absolute concentration of 0.9.
    pub fn t90(&self, k: f64, c0: f64) -> f64 {
        match self {
            ReactionOrder::Zero => 0.1 * c0 / k,
            ReactionOrder::First => -(0.9f64).ln() / k,
            ReactionOrder::Second => (1.0 / 0.9 - 1.0 / c0) / k,
        }
    }

    pub fn t50(&self, k: f64, c0: f64) -> f64 {
        match self {
            ReactionOrder::Zero => 0.5 * c0 / k,
            ReactionOrder::First => -(0.5f64).ln() / k,
            ReactionOrder::Second => (1.0 / 0.5 - 1.0 / c0) / k,
        }
    }
}

impl fmt::Display for ReactionOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let n = match self {
            ReactionOrder::Zero => 0,
            ReactionOrder::First => 1,
            ReactionOrder::Second => 2,
        };
        write!(f, "{n}")
    }
}

impl FromStr for ReactionOrder {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "0" | "zero" => Ok(ReactionOrder::Zero),
            "1" | "first" => Ok(ReactionOrder::First),
            "2" | "second" => Ok(ReactionOrder::Second),
            _ => Err(Error::unknown("reaction order", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StabilityMetrics {
    pub t90: f64,
    pub t50: f64,
    pub k: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StabilityStudy {
    pub profile: Profile,
    pub metrics: StabilityMetrics,
}

pub fn validate_stability(k: f64, c0: f64) -> Result<(), Error> {
    require_positive("k", k)?;
    require_positive("c0", c0)
}

/// Degradation over 0-100 time units with t90/t50 markers.
pub fn stability(order: ReactionOrder, k: f64, c0: f64, points: usize) -> StabilityStudy {
    let x = linspace(0.0, 100.0, points);
    let y = x.iter().map(|&t| order.concentration(t, k, c0)).collect();
    StabilityStudy {
        profile: Profile::new(format!("Drug Degradation ({order} Order Kinetics)"), "Time", x)
            .with("Concentration (mg/mL)", y),
        metrics: StabilityMetrics {
            t90: order.t90(k, c0),
            t50: order.t50(k, c0),
            k,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pharm::grid::argmax;

    #[test]
    fn solubility_at_reference_temperature() {
        let s = solubility(REFERENCE_TEMPERATURE_K - 273.15, 20_000.0, 10.0);
        assert!((s - 10.0).abs() < 1e-9);
        // Endothermic dissolution: hotter dissolves more.
        assert!(solubility(60.0, 20_000.0, 10.0) > 10.0);
        assert!(solubility(60.0, -20_000.0, 10.0) < 10.0);
    }

    #[test]
    fn surface_tension_falls_with_surfactant() {
        assert_eq!(surface_tension(0.0, 72.0, 10.0), 72.0);
        let p = surface_tension_curve(72.0, 10.0, 100);
        let y = p.get("Surface Tension (mN/m)").unwrap();
        assert!(y.windows(2).all(|w| w[1] < w[0]));
    }

    #[test]
    fn buffer_capacity_peaks_at_pka() {
        let p = buffer_curve(7.0, 0.1, 101);
        let beta = p.get("Buffer Capacity (β)").unwrap();
        assert_eq!(argmax(beta), Some(50));
        assert!((beta[50] - 2.303 * 0.1 / 4.0).abs() < 1e-12);
    }

    #[test]
    fn buffer_capacity_falls_away_from_pka() {
        let p = buffer_curve(4.76, 0.05, 101);
        let beta = p.get("Buffer Capacity (β)").unwrap();
        assert!(beta[..=50].windows(2).all(|w| w[1] > w[0]));
        assert!(beta[50..].windows(2).all(|w| w[1] < w[0]));
    }

    #[test]
    fn newtonian_fluid_has_constant_viscosity() {
        let p = rheology_curve(2.0, 1.0, 10);
        assert!(p.get("Viscosity").unwrap().iter().all(|&v| v == 2.0));
        assert!(power_law_viscosity(10.0, 1.0, 0.5) < 1.0);
    }

    #[test]
    fn degradation_orders() {
        let first = ReactionOrder::First;
        assert!((first.concentration(first.t50(0.01, 50.0), 0.01, 50.0) - 25.0).abs() < 1e-9);
        assert!((ReactionOrder::Zero.t90(0.01, 50.0) - 500.0).abs() < 1e-9);
        let second = ReactionOrder::Second;
        assert!((second.t50(0.01, 50.0) - 198.0).abs() < 1e-9);
        assert_eq!("2".parse::<ReactionOrder>().unwrap(), second);
        assert!("3".parse::<ReactionOrder>().is_err());
    }

    #[test]
    fn stability_study_reports_rate() {
        let s = stability(ReactionOrder::First, 0.01, 50.0, 100);
        assert_eq!(s.metrics.k, 0.01);
        assert_eq!(s.profile.get("Concentration (mg/mL)").unwrap()[0], 50.0);
        assert!(validate_stability(0.0, 50.0).is_err());
    }
}
