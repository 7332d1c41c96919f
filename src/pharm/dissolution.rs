//! First-order dissolution with a zero-order reference line.

use serde::Serialize;
use tracing::debug;

use super::error::{Error, require_positive};
use super::grid::{linspace, max};
use super::series::Profile;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DissolutionParams {
    /// First-order rate constant (1/h).
    pub k: f64,
    /// Drug load (mg).
    pub dose_mg: f64,
    /// Medium volume (mL).
    pub volume_ml: f64,
}

impl Default for DissolutionParams {
    fn default() -> Self {
        Self {
            k: 0.1,
            dose_mg: 100.0,
            volume_ml: 500.0,
        }
    }
}

impl DissolutionParams {
    /// Replaces `k` with the rate constant implied by a half-life.
    pub fn with_half_life(self, half_life_h: f64) -> Self {
        Self {
            k: rate_from_half_life(half_life_h),
            ..self
        }
    }

    pub fn validate(&self) -> Result<(), Error> {
        require_positive("k", self.k)?;
        require_positive("dose_mg", self.dose_mg)?;
        require_positive("volume_ml", self.volume_ml)
    }
}

/// `ln 2 / t½`.
pub fn rate_from_half_life(half_life: f64) -> f64 {
    std::f64::consts::LN_2 / half_life
}

/// Amount released by time `t`: `M0 (1 − e^{−kt})`.
pub fn first_order_released(dose: f64, k: f64, t: f64) -> f64 {
    dose * (1.0 - (-k * t).exp())
}

/// Straight line reaching the full dose at `t_max`.
pub fn zero_order_reference(dose: f64, t_max: f64, t: f64) -> f64 {
    dose / t_max * t
}

/// Time to release 50% of the dose.
pub fn t50(k: f64) -> f64 {
    -(0.5f64).ln() / k
}

/// Time to release 90% of the dose.
pub fn t90(k: f64) -> f64 {
    -(0.1f64).ln() / k
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DissolutionMetrics {
    pub t50_h: f64,
    pub t90_h: f64,
    /// `k · M0` (mg/h).
    pub initial_rate: f64,
}

pub fn metrics(p: &DissolutionParams) -> DissolutionMetrics {
    DissolutionMetrics {
        t50_h: t50(p.k),
        t90_h: t90(p.k),
        initial_rate: p.k * p.dose_mg,
    }
}

fn profile_on(p: &DissolutionParams, title: &str, time: Vec<f64>, zero_order: bool) -> Profile {
    let released: Vec<f64> = time
        .iter()
        .map(|&t| first_order_released(p.dose_mg, p.k, t))
        .collect();
    let percent = released.iter().map(|m| m / p.dose_mg * 100.0).collect();
    let conc = released.iter().map(|m| m / p.volume_ml).collect();

    let mut profile = Profile::new(title, "Time (hours)", time);
    profile.push("Drug Released (mg)", released);
    if zero_order {
        let t_max = max(&profile.x);
        let reference = profile
            .x
            .iter()
            .map(|&t| zero_order_reference(p.dose_mg, t_max, t))
            .collect();
        profile.push("Zero-Order Release (mg)", reference);
    }
    profile.push("Percent Released (%)", percent);
    profile.push("Concentration (mg/mL)", conc);
    profile
}

/// Release curves over `[0, duration_h]` sampled at `points`.
pub fn profile(p: &DissolutionParams, duration_h: f64, points: usize) -> Profile {
    debug!(k = p.k, dose = p.dose_mg, "evaluating dissolution profile");
    profile_on(
        p,
        "Drug Dissolution Profile",
        linspace(0.0, duration_h, points),
        true,
    )
}

/// Tabulated release at fixed steps, `0, step, ..., duration_h`.
pub fn table(p: &DissolutionParams, duration_h: f64, step_h: f64) -> Profile {
    let rows = (duration_h / step_h).round() as usize + 1;
    profile_on(
        p,
        "Dissolution Data",
        linspace(0.0, duration_h, rows),
        false,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn release_approaches_dose() {
        let p = DissolutionParams::default();
        assert_eq!(first_order_released(p.dose_mg, p.k, 0.0), 0.0);
        let late = first_order_released(p.dose_mg, p.k, 200.0);
        assert!((late - p.dose_mg).abs() < 1e-6);
    }

    #[test]
    fn half_life_round_trips_through_t50() {
        let p = DissolutionParams::default().with_half_life(2.0);
        assert!((t50(p.k) - 2.0).abs() < 1e-12);
        assert!((first_order_released(100.0, p.k, 2.0) - 50.0).abs() < 1e-9);
        assert!(t90(p.k) > t50(p.k));
    }

    #[test]
    fn metrics_for_defaults() {
        let m = metrics(&DissolutionParams::default());
        assert!((m.t50_h - 6.931_471_8).abs() < 1e-6);
        assert!((m.t90_h - 23.025_850_9).abs() < 1e-6);
        assert!((m.initial_rate - 10.0).abs() < 1e-12);
    }

    #[test]
    fn table_has_two_hour_rows() {
        let t = table(&DissolutionParams::default(), 24.0, 2.0);
        assert_eq!(t.len(), 13);
        assert_eq!(t.x[1], 2.0);
        assert!(t.get("Zero-Order Release (mg)").is_none());
        let pct = t.get("Percent Released (%)").unwrap();
        assert!(pct.windows(2).all(|w| w[1] > w[0]));
    }

    #[test]
    fn zero_order_line_ends_at_dose() {
        let p = DissolutionParams::default();
        let prof = profile(&p, 24.0, 100);
        let zero = prof.get("Zero-Order Release (mg)").unwrap();
        assert!((zero[99] - p.dose_mg).abs() < 1e-12);
        let conc = prof.get("Concentration (mg/mL)").unwrap();
        let mg = prof.get("Drug Released (mg)").unwrap();
        assert!((conc[50] * p.volume_ml - mg[50]).abs() < 1e-12);
    }

    #[test]
    fn validation_rejects_non_positive_volume() {
        let p = DissolutionParams {
            volume_ml: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            p.validate(),
            Err(Error::InvalidParameter { name: "volume_ml", .. })
        ));
    }
}
