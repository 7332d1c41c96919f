//! Diffusion (Fick's laws) and controlled-release kinetics.

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand_distr::{Distribution, Normal};
use serde::Serialize;

use super::error::{Error, require_fraction, require_positive};
use super::grid::{gradient, linspace};
use super::series::Profile;

/// Fick's first law flux `J = -D (C2 - C1) / dx`.
pub fn fick_flux(c1: f64, c2: f64, d: f64, dx: f64) -> f64 {
    -d * (c2 - c1) / dx
}

/// Linear concentration gradient across a membrane of thickness `dx` (µm),
/// paired with the constant flux it drives.
pub fn gradient_profile(c1: f64, c2: f64, d: f64, dx_um: f64, points: usize) -> Profile {
    let x = linspace(0.0, dx_um, points);
    let conc = x.iter().map(|&xi| c1 + (c2 - c1) * xi / dx_um).collect();
    let flux = vec![fick_flux(c1, c2, d, dx_um * 1e-6); x.len()];
    Profile::new("Fick's First Law", "Distance (µm)", x)
        .with("Concentration (mg/mL)", conc)
        .with("Flux", flux)
}

/// Explicit finite-difference grid for Fick's second law in one dimension.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DiffusionGrid {
    pub nodes: usize,
    pub dx: f64,
    pub dt: f64,
}

impl Default for DiffusionGrid {
    fn default() -> Self {
        Self {
            nodes: 100,
            dx: 1.0,
            dt: 0.1,
        }
    }
}

impl DiffusionGrid {
    /// Rejects grids where the explicit scheme cannot run or would diverge
    /// for coefficient `d`.
    pub fn validate(&self, d: f64) -> Result<(), Error> {
        if self.nodes < 3 {
            return Err(Error::invalid(
                "nodes",
                self.nodes as f64,
                "at least three nodes are needed",
            ));
        }
        require_positive("dx", self.dx)?;
        require_positive("dt", self.dt)?;
        require_positive("D", d)?;
        let r = d * self.dt / (self.dx * self.dx);
        if r > 0.5 {
            return Err(Error::invalid(
                "D",
                d,
                format!("explicit scheme is unstable (D·dt/dx² = {r:.3} > 0.5)"),
            ));
        }
        Ok(())
    }
}

/// Concentration along the grid after `steps` explicit updates.
///
/// Node 0 is a source held at 1.0; both ends are fixed.
pub fn simulate_diffusion(grid: &DiffusionGrid, d: f64, steps: usize) -> Vec<f64> {
    let n = grid.nodes;
    let mut c = vec![0.0; n];
    if n == 0 {
        return c;
    }
    c[0] = 1.0;
    let r = d * grid.dt / (grid.dx * grid.dx);
    let mut next = c.clone();
    for _ in 0..steps {
        for i in 1..n.saturating_sub(1) {
            next[i] = c[i] + r * (c[i + 1] - 2.0 * c[i] + c[i - 1]);
        }
        std::mem::swap(&mut c, &mut next);
    }
    c
}

pub fn diffusion_profile(grid: &DiffusionGrid, d: f64, steps: usize) -> Profile {
    let x = (0..grid.nodes).map(|i| i as f64).collect();
    Profile::new("Concentration Profile", "Distance", x)
        .with("Concentration", simulate_diffusion(grid, d, steps))
}

/// Higuchi matrix release `A √(2 Cs D t / h)`.
pub fn higuchi(t: f64, d: f64, cs: f64, area: f64, h: f64) -> f64 {
    area * (2.0 * cs * d * t / h).sqrt()
}

pub fn first_order(t: f64, k: f64, m0: f64) -> f64 {
    m0 * (1.0 - (-k * t).exp())
}

/// Zero-order release capped at the total load.
pub fn zero_order(t: f64, k: f64, m0: f64) -> f64 {
    (k * t).min(m0)
}

pub fn korsmeyer_peppas(t: f64, k: f64, n: f64, m0: f64) -> f64 {
    m0 * (k * t).powf(n)
}

/// Two parallel first-order phases sharing the load by `fraction`.
pub fn biphasic(t: f64, k1: f64, k2: f64, m0: f64, fraction: f64) -> f64 {
    fraction * m0 * (1.0 - (-k1 * t).exp()) + (1.0 - fraction) * m0 * (1.0 - (-k2 * t).exp())
}

pub fn surface_erosion(t: f64, k: f64, m0: f64) -> f64 {
    m0 * (1.0 - (1.0 - k * t).powi(2))
}

/// Which release mechanisms to include in [`compare_systems`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReleaseSystem {
    #[default]
    All,
    Matrix,
    FirstOrder,
    ZeroOrder,
}

/// Matrix (Higuchi, scaled to the load), first-order (k = 0.15) and
/// zero-order (load over 24 h) release over 0-24 h.
pub fn compare_systems(load_mg: f64, system: ReleaseSystem, points: usize) -> Profile {
    let t = linspace(0.0, 24.0, points);
    let mut profile = Profile::new("Drug Release Profiles", "Time (hours)", t.clone());
    if matches!(system, ReleaseSystem::All | ReleaseSystem::Matrix) {
        let raw: Vec<f64> = t.iter().map(|&ti| higuchi(ti, 1e-6, 1.0, 1.0, 1e-3)).collect();
        let peak = raw.iter().copied().fold(0.0, f64::max);
        let scaled = raw.iter().map(|m| m / peak * load_mg).collect();
        profile.push("Matrix (Higuchi)", scaled);
    }
    if matches!(system, ReleaseSystem::All | ReleaseSystem::FirstOrder) {
        profile.push(
            "First-Order",
            t.iter().map(|&ti| first_order(ti, 0.15, load_mg)).collect(),
        );
    }
    if matches!(system, ReleaseSystem::All | ReleaseSystem::ZeroOrder) {
        profile.push(
            "Zero-Order",
            t.iter().map(|&ti| zero_order(ti, load_mg / 24.0, load_mg)).collect(),
        );
    }
    profile
}

/// HPMC matrix tablet: 70% diffusion plus 30% erosion, with release rate.
pub fn hpmc_matrix(load_mg: f64, viscosity_grade: f64, ph: f64, points: usize) -> Profile {
    let t = linspace(0.0, 12.0, points);
    let k_diff = 0.3 / viscosity_grade;
    let k_eros = 0.1 * (7.4 / ph);
    let total: Vec<f64> = t
        .iter()
        .map(|&ti| 0.7 * first_order(ti, k_diff, load_mg) + 0.3 * surface_erosion(ti, k_eros, load_mg))
        .collect();
    let rate = gradient(&total, &t);
    Profile::new("Extended Release Tablet (HPMC Matrix)", "Time (hours)", t)
        .with("Total Release (mg)", total)
        .with("Release Rate (mg/h)", rate)
}

/// Membrane-controlled reservoir patch over 72 h; thickness in µm.
pub fn transdermal_patch(reservoir_mg_ml: f64, thickness_um: f64, d: f64, points: usize) -> Profile {
    let t = linspace(0.0, 72.0, points);
    let flux = d * reservoir_mg_ml / (thickness_um * 1e-4);
    let cumulative = t.iter().map(|ti| flux * ti).collect();
    Profile::new("Transdermal Patch (Reservoir)", "Time (hours)", t.clone())
        .with("Flux (µg/cm²/hr)", vec![flux; t.len()])
        .with("Cumulative Amount (µg/cm²)", cumulative)
}

/// PLGA microspheres over 30 days; burst scales with loading (%).
pub fn plga_microspheres(lactide_ratio: f64, loading_pct: f64, points: usize) -> Profile {
    let t = linspace(0.0, 30.0, points);
    let k2 = 0.05 * (75.0 / lactide_ratio);
    let burst = 0.3 * (loading_pct / 10.0);
    let release = t.iter().map(|&ti| biphasic(ti, 0.5, k2, 100.0, burst)).collect();
    Profile::new("PLGA Microsphere Release Profile", "Time (days)", t)
        .with("Cumulative Release (%)", release)
}

/// Osmotic pump release with rate `0.1·π·perm·(orifice/500)`.
///
/// With a seed, Gaussian noise (σ 0.5) is added and the result clipped to
/// 0-100; without one the curve is the ideal zero-order line.
pub fn osmotic_pump(
    pressure_atm: f64,
    orifice_um: f64,
    permeability: f64,
    noise_seed: Option<u64>,
    points: usize,
) -> Result<Profile, Error> {
    let t = linspace(0.0, 24.0, points);
    let k = 0.1 * pressure_atm * permeability * (orifice_um / 500.0);
    let mut release: Vec<f64> = t.iter().map(|&ti| zero_order(ti, k, 100.0)).collect();
    if let Some(seed) = noise_seed {
        let noise = Normal::new(0.0, 0.5).map_err(|e| Error::invalid("noise", 0.5, e.to_string()))?;
        let mut rng = StdRng::seed_from_u64(seed);
        for r in &mut release {
            *r = (*r + noise.sample(&mut rng)).clamp(0.0, 100.0);
        }
    }
    let rate = gradient(&release, &t);
    Ok(Profile::new("Osmotic Pump Tablet", "Time (hours)", t)
        .with("Cumulative Release (%)", release)
        .with("Release Rate (%/h)", rate))
}

/// Hydrogel Korsmeyer-Peppas release alongside swelling.
pub fn hydrogel(crosslink_pct: f64, temperature_c: f64, ph: f64, points: usize) -> Profile {
    let t = linspace(0.0, 12.0, points);
    let n = 0.5 + 0.1 * (10.0 - crosslink_pct);
    let k = 0.3 * (temperature_c / 37.0) * (ph / 7.4);
    let release = t.iter().map(|&ti| korsmeyer_peppas(ti, k, n, 100.0)).collect();
    let swelling = t.iter().map(|&ti| 100.0 * (1.0 - (-0.2 * ti).exp())).collect();
    Profile::new("Hydrogel Drug Delivery", "Time (hours)", t)
        .with("Drug Release (%)", release)
        .with("Swelling (%)", swelling)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BiphasicMetrics {
    pub release_1h: f64,
    pub release_12h: f64,
    pub release_24h: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BiphasicCase {
    pub profile: Profile,
    pub metrics: BiphasicMetrics,
}

pub fn validate_biphasic(fraction: f64, k1: f64, k2: f64) -> Result<(), Error> {
    require_fraction("fraction", fraction)?;
    require_positive("k1", k1)?;
    require_positive("k2", k2)
}

/// Biphasic delivery over 24 h, split into its two phases.
///
/// Metrics are read from the grid samples nearest 1, 12 and 24 h.
pub fn biphasic_delivery(fraction: f64, k1: f64, k2: f64, points: usize) -> BiphasicCase {
    let t = linspace(0.0, 24.0, points);
    let phase1 = t.iter().map(|&ti| fraction * 100.0 * (1.0 - (-k1 * ti).exp())).collect();
    let phase2 = t
        .iter()
        .map(|&ti| (1.0 - fraction) * 100.0 * (1.0 - (-k2 * ti).exp()))
        .collect();
    let total: Vec<f64> = t.iter().map(|&ti| biphasic(ti, k1, k2, 100.0, fraction)).collect();
    let at = |hours: f64| -> f64 {
        if total.is_empty() {
            return f64::NAN;
        }
        let last = total.len() - 1;
        let i = (hours / 24.0 * last as f64).round() as usize;
        total[i.min(last)]
    };
    let metrics = BiphasicMetrics {
        release_1h: at(1.0),
        release_12h: at(12.0),
        release_24h: at(24.0),
    };
    BiphasicCase {
        profile: Profile::new("Biphasic Release Profile", "Time (hours)", t)
            .with("Initial Phase", phase1)
            .with("Secondary Phase", phase2)
            .with("Total Release", total),
        metrics,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flux_runs_down_the_gradient() {
        assert!(fick_flux(100.0, 0.0, 1e-5, 1e-5) > 0.0);
        assert_eq!(fick_flux(5.0, 5.0, 1e-5, 1e-5), 0.0);
    }

    #[test]
    fn diffusion_spreads_from_source() {
        let grid = DiffusionGrid::default();
        let c = simulate_diffusion(&grid, 0.5, 50);
        assert_eq!(c[0], 1.0);
        assert!(c[1] > c[2] && c[2] > c[3]);
        assert!(c.iter().all(|&v| (0.0..=1.0).contains(&v)));
        assert_eq!(c[99], 0.0);
    }

    #[test]
    fn zero_steps_leave_only_source() {
        let c = simulate_diffusion(&DiffusionGrid::default(), 0.5, 0);
        assert_eq!(c.iter().sum::<f64>(), 1.0);
    }

    #[test]
    fn unstable_grid_rejected() {
        let grid = DiffusionGrid { dt: 1.0, ..Default::default() };
        assert!(grid.validate(2.0).is_err());
        assert!(DiffusionGrid::default().validate(2.0).is_ok());
    }

    #[test]
    fn kinetic_models() {
        assert_eq!(zero_order(30.0, 2.0, 50.0), 50.0);
        assert_eq!(surface_erosion(1.0, 1.0, 80.0), 80.0);
        assert!((korsmeyer_peppas(4.0, 0.25, 0.5, 100.0) - 100.0).abs() < 1e-12);
        assert!((biphasic(1e6, 1.0, 0.1, 100.0, 0.4) - 100.0).abs() < 1e-9);
        assert!((higuchi(2.0, 1.0, 1.0, 1.0, 1.0) - 2.0).abs() < 1e-12);
    }

    #[test]
    fn higuchi_release_never_decreases() {
        let t = linspace(0.0, 48.0, 200);
        let released: Vec<f64> = t.iter().map(|&ti| higuchi(ti, 1e-6, 1.0, 1.0, 1e-3)).collect();
        assert_eq!(released[0], 0.0);
        assert!(released.iter().all(|&m| m >= 0.0));
        assert!(released.windows(2).all(|w| w[1] >= w[0]));
    }

    #[test]
    fn comparison_selects_systems() {
        let all = compare_systems(50.0, ReleaseSystem::All, 100);
        assert_eq!(all.series.len(), 3);
        let matrix = all.get("Matrix (Higuchi)").unwrap();
        assert!((matrix[99] - 50.0).abs() < 1e-9);
        let one = compare_systems(50.0, ReleaseSystem::ZeroOrder, 100);
        assert_eq!(one.series.len(), 1);
        assert!((one.get("Zero-Order").unwrap()[99] - 50.0).abs() < 1e-9);
    }

    #[test]
    fn osmotic_pump_clipped_and_seeded() {
        let a = osmotic_pump(20.0, 500.0, 5.0, Some(3), 100).unwrap();
        let b = osmotic_pump(20.0, 500.0, 5.0, Some(3), 100).unwrap();
        assert_eq!(a, b);
        let r = a.get("Cumulative Release (%)").unwrap();
        assert!(r.iter().all(|&v| (0.0..=100.0).contains(&v)));
        let ideal = osmotic_pump(20.0, 500.0, 5.0, None, 100).unwrap();
        assert!((ideal.get("Cumulative Release (%)").unwrap()[99] - 100.0).abs() < 1e-12);
    }

    #[test]
    fn biphasic_metrics_track_grid() {
        let case = biphasic_delivery(0.4, 1.0, 0.1, 100);
        let total = case.profile.get("Total Release").unwrap();
        assert_eq!(case.metrics.release_1h, total[4]);
        assert_eq!(case.metrics.release_12h, total[50]);
        assert_eq!(case.metrics.release_24h, total[99]);
        assert!(validate_biphasic(1.4, 1.0, 0.1).is_err());
    }

    #[test]
    fn hpmc_higher_viscosity_slows_release() {
        let low = hpmc_matrix(100.0, 1.0, 6.8, 100);
        let high = hpmc_matrix(100.0, 5.0, 6.8, 100);
        let at6 = |p: &Profile| p.get("Total Release (mg)").unwrap()[50];
        assert!(at6(&high) < at6(&low));
    }
}
