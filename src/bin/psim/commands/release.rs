use anyhow::Result;
use serde_json::json;

use pharmsim::pharm::release::{self, DiffusionGrid, ReleaseSystem};

use super::{Invocation, emit, fixed, require_non_negative, require_positive, require_range};
use crate::cli::{ReleaseCase, ReleaseCommand, ReleaseSystemArg};
use crate::display::{Report, fmt_num};

impl From<ReleaseSystemArg> for ReleaseSystem {
    fn from(arg: ReleaseSystemArg) -> Self {
        match arg {
            ReleaseSystemArg::All => ReleaseSystem::All,
            ReleaseSystemArg::Matrix => ReleaseSystem::Matrix,
            ReleaseSystemArg::FirstOrder => ReleaseSystem::FirstOrder,
            ReleaseSystemArg::ZeroOrder => ReleaseSystem::ZeroOrder,
        }
    }
}

pub fn run(command: ReleaseCommand, inv: &Invocation) -> Result<()> {
    let points = inv.points();
    let report = match command {
        ReleaseCommand::Fick {
            c1,
            c2,
            diffusivity,
            thickness,
        } => {
            require_non_negative("c1", c1)?;
            require_non_negative("c2", c2)?;
            require_positive("diffusivity", diffusivity)?;
            require_positive("thickness", thickness)?;
            let flux = release::fick_flux(c1, c2, diffusivity, thickness * 1e-6);
            let profile = release::gradient_profile(c1, c2, diffusivity, thickness, points);
            Report::new("Fick's First Law")
                .metrics(
                    "Membrane",
                    [
                        ("Gradient (mg/mL/μm)", fmt_num((c2 - c1) / thickness)),
                        ("Flux J", fmt_num(flux)),
                        ("Direction", direction(flux).to_string()),
                    ],
                )
                .data(&json!({ "flux": flux, "profile": &profile }))?
                .curve(profile)
        }

        ReleaseCommand::Diffusion { diffusivity, steps } => {
            let cfg = &inv.settings.diffusion;
            let grid = DiffusionGrid {
                nodes: cfg.nodes,
                dx: cfg.dx,
                dt: cfg.dt,
            };
            grid.validate(diffusivity)?;
            let profile = release::diffusion_profile(&grid, diffusivity, steps);
            let r = diffusivity * grid.dt / (grid.dx * grid.dx);
            Report::new("Fick's Second Law")
                .metrics(
                    "Grid",
                    [
                        ("Nodes", grid.nodes.to_string()),
                        ("Steps", steps.to_string()),
                        ("Elapsed time", fmt_num(steps as f64 * grid.dt)),
                        ("Mesh ratio D·dt/dx²", fixed(r, 3)),
                    ],
                )
                .data(&json!({ "grid": grid, "diffusivity": diffusivity, "steps": steps, "profile": &profile }))?
                .curve(profile)
        }

        ReleaseCommand::Compare { load, system } => {
            require_positive("load", load)?;
            let profile = release::compare_systems(load, system.into(), points);
            let finals: Vec<(String, String)> = profile
                .series
                .iter()
                .map(|s| {
                    let last = s.y.last().copied().unwrap_or(f64::NAN);
                    (format!("{} at 24 h (mg)", s.label), fixed(last, 1))
                })
                .collect();
            Report::new("Controlled Release Systems")
                .metrics("Released", finals)
                .data(&profile)?
                .curve(profile)
        }

        ReleaseCommand::Case { case } => run_case(case, points)?,
    };
    emit(&report, inv)
}

fn direction(flux: f64) -> &'static str {
    if flux > 0.0 {
        "donor → receiver"
    } else if flux < 0.0 {
        "receiver → donor"
    } else {
        "no net transport"
    }
}

fn run_case(case: ReleaseCase, points: usize) -> Result<Report> {
    let report = match case {
        ReleaseCase::Hpmc { load, viscosity, ph } => {
            require_positive("load", load)?;
            require_positive("viscosity", viscosity)?;
            require_range("ph", ph, 1.0, 14.0)?;
            let profile = release::hpmc_matrix(load, viscosity, ph, points);
            let released = last_of(&profile, "Total Release (mg)");
            Report::new("Extended Release Tablet (HPMC Matrix)")
                .metrics(
                    "After 12 h",
                    [
                        ("Released (mg)", fixed(released, 1)),
                        ("Released (% of load)", fixed(released / load * 100.0, 1)),
                    ],
                )
                .notes(
                    "Mechanism",
                    [
                        "70% of release is diffusion through the gel layer",
                        "30% follows matrix erosion, faster at low pH",
                    ],
                )
                .data(&profile)?
                .curve(profile)
        }

        ReleaseCase::Transdermal {
            reservoir,
            thickness,
            diffusivity,
        } => {
            require_positive("reservoir", reservoir)?;
            require_positive("thickness", thickness)?;
            require_positive("diffusivity", diffusivity)?;
            let profile = release::transdermal_patch(reservoir, thickness, diffusivity, points);
            Report::new("Transdermal Patch (Reservoir)")
                .metrics(
                    "Delivery",
                    [
                        ("Steady flux (μg/cm²/h)", fmt_num(last_of(&profile, "Flux (µg/cm²/hr)"))),
                        (
                            "Delivered at 72 h (μg/cm²)",
                            fmt_num(last_of(&profile, "Cumulative Amount (µg/cm²)")),
                        ),
                    ],
                )
                .data(&profile)?
                .curve(profile)
        }

        ReleaseCase::Plga { lactide, loading } => {
            require_range("lactide", lactide, 1.0, 100.0)?;
            require_range("loading", loading, 0.0, 100.0)?;
            let profile = release::plga_microspheres(lactide, loading, points);
            let burst = 0.3 * (loading / 10.0) * 100.0;
            Report::new("PLGA Microsphere Release")
                .metrics(
                    "Release",
                    [
                        ("Burst fraction (%)", fixed(burst, 1)),
                        ("Released at 30 d (%)", fixed(last_of(&profile, "Cumulative Release (%)"), 1)),
                    ],
                )
                .notes(
                    "Notes",
                    [
                        "Higher lactide content degrades more slowly",
                        "Higher loading increases the initial burst",
                    ],
                )
                .data(&profile)?
                .curve(profile)
        }

        ReleaseCase::Osmotic {
            pressure,
            orifice,
            permeability,
            noise,
        } => {
            require_positive("pressure", pressure)?;
            require_positive("orifice", orifice)?;
            require_positive("permeability", permeability)?;
            let profile = release::osmotic_pump(pressure, orifice, permeability, noise, points)?;
            let rate = 0.1 * pressure * permeability * (orifice / 500.0);
            Report::new("Osmotic Pump Tablet")
                .metrics(
                    "Delivery",
                    [
                        ("Zero-order rate (%/h)", fixed(rate, 2)),
                        ("Released at 24 h (%)", fixed(last_of(&profile, "Cumulative Release (%)"), 1)),
                        (
                            "Noise",
                            noise.map_or_else(|| "off".to_string(), |s| format!("seed {s}")),
                        ),
                    ],
                )
                .data(&profile)?
                .curve(profile)
        }

        ReleaseCase::Hydrogel {
            crosslink,
            temperature,
            ph,
        } => {
            require_range("crosslink", crosslink, 0.0, 100.0)?;
            require_positive("temperature", temperature)?;
            require_range("ph", ph, 1.0, 14.0)?;
            let profile = release::hydrogel(crosslink, temperature, ph, points);
            let n = 0.5 + 0.1 * (10.0 - crosslink);
            Report::new("Hydrogel Drug Delivery")
                .metrics(
                    "Release",
                    [
                        ("Release exponent n", fixed(n, 2)),
                        ("Mechanism", transport_label(n).to_string()),
                        ("Released at 12 h (%)", fixed(last_of(&profile, "Drug Release (%)"), 1)),
                    ],
                )
                .data(&profile)?
                .curve(profile)
        }

        ReleaseCase::Biphasic { fraction, k1, k2 } => {
            release::validate_biphasic(fraction, k1, k2)?;
            let case = release::biphasic_delivery(fraction, k1, k2, points);
            let m = case.metrics;
            Report::new("Biphasic Release")
                .metrics(
                    "Cumulative Release (%)",
                    [
                        ("At 1 h", fixed(m.release_1h, 1)),
                        ("At 12 h", fixed(m.release_12h, 1)),
                        ("At 24 h", fixed(m.release_24h, 1)),
                    ],
                )
                .data(&case)?
                .curve(case.profile)
        }
    };
    Ok(report)
}

/// Korsmeyer-Peppas exponent bands for a slab.
fn transport_label(n: f64) -> &'static str {
    if n <= 0.5 {
        "Fickian diffusion"
    } else if n < 1.0 {
        "Anomalous transport"
    } else {
        "Case II (relaxation)"
    }
}

fn last_of(profile: &pharmsim::pharm::Profile, label: &str) -> f64 {
    profile
        .get(label)
        .and_then(|y| y.last().copied())
        .unwrap_or(f64::NAN)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flux_direction_follows_sign() {
        assert_eq!(direction(1.0), "donor → receiver");
        assert_eq!(direction(-1.0), "receiver → donor");
        assert_eq!(direction(0.0), "no net transport");
    }

    #[test]
    fn transport_bands() {
        assert_eq!(transport_label(0.45), "Fickian diffusion");
        assert_eq!(transport_label(0.7), "Anomalous transport");
        assert_eq!(transport_label(1.2), "Case II (relaxation)");
    }

    #[test]
    fn last_of_missing_series_is_nan() {
        let profile = release::compare_systems(10.0, ReleaseSystem::ZeroOrder, 5);
        assert!((last_of(&profile, "Zero-Order") - 10.0).abs() < 1e-9);
        assert!(last_of(&profile, "nope").is_nan());
    }
}
