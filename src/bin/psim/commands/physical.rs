use anyhow::Result;
use serde_json::json;

use pharmsim::pharm::physical;

use super::{Invocation, emit, fixed, require_positive};
use crate::cli::PhysicalCommand;
use crate::display::{Report, fmt_num};

pub fn run(command: PhysicalCommand, inv: &Invocation) -> Result<()> {
    let points = inv.points();
    let report = match command {
        PhysicalCommand::Solubility {
            heat,
            ref_solubility,
        } => {
            require_positive("ref_solubility", ref_solubility)?;
            let profile = physical::solubility_curve(heat, ref_solubility, points);
            let at_37 = physical::solubility(37.0, heat * 1000.0, ref_solubility);
            let behaviour = if heat > 0.0 {
                "Endothermic: solubility rises with temperature"
            } else if heat < 0.0 {
                "Exothermic: solubility falls with temperature"
            } else {
                "Athermal: solubility independent of temperature"
            };
            Report::new("Temperature-Dependent Solubility")
                .metrics(
                    "Solubility",
                    [
                        ("At 25 °C (mg/mL)", fmt_num(ref_solubility)),
                        ("At 37 °C (mg/mL)", fmt_num(at_37)),
                    ],
                )
                .notes("Behaviour", [behaviour])
                .data(&profile)?
                .curve(profile)
        }

        PhysicalCommand::Surface { gamma0, k } => {
            require_positive("gamma0", gamma0)?;
            require_positive("k", k)?;
            let profile = physical::surface_tension_curve(gamma0, k, points);
            let lowest = profile
                .get("Surface Tension (mN/m)")
                .and_then(|y| y.last().copied())
                .unwrap_or(f64::NAN);
            Report::new("Surface Tension")
                .metrics(
                    "Interface",
                    [
                        ("Pure solvent (mN/m)", fixed(gamma0, 1)),
                        ("At 10 mM (mN/m)", fixed(lowest, 1)),
                        ("Reduction (mN/m)", fixed(gamma0 - lowest, 1)),
                    ],
                )
                .data(&profile)?
                .curve(profile)
        }

        PhysicalCommand::Rheology { k, n } => {
            require_positive("k", k)?;
            require_positive("n", n)?;
            let profile = physical::rheology_curve(k, n, points);
            Report::new("Power-Law Rheology")
                .metrics(
                    "Flow",
                    [
                        ("Consistency K", fixed(k, 2)),
                        ("Flow index n", fixed(n, 2)),
                        ("Behaviour", flow_behaviour(n).to_string()),
                    ],
                )
                .data(&profile)?
                .curve(profile)
        }

        PhysicalCommand::Buffer { pka, conc } => {
            require_positive("conc", conc)?;
            let profile = physical::buffer_curve(pka, conc, points);
            let peak = physical::buffer_capacity(10f64.powf(-pka), conc, pka);
            Report::new("Buffer Capacity")
                .metrics(
                    "Capacity",
                    [
                        ("Maximum β", fmt_num(peak)),
                        ("At pH", fixed(pka, 2)),
                        ("Useful range", format!("{:.1} - {:.1}", pka - 1.0, pka + 1.0)),
                    ],
                )
                .data(&json!({ "max_capacity": peak, "profile": &profile }))?
                .curve(profile)
        }

        PhysicalCommand::Stability { order, k, c0 } => {
            physical::validate_stability(k, c0)?;
            let study = physical::stability(order, k, c0, points);
            let m = study.metrics;
            Report::new("Drug Stability")
                .metrics(
                    "Shelf Life",
                    [
                        ("Reaction order", order.to_string()),
                        ("Rate constant k", fmt_num(m.k)),
                        ("t90", fmt_num(m.t90)),
                        ("t50", fmt_num(m.t50)),
                    ],
                )
                .data(&study)?
                .curve(study.profile)
        }
    };
    emit(&report, inv)
}

fn flow_behaviour(n: f64) -> &'static str {
    const TOLERANCE: f64 = 1e-9;
    if (n - 1.0).abs() < TOLERANCE {
        "Newtonian"
    } else if n < 1.0 {
        "Shear-thinning (pseudoplastic)"
    } else {
        "Shear-thickening (dilatant)"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flow_index_classifies_fluids() {
        assert_eq!(flow_behaviour(1.0), "Newtonian");
        assert_eq!(flow_behaviour(0.4), "Shear-thinning (pseudoplastic)");
        assert_eq!(flow_behaviour(1.6), "Shear-thickening (dilatant)");
    }
}
