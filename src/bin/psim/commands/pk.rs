use anyhow::Result;
use serde_json::json;

use pharmsim::pharm::pk::{self, CaseView, OneCompartment, TwoCompartment};

use super::{Invocation, emit, fixed, require_positive};
use crate::cli::{OneCompartmentArgs, PkCommand, PkViewArg};
use crate::display::Report;

pub fn run(command: PkCommand, inv: &Invocation) -> Result<()> {
    let report = match command {
        PkCommand::Bolus(args) => {
            let model = one_compartment(&args.model, args.ka);
            model.validate()?;
            require_positive("duration", args.duration)?;
            let profile = model.profile(args.duration, inv.points());
            let c0 = pk::iv_bolus(0.0, model.dose, model.volume, model.k);
            Report::new("One-Compartment Pharmacokinetics")
                .metrics(
                    "IV Bolus",
                    [
                        ("C0 (mg/L)", fixed(c0, 2)),
                        ("Half-life (h)", fixed(pk::half_life(model.k), 2)),
                        ("Clearance (L/h)", fixed(model.k * model.volume, 2)),
                    ],
                )
                .data(&json!({ "c0": c0, "half_life_h": pk::half_life(model.k), "profile": &profile }))?
                .curve(profile)
        }

        PkCommand::TwoCompartment(args) => {
            let model = TwoCompartment {
                dose: args.dose,
                v1: args.v1,
                k12: args.k12,
                k21: args.k21,
                k10: args.k10,
            };
            model.validate()?;
            require_positive("duration", args.duration)?;
            let profile = model.profile(args.duration, inv.points());
            Report::new("Two-Compartment Pharmacokinetics")
                .metrics(
                    "Distribution",
                    [
                        ("C0 central (mg/L)", fixed(model.dose / model.v1, 2)),
                        ("Alpha (1/h)", fixed(model.alpha(), 3)),
                        ("Distribution t½ (h)", fixed(model.distribution_half_life(), 2)),
                    ],
                )
                .data(&json!({
                    "alpha": model.alpha(),
                    "distribution_half_life_h": model.distribution_half_life(),
                    "profile": &profile,
                }))?
                .curve(profile)
        }

        PkCommand::Routes(args) => {
            let model = one_compartment(&args.model, args.ka);
            model.validate()?;
            require_positive("infusion", args.infusion)?;
            require_positive("duration", args.duration)?;
            let comparison = pk::compare_routes(&model, args.infusion, args.duration, inv.points());
            let peaks = comparison
                .peaks
                .iter()
                .map(|p| (format!("Cmax {} (mg/L)", p.route), fixed(p.cmax, 2)))
                .chain(std::iter::once((
                    "Half-life (h)".to_string(),
                    fixed(comparison.half_life_h, 2),
                )));
            Report::new("Route of Administration Comparison")
                .metrics("Peak Concentrations", peaks)
                .data(&comparison)?
                .curve(comparison.profile.clone())
        }

        PkCommand::Case(args) => {
            let dose = args.dose.unwrap_or_else(|| args.case.default_dose());
            require_positive("dose", dose)?;
            let view = match args.view {
                PkViewArg::All => CaseView::AllRoutes,
                PkViewArg::Intravenous => CaseView::Intravenous,
                PkViewArg::Parenteral => CaseView::Parenteral,
            };
            let study = args.case.simulate(dose, view, inv.points());
            let m = &study.metrics;
            Report::new(format!("{:?} Case Study", args.case))
                .metrics(
                    "Key Parameters",
                    [
                        ("Cmax IV bolus (mg/L)", fixed(m.cmax_iv_bolus, 2)),
                        ("Time above MEC (h)", fixed(m.time_above_mec_h, 1)),
                        ("Terminal t½ (h)", fixed(m.terminal_half_life_h, 2)),
                    ],
                )
                .data(&study)?
                .curve(study.profile.clone())
        }
    };
    emit(&report, inv)
}

fn one_compartment(args: &OneCompartmentArgs, ka: f64) -> OneCompartment {
    OneCompartment {
        dose: args.dose,
        volume: args.volume,
        k: args.k,
        ka,
    }
}
