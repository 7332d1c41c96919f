use anyhow::Result;
use serde_json::json;

use pharmsim::pharm::ionization::{self, DrugKind};

use super::{Invocation, emit, fixed, require_range};
use crate::cli::{DrugKindArg, IonizationArgs};
use crate::display::Report;

pub fn run(args: IonizationArgs, inv: &Invocation) -> Result<()> {
    let grid = &inv.settings.grid;

    if let Some(case) = args.case {
        let data = case.data();
        let compartments = case.compartments();
        let profile = ionization::profile(data.pka, data.kind, grid.ph_min, grid.ph_max, inv.points());
        let rows = compartments
            .iter()
            .map(|c| {
                vec![
                    c.name.to_string(),
                    fixed(c.ph, 1),
                    fixed(c.ionized_percent, 1),
                    fixed(100.0 - c.ionized_percent, 1),
                ]
            })
            .collect();
        let report = Report::new(format!("{} ({}, pKa {})", data.name, data.kind, data.pka))
            .table("Ionization by Compartment", &["Compartment", "pH", "Ionized %", "Unionized %"], rows)
            .notes("Clinical Notes", data.notes.iter())
            .data(&json!({ "case": data, "compartments": compartments, "profile": &profile }))?
            .curve(profile);
        return emit(&report, inv);
    }

    require_range("pka", args.pka, -5.0, 20.0)?;
    let kind = match args.kind {
        DrugKindArg::Acid => DrugKind::Acid,
        DrugKindArg::Base => DrugKind::Base,
    };

    let mut report = Report::new(format!("Henderson-Hasselbalch ({kind}, pKa {})", args.pka));
    if let Some(ph) = args.ph {
        require_range("ph", ph, 0.0, 14.0)?;
        let ionized = ionization::ionized_fraction(ph, args.pka, kind) * 100.0;
        report = report
            .metrics(
                &format!("At pH {ph}"),
                [
                    ("Ionized (%)", fixed(ionized, 2)),
                    ("Unionized (%)", fixed(100.0 - ionized, 2)),
                ],
            )
            .data(&json!({ "ph": ph, "pka": args.pka, "kind": kind, "ionized_percent": ionized }))?;
    } else {
        let profile = ionization::profile(args.pka, kind, grid.ph_min, grid.ph_max, inv.points());
        report = report
            .data(&json!({ "pka": args.pka, "kind": kind, "profile": &profile }))?
            .curve(profile);
    }
    emit(&report, inv)
}
