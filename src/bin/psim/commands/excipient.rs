use anyhow::{Result, bail};
use serde_json::json;

use pharmsim::pharm::excipient::{
    self, DATABASE, Excipient, Formulation, Requirements, SELECTION_CONSIDERATIONS,
};

use super::{Invocation, emit, fixed, require_positive, require_range};
use crate::cli::{ExcipientCommand, FormulateArgs, GuideArgs};
use crate::display::Report;
use crate::util::text::parse_share;

pub fn run(command: ExcipientCommand, inv: &Invocation) -> Result<()> {
    let report = match command {
        ExcipientCommand::List { category } => {
            let entries: Vec<&Excipient> = match category {
                Some(c) => excipient::by_category(c).collect(),
                None => DATABASE.iter().collect(),
            };
            let title = category.map_or_else(|| "All Excipients".to_string(), |c| c.to_string());
            let rows = entries
                .iter()
                .map(|e| {
                    vec![
                        e.name.to_string(),
                        e.category.to_string(),
                        e.use_range.to_string(),
                        e.features.join(", "),
                    ]
                })
                .collect();
            Report::new("Excipient Database")
                .table(&title, &["Name", "Category", "Use Level", "Features"], rows)
                .data(&entries)?
        }

        ExcipientCommand::Compat { first, second } => {
            let a = excipient::lookup(&first)?;
            let b = excipient::lookup(&second)?;
            let score = excipient::compatibility_score(a, b);
            Report::new("Excipient Compatibility")
                .metrics(
                    "Pair",
                    [
                        ("First", a.name.to_string()),
                        ("Second", b.name.to_string()),
                        ("Score", fixed(score, 2)),
                        ("Verdict", compatibility_verdict(score).to_string()),
                    ],
                )
                .table(
                    "Properties",
                    &["Excipient", "Compatible with", "Avoid with"],
                    [a, b]
                        .iter()
                        .map(|e| {
                            vec![
                                e.name.to_string(),
                                e.compatibility.join(", "),
                                e.incompatibility.join(", "),
                            ]
                        })
                        .collect(),
                )
                .data(&json!({ "first": a, "second": b, "score": score }))?
        }

        ExcipientCommand::Flow { angle, bulk } => {
            require_range("angle", angle, 0.0, 90.0)?;
            require_positive("bulk", bulk)?;
            let flow = excipient::flow_properties(angle, bulk);
            Report::new("Powder Flow")
                .metrics(
                    "Flow Properties",
                    [
                        ("Angle of repose (°)", fixed(angle, 1)),
                        ("Bulk density (g/mL)", fixed(bulk, 3)),
                        ("Tapped density (g/mL)", fixed(flow.tapped_density, 3)),
                        ("Carr's index (%)", fixed(flow.carrs_index, 1)),
                        ("Flow", flow.quality.to_string()),
                    ],
                )
                .data(&flow)?
        }

        ExcipientCommand::Guide(args) => guide_report(&args)?,

        ExcipientCommand::Formulate(args) => formulate_report(&args)?,
    };
    emit(&report, inv)
}

fn compatibility_verdict(score: f64) -> &'static str {
    if score >= 1.0 {
        "Compatible"
    } else if score > 0.0 {
        "Use with caution"
    } else {
        "Incompatible"
    }
}

fn guide_report(args: &GuideArgs) -> Result<Report> {
    let req = Requirements {
        dosage_form: args.dosage_form,
        manufacturing: args.manufacturing,
        solubility: args.solubility,
        stability: args.stability,
    };
    let rec = excipient::recommend(&req);
    let rows = rec
        .excipients
        .iter()
        .map(|p| vec![p.role.to_string(), p.material.to_string(), p.amount.to_string()])
        .collect();
    Report::new("Excipient Selection Guide")
        .table("Recommended Excipients", &["Role", "Material", "Amount"], rows)
        .notes("Notes", rec.notes.iter())
        .notes("Also Consider", SELECTION_CONSIDERATIONS)
        .data(&json!({ "requirements": req, "recommendation": rec }))
}

fn formulate_report(args: &FormulateArgs) -> Result<Report> {
    require_positive("weight", args.weight)?;
    require_range("api", args.api, 0.0, args.weight)?;

    let mut formulation = Formulation::new(args.weight, args.api);
    for entry in &args.excipients {
        let Some((name, pct)) = parse_share(entry) else {
            bail!("Invalid excipient share '{}': expected NAME=PERCENT", entry);
        };
        let known = excipient::lookup(name)?;
        formulation = formulation.with(known.name, pct);
    }

    let rows = formulation.table()?;
    let table = rows
        .iter()
        .map(|r| vec![r.component.clone(), fixed(r.percentage, 1), fixed(r.weight_mg, 2)])
        .collect();
    let shares = rows
        .iter()
        .map(|r| (r.component.clone(), r.weight_mg / args.weight * 100.0))
        .collect();
    Report::new("Tablet Formulation")
        .metrics(
            "Tablet",
            [
                ("Tablet weight (mg)", fixed(args.weight, 1)),
                ("API (mg)", fixed(args.api, 1)),
                ("Excipient weight (mg)", fixed(formulation.available_weight_mg(), 1)),
            ],
        )
        .table("Composition", &["Component", "%", "Weight (mg)"], table)
        .distribution("Share of Tablet Weight", shares)
        .data(&json!({ "formulation": &formulation, "rows": &rows }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn formulate(shares: &[&str]) -> Result<Report> {
        formulate_report(&FormulateArgs {
            weight: 200.0,
            api: 50.0,
            excipients: shares.iter().map(|s| s.to_string()).collect(),
        })
    }

    #[test]
    fn verdict_bands() {
        assert_eq!(compatibility_verdict(1.0), "Compatible");
        assert_eq!(compatibility_verdict(0.5), "Use with caution");
        assert_eq!(compatibility_verdict(0.0), "Incompatible");
    }

    #[test]
    fn formulation_splits_remaining_weight() {
        let report = formulate(&["MCC=80", "Magnesium Stearate=20"]).unwrap();
        let rows = &report.json()["rows"];
        assert_eq!(rows[0]["component"], "API");
        assert_eq!(rows[1]["component"], "Microcrystalline Cellulose");
        assert!((rows[1]["weight_mg"].as_f64().unwrap() - 120.0).abs() < 1e-9);
    }

    #[test]
    fn formulation_rejects_bad_total_and_syntax() {
        assert!(formulate(&["MCC=60"]).is_err());
        assert!(formulate(&["MCC"]).is_err());
        assert!(formulate(&["Unobtainium=100"]).is_err());
    }
}
