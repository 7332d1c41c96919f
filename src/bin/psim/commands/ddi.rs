use anyhow::Result;
use serde_json::json;

use pharmsim::pharm::interaction::{
    self, CaseMetrics, ClinicalCase, InteractionType, MAX_RISK_SCORE, MetabolicInteraction,
    ProteinBindingParams, RiskFactors,
};

use super::{Invocation, emit, fixed, require_non_negative, require_positive};
use crate::cli::{DdiCommand, RiskArgs};
use crate::display::Report;

pub fn run(command: DdiCommand, inv: &Invocation) -> Result<()> {
    let points = inv.points();
    let report = match command {
        DdiCommand::Inhibition { c0, inhibitor, ki } => {
            require_positive("c0", c0)?;
            require_non_negative("inhibitor", inhibitor)?;
            require_positive("ki", ki)?;
            let result = interaction::metabolic_inhibition(c0, inhibitor, ki, points);
            let cl = interaction::inhibited_clearance(inhibitor, ki);
            metabolic_report("Metabolic Inhibition", cl, result)?
        }

        DdiCommand::Induction { c0, fold } => {
            require_positive("c0", c0)?;
            require_positive("fold", fold)?;
            let result = interaction::enzyme_induction(c0, fold, points);
            let cl = interaction::induced_clearance(fold - 1.0);
            metabolic_report("Enzyme Induction", cl, result)?
        }

        DdiCommand::Absorption { dose, ka, factor } => {
            require_positive("dose", dose)?;
            require_positive("ka", ka)?;
            require_non_negative("factor", factor)?;
            let profile = interaction::absorption_interaction(dose, ka, factor, points);
            let change = (factor - 1.0) * 100.0;
            Report::new("Absorption Interaction")
                .metrics(
                    "Absorption",
                    [
                        ("Normal ka (1/h)", fixed(ka, 2)),
                        ("Altered ka (1/h)", fixed(ka * factor, 2)),
                        ("Rate change (%)", format!("{:+.1}", change)),
                    ],
                )
                .data(&profile)?
                .curve(profile)
        }

        DdiCommand::Binding {
            total,
            free_fraction,
            displacement,
            clearance,
        } => {
            let params = ProteinBindingParams {
                total_conc: total,
                free_fraction,
                displacement,
                clearance,
            };
            params.validate()?;
            let result = interaction::protein_binding(&params, points);
            Report::new("Protein Binding Displacement")
                .metrics(
                    "Free Drug",
                    [
                        ("Initial free increase (%)", format!("{:+.1}", result.initial_free_increase_pct)),
                        ("Free AUC increase (%)", format!("{:+.1}", result.free_auc_increase_pct)),
                        ("Clinical risk", result.risk.to_string()),
                    ],
                )
                .notes("Advice", result.advice().iter())
                .data(&result)?
                .curve(result.profile.clone())
        }

        DdiCommand::Combination { e1, e2, kind } => {
            require_non_negative("e1", e1)?;
            require_non_negative("e2", e2)?;
            let combined = kind.combine(e1, e2);
            let rows: Vec<(String, f64)> = vec![
                ("Drug 1".to_string(), e1),
                ("Drug 2".to_string(), e2),
                ("Combined".to_string(), combined),
            ];
            Report::new("Pharmacodynamic Interaction")
                .metrics(
                    "Combination",
                    [
                        ("Interaction", interaction_label(kind).to_string()),
                        ("Coefficient β", fixed(kind.coefficient(), 2)),
                        ("Combined effect (%)", fixed(combined, 1)),
                    ],
                )
                .distribution("Effects (%)", rows)
                .data(&json!({ "e1": e1, "e2": e2, "type": kind, "combined": combined }))?
        }

        DdiCommand::Risk(args) => risk_report(&args)?,

        DdiCommand::Clinical { case, seed } => {
            let sim = interaction::clinical_case(case, seed, points)?;
            let rows = case_rows(&sim.metrics);
            Report::new(sim.case.title())
                .metrics("Outcome", rows)
                .notes("Management", case_management(case))
                .data(&sim)?
                .curve(sim.profile.clone())
        }
    };
    emit(&report, inv)
}

fn metabolic_report(title: &str, clearance: f64, result: MetabolicInteraction) -> Result<Report> {
    let baseline = interaction::BASELINE_CLEARANCE;
    Ok(Report::new(title)
        .metrics(
            "Exposure",
            [
                ("Baseline clearance (1/h)", fixed(baseline, 3)),
                ("Altered clearance (1/h)", fixed(clearance, 3)),
                ("AUC change (%)", format!("{:+.1}", result.auc_change_pct)),
            ],
        )
        .data(&result)?
        .curve(result.profile))
}

fn risk_report(args: &RiskArgs) -> Result<Report> {
    let factors = RiskFactors {
        narrow_therapeutic_index: args.narrow_therapeutic_index,
        critical_drug: args.critical,
        strong_inhibitor_or_inducer: args.strong,
        alternative_available: args.alternative,
    };
    let assessment = factors.assess();
    let yes_no = |b: bool| String::from(if b { "yes" } else { "no" });
    Report::new("Interaction Risk Assessment")
        .metrics(
            "Factors",
            [
                ("Narrow therapeutic index", yes_no(factors.narrow_therapeutic_index)),
                ("Critical drug", yes_no(factors.critical_drug)),
                ("Strong inhibitor/inducer", yes_no(factors.strong_inhibitor_or_inducer)),
                ("Alternative available", yes_no(factors.alternative_available)),
            ],
        )
        .metrics(
            "Risk",
            [
                ("Score", format!("{}/{}", assessment.score, MAX_RISK_SCORE)),
                ("Level", assessment.level.to_string()),
            ],
        )
        .notes("Recommendations", assessment.recommendations().iter())
        .data(&json!({ "factors": factors, "assessment": assessment }))
}

fn interaction_label(kind: InteractionType) -> &'static str {
    match kind {
        InteractionType::Additive => "Additive",
        InteractionType::Synergistic => "Synergistic",
        InteractionType::Antagonistic => "Antagonistic",
    }
}

fn case_rows(metrics: &CaseMetrics) -> Vec<(String, String)> {
    match *metrics {
        CaseMetrics::Warfarin {
            days_to_supratherapeutic,
        } => vec![(
            "Days to INR > 3".to_string(),
            days_to_supratherapeutic.map_or_else(|| "not reached".to_string(), |d| fixed(d, 1)),
        )],
        CaseMetrics::Statin {
            auc_increase_pct,
            peak_increase_pct,
        } => vec![
            ("AUC increase (%)".to_string(), format!("{:+.1}", auc_increase_pct)),
            ("Peak increase (%)".to_string(), format!("{:+.1}", peak_increase_pct)),
        ],
        CaseMetrics::Ssri {
            risk_increase_pct,
            peak_risk,
        } => vec![
            ("Mean risk increase (%)".to_string(), format!("{:+.1}", risk_increase_pct)),
            ("Peak relative risk".to_string(), fixed(peak_risk, 2)),
        ],
    }
}

fn case_management(case: ClinicalCase) -> &'static [&'static str] {
    match case {
        ClinicalCase::WarfarinAntibiotic => &[
            "Check INR within 3-5 days of starting the antibiotic",
            "Reduce the warfarin dose if INR rises above range",
        ],
        ClinicalCase::StatinInhibitor => &[
            "Watch for myalgia and raised creatine kinase",
            "Switch to a statin not cleared by CYP3A4",
        ],
        ClinicalCase::SsriNsaid => &[
            "Add gastroprotection if the combination is needed",
            "Prefer paracetamol for analgesia",
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn risk_report_scores_all_factors() {
        let args = RiskArgs {
            narrow_therapeutic_index: true,
            critical: true,
            strong: true,
            alternative: false,
        };
        let report = risk_report(&args).unwrap();
        let json = report.json();
        assert_eq!(json["assessment"]["score"], 8);
        assert_eq!(json["assessment"]["level"], "High");
    }

    #[test]
    fn warfarin_rows_handle_missing_crossing() {
        let rows = case_rows(&CaseMetrics::Warfarin {
            days_to_supratherapeutic: None,
        });
        assert_eq!(rows[0].1, "not reached");
    }

    #[test]
    fn every_case_has_management_notes() {
        for case in ClinicalCase::ALL {
            assert!(!case_management(case).is_empty());
        }
    }
}
