use anyhow::Result;
use serde_json::json;

use pharmsim::pharm::pd::{self, INR_RANGE};

use super::{Invocation, emit, fixed, require_non_negative, require_positive, require_range};
use crate::cli::{PdCase, PdCommand};
use crate::display::{Report, fmt_num};

pub fn run(command: PdCommand, inv: &Invocation) -> Result<()> {
    let points = inv.points();
    let report = match command {
        PdCommand::Binding { kd, max_conc } => {
            require_positive("kd", kd)?;
            require_range("max_conc", max_conc, 0.1, 1e9)?;
            let profile = pd::binding_curve(kd, max_conc, points);
            Report::new("Receptor Occupancy")
                .metrics(
                    "Binding",
                    [
                        ("Kd", fixed(kd, 2)),
                        ("Occupancy at Kd (%)", fixed(pd::receptor_occupancy(kd, kd), 1)),
                        ("Occupancy at 10·Kd (%)", fixed(pd::receptor_occupancy(10.0 * kd, kd), 1)),
                    ],
                )
                .data(&profile)?
                .curve(profile)
        }

        PdCommand::Hill { ec50, n } => {
            require_positive("ec50", ec50)?;
            require_positive("n", n)?;
            let profile = pd::dose_response(ec50, n, points);
            // EC20 and EC80 bracket the steep part of the curve.
            let ec20 = ec50 * (0.25f64).powf(1.0 / n);
            let ec80 = ec50 * 4f64.powf(1.0 / n);
            Report::new("Hill Dose-Response")
                .metrics(
                    "Potency",
                    [
                        ("EC50", fixed(ec50, 2)),
                        ("Hill coefficient", fixed(n, 2)),
                        ("EC20", fixed(ec20, 3)),
                        ("EC80", fixed(ec80, 3)),
                    ],
                )
                .data(&json!({ "ec20": ec20, "ec80": ec80, "profile": &profile }))?
                .curve(profile)
        }

        PdCommand::Antagonism {
            antagonist,
            ka_agonist,
            kb,
        } => {
            require_non_negative("antagonist", antagonist)?;
            require_positive("ka_agonist", ka_agonist)?;
            require_positive("kb", kb)?;
            let profile = pd::antagonism_curve(antagonist, ka_agonist, kb, points);
            let dose_ratio = 1.0 + antagonist / kb;
            Report::new("Competitive Antagonism")
                .metrics(
                    "Shift",
                    [
                        ("Dose ratio", fixed(dose_ratio, 2)),
                        ("log(DR - 1)", fmt_num((dose_ratio - 1.0).log10())),
                    ],
                )
                .data(&json!({ "dose_ratio": dose_ratio, "profile": &profile }))?
                .curve(profile)
        }

        PdCommand::Window { mec, toxic } => {
            pd::validate_window(mec, toxic)?;
            let profile = pd::window_curve(mec, toxic, points);
            Report::new("Therapeutic Window")
                .metrics(
                    "Window",
                    [
                        ("MEC", fixed(mec, 1)),
                        ("MTC", fixed(toxic, 1)),
                        ("Therapeutic index", fixed(toxic / mec, 2)),
                        ("Window width", fixed(toxic - mec, 1)),
                    ],
                )
                .data(&profile)?
                .curve(profile)
        }

        PdCommand::Case { case } => run_case(case, points)?,
    };
    emit(&report, inv)
}

fn run_case(case: PdCase, points: usize) -> Result<Report> {
    let report = match case {
        PdCase::BetaBlocker { baseline, ic50 } => {
            require_range("baseline", baseline, 60.0, 250.0)?;
            require_positive("ic50", ic50)?;
            let profile = pd::beta_blocker(baseline, ic50, points);
            let at_ic50 = baseline - (baseline - 60.0) * pd::hill(ic50, ic50, 1.0) / 100.0;
            Report::new("Beta-Blocker Case Study")
                .metrics(
                    "Heart Rate",
                    [
                        ("Baseline (bpm)", fixed(baseline, 0)),
                        ("At IC50 (bpm)", fixed(at_ic50, 1)),
                        ("Floor (bpm)", "60".to_string()),
                    ],
                )
                .data(&profile)?
                .curve(profile)
        }

        PdCase::Anesthetic { pka, tissue_ph } => {
            require_range("tissue_ph", tissue_ph, 0.0, 14.0)?;
            let study = pd::local_anesthetic(pka, tissue_ph, points);
            Report::new("Local Anesthetic Case Study")
                .metrics(
                    "Tissue",
                    [
                        ("Tissue pH", fixed(study.tissue_ph, 2)),
                        ("Effect at tissue pH (%)", fixed(study.tissue_effect, 1)),
                    ],
                )
                .notes(
                    "Notes",
                    [
                        "Only the unionized base crosses the nerve sheath",
                        "Acidic (inflamed) tissue lowers the unionized fraction and the block",
                    ],
                )
                .data(&study)?
                .curve(study.profile.clone())
        }

        PdCase::Anticoagulant { baseline, target } => {
            require_positive("baseline", baseline)?;
            require_positive("target", target)?;
            let profile = pd::anticoagulant(baseline, target, points);
            let (lo, hi) = INR_RANGE;
            let in_range = profile
                .get("INR")
                .map(|y| y.iter().filter(|v| (lo..=hi).contains(*v)).count())
                .unwrap_or(0);
            let share = in_range as f64 / profile.len().max(1) as f64 * 100.0;
            Report::new("Anticoagulant Case Study")
                .metrics(
                    "INR",
                    [
                        ("Target INR", fixed(target, 1)),
                        ("Therapeutic range", format!("{lo}-{hi}")),
                        ("Grid in range (%)", fixed(share, 1)),
                    ],
                )
                .data(&profile)?
                .curve(profile)
        }
    };
    Ok(report)
}
