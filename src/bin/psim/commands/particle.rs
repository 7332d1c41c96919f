use anyhow::Result;
use serde_json::json;

use pharmsim::pharm::particle::{self, DistributionParams, MICRONIZATION_COMPARISON, ParticleCase};

use super::{Invocation, emit, fixed};
use crate::cli::{ParticleArgs, ParticleCaseArg};
use crate::display::Report;

pub fn run(args: ParticleArgs, inv: &Invocation) -> Result<()> {
    let defaults = &inv.settings.particle;
    let samples = args.samples.unwrap_or(defaults.samples);
    let seed = args.seed.unwrap_or(defaults.seed);

    let report = match args.case {
        Some(ParticleCaseArg::Micronization) => micronization()?,
        Some(ParticleCaseArg::Griseofulvin) => grades(ParticleCase::Griseofulvin, samples, seed)?,
        Some(ParticleCaseArg::Ibuprofen) => grades(ParticleCase::Ibuprofen, samples, seed)?,
        None => {
            let params = DistributionParams {
                mean_size_um: args.mean,
                sigma: args.sigma,
                samples,
                seed,
            };
            params.validate()?;
            let sizes = particle::sample_sizes(&params)?;
            let stats = particle::statistics(&sizes);
            let profile = if args.histogram {
                particle::histogram(&sizes, defaults.histogram_bins)
            } else {
                particle::dissolution_profile(&sizes, defaults.duration_min, inv.points())
            };
            let [d15, d30, d45] = stats.dissolved_15_30_45;
            Report::new(format!("Particle Size (n = {samples}, seed {seed})"))
                .metrics(
                    "Size Statistics",
                    [
                        ("Mean size (μm)", fixed(stats.mean_um, 1)),
                        ("Median size (μm)", fixed(stats.median_um, 1)),
                        ("D10 (μm)", fixed(stats.d10_um, 1)),
                        ("D90 (μm)", fixed(stats.d90_um, 1)),
                        ("Dissolved 15 min (%)", fixed(d15, 1)),
                        ("Dissolved 30 min (%)", fixed(d30, 1)),
                        ("Dissolved 45 min (%)", fixed(d45, 1)),
                    ],
                )
                .data(&json!({ "statistics": stats, "profile": &profile }))?
                .curve(profile)
        }
    };
    emit(&report, inv)
}

fn grades(case: ParticleCase, samples: usize, seed: u64) -> Result<Report> {
    let results = particle::compare_grades(case, samples, seed)?;
    let rows = results
        .iter()
        .map(|g| {
            let s = &g.statistics;
            vec![
                g.name.to_string(),
                fixed(s.mean_um, 1),
                fixed(s.d10_um, 1),
                fixed(s.d90_um, 1),
                fixed(s.dissolved_15_30_45[1], 1),
            ]
        })
        .collect();
    Ok(Report::new(format!("{case:?} Particle Grades"))
        .table("Grade Comparison", &["Grade", "Mean μm", "D10 μm", "D90 μm", "30 min %"], rows)
        .notes("Key Points", case.takeaways().iter())
        .data(&results)?)
}

fn micronization() -> Result<Report> {
    let rows = MICRONIZATION_COMPARISON
        .iter()
        .map(|(property, micronized, regular)| {
            vec![property.to_string(), fixed(*micronized, 0), fixed(*regular, 0)]
        })
        .collect();
    let data: Vec<_> = MICRONIZATION_COMPARISON
        .iter()
        .map(|(property, micronized, regular)| {
            json!({ "property": property, "micronized": micronized, "non_micronized": regular })
        })
        .collect();
    Ok(Report::new("Micronization Effects")
        .table("Relative Performance (%)", &["Property", "Micronized", "Regular"], rows)
        .data(&data)?)
}
