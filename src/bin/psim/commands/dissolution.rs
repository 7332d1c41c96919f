use anyhow::Result;
use serde_json::json;

use pharmsim::pharm::dissolution::{self, DissolutionParams};

use super::{Invocation, emit, fixed, require_positive};
use crate::cli::DissolutionArgs;
use crate::display::Report;

pub fn run(args: DissolutionArgs, inv: &Invocation) -> Result<()> {
    let mut params = DissolutionParams {
        k: args.model.k,
        dose_mg: args.model.dose,
        volume_ml: args.model.volume,
    };
    if let Some(half_life) = args.model.half_life {
        require_positive("half_life", half_life)?;
        params = params.with_half_life(half_life);
    }
    params.validate()?;

    let defaults = &inv.settings.dissolution;
    let duration = args.duration.unwrap_or(defaults.duration_h);
    require_positive("duration", duration)?;

    let metrics = dissolution::metrics(&params);
    let profile = if args.table {
        dissolution::table(&params, duration, defaults.table_step_h)
    } else {
        dissolution::profile(&params, duration, inv.points())
    };

    let report = Report::new("Drug Dissolution")
        .metrics(
            "Dissolution Kinetics",
            [
                ("Rate constant k (1/h)", fixed(params.k, 4)),
                ("T50 (h)", fixed(metrics.t50_h, 2)),
                ("T90 (h)", fixed(metrics.t90_h, 2)),
                ("Initial rate (mg/h)", fixed(metrics.initial_rate, 2)),
            ],
        )
        .data(&json!({ "metrics": metrics, "profile": &profile }))?
        .curve(profile);
    emit(&report, inv)
}
