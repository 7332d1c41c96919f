use std::io::Write;

use anyhow::{Context, Result, bail};
use serde_json::json;

use pharmsim::chem::{
    self, Descriptors, Dimensions, EmbedOptions, LipinskiReport, MolecularGraph, Molecule,
};
use pharmsim::config::GameSettings;
use pharmsim::game;

use super::{Invocation, announce_written, fixed};
use crate::cli::{DimsArg, MolArgs, OutputFormat};
use crate::display::{Progress, Report, print_lipinski_table};
use crate::io::create_output;

const TOTAL_STEPS: u8 = 3;

impl From<DimsArg> for Dimensions {
    fn from(arg: DimsArg) -> Self {
        match arg {
            DimsArg::Two => Dimensions::Two,
            DimsArg::Three => Dimensions::Three,
        }
    }
}

pub fn run(args: MolArgs, inv: &Invocation) -> Result<()> {
    if inv.output.format == OutputFormat::Csv {
        bail!("Molecules have no curve data; use --format table, json or sdf");
    }

    let mut progress = Progress::new(inv.ctx.interactive, TOTAL_STEPS);

    progress.step("Reading molecule");
    let mut mol = Molecule::parse(&args.smiles).context("Failed to parse input SMILES")?;
    let mut substeps = vec![format!("Parse SMILES ({} heavy atoms)", mol.atom_count())];
    for token in &args.add {
        let fragment = resolve_fragment(&inv.settings.game, token)?;
        mol = chem::attach_functional_group(&mol, &fragment)
            .with_context(|| format!("Failed to attach '{}'", token))?;
        substeps.push(format!("Attach {} → {}", token, mol.to_smiles()));
    }
    progress.complete(&substeps);

    progress.step("Evaluating Rule of 5");
    let smiles = mol.to_smiles();
    let descriptors = Descriptors::compute(&mol);
    let report = LipinskiReport::evaluate(descriptors);
    progress.complete(&[format!("{} of 4 rules passed", 4 - report.violations())]);

    progress.step("Writing output");
    let mut writer = create_output(inv.output.path.as_deref())?;
    match inv.output.format {
        OutputFormat::Table => {
            summary(&smiles, &descriptors)
                .write_text(&mut writer)
                .context("Failed to write report")?;
            print_lipinski_table(&mut writer, &report);
            writeln!(writer)?;
        }
        OutputFormat::Json => {
            pharmsim::io::json::write(&mut writer, &json!({ "smiles": smiles, "report": report }))?;
        }
        OutputFormat::Sdf => {
            let options = EmbedOptions {
                seed: args.depiction.seed.unwrap_or(inv.settings.game.embed_seed),
                iterations: inv.settings.game.embed_iterations,
            };
            let placed = match Dimensions::from(args.depiction.dims) {
                Dimensions::Two => chem::depict_2d(&mol, options),
                Dimensions::Three => chem::embed_3d(&mol, options),
            };
            pharmsim::io::sdf::write(&mut writer, &placed, &smiles)?;
        }
        OutputFormat::Csv => bail!("Molecules have no curve data"),
    }
    writer.flush()?;
    progress.complete(&[format!("{:?} → {}", inv.output.format, destination(inv))]);

    progress.finish("Analysis complete");
    announce_written(inv, &smiles);
    Ok(())
}

fn destination(inv: &Invocation) -> String {
    inv.output
        .path
        .as_ref()
        .and_then(|p| p.file_name())
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "stdout".to_string())
}

/// Library group key or display name, or a raw fragment with a `*`.
pub(super) fn resolve_fragment(settings: &GameSettings, token: &str) -> Result<String, game::Error> {
    if token.contains('*') {
        return Ok(token.to_string());
    }
    settings
        .substituent(token)
        .map(|s| s.smiles.clone())
        .ok_or_else(|| game::Error::UnknownSubstituent(token.to_string()))
}

fn summary(smiles: &str, d: &Descriptors) -> Report {
    Report::new("Molecule").metrics(
        "Descriptors",
        [
            ("SMILES", smiles.to_string()),
            ("Molecular weight (Da)", fixed(d.molecular_weight, 2)),
            ("LogP (Crippen)", fixed(d.logp, 2)),
            ("H-bond donors", d.h_bond_donors.to_string()),
            ("H-bond acceptors", d.h_bond_acceptors.to_string()),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fragments_resolve_by_key_name_or_raw() {
        let settings = GameSettings::default();
        assert_eq!(resolve_fragment(&settings, "methyl").unwrap(), "[*:1]C");
        assert_eq!(resolve_fragment(&settings, "Hydroxyl (-OH)").unwrap(), "[*:1]O");
        assert_eq!(resolve_fragment(&settings, "*CC").unwrap(), "*CC");
        assert!(matches!(
            resolve_fragment(&settings, "nitro"),
            Err(game::Error::UnknownSubstituent(_))
        ));
    }

    #[test]
    fn summary_lists_descriptors() {
        let mol = Molecule::parse("CCO").unwrap();
        let d = Descriptors::compute(&mol);
        let mut buf = Vec::new();
        summary("CCO", &d).write_text(&mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("CCO"));
        assert!(text.contains("H-bond donors"));
    }
}
