mod ddi;
mod dissolution;
mod excipient;
mod game;
mod ionization;
mod mol;
mod particle;
mod pd;
mod physical;
mod pk;
mod release;

use std::io::Write;
use std::path::Path;

use anyhow::{Context as _, Result, bail};
use tracing::debug;

use pharmsim::config::{self, Settings};
use pharmsim::pharm::Error as PharmError;

use crate::cli::{Cli, Command, OutputFormat};
use crate::display::{Context, Report};
use crate::io::{OutputSpec, create_output};

const SDF_ONLY: &str = "SDF output is only available for the mol and game commands";

/// Everything a command needs besides its own arguments.
pub struct Invocation {
    pub ctx: Context,
    pub settings: Settings,
    pub output: OutputSpec,
}

impl Invocation {
    /// Default curve resolution.
    pub fn points(&self) -> usize {
        self.settings.grid.points
    }
}

pub fn dispatch(cli: Cli, ctx: Context) -> Result<()> {
    let settings = load_settings(cli.config.as_deref())?;
    let output = OutputSpec::resolve(&cli.output)?;
    let inv = Invocation {
        ctx,
        settings,
        output,
    };

    match cli.command {
        Command::Dissolution(args) => dissolution::run(args, &inv),
        Command::Ionization(args) => ionization::run(args, &inv),
        Command::Particle(args) => particle::run(args, &inv),
        Command::Pk { command } => pk::run(command, &inv),
        Command::Pd { command } => pd::run(command, &inv),
        Command::Release { command } => release::run(command, &inv),
        Command::Physical { command } => physical::run(command, &inv),
        Command::Ddi { command } => ddi::run(command, &inv),
        Command::Excipient { command } => excipient::run(command, &inv),
        Command::Mol(args) => mol::run(args, &inv),
        Command::Game(args) => game::run(args, &inv),
    }
}

fn load_settings(path: Option<&Path>) -> Result<Settings> {
    match path {
        Some(p) => {
            debug!(path = %p.display(), "loading settings");
            Ok(config::load_settings_file(p)?)
        }
        None => Ok(config::default_settings().clone()),
    }
}

/// Writes a curve-style report in the requested format.
pub fn emit(report: &Report, inv: &Invocation) -> Result<()> {
    let spec = &inv.output;
    if spec.format == OutputFormat::Sdf {
        bail!(SDF_ONLY);
    }
    if spec.format == OutputFormat::Csv && report.profiles().next().is_none() {
        bail!("'{}' has no curve data to write as CSV", report.title);
    }

    let mut writer = create_output(spec.path.as_deref())?;
    match spec.format {
        OutputFormat::Table => report
            .write_text(&mut writer)
            .context("Failed to write report")?,
        OutputFormat::Csv => {
            for (i, profile) in report.profiles().enumerate() {
                if i > 0 {
                    writeln!(writer)?;
                }
                pharmsim::io::csv::write(&mut writer, profile)?;
            }
        }
        OutputFormat::Json => pharmsim::io::json::write(&mut writer, &report.json())?,
        OutputFormat::Sdf => bail!(SDF_ONLY),
    }
    writer.flush()?;

    announce_written(inv, &report.title);
    Ok(())
}

/// Tells an interactive user where a file result went.
pub fn announce_written(inv: &Invocation, what: &str) {
    if let (Some(path), true) = (&inv.output.path, inv.ctx.interactive) {
        eprintln!("  \x1b[32m✓\x1b[0m {} → {}", what, path.display());
        eprintln!();
    }
}

pub fn require_positive(name: &'static str, value: f64) -> Result<(), PharmError> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(PharmError::invalid(name, value, "must be positive"))
    }
}

pub fn require_non_negative(name: &'static str, value: f64) -> Result<(), PharmError> {
    if value >= 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(PharmError::invalid(name, value, "must not be negative"))
    }
}

pub fn require_range(name: &'static str, value: f64, lo: f64, hi: f64) -> Result<(), PharmError> {
    if (lo..=hi).contains(&value) {
        Ok(())
    } else {
        Err(PharmError::invalid(name, value, format!("must lie in [{lo}, {hi}]")))
    }
}

/// Formats with fixed decimals.
pub fn fixed(v: f64, decimals: usize) -> String {
    format!("{:.*}", decimals, v)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validators_reject_out_of_domain() {
        assert!(require_positive("k", 0.1).is_ok());
        assert!(require_positive("k", 0.0).is_err());
        assert!(require_positive("k", f64::NAN).is_err());
        assert!(require_non_negative("c", 0.0).is_ok());
        assert!(require_range("ph", 7.4, 0.0, 14.0).is_ok());
        assert!(require_range("ph", 15.0, 0.0, 14.0).is_err());
    }

    #[test]
    fn fixed_rounds() {
        assert_eq!(fixed(2.0 / 3.0, 2), "0.67");
    }
}
