use std::path::PathBuf;

use anyhow::{Result, bail};

use crate::cli::{OutputFormat, OutputOptions};

#[derive(Debug, Clone)]
pub struct OutputSpec {
    /// Path to write to, or `None` for stdout.
    pub path: Option<PathBuf>,
    /// Output format.
    pub format: OutputFormat,
}

impl OutputSpec {
    /// An explicit `--format` wins; otherwise files are inferred from their
    /// extension and stdout gets text tables.
    pub fn resolve(options: &OutputOptions) -> Result<Self> {
        let format = match (options.format, &options.output) {
            (Some(format), _) => format,
            (None, Some(path)) => match super::infer_output_format(path) {
                Some(format) => format,
                None => bail!(
                    "Cannot infer output format for '{}'. Use --format or a .csv, .json, .sdf or .txt extension",
                    path.display()
                ),
            },
            (None, None) => OutputFormat::Table,
        };
        Ok(Self {
            path: options.output.clone(),
            format,
        })
    }
}
