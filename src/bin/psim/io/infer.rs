use std::path::Path;

use pharmsim::io::Format;

use crate::cli::OutputFormat;

pub fn output(path: &Path) -> Option<OutputFormat> {
    let ext = path.extension()?.to_str()?.to_lowercase();
    if matches!(ext.as_str(), "txt" | "text") {
        return Some(OutputFormat::Table);
    }
    match Format::from_extension(&ext)? {
        Format::Csv => Some(OutputFormat::Csv),
        Format::Json => Some(OutputFormat::Json),
        Format::Sdf => Some(OutputFormat::Sdf),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn infers_from_extension_case_insensitively() {
        assert_eq!(output(Path::new("curve.CSV")), Some(OutputFormat::Csv));
        assert_eq!(output(Path::new("run/result.json")), Some(OutputFormat::Json));
        assert_eq!(output(Path::new("aspirin.mol")), Some(OutputFormat::Sdf));
        assert_eq!(output(Path::new("report.txt")), Some(OutputFormat::Table));
    }

    #[test]
    fn unknown_extension_is_none() {
        assert_eq!(output(Path::new("plot.png")), None);
        assert_eq!(output(Path::new("noext")), None);
    }
}
