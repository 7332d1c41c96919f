use super::Format;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O operation failed: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    #[error("failed to parse {format} data: {details} (at line ~{line})")]
    Parse {
        format: Format,
        line: usize,
        details: String,
    },

    #[error("the '{0}' format is not supported for this write operation")]
    UnsupportedWriteFormat(Format),

    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("profile '{title}' has a series of length {found}, expected {expected}")]
    RaggedProfile {
        title: String,
        expected: usize,
        found: usize,
    },
}

impl Error {
    pub fn parse(format: Format, line: usize, details: impl Into<String>) -> Self {
        Self::Parse {
            format,
            line,
            details: details.into(),
        }
    }
}
