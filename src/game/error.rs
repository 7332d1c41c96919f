use thiserror::Error;

/// Errors raised by the design game outside the in-session messages.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Chem(#[from] crate::chem::Error),

    #[error("failed to render molecule: {0}")]
    Render(#[from] crate::io::Error),

    #[error("unknown functional group '{0}'")]
    UnknownSubstituent(String),

    #[error("unknown game mode '{0}'")]
    UnknownMode(String),

    #[error("render cache capacity must be at least 1")]
    ZeroCapacity,
}
