use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    /// A well-formed line the parser deliberately skips.
    #[error("line ignored")]
    Ignored,

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unexpected format: {0}")]
    Format(&'static str),

    #[error("invalid format: expected {expected} fields, got {got}")]
    FieldCount { expected: &'static str, got: usize },

    #[error("invalid size '{0}'")]
    Size(String),

    #[error("invalid timestamp '{0}'")]
    Timestamp(String),
}

impl ParseError {
    pub fn is_ignored(&self) -> bool {
        matches!(self, Self::Ignored)
    }
}

/// Failure to set up a parser that reads external configuration.
#[derive(Debug, Error)]
pub enum InitError {
    #[error("{0} is not set")]
    MissingEnv(&'static str),

    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("'{0}' is missing from the configuration")]
    MissingKey(&'static str),

    #[error("invalid JSON log-format: {0}")]
    Json(#[from] serde_json::Error),

    #[error("log-format must be a JSON object")]
    NotAnObject,
}
