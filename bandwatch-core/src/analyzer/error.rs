use crate::config::ConfigError;
use crate::parser::{ParseError, RegistryError};
use crate::source::SourceError;
use std::fmt::{Display, Formatter};
use std::net::AddrParseError;
use thiserror::Error;

/// Failure to set up an [`Analyzer`](crate::analyzer::Analyzer).
#[derive(Debug, Error)]
pub enum SetupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("invalid parser: {0}")]
    Parser(#[from] RegistryError),
}

/// A single line or event that could not be counted.
///
/// Never fatal: the line is reported and ingestion moves on.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("parse error: {source}; got line: {line:?}")]
    Parse {
        line: String,
        #[source]
        source: ParseError,
    },

    #[error("invalid client address '{client}': {source}{}", line_suffix(.line))]
    Address {
        client: String,
        line: Option<String>,
        #[source]
        source: AddrParseError,
    },
}

impl IngestError {
    pub fn parse(line: &[u8], source: ParseError) -> Self {
        Self::Parse {
            line: String::from_utf8_lossy(line).into_owned(),
            source,
        }
    }

    /// Attaches the raw log line to errors raised after parsing.
    pub fn with_line(self, raw: &[u8]) -> Self {
        match self {
            Self::Address {
                client,
                line: None,
                source,
            } => Self::Address {
                client,
                line: Some(String::from_utf8_lossy(raw).into_owned()),
                source,
            },
            other => other,
        }
    }
}

fn line_suffix(line: &Option<String>) -> String {
    line.as_ref()
        .map(|line| format!("; got line: {line:?}"))
        .unwrap_or_default()
}

/// Every source that failed during a fan-in run.
#[derive(Debug)]
pub struct FanInError {
    pub errors: Vec<SourceError>,
}

impl Display for FanInError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for (i, err) in self.errors.iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            write!(f, "{err}")?;
        }
        Ok(())
    }
}

impl std::error::Error for FanInError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.errors
            .first()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}
