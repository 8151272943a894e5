use chrono::{DateTime, Utc};

/// One access-log record after parsing.
///
/// Parsers produce these; the analyzer only ever reads them. `server` is empty
/// when the log format carries no virtual-server label, and `discard` lets a
/// parser hand back a well-formed record that must not be counted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LogEvent {
    pub size: u64,
    pub client: String,
    pub time: DateTime<Utc>,
    pub url: String,
    pub server: String,
    pub user_agent: String,
    pub discard: bool,
}
