mod caddy;
mod clf;
mod error;
mod goaccess;
mod nginx_combined;
mod nginx_json;
mod registry;
mod rsync_proxy;
mod tencent_cdn;

#[cfg(test)]
mod tests;

pub use caddy::CaddyJsonParser;
pub use error::{InitError, ParseError};
pub use goaccess::{GOACCESS_CONFIG_ENV, GoAccessParser};
pub use nginx_combined::NginxCombinedParser;
pub use nginx_json::NginxJsonParser;
pub use registry::{ParserMeta, ParserRegistry, RegistryError};
pub use rsync_proxy::RsyncProxyParser;
pub use tencent_cdn::TencentCdnParser;

use crate::event::LogEvent;
use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};

/// Turns one raw access-log line into a [`LogEvent`].
pub trait Parser: Send + Sync {
    fn parse(&self, line: &[u8]) -> Result<LogEvent, ParseError>;
}

/// Converts fractional Unix seconds, as written by nginx and Caddy.
pub(crate) fn unix_seconds(ts: f64) -> Result<DateTime<Utc>, ParseError> {
    if !ts.is_finite() {
        return Err(ParseError::Timestamp(ts.to_string()));
    }
    let secs = ts.trunc();
    let nanos = ((ts - secs) * 1e9).round().clamp(0.0, 999_999_999.0);
    DateTime::from_timestamp(secs as i64, nanos as u32)
        .ok_or_else(|| ParseError::Timestamp(ts.to_string()))
}

/// Parses a wall-clock time without an offset as local time.
pub(crate) fn local_time(raw: &str, format: &str) -> Result<DateTime<Utc>, ParseError> {
    NaiveDateTime::parse_from_str(raw, format)
        .ok()
        .and_then(|naive| Local.from_local_datetime(&naive).earliest())
        .map(|t| t.with_timezone(&Utc))
        .ok_or_else(|| ParseError::Timestamp(raw.to_string()))
}

pub(crate) fn parse_size(raw: &[u8]) -> Result<u64, ParseError> {
    std::str::from_utf8(raw)
        .ok()
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| ParseError::Size(lossy(raw)))
}

pub(crate) fn lossy(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}
