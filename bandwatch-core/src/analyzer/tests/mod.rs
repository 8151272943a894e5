
use crate::analyzer::Analyzer;
use crate::config::{AnalyzerConfig, ByteSize, RunMode};
use crate::event::LogEvent;
use chrono::{DateTime, TimeZone, Utc};

pub(super) fn at(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
}

pub(super) fn config(mode: RunMode) -> AnalyzerConfig {
    AnalyzerConfig {
        mode,
        threshold: ByteSize(0),
        ..AnalyzerConfig::default()
    }
}

pub(super) fn analyzer(mode: RunMode) -> Analyzer {
    Analyzer::new(config(mode)).unwrap()
}

pub(super) fn event(client: &str, size: u64, url: &str, secs: i64) -> LogEvent {
    LogEvent {
        size,
        client: client.into(),
        time: at(secs),
        url: url.into(),
        ..LogEvent::default()
    }
}

pub(super) fn json_line(client: &str, size: u64, url: &str, secs: i64, server: &str) -> String {
    format!(
        r#"{{"timestamp":{},"clientip":"{client}","serverip":"{server}","url":"{url}","size":{size},"user_agent":"test"}}"#,
        1_700_000_000 + secs
    )
}
