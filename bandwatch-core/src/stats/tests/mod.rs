mod group;
mod key;
mod sort;

use crate::event::LogEvent;
use chrono::{DateTime, TimeZone, Utc};

pub(super) fn at(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
}

pub(super) fn event(url: &str, size: u64, secs: i64) -> LogEvent {
    LogEvent {
        size,
        client: "10.0.0.1".into(),
        time: at(secs),
        url: url.into(),
        user_agent: "curl/8.0".into(),
        ..LogEvent::default()
    }
}
