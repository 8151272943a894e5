mod humanize;

use chrono::{DateTime, TimeZone, Utc};

pub(super) fn at(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
}
