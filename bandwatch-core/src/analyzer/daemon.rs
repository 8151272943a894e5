use crate::event::LogEvent;
use crate::report::{format_absolute, format_iec};
use crate::stats::IpStats;
use chrono::{DateTime, Utc};
use ipnet::IpNet;
use tracing::info;

/// Crossings of the `--print-delta` interval for a prefix caused by one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub prefix: IpNet,
    /// Cumulative bytes at the time of the crossing.
    pub size: u64,
    pub first_seen: Option<DateTime<Utc>>,
    pub url: String,
    /// Whole intervals crossed; one log line is written for each.
    pub times: u64,
}

impl Notification {
    pub fn log(&self) {
        let size = format_iec(self.size);
        let first_seen = format_absolute(self.first_seen);
        for _ in 0..self.times {
            info!(
                prefix = %self.prefix,
                size = %size,
                first_seen = %first_seen,
                url = %self.url,
                "transfer interval crossed"
            );
        }
    }
}

/// Counts the whole `interval`s that `stats.size` has moved past the last
/// reported size, then advances the reported size by exactly those intervals
/// so the remainder carries over.
pub(crate) fn track_delta(
    stats: &mut IpStats,
    prefix: IpNet,
    event: &LogEvent,
    interval: u64,
) -> Option<Notification> {
    if stats.last_reported_size == 0 && stats.first_seen.is_none() {
        stats.first_seen = Some(event.time);
    }

    let delta = stats.size.saturating_sub(stats.last_reported_size);
    let times = delta.checked_div(interval).unwrap_or(0);
    if times == 0 {
        return None;
    }

    stats.last_reported_size += times * interval;

    Some(Notification {
        prefix,
        size: stats.size,
        first_seen: stats.first_seen,
        url: event.url.clone(),
        times,
    })
}
