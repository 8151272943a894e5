use crate::event::LogEvent;
use ahash::AHashSet;
use chrono::{DateTime, Utc};

/// User agents longer than this are cut before being counted.
pub const USER_AGENT_MAX_CHARS: usize = 50;

/// The most recently requested URL and when it was seen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UrlRecency {
    pub url: String,
    /// When `url` last changed.
    pub updated: Option<DateTime<Utc>>,
    /// Most recent request for the current `url`.
    pub accessed: Option<DateTime<Utc>>,
}

impl UrlRecency {
    /// Records a request for `url` at `time`.
    ///
    /// A different URL only replaces the current one if it is not older than
    /// the last change, so a late event from a slower source cannot roll the
    /// URL back.
    pub fn observe(&mut self, url: &str, time: DateTime<Utc>) {
        if url != self.url {
            if self.updated.is_none_or(|t| t <= time) {
                self.url.clear();
                self.url.push_str(url);
                self.updated = Some(time);
                self.accessed = Some(time);
            }
        } else if self.accessed.is_none_or(|t| t < time) {
            self.accessed = Some(time);
        }
    }

    /// Combines two histories: the later change wins the URL, access time is
    /// the later of both.
    pub fn merge(&mut self, other: UrlRecency) {
        if self.url == other.url {
            self.updated = earliest(self.updated, other.updated);
        } else if other.updated > self.updated {
            self.url = other.url;
            self.updated = other.updated;
        }
        self.accessed = self.accessed.max(other.accessed);
    }
}

/// Running totals for one `(server, prefix)` key.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IpStats {
    pub size: u64,
    pub requests: u64,
    pub recency: UrlRecency,
    pub user_agents: AHashSet<String>,

    // Daemon mode only
    pub last_reported_size: u64,
    pub first_seen: Option<DateTime<Utc>>,
}

impl IpStats {
    pub fn update_with(&mut self, event: &LogEvent) {
        self.size += event.size;
        self.requests += 1;
        self.recency.observe(&event.url, event.time);

        let agent = truncate_chars(&event.user_agent, USER_AGENT_MAX_CHARS);
        if !self.user_agents.contains(agent) {
            self.user_agents.insert(agent.to_string());
        }
    }

    /// Folds `other` into `self`, as when two sibling networks are combined.
    pub fn merge_with(&mut self, other: IpStats) {
        self.size += other.size;
        self.requests += other.requests;
        self.last_reported_size += other.last_reported_size;
        self.recency.merge(other.recency);
        self.first_seen = earliest(self.first_seen, other.first_seen);
        self.user_agents.extend(other.user_agents);
    }

    /// Average bytes per request.
    pub fn average(&self) -> u64 {
        self.size.checked_div(self.requests).unwrap_or(0)
    }

    pub fn last_url(&self) -> &str {
        &self.recency.url
    }
}

fn earliest(a: Option<DateTime<Utc>>, b: Option<DateTime<Utc>>) -> Option<DateTime<Utc>> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (a, b) => a.or(b),
    }
}

pub(crate) fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
