use crate::event::LogEvent;
use crate::stats::UrlRecency;
use ahash::{AHashMap, AHashSet};
use ipnet::IpNet;

/// Totals for one top-level directory.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DirStats {
    pub size: u64,
    pub requests: u64,
    pub clients: AHashSet<IpNet>,
    pub recency: UrlRecency,
}

impl DirStats {
    pub fn update_with(&mut self, event: &LogEvent, client: IpNet) {
        self.size += event.size;
        self.requests += 1;
        self.clients.insert(client);
        self.recency.observe(&event.url, event.time);
    }

    pub fn average(&self) -> u64 {
        self.size.checked_div(self.requests).unwrap_or(0)
    }
}

pub type DirectoryTable = AHashMap<String, DirStats>;

/// `/` followed by the first path segment of `url`.
///
/// The query string is ignored and an empty path maps to `/`.
pub fn first_directory(url: &str) -> String {
    let path = url.split_once('?').map_or(url, |(path, _)| path);
    let segment = path.trim_matches('/').split('/').next().unwrap_or_default();
    format!("/{segment}")
}

/// Directories ordered by size (or requests when `by_requests`), largest
/// first; ties are broken by name.
pub fn rank_directories(table: &DirectoryTable, by_requests: bool) -> Vec<&str> {
    let mut names: Vec<&str> = table.keys().map(String::as_str).collect();
    names.sort_by(|l, r| {
        let (ls, rs) = (&table[*l], &table[*r]);
        let (lv, rv) = if by_requests {
            (ls.requests, rs.requests)
        } else {
            (ls.size, rs.size)
        };
        rv.cmp(&lv).then_with(|| l.cmp(r))
    });
    names
}
