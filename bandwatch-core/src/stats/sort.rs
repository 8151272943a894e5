use crate::config::SortBy;
use crate::stats::{IpStats, StatKey, StatsTable};
use std::cmp::Ordering;

fn metric(stats: &IpStats, sort_by: SortBy) -> u64 {
    match sort_by {
        SortBy::Size | SortBy::Directory => stats.size,
        SortBy::Requests => stats.requests,
        SortBy::UserAgents => stats.user_agents.len() as u64,
    }
}

/// Keys under `server`, best first.
///
/// Equal metrics fall back to key order so repeated calls on an unchanged
/// table agree.
pub fn rank(table: &StatsTable, sort_by: SortBy, server: &str) -> Vec<StatKey> {
    let mut ranked: Vec<(&StatKey, u64)> = table
        .iter()
        .filter(|(key, _)| key.server == server)
        .map(|(key, stats)| (key, metric(stats, sort_by)))
        .collect();

    ranked.sort_by(|(lk, lv), (rk, rv)| match rv.cmp(lv) {
        Ordering::Equal => lk.cmp(rk),
        other => other,
    });

    ranked.into_iter().map(|(key, _)| key.clone()).collect()
}

/// Clips `len` to the `top_n` row budget, where 0 means unlimited.
pub fn row_budget(top_n: usize, len: usize) -> usize {
    if top_n == 0 { len } else { top_n.min(len) }
}
