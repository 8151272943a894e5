use super::event;
use crate::config::SortBy;
use crate::stats::{IpStats, StatKey, StatsTable, rank, row_budget};
use pretty_assertions::assert_eq;

fn key(server: &str, net: &str) -> StatKey {
    StatKey::new(server, net.parse().unwrap())
}

fn record(size: u64, requests: u64, agents: &[&str]) -> IpStats {
    let mut stats = IpStats::default();
    for i in 0..requests {
        let mut e = event("/f", size / requests, i as i64);
        e.user_agent = agents[(i as usize) % agents.len()].to_string();
        stats.update_with(&e);
    }
    stats
}

fn table() -> StatsTable {
    let mut table = StatsTable::default();
    table.insert(key("", "10.0.0.0/24"), record(900, 1, &["a"]));
    table.insert(key("", "10.0.1.0/24"), record(500, 5, &["a", "b", "c"]));
    table.insert(key("", "10.0.2.0/24"), record(700, 2, &["a", "b"]));
    table.insert(key("other", "10.0.3.0/24"), record(9000, 9, &["a"]));
    table
}

#[test]
fn test_rank_by_size() {
    let keys = rank(&table(), SortBy::Size, "");
    assert_eq!(
        keys,
        vec![
            key("", "10.0.0.0/24"),
            key("", "10.0.2.0/24"),
            key("", "10.0.1.0/24"),
        ]
    );
}

#[test]
fn test_rank_by_requests() {
    let keys = rank(&table(), SortBy::Requests, "");
    assert_eq!(keys[0], key("", "10.0.1.0/24"));
    assert_eq!(keys[2], key("", "10.0.0.0/24"));
}

#[test]
fn test_rank_by_user_agents() {
    let keys = rank(&table(), SortBy::UserAgents, "");
    assert_eq!(keys[0], key("", "10.0.1.0/24"));
    assert_eq!(keys[1], key("", "10.0.2.0/24"));
}

#[test]
fn test_rank_filters_server() {
    let keys = rank(&table(), SortBy::Size, "other");
    assert_eq!(keys, vec![key("other", "10.0.3.0/24")]);
    assert!(rank(&table(), SortBy::Size, "missing").is_empty());
}

#[test]
fn test_rank_is_repeatable_with_ties() {
    let mut table = StatsTable::default();
    for i in 0..32 {
        table.insert(key("", &format!("10.0.{i}.0/24")), record(100, 1, &["a"]));
    }

    let first = rank(&table, SortBy::Size, "");
    let second = rank(&table, SortBy::Size, "");
    assert_eq!(first, second);
    assert_eq!(first[0], key("", "10.0.0.0/24"));
}

#[test]
fn test_row_budget() {
    assert_eq!(row_budget(0, 7), 7);
    assert_eq!(row_budget(10, 7), 7);
    assert_eq!(row_budget(3, 7), 3);
}
