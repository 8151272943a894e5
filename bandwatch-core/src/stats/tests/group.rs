use super::event;
use crate::config::SortBy;
use crate::stats::{IpStats, StatKey, StatsTable, group_prefixes};
use pretty_assertions::assert_eq;

fn key(net: &str) -> StatKey {
    StatKey::new("", net.parse().unwrap())
}

fn record(size: u64, url: &str, secs: i64) -> IpStats {
    let mut stats = IpStats::default();
    stats.update_with(&event(url, size, secs));
    stats
}

fn totals(table: &StatsTable) -> (u64, u64) {
    table
        .values()
        .fold((0, 0), |(s, r), v| (s + v.size, r + v.requests))
}

#[test]
fn test_siblings_merge_and_budget_stops_walk() {
    let mut table = StatsTable::default();
    table.insert(key("10.0.0.0/24"), record(100, "/a", 0));
    table.insert(key("10.0.1.0/24"), record(90, "/b", 10));
    table.insert(key("192.168.0.0/24"), record(85, "/c", 0));
    table.insert(key("10.0.2.0/24"), record(80, "/d", 0));

    let keys = group_prefixes(&mut table, SortBy::Size, "", 2);

    assert_eq!(keys, vec![key("10.0.0.0/23"), key("192.168.0.0/24")]);
    let merged = &table[&key("10.0.0.0/23")];
    assert_eq!(merged.size, 190);
    assert_eq!(merged.requests, 2);
    assert_eq!(merged.last_url(), "/b");
    assert!(!table.contains_key(&key("10.0.0.0/24")));
    assert!(!table.contains_key(&key("10.0.1.0/24")));
    assert!(table.contains_key(&key("10.0.2.0/24")));
}

#[test]
fn test_merges_cascade_upwards() {
    let mut table = StatsTable::default();
    table.insert(key("10.0.0.0/24"), record(40, "/a", 0));
    table.insert(key("10.0.1.0/24"), record(30, "/b", 1));
    table.insert(key("10.0.2.0/24"), record(20, "/c", 2));
    table.insert(key("10.0.3.0/24"), record(10, "/d", 3));

    let keys = group_prefixes(&mut table, SortBy::Size, "", 4);

    assert_eq!(keys, vec![key("10.0.0.0/22")]);
    assert_eq!(table.len(), 1);
    let root = &table[&key("10.0.0.0/22")];
    assert_eq!(root.size, 100);
    assert_eq!(root.requests, 4);
    assert_eq!(root.last_url(), "/d");
}

#[test]
fn test_sum_conserved() {
    let mut table = StatsTable::default();
    for (i, size) in [7u64, 300, 12, 45, 9, 81, 2, 66].into_iter().enumerate() {
        table.insert(key(&format!("172.16.{i}.0/24")), record(size, "/x", i as i64));
    }
    table.insert(key("8.8.8.0/24"), record(1000, "/y", 0));
    let before = totals(&table);

    let keys = group_prefixes(&mut table, SortBy::Size, "", 3);

    assert_eq!(totals(&table), before);
    assert!(keys.len() <= 3);
}

#[test]
fn test_climb_stops_at_root() {
    let mut table = StatsTable::default();
    table.insert(key("0.0.0.0/1"), record(10, "/a", 0));
    table.insert(key("128.0.0.0/1"), record(5, "/b", 0));

    let keys = group_prefixes(&mut table, SortBy::Size, "", 0);

    assert_eq!(keys, vec![key("0.0.0.0/0")]);
    assert_eq!(table[&key("0.0.0.0/0")].size, 15);
}

#[test]
fn test_other_servers_untouched() {
    let mut table = StatsTable::default();
    table.insert(key("10.0.0.0/24"), record(1, "/a", 0));
    table.insert(key("10.0.1.0/24"), record(1, "/a", 0));
    let other = StatKey::new("other", "10.0.0.0/24".parse().unwrap());
    table.insert(other.clone(), record(1, "/a", 0));

    group_prefixes(&mut table, SortBy::Size, "", 10);

    assert!(table.contains_key(&other));
    assert!(table.contains_key(&key("10.0.0.0/23")));
}

#[test]
fn test_unlimited_budget_without_siblings_keeps_everything() {
    let mut table = StatsTable::default();
    table.insert(key("10.0.0.0/24"), record(3, "/a", 0));
    table.insert(key("10.0.4.0/24"), record(2, "/a", 0));
    table.insert(key("10.0.8.0/24"), record(1, "/a", 0));

    let keys = group_prefixes(&mut table, SortBy::Size, "", 0);

    assert_eq!(
        keys,
        vec![key("10.0.0.0/24"), key("10.0.4.0/24"), key("10.0.8.0/24")]
    );
}
