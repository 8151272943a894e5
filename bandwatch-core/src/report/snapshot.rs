use crate::config::{AnalyzerConfig, SortBy};
use crate::netstat::ConnectionCounts;
use crate::report::humanize::{format_absolute, format_iec, format_relative};
use crate::report::table::{Align, TextTable};
use crate::report::truncate::UrlTruncation;
use crate::stats::{StatKey, StatsTable};
use chrono::{DateTime, Utc};
use ipnet::IpNet;
use std::collections::HashMap;

/// What a ranked snapshot should contain.
#[derive(Debug, Clone)]
pub struct SnapshotOptions {
    pub top_n: usize,
    pub sort_by: SortBy,
    pub server: String,
    pub absolute: bool,
    pub truncation: UrlTruncation,
    pub group: bool,
}

impl SnapshotOptions {
    pub fn from_config(config: &AnalyzerConfig) -> Self {
        Self {
            top_n: config.top_n,
            sort_by: config.sort_by,
            server: config.report_server().to_string(),
            absolute: config.absolute,
            truncation: UrlTruncation::new(config.truncate, config.truncate_to),
            group: config.group,
        }
    }
}

/// One rendered line of the prefix table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotRow {
    pub prefix: IpNet,
    pub connections: Option<usize>,
    pub size: u64,
    pub requests: u64,
    pub average: u64,
    pub url: String,
    pub url_since: String,
    pub url_last: String,
    pub last_access: Option<DateTime<Utc>>,
    pub user_agents: usize,
    /// Last access moved since the row was last displayed.
    pub changed: bool,
}

/// Last access time per prefix as of the previous redraw.
#[derive(Debug, Default)]
pub struct DisplayRecord {
    seen: HashMap<IpNet, Option<DateTime<Utc>>>,
}

impl DisplayRecord {
    pub fn is_changed(&self, prefix: IpNet, last_access: Option<DateTime<Utc>>) -> bool {
        self.seen.get(&prefix) != Some(&last_access)
    }

    pub fn remember(&mut self, rows: &[SnapshotRow]) {
        for row in rows {
            self.seen.insert(row.prefix, row.last_access);
        }
    }
}

pub fn build_rows(
    table: &StatsTable,
    keys: &[StatKey],
    opts: &SnapshotOptions,
    display: Option<&DisplayRecord>,
    connections: Option<&ConnectionCounts>,
    now: DateTime<Utc>,
) -> Vec<SnapshotRow> {
    let format_time = |t: Option<DateTime<Utc>>| {
        if opts.absolute {
            format_absolute(t)
        } else {
            format_relative(t, now)
        }
    };

    keys.iter()
        .filter_map(|key| table.get(key).map(|stats| (key, stats)))
        .map(|(key, stats)| {
            let access = stats.recency.accessed;
            SnapshotRow {
                prefix: key.prefix,
                connections: connections.and_then(|c| c.get(&key.prefix).copied()),
                size: stats.size,
                requests: stats.requests,
                average: stats.average(),
                url: opts.truncation.apply(stats.last_url()),
                url_since: format_time(stats.recency.updated),
                url_last: format_time(access),
                last_access: access,
                user_agents: stats.user_agents.len(),
                changed: display.is_some_and(|d| d.is_changed(key.prefix, access)),
            }
        })
        .collect()
}

/// Lays rows out as the prefix table. The `Conn` column is present only
/// when `show_connections` is set.
pub fn render_rows(rows: &[SnapshotRow], show_connections: bool, color: bool) -> String {
    let mut columns = vec![("CIDR", Align::Right)];
    if show_connections {
        columns.push(("Conn", Align::Right));
    }
    columns.extend([
        ("Bytes", Align::Right),
        ("Reqs", Align::Right),
        ("Avg", Align::Right),
        ("URL", Align::Left),
        ("URL Since", Align::Right),
        ("URL Last", Align::Right),
        ("UA", Align::Right),
    ]);

    let mut table = TextTable::new(&columns);
    for row in rows {
        let mut cells = vec![row.prefix.to_string()];
        if show_connections {
            cells.push(row.connections.map(|c| c.to_string()).unwrap_or_default());
        }
        cells.extend([
            format_iec(row.size),
            row.requests.to_string(),
            format_iec(row.average),
            row.url.clone(),
            row.url_since.clone(),
            row.url_last.clone(),
            row.user_agents.to_string(),
        ]);

        let bold = if row.changed {
            vec![true; cells.len()]
        } else {
            let mut bold = vec![false; cells.len()];
            if show_connections {
                bold[1] = true;
            }
            bold
        };
        table.push(cells, bold);
    }
    table.render(color)
}

/// `server: size` lines, in the order given.
pub fn render_totals(totals: &[(String, u64)]) -> String {
    totals
        .iter()
        .map(|(server, size)| format!("{server}: {}\n", format_iec(*size)))
        .collect()
}
