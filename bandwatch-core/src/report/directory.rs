use crate::config::SortBy;
use crate::report::humanize::{format_absolute, format_iec, format_relative};
use crate::report::table::{Align, TextTable};
use crate::stats::{DirectoryTable, rank_directories, row_budget};
use chrono::{DateTime, Utc};

/// One line of the per-directory report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryRow {
    pub directory: String,
    pub size: u64,
    pub requests: u64,
    pub average: u64,
    pub clients: usize,
    pub last_access: String,
}

pub fn build_directory_rows(
    table: &DirectoryTable,
    top_n: usize,
    sort_by: SortBy,
    absolute: bool,
    now: DateTime<Utc>,
) -> Vec<DirectoryRow> {
    let names = rank_directories(table, sort_by == SortBy::Requests);
    let budget = row_budget(top_n, names.len());

    names
        .into_iter()
        .take(budget)
        .map(|name| {
            let stats = &table[name];
            let accessed = stats.recency.accessed;
            DirectoryRow {
                directory: name.to_string(),
                size: stats.size,
                requests: stats.requests,
                average: stats.average(),
                clients: stats.clients.len(),
                last_access: if absolute {
                    format_absolute(accessed)
                } else {
                    format_relative(accessed, now)
                },
            }
        })
        .collect()
}

pub fn render_directory_rows(rows: &[DirectoryRow]) -> String {
    let mut table = TextTable::new(&[
        ("Directory", Align::Left),
        ("Bytes", Align::Right),
        ("Reqs", Align::Right),
        ("Avg", Align::Right),
        ("Clients", Align::Right),
        ("Last Access", Align::Right),
    ]);
    for row in rows {
        table.push(
            vec![
                row.directory.clone(),
                format_iec(row.size),
                row.requests.to_string(),
                format_iec(row.average),
                row.clients.to_string(),
                row.last_access.clone(),
            ],
            Vec::new(),
        );
    }
    table.render(false)
}
