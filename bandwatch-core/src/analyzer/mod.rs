mod daemon;
mod error;
mod pipeline;
mod shared;

#[cfg(test)]
mod tests;

pub use daemon::Notification;
pub use error::{FanInError, IngestError, SetupError};
pub use pipeline::{LineSink, run_fan_in, run_loop};
pub use shared::SharedAnalyzer;

use crate::config::{AnalyzerConfig, RunMode, SortBy};
use crate::event::LogEvent;
use crate::netstat::ConnectionCounts;
use crate::parser::{ParseError, Parser, ParserRegistry};
use crate::report::{
    DirectoryRow, DisplayRecord, SnapshotOptions, SnapshotRow, build_directory_rows, build_rows,
};
use crate::stats::{
    DirectoryTable, PrefixLengths, StatKey, StatsTable, first_directory, group_prefixes, rank,
    row_budget,
};
use ahash::AHashMap;
use chrono::{DateTime, Utc};
use std::net::IpAddr;
use std::sync::Arc;
use tracing::warn;

/// The aggregation engine: owns the statistics table and folds events into it.
///
/// Batch and daemon runs own an `Analyzer` directly. The live dashboard shares
/// one through [`SharedAnalyzer`].
pub struct Analyzer {
    config: AnalyzerConfig,
    prefixes: PrefixLengths,
    parser: Arc<dyn Parser>,
    stats: StatsTable,
    directories: Option<DirectoryTable>,
}

impl Analyzer {
    /// Validates `config` and resolves its parser from the built-in registry.
    pub fn new(config: AnalyzerConfig) -> Result<Self, SetupError> {
        let parser = ParserRegistry::builtin().build(&config.parser)?;
        Self::with_parser(config, parser)
    }

    pub fn with_parser(config: AnalyzerConfig, parser: Arc<dyn Parser>) -> Result<Self, SetupError> {
        config.validate()?;
        let prefixes = PrefixLengths::new(config.prefix_v4, config.prefix_v6)?;
        let directories = (config.mode == RunMode::DirAnalyze).then(DirectoryTable::default);

        Ok(Self {
            config,
            prefixes,
            parser,
            stats: StatsTable::default(),
            directories,
        })
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    pub fn prefixes(&self) -> PrefixLengths {
        self.prefixes
    }

    pub fn parser(&self) -> Arc<dyn Parser> {
        Arc::clone(&self.parser)
    }

    pub fn stats(&self) -> &StatsTable {
        &self.stats
    }

    pub fn directories(&self) -> Option<&DirectoryTable> {
        self.directories.as_ref()
    }

    /// Folds one event into the table.
    ///
    /// Discarded events, events for another server and events below the size
    /// threshold leave the table untouched. In daemon mode the result holds
    /// the interval crossings this event caused, if any.
    pub fn ingest(&mut self, event: &LogEvent) -> Result<Option<Notification>, IngestError> {
        if event.discard {
            return Ok(None);
        }
        if !self.config.server.is_empty() && event.server != self.config.server {
            return Ok(None);
        }
        if event.size < self.config.threshold.get() {
            return Ok(None);
        }

        let addr: IpAddr = event
            .client
            .parse()
            .map_err(|source| IngestError::Address {
                client: event.client.clone(),
                line: None,
                source,
            })?;
        let prefix = self.prefixes.mask(addr);

        if self.config.track_totals() {
            self.record(StatKey::new(event.server.as_str(), prefix), event);
            if !event.server.is_empty() {
                self.record(StatKey::new("", prefix), event);
            }
        } else {
            self.record(StatKey::new(self.config.server.as_str(), prefix), event);
        }

        if let Some(directories) = self.directories.as_mut() {
            directories
                .entry(first_directory(&event.url))
                .or_default()
                .update_with(event, prefix);
        }

        if self.config.mode != RunMode::Daemon {
            return Ok(None);
        }

        let key = StatKey::new(self.config.server.as_str(), prefix);
        let interval = self.config.print_delta.get();
        Ok(self
            .stats
            .get_mut(&key)
            .and_then(|stats| daemon::track_delta(stats, prefix, event, interval)))
    }

    fn record(&mut self, key: StatKey, event: &LogEvent) {
        self.stats.entry(key).or_default().update_with(event);
    }

    /// Parses `line` with the configured parser, then [`ingest`](Self::ingest)s it.
    ///
    /// Lines the parser deliberately ignores are not errors.
    pub fn ingest_line(&mut self, line: &[u8]) -> Result<Option<Notification>, IngestError> {
        match self.parser.parse(line) {
            Ok(event) => self.ingest(&event).map_err(|e| e.with_line(line)),
            Err(ParseError::Ignored) => Ok(None),
            Err(e) => Err(IngestError::parse(line, e)),
        }
    }

    /// Keys under `server`, best first.
    pub fn rank(&self, sort_by: SortBy, server: &str) -> Vec<StatKey> {
        rank(&self.stats, sort_by, server)
    }

    /// Merges sibling prefixes under `server` to fit `top_n` rows. Destructive.
    pub fn group(&mut self, sort_by: SortBy, server: &str, top_n: usize) -> Vec<StatKey> {
        group_prefixes(&mut self.stats, sort_by, server, top_n)
    }

    /// Up to `opts.top_n` ranked rows ready for display.
    ///
    /// Grouping, when requested, rewrites the table first. Rows whose last
    /// access differs from `display` are flagged bold; updating `display`
    /// is left to the caller.
    pub fn snapshot(
        &mut self,
        opts: &SnapshotOptions,
        display: Option<&DisplayRecord>,
        connections: Option<&ConnectionCounts>,
        now: DateTime<Utc>,
    ) -> Vec<SnapshotRow> {
        let keys = if opts.group {
            self.group(opts.sort_by, &opts.server, opts.top_n)
        } else {
            let mut keys = self.rank(opts.sort_by, &opts.server);
            keys.truncate(row_budget(opts.top_n, keys.len()));
            keys
        };
        build_rows(&self.stats, &keys, opts, display, connections, now)
    }

    /// Servers seen so far, excluding the unlabelled total.
    pub fn servers(&self) -> Vec<String> {
        let mut servers: Vec<String> = self
            .stats
            .keys()
            .filter(|key| !key.server.is_empty())
            .map(|key| key.server.clone())
            .collect();
        servers.sort_unstable();
        servers.dedup();
        servers
    }

    /// Total bytes per server label, largest first.
    pub fn server_totals(&self) -> Vec<(String, u64)> {
        let mut totals: AHashMap<&str, u64> = AHashMap::new();
        for (key, stats) in &self.stats {
            *totals.entry(key.server.as_str()).or_default() += stats.size;
        }

        let mut totals: Vec<(String, u64)> = totals
            .into_iter()
            .map(|(server, size)| (server.to_string(), size))
            .collect();
        totals.sort_by(|(ls, lv), (rs, rv)| rv.cmp(lv).then_with(|| ls.cmp(rs)));
        totals
    }

    /// Per-directory rows, or nothing when directories are not tracked.
    pub fn directory_report(
        &self,
        top_n: usize,
        sort_by: SortBy,
        now: DateTime<Utc>,
    ) -> Vec<DirectoryRow> {
        match &self.directories {
            Some(table) => build_directory_rows(table, top_n, sort_by, self.config.absolute, now),
            None => Vec::new(),
        }
    }
}

/// Logs the outcome of one line the way every drive mode reports it.
pub(crate) fn report_outcome(result: Result<Option<Notification>, IngestError>) {
    match result {
        Ok(notification) => notification.iter().for_each(Notification::log),
        Err(e) => warn!(error = %e, "analyze error"),
    }
}
