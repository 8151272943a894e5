use crate::config::{AnalyzerConfig, ByteSize, DEFAULT_PARSER, RunMode, SortBy};
use clap::Args;
use std::path::PathBuf;
use std::time::Duration;

/// Options shared by `run`, `daemon`, `analyze` and `dir-analyze`.
#[derive(Args, Debug, Clone)]
pub struct AnalyzeArgs {
    /// Log files to read [default: /var/log/nginx/mirrors/access_json.log]
    pub files: Vec<PathBuf>,

    /// Number of top items to show (0 for all)
    #[arg(short = 'n', long = "top", default_value_t = 10)]
    pub top_n: usize,

    /// Refresh interval in seconds
    #[arg(short, long, default_value_t = 5)]
    pub refresh: u64,

    /// Only count requests at least this large (e.g. 10MB, 1GiB)
    #[arg(short, long, default_value = "10MB")]
    pub threshold: ByteSize,

    /// Only count requests for this server
    #[arg(short, long, default_value = "")]
    pub server: String,

    /// Sort by size, requests, directory or user-agents
    #[arg(short = 'S', long, default_value = "size")]
    pub sort_by: SortBy,

    /// Show absolute times instead of relative ones
    #[arg(short, long)]
    pub absolute: bool,

    /// Shorten long URLs
    #[arg(long)]
    pub truncate: bool,

    /// Shorten URLs to at most this many bytes, overrides --truncate
    #[arg(long, default_value_t = 0)]
    pub truncate_to: usize,

    /// Group IPv4 addresses by this prefix length
    #[arg(long, default_value_t = 24)]
    pub prefixv4: u8,

    /// Group IPv6 addresses by this prefix length
    #[arg(long, default_value_t = 48)]
    pub prefixv6: u8,

    /// Bytes between daemon notifications for one network
    #[arg(long, default_value = "1GB")]
    pub print_delta: ByteSize,

    /// Write log output to this file instead of stdout
    #[arg(short = 'o', long = "outlog")]
    pub outlog: Option<PathBuf>,

    /// Log parser (see `bandwatch list parsers`)
    #[arg(short, long, default_value = DEFAULT_PARSER)]
    pub parser: String,

    /// Read the whole file before following it
    #[arg(short, long)]
    pub whole: bool,

    /// Merge adjacent networks to fit the top list (analyze modes only)
    #[arg(short, long)]
    pub group: bool,

    /// Do not look up active connections
    #[arg(long)]
    pub no_netstat: bool,
}

impl AnalyzeArgs {
    pub fn into_config(self, mode: RunMode) -> AnalyzerConfig {
        AnalyzerConfig {
            mode,
            absolute: self.absolute,
            group: self.group,
            sort_by: self.sort_by,
            top_n: self.top_n,
            truncate: self.truncate,
            truncate_to: self.truncate_to,
            parser: self.parser,
            prefix_v4: self.prefixv4,
            prefix_v6: self.prefixv6,
            server: self.server,
            threshold: self.threshold,
            print_delta: self.print_delta,
            files: self.files,
            whole: self.whole || mode.is_batch(),
            log_output: self.outlog,
            no_netstat: self.no_netstat,
            refresh: Duration::from_secs(self.refresh),
        }
    }
}
