mod error;
mod size;


pub use error::ConfigError;
pub use size::ByteSize;

use std::fmt::{Display, Formatter};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Log file read when none is given on the command line.
pub const DEFAULT_LOG_FILE: &str = "/var/log/nginx/mirrors/access_json.log";

pub const DEFAULT_PARSER: &str = "nginx-json";

/// Ranking criterion for reports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SortBy {
    #[default]
    Size,
    Requests,
    /// Only meaningful for directory reports.
    Directory,
    /// Number of distinct user agents per prefix.
    UserAgents,
}

impl FromStr for SortBy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "size" => Ok(Self::Size),
            "requests" | "reqs" => Ok(Self::Requests),
            "directory" | "dir" => Ok(Self::Directory),
            "user-agents" | "ua" | "uas" => Ok(Self::UserAgents),
            _ => Err(ConfigError::UnknownSortKey(s.to_string())),
        }
    }
}

impl Display for SortBy {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Size => "size",
            Self::Requests => "requests",
            Self::Directory => "directory",
            Self::UserAgents => "user-agents",
        })
    }
}

/// How the analyzer is being driven.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum RunMode {
    /// Follow a log and redraw a dashboard periodically.
    #[default]
    Live,
    /// Follow a log and emit a notification every `print_delta` bytes per prefix.
    Daemon,
    /// Read logs to the end and print one report.
    Analyze,
    /// Like `Analyze` but reports per top-level directory.
    DirAnalyze,
}

impl RunMode {
    pub fn is_batch(self) -> bool {
        matches!(self, Self::Analyze | Self::DirAnalyze)
    }
}

impl Display for RunMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Live => "run",
            Self::Daemon => "daemon",
            Self::Analyze => "analyze",
            Self::DirAnalyze => "dir-analyze",
        })
    }
}

/// Everything the analyzer and its front-ends need to know.
#[derive(Debug, Clone)]
pub struct AnalyzerConfig {
    pub mode: RunMode,

    // Report shape
    pub absolute: bool,
    pub group: bool,
    pub sort_by: SortBy,
    pub top_n: usize,
    pub truncate: bool,
    pub truncate_to: usize,

    // Aggregation
    pub parser: String,
    pub prefix_v4: u8,
    pub prefix_v6: u8,
    pub server: String,
    pub threshold: ByteSize,
    pub print_delta: ByteSize,

    // Input and output
    pub files: Vec<PathBuf>,
    pub whole: bool,
    pub log_output: Option<PathBuf>,
    pub no_netstat: bool,
    pub refresh: Duration,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            mode: RunMode::default(),
            absolute: false,
            group: false,
            sort_by: SortBy::default(),
            top_n: 10,
            truncate: false,
            truncate_to: 0,
            parser: DEFAULT_PARSER.to_string(),
            prefix_v4: 24,
            prefix_v6: 48,
            server: String::new(),
            threshold: ByteSize(10_000_000),
            print_delta: ByteSize(1_000_000_000),
            files: Vec::new(),
            whole: false,
            log_output: None,
            no_netstat: false,
            refresh: Duration::from_secs(5),
        }
    }
}

impl AnalyzerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.prefix_v4 > 32 {
            return Err(ConfigError::PrefixV4(self.prefix_v4));
        }
        if self.prefix_v6 > 128 {
            return Err(ConfigError::PrefixV6(self.prefix_v6));
        }
        if self.refresh.is_zero() {
            return Err(ConfigError::ZeroRefresh);
        }
        if self.print_delta.get() == 0 {
            return Err(ConfigError::ZeroPrintDelta);
        }

        let sort_ok = match self.sort_by {
            SortBy::Directory => self.mode == RunMode::DirAnalyze,
            SortBy::UserAgents => self.mode != RunMode::DirAnalyze,
            SortBy::Size | SortBy::Requests => true,
        };
        if !sort_ok {
            return Err(ConfigError::SortUnavailable {
                sort_by: self.sort_by,
                mode: self.mode,
            });
        }

        if self.group && !self.mode.is_batch() {
            return Err(ConfigError::GroupUnavailable(self.mode));
        }

        if self.mode == RunMode::Daemon && self.files.len() > 1 {
            return Err(ConfigError::TooManyFiles {
                mode: self.mode,
                count: self.files.len(),
            });
        }

        Ok(())
    }

    /// Whether every record is also accounted under the empty server label.
    ///
    /// Only the live dashboard without a server filter shows a cross-server
    /// total; every other mode keys records by their own server.
    pub fn track_totals(&self) -> bool {
        self.mode == RunMode::Live && self.server.is_empty()
    }

    /// Server label the reports are drawn from.
    pub fn report_server(&self) -> &str {
        if self.track_totals() { "" } else { &self.server }
    }

    /// Input files, falling back to the default log.
    pub fn input_files(&self) -> Vec<PathBuf> {
        if self.files.is_empty() {
            vec![PathBuf::from(DEFAULT_LOG_FILE)]
        } else {
            self.files.clone()
        }
    }
}
