use crate::config::{RunMode, SortBy};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    // Value parsing
    #[error("invalid size '{input}': {reason}")]
    InvalidSize { input: String, reason: &'static str },

    #[error("unknown sort key '{0}', must be one of: size, requests, directory, user-agents")]
    UnknownSortKey(String),

    // Validation
    #[error("IPv4 prefix length must be at most 32, got {0}")]
    PrefixV4(u8),

    #[error("IPv6 prefix length must be at most 128, got {0}")]
    PrefixV6(u8),

    #[error("refresh interval must be at least one second")]
    ZeroRefresh,

    #[error("print delta must be greater than zero")]
    ZeroPrintDelta,

    #[error("sorting by '{sort_by}' is not available in {mode} mode")]
    SortUnavailable { sort_by: SortBy, mode: RunMode },

    #[error("grouping is only available in analyze and dir-analyze modes, not {0}")]
    GroupUnavailable(RunMode),

    #[error("{mode} mode reads exactly one log file, got {count}")]
    TooManyFiles { mode: RunMode, count: usize },
}

impl ConfigError {
    pub fn invalid_size(input: impl Into<String>, reason: &'static str) -> Self {
        Self::InvalidSize {
            input: input.into(),
            reason,
        }
    }
}
