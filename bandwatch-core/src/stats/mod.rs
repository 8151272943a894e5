mod directory;
mod group;
mod key;
mod record;
mod sort;

#[cfg(test)]
mod tests;

pub use directory::{DirStats, DirectoryTable, first_directory, rank_directories};
pub use group::group_prefixes;
pub use key::{PrefixLengths, StatKey, parent, sibling};
pub use record::{IpStats, USER_AGENT_MAX_CHARS, UrlRecency};
pub use sort::{rank, row_budget};

use ahash::AHashMap;

/// The statistics table, one record per key.
pub type StatsTable = AHashMap<StatKey, IpStats>;
