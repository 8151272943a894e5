use crate::config::SortBy;
use crate::stats::key::{parent, sibling};
use crate::stats::{StatKey, StatsTable, rank, row_budget};
use ahash::AHashSet;
use tracing::debug;

/// Coalesces sibling networks under `server` so that at most `top_n` rows
/// (0 = unlimited) cover as much of the ranking as possible.
///
/// Candidates are walked in rank order and collected into a selected set.
/// Whenever a candidate's sibling is already selected, both are replaced by
/// their parent network, and the check repeats one level up. Walking stops
/// once a candidate would need a new slot and the budget is spent.
///
/// Merged children are removed from `table`. Returns the re-ranked keys,
/// clipped to the budget.
pub fn group_prefixes(
    table: &mut StatsTable,
    sort_by: SortBy,
    server: &str,
    top_n: usize,
) -> Vec<StatKey> {
    let candidates = rank(table, sort_by, server);
    let budget = row_budget(top_n, candidates.len());
    let mut selected: AHashSet<StatKey> = AHashSet::with_capacity(budget);
    let mut merges = 0usize;

    for candidate in candidates {
        if !table.contains_key(&candidate) {
            continue;
        }
        let Some(sibling_net) = sibling(candidate.prefix) else {
            continue;
        };

        let mut key = candidate;
        let mut sibling_key = key.with_prefix(sibling_net);

        if !selected.contains(&sibling_key) {
            if selected.len() >= budget {
                break;
            }
            selected.insert(key.clone());
        }

        while selected.contains(&sibling_key) {
            let Some(parent_net) = parent(key.prefix) else {
                break;
            };
            let parent_key = key.with_prefix(parent_net);

            let mut merged = table.remove(&key).unwrap_or_default();
            if let Some(other) = table.remove(&sibling_key) {
                merged.merge_with(other);
            }
            if let Some(existing) = table.remove(&parent_key) {
                merged.merge_with(existing);
            }
            table.insert(parent_key.clone(), merged);

            selected.remove(&key);
            selected.remove(&sibling_key);
            selected.insert(parent_key.clone());
            merges += 1;

            let Some(next_sibling) = sibling(parent_net) else {
                break;
            };
            key = parent_key;
            sibling_key = key.with_prefix(next_sibling);
        }
    }

    debug!(server, merges, rows = selected.len(), "grouped prefixes");

    let mut keys = rank(table, sort_by, server);
    keys.truncate(row_budget(top_n, keys.len()));
    keys
}
