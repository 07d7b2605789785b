//! Deterministic top-N selection over count aggregates.

use serde::Serialize;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::hash::Hash;

/// Ranking depth used when a caller does not ask for a specific one.
pub const DEFAULT_TOP_N: usize = 10;

/// One row of the ranked zone view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ZoneCount {
    pub zone: String,
    pub count: i64,
}

/// One row of the ranked zone-hour view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlotCount {
    pub zone: String,
    pub hour: u8,
    pub count: i64,
}

/// Returns the `n` highest-count entries of `data`, length `min(n, |data|)`.
///
/// The order is total and reproducible regardless of map iteration order:
/// count descending, then key ascending by the key's `Ord`. For zone strings
/// that is plain byte-value comparison (uppercase sorts before lowercase, no
/// locale collation); for [`crate::tally::Slot`] it is zone then hour.
/// Equal-count runs are therefore contiguous and internally sorted by key.
///
/// Selection partitions the top `n` entries first and sorts only those, so
/// the cost is O(m + n log n) rather than sorting the whole map.
pub fn top_n<K>(data: &HashMap<K, i64>, n: usize) -> Vec<(K, i64)>
where
    K: Clone + Eq + Hash + Ord,
{
    if n == 0 {
        return Vec::new();
    }

    let mut entries: Vec<(K, i64)> = data.iter().map(|(k, c)| (k.clone(), *c)).collect();

    if n < entries.len() {
        entries.select_nth_unstable_by(n - 1, rank_order);
        entries.truncate(n);
    }
    // Keys are unique, so the order is total and an unstable sort is safe.
    entries.sort_unstable_by(rank_order);
    entries
}

fn rank_order<K: Ord>(a: &(K, i64), b: &(K, i64)) -> Ordering {
    b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0))
}
