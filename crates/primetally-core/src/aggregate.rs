//! Merge shard snapshots and select the most frequent primes.
//!
//! Matrix values are bounded by 1000, so there are at most ~170 distinct
//! primes across all shards. Concatenating the snapshots and sorting them is
//! cheaper than any heap-based selection at that size.
//!
//! # Ties
//!
//! Records are sorted by count only. Equal counts keep their merge order
//! (shard order, then the shard map's iteration order), which is not stable
//! across runs. Callers must treat tied values as an unordered group.

use serde::{Deserialize, Serialize};

/// One prime value and how many times it was observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FrequencyRecord {
    pub value: u32,
    pub count: u64,
}

/// Concatenate every snapshot and sort descending by count.
pub fn rank<I>(snapshots: I) -> Vec<FrequencyRecord>
where
    I: IntoIterator,
    I::Item: IntoIterator<Item = FrequencyRecord>,
{
    let mut records: Vec<FrequencyRecord> = snapshots.into_iter().flatten().collect();
    records.sort_by(|left, right| right.count.cmp(&left.count));
    records
}

/// The `k` most frequent values, highest count first. Counts are dropped.
///
/// Returns fewer than `k` values when fewer distinct primes were counted.
pub fn select_top_k<I>(snapshots: I, k: usize) -> Vec<u32>
where
    I: IntoIterator,
    I::Item: IntoIterator<Item = FrequencyRecord>,
{
    rank(snapshots)
        .into_iter()
        .take(k)
        .map(|record| record.value)
        .collect()
}
