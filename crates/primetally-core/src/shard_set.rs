//! Fixed-size sequence of frequency shards with a static value → shard mapping.
//!
//! Unlike a hash-routed map, shards here own contiguous value ranges:
//!
//! ```text
//! bucket(value) = value * shard_count / (max_value + 1)
//! ```
//!
//! The mapping depends only on the value, never on the thread observing it,
//! so two workers can land on the same shard and each shard's lock is the
//! only point where they serialize.

use serde::{Deserialize, Serialize};

use crate::aggregate::FrequencyRecord;
use crate::frequency_shard::FrequencyShard;

/// The shard set for one query.
pub struct ShardSet {
    shards: Box<[FrequencyShard]>,
    max_value: u32,
}

impl std::fmt::Debug for ShardSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShardSet")
            .field("shard_count", &self.shards.len())
            .field("max_value", &self.max_value)
            .field("shards", &self.shards)
            .finish()
    }
}

impl ShardSet {
    /// Allocate `shard_count` empty shards covering `[0, max_value]`.
    ///
    /// Clamped to `[1, max_value + 1]`.
    #[must_use]
    pub fn new(shard_count: usize, max_value: u32) -> Self {
        let n = shard_count.clamp(1, max_value as usize + 1);
        let shards: Vec<FrequencyShard> = (0..n).map(|_| FrequencyShard::new()).collect();
        Self {
            shards: shards.into_boxed_slice(),
            max_value,
        }
    }

    /// Number of shards.
    #[must_use]
    pub fn shard_count(&self) -> usize {
        self.shards.len()
    }

    /// Shard index responsible for `value`.
    ///
    /// Values above `max_value` fold into the last shard.
    #[inline]
    #[must_use]
    pub fn bucket(&self, value: u32) -> usize {
        let value = value.min(self.max_value) as usize;
        value * self.shards.len() / (self.max_value as usize + 1)
    }

    /// Route `value` to its shard and count it. See [`FrequencyShard::add_number`].
    #[inline]
    pub fn add(&self, value: u32) -> bool {
        self.shards[self.bucket(value)].add_number(value)
    }

    /// Borrow shard `idx`.
    #[must_use]
    pub fn shard(&self, idx: usize) -> Option<&FrequencyShard> {
        self.shards.get(idx)
    }

    /// Per-shard snapshots, in shard order.
    pub fn snapshots(&self) -> Vec<Vec<FrequencyRecord>> {
        self.shards.iter().map(FrequencyShard::numbers).collect()
    }

    /// Per-shard distinct prime counts (for diagnostics).
    pub fn shard_sizes(&self) -> Vec<usize> {
        self.shards.iter().map(FrequencyShard::len).collect()
    }

    /// Clear every shard.
    pub fn clear(&self) {
        for shard in self.shards.iter() {
            shard.clear();
        }
    }
}

// ---------------------------------------------------------------------------
// Distribution quality metric
// ---------------------------------------------------------------------------

/// How evenly distinct primes spread across shards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistributionStats {
    pub shard_count: usize,
    pub total_entries: usize,
    pub min_shard_size: usize,
    pub max_shard_size: usize,
    pub mean_shard_size: f64,
    pub stddev_shard_size: f64,
}

impl DistributionStats {
    /// Compute distribution stats from shard sizes.
    #[must_use]
    pub fn from_shard_sizes(sizes: &[usize]) -> Self {
        let total: usize = sizes.iter().sum();
        let mean = if sizes.is_empty() {
            0.0
        } else {
            total as f64 / sizes.len() as f64
        };
        let variance = if sizes.is_empty() {
            0.0
        } else {
            sizes.iter().map(|&s| (s as f64 - mean).powi(2)).sum::<f64>() / sizes.len() as f64
        };

        Self {
            shard_count: sizes.len(),
            total_entries: total,
            min_shard_size: sizes.iter().copied().min().unwrap_or(0),
            max_shard_size: sizes.iter().copied().max().unwrap_or(0),
            mean_shard_size: mean,
            stddev_shard_size: variance.sqrt(),
        }
    }
}
