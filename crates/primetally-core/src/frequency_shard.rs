//! Independently locked prime frequency map.
//!
//! A [`FrequencyShard`] is one partition of the frequency table: a
//! `RwLock<HashMap<u32, u64>>` mapping a prime value to the number of times it
//! was observed. Writers (counting workers) take the write lock; snapshots take
//! the read lock, so concurrent readers never block each other.
//!
//! # Padding
//!
//! Shards are aligned to 128 bytes (one Apple Silicon cache line / two
//! x86_64 cache lines) so that adjacent shards in a [`crate::shard_set::ShardSet`]
//! never share a line and lock traffic on one shard does not bounce its
//! neighbours.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::RwLock;

use crate::aggregate::FrequencyRecord;
use crate::primality::is_prime;

/// A thread-safe counting map that only admits primes.
#[repr(align(128))]
#[derive(Default)]
pub struct FrequencyShard {
    counts: RwLock<HashMap<u32, u64>>,
}

impl FrequencyShard {
    /// Create an empty shard.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one occurrence of `value`.
    ///
    /// An existing entry is incremented. Otherwise the value is inserted with
    /// count 1 if it passes [`is_prime`]. Returns `false` (and leaves the shard
    /// untouched) for non-primes.
    pub fn add_number(&self, value: u32) -> bool {
        let mut guard = self.counts.write().unwrap_or_else(|e| e.into_inner());
        match guard.entry(value) {
            Entry::Occupied(mut entry) => {
                *entry.get_mut() += 1;
                true
            }
            Entry::Vacant(entry) => {
                if is_prime(value) {
                    entry.insert(1);
                    true
                } else {
                    false
                }
            }
        }
    }

    /// Snapshot all `(value, count)` entries. Order is unspecified.
    pub fn numbers(&self) -> Vec<FrequencyRecord> {
        let guard = self.counts.read().unwrap_or_else(|e| e.into_inner());
        guard
            .iter()
            .map(|(&value, &count)| FrequencyRecord { value, count })
            .collect()
    }

    /// Current count for `value`, if it has been seen.
    pub fn count_of(&self, value: u32) -> Option<u64> {
        let guard = self.counts.read().unwrap_or_else(|e| e.into_inner());
        guard.get(&value).copied()
    }

    /// Number of distinct primes held.
    pub fn len(&self) -> usize {
        self.counts.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    /// Whether the shard holds no entries.
    pub fn is_empty(&self) -> bool {
        self.counts
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .is_empty()
    }

    /// Remove every entry.
    pub fn clear(&self) {
        let mut guard = self.counts.write().unwrap_or_else(|e| e.into_inner());
        guard.clear();
    }
}

impl std::fmt::Debug for FrequencyShard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.counts.read() {
            Ok(guard) => f
                .debug_struct("FrequencyShard")
                .field("entries", &guard.len())
                .finish(),
            Err(_) => f
                .debug_struct("FrequencyShard")
                .field("entries", &"<poisoned>")
                .finish(),
        }
    }
}
