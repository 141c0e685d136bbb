//! Parallel prime frequency engine.
//!
//! # Pipeline
//!
//! ```text
//! matrix size ──► compute_thread_count ──► partition_rows ──► row ranges
//!                        │
//!                        └──► compute_shard_count ──► ShardSet
//!
//! one scoped worker per row range ──► ShardSet::add (bucket → shard lock)
//!                        │
//!                   join barrier
//!                        │
//!          shard snapshots ──► rank / select_top_k
//! ```
//!
//! Workers borrow the matrix and the shard set through `std::thread::scope`,
//! so nothing is copied or reference-counted. A shard's lock is the only
//! point where workers can block each other.
//!
//! # Failure policy
//!
//! A worker that cannot be spawned, or that panics, aborts the query with
//! [`Error::WorkerSpawn`] / [`Error::WorkerPanicked`]. Every worker that did
//! start is joined first; a partial count is never returned.

use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::aggregate::{FrequencyRecord, rank, select_top_k};
use crate::config::EngineConfig;
use crate::error::{Error, Result};
use crate::matrix::{MAX_VALUE, Matrix};
use crate::partition::{RowRange, compute_thread_count, hardware_concurrency, partition_rows};
use crate::shard_set::{DistributionStats, ShardSet};
use crate::shard_sizer::{clamp_shard_count, compute_shard_count};

/// Sizing decisions for one query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryPlan {
    pub thread_count: usize,
    pub shard_count: usize,
    pub row_ranges: Vec<RowRange>,
}

/// Outcome of [`PrimeFrequencyEngine::analyze`].
///
/// `thread_count == 0` means the matrix was never scanned because there was
/// nothing to report (`count == 0` or an empty matrix).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryReport {
    pub matrix_size: usize,
    pub requested: usize,
    pub thread_count: usize,
    pub shard_count: usize,
    pub row_ranges: Vec<RowRange>,
    /// Top records, highest count first. Tied counts are unordered.
    pub records: Vec<FrequencyRecord>,
    /// Distinct primes seen anywhere in the matrix.
    pub distinct_primes: usize,
    /// Matrix cells that held a prime.
    pub primes_counted: u64,
    pub distribution: DistributionStats,
}

impl QueryReport {
    fn not_scanned(matrix_size: usize, requested: usize) -> Self {
        Self {
            matrix_size,
            requested,
            thread_count: 0,
            shard_count: 0,
            row_ranges: Vec::new(),
            records: Vec::new(),
            distinct_primes: 0,
            primes_counted: 0,
            distribution: DistributionStats::from_shard_sizes(&[]),
        }
    }

    /// Ranked values without their counts.
    #[must_use]
    pub fn values(&self) -> Vec<u32> {
        self.records.iter().map(|r| r.value).collect()
    }

    /// Pretty-printed JSON.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Finds the most frequent primes in a matrix using sharded, parallel counting.
///
/// The collision-probability bound and thread limits are fixed at
/// construction; each query allocates and discards its own shard set.
#[derive(Debug, Clone)]
pub struct PrimeFrequencyEngine {
    config: EngineConfig,
}

impl PrimeFrequencyEngine {
    /// Engine with default settings and the given collision bound.
    pub fn new(collision_probability: f64) -> Result<Self> {
        Self::with_config(EngineConfig::with_collision_probability(collision_probability))
    }

    /// Engine with explicit settings.
    pub fn with_config(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    fn thread_budget(&self) -> usize {
        let hardware = hardware_concurrency();
        self.config
            .max_threads
            .map_or(hardware, |limit| limit.min(hardware))
    }

    /// Thread count, shard count and row split for a `matrix_size` matrix.
    #[must_use]
    pub fn plan(&self, matrix_size: usize) -> QueryPlan {
        let thread_count = compute_thread_count(
            matrix_size,
            self.config.min_values_per_thread,
            self.thread_budget(),
        );
        let shard_count = clamp_shard_count(
            compute_shard_count(
                thread_count,
                self.config.collision_probability,
                MAX_VALUE as usize + 1,
            ),
            MAX_VALUE,
        );
        QueryPlan {
            thread_count,
            shard_count,
            row_ranges: partition_rows(matrix_size, thread_count),
        }
    }

    /// The `count` most frequent primes in `matrix`, highest frequency first.
    ///
    /// Returns `min(count, distinct primes present)` values. Order among equal
    /// frequencies is unspecified.
    pub fn most_frequent_primes(&self, matrix: &Matrix, count: usize) -> Result<Vec<u32>> {
        if count == 0 || matrix.is_empty() {
            return Ok(Vec::new());
        }
        let scan = self.scan(matrix, count)?;
        Ok(select_top_k(scan.shards.snapshots(), count))
    }

    /// Same query as [`Self::most_frequent_primes`], with sizing details and counts.
    pub fn analyze(&self, matrix: &Matrix, count: usize) -> Result<QueryReport> {
        if count == 0 || matrix.is_empty() {
            return Ok(QueryReport::not_scanned(matrix.size(), count));
        }
        let scan = self.scan(matrix, count)?;
        let distribution = DistributionStats::from_shard_sizes(&scan.shards.shard_sizes());
        let ranked = rank(scan.shards.snapshots());
        let distinct_primes = ranked.len();
        let records = ranked.into_iter().take(count).collect();

        Ok(QueryReport {
            matrix_size: matrix.size(),
            requested: count,
            thread_count: scan.plan.thread_count,
            shard_count: scan.plan.shard_count,
            row_ranges: scan.plan.row_ranges,
            records,
            distinct_primes,
            primes_counted: scan.primes_counted,
            distribution,
        })
    }

    fn scan(&self, matrix: &Matrix, count: usize) -> Result<Scan> {
        let span = tracing::debug_span!("top_primes", size = matrix.size(), count);
        let _guard = span.enter();
        let started = Instant::now();

        let plan = self.plan(matrix.size());
        tracing::debug!(
            threads = plan.thread_count,
            shards = plan.shard_count,
            ranges = plan.row_ranges.len(),
            collision_probability = self.config.collision_probability,
            "sized query"
        );

        let shards = ShardSet::new(plan.shard_count, MAX_VALUE);
        let primes_counted = run_workers(&plan.row_ranges, |_, range| {
            fill_shards(matrix, range, &shards)
        })?;

        tracing::debug!(
            primes_counted,
            distinct_primes = shards.shard_sizes().iter().sum::<usize>(),
            elapsed_us = started.elapsed().as_micros() as u64,
            "workers joined"
        );

        Ok(Scan {
            plan,
            shards,
            primes_counted,
        })
    }
}

struct Scan {
    plan: QueryPlan,
    shards: ShardSet,
    primes_counted: u64,
}

/// Count every prime in `range` into `shards`. Returns how many cells were accepted.
fn fill_shards(matrix: &Matrix, range: RowRange, shards: &ShardSet) -> u64 {
    let mut accepted = 0;
    for row in range.rows() {
        for &value in matrix.row(row) {
            if shards.add(value) {
                accepted += 1;
            }
        }
    }
    accepted
}

/// Run `work` once per range on its own scoped thread and join them all.
///
/// Returns the sum of the per-worker results. Spawning stops at the first
/// failure; already running workers are still joined before the error is
/// returned, and every handle is joined even after a panic is seen.
fn run_workers<F>(ranges: &[RowRange], work: F) -> Result<u64>
where
    F: Fn(usize, RowRange) -> u64 + Sync,
{
    run_workers_with(ranges, work, |worker| {
        Ok(std::thread::Builder::new().name(format!("primetally-worker-{worker}")))
    })
}

/// [`run_workers`] with the thread builder for each worker supplied by
/// `builder`. An `Err` from `builder` is handled like a failed spawn.
fn run_workers_with<F, B>(ranges: &[RowRange], work: F, builder: B) -> Result<u64>
where
    F: Fn(usize, RowRange) -> u64 + Sync,
    B: Fn(usize) -> std::io::Result<std::thread::Builder>,
{
    let work = &work;
    std::thread::scope(|scope| {
        let mut handles = Vec::with_capacity(ranges.len());
        let mut failure = None;

        for (worker, &range) in ranges.iter().enumerate() {
            let spawned = builder(worker)
                .and_then(|b| b.spawn_scoped(scope, move || work(worker, range)));
            match spawned {
                Ok(handle) => handles.push((worker, range, handle)),
                Err(source) => {
                    tracing::error!(worker, error = %source, "failed to spawn counting worker");
                    failure = Some(Error::WorkerSpawn { worker, source });
                    break;
                }
            }
        }

        let mut total = 0u64;
        for (worker, range, handle) in handles {
            match handle.join() {
                Ok(accepted) => {
                    tracing::trace!(
                        worker,
                        first_row = range.first,
                        last_row = range.last,
                        accepted,
                        "worker finished"
                    );
                    total += accepted;
                }
                Err(_) => {
                    tracing::error!(worker, "counting worker panicked");
                    failure.get_or_insert(Error::WorkerPanicked { worker });
                }
            }
        }

        match failure {
            Some(err) => Err(err),
            None => Ok(total),
        }
    })
}
