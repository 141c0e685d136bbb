//! Worker sizing and row-range partitioning.
//!
//! Each worker gets one contiguous, inclusive range of matrix rows. Ranges are
//! `ceil(size / threads)` rows long except the last, which is clamped to the
//! final row. There is no work stealing: the split is fixed before any worker
//! starts.

use serde::{Deserialize, Serialize};

/// Hardware threads available to this process, falling back to 1.
#[must_use]
pub fn hardware_concurrency() -> usize {
    std::thread::available_parallelism()
        .map(std::num::NonZeroUsize::get)
        .unwrap_or(1)
}

/// Number of workers for a `matrix_size x matrix_size` scan.
///
/// `min(ceil(size² / min_values_per_thread), hardware_concurrency)`, never
/// below 1. A zero `min_values_per_thread` is treated as 1.
#[must_use]
pub fn compute_thread_count(
    matrix_size: usize,
    min_values_per_thread: usize,
    hardware_concurrency: usize,
) -> usize {
    let values = matrix_size.saturating_mul(matrix_size);
    let by_workload = values.div_ceil(min_values_per_thread.max(1));
    by_workload.min(hardware_concurrency).max(1)
}

/// An inclusive range of matrix rows `[first, last]` owned by one worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowRange {
    pub first: usize,
    pub last: usize,
}

impl RowRange {
    /// Number of rows in the range. Zero when `last < first`.
    #[must_use]
    pub fn len(&self) -> usize {
        self.last
            .checked_sub(self.first)
            .map_or(0, |span| span.saturating_add(1))
    }

    /// Whether the range covers no rows. [`partition_rows`] never emits one,
    /// but a deserialized range may be inverted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.last < self.first
    }

    /// Row indices covered by this range.
    #[must_use]
    pub fn rows(&self) -> std::ops::RangeInclusive<usize> {
        self.first..=self.last
    }
}

/// Split rows `0..matrix_size` into contiguous ranges for `thread_count` workers.
///
/// Ranges that would start past the last row are not emitted, so fewer than
/// `thread_count` ranges come back when the rows do not spread evenly (for
/// example 5 rows over 4 threads gives `[0,1] [2,3] [4,4]`).
#[must_use]
pub fn partition_rows(matrix_size: usize, thread_count: usize) -> Vec<RowRange> {
    if matrix_size == 0 {
        return Vec::new();
    }
    let threads = thread_count.max(1);
    let rows_per_thread = matrix_size.div_ceil(threads);

    let mut ranges = Vec::with_capacity(threads.min(matrix_size));
    let mut first = 0;
    while first < matrix_size && ranges.len() < threads {
        let last = (first + rows_per_thread - 1).min(matrix_size - 1);
        ranges.push(RowRange { first, last });
        first = last + 1;
    }
    ranges
}
