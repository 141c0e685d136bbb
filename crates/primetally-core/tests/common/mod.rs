//! Shared test infrastructure for primetally-core integration tests.
//!
//! Import from integration test files with:
//! ```ignore
//! mod common;
//! use common::{naive_counts, assert_top_k};
//! ```

#![allow(dead_code)]

use std::collections::HashMap;

use rand::SeedableRng;
use rand::rngs::StdRng;

use primetally_core::Matrix;
use primetally_core::primality::is_prime;

/// Single-threaded reference count of every prime in `matrix`.
pub fn naive_counts(matrix: &Matrix) -> HashMap<u32, u64> {
    let mut counts = HashMap::new();
    for &value in matrix.cells() {
        if is_prime(value) {
            *counts.entry(value).or_insert(0u64) += 1;
        }
    }
    counts
}

/// Counts of the `k` most frequent primes, highest first.
pub fn top_counts(counts: &HashMap<u32, u64>, k: usize) -> Vec<u64> {
    let mut all: Vec<u64> = counts.values().copied().collect();
    all.sort_unstable_by(|a, b| b.cmp(a));
    all.truncate(k);
    all
}

/// Check `result` is a valid top-`k` answer for `matrix`, treating tied
/// counts as interchangeable.
pub fn assert_top_k(matrix: &Matrix, k: usize, result: &[u32]) {
    let counts = naive_counts(matrix);
    assert_eq!(
        result.len(),
        k.min(counts.len()),
        "result length for k={k}: {result:?}"
    );

    let mut seen = std::collections::HashSet::new();
    let mut result_counts = Vec::with_capacity(result.len());
    for value in result {
        assert!(seen.insert(*value), "duplicate value {value} in {result:?}");
        let count = counts
            .get(value)
            .copied()
            .unwrap_or_else(|| panic!("{value} is not a prime present in the matrix"));
        result_counts.push(count);
    }

    assert!(
        result_counts.windows(2).all(|w| w[0] >= w[1]),
        "counts not descending: {result_counts:?}"
    );
    assert_eq!(result_counts, top_counts(&counts, k));
}

/// Uniform random matrix from a fixed seed.
pub fn seeded_matrix(size: usize, seed: u64) -> Matrix {
    let mut rng = StdRng::seed_from_u64(seed);
    Matrix::random(size, &mut rng).unwrap()
}
