//! Shard count selection from a lock-collision budget.
//!
//! Model: `k` worker threads each pick one of `n` shards uniformly at the
//! moment contention could happen. The chance that at least two pick the same
//! shard is the birthday-collision probability
//!
//! ```text
//! p(n, k) = 1 - ∏_{i=0}^{k-1} (n - i) / n
//! ```
//!
//! [`compute_shard_count`] looks for a small `n` with `p(n, k) <= bound`
//! using an exponential search followed by a halving-step refinement. The
//! refinement does not guarantee the minimal `n`; callers and tests observe
//! the approximate value it lands on (e.g. `k = 2, bound = 0.1` yields 11,
//! where `p(11, 2) ≈ 0.091`).
//!
//! # Precision
//!
//! The product runs in `f32` and the bound is narrowed to `f32` before the
//! comparison. Shard counts are part of the observable behavior, and the
//! single-precision rounding decides several of them (`k = 2` at bounds
//! `0.1`, `0.02` and `0.01` give 11, 49 and 99).

/// Probability that at least two of `threads` threads choose the same shard
/// out of `shards`, in single precision.
#[must_use]
pub fn collision_probability(shards: usize, threads: usize) -> f32 {
    if shards == 0 {
        return 1.0;
    }
    let n = shards as f32;
    let mut no_collision = 1.0f32;
    for i in 0..threads {
        no_collision *= (shards as f32 - i as f32) / n;
    }
    (1.0 - f64::from(no_collision)) as f32
}

/// Shard count for `thread_count` workers under `bound`, clamped to `[1, ceiling]`.
///
/// One thread (or none) can never collide, so the result is 1. When the
/// exponential search passes `2 * ceiling` it stops and returns `ceiling`:
/// refinement moves `n` by less than `n / 2`, so the clamped answer is
/// already known, and an unreachable bound (such as `0.0` with several
/// threads) cannot loop forever.
#[must_use]
pub fn compute_shard_count(thread_count: usize, bound: f64, ceiling: usize) -> usize {
    let bound = bound as f32;
    let ceiling = ceiling.max(1);
    if thread_count <= 1 {
        return 1;
    }

    let mut shards = 1usize;
    while collision_probability(shards, thread_count) > bound {
        if shards >= ceiling.saturating_mul(2) {
            return ceiling;
        }
        shards *= 2;
    }

    let mut step = shards / 4;
    while step > 0 {
        if collision_probability(shards, thread_count) > bound {
            shards += step;
        } else {
            shards -= step;
        }
        step /= 2;
    }

    shards.clamp(1, ceiling)
}

/// Clamp a shard count into `[1, max_value + 1]`: one shard per possible
/// value is the finest useful granularity.
#[must_use]
pub fn clamp_shard_count(shards: usize, max_value: u32) -> usize {
    shards.clamp(1, max_value as usize + 1)
}
