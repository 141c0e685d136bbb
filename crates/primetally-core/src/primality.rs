//! Primality test used to gate insertion into frequency shards.
//!
//! This is trial division by odd divisors up to `floor(sqrt(n))`. Matrix
//! values are bounded by [`crate::matrix::MAX_VALUE`], so at most ~15
//! divisions run per candidate.
//!
//! # Quirk
//!
//! `1` is classified as prime, so it is counted and ranked like any other.

/// Returns `true` if `n` is counted as a prime.
///
/// `1` and `2` are prime, every other even number (including `0`) is not.
#[inline]
#[must_use]
pub fn is_prime(n: u32) -> bool {
    if n == 1 || n == 2 {
        return true;
    }
    if n % 2 == 0 {
        return false;
    }
    let max_divisor = n.isqrt();
    let mut divisor = 3;
    while divisor <= max_divisor {
        if n % divisor == 0 {
            return false;
        }
        divisor += 2;
    }
    true
}

/// All values in `0..=limit` accepted by [`is_prime`], ascending.
#[must_use]
pub fn primes_up_to(limit: u32) -> Vec<u32> {
    (0..=limit).filter(|&n| is_prime(n)).collect()
}
