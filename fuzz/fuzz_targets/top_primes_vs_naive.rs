#![no_main]

use std::collections::HashMap;

use libfuzzer_sys::fuzz_target;
use primetally_core::primality::{is_prime, primes_up_to};
use primetally_core::{EngineConfig, MAX_VALUE, Matrix, PrimeFrequencyEngine};

const MAX_SIDE: usize = 48;

/// Header bytes: side length, result count, thread limit, min cells per
/// thread, collision bound. The rest become matrix cells.
fn decode(data: &[u8]) -> Option<(Matrix, usize, EngineConfig)> {
    let (header, body) = data.split_first_chunk::<5>()?;
    let size = usize::from(header[0]) % (MAX_SIDE + 1);
    let count = usize::from(header[1]) % 40;
    let max_threads = usize::from(header[2] % 8) + 1;
    let min_values_per_thread = usize::from(header[3]) + 1;
    let collision_probability = f64::from(header[4]) / 255.0;

    // Two bytes per cell, cycled so short inputs still fill the matrix.
    let cells: Vec<u32> = if body.len() < 2 {
        vec![0; size * size]
    } else {
        body.chunks_exact(2)
            .cycle()
            .take(size * size)
            .map(|pair| u32::from(u16::from_le_bytes([pair[0], pair[1]])) % (MAX_VALUE + 1))
            .collect()
    };

    let matrix = Matrix::from_cells(size, cells).ok()?;
    let config = EngineConfig {
        collision_probability,
        min_values_per_thread,
        max_threads: Some(max_threads),
    };
    Some((matrix, count, config))
}

fuzz_target!(|data: &[u8]| {
    let Some((matrix, count, config)) = decode(data) else {
        return;
    };
    let engine = PrimeFrequencyEngine::with_config(config).expect("fuzzed config is valid");

    let mut naive: HashMap<u32, u64> = HashMap::new();
    for &v in matrix.cells() {
        if is_prime(v) {
            *naive.entry(v).or_insert(0) += 1;
        }
    }

    let result = engine
        .most_frequent_primes(&matrix, count)
        .expect("query succeeds");
    assert_eq!(result.len(), count.min(naive.len()));
    let reference = primes_up_to(MAX_VALUE);
    assert!(result.iter().all(|v| reference.binary_search(v).is_ok()));

    let counts: Vec<u64> = result.iter().map(|v| naive[v]).collect();
    let mut expected: Vec<u64> = naive.values().copied().collect();
    expected.sort_unstable_by(|a, b| b.cmp(a));
    expected.truncate(count);
    assert_eq!(counts, expected, "result {result:?}");

    // count == 0 skips the scan entirely
    if count > 0 {
        let report = engine.analyze(&matrix, count).expect("analyze succeeds");
        assert_eq!(report.primes_counted, naive.values().sum::<u64>());
        assert_eq!(report.distinct_primes, naive.len());
    }
});
