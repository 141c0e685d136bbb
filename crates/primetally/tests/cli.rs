//! CLI contract tests
//!
//! Runs the `primetally` binary as a subprocess and checks:
//! - plain output is space-separated primes, newline-terminated
//! - `--json` emits a parseable query report
//! - config files and flags combine as documented
//! - invalid settings fail with an actionable message

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

use primetally_core::primality::is_prime;

/// Build a primetally command isolated from the caller's environment.
#[allow(deprecated)]
fn primetally_cmd() -> Command {
    let mut cmd = Command::cargo_bin("primetally").expect("primetally binary should be built");
    for var in [
        "PRIMETALLY_SIZE",
        "PRIMETALLY_COUNT",
        "PRIMETALLY_COLLISION_PROBABILITY",
        "PRIMETALLY_MAX_THREADS",
        "PRIMETALLY_SEED",
        "PRIMETALLY_CONFIG",
        "RUST_LOG",
    ] {
        cmd.env_remove(var);
    }
    cmd
}

fn stdout_of(cmd: &mut Command) -> String {
    let output = cmd.output().expect("run primetally");
    assert!(
        output.status.success(),
        "primetally failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8(output.stdout).expect("utf-8 stdout")
}

fn json_report(cmd: &mut Command) -> serde_json::Value {
    serde_json::from_str(&stdout_of(cmd)).expect("stdout should be a JSON report")
}

/// `(value, count)` pairs sorted by value, so tie order does not matter.
fn sorted_records(report: &serde_json::Value) -> Vec<(u64, u64)> {
    let mut records: Vec<(u64, u64)> = report["records"]
        .as_array()
        .expect("records array")
        .iter()
        .map(|r| (r["value"].as_u64().unwrap(), r["count"].as_u64().unwrap()))
        .collect();
    records.sort_unstable();
    records
}

// =============================================================================
// Plain output
// =============================================================================

#[test]
fn plain_output_lists_requested_primes() {
    let stdout = stdout_of(
        primetally_cmd().args(["--size", "200", "--count", "5", "--seed", "42"]),
    );
    assert!(stdout.ends_with('\n'));
    let values: Vec<u32> = stdout
        .split_whitespace()
        .map(|v| v.parse().expect("numeric output"))
        .collect();
    assert_eq!(values.len(), 5);
    assert!(values.iter().all(|&v| is_prime(v)), "non-prime in {values:?}");
    assert_eq!(stdout.trim_end().split(' ').count(), 5);
}

#[test]
fn zero_count_prints_nothing() {
    primetally_cmd()
        .args(["--size", "50", "--count", "0", "--seed", "1"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn empty_matrix_prints_nothing() {
    primetally_cmd()
        .args(["--size", "0", "--count", "5"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn env_vars_configure_the_run() {
    let stdout = stdout_of(
        primetally_cmd()
            .env("PRIMETALLY_SIZE", "60")
            .env("PRIMETALLY_COUNT", "3")
            .env("PRIMETALLY_SEED", "9"),
    );
    assert_eq!(stdout.split_whitespace().count(), 3);
}

// =============================================================================
// JSON report
// =============================================================================

#[test]
fn json_report_has_sizing_and_records() {
    let report = json_report(primetally_cmd().args([
        "--size",
        "100",
        "--count",
        "4",
        "--seed",
        "7",
        "--max-threads",
        "2",
        "--min-values-per-thread",
        "100",
        "--json",
    ]));

    assert_eq!(report["matrix_size"], 100);
    assert_eq!(report["requested"], 4);
    let threads = report["thread_count"].as_u64().unwrap();
    assert!((1..=2).contains(&threads));
    assert!(report["shard_count"].as_u64().unwrap() >= 1);
    assert_eq!(report["records"].as_array().unwrap().len(), 4);

    let counts: Vec<u64> = report["records"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["count"].as_u64().unwrap())
        .collect();
    assert!(counts.windows(2).all(|w| w[0] >= w[1]), "{counts:?}");
}

#[test]
fn same_seed_counts_the_same_primes() {
    let args = [
        "--size", "120", "--count", "500", "--seed", "2024", "--json",
    ];
    let single = json_report(primetally_cmd().args(args).args(["--max-threads", "1"]));
    let parallel = json_report(
        primetally_cmd()
            .args(args)
            .args(["--max-threads", "4", "--min-values-per-thread", "1"]),
    );

    assert_eq!(sorted_records(&single), sorted_records(&parallel));
    assert_eq!(single["primes_counted"], parallel["primes_counted"]);
    assert_eq!(single["distinct_primes"], parallel["distinct_primes"]);
}

// =============================================================================
// Configuration
// =============================================================================

#[test]
fn config_file_sets_engine_options() {
    let dir = TempDir::new().expect("create temp dir");
    let path = dir.path().join("engine.toml");
    std::fs::write(&path, "max_threads = 1\ncollision_probability = 0.5\n").unwrap();

    let report = json_report(primetally_cmd().args([
        "--size",
        "80",
        "--count",
        "2",
        "--seed",
        "3",
        "--json",
        "--config",
        path.to_str().unwrap(),
    ]));
    assert_eq!(report["thread_count"], 1);
    assert_eq!(report["shard_count"], 1);
}

#[test]
fn unknown_config_key_fails() {
    let dir = TempDir::new().expect("create temp dir");
    let path = dir.path().join("engine.toml");
    std::fs::write(&path, "shards = 16\n").unwrap();

    primetally_cmd()
        .args(["--size", "10", "--config", path.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to load config file"));
}

#[test]
fn invalid_collision_probability_fails() {
    primetally_cmd()
        .args(["--size", "10", "--collision-probability", "1.5"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("collision probability"));
}

#[test]
fn overflowing_size_fails_cleanly() {
    let size = usize::MAX.to_string();
    primetally_cmd()
        .args(["--size", size.as_str()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to generate matrix"))
        .stderr(predicate::str::contains("more cells than can be addressed"));
}

#[test]
fn invalid_log_level_fails() {
    primetally_cmd()
        .args(["--size", "10", "--log-level", "loud"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid log level"));
}

#[test]
fn json_logs_go_to_stderr() {
    let output = primetally_cmd()
        .args([
            "--size",
            "20",
            "--seed",
            "5",
            "--log-level",
            "info",
            "--log-format",
            "json",
        ])
        .output()
        .expect("run primetally");
    assert!(output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    let finished = stderr
        .lines()
        .filter_map(|line| serde_json::from_str::<serde_json::Value>(line).ok())
        .find(|event| event["message"] == "query finished")
        .expect("query finished event on stderr");
    assert_eq!(finished["count"], 5);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(!stdout.contains('{'));
}
