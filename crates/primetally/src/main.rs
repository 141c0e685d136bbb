//! primetally CLI
//!
//! Fills a square matrix with uniform random values in `[0, 1000]` and prints
//! the most frequent primes in it.

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use rand::SeedableRng;
use rand::rngs::StdRng;

use primetally_core::config::LogFormat;
use primetally_core::logging::{LogConfig, init_logging};
use primetally_core::{EngineConfig, Matrix, PrimeFrequencyEngine, QueryReport};

#[derive(Parser, Debug)]
#[command(name = "primetally", version)]
#[command(about = "Find the most frequent primes in a random square matrix")]
struct Cli {
    /// Matrix side length
    #[arg(short = 's', long, env = "PRIMETALLY_SIZE", default_value = "5000")]
    size: usize,

    /// Number of primes to report
    #[arg(short = 'k', long, env = "PRIMETALLY_COUNT", default_value = "5")]
    count: usize,

    /// Acceptable probability of two workers contending for one shard [default: 0.1]
    #[arg(long, env = "PRIMETALLY_COLLISION_PROBABILITY")]
    collision_probability: Option<f64>,

    /// Upper bound on worker threads (defaults to hardware concurrency)
    #[arg(long, env = "PRIMETALLY_MAX_THREADS")]
    max_threads: Option<usize>,

    /// Minimum matrix cells per worker thread [default: 1000]
    #[arg(long)]
    min_values_per_thread: Option<usize>,

    /// Seed for the matrix generator (random when omitted)
    #[arg(long, env = "PRIMETALLY_SEED")]
    seed: Option<u64>,

    /// TOML file with engine settings; flags take precedence
    #[arg(short = 'c', long, env = "PRIMETALLY_CONFIG")]
    config: Option<PathBuf>,

    /// Print the full query report as JSON
    #[arg(long)]
    json: bool,

    /// Log level (RUST_LOG overrides)
    #[arg(long, default_value = "warn")]
    log_level: String,

    /// Log output format: pretty or json
    #[arg(long, default_value = "pretty")]
    log_format: LogFormat,

    /// Also append logs to this file
    #[arg(long)]
    log_file: Option<PathBuf>,
}

impl Cli {
    fn log_config(&self) -> LogConfig {
        LogConfig {
            level: self.log_level.clone(),
            format: self.log_format,
            file: self.log_file.clone(),
        }
    }

    /// Settings from the config file (or defaults), overridden by flags.
    fn engine_config(&self) -> Result<EngineConfig> {
        let mut config = match &self.config {
            Some(path) => load_engine_config(path)?,
            None => EngineConfig::default(),
        };
        if let Some(p) = self.collision_probability {
            config.collision_probability = p;
        }
        if let Some(n) = self.min_values_per_thread {
            config.min_values_per_thread = n;
        }
        if self.max_threads.is_some() {
            config.max_threads = self.max_threads;
        }
        Ok(config)
    }
}

fn load_engine_config(path: &Path) -> Result<EngineConfig> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    EngineConfig::from_toml_str(&text)
        .with_context(|| format!("failed to load config file {}", path.display()))
}

fn render_plain(report: &QueryReport) -> Option<String> {
    let values = report.values();
    if values.is_empty() {
        return None;
    }
    Some(
        values
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" "),
    )
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_config()).context("failed to initialize logging")?;

    let engine = PrimeFrequencyEngine::with_config(cli.engine_config()?)
        .context("invalid engine configuration")?;

    let mut rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    let started = Instant::now();
    let matrix = Matrix::random(cli.size, &mut rng).context("failed to generate matrix")?;
    tracing::info!(
        size = cli.size,
        seed = ?cli.seed,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "generated matrix"
    );

    let started = Instant::now();
    let report = engine
        .analyze(&matrix, cli.count)
        .context("prime frequency query failed")?;
    tracing::info!(
        count = cli.count,
        threads = report.thread_count,
        shards = report.shard_count,
        distinct_primes = report.distinct_primes,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "query finished"
    );

    if cli.json {
        println!("{}", report.to_json_pretty()?);
    } else if let Some(line) = render_plain(&report) {
        println!("{line}");
    }
    Ok(())
}
