//! primetally-core: Core library for primetally
//!
//! Finds the K most frequent prime values in a large square matrix of bounded
//! integers, counting in parallel across row ranges into independently locked
//! shards.
//!
//! # Architecture
//!
//! ```text
//! Matrix → partition (threads, row ranges) → shard_sizer (shard count)
//!             ↓
//!     scoped workers → ShardSet → FrequencyShard (RwLock per shard)
//!             ↓ join
//!     aggregate (rank, top-K) → Vec<u32>
//! ```
//!
//! # Modules
//!
//! - `primality`: primality test gating shard insertion
//! - `frequency_shard`: one independently locked prime → count map
//! - `shard_set`: fixed shard sequence and the value → shard bucket mapping
//! - `shard_sizer`: shard count from a birthday-collision budget
//! - `partition`: worker count and contiguous row ranges
//! - `aggregate`: merge, rank and top-K selection
//! - `engine`: orchestrates a query end to end
//! - `matrix`: validated square input matrix
//! - `config`: engine and log configuration
//! - `logging`: tracing subscriber setup
//!
//! # Example
//!
//! ```
//! use primetally_core::{Matrix, PrimeFrequencyEngine};
//!
//! let matrix = Matrix::from_rows(vec![
//!     vec![2, 2, 4],
//!     vec![3, 9, 5],
//!     vec![5, 5, 7],
//! ])?;
//! let engine = PrimeFrequencyEngine::new(0.1)?;
//! let top = engine.most_frequent_primes(&matrix, 2)?;
//! assert_eq!(top, vec![5, 2]);
//! # Ok::<(), primetally_core::Error>(())
//! ```
//!
//! # Safety
//!
//! This crate forbids unsafe code.

#![forbid(unsafe_code)]

pub mod aggregate;
pub mod config;
pub mod engine;
pub mod error;
pub mod frequency_shard;
pub mod logging;
pub mod matrix;
pub mod partition;
pub mod primality;
pub mod shard_set;
pub mod shard_sizer;

pub use aggregate::FrequencyRecord;
pub use config::EngineConfig;
pub use engine::{PrimeFrequencyEngine, QueryPlan, QueryReport};
pub use error::{Error, Result};
pub use matrix::{MAX_VALUE, Matrix};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
