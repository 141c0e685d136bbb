//! Error types for primetally-core

use thiserror::Error;

/// Result type alias using the library's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for primetally-core
#[derive(Error, Debug)]
pub enum Error {
    /// Collision probability bound is not a probability
    #[error("collision probability must be a finite value in [0, 1], got {0}")]
    InvalidCollisionProbability(f64),

    /// Engine configuration rejected by validation
    #[error("invalid engine configuration: {0}")]
    InvalidConfig(String),

    /// Engine configuration could not be parsed
    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),

    /// Matrix cell outside `[0, MAX_VALUE]`
    #[error("matrix value {value} at ({row}, {col}) exceeds maximum {max}")]
    ValueOutOfRange {
        row: usize,
        col: usize,
        value: u32,
        max: u32,
    },

    /// Row length differs from the number of rows
    #[error("matrix is not square: row {row} has {len} cells, expected {size}")]
    NotSquare { row: usize, len: usize, size: usize },

    /// Flat cell buffer does not hold `size * size` values
    #[error("matrix of size {size} needs {expected} cells, got {len}")]
    CellCountMismatch {
        size: usize,
        expected: usize,
        len: usize,
    },

    /// `size * size` cells do not fit in memory addressing
    #[error("matrix of size {size} has more cells than can be addressed")]
    MatrixTooLarge { size: usize },

    /// A counting worker could not be started; the query is aborted
    #[error("failed to spawn counting worker {worker}: {source}")]
    WorkerSpawn {
        worker: usize,
        #[source]
        source: std::io::Error,
    },

    /// A counting worker panicked before finishing its rows; the query is aborted
    #[error("counting worker {worker} panicked")]
    WorkerPanicked { worker: usize },

    /// Report serialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
