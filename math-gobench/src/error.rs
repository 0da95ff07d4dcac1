//! Error types for the benchmark driver.
//!
//! Library operations (configuration, registry lookups, record persistence)
//! report a [`BenchError`]. Control signals raised while a run is in progress
//! are a separate type, [`crate::adapter::Signal`], and never surface here.

use math_test_functions::RegistryError;
use thiserror::Error;

/// Errors that can occur while configuring or driving a benchmark sweep.
#[derive(Debug, Error)]
pub enum BenchError {
    /// A configuration value is out of range or inconsistent.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// A required environment variable is missing or malformed.
    #[error("environment variable {var}: {reason}")]
    Environment {
        /// Name of the variable
        var: String,
        /// What is wrong with it
        reason: String,
    },

    /// No test function registered under this name.
    #[error("unknown test function: {0}")]
    UnknownFunction(String),

    /// No algorithm known under this name.
    #[error("unknown algorithm: {0}")]
    UnknownAlgorithm(String),

    /// The function cannot be built at the requested dimension.
    #[error("function {name} does not support dimension {dimension}")]
    InvalidDimension {
        /// Function name
        name: String,
        /// Requested dimension
        dimension: usize,
    },

    /// A run index beyond the number of runs of a record.
    #[error("run index {run} out of range for a record of {nbruns} runs")]
    InvalidRun {
        /// Offending run index
        run: usize,
        /// Number of runs held by the record
        nbruns: usize,
    },

    /// Filesystem failure while reading or writing records.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed record or configuration file.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized `Result` type for benchmark operations.
pub type Result<T> = std::result::Result<T, BenchError>;

impl BenchError {
    /// Returns `true` if this is a configuration-related error.
    ///
    /// This includes `Config`, `Environment`, `UnknownFunction`,
    /// `UnknownAlgorithm` and `InvalidDimension`.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            BenchError::Config(_)
                | BenchError::Environment { .. }
                | BenchError::UnknownFunction(_)
                | BenchError::UnknownAlgorithm(_)
                | BenchError::InvalidDimension { .. }
        )
    }

    /// Returns `true` if this error comes from reading or writing files.
    pub fn is_io_error(&self) -> bool {
        matches!(self, BenchError::Io(_) | BenchError::Json(_))
    }
}

impl From<RegistryError> for BenchError {
    fn from(err: RegistryError) -> Self {
        match err {
            RegistryError::UnknownFunction(name) => BenchError::UnknownFunction(name),
            RegistryError::InvalidDimension { name, dimension } => {
                BenchError::InvalidDimension { name, dimension }
            }
            RegistryError::ReservedName(name) => {
                BenchError::Config(format!("function name {name} is reserved"))
            }
        }
    }
}
