//! Error types for server startup and configuration
//!
//! Request handling never produces these: every per-request failure is
//! answered with an HTTP status instead.

use thiserror::Error;

/// Result type for server operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration could not be loaded or deserialized
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// A glob pattern in the configuration does not compile
    #[error("Invalid glob pattern '{pattern}': {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    /// Listen address could not be parsed
    #[error("Invalid address: {0}")]
    Address(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
