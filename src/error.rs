//! Error types for Koma.
//!
//! Uses `thiserror` for structured error definitions. Expected absence of
//! content (missing series, missing pages, exhausted fallback) is never an
//! error; these types only describe genuine failures.

use thiserror::Error;

/// Failure reaching or reading the content store.
#[derive(Error, Debug)]
pub enum StoreError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// The backend answered with a non-success status
    #[error("Content API error: {0}")]
    ApiError(String),

    /// Failed to read the catalog file
    #[error("Failed to read catalog: {0}")]
    ReadError(#[from] std::io::Error),

    /// Catalog data could not be decoded
    #[error("Failed to parse catalog: {0}")]
    ParseError(#[from] serde_json::Error),

    /// A URL could not be built from configuration
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

/// Failure while checking the object store.
///
/// The prober absorbs these per candidate; they never abort a resolution.
#[derive(Error, Debug)]
pub enum StorageError {
    /// HEAD request failed
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Local filesystem check failed
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// A URL could not be built for the object
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

/// Error type for configuration operations.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse config file
    #[error("Failed to parse config: {0}")]
    ParseError(String),

    /// Missing required configuration value
    #[error("Missing required config value: {0}")]
    MissingValue(String),

    /// Invalid configuration value
    #[error("Invalid config value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Config directory not found
    #[error("Could not determine config directory")]
    NoConfigDir,
}

/// Terminal failure of an episode resolution.
#[derive(Error, Debug)]
pub enum ResolveError {
    /// The content store could not be reached; never retried here.
    #[error("Content backend unavailable: {0}")]
    BackendUnavailable(#[from] StoreError),
}
