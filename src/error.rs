//! Unified error types for the history collector.

use thiserror::Error;

/// Unified error type for the collector.
#[derive(Error, Debug)]
pub enum CollectorError {
    /// Configuration loading error.
    #[error("configuration error: {0}")]
    Config(#[from] envy::Error),

    /// Upstream API error.
    #[error("api error: {0}")]
    Api(#[from] ApiError),

    /// Dataset output error.
    #[error("dataset error: {0}")]
    Dataset(#[from] DatasetError),
}

/// Errors from the Kalshi API client.
///
/// Callers match on the error arm and decide whether to skip the item or
/// abort the run.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Network-level failure (connect, timeout, TLS).
    #[error("http request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with a non-200 status.
    #[error("{path} returned http {status}")]
    Status {
        /// Relative path of the failed request.
        path: String,
        /// Status code the server returned.
        status: reqwest::StatusCode,
    },

    /// The response body did not match the expected shape.
    #[error("failed to decode response from {path}: {source}")]
    Decode {
        /// Relative path of the request.
        path: String,
        /// Underlying JSON error.
        source: serde_json::Error,
    },

    /// The configured API key cannot be used as a header value.
    #[error("api key is not usable in an authorization header: {0}")]
    Credential(#[from] reqwest::header::InvalidHeaderValue),
}

/// Errors while writing the output dataset.
#[derive(Error, Debug)]
pub enum DatasetError {
    /// CSV serialization or write failure.
    #[error("csv write failed: {0}")]
    Csv(#[from] csv::Error),

    /// Filesystem-level failure while flushing.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenient Result type alias.
pub type Result<T> = std::result::Result<T, CollectorError>;
