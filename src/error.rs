//! Error types for rs-interlink.
//!
//! Placement itself never fails: malformed input degrades to the unchanged
//! document. These errors are returned by the configuration and validation
//! APIs only.

/// Error type for configuration and validation operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An option value is out of its allowed range.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The zone table does not cover the document exhaustively.
    #[error("Invalid zone table: {0}")]
    InvalidZones(String),

    /// The base URL cannot be used to synthesize target URLs.
    #[error("Invalid base URL: {0}")]
    InvalidBaseUrl(String),

    /// JSON configuration could not be parsed.
    #[error("Configuration parsing failed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for configuration operations.
pub type Result<T> = std::result::Result<T, Error>;
