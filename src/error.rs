//! Error types for playlist resolution.
//!
//! Remote fetch results and pipeline results are tagged outcomes, not
//! errors (see [`crate::api::FetchOutcome`] and
//! [`crate::models::PipelineOutcome`]). This type covers setup failures
//! and the normalizer's internal failures.

use thiserror::Error;

/// Main error type for the crate.
#[derive(Debug, Error)]
pub enum ResolverError {
    /// Configuration is missing or out of range.
    #[error("Config error: {0}")]
    Config(String),

    /// I/O operation failed.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON parsing failed.
    #[error("Parse error: {0}")]
    ParseError(#[from] serde_json::Error),

    /// HTTP client could not be built.
    #[error("Request error: {0}")]
    RequestError(#[from] reqwest::Error),

    /// Upstream payload no longer matches the expected structure.
    #[error("Normalization error: {0}")]
    Normalization(String),

    /// Embeddable player fragment could not be built for a track.
    #[error("Iframe derivation error: {0}")]
    Derivation(String),
}

/// Result type alias for crate operations.
pub type Result<T> = std::result::Result<T, ResolverError>;
