//! Error handling for the entry scanner
//!
//! Remote-call failures are `scanner_api::ApiError` and end up in a state
//! machine's Error variant; this type covers setup and persistence.

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Error types
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Serialization error (preference file)
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// HTTP client error (client construction)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// IO error (preference file)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
