//! Catalog error types.

use thiserror::Error;

/// Errors that can occur while fetching events from the catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The request could not be sent or the body could not be read.
    #[error("Catalog request failed: {0}")]
    Request(String),

    /// The catalog answered with a non-success status.
    #[error("Catalog returned HTTP status {0}")]
    Status(u16),

    /// The body is not a valid event listing.
    #[error("Failed to decode catalog response: {0}")]
    Decode(String),

    /// The request exceeded its timeout.
    #[error("Catalog request timed out: {0}")]
    Timeout(String),

    /// The client could not be set up.
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl CatalogError {
    /// Check whether a later attempt might succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            CatalogError::Request(_) | CatalogError::Timeout(_) => true,
            CatalogError::Status(status) => *status >= 500 || *status == 429,
            CatalogError::Decode(_) | CatalogError::Configuration(_) => false,
        }
    }
}

/// Result type for catalog operations.
pub type CatalogResult<T> = Result<T, CatalogError>;
