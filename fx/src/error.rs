//! FX error types.

use budgetevents_common::Currency;
use thiserror::Error;

/// Errors that can occur while fetching or reading the rate feed.
#[derive(Debug, Error)]
pub enum FxError {
    /// The feed document could not be parsed as XML.
    #[error("Malformed rate feed: {0}")]
    MalformedFeed(String),

    /// The feed parsed but lists no entry for the currency.
    #[error("Currency not found in rate feed: {0}")]
    CurrencyNotFound(Currency),

    /// The matched entry carries no usable rate text.
    #[error("Invalid rate {value:?} for {currency}")]
    InvalidRate { currency: Currency, value: String },

    /// The feed could not be fetched (network error or non-success status).
    #[error("Rate feed unavailable: {0}")]
    FeedUnavailable(String),

    /// The feed request exceeded its timeout.
    #[error("Rate feed request timed out: {0}")]
    Timeout(String),

    /// The feed source could not be set up.
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl FxError {
    /// Check whether the feed violated its document contract.
    pub fn is_malformed_feed(&self) -> bool {
        matches!(self, FxError::MalformedFeed(_))
    }

    /// Check whether a later attempt might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, FxError::FeedUnavailable(_) | FxError::Timeout(_))
    }
}

/// Result type for FX operations.
pub type FxResult<T> = Result<T, FxError>;
