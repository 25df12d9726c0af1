//! Pipeline error types.

use budgetevents_catalog::CatalogError;
use budgetevents_fx::FxError;
use thiserror::Error;

/// Errors that abort a budget-filtered event lookup.
///
/// None of these is retried by the pipeline; no partial list is returned.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The event catalog could not be fetched or decoded.
    #[error("Event catalog unavailable: {0}")]
    UpstreamUnavailable(#[source] CatalogError),

    /// The rate feed could not be fetched or lacks a usable rate for the currency.
    #[error("Exchange rate unavailable: {0}")]
    RateUnavailable(#[source] FxError),

    /// The rate feed is not an XML document.
    #[error("Rate feed violates its document contract: {0}")]
    MalformedFeed(#[source] FxError),

    /// The caller's arguments are unusable.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The pipeline could not be built from configuration.
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl PipelineError {
    /// Check whether the calling layer may retry the request.
    pub fn is_retryable(&self) -> bool {
        match self {
            PipelineError::UpstreamUnavailable(e) => e.is_retryable(),
            PipelineError::RateUnavailable(e) => e.is_retryable(),
            PipelineError::MalformedFeed(_)
            | PipelineError::InvalidRequest(_)
            | PipelineError::Configuration(_) => false,
        }
    }

    /// Get a stable error code for responses and logs.
    pub fn error_code(&self) -> &'static str {
        match self {
            PipelineError::UpstreamUnavailable(_) => "UPSTREAM_UNAVAILABLE",
            PipelineError::RateUnavailable(_) => "RATE_UNAVAILABLE",
            PipelineError::MalformedFeed(_) => "MALFORMED_FEED",
            PipelineError::InvalidRequest(_) => "INVALID_REQUEST",
            PipelineError::Configuration(_) => "CONFIGURATION_ERROR",
        }
    }
}

impl From<FxError> for PipelineError {
    fn from(e: FxError) -> Self {
        if e.is_malformed_feed() {
            PipelineError::MalformedFeed(e)
        } else {
            PipelineError::RateUnavailable(e)
        }
    }
}

impl From<CatalogError> for PipelineError {
    fn from(e: CatalogError) -> Self {
        PipelineError::UpstreamUnavailable(e)
    }
}

/// Result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;
    use budgetevents_common::Currency;

    #[test]
    fn test_fx_errors_split_by_cause() {
        let malformed: PipelineError = FxError::MalformedFeed("unexpected end".to_string()).into();
        let missing: PipelineError = FxError::CurrencyNotFound(Currency::gbp()).into();

        assert_eq!(malformed.error_code(), "MALFORMED_FEED");
        assert_eq!(missing.error_code(), "RATE_UNAVAILABLE");
        assert!(missing.to_string().contains("GBP"));
    }

    #[test]
    fn test_retryability() {
        let network: PipelineError = FxError::Timeout("10s".to_string()).into();
        let upstream: PipelineError = CatalogError::Status(502).into();
        let malformed: PipelineError = FxError::MalformedFeed("x".to_string()).into();

        assert!(network.is_retryable());
        assert!(upstream.is_retryable());
        assert!(!malformed.is_retryable());
        assert!(!PipelineError::InvalidRequest("x".to_string()).is_retryable());
    }
}
