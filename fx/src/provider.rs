//! Rate feed sources.

use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, instrument, warn};

use crate::error::{FxError, FxResult};

/// Default feed location: the Central Bank of Russia daily rates.
pub const DEFAULT_RATE_FEED_URL: &str = "https://www.cbr.ru/scripts/XML_daily.asp";

/// Trait for sources of the raw rate feed document.
#[async_trait]
pub trait RateFeed: Send + Sync {
    /// Get the source name.
    fn name(&self) -> &str;

    /// Fetch the current feed document.
    async fn fetch_document(&self) -> FxResult<String>;
}

/// Configuration for the HTTP rate feed.
#[derive(Debug, Clone)]
pub struct RateFeedConfig {
    /// Feed URL.
    pub url: String,
    /// Total request timeout.
    pub timeout: Duration,
    /// Connection timeout.
    pub connect_timeout: Duration,
}

impl Default for RateFeedConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_RATE_FEED_URL.to_string(),
            timeout: Duration::from_secs(10),
            connect_timeout: Duration::from_secs(5),
        }
    }
}

impl RateFeedConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(url) = std::env::var("RATE_FEED_URL") {
            config.url = url;
        }

        if let Ok(secs) = std::env::var("RATE_FEED_TIMEOUT_SECS") {
            if let Ok(secs) = secs.parse() {
                config.timeout = Duration::from_secs(secs);
            }
        }

        config
    }

    /// Validate configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.url.is_empty() {
            return Err("Rate feed URL cannot be empty".to_string());
        }

        if !(self.url.starts_with("http://") || self.url.starts_with("https://")) {
            return Err(format!("Rate feed URL must be http(s): {}", self.url));
        }

        if self.timeout.is_zero() || self.connect_timeout.is_zero() {
            return Err("Rate feed timeouts cannot be zero".to_string());
        }

        Ok(())
    }
}

/// Fetches the feed over HTTP. Every call issues a fresh request.
pub struct HttpRateFeed {
    client: reqwest::Client,
    config: RateFeedConfig,
}

impl HttpRateFeed {
    /// Create a new HTTP feed source.
    pub fn new(config: RateFeedConfig) -> FxResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .build()
            .map_err(|e| FxError::Configuration(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    fn map_request_error(&self, e: reqwest::Error) -> FxError {
        if e.is_timeout() {
            FxError::Timeout(format!("{} after {:?}", self.config.url, self.config.timeout))
        } else {
            FxError::FeedUnavailable(e.to_string())
        }
    }
}

#[async_trait]
impl RateFeed for HttpRateFeed {
    fn name(&self) -> &str {
        "HTTP"
    }

    #[instrument(skip(self), fields(url = %self.config.url))]
    async fn fetch_document(&self) -> FxResult<String> {
        debug!("Fetching rate feed");

        let response = self
            .client
            .get(&self.config.url)
            .send()
            .await
            .map_err(|e| self.map_request_error(e))?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), "Rate feed returned non-success status");
            return Err(FxError::FeedUnavailable(format!("HTTP status {}", status)));
        }

        let body = response
            .text()
            .await
            .map_err(|e| self.map_request_error(e))?;

        debug!(bytes = body.len(), "Rate feed fetched");
        Ok(body)
    }
}

/// Mock rate feed for testing.
#[cfg(any(test, feature = "test-utils"))]
pub struct MockRateFeed {
    document: Option<String>,
    delay: Duration,
    calls: std::sync::atomic::AtomicUsize,
}

#[cfg(any(test, feature = "test-utils"))]
impl MockRateFeed {
    /// A feed that serves `document`.
    pub fn with_document(document: impl Into<String>) -> Self {
        Self {
            document: Some(document.into()),
            delay: Duration::ZERO,
            calls: std::sync::atomic::AtomicUsize::new(0),
        }
    }

    /// A feed serving entries for the given `(code, rate)` pairs.
    pub fn with_rates(rates: &[(&str, &str)]) -> Self {
        let entries: String = rates
            .iter()
            .map(|(code, rate)| {
                format!(
                    "<Valute><CharCode>{}</CharCode><Nominal>1</Nominal>\
                     <VunitRate>{}</VunitRate></Valute>",
                    code, rate
                )
            })
            .collect();
        Self::with_document(format!(r#"<ValCurs Date="01.01.2026">{}</ValCurs>"#, entries))
    }

    /// A feed whose fetch always fails.
    pub fn unavailable() -> Self {
        Self {
            document: None,
            delay: Duration::ZERO,
            calls: std::sync::atomic::AtomicUsize::new(0),
        }
    }

    /// Delay every fetch by `delay`.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Number of fetches made so far.
    pub fn calls(&self) -> usize {
        self.calls.load(std::sync::atomic::Ordering::SeqCst)
    }
}

#[cfg(any(test, feature = "test-utils"))]
#[async_trait]
impl RateFeed for MockRateFeed {
    fn name(&self) -> &str {
        "MOCK"
    }

    async fn fetch_document(&self) -> FxResult<String> {
        self.calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        self.document
            .clone()
            .ok_or_else(|| FxError::FeedUnavailable("mock feed unavailable".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::{assert_err, assert_ok};

    #[tokio::test]
    async fn test_mock_feed_serves_document() {
        let feed = MockRateFeed::with_rates(&[("USD", "450")]);

        let document = assert_ok!(feed.fetch_document().await);

        assert!(document.contains("<CharCode>USD</CharCode>"));
        assert_eq!(feed.calls(), 1);
    }

    #[tokio::test]
    async fn test_mock_feed_unavailable() {
        let feed = MockRateFeed::unavailable();

        let err = assert_err!(feed.fetch_document().await);

        assert!(err.is_retryable());
        assert!(!err.is_malformed_feed());
    }

    #[test]
    fn test_default_config() {
        let config = RateFeedConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_invalid_config() {
        let mut config = RateFeedConfig::default();
        config.url = "ftp://example.com/rates.xml".to_string();
        assert!(config.validate().is_err());

        let mut config = RateFeedConfig::default();
        config.timeout = Duration::ZERO;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_http_feed_builds() {
        assert!(HttpRateFeed::new(RateFeedConfig::default()).is_ok());
    }
}
