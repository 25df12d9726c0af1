//! Event catalog sources.

use std::time::Duration;

use async_trait::async_trait;
use budgetevents_common::{DateWindow, Event};
use serde::Deserialize;
use tracing::{debug, instrument, warn};

use crate::error::{CatalogError, CatalogResult};

/// Default catalog endpoint: the KudaGo public events API.
pub const DEFAULT_BASE_URL: &str = "https://kudago.com/public-api/v1.4/events/";

/// Default filter suffix selecting the fields events are built from.
pub const DEFAULT_FILTER_SUFFIX: &str =
    "?fields=id,title,price,is_free&page_size=100&text_format=text";

/// Trait for sources of catalog events.
#[async_trait]
pub trait EventSource: Send + Sync {
    /// Get the source name.
    fn name(&self) -> &str;

    /// Fetch the events within `window`.
    async fn fetch(&self, window: &DateWindow) -> CatalogResult<Vec<Event>>;
}

/// Configuration for the HTTP catalog client.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// Events endpoint.
    pub base_url: String,
    /// Fixed query appended to the endpoint.
    pub filter_suffix: String,
    /// Total request timeout.
    pub timeout: Duration,
    /// Connection timeout.
    pub connect_timeout: Duration,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            filter_suffix: DEFAULT_FILTER_SUFFIX.to_string(),
            timeout: Duration::from_secs(10),
            connect_timeout: Duration::from_secs(5),
        }
    }
}

impl CatalogConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(url) = std::env::var("EVENTS_API_BASE_URL") {
            config.base_url = url;
        }

        if let Ok(suffix) = std::env::var("EVENTS_API_FILTER_SUFFIX") {
            config.filter_suffix = suffix;
        }

        if let Ok(secs) = std::env::var("EVENTS_API_TIMEOUT_SECS") {
            if let Ok(secs) = secs.parse() {
                config.timeout = Duration::from_secs(secs);
            }
        }

        config
    }

    /// Validate configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.base_url.is_empty() {
            return Err("Events API base URL cannot be empty".to_string());
        }

        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(format!("Events API base URL must be http(s): {}", self.base_url));
        }

        if self.timeout.is_zero() || self.connect_timeout.is_zero() {
            return Err("Events API timeouts cannot be zero".to_string());
        }

        Ok(())
    }

    /// Build the request URL for `window`.
    ///
    /// Bounds are sent as `actual_since` / `actual_until` epoch seconds,
    /// each only when present.
    pub fn request_url(&self, window: &DateWindow) -> String {
        let mut url = format!("{}{}", self.base_url, self.filter_suffix);

        let params = [
            ("actual_since", window.since_epoch()),
            ("actual_until", window.until_epoch()),
        ];
        for (key, value) in params {
            if let Some(value) = value {
                let separator = if url.contains('?') { '&' } else { '?' };
                url.push(separator);
                url.push_str(&format!("{}={}", key, value));
            }
        }

        url
    }
}

/// One page of the catalog listing.
#[derive(Debug, Deserialize)]
struct EventPage {
    #[serde(default)]
    results: Option<Vec<Event>>,
}

/// Decode a catalog response body.
///
/// An empty or `null` body, or a page without results, is an empty list.
pub fn parse_events(body: &str) -> CatalogResult<Vec<Event>> {
    if body.trim().is_empty() {
        return Ok(Vec::new());
    }

    let page: Option<EventPage> =
        serde_json::from_str(body).map_err(|e| CatalogError::Decode(e.to_string()))?;

    Ok(page.and_then(|p| p.results).unwrap_or_default())
}

/// Fetches events from the catalog over HTTP.
pub struct HttpEventSource {
    client: reqwest::Client,
    config: CatalogConfig,
}

impl HttpEventSource {
    /// Create a new HTTP catalog source.
    pub fn new(config: CatalogConfig) -> CatalogResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .build()
            .map_err(|e| {
                CatalogError::Configuration(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self { client, config })
    }

    fn map_request_error(&self, e: reqwest::Error) -> CatalogError {
        if e.is_timeout() {
            CatalogError::Timeout(format!("after {:?}", self.config.timeout))
        } else {
            CatalogError::Request(e.to_string())
        }
    }
}

#[async_trait]
impl EventSource for HttpEventSource {
    fn name(&self) -> &str {
        "HTTP"
    }

    #[instrument(skip(self, window), fields(window = %window))]
    async fn fetch(&self, window: &DateWindow) -> CatalogResult<Vec<Event>> {
        let url = self.config.request_url(window);
        debug!(url = %url, "Fetching events");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| self.map_request_error(e))?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), "Catalog returned non-success status");
            return Err(CatalogError::Status(status.as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| self.map_request_error(e))?;

        let events = parse_events(&body)?;
        debug!(count = events.len(), "Events fetched");
        Ok(events)
    }
}

/// Mock event source for testing.
#[cfg(any(test, feature = "test-utils"))]
pub struct MockEventSource {
    events: Option<Vec<Event>>,
    delay: Duration,
    windows: parking_lot::Mutex<Vec<DateWindow>>,
}

#[cfg(any(test, feature = "test-utils"))]
impl MockEventSource {
    /// A source that serves `events`.
    pub fn with_events(events: Vec<Event>) -> Self {
        Self {
            events: Some(events),
            delay: Duration::ZERO,
            windows: parking_lot::Mutex::new(Vec::new()),
        }
    }

    /// A source whose fetch always fails.
    pub fn unavailable() -> Self {
        Self {
            events: None,
            delay: Duration::ZERO,
            windows: parking_lot::Mutex::new(Vec::new()),
        }
    }

    /// Delay every fetch by `delay`.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Windows requested so far, in call order.
    pub fn requested_windows(&self) -> Vec<DateWindow> {
        self.windows.lock().clone()
    }
}

#[cfg(any(test, feature = "test-utils"))]
#[async_trait]
impl EventSource for MockEventSource {
    fn name(&self) -> &str {
        "MOCK"
    }

    async fn fetch(&self, window: &DateWindow) -> CatalogResult<Vec<Event>> {
        self.windows.lock().push(*window);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        self.events
            .clone()
            .ok_or_else(|| CatalogError::Status(503))
    }
}
