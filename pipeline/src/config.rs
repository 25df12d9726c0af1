//! Service configuration.

use budgetevents_catalog::CatalogConfig;
use budgetevents_common::Currency;
use budgetevents_fx::RateFeedConfig;

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// One JSON object per line.
    Json,
    /// Human-readable lines.
    Pretty,
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(LogFormat::Json),
            "pretty" | "text" => Ok(LogFormat::Pretty),
            other => Err(format!("Unknown log format: {}", other)),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is unset.
    pub level: String,
    /// Output format.
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

/// Main service configuration.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Event catalog client configuration.
    pub catalog: CatalogConfig,
    /// Rate feed configuration.
    pub rate_feed: RateFeedConfig,
    /// Currency the catalog quotes prices in.
    pub native_currency: Currency,
    /// Logging configuration.
    pub logging: LoggingConfig,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            catalog: CatalogConfig::default(),
            rate_feed: RateFeedConfig::default(),
            native_currency: Currency::rub(),
            logging: LoggingConfig::default(),
        }
    }
}

impl ServiceConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let mut config = Self {
            catalog: CatalogConfig::from_env(),
            rate_feed: RateFeedConfig::from_env(),
            ..Self::default()
        };

        if let Ok(code) = std::env::var("NATIVE_CURRENCY") {
            config.native_currency = Currency::new(code);
        }

        if let Ok(level) = std::env::var("LOG_LEVEL") {
            config.logging.level = level;
        }

        if let Ok(format) = std::env::var("LOG_FORMAT") {
            if let Ok(format) = format.parse() {
                config.logging.format = format;
            }
        }

        config
    }

    /// Validate configuration.
    pub fn validate(&self) -> Result<(), String> {
        self.catalog.validate()?;
        self.rate_feed.validate()?;

        if self.native_currency.is_blank() {
            return Err("Native currency cannot be empty".to_string());
        }

        if self.logging.level.is_empty() {
            return Err("Log level cannot be empty".to_string());
        }

        Ok(())
    }
}
