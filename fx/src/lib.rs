//! BudgetEvents FX
//!
//! Exchange rates for converting a budget into the catalog's native
//! currency.
//!
//! # Features
//!
//! - Parsing of the daily XML rate feed, tolerant of comma decimals
//! - HTTP feed source with configurable timeouts
//! - Native-currency quotes, one feed fetch per lookup
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use budgetevents_fx::{CurrencyConverter, HttpRateFeed, RateFeedConfig};
//! use budgetevents_common::Currency;
//!
//! let feed = Arc::new(HttpRateFeed::new(RateFeedConfig::default())?);
//! let converter = CurrencyConverter::new(feed, Currency::rub());
//!
//! let rate = converter.rate_of(&Currency::usd()).await?;
//! ```

pub mod converter;
pub mod error;
pub mod feed;
pub mod provider;

pub use converter::CurrencyConverter;
pub use error::{FxError, FxResult};
pub use feed::{extract_rate, RateEntry, RateTable};
pub use provider::{HttpRateFeed, RateFeed, RateFeedConfig};

#[cfg(any(test, feature = "test-utils"))]
pub use provider::MockRateFeed;
