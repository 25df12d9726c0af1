//! BudgetEvents Catalog
//!
//! Client for the public event catalog and normalization of its free-text
//! prices.

pub mod client;
pub mod error;
pub mod price;

pub use client::{parse_events, CatalogConfig, EventSource, HttpEventSource};
pub use error::{CatalogError, CatalogResult};
pub use price::normalize_price;

#[cfg(any(test, feature = "test-utils"))]
pub use client::MockEventSource;
