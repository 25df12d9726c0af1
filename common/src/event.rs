//! Catalog event records.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A public event as returned by the event catalog.
///
/// `parsed_price` is absent in catalog responses; the pipeline fills it in
/// from `price` before filtering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Catalog identifier.
    pub id: u64,
    /// Event title.
    #[serde(default)]
    pub title: String,
    /// Free-text price as published (may be empty, hold ranges or currency words).
    #[serde(default)]
    pub price: Option<String>,
    /// Whether the catalog marks the event as free of charge.
    #[serde(default)]
    pub is_free: bool,
    /// Price in native currency units, once normalized.
    #[serde(default)]
    pub parsed_price: Option<Decimal>,
}

impl Event {
    /// Create an event with no parsed price.
    pub fn new(id: u64, title: impl Into<String>, price: Option<&str>, is_free: bool) -> Self {
        Self {
            id,
            title: title.into(),
            price: price.map(str::to_string),
            is_free,
            parsed_price: None,
        }
    }

    /// Attach a normalized price.
    pub fn with_parsed_price(mut self, parsed_price: Option<Decimal>) -> Self {
        self.parsed_price = parsed_price;
        self
    }
}
