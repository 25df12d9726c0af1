//! Currency conversion against the daily rate feed.

use std::sync::Arc;

use budgetevents_common::{Currency, CurrencyPair, FxRate};
use rust_decimal::Decimal;
use tracing::{debug, info, instrument};

use crate::error::FxResult;
use crate::feed::RateTable;
use crate::provider::RateFeed;

/// Converts amounts into the native currency using a freshly fetched feed.
///
/// Nothing is cached: every lookup fetches the feed once.
#[derive(Clone)]
pub struct CurrencyConverter {
    feed: Arc<dyn RateFeed>,
    native: Currency,
}

impl CurrencyConverter {
    /// Create a converter quoting into `native`.
    pub fn new(feed: Arc<dyn RateFeed>, native: Currency) -> Self {
        Self { feed, native }
    }

    /// Get the rate of `currency` in native units.
    #[instrument(
        skip(self, currency),
        fields(currency = %currency, source = self.feed.name())
    )]
    pub async fn quote(&self, currency: &Currency) -> FxResult<FxRate> {
        if *currency == self.native {
            debug!("Requested currency is native, using identity rate");
            return Ok(FxRate::identity(currency.clone()));
        }

        let document = self.feed.fetch_document().await?;
        let table = RateTable::parse(&document)?;
        let rate = table.rate_of(currency)?;

        info!(
            rate = %rate,
            feed_date = table.date().unwrap_or("unknown"),
            "Resolved exchange rate"
        );

        Ok(FxRate::new(
            CurrencyPair::new(currency.clone(), self.native.clone()),
            rate,
            self.feed.name(),
        )
        .with_as_of(table.date().map(str::to_string)))
    }

    /// How many native units equal one unit of `currency`.
    pub async fn rate_of(&self, currency: &Currency) -> FxResult<Decimal> {
        Ok(self.quote(currency).await?.rate)
    }
}
