//! The budget-filtered event pipeline.

use std::sync::Arc;

use budgetevents_catalog::{EventSource, HttpEventSource};
use budgetevents_common::{time, ConversionError, Currency, DateWindow, Event, Money};
use budgetevents_fx::{CurrencyConverter, FxError, HttpRateFeed};
use rust_decimal::Decimal;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::config::ServiceConfig;
use crate::error::{PipelineError, PipelineResult};
use crate::filter;

/// Fetches events and the exchange rate concurrently and keeps the events
/// a budget affords.
///
/// The two remote calls share nothing; the pipeline joins them and fails as
/// a whole as soon as either fails, dropping the other in-flight call.
pub struct BudgetFilterPipeline {
    events: Arc<dyn EventSource>,
    converter: CurrencyConverter,
}

impl BudgetFilterPipeline {
    /// Create a pipeline from its collaborators.
    pub fn new(events: Arc<dyn EventSource>, converter: CurrencyConverter) -> Self {
        Self { events, converter }
    }

    /// Build a pipeline backed by HTTP sources.
    pub fn from_config(config: &ServiceConfig) -> PipelineResult<Self> {
        config.validate().map_err(PipelineError::Configuration)?;

        let events = HttpEventSource::new(config.catalog.clone())
            .map_err(|e| PipelineError::Configuration(e.to_string()))?;
        let feed = HttpRateFeed::new(config.rate_feed.clone())
            .map_err(|e| PipelineError::Configuration(e.to_string()))?;

        Ok(Self::new(
            Arc::new(events),
            CurrencyConverter::new(Arc::new(feed), config.native_currency.clone()),
        ))
    }

    /// Events affordable within `budget`, given in `currency`.
    ///
    /// Bounds are epoch seconds; when both are omitted the trailing 7-day
    /// window ending now is used.
    pub async fn get_filtered_events(
        &self,
        budget: Decimal,
        currency: &str,
        date_from: Option<i64>,
        date_to: Option<i64>,
    ) -> PipelineResult<Vec<Event>> {
        let currency = Currency::new(currency);
        if currency.is_blank() {
            return Err(PipelineError::InvalidRequest(
                "Currency code cannot be empty".to_string(),
            ));
        }

        let window = DateWindow::from_epoch_seconds(date_from, date_to)
            .map_err(|e| PipelineError::InvalidRequest(e.to_string()))?;

        self.run(budget, &currency, window).await
    }

    /// Run the pipeline for one request.
    #[instrument(
        skip_all,
        fields(request_id = %Uuid::now_v7(), budget = %budget, currency = %currency)
    )]
    pub async fn run(
        &self,
        budget: Decimal,
        currency: &Currency,
        window: DateWindow,
    ) -> PipelineResult<Vec<Event>> {
        let budget = Money::new(budget, currency.clone());
        if budget.is_negative() {
            return Err(PipelineError::InvalidRequest(format!(
                "Budget cannot be negative: {}",
                budget
            )));
        }
        if !window.is_ordered() {
            return Err(PipelineError::InvalidRequest(format!(
                "Window start is after its end: {}",
                window
            )));
        }

        let window = window.resolve(time::now());
        info!(window = %window, "Fetching events and exchange rate");

        let events = async {
            self.events
                .fetch(&window)
                .await
                .map_err(PipelineError::from)
        };
        let quote = async {
            self.converter
                .quote(currency)
                .await
                .map_err(PipelineError::from)
        };

        let (events, quote) = match tokio::try_join!(events, quote) {
            Ok(joined) => joined,
            Err(e) => {
                warn!(error = %e, code = e.error_code(), "Pipeline aborted");
                return Err(e);
            }
        };

        let converted = quote.convert(&budget).map_err(|e| match e {
            ConversionError::Overflow { .. } => PipelineError::InvalidRequest(e.to_string()),
            ConversionError::CurrencyMismatch { .. } => {
                PipelineError::RateUnavailable(FxError::InvalidRate {
                    currency: currency.clone(),
                    value: e.to_string(),
                })
            }
        })?;

        let fetched = events.len();
        let affordable = filter::apply_budget(events, converted.value);

        info!(
            rate = %quote.rate,
            converted_budget = %converted,
            fetched,
            kept = affordable.len(),
            "Budget filter applied"
        );

        Ok(affordable)
    }
}
