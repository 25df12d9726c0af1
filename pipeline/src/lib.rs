//! BudgetEvents
//!
//! Returns the public events a budget can afford. A request fetches the
//! event catalog and the daily exchange-rate feed concurrently, converts the
//! budget into the catalog's native currency, normalizes each event's
//! free-text price and keeps the free or affordable events.
//!
//! # Example
//!
//! ```rust,ignore
//! use budgetevents::{BudgetFilterPipeline, ServiceConfig};
//! use rust_decimal_macros::dec;
//!
//! let config = ServiceConfig::from_env();
//! budgetevents::telemetry::init_tracing(&config.logging)?;
//!
//! let pipeline = BudgetFilterPipeline::from_config(&config)?;
//! let events = pipeline.get_filtered_events(dec!(100), "USD", None, None).await?;
//! ```

pub mod config;
pub mod error;
pub mod filter;
pub mod pipeline;
pub mod telemetry;

pub use config::{LogFormat, LoggingConfig, ServiceConfig};
pub use error::{PipelineError, PipelineResult};
pub use pipeline::BudgetFilterPipeline;
