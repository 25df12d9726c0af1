//! BudgetEvents Common Types
//!
//! Shared types used across the BudgetEvents crates: catalog events,
//! monetary amounts and exchange rates, and the date window events are
//! fetched for.

pub mod event;
pub mod monetary;
pub mod time;

pub use event::*;
pub use monetary::*;
pub use time::*;
