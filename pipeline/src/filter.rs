//! Budget filtering of priced events.

use budgetevents_catalog::normalize_price;
use budgetevents_common::Event;
use rust_decimal::Decimal;

/// Attach the normalized price to `event`.
pub fn price_event(event: Event) -> Event {
    let parsed = normalize_price(event.price.as_deref(), event.is_free);
    event.with_parsed_price(parsed)
}

/// An event is affordable when it is free or its parsed price fits the budget.
///
/// Events without a parsed price are never affordable unless free.
pub fn is_affordable(event: &Event, budget: Decimal) -> bool {
    event.is_free || event.parsed_price.is_some_and(|price| price <= budget)
}

/// Price every event and keep those within `budget` (native units), in order.
pub fn apply_budget(events: Vec<Event>, budget: Decimal) -> Vec<Event> {
    events
        .into_iter()
        .map(price_event)
        .filter(|event| is_affordable(event, budget))
        .collect()
}
