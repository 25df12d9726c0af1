//! Time utilities and the date window events are fetched for.

use chrono::{DateTime, Duration, TimeZone, Utc};
use std::fmt;

/// Timing constants.
pub mod constants {
    use super::Duration;

    /// Length of the window used when the caller gives no bounds (7 days).
    pub fn default_lookback() -> Duration {
        Duration::days(7)
    }
}

/// A timestamp with timezone (always UTC).
pub type Timestamp = DateTime<Utc>;

/// Get the current timestamp.
pub fn now() -> Timestamp {
    Utc::now()
}

/// Epoch seconds that cannot be represented as a timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidTimestamp(pub i64);

impl fmt::Display for InvalidTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Epoch seconds out of range: {}", self.0)
    }
}

impl std::error::Error for InvalidTimestamp {}

/// Optional lower and upper bounds on event dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DateWindow {
    /// Lower bound (`actual_since`).
    pub since: Option<Timestamp>,
    /// Upper bound (`actual_until`).
    pub until: Option<Timestamp>,
}

impl DateWindow {
    /// Create a window from optional bounds.
    pub fn new(since: Option<Timestamp>, until: Option<Timestamp>) -> Self {
        Self { since, until }
    }

    /// A window with no bounds.
    pub fn unbounded() -> Self {
        Self::default()
    }

    /// Build a window from optional epoch-second bounds.
    pub fn from_epoch_seconds(
        since: Option<i64>,
        until: Option<i64>,
    ) -> Result<Self, InvalidTimestamp> {
        Ok(Self {
            since: since.map(timestamp_from_epoch).transpose()?,
            until: until.map(timestamp_from_epoch).transpose()?,
        })
    }

    /// The trailing default window ending at `end`.
    pub fn trailing(end: Timestamp) -> Self {
        Self {
            since: Some(end - constants::default_lookback()),
            until: Some(end),
        }
    }

    /// Check if neither bound is set.
    pub fn is_unbounded(&self) -> bool {
        self.since.is_none() && self.until.is_none()
    }

    /// Check that the lower bound does not come after the upper bound.
    pub fn is_ordered(&self) -> bool {
        match (self.since, self.until) {
            (Some(since), Some(until)) => since <= until,
            _ => true,
        }
    }

    /// Resolve against `now`: an unbounded window becomes the trailing
    /// default window ending at `now`; any other window is kept as given.
    pub fn resolve(self, now: Timestamp) -> Self {
        if self.is_unbounded() {
            Self::trailing(now)
        } else {
            self
        }
    }

    /// Lower bound in epoch seconds.
    pub fn since_epoch(&self) -> Option<i64> {
        self.since.map(|t| t.timestamp())
    }

    /// Upper bound in epoch seconds.
    pub fn until_epoch(&self) -> Option<i64> {
        self.until.map(|t| t.timestamp())
    }
}

impl fmt::Display for DateWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fmt_bound =
            |b: Option<Timestamp>| b.map_or_else(|| "*".to_string(), |t| t.to_rfc3339());
        write!(f, "[{}, {}]", fmt_bound(self.since), fmt_bound(self.until))
    }
}

fn timestamp_from_epoch(secs: i64) -> Result<Timestamp, InvalidTimestamp> {
    Utc.timestamp_opt(secs, 0)
        .single()
        .ok_or(InvalidTimestamp(secs))
}
