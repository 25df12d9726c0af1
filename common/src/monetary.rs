//! Monetary types for BudgetEvents.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// A monetary amount with currency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    /// The amount value.
    pub value: Decimal,
    /// Currency code the amount is expressed in.
    pub currency: Currency,
}

impl Money {
    /// Create a new Money instance.
    pub fn new(value: Decimal, currency: Currency) -> Self {
        Self { value, currency }
    }

    /// Check if the amount is negative.
    pub fn is_negative(&self) -> bool {
        self.value < Decimal::ZERO
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.value, self.currency)
    }
}

/// Errors when applying a rate to an amount.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConversionError {
    /// The amount is not in the rate's base currency.
    #[error("Currency mismatch: expected {expected}, got {actual}")]
    CurrencyMismatch { expected: Currency, actual: Currency },

    /// The converted amount does not fit in a decimal.
    #[error("Conversion overflow: {amount} at rate {rate}")]
    Overflow { amount: Money, rate: Decimal },
}

/// Currency character code as published by the rate feed (e.g. "USD").
///
/// Codes are compared exactly; no case folding is applied, so `usd` and
/// `USD` are different currencies.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Currency(String);

impl Currency {
    /// Create a new currency from code.
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    /// Get the currency code.
    pub fn code(&self) -> &str {
        &self.0
    }

    /// Check whether the code is empty or only whitespace.
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }

    /// Common currencies
    pub fn rub() -> Self {
        Self::new("RUB")
    }

    pub fn usd() -> Self {
        Self::new("USD")
    }

    pub fn eur() -> Self {
        Self::new("EUR")
    }

    pub fn gbp() -> Self {
        Self::new("GBP")
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A currency pair for FX operations.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CurrencyPair {
    /// Currency being converted from (the requested currency).
    pub base: Currency,
    /// Currency being converted into (the native currency).
    pub quote: Currency,
}

impl CurrencyPair {
    /// Create a new currency pair.
    pub fn new(base: Currency, quote: Currency) -> Self {
        Self { base, quote }
    }
}

impl fmt::Display for CurrencyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.base, self.quote)
    }
}

/// Exchange rate: how many units of `pair.quote` equal one unit of `pair.base`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FxRate {
    /// The currency pair.
    pub pair: CurrencyPair,
    /// Quote units per one base unit.
    pub rate: Decimal,
    /// Publication date reported by the feed, if any.
    pub as_of: Option<String>,
    /// Rate source.
    pub source: String,
}

impl FxRate {
    /// Create a new FX rate.
    pub fn new(pair: CurrencyPair, rate: Decimal, source: impl Into<String>) -> Self {
        Self {
            pair,
            rate,
            as_of: None,
            source: source.into(),
        }
    }

    /// Rate of a currency against itself.
    pub fn identity(currency: Currency) -> Self {
        Self::new(
            CurrencyPair::new(currency.clone(), currency),
            Decimal::ONE,
            "IDENTITY",
        )
    }

    /// Attach the feed publication date.
    pub fn with_as_of(mut self, as_of: Option<String>) -> Self {
        self.as_of = as_of;
        self
    }

    /// Convert an amount in the base currency into the quote currency.
    ///
    /// The result is not rounded.
    pub fn convert(&self, amount: &Money) -> Result<Money, ConversionError> {
        if amount.currency != self.pair.base {
            return Err(ConversionError::CurrencyMismatch {
                expected: self.pair.base.clone(),
                actual: amount.currency.clone(),
            });
        }

        let value = amount
            .value
            .checked_mul(self.rate)
            .ok_or_else(|| ConversionError::Overflow {
                amount: amount.clone(),
                rate: self.rate,
            })?;

        Ok(Money::new(value, self.pair.quote.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_fx_rate_conversion() {
        let rate = FxRate::new(
            CurrencyPair::new(Currency::usd(), Currency::rub()),
            dec!(450),
            "TEST",
        );

        let budget = Money::new(dec!(100), Currency::usd());
        let converted = rate.convert(&budget).unwrap();

        assert_eq!(converted.currency, Currency::rub());
        assert_eq!(converted.value, dec!(45000));
    }

    #[test]
    fn test_conversion_keeps_fractional_part() {
        let rate = FxRate::new(
            CurrencyPair::new(Currency::eur(), Currency::rub()),
            dec!(92.5083),
            "TEST",
        );

        let converted = rate.convert(&Money::new(dec!(2.5), Currency::eur())).unwrap();
        assert_eq!(converted.value, dec!(231.27075));
    }

    #[test]
    fn test_currency_mismatch() {
        let rate = FxRate::new(
            CurrencyPair::new(Currency::usd(), Currency::rub()),
            dec!(450),
            "TEST",
        );

        let result = rate.convert(&Money::new(dec!(1), Currency::eur()));
        assert!(matches!(result, Err(ConversionError::CurrencyMismatch { .. })));
    }

    #[test]
    fn test_identity_rate() {
        let rate = FxRate::identity(Currency::rub());
        let amount = Money::new(dec!(1500), Currency::rub());

        assert_eq!(rate.convert(&amount).unwrap(), amount);
    }

    #[test]
    fn test_currency_codes_are_case_sensitive() {
        assert_ne!(Currency::new("usd"), Currency::usd());
        assert!(Currency::new("  ").is_blank());
        assert!(!Currency::usd().is_blank());
    }

    #[test]
    fn test_conversion_overflow() {
        let rate = FxRate::new(
            CurrencyPair::new(Currency::usd(), Currency::rub()),
            dec!(450),
            "TEST",
        );

        let result = rate.convert(&Money::new(Decimal::MAX, Currency::usd()));
        assert!(matches!(result, Err(ConversionError::Overflow { rate, .. }) if rate == dec!(450)));
    }

    #[test]
    fn test_negative_amount() {
        assert!(Money::new(dec!(-1), Currency::usd()).is_negative());
        assert!(!Money::new(Decimal::ZERO, Currency::usd()).is_negative());
    }
}
