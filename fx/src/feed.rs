//! Daily rate feed document parsing.
//!
//! The feed is an XML document whose root holds repeated `Valute` entries:
//!
//! ```xml
//! <ValCurs Date="17.10.2026" name="Foreign Currency Market">
//!   <Valute ID="R01235">
//!     <NumCode>840</NumCode>
//!     <CharCode>USD</CharCode>
//!     <Nominal>1</Nominal>
//!     <Name>US Dollar</Name>
//!     <Value>81,2345</Value>
//!     <VunitRate>81,2345</VunitRate>
//!   </Valute>
//! </ValCurs>
//! ```
//!
//! Rates use a comma as the decimal separator and are expressed in native
//! currency units per one unit of the listed currency.

use budgetevents_common::Currency;
use rust_decimal::Decimal;
use std::str::FromStr;

use crate::error::{FxError, FxResult};

const ENTRY_TAG: &str = "Valute";
const CODE_TAG: &str = "CharCode";
const UNIT_RATE_TAG: &str = "VunitRate";
const VALUE_TAG: &str = "Value";
const NOMINAL_TAG: &str = "Nominal";
const DATE_ATTR: &str = "Date";

/// One currency entry, with its text kept as published.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateEntry {
    pub code: String,
    pub unit_rate: Option<String>,
    pub value: Option<String>,
    pub nominal: Option<String>,
}

impl RateEntry {
    /// Native units per one unit of this entry's currency.
    ///
    /// Uses `VunitRate` when present, otherwise `Value / Nominal`.
    pub fn rate(&self) -> FxResult<Decimal> {
        if let Some(text) = &self.unit_rate {
            return parse_rate(text).ok_or_else(|| self.invalid(text));
        }

        let value_text = self.value.as_deref().ok_or_else(|| self.invalid(""))?;
        let value = parse_rate(value_text).ok_or_else(|| self.invalid(value_text))?;

        let nominal = match self.nominal.as_deref() {
            Some(text) => parse_rate(text).ok_or_else(|| self.invalid(text))?,
            None => Decimal::ONE,
        };
        value
            .checked_div(nominal)
            .ok_or_else(|| self.invalid(self.nominal.as_deref().unwrap_or_default()))
    }

    fn invalid(&self, value: &str) -> FxError {
        FxError::InvalidRate {
            currency: Currency::new(self.code.clone()),
            value: value.to_string(),
        }
    }
}

/// A parsed rate feed.
#[derive(Debug, Clone, Default)]
pub struct RateTable {
    date: Option<String>,
    entries: Vec<RateEntry>,
}

impl RateTable {
    /// Parse a feed document.
    ///
    /// Fails with [`FxError::MalformedFeed`] when the text is not XML.
    /// Entries without a character code are skipped.
    pub fn parse(xml: &str) -> FxResult<Self> {
        let document =
            roxmltree::Document::parse(xml).map_err(|e| FxError::MalformedFeed(e.to_string()))?;
        let root = document.root_element();

        let entries = root
            .descendants()
            .filter(|node| node.has_tag_name(ENTRY_TAG))
            .filter_map(|node| {
                let code = child_text(node, CODE_TAG)?;
                Some(RateEntry {
                    code,
                    unit_rate: child_text(node, UNIT_RATE_TAG),
                    value: child_text(node, VALUE_TAG),
                    nominal: child_text(node, NOMINAL_TAG),
                })
            })
            .collect();

        Ok(Self {
            date: root.attribute(DATE_ATTR).map(str::to_string),
            entries,
        })
    }

    /// Publication date from the root element, if present.
    pub fn date(&self) -> Option<&str> {
        self.date.as_deref()
    }

    /// All entries in document order.
    pub fn entries(&self) -> &[RateEntry] {
        &self.entries
    }

    /// Find the first entry whose code matches exactly.
    pub fn entry(&self, currency: &Currency) -> Option<&RateEntry> {
        self.entries.iter().find(|e| e.code == currency.code())
    }

    /// Native units per one unit of `currency`.
    pub fn rate_of(&self, currency: &Currency) -> FxResult<Decimal> {
        self.entry(currency)
            .ok_or_else(|| FxError::CurrencyNotFound(currency.clone()))?
            .rate()
    }
}

/// Look up the rate for `currency` in a raw feed document.
///
/// Distinguishes a document that is not XML ([`FxError::MalformedFeed`])
/// from one that lacks the code ([`FxError::CurrencyNotFound`]).
pub fn extract_rate(xml: &str, currency: &Currency) -> FxResult<Decimal> {
    RateTable::parse(xml)?.rate_of(currency)
}

/// Parse rate text in either `.` or `,` decimal notation.
///
/// Whitespace (including non-breaking spaces used as group separators) is
/// ignored.
pub fn parse_rate(text: &str) -> Option<Decimal> {
    let compact: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    if compact.is_empty() || compact.matches(',').count() > 1 {
        return None;
    }
    if compact.contains(',') && compact.contains('.') {
        return None;
    }

    Decimal::from_str(&compact.replace(',', ".")).ok()
}

fn child_text(node: roxmltree::Node<'_, '_>, tag: &str) -> Option<String> {
    node.children()
        .find(|child| child.has_tag_name(tag))
        .map(|child| {
            child
                .descendants()
                .filter(|n| n.is_text())
                .filter_map(|n| n.text())
                .collect::<String>()
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    const FEED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<ValCurs Date="17.10.2026" name="Foreign Currency Market">
    <Valute ID="R01235">
        <NumCode>840</NumCode>
        <CharCode>USD</CharCode>
        <Nominal>1</Nominal>
        <Name>US Dollar</Name>
        <Value>450,0000</Value>
        <VunitRate>450</VunitRate>
    </Valute>
    <Valute ID="R01239">
        <NumCode>978</NumCode>
        <CharCode>EUR</CharCode>
        <Nominal>1</Nominal>
        <Name>Euro</Name>
        <Value>490,0000</Value>
        <VunitRate>490</VunitRate>
    </Valute>
</ValCurs>"#;

    #[test]
    fn test_extract_known_codes() {
        assert_eq!(extract_rate(FEED, &Currency::usd()).unwrap(), dec!(450));
        assert_eq!(extract_rate(FEED, &Currency::eur()).unwrap(), dec!(490));
    }

    #[test]
    fn test_extract_missing_code() {
        let result = extract_rate(FEED, &Currency::gbp());
        assert!(matches!(result, Err(FxError::CurrencyNotFound(c)) if c == Currency::gbp()));
    }

    #[test]
    fn test_extract_from_non_xml() {
        let result = extract_rate("<not-xml>", &Currency::usd());

        let err = result.unwrap_err();
        assert!(err.is_malformed_feed());
        assert!(matches!(err, FxError::MalformedFeed(_)));
    }

    #[test]
    fn test_code_match_is_case_sensitive() {
        let result = extract_rate(FEED, &Currency::new("usd"));
        assert!(matches!(result, Err(FxError::CurrencyNotFound(_))));
    }

    #[test]
    fn test_comma_decimal_separator() {
        let xml = r#"<ValCurs>
            <Valute><CharCode>CNY</CharCode><VunitRate>11,3482</VunitRate></Valute>
        </ValCurs>"#;
        assert_eq!(extract_rate(xml, &Currency::new("CNY")).unwrap(), dec!(11.3482));
    }

    #[test]
    fn test_value_over_nominal_fallback() {
        let xml = r#"<ValCurs>
            <Valute><CharCode>JPY</CharCode><Nominal>100</Nominal><Value>54,1200</Value></Valute>
        </ValCurs>"#;
        assert_eq!(extract_rate(xml, &Currency::new("JPY")).unwrap(), dec!(0.5412));
    }

    #[test]
    fn test_unusable_nominal() {
        let zero = r#"<ValCurs>
            <Valute><CharCode>JPY</CharCode><Nominal>0</Nominal><Value>54,12</Value></Valute>
        </ValCurs>"#;
        let tiny = r#"<ValCurs>
            <Valute>
                <CharCode>XAU</CharCode>
                <Nominal>0,0000000000000000000000001</Nominal>
                <Value>79228162514264337593543950335</Value>
            </Valute>
        </ValCurs>"#;

        let result = extract_rate(zero, &Currency::new("JPY"));
        assert!(matches!(result, Err(FxError::InvalidRate { value, .. }) if value == "0"));

        let result = extract_rate(tiny, &Currency::new("XAU"));
        assert!(matches!(result, Err(FxError::InvalidRate { .. })));
    }

    #[test]
    fn test_unusable_rate_text() {
        let xml = r#"<ValCurs>
            <Valute><CharCode>USD</CharCode><VunitRate>n/a</VunitRate></Valute>
        </ValCurs>"#;
        let result = extract_rate(xml, &Currency::usd());
        assert!(matches!(result, Err(FxError::InvalidRate { value, .. }) if value == "n/a"));
    }

    #[test]
    fn test_entries_without_code_are_skipped() {
        let xml = r#"<ValCurs>
            <Valute><VunitRate>1</VunitRate></Valute>
            <Valute><CharCode>USD</CharCode><VunitRate>450</VunitRate></Valute>
        </ValCurs>"#;
        let table = RateTable::parse(xml).unwrap();

        assert_eq!(table.entries().len(), 1);
        assert_eq!(table.rate_of(&Currency::usd()).unwrap(), dec!(450));
    }

    #[test]
    fn test_feed_date() {
        let table = RateTable::parse(FEED).unwrap();
        assert_eq!(table.date(), Some("17.10.2026"));
        assert_eq!(RateTable::parse("<ValCurs/>").unwrap().date(), None);
    }

    #[test]
    fn test_parse_rate_formats() {
        assert_eq!(parse_rate("92,5083"), Some(dec!(92.5083)));
        assert_eq!(parse_rate(" 92.5083 "), Some(dec!(92.5083)));
        assert_eq!(parse_rate("1\u{a0}234,5"), Some(dec!(1234.5)));
        assert_eq!(parse_rate(""), None);
        assert_eq!(parse_rate("1,2,3"), None);
        assert_eq!(parse_rate("1.234,5"), None);
    }
}
