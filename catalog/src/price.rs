//! Free-text price normalization.

use rust_decimal::Decimal;
use std::str::FromStr;

/// Turn a catalog price text into a number in native currency units.
///
/// Whitespace is removed first, then the first run of ASCII digits is read
/// as an integer: `"1 200 ₸"` gives 1200, `"$45.99"` gives 45, and a range
/// like `"от 500 до 1000"` gives 5001000 because the gap is stripped before
/// scanning. A run whose value overflows `Decimal` counts as unreadable.
/// Free events without a readable number are priced at zero; other
/// unreadable prices yield `None`.
pub fn normalize_price(price: Option<&str>, is_free: bool) -> Option<Decimal> {
    let fallback = if is_free { Some(Decimal::ZERO) } else { None };

    let Some(text) = price.filter(|p| !p.is_empty()) else {
        return fallback;
    };

    let compact: String = text.chars().filter(|c| !c.is_whitespace()).collect();

    first_digit_run(&compact)
        .and_then(|run| Decimal::from_str(run).ok())
        .or(fallback)
}

fn first_digit_run(text: &str) -> Option<&str> {
    let start = text.find(|c: char| c.is_ascii_digit())?;
    let rest = &text[start..];
    let len = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    Some(&rest[..len])
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_missing_price() {
        assert_eq!(normalize_price(None, true), Some(dec!(0)));
        assert_eq!(normalize_price(None, false), None);
        assert_eq!(normalize_price(Some(""), true), Some(dec!(0)));
        assert_eq!(normalize_price(Some(""), false), None);
    }

    #[test]
    fn test_no_digits() {
        assert_eq!(normalize_price(Some("free"), false), None);
        assert_eq!(normalize_price(Some("$"), false), None);
        assert_eq!(normalize_price(Some("бесплатно"), true), Some(dec!(0)));
    }

    #[test]
    fn test_whitespace_is_stripped_before_scanning() {
        assert_eq!(normalize_price(Some("1 200 tenge"), false), Some(dec!(1200)));
        assert_eq!(normalize_price(Some("1\u{a0}200 ₸"), false), Some(dec!(1200)));
        assert_eq!(
            normalize_price(Some("от 500 до 1000 рублей"), false),
            Some(dec!(5001000))
        );
    }

    #[test]
    fn test_first_digit_run_only() {
        assert_eq!(normalize_price(Some("$45.99"), false), Some(dec!(45)));
        assert_eq!(normalize_price(Some("от 300 руб., до 900"), false), Some(dec!(300)));
        assert_eq!(normalize_price(Some("007"), false), Some(dec!(7)));
    }

    #[test]
    fn test_paid_price_on_free_event() {
        assert_eq!(normalize_price(Some("250"), true), Some(dec!(250)));
    }

    #[test]
    fn test_unrepresentable_digit_run() {
        let huge = "9".repeat(40);
        assert_eq!(normalize_price(Some(&huge), false), None);
        assert_eq!(normalize_price(Some(&huge), true), Some(dec!(0)));

        let just_over_max = "79228162514264337593543950336";
        assert_eq!(normalize_price(Some(just_over_max), false), None);
    }

    #[test]
    fn test_long_digit_run_within_range() {
        let twenty_nine = "12345678901234567890123456789";
        assert_eq!(
            normalize_price(Some(twenty_nine), false),
            Some(Decimal::from_str(twenty_nine).unwrap())
        );
        assert_eq!(
            normalize_price(Some("79228162514264337593543950335"), false),
            Some(Decimal::MAX)
        );
    }

    proptest! {
        #[test]
        fn prop_digitless_text_is_unpriced(text in "[^0-9]*", is_free in any::<bool>()) {
            let expected = if is_free { Some(Decimal::ZERO) } else { None };
            prop_assert_eq!(normalize_price(Some(&text), is_free), expected);
        }

        #[test]
        fn prop_bare_number_round_trips(n in any::<u32>(), prefix in "[a-zA-Z$ ]{0,5}") {
            let text = format!("{}{}", prefix, n);
            prop_assert_eq!(normalize_price(Some(&text), false), Some(Decimal::from(n)));
        }
    }
}
