//! Price formatting and parsing using decimal arithmetic.
//!
//! The backend stores prices as plain numbers in a single currency, so prices
//! travel as `Option<Decimal>` rather than a currency-tagged type.

use rust_decimal::Decimal;

/// Text shown in place of a missing price.
pub const PRICE_NOT_SET: &str = "price not set";

/// Format a price for display (e.g., `$19.99`).
#[must_use]
pub fn format_price(price: Option<Decimal>) -> String {
    price.map_or_else(
        || PRICE_NOT_SET.to_string(),
        |amount| format!("${:.2}", amount.round_dp(2)),
    )
}

/// Parse a user-entered price such as `"799.90"` or `"$799.90"`.
///
/// Returns `None` for blank or unparseable input.
#[must_use]
pub fn parse_price(input: &str) -> Option<Decimal> {
    let trimmed = input.trim().trim_start_matches('$');
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<Decimal>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_price() {
        assert_eq!(format_price(Some(Decimal::new(79_999, 2))), "$799.99");
        assert_eq!(format_price(Some(Decimal::new(500, 0))), "$500.00");
        assert_eq!(format_price(None), PRICE_NOT_SET);
    }

    #[test]
    fn test_parse_price() {
        assert_eq!(parse_price("799.90"), Some(Decimal::new(79_990, 2)));
        assert_eq!(parse_price(" $12 "), Some(Decimal::new(12, 0)));
        assert_eq!(parse_price(""), None);
        assert_eq!(parse_price("cheap"), None);
    }
}
