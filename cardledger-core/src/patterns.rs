//! Text patterns shared by every statement layout.

use std::sync::LazyLock;

use regex::Regex;

/// Decimal number with optional digit-group separators (western or lakh
/// grouping) and fraction.
pub const AMOUNT_PATTERN: &str = r"\d+(?:,\d+)*(?:\.\d+)?";

/// Card number, possibly masked (`X`, `*`) or grouped with spaces/dashes.
pub const CARD_NUMBER_PATTERN: &str = r"\d{4}[\dXx* -]{4,12}\d{4}\b";

static AMOUNT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(AMOUNT_PATTERN).expect("amount pattern compiles"));

static CARD_NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(CARD_NUMBER_PATTERN).expect("card number pattern compiles"));

/// First decimal number in `cell`, separators stripped. Digit runs too long
/// for an `f64` count as no amount.
pub fn find_amount(cell: &str) -> Option<f64> {
    let m = AMOUNT_RE.find(cell)?;
    let value: f64 = m.as_str().replace(',', "").parse().ok()?;
    value.is_finite().then_some(value)
}

/// First card-number-like run in `text`.
pub fn find_card_number(text: &str) -> Option<&str> {
    CARD_NUMBER_RE.find(text).map(|m| m.as_str())
}

/// Last four characters of `s` (fewer if `s` is shorter).
pub fn last_four(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    let start = chars.len().saturating_sub(4);
    chars[start..].iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_amount_with_marker() {
        assert_eq!(find_amount("450.00 Dr"), Some(450.0));
        assert_eq!(find_amount("1,23,456.78 Cr"), Some(123456.78));
        assert_eq!(find_amount("12,345.60 Dr"), Some(12345.6));
        assert_eq!(find_amount("7 Cr"), Some(7.0));
        assert_eq!(find_amount("Cr"), None);
        assert_eq!(find_amount(""), None);
        assert_eq!(find_amount(&format!("{} Dr", "9".repeat(400))), None);
    }

    #[test]
    fn test_card_number_variants() {
        assert_eq!(find_card_number("Card No 5123 45XX XXXX 1234 Name"), Some("5123 45XX XXXX 1234"));
        assert_eq!(find_card_number("512345******9876"), Some("512345******9876"));
        assert_eq!(find_card_number("4111 2222 3333 4444"), Some("4111 2222 3333 4444"));
        assert_eq!(find_card_number("Date 05/04/2024"), None);
    }

    #[test]
    fn test_last_four() {
        assert_eq!(last_four("5123 45XX XXXX 1234"), "1234");
        assert_eq!(last_four("12"), "12");
    }
}
