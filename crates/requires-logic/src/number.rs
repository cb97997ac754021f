// crates/requires-logic/src/number.rs
// ============================================================================
// Module: Numeric Values
// Description: Decimal parsing with binary size suffixes.
// Purpose: Give literals and context values one numeric interpretation.
// Dependencies: bigdecimal
// ============================================================================

//! ## Overview
//! Numbers are decimal (`BigDecimal`) so comparisons stay exact. Both literals
//! and property values accept an optional `k`, `m`, `g`, or `t` suffix
//! (powers of 1024), so `os.maxMemory >= 2g` compares bytes with bytes.
//! Text such as `17.0.2` is not numeric and compares as a string.

use std::str::FromStr;

use bigdecimal::BigDecimal;

/// Parses `-?digits(.digits)?[kmgt]?` into a decimal value.
///
/// Returns `None` for anything else, including empty text.
#[must_use]
pub fn parse_number(text: &str) -> Option<BigDecimal> {
    let text = text.trim();
    let (body, multiplier) = match text.as_bytes().last() {
        Some(b'k' | b'K') => (&text[.. text.len() - 1], 1_i64 << 10),
        Some(b'm' | b'M') => (&text[.. text.len() - 1], 1_i64 << 20),
        Some(b'g' | b'G') => (&text[.. text.len() - 1], 1_i64 << 30),
        Some(b't' | b'T') => (&text[.. text.len() - 1], 1_i64 << 40),
        _ => (text, 1),
    };
    if !is_plain_decimal(body) {
        return None;
    }
    let value = BigDecimal::from_str(body).ok()?;
    Some(value * BigDecimal::from(multiplier))
}

/// Returns true for `-?digits(.digits)?`.
fn is_plain_decimal(text: &str) -> bool {
    let unsigned = text.strip_prefix('-').unwrap_or(text);
    let (whole, fraction) = match unsigned.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (unsigned, None),
    };
    let digits = |part: &str| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit());
    digits(whole) && fraction.is_none_or(digits)
}

#[cfg(test)]
mod tests {
    use bigdecimal::BigDecimal;

    use super::parse_number;

    #[test]
    fn suffixes_scale_by_powers_of_1024() {
        assert_eq!(parse_number("2k"), Some(BigDecimal::from(2048)));
        assert_eq!(parse_number("1G"), Some(BigDecimal::from(1_073_741_824_i64)));
    }

    #[test]
    fn version_strings_are_not_numbers() {
        assert_eq!(parse_number("17.0.2"), None);
        assert_eq!(parse_number(""), None);
        assert_eq!(parse_number("-"), None);
        assert_eq!(parse_number("x64"), None);
    }

    #[test]
    fn decimals_and_negatives_parse() {
        assert_eq!(parse_number("-3"), Some(BigDecimal::from(-3)));
        assert!(parse_number("1.5").is_some());
    }
}
