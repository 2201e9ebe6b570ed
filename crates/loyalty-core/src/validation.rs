//! # Validation Module
//!
//! Interprets raw text from the page's input boxes.
//!
//! ## Input Handling
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Box               Raw text        Interpretation                       │
//! │  ───               ────────        ──────────────                       │
//! │  Search boxes      "  di "         Too short → clear results           │
//! │                    "dior"          Query("dior") → debounce + search   │
//! │                                                                         │
//! │  Quantity box      "3"             Some(3)                              │
//! │                    "abc", ""       None → change ignored               │
//! │                                                                         │
//! │  Cashback box      "30,5"          30.50                                │
//! │                    "", "abc"       0.00                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::money::Money;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Longest query forwarded to the search endpoints.
pub const MAX_SEARCH_QUERY_LEN: usize = 100;

/// Validates a search box value.
///
/// ## Rules
/// - Surrounding whitespace is ignored
/// - Fewer than `min_len` characters: `TooShort` (the page clears results)
/// - More than 100 characters: `TooLong`
///
/// ## Returns
/// The trimmed query string.
///
/// ## Example
/// ```rust
/// use loyalty_core::validation::validate_search_query;
///
/// assert_eq!(validate_search_query("  dior ", 2).unwrap(), "dior");
/// assert!(validate_search_query(" d ", 2).is_err());
/// ```
pub fn validate_search_query(raw: &str, min_len: usize) -> ValidationResult<String> {
    let query = raw.trim();
    let chars = query.chars().count();

    if chars < min_len {
        return Err(ValidationError::TooShort {
            field: "query".to_string(),
            min: min_len,
        });
    }

    if chars > MAX_SEARCH_QUERY_LEN {
        return Err(ValidationError::TooLong {
            field: "query".to_string(),
            max: MAX_SEARCH_QUERY_LEN,
        });
    }

    Ok(query.to_string())
}

/// Parses the quantity box.
///
/// Returns `None` for text that is not an integer; the caller ignores the
/// edit. Range checking (>= 1) belongs to the cart.
pub fn parse_quantity_input(raw: &str) -> Option<i64> {
    raw.trim().parse::<i64>().ok()
}

/// Parses the cashback box. Empty or unreadable text counts as zero.
pub fn parse_cashback_input(raw: &str) -> Money {
    raw.parse::<Money>().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_query_trims() {
        assert_eq!(validate_search_query("  chanel  ", 2).unwrap(), "chanel");
    }

    #[test]
    fn test_search_query_too_short() {
        assert_eq!(
            validate_search_query(" a ", 2),
            Err(ValidationError::TooShort {
                field: "query".to_string(),
                min: 2
            })
        );
        assert!(validate_search_query("", 2).is_err());
    }

    #[test]
    fn test_search_query_counts_characters_not_bytes() {
        // "ã" is two bytes but one character
        assert!(validate_search_query("ã", 2).is_err());
        assert!(validate_search_query("ão", 2).is_ok());
    }

    #[test]
    fn test_search_query_too_long() {
        let long = "x".repeat(MAX_SEARCH_QUERY_LEN + 1);
        assert!(matches!(
            validate_search_query(&long, 2),
            Err(ValidationError::TooLong { .. })
        ));
    }

    #[test]
    fn test_parse_quantity_input() {
        assert_eq!(parse_quantity_input("3"), Some(3));
        assert_eq!(parse_quantity_input(" 0 "), Some(0));
        assert_eq!(parse_quantity_input("-2"), Some(-2));
        assert_eq!(parse_quantity_input("two"), None);
        assert_eq!(parse_quantity_input(""), None);
    }

    #[test]
    fn test_parse_cashback_input() {
        assert_eq!(parse_cashback_input("30"), Money::from_cents(3000));
        assert_eq!(parse_cashback_input("12,34"), Money::from_cents(1234));
        assert_eq!(parse_cashback_input(""), Money::zero());
        assert_eq!(parse_cashback_input("lots"), Money::zero());
    }
}
