//! # Product Codes
//!
//! New products get the next number after the highest numeric code seen,
//! zero-padded to at least [`CODE_WIDTH`](crate::CODE_WIDTH) digits.
//!
//! ```text
//! existing: "001", "002", "017", "PROMO", " 9x"
//!             1      2     17    ignored   9
//!                                    │
//!                                    ▼
//!                        max = 17 → next = "018"
//! ```
//!
//! Callers pass codes of every product ever created, soft-deleted ones
//! included, so a code is never handed out twice.

use crate::CODE_WIDTH;

/// Reads an optional sign and the leading decimal digits of a trimmed code.
///
/// Returns `None` when no digit follows the sign, or when the number does
/// not fit in an `i64`.
///
/// ```rust
/// use inventics_core::code::parse_code_number;
///
/// assert_eq!(parse_code_number("007"), Some(7));
/// assert_eq!(parse_code_number("12-B"), Some(12));
/// assert_eq!(parse_code_number("+5"), Some(5));
/// assert_eq!(parse_code_number("SKU-3"), None);
/// ```
pub fn parse_code_number(code: &str) -> Option<i64> {
    let trimmed = code.trim();
    let unsigned = trimmed.trim_start_matches(['+', '-']);
    let sign_len = trimmed.len() - unsigned.len();
    if sign_len > 1 {
        return None;
    }

    let digits_end = unsigned
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map(|(idx, _)| idx)
        .unwrap_or(unsigned.len());

    trimmed[..sign_len + digits_end].parse().ok()
}

/// Returns the code for the next product.
///
/// Negative codes never pull the sequence below "001".
///
/// ```rust
/// use inventics_core::code::next_product_code;
///
/// assert_eq!(next_product_code(Vec::<&str>::new()), "001");
/// assert_eq!(next_product_code(["001", "009", "ABC"]), "010");
/// assert_eq!(next_product_code(["999"]), "1000");
/// ```
pub fn next_product_code<'a, I>(codes: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let max = codes
        .into_iter()
        .filter_map(parse_code_number)
        .max()
        .unwrap_or(0)
        .max(0);

    format!("{:0width$}", max.saturating_add(1), width = CODE_WIDTH)
}

// =============================================================================
// Unit Tests
// =============================================================================
