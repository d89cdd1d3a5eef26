//! Formatting helpers for logging large values.

use alloy_primitives::U256;

/// Longest value printed in full.
pub const MAX_DISPLAY_CHARS: usize = 50;
pub const ELLIPSIS: &str = "...";

/// Truncate to `max` characters followed by `...`. Only for display; comparisons always use the
/// full value.
pub fn truncate_for_display(value: &str, max: usize) -> String {
    match value.char_indices().nth(max) {
        None => value.to_string(),
        Some((cut, _)) => format!("{}{ELLIPSIS}", &value[..cut]),
    }
}

pub fn display_value(value: &str) -> String {
    truncate_for_display(value, MAX_DISPLAY_CHARS)
}

/// Parse a decimal string as an unsigned 128-bit value. Negative, non-numeric and values of
/// 2^128 or more yield `None`.
pub fn parse_uint128(value: &str) -> Option<u128> {
    let value = value.trim();
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let wide = U256::from_str_radix(value, 10).ok()?;
    if wide > U256::from(u128::MAX) {
        return None;
    }
    Some(wide.to::<u128>())
}

pub fn is_valid_uint128(value: &str) -> bool {
    parse_uint128(value).is_some()
}
