//! Decimal codec: integer minor units <-> human decimal strings.
//!
//! Formatting splits the base-10 digit string instead of dividing by
//! `10^decimals`, so any decimal count works without overflow.

use alloy::primitives::{I256, U256};

/// Parses a base-10 or `0x`-prefixed base-16 literal.
///
/// Returns `None` for empty, signed, fractional or otherwise non-numeric
/// text, and for values that do not fit in 256 bits. A bare `0x` is zero.
pub fn try_parse_integer(text: &str) -> Option<U256> {
    let trimmed = text.trim();
    let (digits, radix) = match trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
    {
        Some("") => return Some(U256::ZERO),
        Some(hex) => (hex, 16),
        None => (trimmed, 10),
    };
    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return None;
    }
    U256::from_str_radix(digits, radix as u64).ok()
}

/// Parses an integer literal, clamping malformed or missing input to zero.
pub fn parse_integer_or_zero(text: &str) -> U256 {
    try_parse_integer(text).unwrap_or(U256::ZERO)
}

/// Like [`parse_integer_or_zero`] over an optional field; `None` when the
/// field is absent or blank so callers can fall back by presence.
pub fn parse_present(text: Option<&str>) -> Option<U256> {
    text.filter(|t| !t.trim().is_empty())
        .map(parse_integer_or_zero)
}

/// Formats `raw` minor units with `decimals` places.
///
/// Trailing fractional zeros are stripped, the fraction is omitted when zero,
/// and the whole part gets thousands separators:
/// - `format_units(1_500_000, 6)` -> `"1.5"`
/// - `format_units(1_234_567 * 10^18, 18)` -> `"1,234,567"`
pub fn format_units(raw: U256, decimals: u8) -> String {
    split_digits(&raw.to_string(), decimals as usize)
}

/// Formats textual minor units; malformed text is returned unmodified.
pub fn format_units_str(text: &str, decimals: u8) -> String {
    match try_parse_integer(text) {
        Some(raw) => format_units(raw, decimals),
        None => text.to_string(),
    }
}

/// Formats a signed amount, prefixing negatives with `-`.
pub fn format_signed_units(raw: I256, decimals: u8) -> String {
    let magnitude = format_units(raw.unsigned_abs(), decimals);
    if raw.is_negative() {
        format!("-{magnitude}")
    } else {
        magnitude
    }
}

/// Inserts `,` every three digits from the right.
pub fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

fn split_digits(digits: &str, decimals: usize) -> String {
    let padded = if digits.len() <= decimals {
        format!("{digits:0>width$}", width = decimals + 1)
    } else {
        digits.to_string()
    };
    let (whole, fraction) = padded.split_at(padded.len() - decimals);
    let fraction = fraction.trim_end_matches('0');
    let whole = group_thousands(whole);

    if fraction.is_empty() {
        whole
    } else {
        format!("{whole}.{fraction}")
    }
}
