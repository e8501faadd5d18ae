// ============================================================================
// LUMEN-BRIDGE - Amount Helpers
// ============================================================================
// Pure formatting and unit-conversion helpers. No I/O.
// 1 XLM = 10,000,000 stroops; amounts display with 7 decimal places.

use crate::error::PaymentError;
use crate::Result;

/// Stroops per XLM
pub const STROOPS_PER_XLM: i64 = 10_000_000;

/// Smallest representable payment (one stroop)
pub const MIN_AMOUNT: f64 = 0.000_000_1;

/// Format an amount with exactly 7 digits after the decimal point
pub fn format_amount(amount: f64) -> String {
    format!("{:.7}", amount)
}

/// Convert stroops to XLM
pub fn stroops_to_xlm(stroops: i64) -> f64 {
    stroops as f64 / STROOPS_PER_XLM as f64
}

/// Convert XLM to stroops, rounding to the nearest stroop
pub fn xlm_to_stroops(xlm: f64) -> i64 {
    (xlm * STROOPS_PER_XLM as f64).round() as i64
}

/// Parse and validate a user-entered amount string.
///
/// Rejects non-numeric input, non-positive values, and values below one
/// stroop. Returns the canonical 7-decimal representation.
pub fn validate_amount(amount: &str) -> Result<String> {
    let value: f64 = amount
        .trim()
        .parse()
        .map_err(|_| PaymentError::InvalidAmount(amount.to_string()))?;

    if !value.is_finite() || value <= 0.0 {
        return Err(PaymentError::InvalidAmount(
            "Amount must be greater than 0".to_string(),
        ));
    }

    if value < MIN_AMOUNT {
        return Err(PaymentError::InvalidAmount(format!(
            "Amount too small (minimum {} XLM)",
            MIN_AMOUNT
        )));
    }

    Ok(format_amount(value))
}

/// Shorten an address for display: first 8 and last 8 characters.
///
/// Counts characters, not bytes, so arbitrary display strings are safe.
pub fn format_address(address: &str) -> String {
    const START_CHARS: usize = 8;
    const END_CHARS: usize = 8;

    let char_count = address.chars().count();
    if char_count <= START_CHARS + END_CHARS {
        return address.to_string();
    }

    let start: String = address.chars().take(START_CHARS).collect();
    let end: String = address.chars().skip(char_count - END_CHARS).collect();
    format!("{}...{}", start, end)
}
