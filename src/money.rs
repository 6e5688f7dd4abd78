//! Rounding helpers for dollar amounts
//!
//! Statutory benefit amounts are truncated, never rounded up. Products like
//! `0.9 * 1174.0` land a hair below the exact cent in binary floating point,
//! so truncation nudges by a tolerance far below one cent first.

const CENT_TOLERANCE: f64 = 1e-6;

/// Truncate to the cent
pub fn floor_cent(amount: f64) -> f64 {
    ((amount * 100.0) + CENT_TOLERANCE).floor() / 100.0
}

/// Truncate to the whole dollar
pub fn floor_dollar(amount: f64) -> f64 {
    (amount + CENT_TOLERANCE).floor()
}

/// Round half-up to the cent (used for present values, which are not statutory)
pub fn round_cent(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}
