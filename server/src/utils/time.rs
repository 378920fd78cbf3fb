//! Time helpers
//!
//! All persisted timestamps are `i64` Unix millis; conversions happen here
//! so repositories and transaction scripts only ever see `i64`.

/// Current time as Unix millis
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Two days, in millis — the cart retention window
pub const CART_TTL_MILLIS: i64 = 2 * 24 * 60 * 60 * 1000;
