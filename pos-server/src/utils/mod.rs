//! Utility module - shared types and helpers
//!
//! - [`AppError`] / [`ApiResponse`] - application errors and the response envelope
//! - [`MissingFields`] - required-field validation
//! - logging setup

pub mod error;
pub mod logger;
pub mod result;
pub mod validation;

pub use error::{ApiResponse, AppError, ok, ok_message};
pub use result::AppResult;
pub use validation::MissingFields;

use chrono::Utc;

/// Current wall-clock time as Unix milliseconds.
///
/// Repositories and models store timestamps as `i64` millis; conversion
/// from calendar dates happens at the handler layer.
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Unix millis for today's midnight (UTC).
pub fn today_start_millis() -> i64 {
    Utc::now()
        .date_naive()
        .and_hms_opt(0, 0, 0)
        .expect("midnight is always valid")
        .and_utc()
        .timestamp_millis()
}
