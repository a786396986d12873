//! Shift & work-time engine.
//!
//! Everything under this module is synchronous and free of I/O except
//! [`session`], which drives the validators around a [`crate::store::ScheduleStore`].

pub mod calendar;
pub mod grid;
pub mod monthly_hours;
pub mod reconcile;
pub mod rest;
pub mod session;
pub mod shift_code;
pub mod work_card;

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Formats hours for display: two decimals at most, comma separator,
/// trailing zeros dropped (`8`, `1,5`, `7,25`).
pub fn fmt_hours(value: f64) -> String {
    let fixed = format!("{:.2}", round2(value));
    let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');
    trimmed.replace('.', ",")
}

/// Two-decimal display used in advisory messages (`7,00`).
pub fn fmt_hours_fixed(value: f64) -> String {
    format!("{:.2}", round2(value)).replace('.', ",")
}
