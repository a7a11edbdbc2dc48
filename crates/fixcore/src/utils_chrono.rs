//! Convenience conversion from [`chrono`] wall-clock types to the scalar
//! seconds-since-epoch timestamp the [`crate::time`] formatter accepts.
//!
//! Time-of-day acquisition is out of scope for this crate; this module
//! only bridges a caller who already has a [`chrono::DateTime`]
//! (from their own clock or transport layer) into the formatter's contract.

use chrono::{DateTime, TimeZone, Utc};

/// Converts a UTC [`DateTime`] into the seconds-since-epoch `f64` accepted
/// by every function in [`crate::time`].
pub fn timestamp_from_datetime(dt: DateTime<Utc>) -> f64 {
    dt.timestamp() as f64 + dt.timestamp_subsec_nanos() as f64 / 1_000_000_000.0
}

/// Converts a seconds-since-epoch `f64` back into a UTC [`DateTime`], mostly
/// useful for round-tripping in tests.
pub fn datetime_from_timestamp(timestamp: f64) -> Option<DateTime<Utc>> {
    let secs = timestamp.floor() as i64;
    let nanos = ((timestamp - timestamp.floor()) * 1_000_000_000.0).round() as u32;
    Utc.timestamp_opt(secs, nanos).single()
}
