//! Formats a scalar timestamp into the six FIX temporal field shapes.
//!
//! Deliberately avoids a general-purpose date/time library in the hot
//! path — callers acquire wall-clock time out of band and pass in
//! seconds-since-epoch as a plain `f64`. The algorithm below (day-count
//! division, iterative Gregorian year/month resolution, modular intraday
//! arithmetic) never allocates beyond the returned `String`.
//!
//! Out-of-range inputs (outside `[1970-01-01, 2100-01-01)`) are a
//! non-contract: callers must not pass them, and this module makes no
//! attempt to detect or reject them.

use std::fmt::Write as _;

const SECONDS_PER_DAY: i64 = 86_400;
const SECONDS_PER_HOUR: i64 = 3_600;

/// Sub-second precision for a formatted temporal field.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum Precision {
    /// No fractional seconds.
    #[default]
    Seconds,
    /// Three fractional digits (milliseconds).
    Millis,
    /// Six fractional digits (microseconds).
    Micros,
}

impl Precision {
    fn digits(self) -> u8 {
        match self {
            Precision::Seconds => 0,
            Precision::Millis => 3,
            Precision::Micros => 6,
        }
    }
}

fn is_leap_year(year: i64) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

fn month_lengths(year: i64) -> [i64; 12] {
    let feb = if is_leap_year(year) { 29 } else { 28 };
    [31, feb, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31]
}

/// Resolves a day count since 1970-01-01 into a (year, month, day) triple.
///
/// Walks forward one year (and then one month) at a time rather than using a
/// closed-form civil-calendar algorithm, matching the source's subtract-as-
/// you-go approach; correct for the documented `[1970, 2100)` range.
fn civil_from_days(mut days: i64) -> (i64, u32, u32) {
    let mut year = 1970i64;
    loop {
        let year_len = if is_leap_year(year) { 366 } else { 365 };
        if days < year_len {
            break;
        }
        days -= year_len;
        year += 1;
    }
    let mut month = 1u32;
    for &len in month_lengths(year).iter() {
        if days < len {
            break;
        }
        days -= len;
        month += 1;
    }
    (year, month, (days + 1) as u32)
}

/// Splits a timestamp into whole seconds since the epoch and a microsecond
/// remainder in `[0, 999_999]`.
fn split_seconds_micros(timestamp: f64) -> (i64, u32) {
    let seconds = timestamp.floor();
    let micros = ((timestamp - seconds) * 1_000_000.0).round() as i64;
    let (seconds, micros) = if micros >= 1_000_000 {
        (seconds as i64 + 1, 0)
    } else {
        (seconds as i64, micros)
    };
    (seconds, micros as u32)
}

struct Civil {
    year: i64,
    month: u32,
    day: u32,
    hour: i64,
    minute: i64,
    second: i64,
    micros: u32,
}

fn resolve(timestamp: f64) -> Civil {
    let (seconds, micros) = split_seconds_micros(timestamp);
    let days = seconds.div_euclid(SECONDS_PER_DAY);
    let secs_in_day = seconds.rem_euclid(SECONDS_PER_DAY);
    let (year, month, day) = civil_from_days(days);
    let hour = secs_in_day / SECONDS_PER_HOUR;
    let minute = (secs_in_day % SECONDS_PER_HOUR) / 60;
    let second = secs_in_day % 60;
    Civil {
        year,
        month,
        day,
        hour,
        minute,
        second,
        micros,
    }
}

fn push_fraction(out: &mut String, micros: u32, precision: Precision) {
    match precision.digits() {
        0 => {}
        3 => {
            let _ = write!(out, ".{:03}", micros / 1_000);
        }
        6 => {
            let _ = write!(out, ".{micros:06}");
        }
        _ => unreachable!("Precision only ever yields 0, 3 or 6"),
    }
}

/// Formats `YYYYMMDD-HH:MM:SS[.fff[fff]]` (`UTCTimestamp`).
pub fn format_utc_timestamp(timestamp: f64, precision: Precision) -> String {
    let c = resolve(timestamp);
    let mut out = String::with_capacity(24);
    let _ = write!(
        out,
        "{:04}{:02}{:02}-{:02}:{:02}:{:02}",
        c.year, c.month, c.day, c.hour, c.minute, c.second
    );
    push_fraction(&mut out, c.micros, precision);
    out
}

/// Formats `HH:MM:SS[.fff[fff]]` (`UTCTimeOnly`).
pub fn format_utc_time_only(timestamp: f64, precision: Precision) -> String {
    let c = resolve(timestamp);
    let mut out = String::with_capacity(15);
    let _ = write!(out, "{:02}:{:02}:{:02}", c.hour, c.minute, c.second);
    push_fraction(&mut out, c.micros, precision);
    out
}

/// Formats `YYYYMMDD` (`UTCDateOnly`, and equivalently `LocalMktDate`).
pub fn format_date_only(timestamp: f64) -> String {
    let c = resolve(timestamp);
    format!("{:04}{:02}{:02}", c.year, c.month, c.day)
}

/// Formats `YYYYMM` (`MonthYear`).
pub fn format_month_year(timestamp: f64) -> String {
    let c = resolve(timestamp);
    format!("{:04}{:02}", c.year, c.month)
}

/// Formats `YYYYMMDD-HH:MM:SS[.fff[fff]]{Z|±HH:MM}` (`TZTimestamp`).
///
/// `offset_minutes` is the timezone offset from UTC in minutes; the
/// timestamp is shifted by that offset *before* the wall-clock portion is
/// formatted, and the offset itself is rendered as `Z` when zero or
/// `±HH:MM` otherwise.
pub fn format_tz_timestamp(timestamp: f64, precision: Precision, offset_minutes: i32) -> String {
    let shifted = timestamp + (offset_minutes as f64) * 60.0;
    let mut out = format_utc_timestamp(shifted, precision);
    if offset_minutes == 0 {
        out.push('Z');
    } else {
        let sign = if offset_minutes < 0 { '-' } else { '+' };
        let abs = offset_minutes.unsigned_abs();
        let _ = write!(out, "{sign}{:02}:{:02}", abs / 60, abs % 60);
    }
    out
}

#[cfg(test)]
mod test {
    use super::*;

    const EPOCH: f64 = 0.0;
    // 2010-03-04 07:59:30 UTC
    const SAMPLE: f64 = 1_267_689_570.0;

    #[test]
    fn epoch_date_only() {
        assert_eq!(format_date_only(EPOCH), "19700101");
    }

    #[test]
    fn sample_utc_timestamp_no_fraction() {
        assert_eq!(
            format_utc_timestamp(SAMPLE, Precision::Seconds),
            "20100304-07:59:30"
        );
    }

    #[test]
    fn sample_utc_timestamp_millis() {
        let ts = SAMPLE + 0.258;
        assert_eq!(
            format_utc_timestamp(ts, Precision::Millis),
            "20100304-07:59:30.258"
        );
    }

    #[test]
    fn sample_utc_timestamp_micros() {
        let ts = SAMPLE + 0.258_123;
        assert_eq!(
            format_utc_timestamp(ts, Precision::Micros),
            "20100304-07:59:30.258123"
        );
    }

    #[test]
    fn sample_time_only() {
        assert_eq!(format_utc_time_only(SAMPLE, Precision::Seconds), "07:59:30");
    }

    #[test]
    fn sample_month_year() {
        assert_eq!(format_month_year(SAMPLE), "201003");
    }

    #[test]
    fn leap_year_day_count() {
        // 2000-02-29 is a leap day (divisible by 400).
        // Day count from epoch to 2000-02-29: 30 years + 7 leap days (1972..1996) + 31 (Jan) + 28 (Feb 1..28)
        let days_to_2000_02_29 = {
            let mut days = 0i64;
            for year in 1970..2000 {
                days += if is_leap_year(year) { 366 } else { 365 };
            }
            days += 31 + 28; // Jan + Feb 1..28, landing on the 29th
            days
        };
        let ts = (days_to_2000_02_29 * SECONDS_PER_DAY) as f64;
        assert_eq!(format_date_only(ts), "20000229");
    }

    #[test]
    fn tz_timestamp_zulu() {
        let out = format_tz_timestamp(SAMPLE, Precision::Seconds, 0);
        assert_eq!(out, "20100304-07:59:30Z");
    }

    #[test]
    fn tz_timestamp_positive_offset() {
        let out = format_tz_timestamp(SAMPLE, Precision::Seconds, 330); // +05:30
        assert_eq!(out, "20100304-13:29:30+05:30");
    }

    #[test]
    fn tz_timestamp_negative_offset() {
        let out = format_tz_timestamp(SAMPLE, Precision::Seconds, -300); // -05:00
        assert_eq!(out, "20100304-02:59:30-05:00");
    }
}
