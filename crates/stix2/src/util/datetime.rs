//! RFC 3339 timestamp parsing and formatting for STIX timestamps.
//!
//! STIX timestamps are always serialized in UTC with a trailing `Z`.
//! Internally a timestamp is microseconds since the Unix epoch.

use std::time::{SystemTime, UNIX_EPOCH};

const MICROSECONDS_PER_SECOND: i64 = 1_000_000;
const MICROSECONDS_PER_MINUTE: i64 = 60 * MICROSECONDS_PER_SECOND;
const MICROSECONDS_PER_HOUR: i64 = 60 * MICROSECONDS_PER_MINUTE;
const MICROSECONDS_PER_DAY: i64 = 24 * MICROSECONDS_PER_HOUR;
const MICROSECONDS_PER_MILLISECOND: i64 = 1_000;

/// Earliest representable timestamp, `0000-01-01T00:00:00Z`.
pub const MIN_TIMESTAMP_MICROS: i64 = -62_167_219_200 * MICROSECONDS_PER_SECOND;

/// Latest representable timestamp, `9999-12-31T23:59:59.999999Z`.
pub const MAX_TIMESTAMP_MICROS: i64 = 253_402_300_800 * MICROSECONDS_PER_SECOND - 1;

/// Returns true if `epoch_micros` falls within a four-digit year.
pub fn timestamp_in_range(epoch_micros: i64) -> bool {
    (MIN_TIMESTAMP_MICROS..=MAX_TIMESTAMP_MICROS).contains(&epoch_micros)
}

/// Fractional-second precision a timestamp is kept at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Precision {
    /// Keep whatever precision was supplied (up to microseconds).
    #[default]
    Any,
    /// Whole seconds.
    Second,
    /// Exactly three fractional digits.
    Millisecond,
}

impl Precision {
    /// Truncates `epoch_micros` to this precision.
    ///
    /// Returns `None` if the truncated value does not fit in an `i64`.
    pub fn truncate(self, epoch_micros: i64) -> Option<i64> {
        let unit = match self {
            Precision::Any => return Some(epoch_micros),
            Precision::Second => MICROSECONDS_PER_SECOND,
            Precision::Millisecond => MICROSECONDS_PER_MILLISECOND,
        };
        epoch_micros.checked_sub(epoch_micros.rem_euclid(unit))
    }
}

/// Error type for RFC 3339 parsing failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateTimeParseError {
    pub message: String,
}

impl DateTimeParseError {
    fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

impl std::fmt::Display for DateTimeParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for DateTimeParseError {}

/// Returns the current time as microseconds since the Unix epoch.
pub fn now_micros() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_micros() as i64)
        .unwrap_or(0)
}

/// Parses a timezone offset string (Z, +HH:MM, -HH:MM) and returns offset in minutes.
fn parse_timezone_offset(offset: &str) -> Result<i64, DateTimeParseError> {
    if offset == "Z" || offset == "z" {
        return Ok(0);
    }

    let invalid = || DateTimeParseError::new(format!("Invalid timezone offset: {}", offset));

    if offset.len() != 6 || !offset.is_ascii() || offset.as_bytes()[3] != b':' {
        return Err(invalid());
    }

    let sign = match offset.as_bytes()[0] {
        b'+' => 1,
        b'-' => -1,
        _ => return Err(invalid()),
    };

    let hours: i64 = offset[1..3].parse().map_err(|_| invalid())?;
    let minutes: i64 = offset[4..6].parse().map_err(|_| invalid())?;

    if hours > 23 || minutes > 59 {
        return Err(invalid());
    }

    Ok(sign * (hours * 60 + minutes))
}

/// Parses fractional seconds digits and returns microseconds.
///
/// Digits beyond microsecond resolution are dropped.
fn parse_fractional_seconds(frac: &str) -> i64 {
    let mut micros = 0i64;
    let mut digits = 0;
    for b in frac.bytes().take(6) {
        micros = micros * 10 + i64::from(b - b'0');
        digits += 1;
    }
    while digits < 6 {
        micros *= 10;
        digits += 1;
    }
    micros
}

fn is_leap_year(year: i64) -> bool {
    (year % 4 == 0 && year % 100 != 0) || (year % 400 == 0)
}

fn days_in_month(year: i64, month: i64) -> i64 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        2 => 28,
        _ => 0,
    }
}

/// Days since Unix epoch for a civil date (Howard Hinnant's algorithm).
fn date_to_days(year: i64, month: i64, day: i64) -> i64 {
    let y = if month <= 2 { year - 1 } else { year };
    let m = if month <= 2 { month + 9 } else { month - 3 };
    let era = if y >= 0 { y } else { y - 399 } / 400;
    let yoe = y - era * 400;
    let doy = (153 * m + 2) / 5 + day - 1;
    let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy;
    era * 146097 + doe - 719468
}

/// Civil date for a count of days since Unix epoch.
fn days_to_date(days: i64) -> (i64, i64, i64) {
    let z = days + 719468;
    let era = if z >= 0 { z } else { z - 146096 } / 146097;
    let doe = z - era * 146097;
    let yoe = (doe - doe / 1460 + doe / 36524 - doe / 146096) / 365;
    let y = yoe + era * 400;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let d = doy - (153 * mp + 2) / 5 + 1;
    let m = if mp < 10 { mp + 3 } else { mp - 9 };
    (if m <= 2 { y + 1 } else { y }, m, d)
}

fn parse_component(s: &str, what: &str, input: &str) -> Result<i64, DateTimeParseError> {
    if !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(DateTimeParseError::new(format!("Invalid {} in timestamp: {}", what, input)));
    }
    s.parse()
        .map_err(|_| DateTimeParseError::new(format!("Invalid {} in timestamp: {}", what, input)))
}

/// Parses an RFC 3339 timestamp and returns microseconds since the Unix epoch (UTC).
///
/// Accepts `YYYY-MM-DDTHH:MM:SS[.fraction](Z|+HH:MM|-HH:MM)`. The timezone is
/// mandatory; offsets are normalized to UTC.
pub fn parse_timestamp(input: &str) -> Result<i64, DateTimeParseError> {
    let bytes = input.as_bytes();
    if bytes.len() < 20
        || !input.is_ascii()
        || bytes[4] != b'-'
        || bytes[7] != b'-'
        || !matches!(bytes[10], b'T' | b't')
        || bytes[13] != b':'
        || bytes[16] != b':'
    {
        return Err(DateTimeParseError::new(format!("Invalid RFC 3339 timestamp: {}", input)));
    }

    let year = parse_component(&input[..4], "year", input)?;
    let month = parse_component(&input[5..7], "month", input)?;
    let day = parse_component(&input[8..10], "day", input)?;
    let hours = parse_component(&input[11..13], "hours", input)?;
    let minutes = parse_component(&input[14..16], "minutes", input)?;
    let seconds = parse_component(&input[17..19], "seconds", input)?;

    if !(1..=12).contains(&month) {
        return Err(DateTimeParseError::new(format!("Invalid month in timestamp: {}", input)));
    }
    if day < 1 || day > days_in_month(year, month) {
        return Err(DateTimeParseError::new(format!("Invalid day in timestamp: {}", input)));
    }
    if hours > 23 || minutes > 59 || seconds > 60 {
        return Err(DateTimeParseError::new(format!("Invalid time in timestamp: {}", input)));
    }

    let rest = &input[19..];
    let (micros, offset) = match rest.strip_prefix('.') {
        Some(frac_and_tz) => {
            let frac_end = frac_and_tz
                .find(|c: char| !c.is_ascii_digit())
                .unwrap_or(frac_and_tz.len());
            if frac_end == 0 {
                return Err(DateTimeParseError::new(format!(
                    "Empty fractional seconds in timestamp: {}",
                    input
                )));
            }
            (
                parse_fractional_seconds(&frac_and_tz[..frac_end]),
                &frac_and_tz[frac_end..],
            )
        }
        None => (0, rest),
    };

    if offset.is_empty() {
        return Err(DateTimeParseError::new(format!("Missing timezone in timestamp: {}", input)));
    }
    let offset_min = parse_timezone_offset(offset)?;

    // A leap second is folded into the following second.
    let local = date_to_days(year, month, day) * MICROSECONDS_PER_DAY
        + hours * MICROSECONDS_PER_HOUR
        + minutes * MICROSECONDS_PER_MINUTE
        + seconds * MICROSECONDS_PER_SECOND
        + micros;

    Ok(local - offset_min * MICROSECONDS_PER_MINUTE)
}

/// Formats microseconds since the Unix epoch as an RFC 3339 UTC timestamp.
///
/// `Precision::Any` omits a zero fraction and trims trailing zeros;
/// `Precision::Millisecond` always prints three digits.
pub fn format_timestamp(epoch_micros: i64, precision: Precision) -> String {
    let days = epoch_micros.div_euclid(MICROSECONDS_PER_DAY);
    let time_micros = epoch_micros.rem_euclid(MICROSECONDS_PER_DAY);

    let (year, month, day) = days_to_date(days);

    let hours = time_micros / MICROSECONDS_PER_HOUR;
    let minutes = (time_micros % MICROSECONDS_PER_HOUR) / MICROSECONDS_PER_MINUTE;
    let seconds = (time_micros % MICROSECONDS_PER_MINUTE) / MICROSECONDS_PER_SECOND;
    let micros = time_micros % MICROSECONDS_PER_SECOND;

    let frac = match precision {
        Precision::Second => String::new(),
        Precision::Millisecond => format!(".{:03}", micros / MICROSECONDS_PER_MILLISECOND),
        Precision::Any if micros == 0 => String::new(),
        Precision::Any => format!(".{}", format!("{:06}", micros).trim_end_matches('0')),
    };

    format!(
        "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}{}Z",
        year, month, day, hours, minutes, seconds, frac
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_epoch() {
        assert_eq!(parse_timestamp("1970-01-01T00:00:00Z").unwrap(), 0);
        assert_eq!(
            parse_timestamp("1970-01-01T00:00:01.5Z").unwrap(),
            1_500_000
        );
    }

    #[test]
    fn test_parse_offset_normalized_to_utc() {
        let utc = parse_timestamp("2024-03-15T12:00:00Z").unwrap();
        let plus = parse_timestamp("2024-03-15T17:30:00+05:30").unwrap();
        let minus = parse_timestamp("2024-03-15T07:00:00-05:00").unwrap();
        assert_eq!(utc, plus);
        assert_eq!(utc, minus);
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!(parse_timestamp("2024-03-15").is_err());
        assert!(parse_timestamp("2024-03-15T12:00:00").is_err());
        assert!(parse_timestamp("2024-13-15T12:00:00Z").is_err());
        assert!(parse_timestamp("2023-02-29T12:00:00Z").is_err());
        assert!(parse_timestamp("2024-03-15T24:00:00Z").is_err());
        assert!(parse_timestamp("2024-03-15T12:00:00.Z").is_err());
        assert!(parse_timestamp("2024-03-15T12:00:00+5:30").is_err());
        assert!(parse_timestamp("2024-0a-15T12:00:00Z").is_err());
    }

    #[test]
    fn test_parse_leap_day() {
        assert!(parse_timestamp("2024-02-29T00:00:00Z").is_ok());
    }

    #[test]
    fn test_format_precision() {
        let ts = parse_timestamp("2016-04-06T20:03:48.123456Z").unwrap();
        assert_eq!(format_timestamp(ts, Precision::Any), "2016-04-06T20:03:48.123456Z");
        assert_eq!(format_timestamp(ts, Precision::Millisecond), "2016-04-06T20:03:48.123Z");
        assert_eq!(format_timestamp(ts, Precision::Second), "2016-04-06T20:03:48Z");

        let whole = parse_timestamp("2016-04-06T20:03:48Z").unwrap();
        assert_eq!(format_timestamp(whole, Precision::Any), "2016-04-06T20:03:48Z");
        assert_eq!(format_timestamp(whole, Precision::Millisecond), "2016-04-06T20:03:48.000Z");
    }

    #[test]
    fn test_format_before_epoch() {
        let ts = parse_timestamp("1969-12-31T23:59:59.5Z").unwrap();
        assert_eq!(ts, -500_000);
        assert_eq!(format_timestamp(ts, Precision::Any), "1969-12-31T23:59:59.5Z");
        assert_eq!(format_timestamp(ts, Precision::Second), "1969-12-31T23:59:59Z");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(Precision::Millisecond.truncate(1_234_567), Some(1_234_000));
        assert_eq!(Precision::Second.truncate(1_234_567), Some(1_000_000));
        assert_eq!(Precision::Any.truncate(1_234_567), Some(1_234_567));
        assert_eq!(Precision::Millisecond.truncate(-1), Some(-1_000));
        assert_eq!(Precision::Millisecond.truncate(i64::MIN), None);
        assert_eq!(Precision::Any.truncate(i64::MIN), Some(i64::MIN));
    }

    #[test]
    fn test_timestamp_range() {
        assert_eq!(
            parse_timestamp("0000-01-01T00:00:00Z").unwrap(),
            MIN_TIMESTAMP_MICROS
        );
        assert_eq!(
            parse_timestamp("9999-12-31T23:59:59.999999Z").unwrap(),
            MAX_TIMESTAMP_MICROS
        );
        assert!(timestamp_in_range(0));
        assert!(!timestamp_in_range(i64::MIN));
        assert!(!timestamp_in_range(MAX_TIMESTAMP_MICROS + 1));
    }
}
