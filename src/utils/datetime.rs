//! Date and time inputs for API parameters.
//!
//! Econt expects courier request times as unix timestamps. [`DateInput`]
//! accepts the forms callers usually have at hand and [`timestamp`]
//! converts them, reading naive values in the client's [`Timezone`].

use chrono::{DateTime, FixedOffset, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};
use chrono_tz::Tz;
use thiserror::Error;

/// Formats tried, in order, for naive date-time strings.
const NAIVE_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];

/// Error returned when a date input cannot be converted.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DateError {
    /// The string matched no supported format.
    #[error("Could not parse date '{value}'.")]
    Unparseable {
        /// The rejected input.
        value: String,
    },

    /// The string did not match the explicit format.
    #[error("Date '{value}' does not match format '{format}'.")]
    FormatMismatch {
        /// The rejected input.
        value: String,
        /// The expected format.
        format: String,
    },

    /// The local time falls in a daylight saving gap of the zone.
    #[error("Date '{value}' is not a valid local time.")]
    InvalidLocalTime {
        /// The rejected input.
        value: String,
    },
}

/// A point in time given in one of several forms.
///
/// # Example
///
/// ```rust
/// use chrono_tz::Europe::Sofia;
/// use econt_api::utils::datetime::{timestamp, DateInput};
///
/// assert_eq!(timestamp(&DateInput::from(1_700_000_000), &Sofia).unwrap(), 1_700_000_000);
/// // +02:00 in winter, +03:00 in summer
/// assert_eq!(
///     timestamp(&DateInput::from("2024-01-15 10:00"), &Sofia).unwrap(),
///     1_705_305_600
/// );
/// assert_eq!(
///     timestamp(&DateInput::from("2024-07-15 10:00"), &Sofia).unwrap(),
///     1_721_026_800
/// );
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DateInput {
    /// Seconds since the unix epoch.
    Timestamp(i64),
    /// A date-time with offset.
    DateTime(DateTime<FixedOffset>),
    /// A numeric timestamp, an RFC 3339 string, `%Y-%m-%d %H:%M[:%S]`,
    /// `%Y-%m-%dT%H:%M:%S` or `%Y-%m-%d`.
    Text(String),
    /// A string in an explicit `chrono` format.
    Formatted {
        /// The string.
        value: String,
        /// The `chrono` format of `value`.
        format: String,
    },
}

impl DateInput {
    /// Creates an input parsed with an explicit format.
    #[must_use]
    pub fn formatted(value: impl Into<String>, format: impl Into<String>) -> Self {
        Self::Formatted {
            value: value.into(),
            format: format.into(),
        }
    }
}

impl From<i64> for DateInput {
    fn from(value: i64) -> Self {
        Self::Timestamp(value)
    }
}

impl<Tz: TimeZone> From<DateTime<Tz>> for DateInput {
    fn from(value: DateTime<Tz>) -> Self {
        Self::DateTime(value.fixed_offset())
    }
}

impl From<&str> for DateInput {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for DateInput {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// The zone naive date-times are read in.
///
/// Defaults to `Europe/Sofia`, which observes daylight saving time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Timezone {
    /// An IANA time zone.
    Named(Tz),
    /// A constant offset from UTC.
    Fixed(FixedOffset),
}

impl Timezone {
    /// Converts `input` to a unix timestamp in this zone.
    ///
    /// # Errors
    ///
    /// See [`timestamp`].
    pub fn timestamp(&self, input: &DateInput) -> Result<i64, DateError> {
        match self {
            Self::Named(zone) => timestamp(input, zone),
            Self::Fixed(offset) => timestamp(input, offset),
        }
    }
}

impl Default for Timezone {
    fn default() -> Self {
        Self::Named(chrono_tz::Europe::Sofia)
    }
}

impl From<Tz> for Timezone {
    fn from(zone: Tz) -> Self {
        Self::Named(zone)
    }
}

impl From<FixedOffset> for Timezone {
    fn from(offset: FixedOffset) -> Self {
        Self::Fixed(offset)
    }
}

/// Converts `input` to a unix timestamp.
///
/// Strings without an offset are read as local time in `zone`. A time
/// repeated when clocks go back resolves to its earlier instant.
///
/// # Errors
///
/// Returns [`DateError`] if a string cannot be parsed or names a local
/// time skipped when clocks go forward.
pub fn timestamp<Z: TimeZone>(input: &DateInput, zone: &Z) -> Result<i64, DateError> {
    match input {
        DateInput::Timestamp(value) => Ok(*value),
        DateInput::DateTime(value) => Ok(value.timestamp()),
        DateInput::Text(value) => parse_text(value.trim(), zone),
        DateInput::Formatted { value, format } => {
            if let Ok(parsed) = DateTime::parse_from_str(value, format) {
                return Ok(parsed.timestamp());
            }
            let naive = NaiveDateTime::parse_from_str(value, format)
                .or_else(|_| {
                    NaiveDate::parse_from_str(value, format).map(|date| date.and_time(NaiveTime::MIN))
                })
                .map_err(|_| DateError::FormatMismatch {
                    value: value.clone(),
                    format: format.clone(),
                })?;
            localize(&naive, zone, value)
        }
    }
}

fn parse_text<Z: TimeZone>(value: &str, zone: &Z) -> Result<i64, DateError> {
    if let Ok(seconds) = value.parse::<i64>() {
        return Ok(seconds);
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Ok(parsed.timestamp());
    }
    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return localize(&naive, zone, value);
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return localize(&date.and_time(NaiveTime::MIN), zone, value);
    }

    Err(DateError::Unparseable {
        value: value.to_string(),
    })
}

fn localize<Z: TimeZone>(naive: &NaiveDateTime, zone: &Z, value: &str) -> Result<i64, DateError> {
    match zone.from_local_datetime(naive) {
        LocalResult::Single(local) | LocalResult::Ambiguous(local, _) => Ok(local.timestamp()),
        LocalResult::None => Err(DateError::InvalidLocalTime {
            value: value.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use chrono_tz::Europe::Sofia;

    fn utc() -> FixedOffset {
        FixedOffset::east_opt(0).unwrap()
    }

    #[test]
    fn test_timestamp_passthrough() {
        assert_eq!(timestamp(&DateInput::Timestamp(42), &Sofia).unwrap(), 42);
        assert_eq!(timestamp(&DateInput::from("1700000000"), &Sofia).unwrap(), 1_700_000_000);
    }

    #[test]
    fn test_naive_strings_use_zone() {
        let in_sofia = timestamp(&DateInput::from("2024-01-15 12:00:00"), &Sofia).unwrap();
        let in_utc = timestamp(&DateInput::from("2024-01-15 12:00:00"), &utc()).unwrap();
        assert_eq!(in_utc - in_sofia, 2 * 3600);

        let date_only = timestamp(&DateInput::from("2024-01-15"), &utc()).unwrap();
        assert_eq!(date_only, 1_705_276_800);
    }

    // === Daylight saving ===

    #[test]
    fn test_winter_time_is_two_hours_ahead() {
        // 2024-01-15 08:00:00 UTC
        let value = timestamp(&DateInput::from("2024-01-15 10:00"), &Sofia).unwrap();
        assert_eq!(value, 1_705_305_600);
    }

    #[test]
    fn test_summer_time_is_three_hours_ahead() {
        // 2024-07-15 07:00:00 UTC
        let value = timestamp(&DateInput::from("2024-07-15 10:00"), &Sofia).unwrap();
        assert_eq!(value, 1_721_026_800);

        let formatted = DateInput::formatted("15.07.2024 10:00", "%d.%m.%Y %H:%M");
        assert_eq!(timestamp(&formatted, &Sofia).unwrap(), 1_721_026_800);
    }

    #[test]
    fn test_skipped_local_time() {
        // Clocks go from 03:00 to 04:00 on 2024-03-31.
        assert_eq!(
            timestamp(&DateInput::from("2024-03-31 03:30"), &Sofia).unwrap_err(),
            DateError::InvalidLocalTime {
                value: "2024-03-31 03:30".to_string()
            }
        );
    }

    #[test]
    fn test_repeated_local_time_takes_earlier_instant() {
        // 03:30 happens twice on 2024-10-27; the first is at +03:00.
        let value = timestamp(&DateInput::from("2024-10-27 03:30"), &Sofia).unwrap();
        assert_eq!(value, 1_729_989_000);
    }

    #[test]
    fn test_timezone_dispatch() {
        let input = DateInput::from("2024-07-15 10:00");
        assert_eq!(Timezone::default(), Timezone::Named(Sofia));
        assert_eq!(Timezone::default().timestamp(&input).unwrap(), 1_721_026_800);

        let fixed = Timezone::from(FixedOffset::east_opt(2 * 3600).unwrap());
        assert_eq!(fixed.timestamp(&input).unwrap(), 1_721_030_400);
    }

    #[test]
    fn test_rfc3339_keeps_its_offset() {
        let value = timestamp(&DateInput::from("2024-01-15T10:00:00+00:00"), &Sofia).unwrap();
        assert_eq!(value, 1_705_312_800);
    }

    #[test]
    fn test_datetime_input() {
        let now = Utc::now();
        assert_eq!(timestamp(&DateInput::from(now), &Sofia).unwrap(), now.timestamp());
    }

    #[test]
    fn test_explicit_format() {
        let input = DateInput::formatted("15.01.2024 10:00", "%d.%m.%Y %H:%M");
        let expected = timestamp(&DateInput::from("2024-01-15 10:00"), &Sofia).unwrap();
        assert_eq!(timestamp(&input, &Sofia).unwrap(), expected);

        let mismatch = DateInput::formatted("2024-01-15", "%d.%m.%Y");
        assert!(matches!(
            timestamp(&mismatch, &Sofia),
            Err(DateError::FormatMismatch { .. })
        ));
    }

    #[test]
    fn test_unparseable_text() {
        assert_eq!(
            timestamp(&DateInput::from("tomorrow"), &Sofia).unwrap_err(),
            DateError::Unparseable {
                value: "tomorrow".to_string()
            }
        );
    }
}
