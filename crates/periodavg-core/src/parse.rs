//! Input parsing for observation timestamps.
//!
//! The feed path accepts `rfc3339` strings (default), Unix epoch seconds,
//! or Unix epoch milliseconds.

use std::str::FromStr;

use chrono::{DateTime, TimeZone, Utc};

use crate::error::{PeriodAvgError, Result};

/// Supported timestamp formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimestampFormat {
    /// RFC3339 (e.g., "2024-01-02T10:00:00Z" or "2024-01-02T10:00:00+01:00")
    #[default]
    Rfc3339,
    /// Unix epoch seconds (e.g., "1704189600")
    EpochS,
    /// Unix epoch milliseconds (e.g., "1704189600000")
    EpochMs,
}

impl std::fmt::Display for TimestampFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TimestampFormat::Rfc3339 => write!(f, "rfc3339"),
            TimestampFormat::EpochS => write!(f, "epoch_s"),
            TimestampFormat::EpochMs => write!(f, "epoch_ms"),
        }
    }
}

impl FromStr for TimestampFormat {
    type Err = PeriodAvgError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "rfc3339" => Ok(TimestampFormat::Rfc3339),
            "epoch_s" => Ok(TimestampFormat::EpochS),
            "epoch_ms" => Ok(TimestampFormat::EpochMs),
            _ => Err(PeriodAvgError::ParseError(format!(
                "Unknown format: '{s}'. Expected 'rfc3339', 'epoch_s', or 'epoch_ms'"
            ))),
        }
    }
}

/// Parse a timestamp string according to the specified format.
///
/// # Examples
///
/// ```
/// use periodavg_core::parse::{TimestampFormat, parse_timestamp};
/// use chrono::{Datelike, Utc};
///
/// let dt = parse_timestamp("2024-01-02T10:00:00Z", TimestampFormat::Rfc3339).unwrap();
/// assert_eq!(dt.year(), 2024);
/// ```
pub fn parse_timestamp(input: &str, format: TimestampFormat) -> Result<DateTime<Utc>> {
    let trimmed = input.trim();

    match format {
        TimestampFormat::Rfc3339 => DateTime::parse_from_rfc3339(trimmed)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| {
                PeriodAvgError::ParseError(format!("Invalid RFC3339 timestamp '{trimmed}': {e}"))
            }),
        TimestampFormat::EpochS => {
            let s: i64 = trimmed.parse().map_err(|_| {
                PeriodAvgError::ParseError(format!("Invalid epoch seconds: '{trimmed}'"))
            })?;
            Utc.timestamp_opt(s, 0).single().ok_or_else(|| {
                PeriodAvgError::ParseError(format!("Epoch seconds out of range: {s}"))
            })
        }
        TimestampFormat::EpochMs => {
            let ms: i64 = trimmed.parse().map_err(|_| {
                PeriodAvgError::ParseError(format!("Invalid epoch milliseconds: '{trimmed}'"))
            })?;
            Utc.timestamp_millis_opt(ms).single().ok_or_else(|| {
                PeriodAvgError::ParseError(format!("Epoch milliseconds out of range: {ms}"))
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn parse_rfc3339_zulu() {
        let dt = parse_timestamp("2024-01-02T10:00:00Z", TimestampFormat::Rfc3339).unwrap();
        assert_eq!((dt.year(), dt.month(), dt.day(), dt.hour()), (2024, 1, 2, 10));
    }

    #[test]
    fn parse_rfc3339_with_offset_normalizes_to_utc() {
        let dt = parse_timestamp("2024-01-02T10:00:00+02:00", TimestampFormat::Rfc3339).unwrap();
        assert_eq!(dt.hour(), 8);
    }

    #[test]
    fn parse_epoch_seconds() {
        let dt = parse_timestamp("1704189600", TimestampFormat::EpochS).unwrap();
        assert_eq!(dt.timestamp(), 1704189600);
    }

    #[test]
    fn parse_epoch_milliseconds() {
        let dt = parse_timestamp(" 1704189600000 ", TimestampFormat::EpochMs).unwrap();
        assert_eq!(dt.timestamp_millis(), 1704189600000);
    }

    #[test]
    fn parse_garbage_fails() {
        assert!(parse_timestamp("not-a-date", TimestampFormat::Rfc3339).is_err());
        assert!(parse_timestamp("not-a-number", TimestampFormat::EpochS).is_err());
    }

    #[test]
    fn format_round_trips_through_str() {
        for format in [
            TimestampFormat::Rfc3339,
            TimestampFormat::EpochS,
            TimestampFormat::EpochMs,
        ] {
            assert_eq!(format.to_string().parse::<TimestampFormat>().unwrap(), format);
        }
        assert!("invalid".parse::<TimestampFormat>().is_err());
    }
}
