use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use periodavg_core::{TimestampFormat, parse_timestamp};

use crate::error::{CliError, CliResult};

pub fn parse_tz_or_input_error(name: &str) -> CliResult<Tz> {
    periodavg_core::tz::parse_tz(name)
        .map_err(|e| CliError::input(format!("Invalid timezone '{}': {}", name, e)))
}

pub fn parse_format(s: &str) -> CliResult<TimestampFormat> {
    s.parse::<TimestampFormat>()
        .map_err(|_| CliError::input(format!(
            "Invalid format '{}'. Expected: rfc3339, epoch_s, epoch_ms",
            s
        )))
}

/// Parse and validate the `[start, end]` range arguments (RFC3339).
pub fn parse_range(start: &str, end: &str) -> CliResult<(DateTime<Utc>, DateTime<Utc>)> {
    let start_utc = parse_timestamp(start, TimestampFormat::Rfc3339)
        .map_err(|e| CliError::input(format!("Invalid start timestamp: {}", e)))?;
    let end_utc = parse_timestamp(end, TimestampFormat::Rfc3339)
        .map_err(|e| CliError::input(format!("Invalid end timestamp: {}", e)))?;

    if start_utc >= end_utc {
        return Err(CliError::input(format!(
            "Invalid range: start '{}' must be earlier than end '{}'",
            start, end
        )));
    }

    Ok((start_utc, end_utc))
}
