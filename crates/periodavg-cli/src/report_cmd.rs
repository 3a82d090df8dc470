use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::process::ExitCode;

use chrono::Datelike;
use periodavg_core::{
    MONTH_ABBREV, Observation, Statistics, TimestampFormat, parse_timestamp,
};
use serde::Serialize;
use tracing::debug;

use crate::cli::ReportArgs;
use crate::error::{CliError, CliResult, EXIT_SUCCESS, OutputFormat};
use crate::shared::{parse_format, parse_range, parse_tz_or_input_error};

pub fn run_report(args: ReportArgs, output_format: OutputFormat) -> CliResult<ExitCode> {
    if output_format == OutputFormat::Text {
        return Err(CliError::input(
            "Invalid output_format 'text' for report. Expected: csv, json",
        ));
    }

    let tz = parse_tz_or_input_error(&args.tz)?;
    let (start_utc, end_utc) = parse_range(&args.start, &args.end)?;
    let format = parse_format(&args.format)?;

    let mut stats =
        Statistics::new(start_utc, end_utc, tz).map_err(|e| CliError::input(e.to_string()))?;
    debug!("Planned {} buckets in {}", stats.bucket_count(), tz);

    let reader: Box<dyn BufRead> = if args.input == "-" {
        Box::new(io::stdin().lock())
    } else {
        let file = File::open(&args.input).map_err(|e| {
            CliError::runtime(format!("Failed to open file '{}': {}", args.input, e))
        })?;
        Box::new(BufReader::new(file))
    };

    let mut considered = 0usize;
    for line in reader.lines() {
        let line = line.map_err(|e| CliError::runtime(format!("Failed to read line: {}", e)))?;
        let trimmed = line.trim();

        if trimmed.is_empty() {
            continue;
        }

        let observation = parse_observation(trimmed, format)
            .map_err(|e| CliError::input(format!("Error processing '{}': {}", trimmed, e)))?;
        stats.consider(&observation);
        considered += 1;
    }
    debug!("Considered {} observations", considered);

    let year = args
        .year
        .unwrap_or_else(|| chrono::Utc::now().with_timezone(&tz).year());
    let report = build_report(&stats, args.weeks, year)?;

    match output_format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&report)
                .map_err(|e| CliError::runtime(format!("Failed to serialize JSON: {}", e)))?;
            println!("{}", json);
        }
        OutputFormat::Csv | OutputFormat::Text => print_csv(&report),
    }

    Ok(ExitCode::from(EXIT_SUCCESS))
}

fn parse_observation(line: &str, format: TimestampFormat) -> CliResult<Observation> {
    let (ts, value) = line
        .split_once(',')
        .ok_or_else(|| CliError::input("Expected 'timestamp,value'"))?;

    let at = parse_timestamp(ts, format).map_err(|e| CliError::input(e.to_string()))?;
    let value: f64 = value
        .trim()
        .parse()
        .map_err(|_| CliError::input(format!("Invalid value '{}'", value.trim())))?;

    Ok(Observation { at, value })
}

/// One column of the report: a bucket key, its display label (week number
/// or month abbreviation) and the rounded average.
#[derive(Debug, Serialize)]
pub struct ReportColumn {
    pub key: String,
    pub label: String,
    pub average: f64,
}

#[derive(Debug, Serialize)]
pub struct Report {
    pub weeks: Vec<ReportColumn>,
    pub months: Vec<ReportColumn>,
}

/// Select the last `weeks` observed week buckets plus the observed months
/// of `year`. Buckets that never received an observation are left out.
fn build_report(stats: &Statistics, weeks: usize, year: i32) -> CliResult<Report> {
    let mut week_columns = Vec::new();
    for (key, aggregate) in stats.week_aggregates() {
        if aggregate.count == 0 {
            continue;
        }
        week_columns.push(ReportColumn {
            key: key.to_string(),
            label: week_number_label(key),
            average: average_or_runtime_error(key, aggregate)?,
        });
    }
    if week_columns.len() > weeks {
        week_columns.drain(..week_columns.len() - weeks);
    }

    let month_prefix = format!("{}m", year);
    let mut month_columns = Vec::new();
    for (key, aggregate) in stats.month_aggregates() {
        if aggregate.count == 0 || !key.starts_with(&month_prefix) {
            continue;
        }
        month_columns.push(ReportColumn {
            key: key.to_string(),
            label: month_label(key),
            average: average_or_runtime_error(key, aggregate)?,
        });
    }

    Ok(Report {
        weeks: week_columns,
        months: month_columns,
    })
}

fn average_or_runtime_error(
    key: &str,
    aggregate: &periodavg_core::Aggregate,
) -> CliResult<f64> {
    aggregate
        .average_2dp()
        .map_err(|e| CliError::runtime(format!("Failed to average bucket '{}': {}", key, e)))
}

/// `2024w05` renders as `5`, matching the week-number column headers.
fn week_number_label(key: &str) -> String {
    key.split_once('w')
        .and_then(|(_, number)| number.parse::<u32>().ok())
        .map(|number| number.to_string())
        .unwrap_or_else(|| key.to_string())
}

/// `2024m03` renders as `Mar`.
fn month_label(key: &str) -> String {
    key.split_once('m')
        .and_then(|(_, number)| number.parse::<usize>().ok())
        .and_then(|number| number.checked_sub(1))
        .and_then(|index| MONTH_ABBREV.get(index))
        .map(|name| (*name).to_string())
        .unwrap_or_else(|| key.to_string())
}

/// Two CSV rows: labels, then averages, with a blank spacer column between
/// the week block and the month block.
fn print_csv(report: &Report) {
    let mut labels: Vec<String> = report.weeks.iter().map(|c| c.label.clone()).collect();
    labels.push(String::new());
    labels.extend(report.months.iter().map(|c| c.label.clone()));

    let mut averages: Vec<String> = report
        .weeks
        .iter()
        .map(|c| c.average.to_string())
        .collect();
    averages.push(String::new());
    averages.extend(report.months.iter().map(|c| c.average.to_string()));

    println!("{}", labels.join(", "));
    println!("{}", averages.join(", "));
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn week_labels_strip_leading_zero() {
        assert_eq!(week_number_label("2024w05"), "5");
        assert_eq!(week_number_label("2024w13"), "13");
    }

    #[test]
    fn month_labels_use_abbreviations() {
        assert_eq!(month_label("2024m01"), "Jan");
        assert_eq!(month_label("2024m12"), "Dec");
    }

    #[test]
    fn parse_observation_rfc3339() {
        let obs = parse_observation("2024-01-02T10:00:00Z,4.5", TimestampFormat::Rfc3339).unwrap();
        assert_eq!(obs.value, 4.5);
        assert_eq!(
            obs.at,
            chrono::Utc
                .with_ymd_and_hms(2024, 1, 2, 10, 0, 0)
                .single()
                .unwrap()
        );
    }

    #[test]
    fn parse_observation_rejects_missing_value() {
        assert!(parse_observation("2024-01-02T10:00:00Z", TimestampFormat::Rfc3339).is_err());
        assert!(parse_observation("2024-01-02T10:00:00Z,abc", TimestampFormat::Rfc3339).is_err());
    }

    #[test]
    fn report_keeps_last_weeks_and_selected_year() {
        let start = chrono::Utc
            .with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
            .single()
            .unwrap();
        let end = chrono::Utc
            .with_ymd_and_hms(2024, 3, 31, 23, 59, 59)
            .single()
            .unwrap()
            + chrono::Duration::microseconds(999_999);
        let mut stats = Statistics::utc(start, end).unwrap();

        for (ts, value) in [
            ("2024-01-02T10:00:00Z", 4.0),
            ("2024-01-03T10:00:00Z", 6.0),
            ("2024-01-10T00:00:00Z", 3.0),
            ("2024-02-15T12:00:00Z", 10.0),
            ("2024-03-26T00:00:00Z", 7.0),
        ] {
            let at = parse_timestamp(ts, TimestampFormat::Rfc3339).unwrap();
            stats.consider(&Observation { at, value });
        }

        let report = build_report(&stats, 3, 2024).unwrap();

        let week_labels: Vec<&str> = report.weeks.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(week_labels, ["2", "7", "13"]);

        let month_labels: Vec<&str> = report.months.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(month_labels, ["Jan", "Feb", "Mar"]);
        assert_eq!(report.months[0].average, 4.33);
    }

    #[test]
    fn report_filters_unobserved_buckets() {
        let start = chrono::Utc
            .with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
            .single()
            .unwrap();
        let end = chrono::Utc
            .with_ymd_and_hms(2024, 3, 31, 23, 59, 59)
            .single()
            .unwrap()
            + chrono::Duration::microseconds(999_999);
        let stats = Statistics::utc(start, end).unwrap();

        let report = build_report(&stats, 5, 2024).unwrap();
        assert!(report.weeks.is_empty());
        assert!(report.months.is_empty());
    }
}
