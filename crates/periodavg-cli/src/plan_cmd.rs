use std::process::ExitCode;

use periodavg_core::plan::{planned_months, planned_weeks};
use periodavg_core::tz::to_local_naive;
use tracing::debug;

use crate::cli::PlanArgs;
use crate::error::{CliError, CliResult, EXIT_SUCCESS, OutputFormat};
use crate::shared::{parse_range, parse_tz_or_input_error};

pub fn run_plan(args: PlanArgs, output_format: OutputFormat) -> CliResult<ExitCode> {
    if output_format == OutputFormat::Csv {
        return Err(CliError::input(
            "Invalid output_format 'csv' for plan. Expected: text, json",
        ));
    }

    let tz = parse_tz_or_input_error(&args.tz)?;
    let (start_utc, end_utc) = parse_range(&args.start, &args.end)?;

    let local_start = to_local_naive(start_utc, tz);
    let local_end = to_local_naive(end_utc, tz);

    let mut buckets = planned_weeks(local_start, local_end);
    buckets.extend(planned_months(local_start, local_end));
    buckets.sort_by(|a, b| {
        a.start_local
            .cmp(&b.start_local)
            .then_with(|| a.key.cmp(&b.key))
    });

    debug!("Planned {} buckets in {}", buckets.len(), tz);

    match output_format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&buckets)
                .map_err(|e| CliError::runtime(format!("Failed to serialize JSON: {}", e)))?;
            println!("{}", json);
        }
        OutputFormat::Text | OutputFormat::Csv => {
            for bucket in &buckets {
                println!(
                    "{}: {} to {}",
                    bucket.key, bucket.start_local, bucket.last_local
                );
            }
        }
    }

    Ok(ExitCode::from(EXIT_SUCCESS))
}
