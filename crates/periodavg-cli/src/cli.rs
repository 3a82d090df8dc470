use clap::{Parser, Subcommand};

/// Weekly and monthly averages over complete calendar periods
#[derive(Parser, Debug)]
#[command(name = "periodavg")]
#[command(about = "Weekly and monthly averages over complete calendar periods")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose (debug) logging
    #[arg(long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the fully encompassed week and month buckets of a range
    Plan(PlanArgs),
    /// Aggregate observations and render the averages report
    Report(ReportArgs),
}

#[derive(clap::Args, Debug)]
pub struct PlanArgs {
    /// IANA timezone (e.g., Europe/Berlin)
    #[arg(short, long, default_value = "UTC")]
    pub tz: String,

    /// Start of range (inclusive, RFC3339)
    #[arg(long)]
    pub start: String,

    /// End of range (inclusive, RFC3339)
    #[arg(long)]
    pub end: String,

    /// Output format: text, json
    #[arg(long, default_value = "text")]
    pub output_format: String,
}

#[derive(clap::Args, Debug)]
pub struct ReportArgs {
    /// IANA timezone (e.g., Europe/Berlin)
    #[arg(short, long, default_value = "UTC")]
    pub tz: String,

    /// Start of range (inclusive, RFC3339)
    #[arg(long)]
    pub start: String,

    /// End of range (inclusive, RFC3339)
    #[arg(long)]
    pub end: String,

    /// Timestamp format of input lines: rfc3339, epoch_s, epoch_ms
    #[arg(short = 'f', long, default_value = "rfc3339")]
    pub format: String,

    /// Input file with `timestamp,value` lines (use - for stdin)
    #[arg(long, default_value = "-")]
    pub input: String,

    /// Number of trailing week columns in the report
    #[arg(long, default_value_t = 5)]
    pub weeks: usize,

    /// Year whose months appear in the report (default: current year in the target timezone)
    #[arg(long)]
    pub year: Option<i32>,

    /// Output format: csv, json
    #[arg(long, default_value = "csv")]
    pub output_format: String,
}
