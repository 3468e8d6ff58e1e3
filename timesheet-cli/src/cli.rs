use std::path::PathBuf;

use clap::Parser;

#[derive(Debug, Parser)]
#[command(name = "timesheet")]
#[command(about = "Build a monthly timesheet CSV from commits and pull request reviews")]
pub struct Cli {
    /// Settings file, defaults to config/base.toml when present
    #[arg(short, long, env = "TIMESHEET_CONFIG")]
    pub config: Option<PathBuf>,

    /// Year to report, only used together with --month
    #[arg(long)]
    pub year: Option<i32>,

    /// Month to report (1-12), defaults to the previous month
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=12))]
    pub month: Option<u8>,

    /// Directory the CSV is written to
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Seed for a reproducible allocation
    #[arg(long)]
    pub seed: Option<u64>,

    /// Print the CSV instead of writing it
    #[arg(long)]
    pub dry_run: bool,

    /// Log level when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    pub log_level: String,
}
