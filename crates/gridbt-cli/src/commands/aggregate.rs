use std::error::Error;
use std::path::PathBuf;

use chrono::NaiveDate;
use clap::Args;
use gridbt_data::load_benchmark;
use gridbt_run::{aggregate, BasicMetrics};

#[derive(Args, Debug)]
pub struct AggregateArgs {
    /// Directory of persisted result tables.
    #[arg(long)]
    pub results: PathBuf,
    /// Delimited benchmark file with date and OHLC columns.
    #[arg(long)]
    pub benchmark: PathBuf,
    /// Output directory for summary statistics.
    #[arg(long)]
    pub out: PathBuf,
    /// Drop benchmark rows before this date (YYYY-MM-DD).
    #[arg(long)]
    pub min_start: Option<NaiveDate>,
}

pub fn run(args: &AggregateArgs) -> Result<(), Box<dyn Error>> {
    let benchmark = load_benchmark(&args.benchmark, args.min_start)?;
    let report = aggregate(&args.results, &benchmark, &args.out, &BasicMetrics)?;
    println!(
        "processed={} succeeded={} failed={}",
        report.processed, report.succeeded, report.failed
    );
    Ok(())
}
