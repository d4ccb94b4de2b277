use std::error::Error;

use clap::{Parser, Subcommand};
use commands::aggregate::{self, AggregateArgs};
use commands::expand::{self, ExpandArgs};
use commands::prepare::{self, PrepareArgs};
use commands::sweep::{self, SweepArgs};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser, Debug)]
#[command(name = "gridbt", about = "Backtest parameter sweep runner")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Expand a sweep document and print or persist its configurations.
    Expand(ExpandArgs),
    /// Build per-universe dataset files from a master file and memberships.
    Prepare(PrepareArgs),
    /// Run every configuration against every dataset in the catalog.
    Sweep(SweepArgs),
    /// Aggregate persisted result tables into summary statistics.
    Aggregate(AggregateArgs),
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();
    let cli = Cli::parse();
    match cli.command {
        Command::Expand(args) => expand::run(&args),
        Command::Prepare(args) => prepare::run(&args),
        Command::Sweep(args) => sweep::run(&args),
        Command::Aggregate(args) => aggregate::run(&args),
    }
}
