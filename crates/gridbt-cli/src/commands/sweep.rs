use std::error::Error;
use std::path::PathBuf;

use clap::{Args, ValueEnum};
use gridbt_data::{load_catalog, LoadPolicy};
use gridbt_exp::{expand, load_spec};
use gridbt_run::{run_sweep, ReferenceEvaluator, RunOpts, SweepPaths};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PolicyArg {
    /// Fail on the first unloadable dataset file.
    Abort,
    /// Skip unloadable dataset files with a warning.
    Skip,
}

impl From<PolicyArg> for LoadPolicy {
    fn from(policy: PolicyArg) -> Self {
        match policy {
            PolicyArg::Abort => LoadPolicy::Abort,
            PolicyArg::Skip => LoadPolicy::Skip,
        }
    }
}

#[derive(Args, Debug)]
pub struct SweepArgs {
    /// YAML sweep document describing the parameter space.
    #[arg(long)]
    pub spec: PathBuf,
    /// Directory of per-universe dataset files.
    #[arg(long)]
    pub data: PathBuf,
    /// Output root for parameters, results and the sweep report.
    #[arg(long)]
    pub out: PathBuf,
    /// Policy for unloadable dataset files.
    #[arg(long, value_enum, default_value_t = PolicyArg::Abort)]
    pub policy: PolicyArg,
    /// Worker threads for the sweep pool; 0 matches the available cores.
    #[arg(long, default_value_t = 0)]
    pub concurrency: usize,
}

pub fn run(args: &SweepArgs) -> Result<(), Box<dyn Error>> {
    let spec = load_spec(&args.spec)?;
    let configs = expand(&spec)?;
    let datasets = load_catalog(&args.data, args.policy.into())?;
    let paths = SweepPaths::under(&args.out);
    let opts = RunOpts {
        concurrency: args.concurrency,
    };
    let report = run_sweep(&datasets, &configs, &ReferenceEvaluator, &paths, &opts)?;

    println!(
        "submitted={} succeeded={} failed={}",
        report.submitted, report.succeeded, report.failed
    );
    for unit in report.failed_units() {
        let error = unit.status.error.as_deref().unwrap_or("unknown");
        println!("failed {} {}: {}", unit.universe, unit.identifier, error);
    }
    Ok(())
}
