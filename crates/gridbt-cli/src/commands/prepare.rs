use std::error::Error;
use std::path::PathBuf;

use clap::Args;
use gridbt_data::prepare_universes;

#[derive(Args, Debug)]
pub struct PrepareArgs {
    /// Master data file holding every available observation.
    #[arg(long)]
    pub master: PathBuf,
    /// Directory of per-index membership files (date,symbol).
    #[arg(long)]
    pub memberships: PathBuf,
    /// Output directory for the per-universe dataset files.
    #[arg(long)]
    pub out: PathBuf,
}

pub fn run(args: &PrepareArgs) -> Result<(), Box<dyn Error>> {
    let written = prepare_universes(&args.master, &args.memberships, &args.out)?;
    for universe in &written {
        println!("{universe}");
    }
    println!("{} universes prepared", written.len());
    Ok(())
}
