use std::error::Error;
use std::fs;
use std::path::PathBuf;

use clap::Args;
use gridbt_core::hash::identifier;
use gridbt_core::serde::to_canonical_json_bytes;
use gridbt_exp::{expand, load_spec};

#[derive(Args, Debug)]
pub struct ExpandArgs {
    /// YAML sweep document describing the parameter space.
    #[arg(long)]
    pub spec: PathBuf,
    /// Optional directory receiving one params JSON per configuration.
    #[arg(long)]
    pub out: Option<PathBuf>,
}

pub fn run(args: &ExpandArgs) -> Result<(), Box<dyn Error>> {
    let spec = load_spec(&args.spec)?;
    let configs = expand(&spec)?;
    println!("{} configurations", configs.len());
    match &args.out {
        Some(out) => {
            fs::create_dir_all(out)?;
            for config in &configs {
                let id = identifier(config)?;
                let bytes = to_canonical_json_bytes(config)?;
                fs::write(out.join(format!("{id}.json")), bytes)?;
            }
        }
        None => {
            for config in &configs {
                println!("{}", identifier(config)?);
            }
        }
    }
    Ok(())
}
