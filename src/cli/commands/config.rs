//! Config command - Print the default configuration document

use anyhow::Result;
use clap::Parser;

use crate::config::FlappyConfig;

#[derive(Parser, Debug)]
#[command(about = "Print the default configuration as JSON")]
pub struct ConfigArgs {
    /// Validate this file and print it with defaults filled in
    #[arg(long)]
    pub check: Option<std::path::PathBuf>,
}

pub fn execute(args: ConfigArgs) -> Result<()> {
    let config = match &args.check {
        Some(path) => FlappyConfig::load(path)?,
        None => FlappyConfig::default(),
    };
    println!("{}", config.to_json_pretty()?);
    Ok(())
}
