//! flappy - train and evaluate a tabular Q-learning agent on the jump game
//!
//! This CLI provides:
//! - Training with periodic status lines, progress bar and optional exports
//! - Greedy evaluation of the trained table
//! - The default configuration document as JSON

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "flappy")]
#[command(version, about = "Tabular Q-learning for a side-scrolling jump game", long_about = None)]
struct Cli {
    /// Log every finished episode (overridden by RUST_LOG)
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Train a Q-learning agent
    Train(flappy_q::cli::commands::train::TrainArgs),

    /// Train, then evaluate the greedy policy with learning frozen
    Evaluate(flappy_q::cli::commands::evaluate::EvaluateArgs),

    /// Print the default configuration
    Config(flappy_q::cli::commands::config::ConfigArgs),
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Train(args) => flappy_q::cli::commands::train::execute(args),
        Commands::Evaluate(args) => flappy_q::cli::commands::evaluate::execute(args),
        Commands::Config(args) => flappy_q::cli::commands::config::execute(args),
    }
}
