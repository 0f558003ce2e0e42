//! Train command - Run Q-learning episodes and report the outcome

use std::{
    fs::File,
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use serde_json::to_writer_pretty;
use tracing::info;

use crate::{
    cli::output::{print_metrics, print_training_result},
    config::FlappyConfig,
    game::FlappyEnv,
    pipeline::{
        CsvObserver, JsonlObserver, MetricsObserver, MetricsSummary, ProgressObserver,
        ReportObserver, TrainingConfig, TrainingPipeline, TrainingResult,
    },
    q_learning::QLearningAgent,
};

#[derive(Parser, Debug, Clone)]
#[command(about = "Train a Q-learning agent")]
pub struct TrainArgs {
    /// Number of training episodes
    #[arg(long, short = 'e', default_value_t = 20_000)]
    pub episodes: usize,

    /// Random seed for reproducibility
    #[arg(long)]
    pub seed: Option<u64>,

    /// JSON config file; omitted fields keep their defaults
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,

    /// Cut episodes after this many steps
    #[arg(long)]
    pub max_steps: Option<usize>,

    /// Log a status line every N episodes (0 disables)
    #[arg(long, default_value_t = 100)]
    pub report_every: usize,

    /// Optional file for JSONL episode records
    #[arg(long)]
    pub jsonl: Option<PathBuf>,

    /// Include per-step monitor data in the JSONL records
    #[arg(long, requires = "jsonl")]
    pub jsonl_steps: bool,

    /// Optional file for one CSV row per episode
    #[arg(long)]
    pub csv: Option<PathBuf>,

    /// Optional path for writing a summary JSON file
    #[arg(long)]
    pub summary: Option<PathBuf>,

    /// Hide the progress bar
    #[arg(long)]
    pub no_progress: bool,
}

/// Everything a finished training run leaves behind
pub(crate) struct TrainedRun {
    pub config: FlappyConfig,
    pub agent: QLearningAgent,
    pub env: FlappyEnv,
    pub result: TrainingResult,
    pub metrics: MetricsSummary,
}

#[derive(Debug, Serialize)]
pub(crate) struct TrainingSummaryFile<'a> {
    pub training: &'a TrainingResult,
    pub metrics: &'a MetricsSummary,
    pub evaluation: Option<&'a TrainingResult>,
    pub metadata: SummaryMetadata<'a>,
}

#[derive(Debug, Serialize)]
pub(crate) struct SummaryMetadata<'a> {
    pub seed: Option<u64>,
    pub max_steps: Option<usize>,
    pub q_table_size: usize,
    pub q_table_visited: usize,
    pub config: &'a FlappyConfig,
}

impl<'a> TrainingSummaryFile<'a> {
    pub(crate) fn new(run: &'a TrainedRun, args: &TrainArgs) -> Self {
        Self {
            training: &run.result,
            metrics: &run.metrics,
            evaluation: None,
            metadata: SummaryMetadata {
                seed: args.seed,
                max_steps: args.max_steps,
                q_table_size: run.agent.q_table().size(),
                q_table_visited: run.agent.q_table().nonzero_entries(),
                config: &run.config,
            },
        }
    }
}

fn sanitize_summary_path(raw: &Path) -> PathBuf {
    let mut normalized = raw.to_path_buf();
    let raw_str = raw.as_os_str().to_string_lossy();

    // Trailing separator or no file name means a directory target
    if raw_str.ends_with(std::path::MAIN_SEPARATOR) || normalized.file_name().is_none() {
        normalized.push("training_summary.json");
        return normalized;
    }

    match normalized.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("json") => normalized,
        _ => {
            normalized.set_extension("json");
            normalized
        }
    }
}

pub(crate) fn write_summary(raw: &Path, summary: &TrainingSummaryFile<'_>) -> Result<PathBuf> {
    let path = sanitize_summary_path(raw);
    if path != raw {
        info!(path = %path.display(), "normalized summary path");
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating summary directory {}", parent.display()))?;
    }
    let file = File::create(&path)
        .with_context(|| format!("creating summary file {}", path.display()))?;
    to_writer_pretty(file, summary)?;
    Ok(path)
}

fn load_config(args: &TrainArgs) -> Result<FlappyConfig> {
    match &args.config {
        Some(path) => FlappyConfig::load(path)
            .with_context(|| format!("loading config {}", path.display())),
        None => Ok(FlappyConfig::default()),
    }
}

/// Build the agent and environment from the arguments and train them
pub(crate) fn run_training(args: &TrainArgs) -> Result<TrainedRun> {
    let config = load_config(args)?;
    let mut env = FlappyEnv::new(config.game.clone())?;
    let mut agent = QLearningAgent::new(&config.agent, &config.bins, &config.game)?;

    let training = TrainingConfig {
        num_episodes: args.episodes,
        seed: args.seed,
        max_steps_per_episode: args.max_steps,
    };

    let metrics = Arc::new(Mutex::new(MetricsObserver::new()));
    let mut pipeline = TrainingPipeline::new(training)
        .with_observer(Box::new(ReportObserver::new(args.report_every)))
        .with_observer(Box::new(Arc::clone(&metrics)));

    if !args.no_progress {
        pipeline = pipeline.with_observer(Box::new(ProgressObserver::new()));
    }
    if let Some(path) = &args.jsonl {
        let observer = JsonlObserver::new(path)
            .with_context(|| format!("creating JSONL file {}", path.display()))?
            .with_steps(args.jsonl_steps);
        pipeline = pipeline.with_observer(Box::new(observer));
    }
    if let Some(path) = &args.csv {
        let observer = CsvObserver::new(path)
            .with_context(|| format!("creating CSV file {}", path.display()))?;
        pipeline = pipeline.with_observer(Box::new(observer));
    }

    info!(
        episodes = args.episodes,
        seed = ?args.seed,
        "starting training"
    );
    let result = pipeline.run(&mut agent, &mut env)?;
    let metrics = metrics
        .lock()
        .map(|observer| observer.summary())
        .unwrap_or_else(|poisoned| poisoned.into_inner().summary());

    Ok(TrainedRun {
        config,
        agent,
        env,
        result,
        metrics,
    })
}

pub fn execute(args: TrainArgs) -> Result<()> {
    let run = run_training(&args)?;

    print_training_result("Training", &run.result);
    print_metrics(&run.metrics);

    if let Some(raw) = &args.summary {
        let path = write_summary(raw, &TrainingSummaryFile::new(&run, &args))?;
        println!("\nSummary written to {}", path.display());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_path_gets_json_extension() {
        assert_eq!(
            sanitize_summary_path(Path::new("out/run")),
            PathBuf::from("out/run.json")
        );
        assert_eq!(
            sanitize_summary_path(Path::new("out/run.JSON")),
            PathBuf::from("out/run.JSON")
        );
    }

    #[test]
    fn test_summary_directory_gets_default_name() {
        let raw = format!("out{}", std::path::MAIN_SEPARATOR);
        assert_eq!(
            sanitize_summary_path(Path::new(&raw)),
            Path::new("out").join("training_summary.json")
        );
    }

    #[test]
    fn test_defaults() {
        let args = TrainArgs::parse_from(["flappy-train"]);
        assert_eq!(args.episodes, 20_000);
        assert_eq!(args.report_every, 100);
        assert!(args.seed.is_none());
        assert!(!args.no_progress);
    }
}
