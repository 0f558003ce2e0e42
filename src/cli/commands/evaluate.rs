//! Evaluate command - Train an agent, then play greedily with learning frozen

use anyhow::Result;
use clap::Parser;
use tracing::info;

use crate::{
    cli::{
        commands::train::{TrainArgs, TrainingSummaryFile, run_training, write_summary},
        output::{print_kv, print_metrics, print_training_result},
    },
    pipeline::evaluate,
};

#[derive(Parser, Debug)]
#[command(about = "Train an agent and evaluate its greedy policy")]
pub struct EvaluateArgs {
    #[command(flatten)]
    pub train: TrainArgs,

    /// Number of greedy evaluation episodes
    #[arg(long, default_value_t = 100)]
    pub eval_episodes: usize,

    /// Cut greedy episodes after this many steps; `--max-steps` wins when set
    #[arg(long, default_value_t = 2_000)]
    pub eval_max_steps: usize,
}

impl EvaluateArgs {
    /// Step cap for the greedy episodes
    pub fn evaluation_step_cap(&self) -> usize {
        self.train.max_steps.unwrap_or(self.eval_max_steps)
    }
}

pub fn execute(args: EvaluateArgs) -> Result<()> {
    let mut run = run_training(&args.train)?;
    print_training_result("Training", &run.result);
    print_metrics(&run.metrics);

    if let Some(seed) = args.train.seed {
        run.env.set_rng_seed(seed.wrapping_add(2));
    }
    info!(episodes = args.eval_episodes, "starting evaluation");
    let evaluation = evaluate(
        &mut run.agent,
        &mut run.env,
        args.eval_episodes,
        Some(args.evaluation_step_cap()),
    )?;

    print_training_result("Evaluation (greedy)", &evaluation);
    print_kv(
        "Visited entries",
        &format!(
            "{} / {}",
            run.agent.q_table().nonzero_entries(),
            run.agent.q_table().size()
        ),
    );

    if let Some(raw) = &args.train.summary {
        let mut summary = TrainingSummaryFile::new(&run, &args.train);
        summary.evaluation = Some(&evaluation);
        let path = write_summary(raw, &summary)?;
        println!("\nSummary written to {}", path.display());
    }

    Ok(())
}
