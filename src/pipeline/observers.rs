//! Observer pattern for training pipelines
//!
//! Observers allow composable data collection during training without coupling
//! the training loop to specific output formats.

use std::{
    collections::VecDeque,
    fs::File,
    io::{BufWriter, Write},
    path::Path,
    sync::{Arc, Mutex},
};

use indicatif::{ProgressBar, ProgressStyle};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    Result,
    ports::{EpisodeSummary, Observer, StepObservation},
};

/// A shared observer, so results can be read back after the pipeline took
/// ownership of its box
impl<O: Observer> Observer for Arc<Mutex<O>> {
    fn on_training_start(&mut self, total_episodes: usize) -> Result<()> {
        lock(self).on_training_start(total_episodes)
    }

    fn on_episode_start(&mut self, episode: usize) -> Result<()> {
        lock(self).on_episode_start(episode)
    }

    fn on_step(&mut self, observation: &StepObservation) -> Result<()> {
        lock(self).on_step(observation)
    }

    fn on_episode_end(&mut self, summary: &EpisodeSummary) -> Result<()> {
        lock(self).on_episode_end(summary)
    }

    fn on_training_end(&mut self) -> Result<()> {
        lock(self).on_training_end()
    }
}

fn lock<O>(shared: &Mutex<O>) -> std::sync::MutexGuard<'_, O> {
    // observers hold plain counters, so a poisoned lock still has usable data
    shared.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Progress bar observer - Shows training progress
pub struct ProgressObserver {
    progress_bar: Option<ProgressBar>,
    best_score: u32,
}

impl ProgressObserver {
    /// Create a new progress observer
    pub fn new() -> Self {
        Self {
            progress_bar: None,
            best_score: 0,
        }
    }
}

impl Default for ProgressObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl Observer for ProgressObserver {
    fn on_training_start(&mut self, total_episodes: usize) -> Result<()> {
        let pb = ProgressBar::new(total_episodes as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} episodes ({msg})")
                .map_err(|e| crate::Error::ProgressBarTemplate {
                    message: e.to_string(),
                })?
                .progress_chars("=>-"),
        );
        self.progress_bar = Some(pb);
        Ok(())
    }

    fn on_episode_end(&mut self, summary: &EpisodeSummary) -> Result<()> {
        self.best_score = self.best_score.max(summary.score);
        if let Some(pb) = &self.progress_bar {
            pb.set_position(summary.episode as u64 + 1);
            pb.set_message(format!(
                "best {} eps {:.4}",
                self.best_score, summary.epsilon
            ));
        }
        Ok(())
    }

    fn on_training_end(&mut self) -> Result<()> {
        if let Some(pb) = &self.progress_bar {
            pb.finish_with_message(format!("best {}", self.best_score));
        }
        Ok(())
    }
}

/// Report observer - logs a status line every `every` episodes
pub struct ReportObserver {
    every: usize,
}

impl ReportObserver {
    /// `every == 0` disables reporting
    pub fn new(every: usize) -> Self {
        Self { every }
    }
}

impl Observer for ReportObserver {
    fn on_episode_end(&mut self, summary: &EpisodeSummary) -> Result<()> {
        if self.every > 0 && (summary.episode + 1).is_multiple_of(self.every) {
            info!(
                "Episode: {}, Score: {}, Total Reward: {:.2}, Epsilon: {:.4}",
                summary.episode + 1,
                summary.score,
                summary.total_reward,
                summary.epsilon
            );
        }
        Ok(())
    }
}

/// Metrics observer - Tracks training metrics
pub struct MetricsObserver {
    window: usize,
    recent_scores: VecDeque<u32>,
    episodes: usize,
    total_steps: usize,
    total_score: u64,
    total_reward: f64,
    best_score: u32,
    jumps: usize,
}

impl MetricsObserver {
    /// Create a new metrics observer with a 100-episode moving window
    pub fn new() -> Self {
        Self::with_window(100)
    }

    pub fn with_window(window: usize) -> Self {
        Self {
            window: window.max(1),
            recent_scores: VecDeque::new(),
            episodes: 0,
            total_steps: 0,
            total_score: 0,
            total_reward: 0.0,
            best_score: 0,
            jumps: 0,
        }
    }

    /// Mean score over the most recent window
    pub fn moving_average_score(&self) -> f64 {
        if self.recent_scores.is_empty() {
            0.0
        } else {
            self.recent_scores.iter().map(|&s| s as f64).sum::<f64>()
                / self.recent_scores.len() as f64
        }
    }

    /// Get metrics summary
    pub fn summary(&self) -> MetricsSummary {
        let per_episode = |total: f64| {
            if self.episodes == 0 {
                0.0
            } else {
                total / self.episodes as f64
            }
        };
        MetricsSummary {
            episodes: self.episodes,
            best_score: self.best_score,
            mean_score: per_episode(self.total_score as f64),
            mean_reward: per_episode(self.total_reward),
            mean_episode_length: per_episode(self.total_steps as f64),
            moving_average_score: self.moving_average_score(),
            jump_rate: if self.total_steps == 0 {
                0.0
            } else {
                self.jumps as f64 / self.total_steps as f64
            },
        }
    }
}

/// Summary of training metrics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsSummary {
    pub episodes: usize,
    pub best_score: u32,
    pub mean_score: f64,
    pub mean_reward: f64,
    pub mean_episode_length: f64,
    pub moving_average_score: f64,
    /// Share of steps where the agent jumped
    pub jump_rate: f64,
}

impl Default for MetricsObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl Observer for MetricsObserver {
    fn on_step(&mut self, observation: &StepObservation) -> Result<()> {
        self.total_steps += 1;
        if observation.action == crate::types::Action::Jump {
            self.jumps += 1;
        }
        Ok(())
    }

    fn on_episode_end(&mut self, summary: &EpisodeSummary) -> Result<()> {
        self.episodes += 1;
        self.total_score += u64::from(summary.score);
        self.total_reward += summary.total_reward;
        self.best_score = self.best_score.max(summary.score);
        if self.recent_scores.len() == self.window {
            self.recent_scores.pop_front();
        }
        self.recent_scores.push_back(summary.score);
        Ok(())
    }
}

/// One JSONL record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpisodeRecord {
    #[serde(flatten)]
    pub summary: EpisodeSummary,
    /// Per-step monitor data, empty unless requested
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub trace: Vec<StepObservation>,
}

/// JSONL observer - Exports one JSON object per episode
pub struct JsonlObserver {
    writer: BufWriter<File>,
    include_steps: bool,
    current_steps: Vec<StepObservation>,
}

impl JsonlObserver {
    /// Create a new JSONL observer that writes episode summaries only
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::create(path)?;
        Ok(Self {
            writer: BufWriter::new(file),
            include_steps: false,
            current_steps: Vec::new(),
        })
    }

    /// Also record every step's monitor data (discrete state, Q-values, action, epsilon)
    pub fn with_steps(mut self, include_steps: bool) -> Self {
        self.include_steps = include_steps;
        self
    }
}

impl Observer for JsonlObserver {
    fn on_episode_start(&mut self, _episode: usize) -> Result<()> {
        self.current_steps.clear();
        Ok(())
    }

    fn on_step(&mut self, observation: &StepObservation) -> Result<()> {
        if self.include_steps {
            self.current_steps.push(observation.clone());
        }
        Ok(())
    }

    fn on_episode_end(&mut self, summary: &EpisodeSummary) -> Result<()> {
        let record = EpisodeRecord {
            summary: summary.clone(),
            trace: std::mem::take(&mut self.current_steps),
        };
        serde_json::to_writer(&mut self.writer, &record)?;
        writeln!(&mut self.writer)?;
        Ok(())
    }

    fn on_training_end(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

/// CSV observer - Exports one row per episode
pub struct CsvObserver {
    writer: csv::Writer<File>,
}

impl CsvObserver {
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Self {
            writer: csv::Writer::from_path(path)?,
        })
    }
}

impl Observer for CsvObserver {
    fn on_episode_end(&mut self, summary: &EpisodeSummary) -> Result<()> {
        self.writer.serialize(summary)?;
        Ok(())
    }

    fn on_training_end(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Action;

    fn summary(episode: usize, score: u32, total_reward: f64) -> EpisodeSummary {
        EpisodeSummary {
            episode,
            score,
            steps: 10,
            total_reward,
            epsilon: 0.5,
            terminated: true,
        }
    }

    fn step(action: Action) -> StepObservation {
        StepObservation {
            episode: 0,
            step: 0,
            discrete_state: None,
            q_values: None,
            action,
            epsilon: 1.0,
            reward: 0.1,
            done: false,
        }
    }

    #[test]
    fn test_metrics_moving_window() {
        let mut metrics = MetricsObserver::with_window(2);
        metrics.on_episode_end(&summary(0, 4, 10.0)).unwrap();
        metrics.on_episode_end(&summary(1, 0, -100.0)).unwrap();
        metrics.on_episode_end(&summary(2, 2, 0.0)).unwrap();

        let result = metrics.summary();
        assert_eq!(result.episodes, 3);
        assert_eq!(result.best_score, 4);
        assert_eq!(result.mean_score, 2.0);
        assert_eq!(result.moving_average_score, 1.0);
        assert_eq!(result.mean_reward, -30.0);
    }

    #[test]
    fn test_metrics_jump_rate() {
        let mut metrics = MetricsObserver::new();
        for action in [Action::Jump, Action::NoOp, Action::NoOp, Action::NoOp] {
            metrics.on_step(&step(action)).unwrap();
        }
        assert_eq!(metrics.summary().jump_rate, 0.25);
    }

    #[test]
    fn test_shared_observer_is_readable_after_boxing() {
        let shared = Arc::new(Mutex::new(MetricsObserver::new()));
        let mut boxed: Box<dyn Observer> = Box::new(shared.clone());
        boxed.on_episode_end(&summary(0, 3, 5.0)).unwrap();
        assert_eq!(shared.lock().unwrap().summary().best_score, 3);
    }

    #[test]
    fn test_jsonl_observer_writes_one_line_per_episode() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        let mut observer = JsonlObserver::new(tmp.path()).unwrap().with_steps(true);
        for episode in 0..2 {
            observer.on_episode_start(episode).unwrap();
            observer.on_step(&step(Action::Jump)).unwrap();
            observer.on_episode_end(&summary(episode, 1, 5.0)).unwrap();
        }
        observer.on_training_end().unwrap();

        let contents = std::fs::read_to_string(tmp.path()).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);
        let record: serde_json::Value = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(record["episode"], 1);
        assert_eq!(record["steps"], 10);
        assert_eq!(record["trace"].as_array().unwrap().len(), 1);
        assert_eq!(record["trace"][0]["action"], "jump");
    }

    #[test]
    fn test_csv_observer_writes_header_and_rows() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        let mut observer = CsvObserver::new(tmp.path()).unwrap();
        observer.on_episode_end(&summary(0, 2, 9.5)).unwrap();
        observer.on_training_end().unwrap();

        let contents = std::fs::read_to_string(tmp.path()).unwrap();
        let mut lines = contents.lines();
        assert_eq!(
            lines.next().unwrap(),
            "episode,score,steps,total_reward,epsilon,terminated"
        );
        assert_eq!(lines.next().unwrap(), "0,2,10,9.5,0.5,true");
    }
}
