//! Observer port - abstraction for training observation and data collection
//!
//! This port defines the interface for observing training events,
//! allowing composable data collection without coupling the training
//! loop to specific output formats or metrics.

use serde::{Deserialize, Serialize};

use crate::{
    Result,
    types::{Action, DiscreteState, NUM_ACTIONS},
};

/// What the agent saw and did on one step
///
/// `discrete_state`, `q_values` and `epsilon` are captured before the action
/// is taken and before the update for this step is applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepObservation {
    pub episode: usize,
    pub step: usize,
    pub discrete_state: Option<DiscreteState>,
    pub q_values: Option<[f64; NUM_ACTIONS]>,
    pub action: Action,
    pub epsilon: f64,
    pub reward: f64,
    pub done: bool,
}

/// Outcome of one episode
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpisodeSummary {
    pub episode: usize,
    /// Pipes passed
    pub score: u32,
    pub steps: usize,
    pub total_reward: f64,
    /// Exploration rate after this episode's decay
    pub epsilon: f64,
    /// False when the step cap cut the episode short
    pub terminated: bool,
}

/// Observer trait for monitoring training
///
/// # Event Sequence
///
/// 1. `on_training_start(total_episodes)` - Once at the beginning
/// 2. For each episode:
///    - `on_episode_start(episode)`
///    - `on_step(...)` - For each environment step
///    - `on_episode_end(summary)`
/// 3. `on_training_end()` - Once at the end
///
/// # Examples
///
/// ```no_run
/// use flappy_q::ports::{EpisodeSummary, Observer};
///
/// struct BestScore {
///     best: u32,
/// }
///
/// impl Observer for BestScore {
///     fn on_episode_end(&mut self, summary: &EpisodeSummary) -> flappy_q::Result<()> {
///         self.best = self.best.max(summary.score);
///         Ok(())
///     }
/// }
/// ```
pub trait Observer: Send {
    /// Called when training starts.
    ///
    /// # Default Implementation
    ///
    /// Does nothing.
    fn on_training_start(&mut self, _total_episodes: usize) -> Result<()> {
        Ok(())
    }

    /// Called when an episode starts.
    fn on_episode_start(&mut self, _episode: usize) -> Result<()> {
        Ok(())
    }

    /// Called after every environment step, before the next action is chosen.
    fn on_step(&mut self, _observation: &StepObservation) -> Result<()> {
        Ok(())
    }

    /// Called once the episode has ended and epsilon has decayed.
    fn on_episode_end(&mut self, _summary: &EpisodeSummary) -> Result<()> {
        Ok(())
    }

    /// Called when training completes.
    ///
    /// Use this to finalize outputs, close files, or display summaries.
    fn on_training_end(&mut self) -> Result<()> {
        Ok(())
    }
}
