//! Training pipeline: the reset → (choose, step, update)* → decay loop

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{
    Result,
    game::FlappyEnv,
    ports::{EpisodeSummary, Learner, Observer, StepObservation},
};

/// Training configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingConfig {
    /// Number of training episodes
    pub num_episodes: usize,

    /// Random seed; the agent gets `seed`, the environment `seed + 1`
    pub seed: Option<u64>,

    /// Cut an episode after this many steps (no terminal update is applied)
    pub max_steps_per_episode: Option<usize>,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            num_episodes: 20_000,
            seed: None,
            max_steps_per_episode: None,
        }
    }
}

/// Result of a training run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingResult {
    pub total_episodes: usize,
    pub total_steps: usize,
    /// Episodes cut short by the step cap
    pub truncated_episodes: usize,
    pub best_score: u32,
    pub mean_score: f64,
    pub mean_reward: f64,
    pub final_epsilon: f64,
}

impl TrainingResult {
    /// Fold episode summaries into totals
    pub fn from_episodes(episodes: &[EpisodeSummary], final_epsilon: f64) -> Self {
        let total_episodes = episodes.len();
        let mean = |total: f64| {
            if total_episodes > 0 {
                total / total_episodes as f64
            } else {
                0.0
            }
        };
        Self {
            total_episodes,
            total_steps: episodes.iter().map(|e| e.steps).sum(),
            truncated_episodes: episodes.iter().filter(|e| !e.terminated).count(),
            best_score: episodes.iter().map(|e| e.score).max().unwrap_or(0),
            mean_score: mean(episodes.iter().map(|e| e.score as f64).sum()),
            mean_reward: mean(episodes.iter().map(|e| e.total_reward).sum()),
            final_epsilon,
        }
    }
}

/// Training pipeline for a single learner in one environment
pub struct TrainingPipeline {
    config: TrainingConfig,
    observers: Vec<Box<dyn Observer>>,
}

impl TrainingPipeline {
    /// Create a new training pipeline
    pub fn new(config: TrainingConfig) -> Self {
        Self {
            config,
            observers: Vec::new(),
        }
    }

    /// Add an observer to the pipeline
    pub fn with_observer(mut self, observer: Box<dyn Observer>) -> Self {
        self.observers.push(observer);
        self
    }

    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    /// Run `num_episodes` episodes, learning after every step
    pub fn run(&mut self, agent: &mut dyn Learner, env: &mut FlappyEnv) -> Result<TrainingResult> {
        if let Some(seed) = self.config.seed {
            agent.set_rng_seed(seed)?;
            env.set_rng_seed(seed.wrapping_add(1));
        }

        for observer in &mut self.observers {
            observer.on_training_start(self.config.num_episodes)?;
        }

        let mut episodes = Vec::with_capacity(self.config.num_episodes);
        for episode in 0..self.config.num_episodes {
            let summary = self.run_episode(episode, agent, env)?;
            debug!(
                episode = summary.episode + 1,
                score = summary.score,
                steps = summary.steps,
                total_reward = summary.total_reward,
                epsilon = summary.epsilon,
                "episode finished"
            );
            for observer in &mut self.observers {
                observer.on_episode_end(&summary)?;
            }
            episodes.push(summary);
        }

        for observer in &mut self.observers {
            observer.on_training_end()?;
        }

        Ok(TrainingResult::from_episodes(&episodes, agent.epsilon()))
    }

    fn run_episode(
        &mut self,
        episode: usize,
        agent: &mut dyn Learner,
        env: &mut FlappyEnv,
    ) -> Result<EpisodeSummary> {
        for observer in &mut self.observers {
            observer.on_episode_start(episode)?;
        }

        let mut state = env.reset();
        let mut total_reward = 0.0;
        let mut steps = 0;
        let mut terminated = false;

        loop {
            if self
                .config
                .max_steps_per_episode
                .is_some_and(|cap| steps >= cap)
            {
                warn!(episode = episode + 1, steps, "episode cut at step cap");
                break;
            }

            // Monitor data reflects the table before this step's update
            let discrete_state = agent.discretize(&state);
            let q_values = agent.q_values(&state);
            let epsilon = agent.epsilon();

            let action = agent.choose_action(&state);
            let step = env.step(action)?;
            agent.update(&state, action, step.reward, &step.state, step.done);

            total_reward += step.reward;
            let observation = StepObservation {
                episode,
                step: steps,
                discrete_state,
                q_values,
                action,
                epsilon,
                reward: step.reward,
                done: step.done,
            };
            for observer in &mut self.observers {
                observer.on_step(&observation)?;
            }
            steps += 1;
            state = step.state;

            if step.done {
                terminated = true;
                break;
            }
        }

        agent.end_episode();

        Ok(EpisodeSummary {
            episode,
            score: env.score(),
            steps,
            total_reward,
            epsilon: agent.epsilon(),
            terminated,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        game::GameConfig,
        types::{Action, ContinuousState},
    };

    struct Glide;

    impl Learner for Glide {
        fn choose_action(&mut self, _state: &ContinuousState) -> Action {
            Action::NoOp
        }

        fn name(&self) -> &str {
            "glide"
        }
    }

    #[test]
    fn test_training_pipeline() {
        let config = TrainingConfig {
            num_episodes: 10,
            seed: Some(42),
            max_steps_per_episode: None,
        };
        let mut pipeline = TrainingPipeline::new(config);
        let mut env = FlappyEnv::new(GameConfig::default()).unwrap();

        let result = pipeline.run(&mut Glide, &mut env).unwrap();

        // a gliding body falls 256 -> 509 in 22 frames
        assert_eq!(result.total_episodes, 10);
        assert_eq!(result.total_steps, 220);
        assert_eq!(result.best_score, 0);
        assert_eq!(result.truncated_episodes, 0);
        assert!((result.mean_reward - (21.0 * 0.1 - 100.0)).abs() < 1e-9);
    }

    #[test]
    fn test_step_cap_truncates() {
        let config = TrainingConfig {
            num_episodes: 3,
            seed: Some(1),
            max_steps_per_episode: Some(5),
        };
        let mut pipeline = TrainingPipeline::new(config);
        let mut env = FlappyEnv::new(GameConfig::default()).unwrap();

        let result = pipeline.run(&mut Glide, &mut env).unwrap();
        assert_eq!(result.total_steps, 15);
        assert_eq!(result.truncated_episodes, 3);
    }

    #[test]
    fn test_result_from_no_episodes() {
        let result = TrainingResult::from_episodes(&[], 1.0);
        assert_eq!(result.total_episodes, 0);
        assert_eq!(result.mean_score, 0.0);
        assert_eq!(result.final_epsilon, 1.0);
    }
}
