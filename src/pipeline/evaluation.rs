//! Greedy evaluation of a trained learner

use crate::{
    Result,
    game::FlappyEnv,
    ports::Learner,
    types::{Action, ContinuousState, DiscreteState, NUM_ACTIONS},
};

use super::training::{TrainingConfig, TrainingPipeline, TrainingResult};

/// Learner wrapper that plays greedily and never learns
///
/// Exploration is switched off, updates are dropped and epsilon is not
/// decayed, so the wrapped table is exactly as training left it.
///
/// ```no_run
/// use flappy_q::pipeline::{FrozenLearner, TrainingConfig, TrainingPipeline};
/// # use flappy_q::{game::{FlappyEnv, GameConfig}, q_learning::*};
/// # let game = GameConfig::default();
/// # let mut agent = QLearningAgent::new(&AgentConfig::default(), &BinConfig::default(), &game)?;
/// # let mut env = FlappyEnv::new(game)?;
/// let mut frozen = FrozenLearner::new(&mut agent);
/// TrainingPipeline::new(TrainingConfig::default()).run(&mut frozen, &mut env)?;
/// # Ok::<(), flappy_q::Error>(())
/// ```
pub struct FrozenLearner<'a> {
    inner: &'a mut dyn Learner,
}

impl<'a> FrozenLearner<'a> {
    /// Create a new frozen learner wrapping the given learner
    pub fn new(inner: &'a mut dyn Learner) -> Self {
        Self { inner }
    }
}

impl Learner for FrozenLearner<'_> {
    fn choose_action(&mut self, state: &ContinuousState) -> Action {
        self.inner.greedy_action(state)
    }

    fn greedy_action(&mut self, state: &ContinuousState) -> Action {
        self.inner.greedy_action(state)
    }

    fn name(&self) -> &str {
        self.inner.name()
    }

    fn discretize(&self, state: &ContinuousState) -> Option<DiscreteState> {
        self.inner.discretize(state)
    }

    fn q_values(&self, state: &ContinuousState) -> Option<[f64; NUM_ACTIONS]> {
        self.inner.q_values(state)
    }

    fn set_rng_seed(&mut self, seed: u64) -> Result<()> {
        self.inner.set_rng_seed(seed)
    }
}

/// Play `episodes` greedy episodes without touching the learner's table
pub fn evaluate(
    agent: &mut dyn Learner,
    env: &mut FlappyEnv,
    episodes: usize,
    max_steps_per_episode: Option<usize>,
) -> Result<TrainingResult> {
    let config = TrainingConfig {
        num_episodes: episodes,
        seed: None,
        max_steps_per_episode,
    };
    let mut frozen = FrozenLearner::new(agent);
    TrainingPipeline::new(config).run(&mut frozen, env)
}
