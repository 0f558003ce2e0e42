//! Q-learning agent
//!
//! Ties the discretizer, the Q-table, the ε-greedy policy and the epsilon
//! schedule together behind the [`Learner`] port. The agent is the single
//! owner of its table.

use rand::{SeedableRng, rngs::StdRng};
use tracing::trace;

use super::{
    config::{AgentConfig, BinConfig},
    discretizer::Discretizer,
    epsilon::EpsilonSchedule,
    policy::EpsilonGreedy,
    q_table::QTable,
};
use crate::{
    error::Result,
    game::GameConfig,
    ports::Learner,
    types::{Action, ContinuousState, DiscreteState, NUM_ACTIONS},
};

fn build_rng(seed: Option<u64>) -> StdRng {
    if let Some(seed) = seed {
        StdRng::seed_from_u64(seed)
    } else {
        StdRng::from_rng(&mut rand::rng())
    }
}

/// Q-learning agent (off-policy TD control)
///
/// Learns Q* by always updating toward the maximum next-state value,
/// regardless of the action actually taken next.
#[derive(Debug, Clone)]
pub struct QLearningAgent {
    discretizer: Discretizer,
    q_table: QTable,
    policy: EpsilonGreedy,
    schedule: EpsilonSchedule,
    rng: StdRng,
    rng_seed: Option<u64>,
}

impl QLearningAgent {
    /// Create a new Q-learning agent
    ///
    /// The game config supplies the gap size and body position the
    /// discretizer measures offsets against.
    ///
    /// # Errors
    ///
    /// Fails on out-of-range hyperparameters or invalid bin edges.
    pub fn new(agent: &AgentConfig, bins: &BinConfig, game: &GameConfig) -> Result<Self> {
        agent.validate()?;
        let discretizer = Discretizer::new(bins, game.gap_size, game.body_x)?;
        let q_table = QTable::new(
            discretizer.dims(),
            agent.learning_rate,
            agent.discount_factor,
        );
        Ok(Self {
            discretizer,
            q_table,
            policy: EpsilonGreedy::new(agent.explore_noop_probability),
            schedule: EpsilonSchedule::new(
                agent.epsilon_start,
                agent.epsilon_min,
                agent.epsilon_decay,
            ),
            rng: build_rng(None),
            rng_seed: None,
        })
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self.rng_seed = Some(seed);
        self
    }

    pub fn rng_seed(&self) -> Option<u64> {
        self.rng_seed
    }

    pub fn q_table(&self) -> &QTable {
        &self.q_table
    }

    pub fn q_table_mut(&mut self) -> &mut QTable {
        &mut self.q_table
    }

    pub fn discretizer(&self) -> &Discretizer {
        &self.discretizer
    }

    pub fn epsilon(&self) -> f64 {
        self.schedule.value()
    }

    /// ε-greedy action selection
    pub fn choose_action(&mut self, state: &ContinuousState) -> Action {
        let discrete = self.discretizer.discretize(state);
        self.policy
            .select(&mut self.rng, self.schedule.value(), &self.q_table, &discrete)
    }

    /// Q-learning update for one transition
    pub fn update(
        &mut self,
        state: &ContinuousState,
        action: Action,
        reward: f64,
        next_state: &ContinuousState,
        done: bool,
    ) {
        let discrete = self.discretizer.discretize(state);
        let next_discrete = self.discretizer.discretize(next_state);
        self.q_table
            .q_learning_update(&discrete, action, reward, &next_discrete, done);
        trace!(
            state = %discrete,
            action = %action,
            reward,
            done,
            q = self.q_table.get(&discrete, action),
            "q update"
        );
    }

    /// Decay epsilon after an episode
    pub fn decay_epsilon(&mut self) {
        self.schedule.decay();
    }
}

impl Learner for QLearningAgent {
    fn choose_action(&mut self, state: &ContinuousState) -> Action {
        QLearningAgent::choose_action(self, state)
    }

    fn greedy_action(&mut self, state: &ContinuousState) -> Action {
        let discrete = self.discretizer.discretize(state);
        self.q_table.greedy_action(&discrete)
    }

    fn update(
        &mut self,
        state: &ContinuousState,
        action: Action,
        reward: f64,
        next_state: &ContinuousState,
        done: bool,
    ) {
        QLearningAgent::update(self, state, action, reward, next_state, done);
    }

    fn end_episode(&mut self) {
        self.decay_epsilon();
    }

    fn name(&self) -> &str {
        "Q-Learning"
    }

    fn epsilon(&self) -> f64 {
        self.schedule.value()
    }

    fn discretize(&self, state: &ContinuousState) -> Option<DiscreteState> {
        Some(self.discretizer.discretize(state))
    }

    fn q_values(&self, state: &ContinuousState) -> Option<[f64; NUM_ACTIONS]> {
        Some(self.q_table.row(&self.discretizer.discretize(state)))
    }

    fn set_rng_seed(&mut self, seed: u64) -> Result<()> {
        self.rng = StdRng::seed_from_u64(seed);
        self.rng_seed = Some(seed);
        Ok(())
    }
}
