//! Learner port - abstraction over step-wise learning agents
//!
//! The training pipeline drives any agent through this trait: one
//! `choose_action` and one `update` per environment step, one `end_episode`
//! per finished episode.

use crate::{
    Result,
    types::{Action, ContinuousState, DiscreteState, NUM_ACTIONS},
};

/// Learner trait - the interface the training loop talks to
///
/// # Examples
///
/// ```no_run
/// use flappy_q::{
///     ports::Learner,
///     types::{Action, ContinuousState},
/// };
///
/// struct AlwaysGlide;
///
/// impl Learner for AlwaysGlide {
///     fn choose_action(&mut self, _state: &ContinuousState) -> Action {
///         Action::NoOp
///     }
///
///     fn name(&self) -> &str {
///         "glide"
///     }
/// }
/// ```
pub trait Learner: Send {
    /// Pick an action for the current observation.
    ///
    /// May consume randomness (exploration).
    fn choose_action(&mut self, state: &ContinuousState) -> Action;

    /// Action the learner would take with exploration switched off.
    ///
    /// # Default Implementation
    ///
    /// Falls back to [`Learner::choose_action`].
    fn greedy_action(&mut self, state: &ContinuousState) -> Action {
        self.choose_action(state)
    }

    /// Learn from one transition.
    ///
    /// # Default Implementation
    ///
    /// Does nothing, suitable for fixed policies.
    fn update(
        &mut self,
        _state: &ContinuousState,
        _action: Action,
        _reward: f64,
        _next_state: &ContinuousState,
        _done: bool,
    ) {
    }

    /// Called once after every finished episode.
    ///
    /// # Default Implementation
    ///
    /// Does nothing.
    fn end_episode(&mut self) {}

    /// Get the learner's name.
    fn name(&self) -> &str;

    /// Current exploration rate, 0 for learners that never explore
    fn epsilon(&self) -> f64 {
        0.0
    }

    /// Bin indices the learner files this observation under, if it discretizes
    fn discretize(&self, _state: &ContinuousState) -> Option<DiscreteState> {
        None
    }

    /// Action values for this observation, if the learner keeps any
    fn q_values(&self, _state: &ContinuousState) -> Option<[f64; NUM_ACTIONS]> {
        None
    }

    /// Seed the learner's internal random number generator.
    ///
    /// # Default Implementation
    ///
    /// Does nothing and returns `Ok(())`.
    fn set_rng_seed(&mut self, _seed: u64) -> Result<()> {
        Ok(())
    }
}
