//! ε-greedy action selection

use rand::Rng;

use super::q_table::QTable;
use crate::types::{Action, DiscreteState};

/// ε-greedy policy whose exploratory draws favour no-op
///
/// A uniform random action would jump half the time and fly the body into
/// the ceiling, so exploration picks no-op with `noop_probability`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EpsilonGreedy {
    noop_probability: f64,
}

impl EpsilonGreedy {
    pub fn new(noop_probability: f64) -> Self {
        Self { noop_probability }
    }

    pub fn noop_probability(&self) -> f64 {
        self.noop_probability
    }

    /// Exploratory draw: one comparison against the no-op weight
    pub fn explore<R: Rng + ?Sized>(&self, rng: &mut R) -> Action {
        if rng.random::<f64>() < self.noop_probability {
            Action::NoOp
        } else {
            Action::Jump
        }
    }

    /// Explore with probability `epsilon`, otherwise act greedily on `table`
    pub fn select<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        epsilon: f64,
        table: &QTable,
        state: &DiscreteState,
    ) -> Action {
        if rng.random::<f64>() < epsilon {
            self.explore(rng)
        } else {
            table.greedy_action(state)
        }
    }
}
