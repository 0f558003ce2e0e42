//! Dense Q-table over discretized states

use crate::types::{Action, DiscreteState, NUM_ACTIONS};

/// Q-table mapping (discrete state, action) pairs to Q-values
///
/// Stored as one flat array; [`QTable::offset`] maps
/// `(y_idx, x_idx, vel_idx, action)` to a position in it. Every entry starts
/// at 0.0 and the shape never changes.
#[derive(Debug, Clone)]
pub struct QTable {
    /// Q-values in row-major (y, x, velocity, action) order
    q_values: Vec<f64>,
    /// Bins on the (y, x, velocity) axes
    dims: [usize; 3],
    /// Learning rate α
    learning_rate: f64,
    /// Discount factor γ
    discount_factor: f64,
}

impl QTable {
    /// Create a zero-filled Q-table
    pub fn new(dims: [usize; 3], learning_rate: f64, discount_factor: f64) -> Self {
        let len = dims.iter().product::<usize>() * NUM_ACTIONS;
        Self {
            q_values: vec![0.0; len],
            dims,
            learning_rate,
            discount_factor,
        }
    }

    pub fn dims(&self) -> [usize; 3] {
        self.dims
    }

    /// Flat position of a (state, action) entry.
    ///
    /// # Panics
    ///
    /// Panics if an index is outside the table's shape.
    pub fn offset(&self, state: &DiscreteState, action: Action) -> usize {
        let [ny, nx, nv] = self.dims;
        assert!(
            state.y_idx < ny && state.x_idx < nx && state.vel_idx < nv,
            "state {state} outside table shape {:?}",
            self.dims
        );
        ((state.y_idx * nx + state.x_idx) * nv + state.vel_idx) * NUM_ACTIONS + action.index()
    }

    /// Get Q-value for a state-action pair
    pub fn get(&self, state: &DiscreteState, action: Action) -> f64 {
        self.q_values[self.offset(state, action)]
    }

    /// Set Q-value for a state-action pair
    pub fn set(&mut self, state: &DiscreteState, action: Action, value: f64) {
        let offset = self.offset(state, action);
        self.q_values[offset] = value;
    }

    /// Q-values of every action in a state, indexed by [`Action::index`]
    pub fn row(&self, state: &DiscreteState) -> [f64; NUM_ACTIONS] {
        let start = self.offset(state, Action::NoOp);
        let mut row = [0.0; NUM_ACTIONS];
        row.copy_from_slice(&self.q_values[start..start + NUM_ACTIONS]);
        row
    }

    /// Get maximum Q-value in a state
    pub fn max_q(&self, state: &DiscreteState) -> f64 {
        self.row(state).into_iter().fold(f64::NEG_INFINITY, f64::max)
    }

    /// Select greedy action (highest Q-value); ties go to the lowest index
    pub fn greedy_action(&self, state: &DiscreteState) -> Action {
        let row = self.row(state);
        let mut best = Action::NoOp;
        for action in Action::ALL {
            if row[action.index()] > row[best.index()] {
                best = action;
            }
        }
        best
    }

    /// Q-learning update: off-policy TD control
    ///
    /// Q(s,a) ← (1-α)·Q(s,a) + α·target, where target is `r` on a terminal
    /// transition and `r + γ max_a' Q(s',a')` otherwise.
    pub fn q_learning_update(
        &mut self,
        state: &DiscreteState,
        action: Action,
        reward: f64,
        next_state: &DiscreteState,
        done: bool,
    ) {
        let target = if done {
            reward
        } else {
            reward + self.discount_factor * self.max_q(next_state)
        };
        let current_q = self.get(state, action);
        let new_q = (1.0 - self.learning_rate) * current_q + self.learning_rate * target;
        self.set(state, action, new_q);
    }

    /// Total number of entries
    pub fn size(&self) -> usize {
        self.q_values.len()
    }

    /// Number of entries that have moved away from zero
    pub fn nonzero_entries(&self) -> usize {
        self.q_values.iter().filter(|&&q| q != 0.0).count()
    }
}
