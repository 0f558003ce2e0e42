//! Tabular Q-learning
//!
//! The agent observes a continuous state, files it under a bin triple, and
//! keeps one value per (bin triple, action) pair.
//!
//! ## Pieces
//!
//! | Module | Role |
//! |--------|------|
//! | [`discretizer`] | continuous state → `(y_idx, x_idx, vel_idx)` |
//! | [`q_table`] | dense value table and the Q-learning update |
//! | [`policy`] | ε-greedy selection with no-op-biased exploration |
//! | [`epsilon`] | per-episode multiplicative decay |
//! | [`agent`] | owns all of the above, implements [`crate::ports::Learner`] |
//!
//! ## Usage Example
//!
//! ```no_run
//! use flappy_q::{
//!     game::{FlappyEnv, GameConfig},
//!     q_learning::{AgentConfig, BinConfig, QLearningAgent},
//! };
//!
//! let game = GameConfig::default();
//! let mut env = FlappyEnv::new(game.clone())?.with_seed(1);
//! let mut agent = QLearningAgent::new(&AgentConfig::default(), &BinConfig::default(), &game)?
//!     .with_seed(0);
//!
//! let mut state = env.reset();
//! loop {
//!     let action = agent.choose_action(&state);
//!     let step = env.step(action)?;
//!     agent.update(&state, action, step.reward, &step.state, step.done);
//!     state = step.state;
//!     if step.done {
//!         break;
//!     }
//! }
//! agent.decay_epsilon();
//! # Ok::<(), flappy_q::Error>(())
//! ```

pub mod agent;
pub mod config;
pub mod discretizer;
pub mod epsilon;
pub mod policy;
pub mod q_table;

// Public re-exports
pub use agent::QLearningAgent;
pub use config::{AgentConfig, BinConfig, BinEdges};
pub use discretizer::{Discretizer, digitize};
pub use epsilon::EpsilonSchedule;
pub use policy::EpsilonGreedy;
pub use q_table::QTable;
