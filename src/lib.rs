//! Tabular Q-learning for a side-scrolling jump game
//!
//! This crate provides:
//! - A deterministic-physics jump game with scrolling pipe obstacles
//! - A discretizer from continuous observations to table indices
//! - A Q-value table with the one-step Q-learning update
//! - Epsilon-greedy action selection with a multiplicative decay schedule
//! - A training pipeline with observers for progress, metrics and exports

pub mod cli;
pub mod config;
pub mod error;
pub mod game;
pub mod pipeline;
pub mod ports;
pub mod q_learning;
pub mod types;

pub use config::FlappyConfig;
pub use error::{Error, Result};
pub use types::{Action, ContinuousState, DiscreteState, NUM_ACTIONS};
