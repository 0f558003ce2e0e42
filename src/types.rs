//! Core value types shared by the environment and the learner.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Number of actions available to the agent.
pub const NUM_ACTIONS: usize = 2;

/// The binary control input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Let gravity act
    NoOp = 0,
    /// Overwrite velocity with the jump impulse
    Jump = 1,
}

impl Action {
    pub const ALL: [Action; NUM_ACTIONS] = [Action::NoOp, Action::Jump];

    /// Index of this action in a value-table row
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(value: usize) -> Result<Self> {
        match value {
            0 => Ok(Action::NoOp),
            1 => Ok(Action::Jump),
            _ => Err(Error::InvalidAction { value }),
        }
    }
}

impl TryFrom<usize> for Action {
    type Error = Error;

    fn try_from(value: usize) -> Result<Self> {
        Action::from_index(value)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::NoOp => write!(f, "no-op"),
            Action::Jump => write!(f, "jump"),
        }
    }
}

/// Continuous observation produced by the environment after every step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContinuousState {
    /// Top edge of the body, growing downwards
    pub position_y: f64,
    /// Vertical velocity (negative is upwards)
    pub velocity: f64,
    /// Top edge of the upcoming pipe's gap
    pub gap_top_y: f64,
    /// Left edge of the upcoming pipe
    pub obstacle_x: f64,
}

impl ContinuousState {
    pub fn new(position_y: f64, velocity: f64, gap_top_y: f64, obstacle_x: f64) -> Self {
        Self {
            position_y,
            velocity,
            gap_top_y,
            obstacle_x,
        }
    }
}

/// Bin indices for the vertical offset, horizontal offset and velocity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DiscreteState {
    pub y_idx: usize,
    pub x_idx: usize,
    pub vel_idx: usize,
}

impl DiscreteState {
    pub fn new(y_idx: usize, x_idx: usize, vel_idx: usize) -> Self {
        Self {
            y_idx,
            x_idx,
            vel_idx,
        }
    }
}

impl fmt::Display for DiscreteState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.y_idx, self.x_idx, self.vel_idx)
    }
}
