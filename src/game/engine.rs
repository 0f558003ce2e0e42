use std::fmt;

use rand::{Rng, SeedableRng, rngs::StdRng};
use serde::{Deserialize, Serialize};

use super::{
    config::GameConfig,
    geometry::Rect,
    pipes::{Pipe, PipeQueue},
};
use crate::{
    error::{Error, Result},
    types::{Action, ContinuousState},
};

/// Lifecycle of the environment between resets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Constructed, never reset
    Ready,
    Running,
    /// A fatal step happened; `reset` starts the next episode
    Done,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Ready => write!(f, "ready"),
            Phase::Running => write!(f, "running"),
            Phase::Done => write!(f, "done"),
        }
    }
}

/// What ended the episode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Collision {
    /// Body went above the top of the screen
    Ceiling,
    /// Body dropped below the floor line
    Floor,
    Pipe,
}

/// Side information about a step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepInfo {
    /// A pipe scrolled off the left edge this step
    pub passed_pipe: bool,
    pub collision: Option<Collision>,
}

/// Transition returned by [`FlappyEnv::step`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepResult {
    pub state: ContinuousState,
    pub reward: f64,
    pub done: bool,
    pub info: StepInfo,
}

fn build_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_rng(&mut rand::rng()),
    }
}

/// Side-scrolling environment: a body under gravity and a stream of pipes
#[derive(Debug, Clone)]
pub struct FlappyEnv {
    config: GameConfig,
    body_y: f64,
    velocity: f64,
    pipes: PipeQueue,
    score: u32,
    phase: Phase,
    rng: StdRng,
}

impl FlappyEnv {
    pub fn new(config: GameConfig) -> Result<Self> {
        config.validate()?;
        let start_y = config.start_y();
        let first = Pipe::new(config.spawn_x, config.gap_min_y);
        Ok(Self {
            config,
            body_y: start_y,
            velocity: 0.0,
            pipes: PipeQueue::new(first),
            score: 0,
            phase: Phase::Ready,
            rng: build_rng(None),
        })
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn set_rng_seed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Pipes passed in the current episode
    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn body_y(&self) -> f64 {
        self.body_y
    }

    pub fn velocity(&self) -> f64 {
        self.velocity
    }

    pub fn pipes(&self) -> &PipeQueue {
        &self.pipes
    }

    /// Start a new episode and return its first observation
    pub fn reset(&mut self) -> ContinuousState {
        self.body_y = self.config.start_y();
        self.velocity = 0.0;
        let first = self.spawn_pipe();
        self.pipes = PipeQueue::new(first);
        self.score = 0;
        self.phase = Phase::Running;
        self.observe()
    }

    /// Advance one frame.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EpisodeNotRunning`] before the first `reset` and after
    /// a terminal step.
    pub fn step(&mut self, action: Action) -> Result<StepResult> {
        if self.phase != Phase::Running {
            return Err(Error::EpisodeNotRunning {
                phase: self.phase.to_string(),
            });
        }

        if action == Action::Jump {
            self.velocity = self.config.jump_impulse;
        }
        self.velocity += self.config.gravity;
        self.body_y += self.velocity;

        self.pipes.scroll(self.config.pipe_speed);

        if self.pipes.back().x < self.config.spawn_x - self.config.pipe_spacing {
            let pipe = self.spawn_pipe();
            self.pipes.push(pipe);
        }

        let passed_pipe = self.pipes.retire_passed(self.config.pipe_width).is_some();
        if passed_pipe {
            self.score += 1;
        }

        let collision = self.check_collision();
        let (reward, done) = match collision {
            Some(_) => (self.config.fatal_reward, true),
            None if passed_pipe => (self.config.pass_reward, false),
            None => (self.config.survival_reward, false),
        };
        if done {
            self.phase = Phase::Done;
        }

        Ok(StepResult {
            state: self.observe(),
            reward,
            done,
            info: StepInfo {
                passed_pipe,
                collision,
            },
        })
    }

    pub fn body_rect(&self) -> Rect {
        Rect::new(
            self.config.body_x,
            self.body_y,
            self.config.body_width,
            self.config.body_height,
        )
    }

    /// Bounds first, then every pipe.
    ///
    /// The body is in bounds while `0 <= y <= floor_line`; resting exactly on
    /// the floor line is still alive.
    fn check_collision(&self) -> Option<Collision> {
        if self.body_y > self.config.floor_line() {
            return Some(Collision::Floor);
        }
        if self.body_y < 0.0 {
            return Some(Collision::Ceiling);
        }

        let body = self.body_rect();
        self.pipes
            .iter()
            .any(|pipe| pipe.collides_with(&body, &self.config))
            .then_some(Collision::Pipe)
    }

    fn observe(&self) -> ContinuousState {
        let pipe = self
            .pipes
            .upcoming(self.config.body_x, self.config.pipe_width);
        ContinuousState::new(self.body_y, self.velocity, pipe.gap_top_y, pipe.x)
    }

    fn spawn_pipe(&mut self) -> Pipe {
        let (lo, hi) = (self.config.gap_min_y, self.config.gap_max_y);
        let gap_top_y = if hi > lo {
            self.rng.random_range(lo..hi)
        } else {
            lo
        };
        Pipe::new(self.config.spawn_x, gap_top_y)
    }
}
