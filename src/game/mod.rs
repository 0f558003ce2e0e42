//! Side-scrolling game environment
//!
//! Physics, pipe generation, collision and reward, with no rendering. The
//! environment produces the transitions the learner consumes.

pub mod config;
pub mod engine;
pub mod geometry;
pub mod pipes;

pub use config::GameConfig;
pub use engine::{Collision, FlappyEnv, Phase, StepInfo, StepResult};
pub use geometry::Rect;
pub use pipes::{Pipe, PipeQueue};
