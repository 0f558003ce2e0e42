use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Physics, geometry and reward settings for the environment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Screen height; the floor sits at the bottom edge
    pub screen_height: f64,
    /// Width of the playfield; new pipes appear at this x
    pub spawn_x: f64,

    /// Fixed horizontal position of the body's left edge
    pub body_x: f64,
    pub body_width: f64,
    pub body_height: f64,

    pub gravity: f64,
    /// Velocity assigned on a jump (negative is upwards)
    pub jump_impulse: f64,

    pub pipe_width: f64,
    /// Pixels each pipe moves left per step
    pub pipe_speed: f64,
    /// Distance the rearmost pipe must travel from `spawn_x` before the next spawns
    pub pipe_spacing: f64,
    /// Vertical size of the opening between the upper and lower pipe
    pub gap_size: f64,
    /// Lowest gap top (inclusive)
    pub gap_min_y: f64,
    /// Highest gap top (exclusive); equal to `gap_min_y` pins the gap
    pub gap_max_y: f64,

    // Rewards
    pub survival_reward: f64,
    pub pass_reward: f64,
    pub fatal_reward: f64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            screen_height: 512.0,
            spawn_x: 288.0,
            body_x: 50.0,
            body_width: 34.0,
            body_height: 24.0,
            gravity: 1.0,
            jump_impulse: -9.0,
            pipe_width: 52.0,
            pipe_speed: 3.0,
            pipe_spacing: 180.0,
            gap_size: 150.0,
            gap_min_y: 100.0,
            gap_max_y: 312.0,
            survival_reward: 0.1,
            pass_reward: 5.0,
            fatal_reward: -100.0,
        }
    }
}

impl GameConfig {
    /// Pin every pipe's gap to the same height
    pub fn with_fixed_gap(mut self, gap_top_y: f64) -> Self {
        self.gap_min_y = gap_top_y;
        self.gap_max_y = gap_top_y;
        self
    }

    /// Lowest body position that is still in bounds
    pub fn floor_line(&self) -> f64 {
        self.screen_height - self.body_height
    }

    /// Starting height, mid-screen rounded down to a whole pixel
    pub fn start_y(&self) -> f64 {
        (self.screen_height / 2.0).floor()
    }

    pub fn validate(&self) -> Result<()> {
        let named = [
            ("screen_height", self.screen_height),
            ("spawn_x", self.spawn_x),
            ("body_x", self.body_x),
            ("body_width", self.body_width),
            ("body_height", self.body_height),
            ("gravity", self.gravity),
            ("jump_impulse", self.jump_impulse),
            ("pipe_width", self.pipe_width),
            ("pipe_speed", self.pipe_speed),
            ("pipe_spacing", self.pipe_spacing),
            ("gap_size", self.gap_size),
            ("gap_min_y", self.gap_min_y),
            ("gap_max_y", self.gap_max_y),
            ("survival_reward", self.survival_reward),
            ("pass_reward", self.pass_reward),
            ("fatal_reward", self.fatal_reward),
        ];
        if let Some((name, value)) = named.iter().find(|(_, v)| !v.is_finite()) {
            return Err(Error::config(format!("{name} must be finite, got {value}")));
        }

        if self.screen_height <= self.body_height {
            return Err(Error::config("screen_height must exceed body_height"));
        }
        if self.body_width <= 0.0 || self.body_height <= 0.0 || self.pipe_width <= 0.0 {
            return Err(Error::config("body and pipe dimensions must be positive"));
        }
        if self.pipe_speed <= 0.0 {
            return Err(Error::config("pipe_speed must be positive"));
        }
        if self.gap_max_y < self.gap_min_y {
            return Err(Error::config(format!(
                "gap_max_y ({}) must not be below gap_min_y ({})",
                self.gap_max_y, self.gap_min_y
            )));
        }
        // A lone pipe must trigger its successor before it can be retired,
        // otherwise the queue would run dry.
        if self.pipe_spacing >= self.spawn_x + self.pipe_width {
            return Err(Error::config(format!(
                "pipe_spacing ({}) must be below spawn_x + pipe_width ({})",
                self.pipe_spacing,
                self.spawn_x + self.pipe_width
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GameConfig::default();
        assert_eq!(config.floor_line(), 488.0);
        assert_eq!(config.start_y(), 256.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_fixed_gap() {
        let config = GameConfig::default().with_fixed_gap(200.0);
        assert_eq!(config.gap_min_y, 200.0);
        assert_eq!(config.gap_max_y, 200.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_inverted_gap_range_rejected() {
        let config = GameConfig {
            gap_min_y: 300.0,
            gap_max_y: 100.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_spacing_that_would_empty_queue_rejected() {
        let config = GameConfig {
            pipe_spacing: 400.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_serialized_fields_all_drive_the_game() {
        let json = serde_json::to_value(GameConfig::default()).unwrap();
        let keys: Vec<&str> = json.as_object().unwrap().keys().map(String::as_str).collect();
        assert!(!keys.contains(&"screen_width"));
        assert!(keys.contains(&"spawn_x"));
        assert!(keys.contains(&"screen_height"));
    }

    #[test]
    fn test_legacy_screen_width_is_ignored() {
        let config: GameConfig = serde_json::from_str(r#"{ "screen_width": 500.0 }"#).unwrap();
        assert_eq!(config, GameConfig::default());
    }
}
