//! Top-level configuration document
//!
//! One JSON file covers the game, the agent and the discretization. Every
//! section and field has a default, so a file only needs to name what it
//! changes:
//!
//! ```json
//! { "game": { "gravity": 0.8 }, "agent": { "learning_rate": 0.2 } }
//! ```

use std::{fs::File, io::BufReader, path::Path};

use serde::{Deserialize, Serialize};

use crate::{
    error::{Error, Result},
    game::GameConfig,
    q_learning::{AgentConfig, BinConfig},
};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlappyConfig {
    pub game: GameConfig,
    pub agent: AgentConfig,
    pub bins: BinConfig,
}

impl FlappyConfig {
    /// Read and validate a JSON config file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| Error::Io {
            operation: format!("open config {}", path.display()),
            source,
        })?;
        let config: Self = serde_json::from_reader(BufReader::new(file))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.game.validate()?;
        self.agent.validate()?;
        self.bins.validate()?;
        Ok(())
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
