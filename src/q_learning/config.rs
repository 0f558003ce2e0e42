//! Hyperparameters and discretization settings for the Q-learning agent.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Learning and exploration hyperparameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// α in `Q ← (1-α)Q + α·target`
    pub learning_rate: f64,
    /// γ applied to the best next-state value
    pub discount_factor: f64,
    pub epsilon_start: f64,
    /// Floor below which epsilon no longer decays
    pub epsilon_min: f64,
    /// Multiplicative decay applied once per episode
    pub epsilon_decay: f64,
    /// Probability that an exploratory draw picks no-op instead of jump
    pub explore_noop_probability: f64,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            learning_rate: 0.1,
            discount_factor: 0.99,
            epsilon_start: 1.0,
            epsilon_min: 0.01,
            epsilon_decay: 0.995,
            explore_noop_probability: 0.9,
        }
    }
}

fn check_unit(name: &str, value: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&value) {
        return Err(Error::config(format!("{name} must be in [0, 1], got {value}")));
    }
    Ok(())
}

impl AgentConfig {
    /// Check every hyperparameter range.
    ///
    /// A learning rate of 0 is accepted and freezes the table.
    pub fn validate(&self) -> Result<()> {
        check_unit("learning_rate", self.learning_rate)?;
        check_unit("discount_factor", self.discount_factor)?;
        check_unit("epsilon_start", self.epsilon_start)?;
        check_unit("epsilon_min", self.epsilon_min)?;
        check_unit("explore_noop_probability", self.explore_noop_probability)?;
        if self.epsilon_min > self.epsilon_start {
            return Err(Error::config(format!(
                "epsilon_min ({}) must not exceed epsilon_start ({})",
                self.epsilon_min, self.epsilon_start
            )));
        }
        if !(self.epsilon_decay > 0.0 && self.epsilon_decay < 1.0) {
            return Err(Error::config(format!(
                "epsilon_decay must be in (0, 1), got {}",
                self.epsilon_decay
            )));
        }
        Ok(())
    }
}

/// Ascending thresholds for one state axis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BinEdges(Vec<f64>);

impl BinEdges {
    pub fn new(edges: Vec<f64>) -> Self {
        Self(edges)
    }

    /// `count` evenly spaced edges from `start` to `stop`, both included
    pub fn linspace(start: f64, stop: f64, count: usize) -> Self {
        let edges = match count {
            0 => Vec::new(),
            1 => vec![start],
            _ => {
                let step = (stop - start) / (count - 1) as f64;
                let mut edges: Vec<f64> = (0..count).map(|i| start + step * i as f64).collect();
                edges[count - 1] = stop;
                edges
            }
        };
        Self(edges)
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of bins these edges produce
    pub fn bins(&self) -> usize {
        self.0.len() + 1
    }

    pub fn validate(&self, axis: &str) -> Result<()> {
        let invalid = |reason: String| Error::InvalidBinEdges {
            axis: axis.to_string(),
            reason,
        };
        if self.0.is_empty() {
            return Err(invalid("at least one edge is required".to_string()));
        }
        if let Some(value) = self.0.iter().find(|e| !e.is_finite()) {
            return Err(invalid(format!("edge {value} is not finite")));
        }
        if let Some(pair) = self.0.windows(2).find(|w| w[0] >= w[1]) {
            return Err(invalid(format!(
                "edges must be strictly ascending ({} then {})",
                pair[0], pair[1]
            )));
        }
        Ok(())
    }
}

/// Bin edges for the three discretized axes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BinConfig {
    /// Vertical offset of the body from the gap centre
    pub y_edges: BinEdges,
    /// Horizontal distance from the body to the upcoming pipe
    pub x_edges: BinEdges,
    pub velocity_edges: BinEdges,
}

impl Default for BinConfig {
    fn default() -> Self {
        Self {
            y_edges: BinEdges::linspace(-512.0, 512.0, 20),
            x_edges: BinEdges::linspace(0.0, 500.0, 20),
            velocity_edges: BinEdges::linspace(-10.0, 10.0, 10),
        }
    }
}

impl BinConfig {
    pub fn validate(&self) -> Result<()> {
        self.y_edges.validate("y")?;
        self.x_edges.validate("x")?;
        self.velocity_edges.validate("velocity")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_agent_config_is_valid() {
        assert!(AgentConfig::default().validate().is_ok());
    }

    #[test]
    fn test_agent_config_ranges() {
        let bad_decay = AgentConfig {
            epsilon_decay: 1.0,
            ..Default::default()
        };
        assert!(bad_decay.validate().is_err());

        let inverted = AgentConfig {
            epsilon_start: 0.005,
            ..Default::default()
        };
        assert!(inverted.validate().is_err());

        let frozen = AgentConfig {
            learning_rate: 0.0,
            ..Default::default()
        };
        assert!(frozen.validate().is_ok());
    }

    #[test]
    fn test_linspace() {
        let edges = BinEdges::linspace(-10.0, 10.0, 10);
        assert_eq!(edges.len(), 10);
        assert_eq!(edges.as_slice()[0], -10.0);
        assert_eq!(edges.as_slice()[9], 10.0);
        assert!((edges.as_slice()[1] - (-10.0 + 20.0 / 9.0)).abs() < 1e-12);
    }

    #[test]
    fn test_default_bins() {
        let bins = BinConfig::default();
        assert!(bins.validate().is_ok());
        assert_eq!(bins.y_edges.bins(), 21);
        assert_eq!(bins.x_edges.bins(), 21);
        assert_eq!(bins.velocity_edges.bins(), 11);
    }

    #[test]
    fn test_non_ascending_edges_rejected() {
        let edges = BinEdges::new(vec![0.0, 1.0, 1.0, 2.0]);
        let err = edges.validate("x").unwrap_err();
        assert!(matches!(err, Error::InvalidBinEdges { .. }));

        assert!(BinEdges::new(vec![]).validate("y").is_err());
        assert!(BinEdges::new(vec![0.0, f64::NAN]).validate("y").is_err());
    }

    #[test]
    fn test_edges_serialize_as_plain_array() {
        let edges = BinEdges::new(vec![-1.0, 0.5]);
        assert_eq!(serde_json::to_string(&edges).unwrap(), "[-1.0,0.5]");
    }
}
