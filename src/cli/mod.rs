//! Command-line interface for training and evaluating the flappy agent
//!
//! This module provides the `train`, `evaluate` and `config` subcommands
//! used by the `flappy` binary.

pub mod commands;
pub mod output;
