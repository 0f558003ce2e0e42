//! CLI subcommands

pub mod config;
pub mod evaluate;
pub mod train;
