//! Configuration module

pub mod cli;
pub mod sim_config;

pub use cli::CliArgs;
pub use sim_config::{SimConfig, SimKind};
