//! Core application infrastructure

pub mod cli;
pub mod config;
pub mod constants;

pub use cli::{CliConfig, Commands};
pub use config::{CompilerConfig, FilterLimits};
