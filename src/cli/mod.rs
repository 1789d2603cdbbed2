//! CLI module
//!
//! Command-line interface for running traffic tasks.
//!
//! # Commands
//!
//! - `run <task>` - Run one task (or `TASK` from the environment)
//! - `list` - Print the valid task names
//! - `validate` - Check settings and scenario configuration

mod commands;
mod runner;

pub use commands::{Cli, Commands};
pub use runner::Runner;
