//! CLI commands and argument parsing

use crate::types::{LogFormat, LogLevel};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Synthetic traffic generator for the motel and reservation APIs
#[derive(Parser, Debug)]
#[command(name = "motel-traffic")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Base URL of the target service (required by `run`)
    #[arg(long, env = "BASE_URL", global = true)]
    pub base_url: Option<String>,

    /// Bearer token sent on every request
    #[arg(long, env = "API_TOKEN", global = true, hide_env_values = true)]
    pub api_token: Option<String>,

    /// Connect timeout in seconds
    #[arg(long, env = "CONNECT_TIMEOUT", global = true, default_value_t = 3.0)]
    pub connect_timeout: f64,

    /// Read timeout in seconds
    #[arg(long, env = "READ_TIMEOUT", global = true, default_value_t = 10.0)]
    pub read_timeout: f64,

    /// Minimum level of emitted events
    #[arg(long, env = "LOG_LEVEL", global = true, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    /// Event output format
    #[arg(long, env = "LOG_FORMAT", global = true, value_enum, default_value_t = LogFormat::Json)]
    pub log_format: LogFormat,

    /// Run length of the loop tasks, in seconds
    #[arg(long, env = "DURATION_SECONDS", global = true, default_value_t = 60.0)]
    pub duration_seconds: f64,

    /// Cap on outbound requests per second
    #[arg(long, env = "MAX_RPS", global = true)]
    pub max_rps: Option<u32>,

    /// Scenario configuration file (YAML or JSON)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Inline scenario configuration (JSON)
    #[arg(long, global = true)]
    pub config_json: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run one task
    Run {
        /// Task name, see `list`
        #[arg(env = "TASK")]
        task: String,
    },

    /// Print the valid task names
    List,

    /// Validate settings and scenario configuration without sending traffic
    Validate,
}
