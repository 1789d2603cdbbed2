//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands};
use crate::config::{self, ScenarioConfig, Settings};
use crate::error::{Error, Result};
use crate::http::HttpClient;
use crate::scenarios::{self, ScenarioContext, Task};
use serde_json::json;
use tracing::{error, info};

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::Run { task } => self.run_task(task).await,
            Commands::List => {
                self.list_tasks();
                Ok(())
            }
            Commands::Validate => self.validate(),
        }
    }

    /// Process-level settings from flags and environment
    pub fn settings(&self) -> Result<Settings> {
        let cli = &self.cli;
        let base_url = cli
            .base_url
            .clone()
            .filter(|u| !u.trim().is_empty())
            .ok_or_else(|| Error::missing_field("BASE_URL"))?;

        let settings = Settings {
            base_url,
            api_token: cli.api_token.clone(),
            connect_timeout: config::seconds("connect_timeout", cli.connect_timeout)?,
            read_timeout: config::seconds("read_timeout", cli.read_timeout)?,
            log_level: cli.log_level,
            log_format: cli.log_format,
            duration: config::seconds("duration_seconds", cli.duration_seconds)?,
            max_rps: cli.max_rps,
        };
        settings.validate()?;
        Ok(settings)
    }

    /// Scenario configuration; inline JSON takes precedence over the file
    pub fn scenario_config(&self) -> Result<ScenarioConfig> {
        if let Some(inline) = &self.cli.config_json {
            return config::scenario_config_from_json(inline);
        }
        if let Some(path) = &self.cli.config {
            return config::load_scenario_config(path);
        }
        Ok(ScenarioConfig::default())
    }

    fn context(&self) -> Result<ScenarioContext> {
        let settings = self.settings()?;
        let client = HttpClient::with_config(settings.http_config())?;
        Ok(ScenarioContext::new(client, self.scenario_config()?).with_duration(settings.duration))
    }

    async fn run_task(&self, name: &str) -> Result<()> {
        // unknown names fail before any configuration is read
        let task: Task = name.parse()?;
        let ctx = self.context()?;

        info!(event = "task_start", task = task.name(), base_url = %ctx.client.config().base_url);
        match scenarios::run_task(task, &ctx).await {
            Ok(outcome) => {
                info!(event = "task_done", task = task.name(), outcome = ?outcome);
                Ok(())
            }
            Err(err) => {
                error!(
                    event = "task_failed",
                    task = task.name(),
                    status = err.status(),
                    error_type = err.kind(),
                    error = %err,
                );
                Err(err)
            }
        }
    }

    fn list_tasks(&self) {
        for task in Task::ALL {
            println!("{task}");
        }
    }

    fn validate(&self) -> Result<()> {
        let settings = self.settings()?;
        let config = self.scenario_config()?;
        let summary = json!({
            "base_url": settings.base_url,
            "connect_timeout_s": settings.connect_timeout.as_secs_f64(),
            "read_timeout_s": settings.read_timeout.as_secs_f64(),
            "duration_s": settings.duration.as_secs_f64(),
            "max_rps": settings.max_rps,
            "scenario": config,
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&summary).unwrap_or_else(|_| summary.to_string())
        );
        Ok(())
    }
}
