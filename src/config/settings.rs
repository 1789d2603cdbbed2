//! Process-level settings
//!
//! Built once by the CLI and handed to every component by reference.

use crate::error::{Error, Result};
use crate::http::{HttpClientConfig, RateLimiterConfig};
use crate::types::{LogFormat, LogLevel};
use std::time::Duration;
use url::Url;

/// Connection, logging and run-length settings
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Base URL of the target service
    pub base_url: String,
    /// Bearer token
    pub api_token: Option<String>,
    pub connect_timeout: Duration,
    pub read_timeout: Duration,
    pub log_level: LogLevel,
    pub log_format: LogFormat,
    /// Run length of the loop tasks
    pub duration: Duration,
    /// Optional cap on outbound requests per second
    pub max_rps: Option<u32>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            api_token: None,
            connect_timeout: Duration::from_secs(3),
            read_timeout: Duration::from_secs(10),
            log_level: LogLevel::Info,
            log_format: LogFormat::Json,
            duration: Duration::from_secs(60),
            max_rps: None,
        }
    }
}

impl Settings {
    /// Check the values that cannot be expressed in types
    pub fn validate(&self) -> Result<()> {
        let url = Url::parse(&self.base_url)?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::invalid_value(
                "base_url",
                format!("unsupported scheme '{}'", url.scheme()),
            ));
        }
        if self.connect_timeout.is_zero() {
            return Err(Error::invalid_value("connect_timeout", "must be positive"));
        }
        if self.read_timeout.is_zero() {
            return Err(Error::invalid_value("read_timeout", "must be positive"));
        }
        if self.max_rps == Some(0) {
            return Err(Error::invalid_value("max_rps", "must be positive"));
        }
        Ok(())
    }

    /// HTTP client configuration derived from these settings
    pub fn http_config(&self) -> HttpClientConfig {
        let mut builder = HttpClientConfig::builder()
            .base_url(self.base_url.clone())
            .timeouts(self.connect_timeout, self.read_timeout);
        if let Some(token) = self.api_token.as_deref().filter(|t| !t.is_empty()) {
            builder = builder.api_token(token);
        }
        if let Some(rps) = self.max_rps {
            builder = builder.rate_limit(RateLimiterConfig::per_second(rps));
        }
        builder.build()
    }
}

/// Seconds as a duration; negative and non-finite values are rejected
pub fn seconds(field: &str, value: f64) -> Result<Duration> {
    Duration::try_from_secs_f64(value)
        .map_err(|e| Error::invalid_value(field, format!("{value}: {e}")))
}
