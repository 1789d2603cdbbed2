//! Error types for the traffic generator
//!
//! Every fallible operation in the crate returns `Result<T, Error>`.
//! Retry decisions are made from the variant alone, see [`Error::is_transient`].

use thiserror::Error;

/// The main error type
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Missing required config field: {field}")]
    MissingConfigField { field: String },

    #[error("Invalid config value for '{field}': {message}")]
    InvalidConfigValue { field: String, message: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ============================================================================
    // Transport Errors (no response obtained)
    // ============================================================================
    #[error("Connection failed: {message}")]
    Connection { message: String },

    #[error("Request timeout after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    // ============================================================================
    // Remote Errors (completed exchange, non-2xx)
    // ============================================================================
    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    // ============================================================================
    // Data Errors
    // ============================================================================
    #[error("Failed to decode response: {message}")]
    Decode { message: String },

    // ============================================================================
    // Task Errors
    // ============================================================================
    #[error("Unknown task '{task}'. Valid: {valid}")]
    UnknownTask { task: String, valid: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a missing field error
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingConfigField {
            field: field.into(),
        }
    }

    /// Create an invalid value error
    pub fn invalid_value(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfigValue {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a connection error
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Create an HTTP status error
    pub fn http_status(status: u16, body: impl Into<String>) -> Self {
        Self::HttpStatus {
            status,
            body: body.into(),
        }
    }

    /// Create a decode error
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Whether the failure happened before a response was obtained.
    ///
    /// Only these are safe to retry: a completed exchange with a non-2xx
    /// status may already have changed server-side state.
    pub fn is_transient(&self) -> bool {
        match self {
            Error::Connection { .. } | Error::Timeout { .. } => true,
            Error::Http(e) => e.is_connect() || e.is_timeout() || e.is_request() || e.is_body(),
            _ => false,
        }
    }

    /// HTTP status of a rejected call, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::HttpStatus { status, .. } => Some(*status),
            Error::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Short variant name used in failure events
    pub fn kind(&self) -> &'static str {
        match self {
            Error::Config { .. }
            | Error::MissingConfigField { .. }
            | Error::InvalidConfigValue { .. }
            | Error::YamlParse(_)
            | Error::JsonParse(_)
            | Error::InvalidUrl(_) => "config",
            Error::Connection { .. } => "connection",
            Error::Timeout { .. } => "timeout",
            Error::Http(_) => "transport",
            Error::HttpStatus { .. } => "http_status",
            Error::Decode { .. } => "decode",
            Error::UnknownTask { .. } => "unknown_task",
            Error::Io(_) => "io",
            Error::Other(_) => "other",
        }
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, message: impl Into<String>) -> Result<T>;

    /// Add context with a closure (lazy evaluation)
    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, message: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", message.into(), inner))
        })
    }

    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", f(), inner))
        })
    }
}
