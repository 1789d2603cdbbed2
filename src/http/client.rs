//! HTTP client for the motel and reservation APIs
//!
//! Every call is a single attempt. Failures are classified into the crate
//! error taxonomy so callers can decide about retries:
//! - connection / timeout failures before a response → transient
//! - completed exchange with a non-2xx status → `HttpStatus`, terminal

use super::rate_limit::{RateLimiter, RateLimiterConfig};
use crate::error::{Error, Result};
use reqwest::{Client, Method, Response};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::time::Duration;
use tracing::debug;

/// Configuration for the HTTP client
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Base URL for all requests
    pub base_url: String,
    /// Bearer token, sent on every request when set
    pub api_token: Option<String>,
    /// Connection establishment timeout
    pub connect_timeout: Duration,
    /// Timeout for the rest of the exchange
    pub read_timeout: Duration,
    /// Optional request pacing
    pub rate_limit: Option<RateLimiterConfig>,
    /// Default headers for all requests
    pub default_headers: HashMap<String, String>,
    /// User agent string
    pub user_agent: String,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        let mut default_headers = HashMap::new();
        default_headers.insert("Content-Type".to_string(), "application/json".to_string());

        Self {
            base_url: "http://localhost:8080".to_string(),
            api_token: None,
            connect_timeout: Duration::from_secs(3),
            read_timeout: Duration::from_secs(10),
            rate_limit: None,
            default_headers,
            user_agent: format!("motel-traffic/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl HttpClientConfig {
    /// Create a new config builder
    pub fn builder() -> HttpClientConfigBuilder {
        HttpClientConfigBuilder::default()
    }
}

/// Builder for HTTP client config
#[derive(Default)]
pub struct HttpClientConfigBuilder {
    config: HttpClientConfig,
}

impl HttpClientConfigBuilder {
    /// Set the base URL
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = url.into();
        self
    }

    /// Set the bearer token
    pub fn api_token(mut self, token: impl Into<String>) -> Self {
        self.config.api_token = Some(token.into());
        self
    }

    /// Set connect and read timeouts
    pub fn timeouts(mut self, connect: Duration, read: Duration) -> Self {
        self.config.connect_timeout = connect;
        self.config.read_timeout = read;
        self
    }

    /// Enable request pacing
    pub fn rate_limit(mut self, config: RateLimiterConfig) -> Self {
        self.config.rate_limit = Some(config);
        self
    }

    /// Add a default header
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.default_headers.insert(key.into(), value.into());
        self
    }

    /// Set user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.user_agent = agent.into();
        self
    }

    /// Build the config
    pub fn build(self) -> HttpClientConfig {
        self.config
    }
}

/// Status and decoded body of a probe request
#[derive(Debug, Clone, PartialEq)]
pub struct Probe {
    pub status: u16,
    /// `None` when the body was not JSON
    pub body: Option<Value>,
}

/// HTTP client shared read-only by every component of a run
pub struct HttpClient {
    client: Client,
    config: HttpClientConfig,
    rate_limiter: Option<RateLimiter>,
}

impl HttpClient {
    /// Create a new HTTP client
    pub fn with_config(config: HttpClientConfig) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.read_timeout)
            .user_agent(&config.user_agent)
            .build()?;

        let rate_limiter = config.rate_limit.as_ref().map(RateLimiter::new);

        Ok(Self {
            client,
            config,
            rate_limiter,
        })
    }

    /// Client configuration
    pub fn config(&self) -> &HttpClientConfig {
        &self.config
    }

    /// GET a JSON body
    pub async fn get_json(&self, path: &str, query: &[(String, String)]) -> Result<Value> {
        let response = self.send(Method::GET, path, query, None).await?;
        self.read_json(response).await
    }

    /// POST a JSON body and return the decoded reply.
    ///
    /// A 2xx reply that is not JSON yields `{"status_code": <code>}`.
    pub async fn post_json(&self, path: &str, body: &Value) -> Result<Value> {
        let response = self.send(Method::POST, path, &[], Some(body)).await?;
        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| unread_body(status, &e))?;
        Ok(serde_json::from_str(&text).unwrap_or_else(|_| json!({ "status_code": status })))
    }

    /// GET for health checks: non-2xx is an error, a non-JSON body is not
    pub async fn get_probe(&self, path: &str) -> Result<Probe> {
        let response = self.send(Method::GET, path, &[], None).await?;
        let status = response.status().as_u16();
        let text = response.text().await.map_err(|e| self.classify(e))?;
        Ok(Probe {
            status,
            body: serde_json::from_str(&text).ok(),
        })
    }

    /// Make a single request; non-2xx statuses become `HttpStatus`
    pub async fn send(
        &self,
        method: Method,
        path: &str,
        query: &[(String, String)],
        body: Option<&Value>,
    ) -> Result<Response> {
        if let Some(ref limiter) = self.rate_limiter {
            limiter.wait().await;
        }

        let full_url = self.url(path);
        let mut req = self.client.request(method.clone(), &full_url);

        for (key, value) in &self.config.default_headers {
            req = req.header(key.as_str(), value.as_str());
        }
        if let Some(ref token) = self.config.api_token {
            req = req.bearer_auth(token);
        }
        if !query.is_empty() {
            req = req.query(query);
        }
        if let Some(body) = body {
            req = req.json(body);
        }

        let response = req.send().await.map_err(|e| self.classify(e))?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            debug!(%method, url = %full_url, status = status.as_u16(), "request rejected");
            return Err(Error::http_status(status.as_u16(), body));
        }

        debug!(%method, url = %full_url, status = status.as_u16(), "request succeeded");
        Ok(response)
    }

    /// Build full URL from path
    pub fn url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        let base = self.config.base_url.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        format!("{base}/{path}")
    }

    async fn read_json(&self, response: Response) -> Result<Value> {
        let text = response.text().await.map_err(|e| self.classify(e))?;
        serde_json::from_str(&text)
            .map_err(|e| Error::decode(format!("Failed to parse JSON body: {e}")))
    }

    /// Map a reqwest failure into the crate taxonomy
    fn classify(&self, e: reqwest::Error) -> Error {
        if e.is_timeout() {
            Error::Timeout {
                timeout_ms: self.config.read_timeout.as_millis() as u64,
            }
        } else if e.is_connect() {
            Error::connection(e.to_string())
        } else {
            Error::Http(e)
        }
    }
}

/// The server already answered, so the write may have happened. Not retried.
fn unread_body(status: u16, e: &reqwest::Error) -> Error {
    Error::decode(format!("Failed to read {status} response body: {e}"))
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("base_url", &self.config.base_url)
            .field("has_token", &self.config.api_token.is_some())
            .field("has_rate_limiter", &self.rate_limiter.is_some())
            .finish_non_exhaustive()
    }
}
