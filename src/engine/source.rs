//! Remote seams of the engine
//!
//! `PageSource` fetches one page of a list endpoint, `Creator` issues one
//! creation call. Both are single attempts; the engine adds retries.

use crate::error::Result;
use crate::http::HttpClient;
use crate::pagination::PageRequest;
use async_trait::async_trait;
use serde_json::Value;

/// Fetches one page of a paginated resource
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Name used in events (usually the path)
    fn name(&self) -> &str;

    /// Fetch the raw body of one page
    async fn fetch(&self, request: &PageRequest) -> Result<Value>;
}

/// Issues creation requests
#[async_trait]
pub trait Creator: Send + Sync {
    /// Name used in events (usually the path)
    fn name(&self) -> &str;

    /// Send one creation payload and return the decoded reply
    async fn create(&self, payload: &Value) -> Result<Value>;
}

/// List endpoint served over HTTP
#[derive(Debug)]
pub struct HttpPageSource<'a> {
    client: &'a HttpClient,
    path: String,
    extra_query: Vec<(String, String)>,
}

impl<'a> HttpPageSource<'a> {
    pub fn new(client: &'a HttpClient, path: impl Into<String>) -> Self {
        Self {
            client,
            path: path.into(),
            extra_query: Vec::new(),
        }
    }

    /// Add a fixed query parameter sent with every page
    #[must_use]
    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra_query.push((key.into(), value.into()));
        self
    }
}

#[async_trait]
impl PageSource for HttpPageSource<'_> {
    fn name(&self) -> &str {
        &self.path
    }

    async fn fetch(&self, request: &PageRequest) -> Result<Value> {
        let mut query = request.query();
        query.extend(self.extra_query.iter().cloned());
        self.client.get_json(&self.path, &query).await
    }
}

/// Creation endpoint served over HTTP
#[derive(Debug)]
pub struct HttpCreator<'a> {
    client: &'a HttpClient,
    path: String,
}

impl<'a> HttpCreator<'a> {
    pub fn new(client: &'a HttpClient, path: impl Into<String>) -> Self {
        Self {
            client,
            path: path.into(),
        }
    }
}

#[async_trait]
impl Creator for HttpCreator<'_> {
    fn name(&self) -> &str {
        &self.path
    }

    async fn create(&self, payload: &Value) -> Result<Value> {
        self.client.post_json(&self.path, payload).await
    }
}
