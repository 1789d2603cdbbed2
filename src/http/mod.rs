//! HTTP client module
//!
//! Thin single-attempt client for the motel and reservation APIs.
//!
//! # Features
//!
//! - **Error Classification**: transport failures vs. rejected exchanges
//! - **Bearer Auth**: token applied to every request
//! - **Pacing**: optional token bucket rate limiting using governor
//!
//! Retries are applied by callers through [`crate::retry`].

mod client;
mod rate_limit;

pub use client::{HttpClient, HttpClientConfig, HttpClientConfigBuilder, Probe};
pub use rate_limit::{RateLimiter, RateLimiterConfig};

#[cfg(test)]
mod tests;
