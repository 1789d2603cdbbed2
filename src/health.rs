//! Ping health checks
//!
//! A body mismatch is logged as an error event and reported as
//! [`PingStatus::Unexpected`]; only transport and non-2xx failures are
//! returned as errors.

use crate::envelope::{self, fields};
use crate::error::Result;
use crate::http::{HttpClient, Probe};
use crate::retry::{retry_transient, RetryPolicy};
use serde_json::Value;
use std::future::Future;
use std::time::Duration;
use tokio::time::{sleep, Instant};
use tracing::{error, info};

pub const MOTEL_PING_PATH: &str = "/motelApi/v1/ping";
pub const RESERVATION_PING_PATH: &str = "/reservationApi/v1/ping";

/// Result of one ping
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PingStatus {
    Ok,
    Unexpected,
}

/// Iteration counts of a ping loop
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoopSummary {
    pub iterations: u64,
    pub ok: u64,
    pub unexpected: u64,
    pub errors: u64,
}

fn http_ok(body: &Value) -> bool {
    envelope::http_code(body).as_deref() == Some("200")
}

/// `{"response": {"http_code": "200", "data": "pong"}}`
pub fn motel_ping_matches(body: &Value) -> bool {
    http_ok(body) && envelope::data(body).and_then(Value::as_str) == Some("pong")
}

/// `data.database == "working fine"` and `data.message == "pong"`
pub fn reservation_ping_matches(body: &Value) -> bool {
    let data = envelope::data(body);
    let field = |key: &str| data.and_then(|d| fields::str_field(d, key));
    http_ok(body)
        && field("database").as_deref() == Some("working fine")
        && field("message").as_deref() == Some("pong")
}

async fn probe(client: &HttpClient, retry: &RetryPolicy, path: &str) -> Result<Probe> {
    retry_transient(retry, path, || client.get_probe(path)).await
}

/// Ping the motel API once
pub async fn check_motel_ping(client: &HttpClient, retry: &RetryPolicy) -> Result<PingStatus> {
    let probe = probe(client, retry, MOTEL_PING_PATH).await?;
    match &probe.body {
        Some(body) if motel_ping_matches(body) => {
            info!(event = "ping_ok", status_code = probe.status);
            Ok(PingStatus::Ok)
        }
        body => {
            error!(
                event = "ping_unexpected_body",
                status_code = probe.status,
                body = ?body,
            );
            Ok(PingStatus::Unexpected)
        }
    }
}

/// Ping the reservation API once
pub async fn check_reservation_ping(
    client: &HttpClient,
    retry: &RetryPolicy,
) -> Result<PingStatus> {
    let probe = probe(client, retry, RESERVATION_PING_PATH).await?;
    match &probe.body {
        Some(body) if reservation_ping_matches(body) => {
            let data = envelope::data(body);
            let database = data.and_then(|d| fields::str_field(d, "database"));
            let message = data.and_then(|d| fields::str_field(d, "message"));
            info!(
                event = "reservation_ping_ok",
                status_code = probe.status,
                database = database.as_deref(),
                message = message.as_deref(),
            );
            Ok(PingStatus::Ok)
        }
        body => {
            error!(
                event = "reservation_ping_unexpected_body",
                status_code = probe.status,
                body = ?body,
            );
            Ok(PingStatus::Unexpected)
        }
    }
}

/// Run `check` once per `interval` until `duration` has elapsed.
///
/// Errors are logged under `error_event` and never stop the loop.
pub async fn run_loop<F, Fut>(
    duration: Duration,
    interval: Duration,
    error_event: &'static str,
    mut check: F,
) -> LoopSummary
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<PingStatus>>,
{
    let deadline = Instant::now() + duration;
    let mut summary = LoopSummary::default();

    while Instant::now() < deadline {
        summary.iterations += 1;
        match check().await {
            Ok(PingStatus::Ok) => summary.ok += 1,
            Ok(PingStatus::Unexpected) => summary.unexpected += 1,
            Err(err) => {
                summary.errors += 1;
                error!(event = error_event, status = err.status(), error = %err);
            }
        }
        sleep(interval).await;
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use serde_json::json;
    use std::cell::Cell;

    #[test]
    fn test_motel_ping_matches() {
        assert!(motel_ping_matches(
            &json!({"response": {"http_code": "200", "data": "pong"}})
        ));
        assert!(motel_ping_matches(
            &json!({"response": {"http_code": 200, "data": "pong"}})
        ));
        assert!(!motel_ping_matches(
            &json!({"response": {"http_code": "500", "data": "pong"}})
        ));
        assert!(!motel_ping_matches(
            &json!({"response": {"http_code": "200", "data": "ping"}})
        ));
        assert!(!motel_ping_matches(&json!({"data": "pong"})));
    }

    #[test]
    fn test_reservation_ping_matches() {
        let good = json!({"response": {"http_code": "200", "data": {
            "database": "working fine", "message": "pong"
        }}});
        assert!(reservation_ping_matches(&good));

        let bad_db = json!({"response": {"http_code": "200", "data": {
            "database": "down", "message": "pong"
        }}});
        assert!(!reservation_ping_matches(&bad_db));
        assert!(!reservation_ping_matches(
            &json!({"response": {"http_code": "200", "data": null}})
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_loop_counts_and_swallows_errors() {
        let calls = Cell::new(0u32);
        let summary = run_loop(
            Duration::from_secs(3),
            Duration::from_secs(1),
            "ping_error",
            || {
                calls.set(calls.get() + 1);
                let n = calls.get();
                async move {
                    match n {
                        1 => Ok(PingStatus::Ok),
                        2 => Err(Error::connection("refused")),
                        _ => Ok(PingStatus::Unexpected),
                    }
                }
            },
        )
        .await;

        assert_eq!(summary.iterations, 3);
        assert_eq!(summary.ok, 1);
        assert_eq!(summary.errors, 1);
        assert_eq!(summary.unexpected, 1);
    }
}
