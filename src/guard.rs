//! Count-ceiling gate for creation batches
//!
//! Checked once per run, before the first creation. If the count cannot be
//! read the gate stays open: the run exists to generate traffic.

use crate::error::Result;
use crate::retry::{retry_transient, RetryPolicy};
use serde::Serialize;
use std::future::Future;
use tracing::{error, info};

/// Outcome of the ceiling check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GuardDecision {
    /// Whether the batch may run
    pub proceed: bool,
    /// Count read from the server, 0 when unavailable
    pub current_count: u64,
    pub ceiling: u64,
    /// False when the count fetch failed and the gate failed open
    pub verified: bool,
}

impl GuardDecision {
    /// Decision for a successfully read count
    pub fn evaluate(current_count: u64, ceiling: u64) -> Self {
        Self {
            proceed: current_count < ceiling,
            current_count,
            ceiling,
            verified: true,
        }
    }

    /// Decision when the count could not be read
    pub fn fail_open(ceiling: u64) -> Self {
        Self {
            proceed: true,
            current_count: 0,
            ceiling,
            verified: false,
        }
    }
}

/// Read the current count (with retries) and decide whether to proceed
pub async fn check_and_gate<F, Fut>(
    retry: &RetryPolicy,
    ceiling: u64,
    fetch_count: F,
) -> GuardDecision
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<u64>>,
{
    let decision = match retry_transient(retry, "guard_count", fetch_count).await {
        Ok(count) => GuardDecision::evaluate(count, ceiling),
        Err(err) => {
            error!(
                event = "guard_count_failed",
                ceiling,
                status = err.status(),
                error = %err,
                "count unavailable, proceeding"
            );
            GuardDecision::fail_open(ceiling)
        }
    };

    info!(
        event = "guard_checked",
        proceed = decision.proceed,
        current_count = decision.current_count,
        ceiling,
        verified = decision.verified,
    );
    decision
}
