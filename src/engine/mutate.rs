//! Creation flows
//!
//! A [`Mutation`] describes what one source record turns into; the
//! [`CreateVisitor`] sends those payloads through a [`Creator`] under the
//! retry policy. A failed creation is counted and the batch moves on.

use super::source::Creator;
use super::types::{ItemContext, ItemOutcome, ItemVisitor};
use crate::error::{Error, Result};
use crate::retry::{retry_transient, RetryPolicy};
use crate::types::Record;
use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, error};

/// Filter and transform of one creation flow
pub trait Mutation: Send + Sync {
    /// Records that should produce payloads
    fn accept(&self, _record: &Record) -> bool {
        true
    }

    /// Payloads derived from one source record. Must not modify it.
    fn payloads(&self, record: &Record) -> Vec<Value>;

    fn on_created(&self, payload: &Value, reply: &Value) {
        debug!(event = "created", payload = %payload, reply = %reply);
    }

    fn on_failed(&self, payload: &Value, err: &Error) {
        error!(
            event = "create_failed",
            payload = %payload,
            status = err.status(),
            error = %err,
        );
    }
}

/// Visitor issuing one creation call per payload
pub struct CreateVisitor<'a, M> {
    creator: &'a dyn Creator,
    mutation: M,
    retry: RetryPolicy,
}

impl<'a, M: Mutation> CreateVisitor<'a, M> {
    pub fn new(creator: &'a dyn Creator, mutation: M) -> Self {
        Self {
            creator,
            mutation,
            retry: RetryPolicy::default(),
        }
    }

    #[must_use]
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn mutation(&self) -> &M {
        &self.mutation
    }
}

#[async_trait]
impl<M: Mutation> ItemVisitor for CreateVisitor<'_, M> {
    fn accept(&self, record: &Record) -> bool {
        self.mutation.accept(record)
    }

    async fn visit(&mut self, record: &Record, _ctx: &ItemContext) -> Result<ItemOutcome> {
        let creator = self.creator;
        let mut outcome = ItemOutcome::nothing();

        for payload in self.mutation.payloads(record) {
            match retry_transient(&self.retry, creator.name(), || creator.create(&payload)).await {
                Ok(reply) => {
                    self.mutation.on_created(&payload, &reply);
                    outcome.emitted += 1;
                }
                Err(err) => {
                    self.mutation.on_failed(&payload, &err);
                    outcome.failed += 1;
                }
            }
        }
        Ok(outcome)
    }
}
