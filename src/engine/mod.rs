//! Traversal-and-mutate engine
//!
//! Walks one paginated source page by page and hands every record, in
//! server order, to an [`ItemVisitor`].
//!
//! # Overview
//!
//! - [`TraversalEngine`] - fetch, extract, visit, decide next
//! - [`CreateVisitor`] - filter → transform → guarded creation call
//! - [`PageSource`] / [`Creator`] - remote seams, HTTP-backed in production
//!
//! Remote-rejected page fetches and exhausted transient failures propagate
//! out of [`TraversalEngine::run`]; malformed envelopes do not.

mod mutate;
mod source;
mod types;

pub use mutate::{CreateVisitor, Mutation};
pub use source::{Creator, HttpCreator, HttpPageSource, PageSource};
pub use types::{
    EmitVisitor, ItemContext, ItemOutcome, ItemVisitor, StatusFilter, TraversalReport,
};

use crate::envelope;
use crate::error::Result;
use crate::guard::{self, GuardDecision};
use crate::pagination::{self, NextPage, PagePlan, StopReason, TraversalState};
use crate::retry::{retry_transient, RetryPolicy};
use std::future::Future;
use tracing::{debug, info, warn};

/// Drives one traversal over a [`PageSource`]
pub struct TraversalEngine<'a> {
    source: &'a dyn PageSource,
    plan: PagePlan,
    retry: RetryPolicy,
}

impl<'a> TraversalEngine<'a> {
    /// Create an engine with the default retry policy
    pub fn new(source: &'a dyn PageSource, plan: PagePlan) -> Self {
        Self {
            source,
            plan,
            retry: RetryPolicy::default(),
        }
    }

    /// Set the retry policy used for page fetches
    #[must_use]
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Page plan in use
    pub fn plan(&self) -> &PagePlan {
        &self.plan
    }

    /// Walk every page and visit every accepted record
    pub async fn run<V>(&self, visitor: &mut V) -> Result<TraversalReport>
    where
        V: ItemVisitor + ?Sized,
    {
        let name = self.source.name();
        let mut state = TraversalState::new(self.plan.start_page);

        let reason = loop {
            let request = self.plan.request(state.current_page_index);
            let body = retry_transient(&self.retry, name, || self.source.fetch(&request)).await?;
            state.record_page();

            let extracted = envelope::extract(&body, self.plan.schema);
            if extracted.is_malformed() {
                warn!(
                    event = "malformed_envelope",
                    source = name,
                    page = state.current_page_index,
                    shape = extracted.label(),
                    "treating page as empty"
                );
            }
            let (items, meta) = extracted.into_parts();

            debug!(
                event = "page_fetched",
                source = name,
                page = state.current_page_index,
                items = items.len(),
            );
            state.add_seen(items.len() as u64);

            let mut halted = false;
            for (position, record) in items.iter().enumerate() {
                if !visitor.accept(record) {
                    continue;
                }
                let ctx = ItemContext {
                    page_index: state.current_page_index,
                    position,
                };
                let outcome = visitor.visit(record, &ctx).await?;
                state.add_emitted(outcome.emitted);
                state.add_failed(outcome.failed);
                if outcome.stop {
                    halted = true;
                    break;
                }
            }
            if halted {
                break StopReason::Halted;
            }

            match pagination::decide(meta.as_ref(), &state) {
                NextPage::Continue(next) => state.advance(next),
                NextPage::Done(reason) => break reason,
            }
        };

        let report = TraversalReport::finished(name, &state, reason);
        debug!(
            event = "traversal_done",
            source = name,
            pages_visited = report.pages_visited,
            items_seen = report.items_seen,
            items_emitted = report.items_emitted,
            items_failed = report.items_failed,
            stop_reason = reason.as_str(),
        );
        Ok(report)
    }

    /// Run a creation batch behind a guard decision made once per run
    pub async fn run_guarded<V>(
        &self,
        visitor: &mut V,
        decision: GuardDecision,
    ) -> Result<TraversalReport>
    where
        V: ItemVisitor + ?Sized,
    {
        if !decision.proceed {
            info!(
                event = "batch_skipped",
                source = self.source.name(),
                current_count = decision.current_count,
                ceiling = decision.ceiling,
            );
            return Ok(TraversalReport::skipped(self.source.name(), decision));
        }

        let mut report = self.run(visitor).await?;
        report.guard = Some(decision);
        Ok(report)
    }

    /// Check the ceiling with `fetch_count`, then [`Self::run_guarded`]
    pub async fn check_and_run<V, F, Fut>(
        &self,
        visitor: &mut V,
        ceiling: u64,
        fetch_count: F,
    ) -> Result<TraversalReport>
    where
        V: ItemVisitor + ?Sized,
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<u64>>,
    {
        let decision = guard::check_and_gate(&self.retry, ceiling, fetch_count).await;
        self.run_guarded(visitor, decision).await
    }
}

impl std::fmt::Debug for TraversalEngine<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TraversalEngine")
            .field("source", &self.source.name())
            .field("plan", &self.plan)
            .field("retry", &self.retry)
            .finish()
    }
}
