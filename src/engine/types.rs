//! Engine types
//!
//! Per-item hooks, outcomes, and the run report.

use crate::envelope::fields;
use crate::error::Result;
use crate::guard::GuardDecision;
use crate::pagination::{StopReason, TraversalState};
use crate::types::Record;
use async_trait::async_trait;
use serde::Serialize;
use std::collections::BTreeSet;

/// Position of a record within the traversal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemContext {
    /// Page the record came from
    pub page_index: u32,
    /// Zero-based position within that page
    pub position: usize,
}

/// What handling one record produced
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ItemOutcome {
    /// Records emitted or resources created
    pub emitted: u64,
    /// Failed calls
    pub failed: u64,
    /// Stop the traversal after this record
    pub stop: bool,
}

impl ItemOutcome {
    /// Nothing emitted, nothing failed
    pub fn nothing() -> Self {
        Self::default()
    }

    /// One record emitted
    pub fn one_emitted() -> Self {
        Self::tally(1, 0)
    }

    /// One failed call
    pub fn one_failed() -> Self {
        Self::tally(0, 1)
    }

    /// Explicit counts
    pub fn tally(emitted: u64, failed: u64) -> Self {
        Self {
            emitted,
            failed,
            stop: false,
        }
    }

    /// Ask the engine to stop after this record
    #[must_use]
    pub fn then_stop(mut self) -> Self {
        self.stop = true;
        self
    }
}

/// Per-record hooks called by the engine, in server order
#[async_trait]
pub trait ItemVisitor: Send {
    /// Filter. Rejected records count as seen and are not visited.
    fn accept(&self, _record: &Record) -> bool {
        true
    }

    /// Handle one accepted record.
    ///
    /// Errors abort the whole traversal; per-item failures that should not
    /// are reported through [`ItemOutcome::failed`] instead.
    async fn visit(&mut self, record: &Record, ctx: &ItemContext) -> Result<ItemOutcome>;
}

/// Visitor that reports every accepted record through a closure
pub struct EmitVisitor<F> {
    emit: F,
}

impl<F> EmitVisitor<F>
where
    F: FnMut(&Record, &ItemContext) + Send,
{
    pub fn new(emit: F) -> Self {
        Self { emit }
    }
}

#[async_trait]
impl<F> ItemVisitor for EmitVisitor<F>
where
    F: FnMut(&Record, &ItemContext) + Send,
{
    async fn visit(&mut self, record: &Record, ctx: &ItemContext) -> Result<ItemOutcome> {
        (self.emit)(record, ctx);
        Ok(ItemOutcome::one_emitted())
    }
}

/// Case-insensitive allow-list over the `status` field.
///
/// An empty set accepts every record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusFilter {
    allowed: BTreeSet<String>,
}

impl StatusFilter {
    /// Accept every status
    pub fn all() -> Self {
        Self::default()
    }

    /// Accept only the given statuses
    pub fn only<I, S>(statuses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            allowed: statuses
                .into_iter()
                .map(|s| s.as_ref().trim().to_lowercase())
                .filter(|s| !s.is_empty())
                .collect(),
        }
    }

    /// Parse a comma-separated list such as `"Active,Inactive"`
    pub fn from_csv(raw: &str) -> Self {
        Self::only(raw.split(','))
    }

    pub fn accepts(&self, record: &Record) -> bool {
        self.allowed.is_empty() || self.allowed.contains(&fields::status(record))
    }

    pub fn is_all(&self) -> bool {
        self.allowed.is_empty()
    }

    /// Allowed statuses, for events
    pub fn describe(&self) -> String {
        if self.allowed.is_empty() {
            "ALL".to_string()
        } else {
            self.allowed.iter().cloned().collect::<Vec<_>>().join(",")
        }
    }
}

/// Counters of one traversal, reported once at the end
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TraversalReport {
    /// Source the traversal walked
    pub source: String,
    pub pages_visited: u32,
    pub items_seen: u64,
    pub items_emitted: u64,
    pub items_failed: u64,
    /// Index of the last page fetched
    pub last_page_index: Option<u32>,
    /// `None` when the guard skipped the batch
    pub stop_reason: Option<StopReason>,
    /// Guard decision for creation flows
    pub guard: Option<GuardDecision>,
}

impl TraversalReport {
    /// Report for a completed traversal
    pub fn finished(source: &str, state: &TraversalState, reason: StopReason) -> Self {
        Self {
            source: source.to_string(),
            pages_visited: state.pages_visited,
            items_seen: state.items_seen,
            items_emitted: state.items_emitted,
            items_failed: state.items_failed,
            last_page_index: state.last_page_index_seen,
            stop_reason: Some(reason),
            guard: None,
        }
    }

    /// Report for a batch the guard suppressed
    pub fn skipped(source: &str, decision: GuardDecision) -> Self {
        Self {
            source: source.to_string(),
            guard: Some(decision),
            ..Default::default()
        }
    }

    /// Whether the guard suppressed the batch
    pub fn was_skipped(&self) -> bool {
        self.guard.is_some_and(|g| !g.proceed)
    }
}
