//! Pagination types
//!
//! The two upstream pagination conventions, the per-endpoint page plan,
//! and the traversal state the engine mutates.

use crate::envelope::fields;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;

// ============================================================================
// Schema
// ============================================================================

/// Pagination convention of an endpoint family.
///
/// Resolved once per endpoint family, never inferred from a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaginationSchema {
    /// Zero-based `page`/`size` with `last` and `total_pages`
    #[default]
    Offset,
    /// One-based `current_page` with `has_next` and `total_pages`
    Cursor,
}

impl PaginationSchema {
    /// Parse a pagination block under this convention.
    ///
    /// Anything that is not a non-empty object yields `None`, which the
    /// cursor treats as "single page".
    pub fn parse(self, block: &Value) -> Option<PaginationMeta> {
        let obj = block.as_object().filter(|o| !o.is_empty())?;
        let total_pages = obj.get("total_pages").and_then(fields::uint);

        let meta = match self {
            PaginationSchema::Offset => PaginationMeta::Offset {
                page: obj.get("page").and_then(fields::uint),
                total_pages,
                last: fields::truthy(obj.get("last")) || fields::truthy(obj.get("is_last")),
            },
            PaginationSchema::Cursor => PaginationMeta::Cursor {
                current_page: obj.get("current_page").and_then(fields::uint),
                has_next: fields::truthy(obj.get("has_next")),
                total_pages,
            },
        };
        Some(meta)
    }
}

// ============================================================================
// Metadata
// ============================================================================

/// Pagination block of one response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaginationMeta {
    /// Offset-style block
    Offset {
        /// Page the server says it returned
        page: Option<u32>,
        /// Total number of pages, when reported
        total_pages: Option<u32>,
        /// `last` / `is_last` flag
        last: bool,
    },
    /// Cursor-style block
    Cursor {
        /// Page the server says it returned
        current_page: Option<u32>,
        /// Whether another page follows
        has_next: bool,
        /// Total number of pages, when reported
        total_pages: Option<u32>,
    },
}

impl PaginationMeta {
    /// Convenience constructor for offset-style blocks
    pub fn offset(page: u32, total_pages: Option<u32>, last: bool) -> Self {
        Self::Offset {
            page: Some(page),
            total_pages,
            last,
        }
    }

    /// Convenience constructor for cursor-style blocks
    pub fn cursor(current_page: u32, has_next: bool, total_pages: Option<u32>) -> Self {
        Self::Cursor {
            current_page: Some(current_page),
            has_next,
            total_pages,
        }
    }

    /// Schema this block belongs to
    pub fn schema(&self) -> PaginationSchema {
        match self {
            Self::Offset { .. } => PaginationSchema::Offset,
            Self::Cursor { .. } => PaginationSchema::Cursor,
        }
    }
}

// ============================================================================
// Page Plan / Request
// ============================================================================

/// How to page through one endpoint family
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PagePlan {
    /// Pagination convention
    pub schema: PaginationSchema,
    /// First page index (0 for offset-style, 1 for cursor-style)
    pub start_page: u32,
    /// Records per page
    pub page_size: u32,
    /// Query key for the page index
    pub page_param: String,
    /// Query key for the page size
    pub size_param: String,
}

impl PagePlan {
    /// Motel API convention: `?page=0&size=N`
    pub fn offset(page_size: u32) -> Self {
        Self {
            schema: PaginationSchema::Offset,
            start_page: 0,
            page_size,
            page_param: "page".to_string(),
            size_param: "size".to_string(),
        }
    }

    /// Reservation API convention: `?page=1&per_page=N`
    pub fn cursor(page_size: u32) -> Self {
        Self {
            schema: PaginationSchema::Cursor,
            start_page: 1,
            page_size,
            page_param: "page".to_string(),
            size_param: "per_page".to_string(),
        }
    }

    /// Override the query parameter names
    #[must_use]
    pub fn with_params(
        mut self,
        page_param: impl Into<String>,
        size_param: impl Into<String>,
    ) -> Self {
        self.page_param = page_param.into();
        self.size_param = size_param.into();
        self
    }

    /// Override the first page index
    #[must_use]
    pub fn starting_at(mut self, start_page: u32) -> Self {
        self.start_page = start_page;
        self
    }

    /// Request for a given page index
    pub fn request(&self, page_index: u32) -> PageRequest {
        PageRequest {
            page_index,
            page_size: self.page_size,
            page_param: self.page_param.clone(),
            size_param: self.size_param.clone(),
        }
    }
}

/// One page fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub page_index: u32,
    pub page_size: u32,
    pub page_param: String,
    pub size_param: String,
}

impl PageRequest {
    /// Query parameters for this request
    pub fn query(&self) -> Vec<(String, String)> {
        vec![
            (self.page_param.clone(), self.page_index.to_string()),
            (self.size_param.clone(), self.page_size.to_string()),
        ]
    }
}

// ============================================================================
// Decisions
// ============================================================================

/// Why a traversal ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// Response carried no pagination block
    NoPagination,
    /// Pagination block marked this page as the last one
    LastPage,
    /// Server pointed back at the current or an already visited page
    RepeatedPage,
    /// A visitor asked to stop early
    Halted,
}

impl StopReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            StopReason::NoPagination => "no_pagination",
            StopReason::LastPage => "last_page",
            StopReason::RepeatedPage => "repeated_page",
            StopReason::Halted => "halted",
        }
    }
}

/// Result of the next page computation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextPage {
    /// Fetch this page index next
    Continue(u32),
    /// No more pages
    Done(StopReason),
}

// ============================================================================
// Traversal State
// ============================================================================

/// Per-run traversal progress. Counters only ever grow.
#[derive(Debug, Clone, Default)]
pub struct TraversalState {
    /// Page about to be (or being) fetched
    pub current_page_index: u32,
    /// Pages fetched so far
    pub pages_visited: u32,
    /// Records extracted from all pages
    pub items_seen: u64,
    /// Records emitted or created
    pub items_emitted: u64,
    /// Failed per-item calls
    pub items_failed: u64,
    /// Index of the last page fetched
    pub last_page_index_seen: Option<u32>,
    visited: BTreeSet<u32>,
}

impl TraversalState {
    /// Create state positioned at the first page
    pub fn new(start_page: u32) -> Self {
        Self {
            current_page_index: start_page,
            ..Default::default()
        }
    }

    /// Record that the current page was fetched
    pub fn record_page(&mut self) {
        self.pages_visited += 1;
        self.last_page_index_seen = Some(self.current_page_index);
        self.visited.insert(self.current_page_index);
    }

    /// Whether a page index was already fetched in this run
    pub fn has_visited(&self, page_index: u32) -> bool {
        self.visited.contains(&page_index)
    }

    /// Move to the next page
    pub fn advance(&mut self, page_index: u32) {
        self.current_page_index = page_index;
    }

    pub fn add_seen(&mut self, count: u64) {
        self.items_seen += count;
    }

    pub fn add_emitted(&mut self, count: u64) {
        self.items_emitted += count;
    }

    pub fn add_failed(&mut self, count: u64) {
        self.items_failed += count;
    }
}
