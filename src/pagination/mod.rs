//! Pagination module
//!
//! Supports: offset-style (motel API) and cursor-style (reservation API)
//!
//! # Overview
//!
//! Both conventions are normalized into one decision per page: stop, or
//! continue at a given index. The schema is fixed per endpoint family by a
//! [`PagePlan`]; the response only supplies the numbers.

mod cursor;
mod types;

pub use cursor::{decide, is_last_page, next_index};
pub use types::{
    NextPage, PagePlan, PageRequest, PaginationMeta, PaginationSchema, StopReason,
    TraversalState,
};
