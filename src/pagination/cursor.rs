//! Termination and advance decisions
//!
//! The two conventions define "total pages" differently: offset-style stops
//! at `total_pages - 1`, cursor-style at `total_pages`. Both formulas are
//! kept exactly as the upstream APIs behave.

use super::types::{NextPage, PaginationMeta, StopReason, TraversalState};

/// Whether `current_index` is the last page.
///
/// An absent pagination block means a single page. Offset-style compares
/// the locally tracked index; cursor-style compares the reported
/// `current_page` when present.
pub fn is_last_page(meta: Option<&PaginationMeta>, current_index: u32) -> bool {
    match meta {
        None => true,
        Some(PaginationMeta::Offset {
            last, total_pages, ..
        }) => {
            // current >= total - 1, without underflow when total is 0
            *last
                || total_pages
                    .is_some_and(|total| u64::from(current_index) + 1 >= u64::from(total))
        }
        Some(PaginationMeta::Cursor {
            current_page,
            has_next,
            total_pages,
        }) => {
            // cursor APIs are judged by the page they say they served
            let served = current_page.unwrap_or(current_index);
            !*has_next || total_pages.is_some_and(|total| served >= total)
        }
    }
}

/// Index of the page after `current_index`.
///
/// Trusts the page number the server reported; falls back to the locally
/// tracked index when the block omits it.
pub fn next_index(meta: Option<&PaginationMeta>, current_index: u32) -> u32 {
    let reported = match meta {
        Some(PaginationMeta::Offset { page, .. }) => *page,
        Some(PaginationMeta::Cursor { current_page, .. }) => *current_page,
        None => None,
    };
    reported.unwrap_or(current_index).saturating_add(1)
}

/// Combined decision for the engine, including loop safety.
///
/// Never advances to the current page or to a page already visited in
/// this run.
pub fn decide(meta: Option<&PaginationMeta>, state: &TraversalState) -> NextPage {
    let current = state.current_page_index;

    if meta.is_none() {
        return NextPage::Done(StopReason::NoPagination);
    }
    if is_last_page(meta, current) {
        return NextPage::Done(StopReason::LastPage);
    }

    let next = next_index(meta, current);
    if next == current || state.has_visited(next) {
        return NextPage::Done(StopReason::RepeatedPage);
    }
    NextPage::Continue(next)
}
