//! Reservation API crawls and booking
//!
//! The reservation API pages with `page`/`per_page` starting at 1 and
//! reports `has_next`, so every crawl here uses the cursor plan.

use super::{ScenarioContext, TaskOutcome};
use crate::engine::{
    EmitVisitor, HttpPageSource, ItemContext, ItemOutcome, ItemVisitor, TraversalReport,
};
use crate::envelope;
use crate::envelope::fields::{self, CREATED_AT_KEYS, UPDATED_AT_KEYS};
use crate::error::Result;
use crate::generators;
use crate::retry::retry_transient;
use crate::types::Record;
use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use tracing::{error, info, warn};

pub const AVAILABILITY_PATH: &str = "/reservationApi/v1/allMotels";
pub const BOOKINGS_PATH: &str = "/reservationApi/v1/allbookings";
pub const RESERVATION_PATH: &str = "/reservationApi/v1/reservation";

/// Price as a number, when it parses as one
fn price_num(record: &Record) -> Option<f64> {
    match record.get("price")? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Log every availability record
pub async fn reservation_all_motels(ctx: &ScenarioContext) -> Result<TraversalReport> {
    let source = HttpPageSource::new(&ctx.client, AVAILABILITY_PATH);
    let mut visitor = EmitVisitor::new(|item: &Record, at: &ItemContext| {
        info!(
            event = "reservation_availability",
            page = at.page_index,
            room_type = fields::str_field(item, "room_type"),
            price = fields::str_field(item, "price"),
            price_num = price_num(item),
            date = fields::str_field(item, "date"),
            status = fields::str_field(item, "status"),
            available_room_number = fields::str_field(item, "available_room_number"),
            motel_id = fields::str_field(item, "motel_id"),
            motel_chain_id = fields::str_field(item, "motel_chain_id"),
            motel_room_category_id = fields::str_field(item, "motel_room_category_id"),
        );
    });

    let report = ctx
        .engine(&source, ctx.reservation_plan())
        .run(&mut visitor)
        .await?;
    info!(
        event = "reservation_all_motels_done",
        pages_visited = report.pages_visited,
        total_records_logged = report.items_emitted,
    );
    Ok(report)
}

/// Log every booking
pub async fn reservation_all_bookings(ctx: &ScenarioContext) -> Result<TraversalReport> {
    let source = HttpPageSource::new(&ctx.client, BOOKINGS_PATH);
    let mut visitor = EmitVisitor::new(|booking: &Record, at: &ItemContext| {
        info!(
            event = "reservation_booking",
            page = at.page_index,
            motel_room_category_name = fields::str_field(booking, "motel_room_category_name"),
            motel_reservation_id = fields::str_field(booking, "motel_reservation_id"),
            status = fields::str_field(booking, "status"),
            price = fields::str_field(booking, "price"),
            check_in = fields::str_field(booking, "check_in"),
            check_out = fields::str_field(booking, "check_out"),
        );
    });

    let report = ctx
        .engine(&source, ctx.reservation_plan())
        .run(&mut visitor)
        .await?;
    info!(
        event = "reservation_all_bookings_done",
        pages_visited = report.pages_visited,
        total_records_logged = report.items_emitted,
    );
    Ok(report)
}

// ============================================================================
// Search Then Act
// ============================================================================

/// Stops the crawl at the first record satisfying `pick`
struct FirstMatch<F> {
    pick: F,
    found: Option<Record>,
}

impl<F> FirstMatch<F>
where
    F: Fn(&Record) -> bool + Send + Sync,
{
    fn new(pick: F) -> Self {
        Self { pick, found: None }
    }
}

#[async_trait]
impl<F> ItemVisitor for FirstMatch<F>
where
    F: Fn(&Record) -> bool + Send + Sync,
{
    fn accept(&self, record: &Record) -> bool {
        (self.pick)(record)
    }

    async fn visit(&mut self, record: &Record, _ctx: &ItemContext) -> Result<ItemOutcome> {
        self.found = Some(record.clone());
        Ok(ItemOutcome::one_emitted().then_stop())
    }
}

fn booking_ids(booking: &Record) -> Option<(String, String)> {
    Some((
        fields::str_field(booking, "motel_id")?,
        fields::str_field(booking, "motel_chain_id")?,
    ))
}

/// Pick the first booking carrying both ids, then list that motel's reservations
pub async fn reservation_by_ids(ctx: &ScenarioContext) -> Result<TaskOutcome> {
    let source = HttpPageSource::new(&ctx.client, BOOKINGS_PATH);
    let mut search = FirstMatch::new(|booking: &Record| booking_ids(booking).is_some());
    let report = ctx
        .engine(&source, ctx.reservation_plan())
        .run(&mut search)
        .await?;

    let Some((motel_id, motel_chain_id)) = search.found.as_ref().and_then(booking_ids) else {
        error!(event = "reservation_ids_not_found", pages_scanned = report.pages_visited);
        return Ok(TaskOutcome::Search {
            search: report,
            found: false,
            emitted: 0,
            failed: 0,
        });
    };
    info!(
        event = "reservation_ids_selected",
        motel_id = %motel_id,
        motel_chain_id = %motel_chain_id,
    );

    let query = vec![
        ("motel_id".to_string(), motel_id),
        ("motel_chain_id".to_string(), motel_chain_id),
    ];
    let body = retry_transient(&ctx.retry, RESERVATION_PATH, || {
        ctx.client.get_json(RESERVATION_PATH, &query)
    })
    .await?;

    let items = envelope::data(&body)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();
    for it in items {
        info!(
            event = "reservation_by_ids",
            motel_reservation_id = fields::str_field(it, "motel_reservation_id"),
            motel_id = fields::str_field(it, "motel_id"),
            motel_chain_id = fields::str_field(it, "motel_chain_id"),
            motel_room_category_id = fields::str_field(it, "motel_room_category_id"),
            motel_room_category_name = fields::str_field(it, "motel_room_category_name"),
            price = fields::str_field(it, "price"),
            status = fields::str_field(it, "status"),
            name = fields::str_field(it, "name"),
            email = fields::str_field(it, "email"),
            check_in = fields::str_field(it, "check_in"),
            check_out = fields::str_field(it, "check_out"),
            created_at = fields::text(it, &["created_at", "createdAt"]),
            updated_at = fields::text(it, &["updated_at", "updatedAt"]),
        );
    }
    info!(event = "reservation_by_ids_done", total_records_logged = items.len());

    Ok(TaskOutcome::Search {
        search: report,
        found: true,
        emitted: items.len() as u64,
        failed: 0,
    })
}

/// Book one night in the first bookable availability record
pub async fn reservation_from_availability(ctx: &ScenarioContext) -> Result<TaskOutcome> {
    let config = &ctx.config.reservations;
    let source = HttpPageSource::new(&ctx.client, AVAILABILITY_PATH);
    let mut search =
        FirstMatch::new(|candidate: &Record| generators::is_bookable(candidate, config));
    let report = ctx
        .engine(&source, ctx.reservation_plan())
        .run(&mut search)
        .await?;

    let Some(candidate) = search.found else {
        warn!(event = "no_candidate_found", pages_scanned = report.pages_visited);
        error!(event = "reservation_candidate_none");
        return Ok(TaskOutcome::Search {
            search: report,
            found: false,
            emitted: 0,
            failed: 0,
        });
    };

    let payload = generators::reservation_payload(&candidate, config, Utc::now().date_naive());
    let posted = retry_transient(&ctx.retry, RESERVATION_PATH, || {
        ctx.client.post_json(RESERVATION_PATH, &payload)
    })
    .await;

    let (emitted, failed) = match posted {
        Ok(reply) => {
            let created = envelope::created_record(&reply);
            info!(
                event = "reservation_created",
                motel_reservation_id = fields::text(created, &["motel_reservation_id", "id"]),
                created_at = fields::text(created, CREATED_AT_KEYS),
                updated_at = fields::text(created, UPDATED_AT_KEYS),
                motel_id = fields::str_field(&payload, "motel_id"),
                motel_chain_id = fields::str_field(&payload, "motel_chain_id"),
                motel_room_category_id = fields::str_field(&payload, "motel_room_category_id"),
                motel_room_category_name = fields::str_field(&payload, "motel_room_category_name"),
                price = fields::str_field(&payload, "price"),
                check_in = fields::str_field(&payload, "check_in"),
                check_out = fields::str_field(&payload, "check_out"),
            );
            (1, 0)
        }
        Err(err) => {
            error!(
                event = "reservation_create_failed",
                http_status = err.status(),
                error = %err,
                payload = %payload,
            );
            (0, 1)
        }
    };

    Ok(TaskOutcome::Search {
        search: report,
        found: true,
        emitted,
        failed,
    })
}
