//! Creation flows against the motel API
//!
//! Each flow crawls one list endpoint and turns every accepted record into
//! zero or more creation calls. Failed creations are logged and counted;
//! page fetch failures end the run.

use super::motels::{MOTELS_PATH, ROOM_CATEGORIES_PATH};
use super::ScenarioContext;
use crate::config::{MotelTemplate, RoomCategorySeed, RoomSeed};
use crate::count::{self, MOTEL_COUNT_PATH};
use crate::engine::{
    CreateVisitor, HttpCreator, HttpPageSource, Mutation, StatusFilter, TraversalReport,
};
use crate::envelope;
use crate::envelope::fields::{self, CREATED_AT_KEYS, UPDATED_AT_KEYS};
use crate::error::{Error, Result};
use crate::generators::{self, CategoryIds};
use crate::guard;
use crate::retry::retry_transient;
use crate::types::Record;
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{error, info, warn};

pub const MOTEL_CHAINS_POST_PATH: &str = "/motelApi/v1/motels/chains";

fn is_active(record: &Record) -> bool {
    fields::status(record) == "active"
}

fn log_failure(event: &'static str, payload: &Value, err: &Error) {
    error!(
        event = event,
        http_status = err.status(),
        error = %err,
        payload = %payload,
    );
}

// ============================================================================
// Motel Chains
// ============================================================================

/// Create one random motel chain
pub async fn post_motel_chain(ctx: &ScenarioContext) -> Result<Value> {
    let payload = generators::motel_chain_payload();
    info!(event = "post_motel_chain_payload", payload = %payload);

    let reply = retry_transient(&ctx.retry, MOTEL_CHAINS_POST_PATH, || {
        ctx.client.post_json(MOTEL_CHAINS_POST_PATH, &payload)
    })
    .await
    .inspect_err(|err| log_failure("post_motel_chain_failed", &payload, err))?;

    let created = envelope::created_record(&reply);
    info!(
        event = "post_motel_chain_success",
        id = fields::text(created, &["motelChainId", "id"]),
        motelChainName = fields::str_field(&payload, "motelChainName"),
    );
    Ok(reply)
}

// ============================================================================
// Motels From Chains
// ============================================================================

struct MotelFromChain<'a> {
    filter: StatusFilter,
    template: &'a MotelTemplate,
}

impl Mutation for MotelFromChain<'_> {
    fn accept(&self, chain: &Record) -> bool {
        self.filter.accepts(chain)
    }

    fn payloads(&self, chain: &Record) -> Vec<Value> {
        vec![generators::motel_from_chain(chain, self.template)]
    }

    fn on_created(&self, payload: &Value, reply: &Value) {
        let created = envelope::created_record(reply);
        info!(
            event = "motel_created",
            motelChainId = fields::str_field(payload, "motelChainId"),
            motelName = fields::str_field(payload, "motelName"),
            state = fields::str_field(payload, "state"),
            pincode = fields::str_field(payload, "pincode"),
            motelId = fields::text(created, &["motelId", "id"]),
            createdAt = fields::text(created, CREATED_AT_KEYS),
            updatedAt = fields::text(created, UPDATED_AT_KEYS),
        );
    }

    fn on_failed(&self, payload: &Value, err: &Error) {
        log_failure("motel_create_failed", payload, err);
    }
}

/// Create one motel per eligible chain, unless the motel ceiling is reached
pub async fn post_motel_from_chain(ctx: &ScenarioContext) -> Result<TraversalReport> {
    let max_allowed = ctx.config.max_motels;
    let decision = guard::check_and_gate(&ctx.retry, max_allowed, || {
        count::fetch_table_count(&ctx.client, MOTEL_COUNT_PATH, "motels")
    })
    .await;

    if decision.proceed {
        info!(
            event = "post_motel_from_chain_proceeding",
            current_count = decision.current_count,
            max_allowed,
            verified = decision.verified,
        );
    } else {
        info!(
            event = "post_motel_from_chain_skipped",
            reason = "maximum_motels_reached",
            current_count = decision.current_count,
            max_allowed,
        );
    }

    let source = HttpPageSource::new(&ctx.client, ctx.config.chain_get_path.as_str());
    let creator = HttpCreator::new(&ctx.client, MOTELS_PATH);
    let mutation = MotelFromChain {
        filter: StatusFilter::only(&ctx.config.chain_allowed_status),
        template: &ctx.config.motel,
    };
    let status_filter = mutation.filter.describe();
    let mut visitor = CreateVisitor::new(&creator, mutation).with_retry(ctx.retry.clone());

    let report = ctx
        .engine(&source, ctx.motel_plan())
        .run_guarded(&mut visitor, decision)
        .await?;

    if !report.was_skipped() {
        info!(
            event = "post_motel_from_chain_all_done",
            pages_traversed_up_to = report.last_page_index,
            chains_seen = report.items_seen,
            motels_posted = report.items_emitted,
            motels_failed = report.items_failed,
            status_filter = %status_filter,
        );
    }
    Ok(report)
}

// ============================================================================
// Room Categories
// ============================================================================

struct CategoriesForMotel<'a> {
    seed: &'a RoomCategorySeed,
    motels_processed: AtomicU64,
}

impl Mutation for CategoriesForMotel<'_> {
    fn accept(&self, motel: &Record) -> bool {
        !self.seed.only_active || is_active(motel)
    }

    fn payloads(&self, motel: &Record) -> Vec<Value> {
        let motel_id = fields::str_field(motel, "motelId");
        let chain_id = fields::str_field(motel, "motelChainId");
        let (Some(motel_id), Some(chain_id)) = (motel_id, chain_id) else {
            warn!(event = "motels_missing_ids", record = %motel);
            return Vec::new();
        };

        self.motels_processed.fetch_add(1, Ordering::Relaxed);
        self.seed
            .categories
            .iter()
            .map(|def| {
                generators::room_category_payload(&motel_id, &chain_id, def, &self.seed.status)
            })
            .collect()
    }

    fn on_created(&self, payload: &Value, reply: &Value) {
        let created = envelope::created_record(reply);
        info!(
            event = "room_category_created",
            motelId = fields::str_field(payload, "motelId"),
            motelChainId = fields::str_field(payload, "motelChainId"),
            roomCategoryName = fields::str_field(payload, "roomCategoryName"),
            motelRoomCategoryId = fields::text(created, &["motelRoomCategoryId", "id"])
                .or_else(|| fields::str_field(payload, "motelRoomCategoryId")),
            createdAt = fields::text(created, CREATED_AT_KEYS),
        );
    }

    fn on_failed(&self, payload: &Value, err: &Error) {
        log_failure("room_category_create_failed", payload, err);
    }
}

/// Create the configured room categories for every motel
pub async fn seed_room_categories(ctx: &ScenarioContext) -> Result<TraversalReport> {
    let seed = &ctx.config.room_categories;
    let source = HttpPageSource::new(&ctx.client, MOTELS_PATH);
    let creator = HttpCreator::new(&ctx.client, seed.path.as_str());
    let mutation = CategoriesForMotel {
        seed,
        motels_processed: AtomicU64::new(0),
    };
    let mut visitor = CreateVisitor::new(&creator, mutation).with_retry(ctx.retry.clone());

    let report = ctx.engine(&source, ctx.motel_plan()).run(&mut visitor).await?;
    info!(
        event = "seed_room_categories_done",
        motels_processed = visitor.mutation().motels_processed.load(Ordering::Relaxed),
        total_categories_posted = report.items_emitted,
        total_categories_failed = report.items_failed,
        pages_traversed_up_to = report.last_page_index,
    );
    Ok(report)
}

// ============================================================================
// Rooms
// ============================================================================

struct RoomsForCategory<'a> {
    seed: &'a RoomSeed,
    categories_processed: AtomicU64,
}

impl Mutation for RoomsForCategory<'_> {
    fn accept(&self, category: &Record) -> bool {
        !self.seed.only_active_categories || is_active(category)
    }

    fn payloads(&self, category: &Record) -> Vec<Value> {
        match CategoryIds::from_record(category) {
            Some(ids) => {
                self.categories_processed.fetch_add(1, Ordering::Relaxed);
                generators::room_payloads(&ids, self.seed)
            }
            None => {
                warn!(event = "room_category_missing_ids", record = %category);
                Vec::new()
            }
        }
    }

    fn on_created(&self, payload: &Value, reply: &Value) {
        let created = envelope::created_record(reply);
        info!(
            event = "motel_room_created",
            motelId = fields::str_field(payload, "motelId"),
            motelChainId = fields::str_field(payload, "motelChainId"),
            motelRoomCategoryId = fields::str_field(payload, "motelRoomCategoryId"),
            roomNumber = fields::str_field(payload, "roomNumber"),
            floor = fields::str_field(payload, "floor"),
            roomId = fields::text(created, &["roomId", "id"]),
            updated_at = fields::text(created, UPDATED_AT_KEYS),
        );
    }

    fn on_failed(&self, payload: &Value, err: &Error) {
        log_failure("motel_room_create_failed", payload, err);
    }
}

/// Create rooms on every configured floor of every room category
pub async fn seed_motel_rooms(ctx: &ScenarioContext) -> Result<TraversalReport> {
    let seed = &ctx.config.rooms;
    let source = HttpPageSource::new(&ctx.client, ROOM_CATEGORIES_PATH);
    let creator = HttpCreator::new(&ctx.client, seed.post_path.as_str());
    let mutation = RoomsForCategory {
        seed,
        categories_processed: AtomicU64::new(0),
    };
    let mut visitor = CreateVisitor::new(&creator, mutation).with_retry(ctx.retry.clone());

    let report = ctx.engine(&source, ctx.motel_plan()).run(&mut visitor).await?;
    info!(
        event = "seed_motel_rooms_done",
        categories_processed = visitor.mutation().categories_processed.load(Ordering::Relaxed),
        total_rooms_posted = report.items_emitted,
        total_rooms_failed = report.items_failed,
        floors = %format!("{}-{}", seed.floor_start, seed.floor_end),
        rooms_per_floor = seed.rooms_per_floor,
    );
    Ok(report)
}
