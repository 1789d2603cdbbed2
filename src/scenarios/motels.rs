//! Read-only motel API crawls

use super::ScenarioContext;
use crate::count::{self, CountSummary, MOTEL_COUNT_PATH};
use crate::engine::{EmitVisitor, HttpPageSource, ItemContext, TraversalReport};
use crate::enrichment::{self, EnrichmentMap, LookupKeys, CHAIN_NAME_KEYS};
use crate::envelope::fields::{self, CREATED_AT_KEYS, DISPLAY_NAME_KEYS};
use crate::error::Result;
use crate::retry::retry_transient;
use crate::types::Record;
use tracing::{error, info};

pub const MOTEL_CHAINS_PATH: &str = "/motelApi/v1/motelChains";
pub const MOTELS_PATH: &str = "/motelApi/v1/motels";
pub const MOTEL_ROOMS_PATH: &str = "/motelApi/v1/motelRooms";
pub const ROOM_CATEGORIES_PATH: &str = "/motelApi/v1/motelRoomCategories";

/// Log every motel chain name
pub async fn get_motel_chains(ctx: &ScenarioContext) -> Result<TraversalReport> {
    let source = HttpPageSource::new(&ctx.client, MOTEL_CHAINS_PATH);
    let mut visitor = EmitVisitor::new(|chain: &Record, item: &ItemContext| {
        info!(
            event = "motel_chain_name",
            page = item.page_index,
            motelChainId = fields::str_field(chain, "motelChainId"),
            motelChainName = fields::text(chain, CHAIN_NAME_KEYS),
        );
    });

    let report = ctx.engine(&source, ctx.motel_plan()).run(&mut visitor).await?;
    info!(
        event = "motel_chain_paging_done",
        pages_traversed_up_to = report.last_page_index,
        total_names_logged = report.items_emitted,
    );
    Ok(report)
}

/// Chain id → name map for motel listings. Empty when disabled or when the
/// lookup fails.
pub async fn chain_lookup(ctx: &ScenarioContext) -> EnrichmentMap {
    if !ctx.config.chain_lookup {
        return EnrichmentMap::new();
    }
    let source = HttpPageSource::new(&ctx.client, ctx.config.chain_get_path.as_str());
    enrichment::build(&source, ctx.motel_plan(), &ctx.retry, LookupKeys::motel_chains()).await
}

/// Chain name for a motel: its own `motelChainName`, else the lookup
pub fn motel_chain_name(motel: &Record, chains: &EnrichmentMap) -> String {
    fields::str_field(motel, "motelChainName").unwrap_or_else(|| {
        let chain_id = fields::str_field(motel, "motelChainId");
        chains.resolve(chain_id.as_deref()).to_string()
    })
}

/// Log every motel, with its chain name resolved through a chain lookup
pub async fn get_motels(ctx: &ScenarioContext) -> Result<TraversalReport> {
    let chains = chain_lookup(ctx).await;

    let source = HttpPageSource::new(&ctx.client, MOTELS_PATH);
    let mut visitor = EmitVisitor::new(|motel: &Record, item: &ItemContext| {
        let chain_id = fields::str_field(motel, "motelChainId");
        let chain_name = motel_chain_name(motel, &chains);
        info!(
            event = "motel_record",
            page = item.page_index,
            motelId = fields::str_field(motel, "motelId"),
            motelChainId = chain_id,
            motelChainName = chain_name,
            state = fields::str_field(motel, "state"),
            pincode = fields::str_field(motel, "pincode"),
            status = fields::str_field(motel, "status"),
        );
    });

    let report = ctx.engine(&source, ctx.motel_plan()).run(&mut visitor).await?;
    info!(
        event = "motels_paging_done",
        pages_traversed_up_to = report.last_page_index,
        total_records_logged = report.items_emitted,
        chain_lookup_size = chains.len(),
    );
    Ok(report)
}

/// Log every motel room
pub async fn get_motel_rooms(ctx: &ScenarioContext) -> Result<TraversalReport> {
    let source = HttpPageSource::new(&ctx.client, MOTEL_ROOMS_PATH);
    let mut visitor = EmitVisitor::new(|room: &Record, item: &ItemContext| {
        info!(
            event = "motel_room",
            page = item.page_index,
            roomId = fields::text(room, &["roomId", "id"]),
            created_at = fields::text(room, CREATED_AT_KEYS),
            motelId = fields::str_field(room, "motelId"),
            motelChainId = fields::str_field(room, "motelChainId"),
            roomNumber = fields::str_field(room, "roomNumber"),
            floor = fields::str_field(room, "floor"),
            status = fields::str_field(room, "status"),
        );
    });

    let report = ctx.engine(&source, ctx.motel_plan()).run(&mut visitor).await?;
    info!(
        event = "motel_rooms_paging_done",
        pages_traversed_up_to = report.last_page_index,
        total_records_logged = report.items_emitted,
    );
    Ok(report)
}

/// Log every room category (single, unpaginated list)
pub async fn get_room_categories(ctx: &ScenarioContext) -> Result<TraversalReport> {
    let source = HttpPageSource::new(&ctx.client, ROOM_CATEGORIES_PATH);
    let mut visitor = EmitVisitor::new(|category: &Record, _item: &ItemContext| {
        info!(
            event = "room_category",
            motelId = fields::str_field(category, "motelId"),
            motelChainId = fields::str_field(category, "motelChainId"),
            displayName = fields::text(category, DISPLAY_NAME_KEYS),
            roomCategoryName = fields::str_field(category, "roomCategoryName"),
            motelRoomCategoryId = fields::str_field(category, "motelRoomCategoryId"),
            status = fields::str_field(category, "status"),
        );
    });

    let report = ctx.engine(&source, ctx.motel_plan()).run(&mut visitor).await?;
    info!(event = "room_categories_done", total_logged = report.items_emitted);
    Ok(report)
}

/// Report every table count
pub async fn get_motels_count(ctx: &ScenarioContext) -> Result<CountSummary> {
    let url = ctx.client.url(MOTEL_COUNT_PATH);
    info!(event = "get_motels_count_request", url = %url, method = "GET");

    let result = retry_transient(&ctx.retry, MOTEL_COUNT_PATH, || {
        count::fetch_summary(&ctx.client, MOTEL_COUNT_PATH)
    })
    .await;

    match result {
        Ok(summary) => {
            info!(
                event = "get_motels_count_success",
                motel_chains = summary.get("motel_chains"),
                motels = summary.get("motels"),
                rooms = summary.get("rooms"),
                room_categories = summary.get("room_categories"),
                total_postgresql_records = summary.total_postgresql_records,
                note = %summary.note,
            );
            Ok(summary)
        }
        Err(err) => {
            error!(
                event = "get_motels_count_failed",
                url = %url,
                status_code = err.status(),
                error_type = err.kind(),
                error = %err,
            );
            Err(err)
        }
    }
}
