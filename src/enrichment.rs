//! Cross-resource name lookup
//!
//! Drains a secondary paginated resource into an id → name map before the
//! primary traversal starts. Any failure degrades to an empty map.

use crate::engine::{ItemContext, ItemOutcome, ItemVisitor, PageSource, TraversalEngine};
use crate::envelope::fields;
use crate::error::Result;
use crate::pagination::PagePlan;
use crate::retry::RetryPolicy;
use crate::types::Record;
use async_trait::async_trait;
use std::collections::HashMap;
use tracing::{error, info};

/// Name used when an id is not in the map
pub const UNKNOWN: &str = "unknown";

/// Keys identifying a motel chain
pub const CHAIN_ID_KEYS: &[&str] = &["motelChainId", "id"];

/// Keys naming a motel chain, most specific first
pub const CHAIN_NAME_KEYS: &[&str] = &["motelChainName", "displayName", "displyaName"];

/// Read-only id → display name map
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnrichmentMap {
    names: HashMap<String, String>,
}

impl EnrichmentMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: impl Into<String>, name: impl Into<String>) {
        self.names.insert(id.into(), name.into());
    }

    pub fn get(&self, id: &str) -> Option<&str> {
        self.names.get(id).map(String::as_str)
    }

    /// Name for `id`, or [`UNKNOWN`]
    pub fn resolve(&self, id: Option<&str>) -> &str {
        id.and_then(|id| self.get(id)).unwrap_or(UNKNOWN)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl FromIterator<(String, String)> for EnrichmentMap {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            names: iter.into_iter().collect(),
        }
    }
}

/// Which fields of the secondary resource form the map
#[derive(Debug, Clone, Copy)]
pub struct LookupKeys<'k> {
    pub id_keys: &'k [&'k str],
    pub name_keys: &'k [&'k str],
}

impl LookupKeys<'static> {
    /// Motel chain id → chain name
    pub fn motel_chains() -> Self {
        Self {
            id_keys: CHAIN_ID_KEYS,
            name_keys: CHAIN_NAME_KEYS,
        }
    }
}

struct Collector<'k> {
    keys: LookupKeys<'k>,
    map: EnrichmentMap,
}

#[async_trait]
impl ItemVisitor for Collector<'_> {
    async fn visit(&mut self, record: &Record, _ctx: &ItemContext) -> Result<ItemOutcome> {
        let id = fields::text(record, self.keys.id_keys);
        let name = fields::text(record, self.keys.name_keys);
        match (id, name) {
            (Some(id), Some(name)) => {
                self.map.insert(id, name);
                Ok(ItemOutcome::one_emitted())
            }
            _ => Ok(ItemOutcome::nothing()),
        }
    }
}

/// Drain every page of `source` into a map; errors propagate
pub async fn try_build(
    source: &dyn PageSource,
    plan: PagePlan,
    retry: &RetryPolicy,
    keys: LookupKeys<'_>,
) -> Result<EnrichmentMap> {
    let mut collector = Collector {
        keys,
        map: EnrichmentMap::new(),
    };
    TraversalEngine::new(source, plan)
        .with_retry(retry.clone())
        .run(&mut collector)
        .await?;
    Ok(collector.map)
}

/// Like [`try_build`], but any failure yields an empty map
pub async fn build(
    source: &dyn PageSource,
    plan: PagePlan,
    retry: &RetryPolicy,
    keys: LookupKeys<'_>,
) -> EnrichmentMap {
    match try_build(source, plan, retry, keys).await {
        Ok(map) => {
            info!(event = "chain_lookup_ready", source = source.name(), size = map.len());
            map
        }
        Err(err) => {
            error!(
                event = "chain_lookup_failed",
                source = source.name(),
                status = err.status(),
                error = %err,
            );
            EnrichmentMap::new()
        }
    }
}
