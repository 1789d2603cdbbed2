//! Table counts
//!
//! `GET /motelApi/v1/allMotels/count` returns
//! `response.data.postgresql_tables.<entity>` per table plus a grand total.

use crate::envelope::{self, fields};
use crate::error::Result;
use crate::http::HttpClient;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// Count endpoint of the motel API
pub const MOTEL_COUNT_PATH: &str = "/motelApi/v1/allMotels/count";

/// Count of one table, 0 when the body does not report it
pub fn table_count(body: &Value, entity: &str) -> u64 {
    tables(body)
        .and_then(|t| t.get(entity))
        .and_then(fields::int)
        .and_then(|n| u64::try_from(n).ok())
        .unwrap_or(0)
}

fn tables(body: &Value) -> Option<&Value> {
    envelope::data(body)?.get("postgresql_tables")
}

/// Every count the endpoint reports
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CountSummary {
    pub tables: BTreeMap<String, u64>,
    pub total_postgresql_records: u64,
    pub note: String,
}

impl CountSummary {
    pub fn from_body(body: &Value) -> Self {
        let tables = tables(body)
            .and_then(Value::as_object)
            .map(|obj| {
                obj.iter()
                    .filter_map(|(name, v)| {
                        let n = fields::int(v).and_then(|n| u64::try_from(n).ok())?;
                        Some((name.clone(), n))
                    })
                    .collect()
            })
            .unwrap_or_default();

        let data = envelope::data(body);
        Self {
            tables,
            total_postgresql_records: data
                .and_then(|d| d.get("total_postgresql_records"))
                .and_then(fields::int)
                .and_then(|n| u64::try_from(n).ok())
                .unwrap_or(0),
            note: data
                .and_then(|d| fields::str_field(d, "note"))
                .unwrap_or_default(),
        }
    }

    /// Count of one table, 0 when missing
    pub fn get(&self, entity: &str) -> u64 {
        self.tables.get(entity).copied().unwrap_or(0)
    }
}

/// Fetch the count of one table (single attempt)
pub async fn fetch_table_count(client: &HttpClient, path: &str, entity: &str) -> Result<u64> {
    let body = client.get_json(path, &[]).await?;
    Ok(table_count(&body, entity))
}

/// Fetch the full count report (single attempt)
pub async fn fetch_summary(client: &HttpClient, path: &str) -> Result<CountSummary> {
    let body = client.get_json(path, &[]).await?;
    Ok(CountSummary::from_body(&body))
}
