//! Response envelope extraction
//!
//! Every endpoint wraps its payload as `{"response": {"http_code", "data"}}`,
//! but list endpoints disagree on where the items live:
//!
//! - `response.data.content` with `response.data.pagination` (motel API)
//! - `response.data` as a bare list, no pagination (single page)
//! - `response.data.data` with `response.data.pagination` (reservation API)
//!
//! [`extract`] resolves a body into a closed set of outcomes instead of
//! failing on shape mismatch. Callers treat all of them as a page, possibly
//! empty; nothing here ever returns an error.

pub mod fields;

use crate::pagination::{PaginationMeta, PaginationSchema};
use crate::types::Record;
use serde_json::Value;

/// Outcome of reading a list response
#[derive(Debug, Clone, PartialEq)]
pub enum Envelope {
    /// A known shape with an item list (which may be empty)
    Found {
        items: Vec<Record>,
        pagination: Option<PaginationMeta>,
    },
    /// A known envelope that carries no item list
    EmptyPage { pagination: Option<PaginationMeta> },
    /// The body does not match any known shape
    Malformed { reason: &'static str },
}

impl Envelope {
    /// Items on this page (empty unless `Found`)
    pub fn items(&self) -> &[Record] {
        match self {
            Self::Found { items, .. } => items,
            _ => &[],
        }
    }

    /// Pagination block, if one was present and parseable
    pub fn pagination(&self) -> Option<&PaginationMeta> {
        match self {
            Self::Found { pagination, .. } | Self::EmptyPage { pagination } => pagination.as_ref(),
            Self::Malformed { .. } => None,
        }
    }

    /// Split into items and pagination
    pub fn into_parts(self) -> (Vec<Record>, Option<PaginationMeta>) {
        match self {
            Self::Found { items, pagination } => (items, pagination),
            Self::EmptyPage { pagination } => (Vec::new(), pagination),
            Self::Malformed { .. } => (Vec::new(), None),
        }
    }

    /// Check if the body matched no known shape
    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::Malformed { .. })
    }

    /// Short label for events
    pub fn label(&self) -> &'static str {
        match self {
            Self::Found { .. } => "found",
            Self::EmptyPage { .. } => "empty_page",
            Self::Malformed { reason } => reason,
        }
    }
}

/// Read a list response under the endpoint's pagination schema
pub fn extract(body: &Value, schema: PaginationSchema) -> Envelope {
    let Some(response) = body.get("response").filter(|r| r.is_object()) else {
        return Envelope::Malformed {
            reason: "missing_response",
        };
    };

    let data = match response.get("data") {
        None => {
            return Envelope::Malformed {
                reason: "missing_data",
            }
        }
        Some(Value::Null) => return Envelope::EmptyPage { pagination: None },
        Some(data) => data,
    };

    match data {
        Value::Array(items) => Envelope::Found {
            items: items.clone(),
            pagination: None,
        },
        Value::Object(obj) => {
            let pagination = obj.get("pagination").and_then(|p| schema.parse(p));

            // content first, then the double-nested data list
            for key in ["content", "data"] {
                match obj.get(key) {
                    Some(Value::Array(items)) => {
                        return Envelope::Found {
                            items: items.clone(),
                            pagination,
                        }
                    }
                    None | Some(Value::Null) => {}
                    Some(_) => {
                        return Envelope::Malformed {
                            reason: "items_not_a_list",
                        }
                    }
                }
            }
            Envelope::EmptyPage { pagination }
        }
        _ => Envelope::Malformed {
            reason: "data_not_a_list_or_object",
        },
    }
}

/// `response.data`, whatever its type
pub fn data(body: &Value) -> Option<&Value> {
    body.get("response")?.get("data")
}

/// `response.http_code` as text, so `200` and `"200"` compare equal
pub fn http_code(body: &Value) -> Option<String> {
    match body.get("response")?.get("http_code")? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Fields of a freshly created resource.
///
/// Creation responses come as `response.data.data`, `response.data`, or a
/// flat object; the first object found is used.
pub fn created_record(body: &Value) -> &Value {
    static EMPTY: Value = Value::Null;

    let data = data(body);
    let nested = data.and_then(|d| d.get("data")).filter(|d| d.is_object());

    nested
        .or_else(|| data.filter(|d| d.is_object()))
        .or_else(|| Some(body).filter(|b| b.is_object() && b.get("response").is_none()))
        .unwrap_or(&EMPTY)
}
