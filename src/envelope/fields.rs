//! Tolerant field access on opaque records
//!
//! Upstream payloads mix numbers and numeric strings, and some keys are
//! known to appear under alternate or misspelled names. These helpers try
//! each candidate key in order and never fail.

use serde_json::Value;

/// Display-name keys, including the misspelling some endpoints return
pub const DISPLAY_NAME_KEYS: &[&str] = &["displayName", "displyaName"];

/// Creation timestamp keys
pub const CREATED_AT_KEYS: &[&str] = &["createdAt", "created_at"];

/// Update timestamp keys
pub const UPDATED_AT_KEYS: &[&str] = &["updatedAt", "updated_at"];

/// First non-empty value among `keys`, rendered as text.
///
/// Strings are returned as-is, numbers and booleans are rendered.
/// Null, empty strings, arrays and objects are skipped.
pub fn text(record: &Value, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| match record.get(*key)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    })
}

/// Single-key shorthand for [`text`]
pub fn str_field(record: &Value, key: &str) -> Option<String> {
    text(record, &[key])
}

/// Raw value of the first present, non-null key
pub fn value<'a>(record: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .find_map(|key| record.get(*key).filter(|v| !v.is_null()))
}

/// Integer from a JSON number or numeric string
pub fn int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Non-negative integer from a JSON number or numeric string
pub fn uint(value: &Value) -> Option<u32> {
    int(value).and_then(|n| u32::try_from(n).ok())
}

/// Loose boolean: `true`, `"1"`/`"true"`/`"yes"`, or a non-zero number.
///
/// Missing and null count as false.
pub fn truthy(value: Option<&Value>) -> bool {
    match value {
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => matches!(s.to_ascii_lowercase().as_str(), "1" | "true" | "yes"),
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
        _ => false,
    }
}

/// Lowercased, trimmed `status` field (empty when absent)
pub fn status(record: &Value) -> String {
    str_field(record, "status")
        .map(|s| s.trim().to_lowercase())
        .unwrap_or_default()
}
