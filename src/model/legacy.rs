//! Identifier probing for records written before the store exposed a typed `id`.
//!
//! Older records carry their key under one of several names, or only positionally. This shim
//! scans for the first present candidate. Nothing outside record decoding should call it.

use crate::model::RecordId;
use serde_json::Value;

/// Field names that may hold a record's key, in priority order.
const CANDIDATE_FIELDS: &[&str] = &["id", "row", "rowNumber", "timestamp", "index"];

/// Returns the first present identifier of a record of unknown shape: one of the candidate fields,
/// otherwise the first positional field (`"0"` on an object or element 0 of an array).
pub(crate) fn find_id(record: &Value) -> Option<RecordId> {
    match record {
        Value::Object(map) => CANDIDATE_FIELDS
            .iter()
            .chain(std::iter::once(&"0"))
            .find_map(|name| map.get(*name).and_then(RecordId::from_json)),
        Value::Array(items) => items.first().and_then(RecordId::from_json),
        _ => None,
    }
}
