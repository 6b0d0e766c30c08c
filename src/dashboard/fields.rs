//! Prioritized field lookup over loosely shaped records.
//!
//! The same logical field shows up under different names depending on which
//! client wrote the row (`patient_name` vs `name`, `riskLevel` vs
//! `risk_level`). Lookups take an ordered list of candidate keys and return
//! the first one that is present and not `null`. Falsy values such as `0`,
//! `""` or `false` are data and win over later candidates.

use serde_json::Value;

use crate::store::Record;

/// First present, non-null value among `keys`, in priority order.
pub fn resolve<'a>(record: &'a Record, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| record.get(*key))
        .find(|value| !value.is_null())
}

/// Like [`resolve`], coerced to text with [`value_text`].
pub fn resolve_text(record: &Record, keys: &[&str]) -> Option<String> {
    resolve(record, keys).and_then(value_text)
}

/// String form of a scalar value used for display and key comparison.
///
/// Strings are returned as-is, numbers and booleans in their JSON text form.
/// `null` has no text. Arrays and objects fall back to compact JSON.
pub fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Array(_) | Value::Object(_) => Some(value.to_string()),
    }
}
