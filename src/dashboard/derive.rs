//! Display fields computed at response time.
//!
//! Every derivation here degrades to a fixed fallback instead of failing:
//! a malformed date or identifier must never take the whole response down.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::Value;

/// Shown as the login date when no usable timestamp exists.
pub const PLACEHOLDER_LOGIN_DATE: &str = "2024-01-20";

/// Domain used for synthesized clinician emails.
pub const FALLBACK_EMAIL_DOMAIN: &str = "bloomsense.com";

const NO_SESSIONS: &str = "No sessions yet";
const RECENTLY: &str = "Recently";

const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;
const HASHED_ID_MODULUS: u64 = 1_000_000;

/// Field-level parse failures. Callers map these to fallbacks.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FieldParseError {
    #[error("timestamp is not a string")]
    NotText,
    #[error("unrecognised timestamp: {0}")]
    Timestamp(String),
    #[error("identifier has no 8-digit hex prefix: {0}")]
    HexPrefix(String),
}

const OFFSET_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f%#z", "%Y-%m-%d %H:%M:%S%.f%#z"];
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Parse an ISO-8601 timestamp and drop its zone, keeping the wall-clock time.
///
/// A trailing `Z` is read as `+00:00`. Offsets, naive date-times and bare
/// dates are accepted.
pub fn parse_timestamp(raw: &str) -> Result<NaiveDateTime, FieldParseError> {
    let trimmed = raw.trim();
    let normalized = match trimmed.strip_suffix(['Z', 'z']) {
        Some(head) => format!("{}+00:00", head),
        None => trimmed.to_string(),
    };

    if let Ok(dt) = DateTime::parse_from_rfc3339(&normalized) {
        return Ok(dt.naive_local());
    }
    for format in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(&normalized, format) {
            return Ok(dt.naive_local());
        }
    }
    for format in NAIVE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(&normalized, format) {
            return Ok(dt);
        }
    }
    if let Some(midnight) = NaiveDate::parse_from_str(&normalized, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
    {
        return Ok(midnight);
    }

    Err(FieldParseError::Timestamp(raw.to_string()))
}

fn timestamp_value(value: &Value) -> Result<NaiveDateTime, FieldParseError> {
    match value {
        Value::String(raw) => parse_timestamp(raw),
        _ => Err(FieldParseError::NotText),
    }
}

/// Calendar days between the session's date and `today`.
///
/// Time of day is discarded on both sides, so a session late yesterday and
/// one early yesterday are both one day ago.
pub fn days_since(value: &Value, today: NaiveDate) -> Result<i64, FieldParseError> {
    let session = timestamp_value(value)?;
    Ok((today - session.date()).num_days())
}

/// Human-readable phrase for the most recent session.
///
/// `None` means the record has no session field at all.
pub fn last_session_phrase(value: Option<&Value>, today: NaiveDate) -> String {
    let Some(value) = value else {
        return NO_SESSIONS.to_string();
    };

    match days_since(value, today) {
        Ok(0) => "Today".to_string(),
        Ok(1) => "1 day ago".to_string(),
        Ok(days) => format!("{} days ago", days),
        Err(e) => {
            tracing::debug!(error = %e, "Unparsable session timestamp");
            RECENTLY.to_string()
        }
    }
}

/// `YYYY-MM-DD` login date, or the placeholder date.
pub fn last_login_date(value: Option<&Value>) -> String {
    value
        .ok_or(FieldParseError::NotText)
        .and_then(timestamp_value)
        .map(|dt| dt.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|_| PLACEHOLDER_LOGIN_DATE.to_string())
}

/// Numeric display id derived from a clinician identifier.
///
/// Hyphens are stripped; if the first 8 remaining characters are hex digits
/// they are read as a base-16 integer. Otherwise the id is the FNV-1a 64-bit
/// hash of the stripped identifier modulo 1,000,000. The result is stable
/// across processes but not unique.
pub fn numeric_id(identifier: &str) -> u64 {
    let stripped: String = identifier.chars().filter(|c| *c != '-').collect();
    hex_prefix(&stripped).unwrap_or_else(|_| fnv1a_64(stripped.as_bytes()) % HASHED_ID_MODULUS)
}

fn hex_prefix(stripped: &str) -> Result<u64, FieldParseError> {
    let prefix = stripped
        .get(..8)
        .filter(|p| p.chars().all(|c| c.is_ascii_hexdigit()))
        .ok_or_else(|| FieldParseError::HexPrefix(stripped.to_string()))?;

    u32::from_str_radix(prefix, 16)
        .map(u64::from)
        .map_err(|_| FieldParseError::HexPrefix(stripped.to_string()))
}

/// 64-bit FNV-1a.
pub fn fnv1a_64(bytes: &[u8]) -> u64 {
    bytes.iter().fold(FNV_OFFSET_BASIS, |hash, byte| {
        (hash ^ u64::from(*byte)).wrapping_mul(FNV_PRIME)
    })
}

/// `doctor<first 8 chars of user id>@bloomsense.com`, or `doctorunknown@...`.
pub fn fallback_email(user_id: Option<&str>) -> String {
    let handle: String = match user_id {
        Some(id) => id.chars().take(8).collect(),
        None => "unknown".to_string(),
    };
    format!("doctor{}@{}", handle, FALLBACK_EMAIL_DOMAIN)
}

/// Stored active-patient count, or the number of joined patients.
///
/// Only non-negative integers (as numbers or numeric strings) count as stored.
pub fn active_patient_count(stored: Option<&Value>, joined: usize) -> u64 {
    stored
        .and_then(|value| match value {
            Value::Number(n) => n.as_u64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        })
        .unwrap_or(joined as u64)
}
