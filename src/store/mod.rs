//! Read access to the upstream REST data store.
//!
//! Every collection is fetched as a list of loosely shaped JSON objects. The
//! `RecordStore` trait is the seam between request handlers and the network:
//! production uses [`RestStore`], tests use an in-memory store.

mod rest;

#[cfg(test)]
pub(crate) mod memory;

pub use rest::RestStore;

use async_trait::async_trait;
use serde_json::{Map, Value};

/// A raw record as returned by the store.
pub type Record = Map<String, Value>;

/// Collection holding clinician records.
pub const DOCTORS: &str = "doctors";
/// Collection holding patient records.
pub const PATIENTS: &str = "patients";
/// Collection holding user accounts (only `user_id` and `email` are read).
pub const USERS: &str = "users";
/// Collection holding screening questionnaire items.
pub const QUESTIONNAIRE: &str = "questionaire";

/// Errors surfaced by a store fetch. Any of them fails the current request.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("store returned {status} for {collection}: {body}")]
    Status {
        collection: String,
        status: u16,
        body: String,
    },
    #[error("request to {collection} timed out")]
    Timeout { collection: String },
    #[error("request to {collection} failed: {source}")]
    Transport {
        collection: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("failed to decode {collection} response: {source}")]
    Decode {
        collection: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("malformed {collection} response: {reason}")]
    Malformed { collection: String, reason: String },
}

/// Sort direction for [`Query::order_by`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Order {
    Asc,
    Desc,
}

impl Order {
    pub fn as_str(&self) -> &'static str {
        match self {
            Order::Asc => "asc",
            Order::Desc => "desc",
        }
    }
}

/// A read query against one collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    pub collection: String,
    /// Selected columns; empty means all (`*`).
    pub select: Vec<String>,
    /// Equality filters as `(column, value)` pairs.
    pub filters: Vec<(String, String)>,
    pub order: Option<(String, Order)>,
}

impl Query {
    pub fn new(collection: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            select: Vec::new(),
            filters: Vec::new(),
            order: None,
        }
    }

    pub fn select(mut self, columns: &[&str]) -> Self {
        self.select = columns.iter().map(|c| c.to_string()).collect();
        self
    }

    pub fn eq(mut self, column: impl Into<String>, value: impl Into<String>) -> Self {
        self.filters.push((column.into(), value.into()));
        self
    }

    pub fn order_by(mut self, column: impl Into<String>, order: Order) -> Self {
        self.order = Some((column.into(), order));
        self
    }

    /// Query-string pairs in the store's filter syntax.
    pub fn params(&self) -> Vec<(String, String)> {
        let select = if self.select.is_empty() {
            "*".to_string()
        } else {
            self.select.join(",")
        };

        let mut params = vec![("select".to_string(), select)];
        for (column, value) in &self.filters {
            params.push((column.clone(), format!("eq.{}", value)));
        }
        if let Some((column, order)) = &self.order {
            params.push(("order".to_string(), format!("{}.{}", column, order.as_str())));
        }
        params
    }
}

/// Read-only access to the data store.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Fetch all records matching `query`, in the order the store returns them.
    async fn fetch(&self, query: &Query) -> Result<Vec<Record>, FetchError>;
}

/// Turn a decoded response body into records.
///
/// The body must be a JSON array of objects; anything else is malformed.
pub(crate) fn records_from_value(collection: &str, value: Value) -> Result<Vec<Record>, FetchError> {
    let Value::Array(items) = value else {
        return Err(FetchError::Malformed {
            collection: collection.to_string(),
            reason: "expected a JSON array".to_string(),
        });
    };

    items
        .into_iter()
        .map(|item| match item {
            Value::Object(record) => Ok(record),
            other => Err(FetchError::Malformed {
                collection: collection.to_string(),
                reason: format!("expected an object, found {}", json_kind(&other)),
            }),
        })
        .collect()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
