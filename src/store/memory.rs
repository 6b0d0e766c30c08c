use async_trait::async_trait;
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use super::{records_from_value, FetchError, Query, Record, RecordStore};

/// In-memory store for handler tests.
#[derive(Default)]
pub struct MemoryStore {
    collections: HashMap<String, Vec<Record>>,
    failing: HashSet<String>,
    queries: Mutex<Vec<Query>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a collection from a JSON array literal.
    pub fn with(mut self, collection: &str, rows: Value) -> Self {
        let records = records_from_value(collection, rows).expect("seed rows must be objects");
        self.collections.insert(collection.to_string(), records);
        self
    }

    /// Make every fetch of `collection` fail with a 500 status.
    pub fn failing(mut self, collection: &str) -> Self {
        self.failing.insert(collection.to_string());
        self
    }

    /// Queries received so far, in order.
    pub fn queries(&self) -> Vec<Query> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn fetch(&self, query: &Query) -> Result<Vec<Record>, FetchError> {
        self.queries.lock().unwrap().push(query.clone());

        if self.failing.contains(&query.collection) {
            return Err(FetchError::Status {
                collection: query.collection.clone(),
                status: 500,
                body: "simulated failure".to_string(),
            });
        }

        Ok(self
            .collections
            .get(&query.collection)
            .cloned()
            .unwrap_or_default())
    }
}
