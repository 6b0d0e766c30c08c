//! REST client for the hosted data store.
//!
//! Queries are plain `GET {base}/rest/v1/{collection}` requests authenticated
//! with the service key, both as `apikey` and as a bearer token.

use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::debug;

use super::{records_from_value, FetchError, Query, Record, RecordStore};
use crate::config::StoreConfig;

/// Data store client backed by `reqwest`.
#[derive(Clone)]
pub struct RestStore {
    base_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl RestStore {
    /// Build a client with the configured request timeout.
    pub fn new(config: &StoreConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(format!("bloomsense-api/{}", env!("CARGO_PKG_VERSION")))
            .timeout(config.timeout())
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            base_url: config.url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            client,
        })
    }

    fn collection_url(&self, collection: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, collection)
    }
}

#[async_trait]
impl RecordStore for RestStore {
    async fn fetch(&self, query: &Query) -> Result<Vec<Record>, FetchError> {
        let collection = query.collection.as_str();
        let transport = |source: reqwest::Error| {
            if source.is_timeout() {
                FetchError::Timeout {
                    collection: collection.to_string(),
                }
            } else {
                FetchError::Transport {
                    collection: collection.to_string(),
                    source,
                }
            }
        };

        debug!(collection, "Querying data store");

        let response = self
            .client
            .get(self.collection_url(collection))
            .header("apikey", &self.api_key)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .header("Prefer", "return=representation")
            .query(&query.params())
            .send()
            .await
            .map_err(transport)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            debug!(collection, status = status.as_u16(), %body, "Data store query failed");
            return Err(FetchError::Status {
                collection: collection.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await.map_err(transport)?;
        let value = serde_json::from_slice(&bytes).map_err(|source| FetchError::Decode {
            collection: collection.to_string(),
            source,
        })?;

        let records = records_from_value(collection, value)?;
        debug!(collection, count = records.len(), "Data store query succeeded");
        Ok(records)
    }
}
