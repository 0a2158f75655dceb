//! Persistence collaborator

use crate::config::StoreConfig;
use crate::error::StoreError;
use crate::record::PersistedRequest;

/// Durable sink for accepted requests
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait RequestStore: Send + Sync {
    /// Insert one row. `Ok` means the row is durably recorded.
    async fn insert(&self, row: &PersistedRequest) -> Result<(), StoreError>;
}

/// PostgREST-style table insert over HTTP
#[derive(Debug, Clone)]
pub struct RestStore {
    client: reqwest::Client,
    insert_url: String,
    api_key: String,
}

impl RestStore {
    /// Create store from settings
    #[must_use]
    pub fn new(client: reqwest::Client, config: &StoreConfig) -> Self {
        Self {
            client,
            insert_url: config.insert_url(),
            api_key: config.api_key.clone(),
        }
    }
}

#[async_trait::async_trait]
impl RequestStore for RestStore {
    async fn insert(&self, row: &PersistedRequest) -> Result<(), StoreError> {
        let body = serde_json::to_vec(row).map_err(|e| StoreError::Encoding(e.to_string()))?;

        let response = self
            .client
            .post(&self.insert_url)
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .header("Prefer", "return=minimal")
            .body(body)
            .send()
            .await
            .map_err(|e| StoreError::Transport(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        Err(StoreError::Rejected {
            status: status.as_u16(),
            body,
        })
    }
}
