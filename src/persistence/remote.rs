//! Hosted-table client
//!
//! `RestRemoteStore` talks to a PostgREST-style endpoint:
//! `GET {url}/rest/v1/{table}?select=*` to read a whole table and
//! `POST {url}/rest/v1/{table}` with `Prefer: resolution=merge-duplicates`
//! to upsert rows by primary key. The project key is sent both as `apikey`
//! and as a bearer token.

use crate::persistence::traits::{RemoteStore, RemoteTable};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

/// Failure talking to the remote store
///
/// Never fatal to the storefront: hydration falls back to the local cache and
/// uploads are logged and dropped.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RemoteError {
    /// The request could not be built, sent, or completed
    #[error("Remote request for '{table}' failed: {message}")]
    Transport { table: RemoteTable, message: String },

    /// The server answered with a non-success status
    #[error("Remote '{table}' responded with status {status}: {body}")]
    Status {
        table: RemoteTable,
        status: u16,
        body: String,
    },

    /// The payload could not be encoded or decoded
    #[error("Malformed '{table}' data: {message}")]
    Malformed { table: RemoteTable, message: String },
}

/// PostgREST client authenticated with a project key
#[derive(Debug, Clone)]
pub struct RestRemoteStore {
    client: Client,
    base_url: String,
    key: String,
}

impl RestRemoteStore {
    /// Build a client with the given request timeout
    ///
    /// # Errors
    ///
    /// Returns `RemoteError::Transport` if the HTTP client cannot be built
    /// (e.g. the TLS backend fails to initialize).
    pub fn new(base_url: &str, key: &str, timeout: Duration) -> Result<Self, RemoteError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RemoteError::Transport {
                table: RemoteTable::Products,
                message: format!("Failed to build HTTP client: {e}"),
            })?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            key: key.to_string(),
        })
    }

    fn table_url(&self, table: RemoteTable) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    async fn check_status(
        table: RemoteTable,
        response: reqwest::Response,
    ) -> Result<reqwest::Response, RemoteError> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        Err(RemoteError::Status { table, status, body })
    }
}

#[async_trait]
impl RemoteStore for RestRemoteStore {
    async fn select_all(&self, table: RemoteTable) -> Result<Vec<Value>, RemoteError> {
        let url = format!("{}?select=*", self.table_url(table));

        let response = self
            .client
            .get(&url)
            .header("apikey", &self.key)
            .bearer_auth(&self.key)
            .send()
            .await
            .map_err(|e| RemoteError::Transport {
                table,
                message: e.to_string(),
            })?;

        let response = Self::check_status(table, response).await?;

        response
            .json::<Vec<Value>>()
            .await
            .map_err(|e| RemoteError::Malformed {
                table,
                message: e.to_string(),
            })
    }

    async fn upsert(&self, table: RemoteTable, records: Vec<Value>) -> Result<(), RemoteError> {
        let response = self
            .client
            .post(self.table_url(table))
            .header("apikey", &self.key)
            .bearer_auth(&self.key)
            .header("Prefer", "resolution=merge-duplicates")
            .json(&records)
            .send()
            .await
            .map_err(|e| RemoteError::Transport {
                table,
                message: e.to_string(),
            })?;

        Self::check_status(table, response).await?;
        Ok(())
    }
}
