//! Storage abstractions behind the dual-write synchronizer
//!
//! The local cache is synchronous and authoritative: every commit lands there
//! before the in-memory state moves. The remote store is an async mirror that
//! may be missing, slow, or failing without affecting the storefront.

use crate::persistence::remote::RemoteError;
use crate::types::StoreError;
use async_trait::async_trait;
use serde_json::Value;
use std::fmt;

/// Key-value cache holding serialized catalog and order collections
pub trait LocalCache: Send + Sync {
    /// Read the value stored under `key`, `None` if nothing was ever written
    fn read(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Store `value` under `key`, replacing any previous value
    fn write(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Store several entries as one commit
    ///
    /// The default writes entries in order and stops at the first failure.
    /// Implementations that can stage writes should override it so a failure
    /// leaves every key at its previous value.
    fn write_all(&self, entries: &[(&str, &str)]) -> Result<(), StoreError> {
        for (key, value) in entries {
            self.write(key, value)?;
        }
        Ok(())
    }
}

/// Remote tables mirrored by the synchronizer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RemoteTable {
    Products,
    Orders,
}

impl RemoteTable {
    pub fn as_str(&self) -> &'static str {
        match self {
            RemoteTable::Products => "products",
            RemoteTable::Orders => "orders",
        }
    }
}

impl fmt::Display for RemoteTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Hosted tabular store with select-all and upsert-by-id semantics
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Fetch every row of `table`
    async fn select_all(&self, table: RemoteTable) -> Result<Vec<Value>, RemoteError>;

    /// Insert or overwrite `records`, matched on their `id` field
    async fn upsert(&self, table: RemoteTable, records: Vec<Value>) -> Result<(), RemoteError>;
}
