//! Storefront configuration
//!
//! Selects the local cache (directory or in-memory), the optional remote
//! mirror, and store policy. Built from CLI flags by the binary, or from the
//! environment (including a `.env` file) by library users.

use crate::core::reconciler::ReconcilerPolicy;
use crate::persistence::{
    DualWriteSynchronizer, FileCache, LocalCache, MemoryCache, RemoteStore, RestRemoteStore,
};
use crate::types::StoreError;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

pub const REMOTE_URL_VAR: &str = "STOREFRONT_REMOTE_URL";
pub const REMOTE_KEY_VAR: &str = "STOREFRONT_REMOTE_KEY";
pub const CACHE_DIR_VAR: &str = "STOREFRONT_CACHE_DIR";

/// Cache directory used when none is configured
pub const DEFAULT_CACHE_DIR: &str = ".sn-storefront";

/// Remote request timeout used when none is configured
pub const DEFAULT_REMOTE_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, PartialEq)]
pub struct StoreConfig {
    /// Base URL of the hosted tables, e.g. `https://xyz.supabase.co`
    pub remote_url: String,

    /// Project key sent with every remote request
    pub remote_key: String,

    /// Local cache directory; `None` keeps state in memory only
    pub cache_dir: Option<PathBuf>,

    pub remote_timeout: Duration,

    pub allow_paid_cancellation: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            remote_url: String::new(),
            remote_key: String::new(),
            cache_dir: Some(PathBuf::from(DEFAULT_CACHE_DIR)),
            remote_timeout: Duration::from_secs(DEFAULT_REMOTE_TIMEOUT_SECS),
            allow_paid_cancellation: true,
        }
    }
}

impl StoreConfig {
    /// Load configuration from process environment variables
    ///
    /// A `.env` file in the working directory is read first if present;
    /// variables already set in the environment take precedence.
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build configuration from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            remote_url: lookup(REMOTE_URL_VAR).unwrap_or_default(),
            remote_key: lookup(REMOTE_KEY_VAR).unwrap_or_default(),
            cache_dir: lookup(CACHE_DIR_VAR)
                .filter(|dir| !dir.trim().is_empty())
                .map(PathBuf::from)
                .or(defaults.cache_dir),
            ..defaults
        }
    }

    /// Remote mirroring is on only when both URL and key are present
    pub fn remote_enabled(&self) -> bool {
        !self.remote_url.trim().is_empty() && !self.remote_key.trim().is_empty()
    }

    pub fn policy(&self) -> ReconcilerPolicy {
        ReconcilerPolicy {
            allow_paid_cancellation: self.allow_paid_cancellation,
        }
    }

    /// Open the configured local cache
    ///
    /// # Errors
    ///
    /// Returns `IoError` if the cache directory cannot be created.
    pub fn local_cache(&self) -> Result<Arc<dyn LocalCache>, StoreError> {
        match &self.cache_dir {
            Some(dir) => Ok(Arc::new(FileCache::new(dir)?)),
            None => Ok(Arc::new(MemoryCache::new())),
        }
    }

    /// Build the remote client, if remote mirroring is enabled
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Remote` if the HTTP client cannot be built.
    pub fn remote_store(&self) -> Result<Option<Arc<dyn RemoteStore>>, StoreError> {
        if !self.remote_enabled() {
            return Ok(None);
        }
        let store = RestRemoteStore::new(
            self.remote_url.trim(),
            self.remote_key.trim(),
            self.remote_timeout,
        )?;
        Ok(Some(Arc::new(store)))
    }

    /// Reject settings that cannot work
    ///
    /// # Errors
    ///
    /// Returns `Config` if the remote timeout is zero, or if remote mirroring
    /// is enabled with a URL that is not `http://` or `https://`.
    pub fn validate(&self) -> Result<(), StoreError> {
        if self.remote_timeout.is_zero() {
            return Err(StoreError::Config {
                message: "remote timeout must be greater than zero".to_string(),
            });
        }
        let url = self.remote_url.trim();
        if self.remote_enabled() && !(url.starts_with("https://") || url.starts_with("http://")) {
            return Err(StoreError::Config {
                message: format!("remote URL '{}' must start with http:// or https://", url),
            });
        }
        Ok(())
    }

    /// Validate, then build the synchronizer over the configured stores
    pub fn synchronizer(&self) -> Result<DualWriteSynchronizer, StoreError> {
        self.validate()?;
        Ok(DualWriteSynchronizer::new(
            self.local_cache()?,
            self.remote_store()?,
        ))
    }
}
