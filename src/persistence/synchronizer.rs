//! Dual-write synchronizer
//!
//! Owns the two copies of store state and keeps them in step:
//!
//! - **Local cache**: synchronous, authoritative for durability. A commit
//!   that cannot reach it is refused and the caller keeps its old snapshot.
//! - **Remote store**: optional mirror. Hydration prefers it; uploads after
//!   each commit are fire-and-forget, logged on failure, and never roll back
//!   local state.
//!
//! # State machine
//!
//! ```text
//! Uninitialized -> Loading -> CloudSynced   (remote configured and reachable)
//!                          -> LocalOnly     (no remote, or any remote failure)
//! ```
//!
//! Uploads run on the ambient tokio runtime. Each upload task waits for the
//! previous one, so the remote converges on the latest committed snapshot.

use crate::core::reconciler::StoreSnapshot;
use crate::persistence::defaults::default_products;
use crate::persistence::remote::RemoteError;
use crate::persistence::traits::{LocalCache, RemoteStore, RemoteTable};
use crate::types::{Order, Product, StoreError};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Local cache key of the product collection
pub const PRODUCTS_KEY: &str = "sn_style_products_v2";

/// Local cache key of the order collection
pub const ORDERS_KEY: &str = "sn_style_orders_v2";

/// Where the current state was loaded from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    Uninitialized,
    Loading,
    /// Hydrated from the remote store; commits are mirrored to it
    CloudSynced,
    /// Hydrated from the local cache or defaults
    LocalOnly,
}

impl SyncState {
    pub fn as_str(&self) -> &'static str {
        match self {
            SyncState::Uninitialized => "uninitialized",
            SyncState::Loading => "loading",
            SyncState::CloudSynced => "cloud-synced",
            SyncState::LocalOnly => "local-only",
        }
    }
}

impl fmt::Display for SyncState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Keeps the local cache and the remote store in step with committed state
pub struct DualWriteSynchronizer {
    local: Arc<dyn LocalCache>,
    remote: Option<Arc<dyn RemoteStore>>,
    state: SyncState,
    last_upload: Option<JoinHandle<()>>,
}

impl fmt::Debug for DualWriteSynchronizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DualWriteSynchronizer")
            .field("state", &self.state)
            .field("remote", &self.remote.is_some())
            .field("upload_pending", &self.has_pending_upload())
            .finish()
    }
}

impl DualWriteSynchronizer {
    pub fn new(local: Arc<dyn LocalCache>, remote: Option<Arc<dyn RemoteStore>>) -> Self {
        Self {
            local,
            remote,
            state: SyncState::Uninitialized,
            last_upload: None,
        }
    }

    pub fn state(&self) -> SyncState {
        self.state
    }

    pub fn has_remote(&self) -> bool {
        self.remote.is_some()
    }

    pub fn has_pending_upload(&self) -> bool {
        self.last_upload
            .as_ref()
            .is_some_and(|task| !task.is_finished())
    }

    /// Load the initial snapshot
    ///
    /// With a remote configured, both tables are fetched. Any fetch or decode
    /// failure downgrades to the local path for both collections. A remote
    /// with no products falls back to the built-in catalog; remote orders are
    /// adopted as-is, even when empty.
    ///
    /// Without a remote, each collection comes from the local cache, or from
    /// defaults (built-in catalog, no orders) when absent or unreadable.
    ///
    /// Hydration never writes to either store.
    pub async fn hydrate(&mut self) -> StoreSnapshot {
        self.state = SyncState::Loading;

        if let Some(remote) = self.remote.clone() {
            match fetch_remote(remote.as_ref()).await {
                Ok(snapshot) => {
                    info!(
                        products = snapshot.catalog.len(),
                        orders = snapshot.orders.len(),
                        "Hydrated from remote store"
                    );
                    self.state = SyncState::CloudSynced;
                    return snapshot;
                }
                Err(e) => {
                    warn!(error = %e, "Remote store unavailable, falling back to local cache");
                }
            }
        }

        let products = self
            .read_collection::<Product>(PRODUCTS_KEY)
            .map(unique_products)
            .unwrap_or_else(default_products);
        let orders = self.read_collection::<Order>(ORDERS_KEY).unwrap_or_default();
        info!(
            products = products.len(),
            orders = orders.len(),
            "Hydrated from local cache"
        );

        self.state = SyncState::LocalOnly;
        StoreSnapshot::new(products, orders)
    }

    /// Persist a snapshot locally, then queue a remote upload
    ///
    /// # Errors
    ///
    /// Returns `LocalPersistence` (or `Serialization`) if the local write
    /// fails. Nothing is uploaded in that case. Remote failures are never
    /// reported here.
    pub fn commit(&mut self, snapshot: &StoreSnapshot) -> Result<(), StoreError> {
        let products = serde_json::to_string(snapshot.catalog.all())?;
        let orders = serde_json::to_string(snapshot.orders.all())?;

        self.local
            .write_all(&[(PRODUCTS_KEY, products.as_str()), (ORDERS_KEY, orders.as_str())])?;
        debug!(
            products = snapshot.catalog.len(),
            orders = snapshot.orders.len(),
            "Committed snapshot to local cache"
        );

        self.queue_upload(snapshot);
        Ok(())
    }

    /// Wait for queued uploads to finish
    ///
    /// Upload failures were already logged by the task itself.
    pub async fn flush(&mut self) {
        if let Some(task) = self.last_upload.take() {
            if let Err(e) = task.await {
                warn!(error = %e, "Remote upload task aborted");
            }
        }
    }

    fn queue_upload(&mut self, snapshot: &StoreSnapshot) {
        let Some(remote) = self.remote.clone() else {
            return;
        };
        let Ok(runtime) = Handle::try_current() else {
            warn!("No async runtime available, skipping remote upload");
            return;
        };

        let products = snapshot.catalog.all().to_vec();
        let orders = snapshot.orders.all().to_vec();
        let previous = self.last_upload.take();

        self.last_upload = Some(runtime.spawn(async move {
            if let Some(previous) = previous {
                let _ = previous.await;
            }
            match upload(remote.as_ref(), &products, &orders).await {
                Ok(()) => debug!(
                    products = products.len(),
                    orders = orders.len(),
                    "Mirrored snapshot to remote store"
                ),
                Err(e) => warn!(error = %e, "Remote upload failed, local cache remains authoritative"),
            }
        }));
    }

    fn read_collection<T: DeserializeOwned>(&self, key: &str) -> Option<Vec<T>> {
        match self.local.read(key) {
            Ok(Some(raw)) => match serde_json::from_str(&raw) {
                Ok(items) => Some(items),
                Err(e) => {
                    warn!(key, error = %e, "Discarding unreadable cached collection");
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                warn!(key, error = %e, "Local cache read failed");
                None
            }
        }
    }
}

async fn fetch_remote(remote: &dyn RemoteStore) -> Result<StoreSnapshot, RemoteError> {
    let product_rows = remote.select_all(RemoteTable::Products).await?;
    let order_rows = remote.select_all(RemoteTable::Orders).await?;

    let products: Vec<Product> = decode_rows(RemoteTable::Products, product_rows)?;
    let orders: Vec<Order> = decode_rows(RemoteTable::Orders, order_rows)?;

    let products = if products.is_empty() {
        default_products()
    } else {
        unique_products(products)
    };
    Ok(StoreSnapshot::new(products, orders))
}

async fn upload(
    remote: &dyn RemoteStore,
    products: &[Product],
    orders: &[Order],
) -> Result<(), RemoteError> {
    remote
        .upsert(RemoteTable::Products, encode_rows(RemoteTable::Products, products)?)
        .await?;
    if !orders.is_empty() {
        remote
            .upsert(RemoteTable::Orders, encode_rows(RemoteTable::Orders, orders)?)
            .await?;
    }
    Ok(())
}

/// Keep the first product for each ID
///
/// Stock deltas apply to every product with a matching ID, so a catalog
/// must never hold two.
fn unique_products(products: Vec<Product>) -> Vec<Product> {
    let mut seen = HashSet::with_capacity(products.len());
    products
        .into_iter()
        .filter(|product| {
            let first = seen.insert(product.id.clone());
            if !first {
                warn!(product = %product.id, "Dropping product with duplicate ID");
            }
            first
        })
        .collect()
}

fn decode_rows<T: DeserializeOwned>(
    table: RemoteTable,
    rows: Vec<Value>,
) -> Result<Vec<T>, RemoteError> {
    rows.into_iter()
        .map(|row| {
            serde_json::from_value(row).map_err(|e| RemoteError::Malformed {
                table,
                message: e.to_string(),
            })
        })
        .collect()
}

fn encode_rows<T: Serialize>(table: RemoteTable, items: &[T]) -> Result<Vec<Value>, RemoteError> {
    items
        .iter()
        .map(|item| {
            serde_json::to_value(item).map_err(|e| RemoteError::Malformed {
                table,
                message: e.to_string(),
            })
        })
        .collect()
}
