//! Persistence integration tests
//!
//! Exercise the storefront against real file caches and an in-process
//! remote store:
//! - State committed in one session is hydrated by the next
//! - A reachable remote wins over the local cache and receives every commit
//! - An unreachable remote degrades to the local cache without losing writes

use async_trait::async_trait;
use serde_json::Value;
use sn_storefront::persistence::{
    DualWriteSynchronizer, FileCache, RemoteError, RemoteStore, RemoteTable,
};
use sn_storefront::{
    Order, PaymentMethod, Product, ReconcilerPolicy, StoreConfig, StoreError, Storefront,
    SyncState,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

/// Remote store keeping rows in memory, keyed by `id`
#[derive(Default)]
struct InMemoryRemote {
    tables: Mutex<HashMap<RemoteTable, Vec<Value>>>,
    offline: AtomicBool,
}

impl InMemoryRemote {
    fn rows(&self, table: RemoteTable) -> Vec<Value> {
        self.tables
            .lock()
            .unwrap()
            .get(&table)
            .cloned()
            .unwrap_or_default()
    }

    fn unreachable(table: RemoteTable) -> RemoteError {
        RemoteError::Transport {
            table,
            message: "network unreachable".to_string(),
        }
    }
}

#[async_trait]
impl RemoteStore for InMemoryRemote {
    async fn select_all(&self, table: RemoteTable) -> Result<Vec<Value>, RemoteError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(Self::unreachable(table));
        }
        Ok(self.rows(table))
    }

    async fn upsert(&self, table: RemoteTable, records: Vec<Value>) -> Result<(), RemoteError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(Self::unreachable(table));
        }
        let mut tables = self.tables.lock().unwrap();
        let rows = tables.entry(table).or_default();
        for record in records {
            match rows.iter_mut().find(|row| row["id"] == record["id"]) {
                Some(existing) => *existing = record,
                None => rows.push(record),
            }
        }
        Ok(())
    }
}

async fn open(cache_dir: &TempDir, remote: Option<Arc<InMemoryRemote>>) -> Storefront {
    let local = Arc::new(FileCache::new(cache_dir.path()).unwrap());
    let remote = remote.map(|r| r as Arc<dyn RemoteStore>);
    Storefront::hydrate(
        DualWriteSynchronizer::new(local, remote),
        ReconcilerPolicy::default(),
    )
    .await
}

fn place_order(store: &mut Storefront, product_id: &str, order_id: &str) {
    assert!(store.add_to_cart(product_id));
    store
        .checkout(Some(order_id.to_string()), PaymentMethod::Transfer, None)
        .unwrap();
}

fn stock_of(store: &Storefront, product_id: &str) -> u32 {
    store
        .products()
        .iter()
        .find(|p| p.id == product_id)
        .map(|p| p.stock)
        .unwrap()
}

#[tokio::test]
async fn test_state_survives_restart() {
    let dir = TempDir::new().unwrap();

    let mut first = open(&dir, None).await;
    place_order(&mut first, "am-1", "SN-0001");
    first.confirm_payment("SN-0001").unwrap();
    first.flush().await;
    drop(first);

    let second = open(&dir, None).await;

    assert_eq!(second.sync_state(), SyncState::LocalOnly);
    assert_eq!(stock_of(&second, "am-1"), 99);
    assert_eq!(second.orders().len(), 1);
    assert_eq!(second.orders()[0].id, "SN-0001");
    assert!(second.cart().is_empty());
}

#[tokio::test]
async fn test_failed_checkout_commit_leaves_no_partial_state_on_disk() {
    let dir = TempDir::new().unwrap();
    let blocked = dir.path().join("sn_style_orders_v2.json");
    std::fs::create_dir(&blocked).unwrap();
    std::fs::write(blocked.join("keep"), "x").unwrap();

    let mut store = open(&dir, None).await;
    let sales_before = store.products().iter().find(|p| p.id == "am-1").unwrap().sales_count;
    assert!(store.add_to_cart("am-1"));

    let result = store.checkout(Some("SN-0001".to_string()), PaymentMethod::Transfer, None);

    assert!(matches!(result, Err(StoreError::LocalPersistence { .. })));
    assert_eq!(stock_of(&store, "am-1"), 100);
    drop(store);

    std::fs::remove_dir_all(&blocked).unwrap();
    let reopened = open(&dir, None).await;
    let am1 = reopened.products().iter().find(|p| p.id == "am-1").unwrap();
    assert_eq!(am1.stock, 100);
    assert_eq!(am1.sales_count, sales_before);
    assert!(reopened.orders().is_empty());
}

#[tokio::test]
async fn test_store_opened_from_config_uses_cache_dir() {
    let dir = TempDir::new().unwrap();
    let config = StoreConfig {
        cache_dir: Some(dir.path().to_path_buf()),
        ..StoreConfig::default()
    };

    let mut store = Storefront::open(&config).await.unwrap();
    store.adjust_stock("st-vans", 7).unwrap();

    let reopened = Storefront::open(&config).await.unwrap();
    assert_eq!(stock_of(&reopened, "st-vans"), 7);
}

#[tokio::test]
async fn test_remote_mirror_receives_every_order() {
    let dir = TempDir::new().unwrap();
    let remote = Arc::new(InMemoryRemote::default());

    let mut store = open(&dir, Some(remote.clone())).await;
    assert_eq!(store.sync_state(), SyncState::CloudSynced);

    place_order(&mut store, "am-1", "SN-0001");
    place_order(&mut store, "am-2", "SN-0002");
    store.cancel_order("SN-0001").unwrap();
    store.flush().await;

    let orders: Vec<Order> = remote
        .rows(RemoteTable::Orders)
        .into_iter()
        .map(|row| serde_json::from_value(row).unwrap())
        .collect();
    assert_eq!(orders.len(), 2);

    let products: Vec<Product> = remote
        .rows(RemoteTable::Products)
        .into_iter()
        .map(|row| serde_json::from_value(row).unwrap())
        .collect();
    assert_eq!(products.len(), 4);

    // a fresh session on another machine hydrates from the mirror
    let other_dir = TempDir::new().unwrap();
    let elsewhere = open(&other_dir, Some(remote)).await;
    assert_eq!(elsewhere.sync_state(), SyncState::CloudSynced);
    assert_eq!(elsewhere.orders().len(), 2);
    assert_eq!(stock_of(&elsewhere, "am-1"), 100);
    assert_eq!(stock_of(&elsewhere, "am-2"), 99);
}

#[tokio::test]
async fn test_offline_remote_falls_back_to_local_cache() {
    let dir = TempDir::new().unwrap();
    let remote = Arc::new(InMemoryRemote::default());

    let mut online = open(&dir, Some(remote.clone())).await;
    place_order(&mut online, "st-vans", "SN-0001");
    online.flush().await;
    drop(online);

    remote.offline.store(true, Ordering::SeqCst);
    let mut offline = open(&dir, Some(remote.clone())).await;

    assert_eq!(offline.sync_state(), SyncState::LocalOnly);
    assert_eq!(stock_of(&offline, "st-vans"), 99);

    // commits still land locally while the mirror is down
    offline.cancel_order("SN-0001").unwrap();
    offline.flush().await;
    drop(offline);

    let reopened = open(&dir, None).await;
    assert_eq!(stock_of(&reopened, "st-vans"), 100);
    assert_eq!(
        remote.rows(RemoteTable::Orders).len(),
        1,
        "mirror keeps the last state it received"
    );
}
