//! Persistence layer
//!
//! - `traits` - `LocalCache` and `RemoteStore` abstractions
//! - `local` - file and in-memory local caches
//! - `remote` - PostgREST client and `RemoteError`
//! - `defaults` - built-in catalog used when nothing is stored
//! - `synchronizer` - hydration and dual-write commits

pub mod defaults;
pub mod local;
pub mod remote;
pub mod synchronizer;
pub mod traits;

pub use defaults::default_products;
pub use local::{FileCache, MemoryCache};
pub use remote::{RemoteError, RestRemoteStore};
pub use synchronizer::{DualWriteSynchronizer, SyncState, ORDERS_KEY, PRODUCTS_KEY};
pub use traits::{LocalCache, RemoteStore, RemoteTable};
