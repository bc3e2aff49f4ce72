//! SN Storefront engine
//!
//! # Overview
//!
//! This library keeps a small storefront's catalog, cart and order ledger
//! consistent across checkout, payment confirmation and cancellation, and
//! persists every committed state to a local cache with an optional hosted
//! mirror.
//!
//! # Architecture
//!
//! - [`types`] - Core data types (Product, Order, CartItem, StoreAction, StoreError)
//! - [`core`] - Business logic components:
//!   - [`core::view`] - Catalog filtering and sorting
//!   - [`core::cart`] - Session cart bounded by stock
//!   - [`core::pricing`] - Coupons and the card minimum
//!   - [`core::reconciler`] - Inventory effects of the order lifecycle
//!   - [`core::engine`] - The `Storefront` single-writer dispatcher
//! - [`persistence`] - Local cache, remote store and the dual-write synchronizer
//! - [`config`] - Store configuration
//! - [`io`] - Action log parsing and CSV reports
//! - [`replay`] - Replay of an action log against a storefront
//! - [`cli`] - CLI arguments parsing
//! - [`logging`] - Log subscriber setup
//!
//! # Order Lifecycle
//!
//! - **Checkout**: cart units leave stock and count as sales; the order is `pendiente`
//! - **Confirmation**: `pendiente → pagado`, inventory untouched
//! - **Cancellation**: units return to stock, sales are reversed; the order is `cancelado`
//!
//! Every state change is written to the local cache before it becomes
//! visible. Remote mirroring happens in the background and never blocks or
//! rolls back a commit.

// Module declarations
pub mod cli;
pub mod config;
pub mod core;
pub mod io;
pub mod logging;
pub mod persistence;
pub mod replay;
pub mod types;

pub use config::StoreConfig;
pub use core::{ReconcilerPolicy, Storefront};
pub use persistence::SyncState;
pub use types::{
    CartItem, Order, OrderId, OrderLine, OrderStatus, PaymentMethod, Product, ProductId,
    SockType, StoreAction, StoreError,
};
