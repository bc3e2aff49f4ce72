//! Core business logic module
//!
//! This module contains the storefront state components:
//! - `catalog` - Product collection and stock/sales deltas
//! - `orders` - Order ledger, newest first
//! - `cart` - Session cart, bounded by stock at add time
//! - `view` - Pure catalog filter and sort pipeline
//! - `pricing` - Coupons, card minimum and cart quotes
//! - `reconciler` - Snapshot transforms for the order lifecycle
//! - `engine` - The single-writer `Storefront` dispatcher

pub mod cart;
pub mod catalog;
pub mod engine;
pub mod orders;
pub mod pricing;
pub mod reconciler;
pub mod view;

#[cfg(test)]
pub(crate) mod test_support;

pub use cart::CartLedger;
pub use catalog::{Catalog, StockDelta};
pub use engine::{generate_order_id, Storefront};
pub use orders::OrderLedger;
pub use pricing::{quote, Coupon, Quote, COUPONS, MIN_CARD_AMOUNT, SALE_PRICE};
pub use reconciler::{CheckoutRequest, InventoryReconciler, ReconcilerPolicy, StoreSnapshot};
pub use view::{filter_and_sort, SortOrder, TypeFilter};
