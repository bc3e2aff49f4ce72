//! Storefront dispatcher
//!
//! This module provides the `Storefront`, the single writer of store state.
//! It owns the committed [`StoreSnapshot`], the session cart, the
//! [`InventoryReconciler`] and the [`DualWriteSynchronizer`], and routes every
//! user action to the right component:
//!
//! - Cart actions touch only the cart and never persist
//! - State-changing actions compute the next snapshot with the reconciler,
//!   commit it through the synchronizer, and only then replace the current one
//!
//! A rejected action (unknown id, illegal transition, failed local write)
//! leaves both snapshot and cart exactly as they were.

use crate::config::StoreConfig;
use crate::core::cart::CartLedger;
use crate::core::pricing::{self, Quote};
use crate::core::reconciler::{
    CheckoutRequest, InventoryReconciler, ReconcilerPolicy, StoreSnapshot,
};
use crate::core::view::{filter_and_sort, SortOrder, TypeFilter};
use crate::persistence::{DualWriteSynchronizer, SyncState};
use crate::types::{Order, OrderId, PaymentMethod, Product, StoreAction, StoreError};
use chrono::Utc;
use tracing::{debug, info};
use uuid::Uuid;

/// Generate a fresh `SN-XXXXXXXX` order ID
pub fn generate_order_id() -> OrderId {
    let hex = Uuid::new_v4().simple().to_string().to_uppercase();
    format!("SN-{}", &hex[..8])
}

/// Single-writer storefront state machine
#[derive(Debug)]
pub struct Storefront {
    snapshot: StoreSnapshot,
    cart: CartLedger,
    reconciler: InventoryReconciler,
    sync: DualWriteSynchronizer,
}

impl Storefront {
    /// Hydrate a storefront through the given synchronizer
    ///
    /// Never fails: an unreachable remote or unreadable cache degrades to
    /// local data or the built-in catalog.
    pub async fn hydrate(mut sync: DualWriteSynchronizer, policy: ReconcilerPolicy) -> Self {
        let snapshot = sync.hydrate().await;
        info!(
            source = %sync.state(),
            products = snapshot.catalog.len(),
            orders = snapshot.orders.len(),
            "Storefront ready"
        );

        Storefront {
            snapshot,
            cart: CartLedger::new(),
            reconciler: InventoryReconciler::new(policy),
            sync,
        }
    }

    /// Build the configured stores and hydrate from them
    ///
    /// # Errors
    ///
    /// Returns an error if the cache directory cannot be created or the
    /// remote client cannot be built.
    pub async fn open(config: &StoreConfig) -> Result<Self, StoreError> {
        let sync = config.synchronizer()?;
        Ok(Self::hydrate(sync, config.policy()).await)
    }

    pub fn products(&self) -> &[Product] {
        self.snapshot.catalog.all()
    }

    /// Orders, newest first
    pub fn orders(&self) -> &[Order] {
        self.snapshot.orders.all()
    }

    pub fn cart(&self) -> &CartLedger {
        &self.cart
    }

    pub fn snapshot(&self) -> &StoreSnapshot {
        &self.snapshot
    }

    pub fn sync_state(&self) -> SyncState {
        self.sync.state()
    }

    /// Catalog filtered by sock type and ordered for display
    pub fn view(&self, filter: TypeFilter, sort: SortOrder) -> Vec<Product> {
        filter_and_sort(self.products(), filter, sort)
    }

    /// Add one unit of a product to the cart
    ///
    /// Returns `false` (and changes nothing) for unknown or exhausted products.
    pub fn add_to_cart(&mut self, product_id: &str) -> bool {
        let Some(product) = self.snapshot.catalog.get(product_id) else {
            debug!(product = product_id, "Ignoring add of unknown product");
            return false;
        };

        let added = self.cart.add(product);
        if !added {
            debug!(product = product_id, stock = product.stock, "Cart already holds all stock");
        }
        added
    }

    /// Overwrite a cart line's quantity; zero removes the line
    ///
    /// Not checked against stock here; checkout re-validates.
    pub fn update_cart_quantity(&mut self, product_id: &str, quantity: u32) {
        self.cart.update_quantity(product_id, quantity);
    }

    pub fn remove_from_cart(&mut self, product_id: &str) {
        self.cart.remove(product_id);
    }

    pub fn clear_cart(&mut self) {
        self.cart.clear();
    }

    /// Price the current cart
    ///
    /// # Errors
    ///
    /// See [`pricing::quote`].
    pub fn quote(&self, coupon: Option<&str>, method: PaymentMethod) -> Result<Quote, StoreError> {
        pricing::quote(&self.cart, coupon, method)
    }

    /// Turn the cart into a `pendiente` order
    ///
    /// The cart is priced (coupon and card minimum applied), the inventory
    /// transform is committed, and the cart is cleared once the commit is
    /// durable. Without an explicit `order_id` a fresh one is generated.
    ///
    /// # Arguments
    ///
    /// * `order_id` - ID to record, or `None` to generate one
    /// * `method` - Payment method
    /// * `coupon` - Optional coupon code
    ///
    /// # Returns
    ///
    /// The recorded order.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Pricing fails (invalid coupon, card minimum not met)
    /// - The reconciler rejects the checkout (empty cart, insufficient
    ///   stock, unknown product, duplicate order ID)
    /// - The local cache write fails
    pub fn checkout(
        &mut self,
        order_id: Option<OrderId>,
        method: PaymentMethod,
        coupon: Option<&str>,
    ) -> Result<Order, StoreError> {
        let quote = self.quote(coupon, method)?;
        let request = CheckoutRequest {
            order_id: order_id.unwrap_or_else(generate_order_id),
            payment_method: method,
            total: quote.total,
        };

        let (next, order) =
            self.reconciler
                .checkout(&self.snapshot, self.cart.items(), request, Utc::now())?;
        self.commit(next)?;
        self.cart.clear();

        info!(
            order = %order.id,
            total = %order.total,
            units = order.unit_count(),
            "Order placed"
        );
        Ok(order)
    }

    /// Mark a pending order as paid
    ///
    /// # Errors
    ///
    /// Returns an error if the order is missing or already terminal, or if
    /// the local cache write fails.
    pub fn confirm_payment(&mut self, order_id: &str) -> Result<(), StoreError> {
        let next = self.reconciler.confirm_payment(&self.snapshot, order_id)?;
        self.commit(next)?;
        info!(order = order_id, "Payment confirmed");
        Ok(())
    }

    /// Cancel an order and restock its lines
    ///
    /// # Errors
    ///
    /// Returns an error if the order is missing, already cancelled, or paid
    /// under a strict policy, or if the local cache write fails.
    pub fn cancel_order(&mut self, order_id: &str) -> Result<(), StoreError> {
        let next = self.reconciler.cancel_order(&self.snapshot, order_id)?;
        self.commit(next)?;
        info!(order = order_id, "Order cancelled");
        Ok(())
    }

    /// Overwrite a product's stock
    ///
    /// # Errors
    ///
    /// Returns an error if the product is missing or the local cache write
    /// fails.
    pub fn adjust_stock(&mut self, product_id: &str, stock: u32) -> Result<(), StoreError> {
        let next = self
            .reconciler
            .adjust_stock(&self.snapshot, product_id, stock)?;
        self.commit(next)?;
        info!(product = product_id, stock, "Stock adjusted");
        Ok(())
    }

    /// Replace a product's catalog entry
    ///
    /// # Errors
    ///
    /// Returns an error if no product has the same ID or the local cache
    /// write fails.
    pub fn update_product(&mut self, product: Product) -> Result<(), StoreError> {
        let product_id = product.id.clone();
        let next = self.reconciler.update_product(&self.snapshot, product)?;
        self.commit(next)?;
        info!(product = %product_id, "Product updated");
        Ok(())
    }

    /// Route one action to the matching operation
    ///
    /// Cart no-ops (unknown or exhausted product on add) are not errors.
    ///
    /// # Errors
    ///
    /// Propagates the error of the underlying operation.
    pub fn apply(&mut self, action: StoreAction) -> Result<(), StoreError> {
        match action {
            StoreAction::AddToCart { product_id } => {
                self.add_to_cart(&product_id);
                Ok(())
            }
            StoreAction::SetQuantity {
                product_id,
                quantity,
            } => {
                self.update_cart_quantity(&product_id, quantity);
                Ok(())
            }
            StoreAction::RemoveFromCart { product_id } => {
                self.remove_from_cart(&product_id);
                Ok(())
            }
            StoreAction::ClearCart => {
                self.clear_cart();
                Ok(())
            }
            StoreAction::Checkout {
                order_id,
                payment_method,
                coupon,
            } => self
                .checkout(order_id, payment_method, coupon.as_deref())
                .map(|_| ()),
            StoreAction::ConfirmPayment { order_id } => self.confirm_payment(&order_id),
            StoreAction::CancelOrder { order_id } => self.cancel_order(&order_id),
            StoreAction::AdjustStock { product_id, stock } => {
                self.adjust_stock(&product_id, stock)
            }
        }
    }

    /// Wait for queued remote uploads
    pub async fn flush(&mut self) {
        self.sync.flush().await;
    }

    fn commit(&mut self, next: StoreSnapshot) -> Result<(), StoreError> {
        self.sync.commit(&next)?;
        self.snapshot = next;
        Ok(())
    }
}
