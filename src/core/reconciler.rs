//! Inventory reconciliation
//!
//! This module provides the `InventoryReconciler`, which applies every
//! state-changing storefront operation as a transform from one
//! [`StoreSnapshot`] to the next:
//!
//! - **Checkout**: cart lines leave the shelf (stock down, sales up) and a
//!   `pendiente` order is recorded at the head of the ledger
//! - **Payment confirmation**: `pendiente → pagado`, inventory untouched
//! - **Cancellation**: order lines return to the shelf (stock up, sales down
//!   clamped at zero) and the order becomes `cancelado`
//! - **Manual stock adjustment**: absolute overwrite of one product's stock
//! - **Product edit**: replacement of one product's catalog entry
//!
//! Every operation either returns a complete new snapshot or an error; the
//! input snapshot is never modified, so a rejected operation leaves the
//! store exactly as it was.

use crate::core::catalog::{Catalog, StockDelta};
use crate::core::orders::OrderLedger;
use crate::types::{
    CartItem, Order, OrderId, OrderLine, OrderStatus, PaymentMethod, Product, StoreError,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::collections::HashMap;

/// Catalog and order ledger at one point in time
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoreSnapshot {
    pub catalog: Catalog,
    pub orders: OrderLedger,
}

impl StoreSnapshot {
    pub fn new(products: Vec<Product>, orders: Vec<Order>) -> Self {
        StoreSnapshot {
            catalog: Catalog::new(products),
            orders: OrderLedger::new(orders),
        }
    }
}

/// Business rules that are a matter of store policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconcilerPolicy {
    /// Whether an order whose payment was confirmed may still be cancelled
    ///
    /// When allowed, cancelling a `pagado` order restocks its lines like any
    /// other cancellation.
    pub allow_paid_cancellation: bool,
}

impl Default for ReconcilerPolicy {
    fn default() -> Self {
        ReconcilerPolicy {
            allow_paid_cancellation: true,
        }
    }
}

/// Parameters of a checkout commit
#[derive(Debug, Clone, PartialEq)]
pub struct CheckoutRequest {
    pub order_id: OrderId,
    pub payment_method: PaymentMethod,
    /// Amount recorded on the order, as quoted
    pub total: Decimal,
}

/// Applies order lifecycle transitions to catalog inventory
#[derive(Debug, Clone, Copy, Default)]
pub struct InventoryReconciler {
    policy: ReconcilerPolicy,
}

impl InventoryReconciler {
    pub fn new(policy: ReconcilerPolicy) -> Self {
        InventoryReconciler { policy }
    }

    pub fn policy(&self) -> ReconcilerPolicy {
        self.policy
    }

    /// Commit a cart as a new order
    ///
    /// Decrements stock and increments sales for every cart line in a single
    /// catalog transform, then prepends a `pendiente` order. Clearing the
    /// cart is left to the caller, once the new snapshot is durable.
    ///
    /// # Arguments
    ///
    /// * `snapshot` - Current store state
    /// * `cart` - Lines to commit
    /// * `request` - Order ID, payment method and total
    /// * `now` - Order timestamp
    ///
    /// # Returns
    ///
    /// The new snapshot and the recorded order.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The cart is empty
    /// - The order ID is already recorded
    /// - A cart line references a product missing from the catalog
    /// - A cart line asks for more units than are in stock (the cart does
    ///   not re-validate quantity overwrites, so this is checked here)
    pub fn checkout(
        &self,
        snapshot: &StoreSnapshot,
        cart: &[CartItem],
        request: CheckoutRequest,
        now: DateTime<Utc>,
    ) -> Result<(StoreSnapshot, Order), StoreError> {
        if cart.is_empty() {
            return Err(StoreError::EmptyCart);
        }

        // Check for duplicate order ID before touching inventory
        if snapshot.orders.get(&request.order_id).is_some() {
            return Err(StoreError::duplicate_order(&request.order_id));
        }

        let mut deltas: HashMap<String, StockDelta> = HashMap::new();
        for item in cart {
            let delta = deltas.entry(item.id().to_string()).or_default();
            *delta = delta.merge(StockDelta::sale(item.quantity));
        }

        for (product_id, delta) in &deltas {
            let product = snapshot
                .catalog
                .get(product_id)
                .ok_or_else(|| StoreError::product_not_found(product_id, "checkout"))?;
            let requested = delta.stock.unsigned_abs();
            if requested > u64::from(product.stock) {
                return Err(StoreError::insufficient_stock(
                    product_id,
                    product.stock,
                    requested,
                ));
            }
        }

        let catalog = snapshot.catalog.apply_deltas(&deltas)?;

        let order = Order {
            id: request.order_id,
            date: now,
            items: cart
                .iter()
                .map(|item| OrderLine {
                    product_id: item.id().to_string(),
                    name: item.product.name.clone(),
                    quantity: item.quantity,
                })
                .collect(),
            total: request.total,
            payment_method: request.payment_method,
            status: OrderStatus::Pendiente,
        };

        let orders = snapshot.orders.prepend(order.clone())?;

        Ok((StoreSnapshot { catalog, orders }, order))
    }

    /// Confirm payment of a pending order
    ///
    /// Inventory was already applied at checkout, so only the status moves.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The order does not exist
    /// - The order is already `pagado` or `cancelado`
    pub fn confirm_payment(
        &self,
        snapshot: &StoreSnapshot,
        order_id: &str,
    ) -> Result<StoreSnapshot, StoreError> {
        let order = snapshot
            .orders
            .get(order_id)
            .ok_or_else(|| StoreError::order_not_found(order_id, "confirm_payment"))?;

        if order.status.is_terminal() {
            return Err(StoreError::order_already_terminal(
                order_id,
                order.status,
                "confirm_payment",
            ));
        }

        Ok(StoreSnapshot {
            catalog: snapshot.catalog.clone(),
            orders: snapshot.orders.with_status(order_id, OrderStatus::Pagado)?,
        })
    }

    /// Cancel an order and return its units to the shelf
    ///
    /// Sales counters are decremented by the same quantities, clamped at
    /// zero. Lines whose product has since left the catalog are skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The order does not exist
    /// - The order is already `cancelado` (repeat cancellations change nothing)
    /// - The order is `pagado` and the policy forbids paid cancellation
    pub fn cancel_order(
        &self,
        snapshot: &StoreSnapshot,
        order_id: &str,
    ) -> Result<StoreSnapshot, StoreError> {
        let order = snapshot
            .orders
            .get(order_id)
            .ok_or_else(|| StoreError::order_not_found(order_id, "cancel_order"))?;

        match order.status {
            OrderStatus::Cancelado => return Err(StoreError::order_already_cancelled(order_id)),
            OrderStatus::Pagado if !self.policy.allow_paid_cancellation => {
                return Err(StoreError::paid_order_cancellation(order_id));
            }
            OrderStatus::Pagado => {
                tracing::warn!(order = order_id, "cancelling an order whose payment was confirmed");
            }
            OrderStatus::Pendiente => {}
        }

        let mut deltas: HashMap<String, StockDelta> = HashMap::new();
        for line in &order.items {
            let delta = deltas.entry(line.product_id.clone()).or_default();
            *delta = delta.merge(StockDelta::restock(line.quantity));
        }

        Ok(StoreSnapshot {
            catalog: snapshot.catalog.apply_deltas(&deltas)?,
            orders: snapshot
                .orders
                .with_status(order_id, OrderStatus::Cancelado)?,
        })
    }

    /// Overwrite a product's stock with an absolute value
    ///
    /// Out-of-band correction: sales counters and orders are untouched.
    ///
    /// # Errors
    ///
    /// Returns `ProductNotFound` if the product does not exist.
    pub fn adjust_stock(
        &self,
        snapshot: &StoreSnapshot,
        product_id: &str,
        stock: u32,
    ) -> Result<StoreSnapshot, StoreError> {
        let catalog = snapshot
            .catalog
            .with_stock(product_id, stock)
            .ok_or_else(|| StoreError::product_not_found(product_id, "adjust_stock"))?;

        Ok(StoreSnapshot {
            catalog,
            orders: snapshot.orders.clone(),
        })
    }

    /// Replace a product's catalog entry
    ///
    /// # Errors
    ///
    /// Returns `InvalidProduct` if the replacement has a negative price, or
    /// `ProductNotFound` if no product has the same ID.
    pub fn update_product(
        &self,
        snapshot: &StoreSnapshot,
        product: Product,
    ) -> Result<StoreSnapshot, StoreError> {
        product.validate()?;
        let product_id = product.id.clone();
        let catalog = snapshot
            .catalog
            .with_product(product)
            .ok_or_else(|| StoreError::product_not_found(&product_id, "update_product"))?;

        Ok(StoreSnapshot {
            catalog,
            orders: snapshot.orders.clone(),
        })
    }
}
