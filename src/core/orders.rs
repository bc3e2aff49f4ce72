//! Order ledger
//!
//! This module provides the `OrderLedger`, the most-recent-first list of
//! orders produced by checkout. Like the catalog it is a value: every
//! change returns a new ledger.
//!
//! # Duplicate Handling
//!
//! Order IDs are unique. Prepending an order whose ID is already recorded
//! is rejected rather than silently shadowing the earlier order.

use crate::types::{Order, OrderStatus, StoreError};

/// Ledger of orders, newest first
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderLedger {
    orders: Vec<Order>,
}

impl OrderLedger {
    /// Create a ledger from persisted orders, keeping their order
    pub fn new(orders: Vec<Order>) -> Self {
        OrderLedger { orders }
    }

    /// All orders, newest first
    pub fn all(&self) -> &[Order] {
        &self.orders
    }

    /// Get an order by ID
    ///
    /// # Returns
    ///
    /// * `Some(&Order)` - If the order exists
    /// * `None` - If the order ID is not found
    pub fn get(&self, id: &str) -> Option<&Order> {
        self.orders.iter().find(|order| order.id == id)
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// Record a new order at the head of the ledger
    ///
    /// # Errors
    ///
    /// Returns `DuplicateOrder` if an order with the same ID exists.
    pub fn prepend(&self, order: Order) -> Result<OrderLedger, StoreError> {
        if self.get(&order.id).is_some() {
            return Err(StoreError::duplicate_order(&order.id));
        }

        let mut orders = Vec::with_capacity(self.orders.len() + 1);
        orders.push(order);
        orders.extend(self.orders.iter().cloned());
        Ok(OrderLedger { orders })
    }

    /// Return a ledger where the given order carries a new status
    ///
    /// Status is the only mutable field of an order. Transition rules are
    /// enforced by the reconciler; this only performs the replacement.
    ///
    /// # Errors
    ///
    /// Returns `OrderNotFound` if the order ID is not found.
    pub fn with_status(&self, id: &str, status: OrderStatus) -> Result<OrderLedger, StoreError> {
        if self.get(id).is_none() {
            return Err(StoreError::order_not_found(id, "set_status"));
        }

        let orders = self
            .orders
            .iter()
            .map(|order| {
                if order.id == id {
                    Order {
                        status,
                        ..order.clone()
                    }
                } else {
                    order.clone()
                }
            })
            .collect();
        Ok(OrderLedger { orders })
    }

    /// Number of orders currently in the given status
    pub fn count_with_status(&self, status: OrderStatus) -> usize {
        self.orders
            .iter()
            .filter(|order| order.status == status)
            .count()
    }
}
