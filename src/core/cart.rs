//! Cart ledger
//!
//! Transient, session-scoped staging of products before checkout. Stock is
//! validated only when a unit is added (against the product as the caller
//! passes it) and again by the reconciler at checkout; quantity overwrites
//! are not re-validated.

use crate::types::{CartItem, Product};
use rust_decimal::Decimal;

/// Lines selected for purchase, in insertion order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CartLedger {
    items: Vec<CartItem>,
}

impl CartLedger {
    pub fn new() -> Self {
        CartLedger { items: Vec::new() }
    }

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn get(&self, id: &str) -> Option<&CartItem> {
        self.items.iter().find(|item| item.id() == id)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Add one unit of a product
    ///
    /// `product` should be the current catalog entry, since its stock is the
    /// bound. Returns `false` without changing anything when the product is
    /// out of stock or the cart already holds every available unit.
    pub fn add(&mut self, product: &Product) -> bool {
        if !product.in_stock() {
            return false;
        }

        match self.items.iter_mut().find(|item| item.id() == product.id) {
            Some(existing) => {
                if existing.quantity >= product.stock {
                    return false;
                }
                existing.quantity += 1;
            }
            None => self.items.push(CartItem::new(product)),
        }
        true
    }

    /// Overwrite the quantity of a line
    ///
    /// No stock check. A quantity of zero removes the line. Unknown IDs are
    /// ignored.
    pub fn update_quantity(&mut self, id: &str, quantity: u32) {
        if quantity == 0 {
            self.remove(id);
            return;
        }
        if let Some(item) = self.items.iter_mut().find(|item| item.id() == id) {
            item.quantity = quantity;
        }
    }

    pub fn remove(&mut self, id: &str) {
        self.items.retain(|item| item.id() != id);
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Total units across lines (the cart badge count)
    pub fn unit_count(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity)).sum()
    }

    /// Sum of line totals at add-time prices, `None` on overflow
    pub fn subtotal(&self) -> Option<Decimal> {
        self.items
            .iter()
            .try_fold(Decimal::ZERO, |acc, item| acc.checked_add(item.line_total()?))
    }
}
