//! Catalog store
//!
//! This module provides the `Catalog` struct which holds the authoritative
//! product list. It is the single owner of stock and sales counters.
//!
//! The Catalog is immutable from the outside: every change is a pure
//! transform that returns a new `Catalog`, leaving the receiver untouched.
//! This makes multi-product updates (checkout touching several products,
//! stock and sales changing together) all-or-nothing: either the whole new
//! snapshot is produced or an error is returned and nothing changed.
//!
//! Product order is preserved by every transform; it is the order in which
//! the catalog was hydrated and is the tie-breaker for stable view sorting.

use crate::types::{Product, StoreError};
use std::collections::HashMap;

/// A signed change to a product's counters
///
/// Stock changes must never take stock below zero; sales changes clamp at
/// zero (cancellation of an order whose sales were already reversed or
/// adjusted must not underflow).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StockDelta {
    /// Change to `stock`
    pub stock: i64,

    /// Change to `sales_count`
    pub sales: i64,
}

impl StockDelta {
    pub fn new(stock: i64, sales: i64) -> Self {
        StockDelta { stock, sales }
    }

    /// Delta for units leaving the shelf through a sale
    pub fn sale(quantity: u32) -> Self {
        StockDelta::new(-i64::from(quantity), i64::from(quantity))
    }

    /// Delta for units returning to the shelf through a cancellation
    pub fn restock(quantity: u32) -> Self {
        StockDelta::new(i64::from(quantity), -i64::from(quantity))
    }

    /// Combine two deltas for the same product
    pub fn merge(self, other: StockDelta) -> Self {
        StockDelta::new(self.stock + other.stock, self.sales + other.sales)
    }
}

/// Authoritative product list
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    /// Products in hydration order
    products: Vec<Product>,
}

impl Catalog {
    /// Create a catalog from a product list, keeping its order
    pub fn new(products: Vec<Product>) -> Self {
        Catalog { products }
    }

    /// All products, in catalog order
    pub fn all(&self) -> &[Product] {
        &self.products
    }

    /// Look up a product by ID
    pub fn get(&self, id: &str) -> Option<&Product> {
        self.products.iter().find(|product| product.id == id)
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Sum of stock across the catalog
    pub fn total_stock(&self) -> u64 {
        self.products
            .iter()
            .map(|product| u64::from(product.stock))
            .sum()
    }

    /// Apply a stock/sales delta to one product
    ///
    /// Pure transform: returns a new catalog. An unknown product ID is a
    /// no-op (the returned catalog equals this one).
    ///
    /// # Arguments
    ///
    /// * `id` - Product to change
    /// * `delta_stock` - Signed change to stock
    /// * `delta_sales` - Signed change to sales count (clamped at zero)
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The stock change would take stock below zero (`InsufficientStock`)
    /// - A counter would exceed `u32::MAX` (`ArithmeticOverflow`)
    pub fn apply_stock_delta(
        &self,
        id: &str,
        delta_stock: i64,
        delta_sales: i64,
    ) -> Result<Catalog, StoreError> {
        let mut deltas = HashMap::new();
        deltas.insert(id.to_string(), StockDelta::new(delta_stock, delta_sales));
        self.apply_deltas(&deltas)
    }

    /// Apply deltas to many products at once
    ///
    /// All deltas are validated before the new catalog is returned, so a
    /// failure on any product leaves every product unchanged. IDs missing
    /// from the catalog are ignored.
    ///
    /// # Errors
    ///
    /// Same as [`Catalog::apply_stock_delta`], for the first offending product.
    pub fn apply_deltas(&self, deltas: &HashMap<String, StockDelta>) -> Result<Catalog, StoreError> {
        let products = self
            .products
            .iter()
            .map(|product| match deltas.get(&product.id) {
                Some(delta) => apply_delta(product, *delta),
                None => Ok(product.clone()),
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Catalog { products })
    }

    /// Overwrite the stock of one product, leaving sales untouched
    ///
    /// Returns `None` if the product does not exist.
    pub fn with_stock(&self, id: &str, stock: u32) -> Option<Catalog> {
        self.get(id)?;
        let products = self
            .products
            .iter()
            .map(|product| {
                if product.id == id {
                    Product {
                        stock,
                        ..product.clone()
                    }
                } else {
                    product.clone()
                }
            })
            .collect();
        Some(Catalog { products })
    }

    /// Replace the product with the same ID, keeping its catalog position
    ///
    /// Returns `None` if the product does not exist.
    pub fn with_product(&self, replacement: Product) -> Option<Catalog> {
        let position = self
            .products
            .iter()
            .position(|product| product.id == replacement.id)?;
        let mut products = self.products.clone();
        products[position] = replacement;
        Some(Catalog { products })
    }
}

/// Apply a delta to a single product with checked arithmetic
fn apply_delta(product: &Product, delta: StockDelta) -> Result<Product, StoreError> {
    let stock = i64::from(product.stock) + delta.stock;
    if stock < 0 {
        return Err(StoreError::insufficient_stock(
            &product.id,
            product.stock,
            delta.stock.unsigned_abs(),
        ));
    }
    let stock = u32::try_from(stock)
        .map_err(|_| StoreError::arithmetic_overflow("stock_delta", &product.id))?;

    // Sales never go negative, even when reversing more than was recorded
    let sales = (i64::from(product.sales_count) + delta.sales).max(0);
    let sales_count = u32::try_from(sales)
        .map_err(|_| StoreError::arithmetic_overflow("sales_delta", &product.id))?;

    Ok(Product {
        stock,
        sales_count,
        ..product.clone()
    })
}
