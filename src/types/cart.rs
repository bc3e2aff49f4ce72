//! Cart line type
//!
//! A `CartItem` is a copy of the product taken when it was first added,
//! plus a quantity. Later catalog changes do not reach it until checkout.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::product::Product;

/// A staged purchase line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    /// Product snapshot at add time
    #[serde(flatten)]
    pub product: Product,

    /// Units selected (always at least 1)
    pub quantity: u32,
}

impl CartItem {
    /// Create a line with quantity 1 from a catalog product
    pub fn new(product: &Product) -> Self {
        CartItem {
            product: product.clone(),
            quantity: 1,
        }
    }

    pub fn id(&self) -> &str {
        &self.product.id
    }

    /// Price times quantity, `None` on overflow
    pub fn line_total(&self) -> Option<Decimal> {
        self.product.price.checked_mul(Decimal::from(self.quantity))
    }
}
