//! Order-related types for the storefront
//!
//! This module defines the `Order` produced by checkout, its line items,
//! payment method tag, and lifecycle status.
//!
//! # Lifecycle
//!
//! ```text
//! pendiente ──confirm──▶ pagado
//!     │
//!     └──────cancel────▶ cancelado
//! ```
//!
//! `pagado` and `cancelado` are terminal for confirmation. Orders are
//! immutable apart from their status.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::product::ProductId;
use super::timestamp;

/// Order identifier (e.g. `SN-1A2B3C4D`)
pub type OrderId = String;

/// Order lifecycle status
///
/// Serialized with the storefront's Spanish literals so existing caches and
/// remote rows keep working.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Created at checkout, awaiting payment
    Pendiente,

    /// Payment confirmed (terminal)
    Pagado,

    /// Cancelled, inventory effect reversed (terminal)
    Cancelado,
}

impl OrderStatus {
    /// Whether no further confirmation is accepted
    pub fn is_terminal(&self) -> bool {
        !matches!(self, OrderStatus::Pendiente)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pendiente => "pendiente",
            OrderStatus::Pagado => "pagado",
            OrderStatus::Cancelado => "cancelado",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payment method tag
///
/// Metadata only; payments are settled outside the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    /// Bank transfer, coordinated manually
    Transfer,

    /// Card payment, subject to the card minimum
    Card,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Transfer => "transfer",
            PaymentMethod::Card => "card",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "transfer" => Ok(PaymentMethod::Transfer),
            "card" => Ok(PaymentMethod::Card),
            other => Err(format!("Unknown payment method '{}'", other)),
        }
    }
}

/// A purchased line, captured at checkout
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    pub product_id: ProductId,
    pub name: String,
    pub quantity: u32,
}

/// A checkout record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Unique order identifier
    pub id: OrderId,

    /// Checkout time
    #[serde(with = "timestamp")]
    pub date: DateTime<Utc>,

    /// Purchased lines in cart order
    pub items: Vec<OrderLine>,

    /// Amount charged, as quoted at checkout
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,

    pub payment_method: PaymentMethod,

    pub status: OrderStatus,
}

impl Order {
    /// Total number of units across all lines
    pub fn unit_count(&self) -> u64 {
        self.items.iter().map(|line| u64::from(line.quantity)).sum()
    }
}
