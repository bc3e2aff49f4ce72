//! Types module
//!
//! Contains core data structures used throughout the application.
//! This module organizes types into logical submodules:
//! - `action`: user actions replayed against a storefront
//! - `product`: catalog product and its classification enums
//! - `order`: orders, order lines, status and payment method
//! - `cart`: staged cart lines
//! - `error`: error types for the storefront engine
//! - `timestamp`: lenient timestamp (de)serialization

pub mod action;
pub mod cart;
pub mod error;
pub mod order;
pub mod product;
pub mod timestamp;

pub use action::StoreAction;
pub use cart::CartItem;
pub use error::StoreError;
pub use order::{Order, OrderId, OrderLine, OrderStatus, PaymentMethod};
pub use product::{Gender, Product, ProductId, SockType};
