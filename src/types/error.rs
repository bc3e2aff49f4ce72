//! Error types for the storefront engine
//!
//! This module defines all error types that can occur while replaying user
//! actions, reconciling inventory, and persisting state.
//!
//! # Error Categories
//!
//! - **File I/O Errors**: unreadable action files, report output failures
//! - **Parsing Errors**: malformed action CSV rows, undecodable cache data
//! - **Precondition Errors**: unknown products/orders, insufficient stock,
//!   terminal orders; the requested action does not apply and state is unchanged
//! - **Persistence Errors**: the local cache refused a write
//! - **Arithmetic Errors**: overflow in stock, sales or price calculations

use rust_decimal::Decimal;
use thiserror::Error;

use super::order::OrderStatus;
use crate::persistence::RemoteError;

/// Main error type for the storefront engine
///
/// Every variant except the I/O and persistence ones is recoverable: the
/// action is rejected, the snapshot stays as it was, and processing continues.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StoreError {
    /// File not found at the specified path
    ///
    /// This is a fatal error that prevents a replay from starting.
    #[error("File not found: {path}")]
    FileNotFound {
        /// The path that was not found
        path: String,
    },

    /// I/O error occurred while reading or writing files
    #[error("I/O error: {message}")]
    IoError {
        /// Description of the I/O error
        message: String,
    },

    /// Action CSV parsing error
    ///
    /// This is a recoverable error - the malformed row is skipped.
    #[error("CSV parse error{}: {message}", line.map(|l| format!(" at line {}", l)).unwrap_or_default())]
    ParseError {
        /// Line number where the error occurred (if available)
        line: Option<u64>,
        /// Description of the parsing error
        message: String,
    },

    /// JSON (de)serialization of catalog or order data failed
    #[error("Serialization error: {message}")]
    Serialization {
        /// Description of the serialization failure
        message: String,
    },

    /// The product does not exist in the catalog
    #[error("Product '{product}' not found for {operation}")]
    ProductNotFound {
        /// Product ID that was not found
        product: String,
        /// Operation that failed
        operation: String,
    },

    /// The order does not exist in the ledger
    #[error("Order '{order}' not found for {operation}")]
    OrderNotFound {
        /// Order ID that was not found
        order: String,
        /// Operation that failed
        operation: String,
    },

    /// An order with the same ID is already recorded
    #[error("Duplicate order ID '{order}'")]
    DuplicateOrder {
        /// Order ID that is duplicated
        order: String,
    },

    /// Checkout was requested with nothing in the cart
    #[error("Cannot check out an empty cart")]
    EmptyCart,

    /// Not enough units in stock to apply the requested change
    ///
    /// Raised at checkout when a cart quantity was raised past the stock
    /// after it was added, and by any delta that would take stock below zero.
    #[error("Insufficient stock for product '{product}': available {available}, requested {requested}")]
    InsufficientStock {
        /// Product ID
        product: String,
        /// Units in stock
        available: u32,
        /// Units requested
        requested: u64,
    },

    /// The order already reached a terminal status
    #[error("Order '{order}' is already {status} ({operation})")]
    OrderAlreadyTerminal {
        /// Order ID
        order: String,
        /// Current status
        status: OrderStatus,
        /// Operation that failed
        operation: String,
    },

    /// The order was already cancelled; repeat cancellation is a no-op
    #[error("Order '{order}' is already cancelled")]
    OrderAlreadyCancelled {
        /// Order ID
        order: String,
    },

    /// Strict policy refuses to cancel an order whose payment was confirmed
    #[error("Order '{order}' is paid and cannot be cancelled")]
    PaidOrderCancellation {
        /// Order ID
        order: String,
    },

    /// Arithmetic overflow would occur
    #[error("Arithmetic overflow in {operation} for product '{product}'")]
    ArithmeticOverflow {
        /// Operation that would overflow
        operation: String,
        /// Product ID
        product: String,
    },

    /// A product record breaks a catalog invariant
    #[error("Invalid product '{product}': {message}")]
    InvalidProduct {
        /// Product ID
        product: String,
        /// Which invariant was broken
        message: String,
    },

    /// The coupon code is unknown or inactive
    #[error("Invalid coupon '{code}'")]
    InvalidCoupon {
        /// Coupon code as entered
        code: String,
    },

    /// Card payments require a minimum order total
    #[error("Card payments require a total of at least {minimum}, got {total}")]
    CardMinimumNotMet {
        /// Minimum total for card payments
        minimum: Decimal,
        /// Quoted total
        total: Decimal,
    },

    /// The local durable cache rejected a write
    ///
    /// This is the durability boundary: the operation is not applied.
    #[error("Local persistence failed for key '{key}': {message}")]
    LocalPersistence {
        /// Cache key being written
        key: String,
        /// Description of the failure
        message: String,
    },

    /// The remote store could not be reached or answered with an error
    #[error("Remote store unavailable: {0}")]
    Remote(#[from] RemoteError),

    /// Invalid configuration value
    #[error("Invalid configuration: {message}")]
    Config {
        /// Description of the problem
        message: String,
    },
}

// Conversion from io::Error to StoreError
impl From<std::io::Error> for StoreError {
    fn from(error: std::io::Error) -> Self {
        StoreError::IoError {
            message: error.to_string(),
        }
    }
}

// Conversion from csv::Error to StoreError
impl From<csv::Error> for StoreError {
    fn from(error: csv::Error) -> Self {
        // Extract line number if available
        let line = error.position().map(|pos| pos.line());

        StoreError::ParseError {
            line,
            message: error.to_string(),
        }
    }
}

// Conversion from serde_json::Error to StoreError
impl From<serde_json::Error> for StoreError {
    fn from(error: serde_json::Error) -> Self {
        StoreError::Serialization {
            message: error.to_string(),
        }
    }
}

// Helper functions for creating common errors

impl StoreError {
    /// Create a ProductNotFound error
    pub fn product_not_found(product: &str, operation: &str) -> Self {
        StoreError::ProductNotFound {
            product: product.to_string(),
            operation: operation.to_string(),
        }
    }

    /// Create an OrderNotFound error
    pub fn order_not_found(order: &str, operation: &str) -> Self {
        StoreError::OrderNotFound {
            order: order.to_string(),
            operation: operation.to_string(),
        }
    }

    /// Create a DuplicateOrder error
    pub fn duplicate_order(order: &str) -> Self {
        StoreError::DuplicateOrder {
            order: order.to_string(),
        }
    }

    /// Create an InsufficientStock error
    pub fn insufficient_stock(product: &str, available: u32, requested: u64) -> Self {
        StoreError::InsufficientStock {
            product: product.to_string(),
            available,
            requested,
        }
    }

    /// Create an OrderAlreadyTerminal error
    pub fn order_already_terminal(order: &str, status: OrderStatus, operation: &str) -> Self {
        StoreError::OrderAlreadyTerminal {
            order: order.to_string(),
            status,
            operation: operation.to_string(),
        }
    }

    /// Create an OrderAlreadyCancelled error
    pub fn order_already_cancelled(order: &str) -> Self {
        StoreError::OrderAlreadyCancelled {
            order: order.to_string(),
        }
    }

    /// Create a PaidOrderCancellation error
    pub fn paid_order_cancellation(order: &str) -> Self {
        StoreError::PaidOrderCancellation {
            order: order.to_string(),
        }
    }

    /// Create an ArithmeticOverflow error
    pub fn arithmetic_overflow(operation: &str, product: &str) -> Self {
        StoreError::ArithmeticOverflow {
            operation: operation.to_string(),
            product: product.to_string(),
        }
    }

    /// Create an InvalidProduct error
    pub fn invalid_product(product: &str, message: impl Into<String>) -> Self {
        StoreError::InvalidProduct {
            product: product.to_string(),
            message: message.into(),
        }
    }

    /// Create an InvalidCoupon error
    pub fn invalid_coupon(code: &str) -> Self {
        StoreError::InvalidCoupon {
            code: code.to_string(),
        }
    }

    /// Create a LocalPersistence error
    pub fn local_persistence(key: &str, message: impl Into<String>) -> Self {
        StoreError::LocalPersistence {
            key: key.to_string(),
            message: message.into(),
        }
    }

    /// Whether the error is a rejected precondition (state left unchanged)
    ///
    /// The dispatcher logs these and carries on with the next action.
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            StoreError::ProductNotFound { .. }
                | StoreError::OrderNotFound { .. }
                | StoreError::DuplicateOrder { .. }
                | StoreError::EmptyCart
                | StoreError::InsufficientStock { .. }
                | StoreError::OrderAlreadyTerminal { .. }
                | StoreError::OrderAlreadyCancelled { .. }
                | StoreError::PaidOrderCancellation { .. }
                | StoreError::InvalidProduct { .. }
                | StoreError::InvalidCoupon { .. }
                | StoreError::CardMinimumNotMet { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal::Decimal;

    #[rstest]
    #[case::file_not_found(
        StoreError::FileNotFound { path: "actions.csv".to_string() },
        "File not found: actions.csv"
    )]
    #[case::parse_error_with_line(
        StoreError::ParseError { line: Some(7), message: "Invalid field".to_string() },
        "CSV parse error at line 7: Invalid field"
    )]
    #[case::parse_error_without_line(
        StoreError::ParseError { line: None, message: "Invalid field".to_string() },
        "CSV parse error: Invalid field"
    )]
    #[case::product_not_found(
        StoreError::ProductNotFound { product: "am-9".to_string(), operation: "adjust_stock".to_string() },
        "Product 'am-9' not found for adjust_stock"
    )]
    #[case::insufficient_stock(
        StoreError::InsufficientStock { product: "am-1".to_string(), available: 2, requested: 5 },
        "Insufficient stock for product 'am-1': available 2, requested 5"
    )]
    #[case::order_already_terminal(
        StoreError::OrderAlreadyTerminal { order: "SN-1".to_string(), status: OrderStatus::Pagado, operation: "confirm_payment".to_string() },
        "Order 'SN-1' is already pagado (confirm_payment)"
    )]
    #[case::card_minimum(
        StoreError::CardMinimumNotMet { minimum: Decimal::new(15000, 0), total: Decimal::new(4000, 0) },
        "Card payments require a total of at least 15000, got 4000"
    )]
    #[case::empty_cart(StoreError::EmptyCart, "Cannot check out an empty cart")]
    fn test_error_display(#[case] error: StoreError, #[case] expected: &str) {
        assert_eq!(error.to_string(), expected);
    }

    #[rstest]
    #[case::product_not_found(
        StoreError::product_not_found("am-9", "checkout"),
        StoreError::ProductNotFound { product: "am-9".to_string(), operation: "checkout".to_string() }
    )]
    #[case::order_not_found(
        StoreError::order_not_found("SN-2", "cancel_order"),
        StoreError::OrderNotFound { order: "SN-2".to_string(), operation: "cancel_order".to_string() }
    )]
    #[case::insufficient_stock(
        StoreError::insufficient_stock("am-1", 1, 3),
        StoreError::InsufficientStock { product: "am-1".to_string(), available: 1, requested: 3 }
    )]
    #[case::already_cancelled(
        StoreError::order_already_cancelled("SN-3"),
        StoreError::OrderAlreadyCancelled { order: "SN-3".to_string() }
    )]
    fn test_helper_functions(#[case] result: StoreError, #[case] expected: StoreError) {
        assert_eq!(result, expected);
    }

    #[rstest]
    #[case::empty_cart(StoreError::EmptyCart, true)]
    #[case::already_cancelled(StoreError::order_already_cancelled("SN-1"), true)]
    #[case::invalid_product(StoreError::invalid_product("am-1", "price -1 is negative"), true)]
    #[case::local_write(StoreError::local_persistence("k", "disk full"), false)]
    #[case::io(StoreError::IoError { message: "denied".to_string() }, false)]
    fn test_precondition_classification(#[case] error: StoreError, #[case] expected: bool) {
        assert_eq!(error.is_precondition(), expected);
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error =
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "Permission denied");
        let error: StoreError = io_error.into();
        assert!(matches!(error, StoreError::IoError { .. }));
        assert_eq!(error.to_string(), "I/O error: Permission denied");
    }
}
