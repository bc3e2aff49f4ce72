//! Checkout pricing
//!
//! Turns a cart into the total recorded on the order: subtotal at add-time
//! prices, an optional coupon discount, and the card-payment minimum.

use crate::core::cart::CartLedger;
use crate::types::{PaymentMethod, StoreError};
use rust_decimal::Decimal;

/// Promotional price carried by most of the catalog
pub const SALE_PRICE: Decimal = Decimal::from_parts(2000, 0, 0, false, 0);

/// Lowest order total accepted for card payments
pub const MIN_CARD_AMOUNT: Decimal = Decimal::from_parts(15000, 0, 0, false, 0);

/// A discount code
#[derive(Debug, Clone, PartialEq)]
pub struct Coupon {
    pub code: &'static str,

    /// Fraction taken off the subtotal (0.15 = 15 %)
    pub discount: Decimal,

    pub active: bool,
}

/// Coupons honoured at checkout
pub const COUPONS: [Coupon; 2] = [
    Coupon {
        code: "BIENVENIDA",
        discount: Decimal::from_parts(15, 0, 0, false, 2),
        active: true,
    },
    Coupon {
        code: "MAYORISTA",
        discount: Decimal::from_parts(35, 0, 0, false, 2),
        active: true,
    },
];

/// Look up an active coupon by code (case-insensitive)
pub fn find_coupon(code: &str) -> Option<&'static Coupon> {
    COUPONS
        .iter()
        .find(|coupon| coupon.active && coupon.code.eq_ignore_ascii_case(code.trim()))
}

/// Priced cart
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quote {
    pub subtotal: Decimal,
    pub discount: Decimal,
    /// Amount to record on the order
    pub total: Decimal,
}

/// Price a cart for the chosen payment method
///
/// # Errors
///
/// Returns an error if:
/// - The coupon code is unknown or inactive (`InvalidCoupon`)
/// - The method is card and the total is below [`MIN_CARD_AMOUNT`]
/// - The subtotal overflows
pub fn quote(
    cart: &CartLedger,
    coupon: Option<&str>,
    method: PaymentMethod,
) -> Result<Quote, StoreError> {
    let subtotal = cart
        .subtotal()
        .ok_or_else(|| StoreError::arithmetic_overflow("quote", "cart"))?;

    let rate = match coupon.map(str::trim).filter(|code| !code.is_empty()) {
        Some(code) => {
            find_coupon(code)
                .ok_or_else(|| StoreError::invalid_coupon(code))?
                .discount
        }
        None => Decimal::ZERO,
    };

    let discount = (subtotal * rate).round_dp(2);
    let total = (subtotal - discount).round_dp(2);

    if method == PaymentMethod::Card && total < MIN_CARD_AMOUNT {
        return Err(StoreError::CardMinimumNotMet {
            minimum: MIN_CARD_AMOUNT,
            total,
        });
    }

    Ok(Quote {
        subtotal,
        discount,
        total,
    })
}
