//! User actions replayed against a storefront

use super::order::{OrderId, PaymentMethod};
use super::product::ProductId;

/// One storefront action, as read from an action log
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreAction {
    /// Add one unit of a product to the cart
    AddToCart { product_id: ProductId },

    /// Overwrite a cart line's quantity (0 removes the line)
    SetQuantity { product_id: ProductId, quantity: u32 },

    RemoveFromCart { product_id: ProductId },

    ClearCart,

    /// Commit the cart as an order
    Checkout {
        order_id: Option<OrderId>,
        payment_method: PaymentMethod,
        coupon: Option<String>,
    },

    ConfirmPayment { order_id: OrderId },

    CancelOrder { order_id: OrderId },

    /// Overwrite a product's stock
    AdjustStock { product_id: ProductId, stock: u32 },
}

impl StoreAction {
    /// Short action name, as written in action logs
    pub fn name(&self) -> &'static str {
        match self {
            StoreAction::AddToCart { .. } => "add",
            StoreAction::SetQuantity { .. } => "set_quantity",
            StoreAction::RemoveFromCart { .. } => "remove",
            StoreAction::ClearCart => "clear",
            StoreAction::Checkout { .. } => "checkout",
            StoreAction::ConfirmPayment { .. } => "confirm",
            StoreAction::CancelOrder { .. } => "cancel",
            StoreAction::AdjustStock { .. } => "adjust",
        }
    }

    /// Whether the action goes through a durable commit
    pub fn mutates_state(&self) -> bool {
        matches!(
            self,
            StoreAction::Checkout { .. }
                | StoreAction::ConfirmPayment { .. }
                | StoreAction::CancelOrder { .. }
                | StoreAction::AdjustStock { .. }
        )
    }
}
