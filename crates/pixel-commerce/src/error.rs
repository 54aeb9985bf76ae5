//! Commerce error types.

use thiserror::Error;

/// Errors raised by the pure storefront logic (cart, money, coupons).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommerceError {
    /// Product not in the catalog snapshot.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Item not in cart.
    #[error("Item not in cart: {0}")]
    ItemNotInCart(String),

    /// Requested quantity exceeds the stock on hand.
    #[error("Insufficient stock for {product_id}: requested {requested}, available {available}")]
    InsufficientStock {
        product_id: String,
        requested: i64,
        available: i64,
    },

    /// Quantity outside the allowed range (a cart line holds at least one unit).
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(i64),

    /// Currency mismatch.
    #[error("Currency mismatch: expected {expected}, got {got}")]
    CurrencyMismatch { expected: String, got: String },

    /// Arithmetic overflow.
    #[error("Arithmetic overflow in money calculation")]
    Overflow,

    /// Text that is not a valid decimal amount.
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// Checkout attempted with nothing in the cart.
    #[error("Cart is empty")]
    EmptyCart,

    /// Coupon rejected.
    #[error("Invalid coupon {code}: {reason}")]
    InvalidCoupon { code: String, reason: String },
}

impl CommerceError {
    pub(crate) fn currency_mismatch(
        expected: crate::money::Currency,
        got: crate::money::Currency,
    ) -> Self {
        CommerceError::CurrencyMismatch {
            expected: expected.code().to_string(),
            got: got.code().to_string(),
        }
    }
}
