//! Checkout module.
//!
//! Shipping policy, postal addresses, and the order records written when a
//! cart is checked out.

mod address;
mod order;
mod shipping;

pub use address::ShippingAddress;
pub use order::{
    EmbeddedProduct, NewOrder, NewOrderItem, NewOrderLine, OrderItemRecord, OrderRecord,
    OrderStatus, PaymentMethod, PaymentStatus,
};
pub use shipping::ShippingPolicy;
