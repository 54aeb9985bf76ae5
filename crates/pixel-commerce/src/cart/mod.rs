//! Shopping cart module.
//!
//! Cart lines, the state container that guards quantity changes, the
//! aggregator producing totals, and coupons.

mod coupon;
mod line;
mod state;
mod summary;

pub use coupon::Coupon;
pub use line::CartLine;
pub use state::{CartAction, CartState};
pub use summary::{aggregate, aggregate_pairs, OrderSummary};
