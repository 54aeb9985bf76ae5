//! Cart totals.

use crate::cart::{CartLine, Coupon};
use crate::checkout::ShippingPolicy;
use crate::error::CommerceError;
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// Totals shown in the cart sidebar.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct OrderSummary {
    /// Σ unit price × quantity.
    pub subtotal: Money,
    pub shipping: Money,
    /// Coupon discount, zero without one.
    pub discount: Money,
    /// subtotal − discount + shipping.
    pub total: Money,
    /// Σ quantity.
    pub item_count: i64,
    /// Amount still missing for free shipping.
    pub remaining_for_free_shipping: Money,
}

impl OrderSummary {
    pub fn has_free_shipping(&self) -> bool {
        self.shipping.is_zero()
    }

    pub fn has_discount(&self) -> bool {
        self.discount.is_positive()
    }

    /// Take a coupon off the total. Shipping keeps using the pre-discount
    /// subtotal.
    pub fn with_coupon(mut self, coupon: &Coupon) -> Result<Self, CommerceError> {
        let discount = coupon.discount_for(&self.subtotal)?;
        self.total = self
            .subtotal
            .checked_sub(&discount)?
            .checked_add(&self.shipping)?;
        self.discount = discount;
        Ok(self)
    }
}

/// Aggregate (unit price, quantity) pairs under a shipping policy.
///
/// Every amount must be in the policy's currency and every quantity at
/// least one.
pub fn aggregate_pairs(
    pairs: impl IntoIterator<Item = (Money, i64)>,
    policy: &ShippingPolicy,
) -> Result<OrderSummary, CommerceError> {
    let currency = policy.currency();
    let mut subtotal = Money::zero(currency);
    let mut item_count: i64 = 0;

    for (unit_price, quantity) in pairs {
        if quantity < 1 {
            return Err(CommerceError::InvalidQuantity(quantity));
        }
        subtotal = subtotal.checked_add(&unit_price.checked_mul(quantity)?)?;
        item_count = item_count
            .checked_add(quantity)
            .ok_or(CommerceError::Overflow)?;
    }

    let shipping = policy.shipping_for(&subtotal)?;
    Ok(OrderSummary {
        subtotal,
        shipping,
        discount: Money::zero(currency),
        total: subtotal.checked_add(&shipping)?,
        item_count,
        remaining_for_free_shipping: policy.remaining_for_free_shipping(&subtotal)?,
    })
}

/// Aggregate cart lines.
pub fn aggregate(lines: &[CartLine], policy: &ShippingPolicy) -> Result<OrderSummary, CommerceError> {
    aggregate_pairs(lines.iter().map(|l| (l.unit_price, l.quantity)), policy)
}
