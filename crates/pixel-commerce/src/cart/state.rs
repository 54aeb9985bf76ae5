//! Cart state container.

use crate::cart::{aggregate, CartLine, Coupon, OrderSummary};
use crate::catalog::Product;
use crate::checkout::ShippingPolicy;
use crate::error::CommerceError;
use crate::ids::ProductId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Changes a shopper can make to the cart.
#[derive(Debug, Clone, PartialEq)]
pub enum CartAction {
    /// Add units of a product, merging with an existing line.
    Add { product: Product, quantity: i64 },
    Increment(ProductId),
    Decrement(ProductId),
    SetQuantity { product_id: ProductId, quantity: i64 },
    Remove(ProductId),
    Clear,
}

/// The shopper's cart. A rejected action leaves it untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CartState {
    lines: Vec<CartLine>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    coupon: Option<Coupon>,
}

impl CartState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild from stored lines (e.g., the provider's `cart_items`).
    pub fn from_lines(lines: Vec<CartLine>) -> Self {
        Self {
            lines,
            coupon: None,
        }
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn line(&self, product_id: &ProductId) -> Option<&CartLine> {
        self.lines.iter().find(|l| &l.product_id == product_id)
    }

    fn line_mut(&mut self, product_id: &ProductId) -> Result<&mut CartLine, CommerceError> {
        self.lines
            .iter_mut()
            .find(|l| &l.product_id == product_id)
            .ok_or_else(|| CommerceError::ItemNotInCart(product_id.to_string()))
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Total units (the header badge).
    pub fn item_count(&self) -> i64 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    pub fn coupon(&self) -> Option<&Coupon> {
        self.coupon.as_ref()
    }

    /// Apply an action.
    pub fn apply(&mut self, action: CartAction) -> Result<(), CommerceError> {
        match action {
            CartAction::Add { product, quantity } => self.add(&product, quantity),
            CartAction::Increment(id) => self.increment(&id),
            CartAction::Decrement(id) => self.decrement(&id),
            CartAction::SetQuantity {
                product_id,
                quantity,
            } => self.set_quantity(&product_id, quantity),
            CartAction::Remove(id) => self.remove(&id),
            CartAction::Clear => {
                self.clear();
                Ok(())
            }
        }
    }

    /// Add `quantity` units of `product`.
    pub fn add(&mut self, product: &Product, quantity: i64) -> Result<(), CommerceError> {
        if quantity < 1 {
            return Err(CommerceError::InvalidQuantity(quantity));
        }
        if !product.is_active {
            return Err(CommerceError::ProductNotFound(product.id.to_string()));
        }
        if let Some(first) = self.lines.first() {
            if first.unit_price.currency != product.price.currency {
                return Err(CommerceError::currency_mismatch(
                    first.unit_price.currency,
                    product.price.currency,
                ));
            }
        }

        let existing = self.line(&product.id).map(|l| l.quantity).unwrap_or(0);
        let wanted = existing
            .checked_add(quantity)
            .ok_or(CommerceError::Overflow)?;
        // Price and stock follow the latest catalog snapshot.
        let fresh = CartLine::for_product(product, wanted);
        fresh.check_quantity(wanted)?;

        match self.lines.iter_mut().find(|l| l.product_id == product.id) {
            Some(line) => *line = fresh,
            None => self.lines.push(fresh),
        }
        debug!(product_id = %product.id, quantity = wanted, "cart line updated");
        Ok(())
    }

    /// One more unit, up to the stock snapshot.
    pub fn increment(&mut self, product_id: &ProductId) -> Result<(), CommerceError> {
        let line = self.line_mut(product_id)?;
        let wanted = line.quantity + 1;
        line.check_quantity(wanted)?;
        line.quantity = wanted;
        Ok(())
    }

    /// One unit less, never below one.
    pub fn decrement(&mut self, product_id: &ProductId) -> Result<(), CommerceError> {
        let line = self.line_mut(product_id)?;
        let wanted = line.quantity - 1;
        line.check_quantity(wanted)?;
        line.quantity = wanted;
        Ok(())
    }

    pub fn set_quantity(&mut self, product_id: &ProductId, quantity: i64) -> Result<(), CommerceError> {
        let line = self.line_mut(product_id)?;
        line.check_quantity(quantity)?;
        line.quantity = quantity;
        Ok(())
    }

    pub fn remove(&mut self, product_id: &ProductId) -> Result<(), CommerceError> {
        let before = self.lines.len();
        self.lines.retain(|l| &l.product_id != product_id);
        if self.lines.len() == before {
            return Err(CommerceError::ItemNotInCart(product_id.to_string()));
        }
        Ok(())
    }

    /// Empty the cart and drop the coupon.
    pub fn clear(&mut self) {
        self.lines.clear();
        self.coupon = None;
    }

    /// Attach a coupon if it can be redeemed at `now`.
    pub fn apply_coupon(&mut self, coupon: Coupon, now: DateTime<Utc>) -> Result<(), CommerceError> {
        coupon.check(now)?;
        self.coupon = Some(coupon);
        Ok(())
    }

    pub fn remove_coupon(&mut self) -> Option<Coupon> {
        self.coupon.take()
    }

    /// Totals under `policy`, with the coupon discount if one is attached.
    pub fn summary(&self, policy: &ShippingPolicy) -> Result<OrderSummary, CommerceError> {
        let summary = aggregate(&self.lines, policy)?;
        match &self.coupon {
            Some(coupon) => summary.with_coupon(coupon),
            None => Ok(summary),
        }
    }

    /// Refresh stock snapshots from the catalog and report the lines now
    /// holding more than is on hand. Products missing from `catalog` are left
    /// alone.
    pub fn refresh_stock(&mut self, catalog: &[Product]) -> Vec<ProductId> {
        let mut short = Vec::new();
        for line in &mut self.lines {
            if let Some(product) = catalog.iter().find(|p| p.id == line.product_id) {
                line.stock = product.stock_quantity;
                line.unit_price = product.price;
            }
            if line.exceeds_stock() {
                short.push(line.product_id.clone());
            }
        }
        short
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::fixtures;
    use crate::money::Money;
    use chrono::TimeZone;

    fn demo() -> (Vec<Product>, CartState) {
        let products = fixtures::demo_products();
        let mut cart = CartState::new();
        for (product, quantity) in fixtures::demo_cart() {
            cart.add(&product, quantity).unwrap();
        }
        (products, cart)
    }

    // === Reducer ===

    #[test]
    fn test_add_merges_lines() {
        let (products, mut cart) = demo();
        cart.apply(CartAction::Add {
            product: products[0].clone(),
            quantity: 3,
        })
        .unwrap();
        assert_eq!(cart.lines().len(), 3);
        assert_eq!(cart.line(&products[0].id).unwrap().quantity, 5);
        assert_eq!(cart.item_count(), 7);
    }

    #[test]
    fn test_increment_blocked_at_stock() {
        let (products, mut cart) = demo();
        let vase = &products[4];
        cart.add(vase, 6).unwrap();
        let err = cart.apply(CartAction::Increment(vase.id.clone())).unwrap_err();
        assert_eq!(
            err,
            CommerceError::InsufficientStock {
                product_id: vase.id.to_string(),
                requested: 7,
                available: 6,
            }
        );
        assert_eq!(cart.line(&vase.id).unwrap().quantity, 6);
    }

    #[test]
    fn test_decrement_blocked_below_one() {
        let (products, mut cart) = demo();
        let dragon = &products[1].id;
        assert_eq!(
            cart.apply(CartAction::Decrement(dragon.clone())),
            Err(CommerceError::InvalidQuantity(0))
        );
        assert_eq!(cart.line(dragon).unwrap().quantity, 1);

        cart.increment(dragon).unwrap();
        cart.decrement(dragon).unwrap();
        assert_eq!(cart.line(dragon).unwrap().quantity, 1);
    }

    #[test]
    fn test_out_of_stock_and_inactive_products_rejected() {
        let (products, mut cart) = demo();
        let calibration = &products[5];
        assert!(matches!(
            cart.add(calibration, 1),
            Err(CommerceError::InsufficientStock { available: 0, .. })
        ));

        let mut hidden = products[3].clone();
        hidden.is_active = false;
        assert!(matches!(cart.add(&hidden, 1), Err(CommerceError::ProductNotFound(_))));
        assert_eq!(cart.lines().len(), 3);
    }

    #[test]
    fn test_set_quantity_remove_clear() {
        let (products, mut cart) = demo();
        let benchy = products[0].id.clone();
        cart.apply(CartAction::SetQuantity {
            product_id: benchy.clone(),
            quantity: 15,
        })
        .unwrap();
        assert!(cart
            .apply(CartAction::SetQuantity {
                product_id: benchy.clone(),
                quantity: 16,
            })
            .is_err());

        cart.apply(CartAction::Remove(benchy.clone())).unwrap();
        assert!(cart.line(&benchy).is_none());
        assert_eq!(
            cart.apply(CartAction::Remove(benchy.clone())),
            Err(CommerceError::ItemNotInCart(benchy.to_string()))
        );

        cart.apply(CartAction::Clear).unwrap();
        assert!(cart.is_empty());
    }

    #[test]
    fn test_unknown_line() {
        let mut cart = CartState::new();
        let missing = ProductId::new("nope");
        assert!(matches!(
            cart.increment(&missing),
            Err(CommerceError::ItemNotInCart(_))
        ));
    }

    // === Summary ===

    #[test]
    fn test_summary_of_demo_cart() {
        let (_, cart) = demo();
        let summary = cart.summary(&ShippingPolicy::default()).unwrap();
        // 2 × 29.90 + 45.90 + 19.90
        assert_eq!(summary.subtotal, Money::brl(12560));
        assert!(summary.has_free_shipping());
        assert_eq!(summary.total, Money::brl(12560));
        assert_eq!(summary.item_count, 4);
    }

    #[test]
    fn test_summary_with_coupon() {
        let (_, mut cart) = demo();
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        let coupon = Coupon::percent("PIXEL20", 20, Utc.with_ymd_and_hms(2024, 12, 31, 0, 0, 0).unwrap());
        cart.apply_coupon(coupon, now).unwrap();
        let summary = cart.summary(&ShippingPolicy::default()).unwrap();
        assert_eq!(summary.discount, Money::brl(2512));
        assert_eq!(summary.total, Money::brl(10048));

        cart.clear();
        assert!(cart.coupon().is_none());
    }

    #[test]
    fn test_refresh_stock_flags_short_lines() {
        let (mut products, mut cart) = demo();
        products[0].stock_quantity = 1;
        let short = cart.refresh_stock(&products);
        assert_eq!(short, vec![products[0].id.clone()]);
        assert_eq!(cart.line(&products[0].id).unwrap().stock, 1);
    }
}
