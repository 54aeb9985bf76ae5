//! Cart lines.

use crate::catalog::Product;
use crate::error::CommerceError;
use crate::ids::ProductId;
use crate::money::{self, Money};
use serde::{Deserialize, Serialize};

/// One product in the cart, with the price and stock seen when it was added.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CartLine {
    pub product_id: ProductId,
    pub product_name: String,
    #[serde(with = "money::decimal")]
    pub unit_price: Money,
    /// Stock snapshot; quantity never exceeds it.
    pub stock: i64,
    pub quantity: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl CartLine {
    /// New line for `product`. Quantity bounds are the caller's concern.
    pub fn for_product(product: &Product, quantity: i64) -> Self {
        Self {
            product_id: product.id.clone(),
            product_name: product.name.clone(),
            unit_price: product.price,
            stock: product.stock_quantity,
            quantity,
            image: product.thumbnail().map(str::to_string),
        }
    }

    /// unit_price × quantity.
    pub fn line_total(&self) -> Result<Money, CommerceError> {
        self.unit_price.checked_mul(self.quantity)
    }

    pub fn can_increment(&self) -> bool {
        self.quantity < self.stock
    }

    pub fn can_decrement(&self) -> bool {
        self.quantity > 1
    }

    /// The stock snapshot dropped below what is in the cart.
    pub fn exceeds_stock(&self) -> bool {
        self.quantity > self.stock
    }

    /// Check that `quantity` fits this line's bounds.
    pub(crate) fn check_quantity(&self, quantity: i64) -> Result<(), CommerceError> {
        if quantity < 1 {
            return Err(CommerceError::InvalidQuantity(quantity));
        }
        if quantity > self.stock {
            return Err(CommerceError::InsufficientStock {
                product_id: self.product_id.to_string(),
                requested: quantity,
                available: self.stock.max(0),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::fixtures;

    #[test]
    fn test_line_bounds() {
        let products = fixtures::demo_products();
        let line = CartLine::for_product(&products[4], 6);
        assert_eq!(line.line_total().unwrap(), Money::brl(23940));
        assert!(!line.can_increment());
        assert!(line.can_decrement());
        assert!(line.check_quantity(6).is_ok());
        assert!(matches!(
            line.check_quantity(7),
            Err(CommerceError::InsufficientStock { available: 6, .. })
        ));
        assert_eq!(line.check_quantity(0), Err(CommerceError::InvalidQuantity(0)));
        assert_eq!(line.image.as_deref(), Some("/logo.png"));
    }
}
