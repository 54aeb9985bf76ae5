//! Product records.

use crate::catalog::{Category, Material};
use crate::ids::ProductId;
use crate::money::{self, Money};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Stock at or below this count (and above zero) is flagged as running low.
pub const LOW_STOCK_THRESHOLD: i64 = 5;

/// A row of the `products` table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Unit price in the store currency.
    #[serde(with = "money::decimal")]
    pub price: Money,
    pub stock_quantity: i64,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub images_url: Vec<String>,
    #[serde(default)]
    pub category: Option<Category>,
    #[serde(default)]
    pub material: Option<Material>,
    #[serde(default)]
    pub print_time_hours: Option<f64>,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default = "default_true")]
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Nothing left to sell.
    pub fn is_out_of_stock(&self) -> bool {
        self.stock_quantity <= 0
    }

    /// Only a handful left.
    pub fn is_low_stock(&self) -> bool {
        self.stock_quantity > 0 && self.stock_quantity <= LOW_STOCK_THRESHOLD
    }

    /// Visible and purchasable.
    pub fn is_available(&self) -> bool {
        self.is_active && !self.is_out_of_stock()
    }

    /// First image, used as the listing thumbnail.
    pub fn thumbnail(&self) -> Option<&str> {
        self.images_url.first().map(String::as_str)
    }

    /// Case-insensitive substring match over name or description.
    pub fn matches_text(&self, needle_lower: &str) -> bool {
        self.name.to_lowercase().contains(needle_lower)
            || self
                .description
                .as_deref()
                .map(|d| d.to_lowercase().contains(needle_lower))
                .unwrap_or(false)
    }
}

/// Payload for creating a product from the admin panel.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewProduct {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(with = "money::decimal")]
    pub price: Money,
    pub stock_quantity: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub material: Option<Material>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub print_time_hours: Option<f64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub images_url: Vec<String>,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl NewProduct {
    /// A minimal active product.
    pub fn new(name: impl Into<String>, price: Money, stock_quantity: i64) -> Self {
        Self {
            name: name.into(),
            description: None,
            price,
            stock_quantity,
            category: None,
            material: None,
            print_time_hours: None,
            images_url: Vec::new(),
            is_featured: false,
            is_active: true,
        }
    }

    /// Materialise as a stored row.
    pub fn into_product(self, id: ProductId, now: DateTime<Utc>) -> Product {
        Product {
            id,
            name: self.name,
            description: self.description,
            price: self.price,
            stock_quantity: self.stock_quantity,
            images_url: self.images_url,
            category: self.category,
            material: self.material,
            print_time_hours: self.print_time_hours,
            is_featured: self.is_featured,
            is_active: self.is_active,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Partial update; `None` fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ProductUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(
        default,
        with = "money::decimal_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub price: Option<Money>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock_quantity: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub material: Option<Material>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_featured: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

impl ProductUpdate {
    /// Apply to a row in place.
    pub fn apply(&self, product: &mut Product, now: DateTime<Utc>) {
        if let Some(name) = &self.name {
            product.name = name.clone();
        }
        if let Some(description) = &self.description {
            product.description = Some(description.clone());
        }
        if let Some(price) = self.price {
            product.price = price;
        }
        if let Some(stock) = self.stock_quantity {
            product.stock_quantity = stock;
        }
        if let Some(category) = &self.category {
            product.category = Some(category.clone());
        }
        if let Some(material) = &self.material {
            product.material = Some(material.clone());
        }
        if let Some(featured) = self.is_featured {
            product.is_featured = featured;
        }
        if let Some(active) = self.is_active {
            product.is_active = active;
        }
        product.updated_at = now;
    }
}

fn default_true() -> bool {
    true
}

fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::fixtures;

    #[test]
    fn test_stock_flags() {
        let mut product = fixtures::demo_products().remove(0);
        product.stock_quantity = 0;
        assert!(product.is_out_of_stock());
        assert!(!product.is_low_stock());
        assert!(!product.is_available());

        product.stock_quantity = 5;
        assert!(product.is_low_stock());
        product.stock_quantity = 6;
        assert!(!product.is_low_stock());
        assert!(product.is_available());
    }

    #[test]
    fn test_deserialize_provider_row() {
        let row = serde_json::json!({
            "id": "b7e0c1de-1111-4aaa-8bbb-000000000002",
            "name": "Dragão Pixel Art",
            "description": null,
            "price": 45.9,
            "stock_quantity": 8,
            "images_url": null,
            "category": "decorative",
            "material": "PETG",
            "print_time_hours": 6.0,
            "created_at": "2024-01-14T10:00:00Z",
            "updated_at": "2024-01-14T10:00:00+00:00",
            "is_featured": true,
            "is_active": true
        });
        let product: Product = serde_json::from_value(row).unwrap();
        assert_eq!(product.price, Money::brl(4590));
        assert!(product.images_url.is_empty());
        assert_eq!(product.category, Some(Category::Decorative));
        assert_eq!(product.thumbnail(), None);
    }

    #[test]
    fn test_update_only_touches_set_fields() {
        let mut product = fixtures::demo_products().remove(1);
        let before = product.clone();
        let update = ProductUpdate {
            stock_quantity: Some(3),
            is_featured: Some(false),
            ..Default::default()
        };
        update.apply(&mut product, before.updated_at);
        assert_eq!(product.stock_quantity, 3);
        assert!(!product.is_featured);
        assert_eq!(product.name, before.name);
        assert_eq!(product.price, before.price);
    }

    #[test]
    fn test_update_serializes_only_changes() {
        let update = ProductUpdate {
            price: Some(Money::brl(1990)),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(&update).unwrap(),
            serde_json::json!({ "price": "19.90" })
        );
    }
}
