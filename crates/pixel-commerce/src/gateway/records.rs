//! Rows of the remaining provider tables, plus their insert and update payloads.

use crate::cart::CartLine;
use crate::checkout::ShippingAddress;
use crate::ids::{CartItemId, CustomerId, PostId, ProductId, ReviewId, UserId, WishlistItemId};
use crate::catalog::Product;
use crate::money::{self, Money};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// === Cart ===

/// A row of `cart_items`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CartItemRecord {
    pub id: CartItemId,
    pub user_id: UserId,
    pub product_id: ProductId,
    pub quantity: i64,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Product columns embedded in a cart item.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CartProduct {
    pub id: ProductId,
    pub name: String,
    #[serde(with = "money::decimal")]
    pub price: Money,
    #[serde(default)]
    pub images_url: Option<Vec<String>>,
    pub stock_quantity: i64,
}

/// A cart item with its product embedded.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CartItemWithProduct {
    pub id: CartItemId,
    pub user_id: UserId,
    pub product_id: ProductId,
    pub quantity: i64,
    #[serde(rename = "products", default)]
    pub product: Option<CartProduct>,
}

impl CartItemWithProduct {
    /// The cart line for this item, if its product still exists.
    pub fn to_cart_line(&self) -> Option<CartLine> {
        self.product.as_ref().map(|p| CartLine {
            product_id: p.id.clone(),
            product_name: p.name.clone(),
            unit_price: p.price,
            stock: p.stock_quantity,
            quantity: self.quantity,
            image: p.images_url.as_ref().and_then(|urls| urls.first().cloned()),
        })
    }
}

/// Upsert payload for `cart_items`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewCartItem {
    pub user_id: UserId,
    pub product_id: ProductId,
    pub quantity: i64,
}

// === Customers and profiles ===

/// A row of `customers`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CustomerRecord {
    pub id: CustomerId,
    pub user_id: UserId,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub shipping_address: Option<ShippingAddress>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Customer details entered at checkout.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CustomerForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shipping_address: Option<ShippingAddress>,
}

/// A row of `profiles`, one per auth user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Profile {
    pub id: UserId,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub is_admin: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

// === Blog ===

/// A row of `blog_posts`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BlogPost {
    pub id: PostId,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub author_id: Option<UserId>,
    #[serde(default)]
    pub publication_date: Option<DateTime<Utc>>,
    pub slug: String,
    #[serde(default)]
    pub excerpt: Option<String>,
    #[serde(default)]
    pub featured_image_url: Option<String>,
    #[serde(default)]
    pub is_published: bool,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insert payload for `blog_posts`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewBlogPost {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub featured_image_url: Option<String>,
    #[serde(default)]
    pub is_published: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_id: Option<UserId>,
}

impl NewBlogPost {
    pub fn into_post(self, id: PostId, now: DateTime<Utc>) -> BlogPost {
        BlogPost {
            id,
            title: self.title,
            content: self.content,
            author_id: self.author_id,
            publication_date: Some(now),
            slug: self.slug,
            excerpt: self.excerpt,
            featured_image_url: self.featured_image_url,
            is_published: self.is_published,
            tags: Some(self.tags),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Partial update for `blog_posts`; unset fields are left alone.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct BlogPostUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub featured_image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_published: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

impl BlogPostUpdate {
    pub fn apply(&self, post: &mut BlogPost, now: DateTime<Utc>) {
        if let Some(title) = &self.title {
            post.title = title.clone();
        }
        if let Some(content) = &self.content {
            post.content = content.clone();
        }
        if let Some(slug) = &self.slug {
            post.slug = slug.clone();
        }
        if let Some(excerpt) = &self.excerpt {
            post.excerpt = Some(excerpt.clone());
        }
        if let Some(url) = &self.featured_image_url {
            post.featured_image_url = Some(url.clone());
        }
        if let Some(published) = self.is_published {
            post.is_published = published;
        }
        if let Some(tags) = &self.tags {
            post.tags = Some(tags.clone());
        }
        post.updated_at = now;
    }
}

// === Wishlist and reviews ===

/// A row of `wishlist_items`, with the product embedded when selected.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WishlistItem {
    pub id: WishlistItemId,
    pub user_id: UserId,
    pub product_id: ProductId,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(rename = "products", default, skip_serializing_if = "Option::is_none")]
    pub product: Option<Product>,
}

/// A row of `product_reviews`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProductReview {
    pub id: ReviewId,
    pub product_id: ProductId,
    #[serde(default)]
    pub user_id: Option<UserId>,
    pub rating: i64,
    #[serde(default)]
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Insert payload for `product_reviews`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewReview {
    pub product_id: ProductId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<UserId>,
    pub rating: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

// === Newsletter and contact ===

/// A row of `newsletter_subscriptions`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewsletterSubscription {
    #[serde(default)]
    pub id: Option<String>,
    pub email: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Insert payload for `contact_messages`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ContactMessage {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub message: String,
}

// === Dashboard ===

/// Headline numbers of the admin dashboard.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct DashboardStats {
    pub total_products: u64,
    pub total_orders: u64,
    pub total_users: u64,
    /// Sum over delivered orders.
    pub total_revenue: Money,
}

/// A best-selling product.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TopProduct {
    pub product_id: ProductId,
    pub name: String,
    /// Units sold.
    pub total_sales: i64,
    pub total_revenue: Money,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cart_item_with_product_to_line() {
        let item: CartItemWithProduct = serde_json::from_value(serde_json::json!({
            "id": "ci-1",
            "user_id": "u-1",
            "product_id": "p-1",
            "quantity": 3,
            "products": {
                "id": "p-1",
                "name": "Vaso Geométrico",
                "price": 39.9,
                "images_url": null,
                "stock_quantity": 6
            }
        }))
        .unwrap();
        let line = item.to_cart_line().unwrap();
        assert_eq!(line.unit_price, Money::brl(3990));
        assert_eq!(line.quantity, 3);
        assert_eq!(line.stock, 6);
        assert!(line.image.is_none());

        let orphan = CartItemWithProduct {
            product: None,
            ..item
        };
        assert!(orphan.to_cart_line().is_none());
    }

    #[test]
    fn test_blog_update_applies_only_set_fields() {
        let now = Utc::now();
        let mut post = NewBlogPost {
            title: "Primeiro post".to_string(),
            content: "Olá".to_string(),
            slug: "primeiro-post".to_string(),
            ..NewBlogPost::default()
        }
        .into_post(PostId::new("b-1"), now);
        BlogPostUpdate {
            is_published: Some(true),
            ..BlogPostUpdate::default()
        }
        .apply(&mut post, now);
        assert!(post.is_published);
        assert_eq!(post.slug, "primeiro-post");
    }
}
