//! Data access, one trait per entity.
//!
//! [`RemoteGateway`] forwards every call to the provider's REST tables;
//! [`MemoryGateway`] keeps the same tables in process for tests and offline
//! use. Neither caches nor retries. Provider errors come back verbatim as
//! [`GatewayError::Provider`], and a single-row lookup that matches nothing is
//! `Ok(None)`.

mod memory;
mod records;
mod remote;

pub use memory::MemoryGateway;
pub use records::*;
pub use remote::RemoteGateway;

use crate::catalog::{NewProduct, Product, ProductUpdate};
use crate::checkout::{NewOrder, OrderRecord, OrderStatus};
use crate::error::CommerceError;
use crate::ids::{CartItemId, CustomerId, PostId, ProductId, UserId};
use crate::search::{FilterCriteria, PageRequest};
use crate::validation::{Validate, ValidationErrors};
use async_trait::async_trait;
use pixel_data::FetchError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Gateway failures.
#[derive(Error, Debug)]
pub enum GatewayError {
    /// Error from the provider or the transport, unchanged.
    #[error(transparent)]
    Provider(#[from] FetchError),

    /// A row could not be encoded or decoded.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// The payload broke a validation rule and was not sent.
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    /// Domain arithmetic failed while aggregating rows.
    #[error(transparent)]
    Commerce(#[from] CommerceError),

    /// A write targeted a row that does not exist.
    #[error("{table} row not found: {id}")]
    NotFound { table: &'static str, id: String },

    /// In-process storage is unusable after a panic.
    #[error("Storage lock poisoned")]
    Poisoned,
}

impl GatewayError {
    pub fn not_found(table: &'static str, id: impl ToString) -> Self {
        GatewayError::NotFound {
            table,
            id: id.to_string(),
        }
    }

    /// Whether the target row is missing, as reported by either gateway.
    pub fn is_not_found(&self) -> bool {
        match self {
            GatewayError::NotFound { .. } => true,
            GatewayError::Provider(e) => e.is_not_found(),
            _ => false,
        }
    }
}

impl From<serde_json::Error> for GatewayError {
    fn from(e: serde_json::Error) -> Self {
        GatewayError::Serialization(e.to_string())
    }
}

pub type GatewayResult<T> = Result<T, GatewayError>;

/// Reject a payload before it leaves the process.
pub(crate) fn checked<T: Validate>(payload: &T) -> GatewayResult<()> {
    payload.validate().map_err(GatewayError::Validation)
}

/// Storefront listing request: criteria plus optional paging.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductQuery {
    #[serde(flatten)]
    pub criteria: FilterCriteria,
    #[serde(default)]
    pub limit: Option<u64>,
    #[serde(default)]
    pub offset: Option<u64>,
}

impl ProductQuery {
    pub fn new(criteria: FilterCriteria) -> Self {
        Self {
            criteria,
            limit: None,
            offset: None,
        }
    }

    pub fn page(mut self, page: PageRequest) -> Self {
        let (from, to) = page.normalized().range();
        self.offset = Some(from);
        self.limit = Some(to - from + 1);
        self
    }
}

#[async_trait]
pub trait ProductGateway: Send + Sync {
    /// Active products matching the query, newest first.
    async fn list_products(&self, query: &ProductQuery) -> GatewayResult<Vec<Product>>;

    /// An active product by id.
    async fn get_product(&self, id: &ProductId) -> GatewayResult<Option<Product>>;

    /// Every product, active or not (admin).
    async fn list_all_products(&self) -> GatewayResult<Vec<Product>>;

    async fn create_product(&self, product: NewProduct) -> GatewayResult<Product>;

    async fn update_product(&self, id: &ProductId, update: ProductUpdate) -> GatewayResult<Product>;

    async fn delete_product(&self, id: &ProductId) -> GatewayResult<()>;
}

#[async_trait]
pub trait CartGateway: Send + Sync {
    /// The user's cart items with their products embedded.
    async fn cart_items(&self, user: &UserId) -> GatewayResult<Vec<CartItemWithProduct>>;

    /// Insert, or overwrite the quantity of, the user's line for `product`.
    async fn add_to_cart(
        &self,
        user: &UserId,
        product: &ProductId,
        quantity: i64,
    ) -> GatewayResult<CartItemRecord>;

    async fn update_cart_item(&self, item: &CartItemId, quantity: i64) -> GatewayResult<CartItemRecord>;

    async fn remove_from_cart(&self, item: &CartItemId) -> GatewayResult<()>;

    async fn clear_cart(&self, user: &UserId) -> GatewayResult<()>;
}

#[async_trait]
pub trait OrderGateway: Send + Sync {
    /// Insert the order, then its lines.
    async fn create_order(&self, order: NewOrder) -> GatewayResult<OrderRecord>;

    /// A customer's orders with items, newest first.
    async fn user_orders(&self, customer: &CustomerId) -> GatewayResult<Vec<OrderRecord>>;

    /// Every order with items, newest first (admin).
    async fn all_orders(&self) -> GatewayResult<Vec<OrderRecord>>;

    async fn get_order(&self, id: &crate::ids::OrderId) -> GatewayResult<Option<OrderRecord>>;

    async fn update_order_status(
        &self,
        id: &crate::ids::OrderId,
        status: OrderStatus,
    ) -> GatewayResult<OrderRecord>;

    /// The latest `limit` orders.
    async fn recent_orders(&self, limit: usize) -> GatewayResult<Vec<OrderRecord>>;
}

#[async_trait]
pub trait WishlistGateway: Send + Sync {
    async fn wishlist(&self, user: &UserId) -> GatewayResult<Vec<WishlistItem>>;

    async fn add_to_wishlist(&self, user: &UserId, product: &ProductId) -> GatewayResult<WishlistItem>;

    async fn remove_from_wishlist(&self, user: &UserId, product: &ProductId) -> GatewayResult<()>;
}

#[async_trait]
pub trait BlogGateway: Send + Sync {
    /// Published posts, newest first.
    async fn published_posts(&self, limit: Option<usize>) -> GatewayResult<Vec<BlogPost>>;

    /// A published post by slug.
    async fn post_by_slug(&self, slug: &str) -> GatewayResult<Option<BlogPost>>;

    /// Every post, drafts included (admin).
    async fn all_posts(&self) -> GatewayResult<Vec<BlogPost>>;

    async fn create_post(&self, post: NewBlogPost) -> GatewayResult<BlogPost>;

    async fn update_post(&self, id: &PostId, update: BlogPostUpdate) -> GatewayResult<BlogPost>;

    async fn delete_post(&self, id: &PostId) -> GatewayResult<()>;
}

#[async_trait]
pub trait ReviewGateway: Send + Sync {
    /// Reviews of a product, newest first.
    async fn product_reviews(&self, product: &ProductId) -> GatewayResult<Vec<ProductReview>>;

    async fn add_review(&self, review: NewReview) -> GatewayResult<ProductReview>;
}

#[async_trait]
pub trait ProfileGateway: Send + Sync {
    async fn all_profiles(&self) -> GatewayResult<Vec<Profile>>;

    async fn get_profile(&self, id: &UserId) -> GatewayResult<Option<Profile>>;

    async fn set_admin(&self, id: &UserId, is_admin: bool) -> GatewayResult<Profile>;
}

#[async_trait]
pub trait NewsletterGateway: Send + Sync {
    async fn subscribe(&self, email: &str) -> GatewayResult<NewsletterSubscription>;
}

#[async_trait]
pub trait ContactGateway: Send + Sync {
    async fn send_message(&self, message: ContactMessage) -> GatewayResult<()>;
}

#[async_trait]
pub trait DashboardGateway: Send + Sync {
    /// Product, order and user counts plus delivered revenue.
    async fn dashboard_stats(&self) -> GatewayResult<DashboardStats>;

    /// Best sellers by revenue.
    async fn top_products(&self, limit: usize) -> GatewayResult<Vec<TopProduct>>;
}

/// Every entity gateway at once.
pub trait StoreGateway:
    ProductGateway
    + CartGateway
    + OrderGateway
    + WishlistGateway
    + BlogGateway
    + ReviewGateway
    + ProfileGateway
    + NewsletterGateway
    + ContactGateway
    + DashboardGateway
{
}

impl<T> StoreGateway for T where
    T: ProductGateway
        + CartGateway
        + OrderGateway
        + WishlistGateway
        + BlogGateway
        + ReviewGateway
        + ProfileGateway
        + NewsletterGateway
        + ContactGateway
        + DashboardGateway
{
}
