//! In-process gateway.
//!
//! Holds every table behind one lock and answers with the same semantics as
//! the remote gateway. Used by the offline CLI and in tests.

use super::{
    checked, BlogGateway, BlogPost, BlogPostUpdate, CartGateway, CartItemRecord, CartItemWithProduct,
    CartProduct, ContactGateway, ContactMessage, DashboardGateway, DashboardStats, GatewayError,
    GatewayResult, NewBlogPost, NewReview, NewsletterGateway, NewsletterSubscription, OrderGateway,
    ProductGateway, ProductQuery, ProductReview, Profile, ProfileGateway, ReviewGateway, TopProduct,
    WishlistGateway, WishlistItem,
};
use crate::catalog::{fixtures, NewProduct, Product, ProductUpdate};
use crate::checkout::{EmbeddedProduct, NewOrder, OrderItemRecord, OrderRecord, OrderStatus};
use crate::dashboard::{rank_top_products, revenue_from};
use crate::ids::{
    CartItemId, CustomerId, OrderId, PostId, ProductId, ReviewId, UserId, WishlistItemId,
};
use crate::money::STORE_CURRENCY;
use crate::search::{evaluate, SortMode};
use crate::validation::{CartItemForm, NewsletterForm, ValidationErrors};
use async_trait::async_trait;
use chrono::Utc;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::debug;

const FALLBACK_PAGE: usize = 10;

#[derive(Debug, Default)]
struct Tables {
    products: Vec<Product>,
    cart_items: Vec<CartItemRecord>,
    orders: Vec<OrderRecord>,
    wishlist: Vec<WishlistItem>,
    posts: Vec<BlogPost>,
    reviews: Vec<ProductReview>,
    profiles: Vec<Profile>,
    subscriptions: Vec<NewsletterSubscription>,
    messages: Vec<ContactMessage>,
}

impl Tables {
    fn product(&self, id: &ProductId) -> Option<&Product> {
        self.products.iter().find(|p| &p.id == id)
    }

    fn with_product(&self, item: &CartItemRecord) -> CartItemWithProduct {
        CartItemWithProduct {
            id: item.id.clone(),
            user_id: item.user_id.clone(),
            product_id: item.product_id.clone(),
            quantity: item.quantity,
            product: self.product(&item.product_id).map(|p| CartProduct {
                id: p.id.clone(),
                name: p.name.clone(),
                price: p.price,
                images_url: Some(p.images_url.clone()),
                stock_quantity: p.stock_quantity,
            }),
        }
    }

    fn embed(&self, item: &mut OrderItemRecord) {
        item.product = self.product(&item.product_id).map(|p| EmbeddedProduct {
            name: p.name.clone(),
            images_url: Some(p.images_url.clone()),
        });
    }
}

/// Newest first by creation time.
fn newest_orders(mut orders: Vec<OrderRecord>) -> Vec<OrderRecord> {
    orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    orders
}

/// Gateway over in-process tables.
#[derive(Debug, Default)]
pub struct MemoryGateway {
    tables: RwLock<Tables>,
}

impl MemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeded with the six demo products.
    pub fn with_demo_catalog() -> Self {
        Self::with_products(fixtures::demo_products())
    }

    pub fn with_products(products: Vec<Product>) -> Self {
        Self {
            tables: RwLock::new(Tables {
                products,
                ..Tables::default()
            }),
        }
    }

    /// Add profiles (accounts are created by the auth provider, not here).
    pub fn with_profiles(self, profiles: Vec<Profile>) -> Self {
        if let Ok(mut tables) = self.tables.write() {
            tables.profiles.extend(profiles);
        }
        self
    }

    fn read(&self) -> GatewayResult<RwLockReadGuard<'_, Tables>> {
        self.tables.read().map_err(|_| GatewayError::Poisoned)
    }

    fn write(&self) -> GatewayResult<RwLockWriteGuard<'_, Tables>> {
        self.tables.write().map_err(|_| GatewayError::Poisoned)
    }
}

#[async_trait]
impl ProductGateway for MemoryGateway {
    async fn list_products(&self, query: &ProductQuery) -> GatewayResult<Vec<Product>> {
        checked(&query.criteria)?;
        let tables = self.read()?;
        let active: Vec<Product> = tables.products.iter().filter(|p| p.is_active).cloned().collect();
        let matched = evaluate(&active, &query.criteria, SortMode::Newest);

        let (skip, take) = match (query.limit, query.offset.filter(|&o| o > 0)) {
            (limit, Some(offset)) => (
                offset as usize,
                limit.map(|l| l as usize).unwrap_or(FALLBACK_PAGE).max(1),
            ),
            (Some(limit), None) => (0, limit as usize),
            (None, None) => (0, usize::MAX),
        };
        Ok(matched.into_iter().skip(skip).take(take).cloned().collect())
    }

    async fn get_product(&self, id: &ProductId) -> GatewayResult<Option<Product>> {
        let tables = self.read()?;
        Ok(tables.product(id).filter(|p| p.is_active).cloned())
    }

    async fn list_all_products(&self) -> GatewayResult<Vec<Product>> {
        let mut products = self.read()?.products.clone();
        products.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(products)
    }

    async fn create_product(&self, product: NewProduct) -> GatewayResult<Product> {
        checked(&product)?;
        let created = product.into_product(ProductId::generate(), Utc::now());
        self.write()?.products.push(created.clone());
        debug!(product_id = %created.id, "product created");
        Ok(created)
    }

    async fn update_product(&self, id: &ProductId, update: ProductUpdate) -> GatewayResult<Product> {
        checked(&update)?;
        let mut tables = self.write()?;
        let product = tables
            .products
            .iter_mut()
            .find(|p| &p.id == id)
            .ok_or_else(|| GatewayError::not_found("products", id))?;
        update.apply(product, Utc::now());
        Ok(product.clone())
    }

    async fn delete_product(&self, id: &ProductId) -> GatewayResult<()> {
        self.write()?.products.retain(|p| &p.id != id);
        Ok(())
    }
}

#[async_trait]
impl CartGateway for MemoryGateway {
    async fn cart_items(&self, user: &UserId) -> GatewayResult<Vec<CartItemWithProduct>> {
        let tables = self.read()?;
        Ok(tables
            .cart_items
            .iter()
            .filter(|i| &i.user_id == user)
            .map(|i| tables.with_product(i))
            .collect())
    }

    async fn add_to_cart(
        &self,
        user: &UserId,
        product: &ProductId,
        quantity: i64,
    ) -> GatewayResult<CartItemRecord> {
        checked(&CartItemForm {
            product_id: product.clone(),
            quantity,
        })?;
        let now = Utc::now();
        let mut tables = self.write()?;
        let existing = tables
            .cart_items
            .iter_mut()
            .find(|i| &i.user_id == user && &i.product_id == product);
        if let Some(item) = existing {
            item.quantity = quantity;
            item.updated_at = Some(now);
            return Ok(item.clone());
        }
        let item = CartItemRecord {
            id: CartItemId::generate(),
            user_id: user.clone(),
            product_id: product.clone(),
            quantity,
            created_at: Some(now),
            updated_at: Some(now),
        };
        tables.cart_items.push(item.clone());
        Ok(item)
    }

    async fn update_cart_item(&self, item: &CartItemId, quantity: i64) -> GatewayResult<CartItemRecord> {
        if quantity < 1 {
            return Err(ValidationErrors::single("quantity", "Quantidade deve ser pelo menos 1").into());
        }
        let mut tables = self.write()?;
        let row = tables
            .cart_items
            .iter_mut()
            .find(|i| &i.id == item)
            .ok_or_else(|| GatewayError::not_found("cart_items", item))?;
        row.quantity = quantity;
        row.updated_at = Some(Utc::now());
        Ok(row.clone())
    }

    async fn remove_from_cart(&self, item: &CartItemId) -> GatewayResult<()> {
        self.write()?.cart_items.retain(|i| &i.id != item);
        Ok(())
    }

    async fn clear_cart(&self, user: &UserId) -> GatewayResult<()> {
        self.write()?.cart_items.retain(|i| &i.user_id != user);
        Ok(())
    }
}

#[async_trait]
impl OrderGateway for MemoryGateway {
    async fn create_order(&self, order: NewOrder) -> GatewayResult<OrderRecord> {
        checked(&order)?;
        let mut record = order.into_record(OrderId::generate(), Utc::now());
        let mut tables = self.write()?;
        for item in record.order_items.iter_mut() {
            tables.embed(item);
        }
        tables.orders.push(record.clone());
        debug!(order_id = %record.id, lines = record.order_items.len(), "order stored");
        Ok(record)
    }

    async fn user_orders(&self, customer: &CustomerId) -> GatewayResult<Vec<OrderRecord>> {
        let tables = self.read()?;
        Ok(newest_orders(
            tables
                .orders
                .iter()
                .filter(|o| &o.customer_id == customer)
                .cloned()
                .collect(),
        ))
    }

    async fn all_orders(&self) -> GatewayResult<Vec<OrderRecord>> {
        Ok(newest_orders(self.read()?.orders.clone()))
    }

    async fn get_order(&self, id: &OrderId) -> GatewayResult<Option<OrderRecord>> {
        Ok(self.read()?.orders.iter().find(|o| &o.id == id).cloned())
    }

    async fn update_order_status(&self, id: &OrderId, status: OrderStatus) -> GatewayResult<OrderRecord> {
        let mut tables = self.write()?;
        let order = tables
            .orders
            .iter_mut()
            .find(|o| &o.id == id)
            .ok_or_else(|| GatewayError::not_found("orders", id))?;
        order.status = status;
        order.updated_at = Utc::now();
        Ok(order.clone())
    }

    async fn recent_orders(&self, limit: usize) -> GatewayResult<Vec<OrderRecord>> {
        let mut orders = newest_orders(self.read()?.orders.clone());
        orders.truncate(limit);
        Ok(orders)
    }
}

#[async_trait]
impl WishlistGateway for MemoryGateway {
    async fn wishlist(&self, user: &UserId) -> GatewayResult<Vec<WishlistItem>> {
        let tables = self.read()?;
        Ok(tables
            .wishlist
            .iter()
            .filter(|w| &w.user_id == user)
            .map(|w| WishlistItem {
                product: tables.product(&w.product_id).cloned(),
                ..w.clone()
            })
            .collect())
    }

    /// Adding a product twice returns the existing entry.
    async fn add_to_wishlist(&self, user: &UserId, product: &ProductId) -> GatewayResult<WishlistItem> {
        let mut tables = self.write()?;
        if let Some(existing) = tables
            .wishlist
            .iter()
            .find(|w| &w.user_id == user && &w.product_id == product)
        {
            return Ok(existing.clone());
        }
        let item = WishlistItem {
            id: WishlistItemId::generate(),
            user_id: user.clone(),
            product_id: product.clone(),
            created_at: Some(Utc::now()),
            product: None,
        };
        tables.wishlist.push(item.clone());
        Ok(item)
    }

    async fn remove_from_wishlist(&self, user: &UserId, product: &ProductId) -> GatewayResult<()> {
        self.write()?
            .wishlist
            .retain(|w| !(&w.user_id == user && &w.product_id == product));
        Ok(())
    }
}

#[async_trait]
impl BlogGateway for MemoryGateway {
    async fn published_posts(&self, limit: Option<usize>) -> GatewayResult<Vec<BlogPost>> {
        let tables = self.read()?;
        let mut posts: Vec<BlogPost> = tables.posts.iter().filter(|p| p.is_published).cloned().collect();
        posts.sort_by(|a, b| b.publication_date.cmp(&a.publication_date));
        if let Some(limit) = limit {
            posts.truncate(limit);
        }
        Ok(posts)
    }

    async fn post_by_slug(&self, slug: &str) -> GatewayResult<Option<BlogPost>> {
        Ok(self
            .read()?
            .posts
            .iter()
            .find(|p| p.is_published && p.slug == slug)
            .cloned())
    }

    async fn all_posts(&self) -> GatewayResult<Vec<BlogPost>> {
        let mut posts = self.read()?.posts.clone();
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(posts)
    }

    async fn create_post(&self, post: NewBlogPost) -> GatewayResult<BlogPost> {
        checked(&post)?;
        let created = post.into_post(PostId::generate(), Utc::now());
        self.write()?.posts.push(created.clone());
        Ok(created)
    }

    async fn update_post(&self, id: &PostId, update: BlogPostUpdate) -> GatewayResult<BlogPost> {
        checked(&update)?;
        let mut tables = self.write()?;
        let post = tables
            .posts
            .iter_mut()
            .find(|p| &p.id == id)
            .ok_or_else(|| GatewayError::not_found("blog_posts", id))?;
        update.apply(post, Utc::now());
        Ok(post.clone())
    }

    async fn delete_post(&self, id: &PostId) -> GatewayResult<()> {
        self.write()?.posts.retain(|p| &p.id != id);
        Ok(())
    }
}

#[async_trait]
impl ReviewGateway for MemoryGateway {
    async fn product_reviews(&self, product: &ProductId) -> GatewayResult<Vec<ProductReview>> {
        let mut reviews: Vec<ProductReview> = self
            .read()?
            .reviews
            .iter()
            .filter(|r| &r.product_id == product)
            .cloned()
            .collect();
        reviews.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(reviews)
    }

    async fn add_review(&self, review: NewReview) -> GatewayResult<ProductReview> {
        checked(&review)?;
        let stored = ProductReview {
            id: ReviewId::generate(),
            product_id: review.product_id,
            user_id: review.user_id,
            rating: review.rating,
            comment: review.comment,
            created_at: Utc::now(),
        };
        self.write()?.reviews.push(stored.clone());
        Ok(stored)
    }
}

#[async_trait]
impl ProfileGateway for MemoryGateway {
    async fn all_profiles(&self) -> GatewayResult<Vec<Profile>> {
        Ok(self.read()?.profiles.clone())
    }

    async fn get_profile(&self, id: &UserId) -> GatewayResult<Option<Profile>> {
        Ok(self.read()?.profiles.iter().find(|p| &p.id == id).cloned())
    }

    async fn set_admin(&self, id: &UserId, is_admin: bool) -> GatewayResult<Profile> {
        let mut tables = self.write()?;
        let profile = tables
            .profiles
            .iter_mut()
            .find(|p| &p.id == id)
            .ok_or_else(|| GatewayError::not_found("profiles", id))?;
        profile.is_admin = is_admin;
        Ok(profile.clone())
    }
}

#[async_trait]
impl NewsletterGateway for MemoryGateway {
    /// Subscribing an address twice returns the first subscription.
    async fn subscribe(&self, email: &str) -> GatewayResult<NewsletterSubscription> {
        let email = email.trim().to_string();
        checked(&NewsletterForm {
            email: email.clone(),
        })?;
        let mut tables = self.write()?;
        if let Some(existing) = tables.subscriptions.iter().find(|s| s.email.eq_ignore_ascii_case(&email)) {
            return Ok(existing.clone());
        }
        let subscription = NewsletterSubscription {
            id: Some(uuid::Uuid::new_v4().to_string()),
            email,
            created_at: Some(Utc::now()),
        };
        tables.subscriptions.push(subscription.clone());
        Ok(subscription)
    }
}

#[async_trait]
impl ContactGateway for MemoryGateway {
    async fn send_message(&self, message: ContactMessage) -> GatewayResult<()> {
        checked(&message)?;
        self.write()?.messages.push(message);
        Ok(())
    }
}

#[async_trait]
impl DashboardGateway for MemoryGateway {
    async fn dashboard_stats(&self) -> GatewayResult<DashboardStats> {
        let tables = self.read()?;
        Ok(DashboardStats {
            total_products: tables.products.len() as u64,
            total_orders: tables.orders.len() as u64,
            total_users: tables.profiles.len() as u64,
            total_revenue: revenue_from(&tables.orders, STORE_CURRENCY)?,
        })
    }

    async fn top_products(&self, limit: usize) -> GatewayResult<Vec<TopProduct>> {
        let tables = self.read()?;
        let items: Vec<OrderItemRecord> = tables
            .orders
            .iter()
            .flat_map(|o| o.order_items.iter().cloned())
            .collect();
        Ok(rank_top_products(&items, limit, STORE_CURRENCY)?)
    }
}
