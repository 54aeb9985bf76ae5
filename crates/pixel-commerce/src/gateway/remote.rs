//! Gateway backed by the provider's REST tables.

use super::{
    checked, BlogGateway, BlogPost, BlogPostUpdate, CartGateway, CartItemRecord,
    CartItemWithProduct, ContactGateway, ContactMessage, DashboardGateway, DashboardStats,
    GatewayError, GatewayResult, NewBlogPost, NewCartItem, NewReview, NewsletterGateway,
    NewsletterSubscription, OrderGateway, ProductGateway, ProductQuery, ProductReview, Profile,
    ProfileGateway, ReviewGateway, TopProduct, WishlistGateway, WishlistItem,
};
use crate::catalog::{NewProduct, Product, ProductUpdate};
use crate::checkout::{NewOrder, NewOrderItem, OrderItemRecord, OrderRecord, OrderStatus};
use crate::dashboard::rank_top_products;
use crate::ids::{CartItemId, CustomerId, OrderId, PostId, ProductId, UserId};
use crate::money::{self, Money, STORE_CURRENCY};
use crate::validation::{CartItemForm, NewsletterForm, ValidationErrors};
use async_trait::async_trait;
use chrono::Utc;
use pixel_data::{contains_pattern, or_value, RestClient, TableQuery};
use pixel_observability::OperationTimer;
use serde::Deserialize;
use serde_json::json;
use std::future::Future;
use tracing::debug;

const PRODUCTS: &str = "products";
const CART_ITEMS: &str = "cart_items";
const ORDERS: &str = "orders";
const ORDER_ITEMS: &str = "order_items";
const WISHLIST_ITEMS: &str = "wishlist_items";
const BLOG_POSTS: &str = "blog_posts";
const PRODUCT_REVIEWS: &str = "product_reviews";
const PROFILES: &str = "profiles";
const NEWSLETTER: &str = "newsletter_subscriptions";
const CONTACT_MESSAGES: &str = "contact_messages";

const CART_SELECT: &str = "*,products(id,name,price,images_url,stock_quantity)";
const ORDER_SELECT: &str = "*,order_items(*,products(name,images_url))";
const TOP_PRODUCTS_SELECT: &str = "id,order_id,product_id,quantity,price_at_purchase,products(name)";

/// Rows per page when an offset arrives without a limit.
const FALLBACK_PAGE: u64 = 10;

/// Delivered-order row, only what revenue needs.
#[derive(Debug, Deserialize)]
struct RevenueRow {
    #[serde(with = "money::decimal")]
    total_price: Money,
}

async fn timed<T, F>(operation: &'static str, call: F) -> GatewayResult<T>
where
    F: Future<Output = GatewayResult<T>>,
{
    let timer = OperationTimer::start(operation);
    timer.finish(call.await)
}

/// Remote gateway over a [`RestClient`].
#[derive(Debug, Clone)]
pub struct RemoteGateway {
    client: RestClient,
}

impl RemoteGateway {
    pub fn new(client: RestClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &RestClient {
        &self.client
    }

    /// Public listing: active products only, newest first.
    fn listing(&self, query: &ProductQuery) -> TableQuery<'_> {
        let criteria = &query.criteria;
        let mut q = self.client.from(PRODUCTS).select("*").eq("is_active", true);

        if let Some(category) = &criteria.category {
            q = q.eq("category", category.as_str());
        }
        if let Some(material) = &criteria.material {
            q = q.eq("material", material.as_str());
        }
        if let Some(min) = &criteria.min_price {
            q = q.gte("price", min.display_amount());
        }
        if let Some(max) = &criteria.max_price {
            q = q.lte("price", max.display_amount());
        }
        if let Some(term) = criteria.search_term() {
            let pattern = or_value(&contains_pattern(term));
            q = q.or([
                format!("name.ilike.{}", pattern),
                format!("description.ilike.{}", pattern),
            ]);
        }
        if criteria.featured_only {
            q = q.eq("is_featured", true);
        }

        q = q.order("created_at", false);
        match (query.limit, query.offset.filter(|&o| o > 0)) {
            (limit, Some(offset)) => {
                let rows = limit.unwrap_or(FALLBACK_PAGE).max(1);
                q.range(offset, offset + rows - 1)
            }
            (Some(limit), None) => q.limit(limit),
            (None, None) => q,
        }
    }
}

#[async_trait]
impl ProductGateway for RemoteGateway {
    async fn list_products(&self, query: &ProductQuery) -> GatewayResult<Vec<Product>> {
        checked(&query.criteria)?;
        if query.criteria.has_inverted_price_range() {
            debug!("inverted price range, skipping provider call");
            return Ok(Vec::new());
        }
        timed("products.list", async {
            Ok(self.listing(query).fetch().await?)
        })
        .await
    }

    async fn get_product(&self, id: &ProductId) -> GatewayResult<Option<Product>> {
        timed("products.get", async {
            Ok(self
                .client
                .from(PRODUCTS)
                .select("*")
                .eq("id", id)
                .eq("is_active", true)
                .maybe_single()
                .await?)
        })
        .await
    }

    async fn list_all_products(&self) -> GatewayResult<Vec<Product>> {
        timed("products.list_all", async {
            Ok(self
                .client
                .from(PRODUCTS)
                .select("*")
                .order("created_at", false)
                .fetch()
                .await?)
        })
        .await
    }

    async fn create_product(&self, product: NewProduct) -> GatewayResult<Product> {
        checked(&product)?;
        timed("products.create", async {
            Ok(self.client.from(PRODUCTS).insert(&product).await?)
        })
        .await
    }

    async fn update_product(&self, id: &ProductId, update: ProductUpdate) -> GatewayResult<Product> {
        checked(&update)?;
        let mut patch = serde_json::to_value(&update)?;
        if let Some(fields) = patch.as_object_mut() {
            fields.insert("updated_at".to_string(), json!(Utc::now()));
        }
        timed("products.update", async {
            Ok(self.client.from(PRODUCTS).eq("id", id).update(&patch).await?)
        })
        .await
    }

    async fn delete_product(&self, id: &ProductId) -> GatewayResult<()> {
        timed("products.delete", async {
            Ok(self.client.from(PRODUCTS).eq("id", id).delete().await?)
        })
        .await
    }
}

#[async_trait]
impl CartGateway for RemoteGateway {
    async fn cart_items(&self, user: &UserId) -> GatewayResult<Vec<CartItemWithProduct>> {
        timed("cart.items", async {
            Ok(self
                .client
                .from(CART_ITEMS)
                .select(CART_SELECT)
                .eq("user_id", user)
                .fetch()
                .await?)
        })
        .await
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
        let row = NewCartItem {
            user_id: user.clone(),
            product_id: product.clone(),
            quantity,
        };
        timed("cart.add", async {
            Ok(self
                .client
                .from(CART_ITEMS)
                .on_conflict("user_id,product_id")
                .upsert(&row)
                .await?)
        })
        .await
    }

    async fn update_cart_item(&self, item: &CartItemId, quantity: i64) -> GatewayResult<CartItemRecord> {
        if quantity < 1 {
            return Err(GatewayError::from(ValidationErrors::single(
                "quantity",
                "Quantidade deve ser pelo menos 1",
            )));
        }
        timed("cart.update", async {
            Ok(self
                .client
                .from(CART_ITEMS)
                .eq("id", item)
                .update(&json!({ "quantity": quantity, "updated_at": Utc::now() }))
                .await?)
        })
        .await
    }

    async fn remove_from_cart(&self, item: &CartItemId) -> GatewayResult<()> {
        timed("cart.remove", async {
            Ok(self.client.from(CART_ITEMS).eq("id", item).delete().await?)
        })
        .await
    }

    async fn clear_cart(&self, user: &UserId) -> GatewayResult<()> {
        timed("cart.clear", async {
            Ok(self.client.from(CART_ITEMS).eq("user_id", user).delete().await?)
        })
        .await
    }
}

#[async_trait]
impl OrderGateway for RemoteGateway {
    async fn create_order(&self, order: NewOrder) -> GatewayResult<OrderRecord> {
        checked(&order)?;
        timed("orders.create", async {
            let stored: OrderRecord = self.client.from(ORDERS).insert(&order).await?;
            let items: Vec<NewOrderItem> = order.lines.iter().map(|l| l.for_order(&stored.id)).collect();
            if !items.is_empty() {
                self.client.from(ORDER_ITEMS).insert_minimal(&items).await?;
            }
            debug!(order_id = %stored.id, lines = items.len(), "order stored");

            let reread = self
                .client
                .from(ORDERS)
                .select(ORDER_SELECT)
                .eq("id", &stored.id)
                .maybe_single()
                .await?;
            Ok(reread.unwrap_or(stored))
        })
        .await
    }

    async fn user_orders(&self, customer: &CustomerId) -> GatewayResult<Vec<OrderRecord>> {
        timed("orders.by_customer", async {
            Ok(self
                .client
                .from(ORDERS)
                .select(ORDER_SELECT)
                .eq("customer_id", customer)
                .order("created_at", false)
                .fetch()
                .await?)
        })
        .await
    }

    async fn all_orders(&self) -> GatewayResult<Vec<OrderRecord>> {
        timed("orders.all", async {
            Ok(self
                .client
                .from(ORDERS)
                .select(ORDER_SELECT)
                .order("created_at", false)
                .fetch()
                .await?)
        })
        .await
    }

    async fn get_order(&self, id: &OrderId) -> GatewayResult<Option<OrderRecord>> {
        timed("orders.get", async {
            Ok(self
                .client
                .from(ORDERS)
                .select(ORDER_SELECT)
                .eq("id", id)
                .maybe_single()
                .await?)
        })
        .await
    }

    async fn update_order_status(&self, id: &OrderId, status: OrderStatus) -> GatewayResult<OrderRecord> {
        timed("orders.update_status", async {
            Ok(self
                .client
                .from(ORDERS)
                .eq("id", id)
                .update(&json!({ "status": status, "updated_at": Utc::now() }))
                .await?)
        })
        .await
    }

    async fn recent_orders(&self, limit: usize) -> GatewayResult<Vec<OrderRecord>> {
        timed("orders.recent", async {
            Ok(self
                .client
                .from(ORDERS)
                .select(ORDER_SELECT)
                .order("created_at", false)
                .limit(limit as u64)
                .fetch()
                .await?)
        })
        .await
    }
}

#[async_trait]
impl WishlistGateway for RemoteGateway {
    async fn wishlist(&self, user: &UserId) -> GatewayResult<Vec<WishlistItem>> {
        timed("wishlist.list", async {
            Ok(self
                .client
                .from(WISHLIST_ITEMS)
                .select("*,products(*)")
                .eq("user_id", user)
                .fetch()
                .await?)
        })
        .await
    }

    async fn add_to_wishlist(&self, user: &UserId, product: &ProductId) -> GatewayResult<WishlistItem> {
        timed("wishlist.add", async {
            Ok(self
                .client
                .from(WISHLIST_ITEMS)
                .insert(&json!({ "user_id": user, "product_id": product }))
                .await?)
        })
        .await
    }

    async fn remove_from_wishlist(&self, user: &UserId, product: &ProductId) -> GatewayResult<()> {
        timed("wishlist.remove", async {
            Ok(self
                .client
                .from(WISHLIST_ITEMS)
                .eq("user_id", user)
                .eq("product_id", product)
                .delete()
                .await?)
        })
        .await
    }
}

#[async_trait]
impl BlogGateway for RemoteGateway {
    async fn published_posts(&self, limit: Option<usize>) -> GatewayResult<Vec<BlogPost>> {
        timed("blog.published", async {
            let mut q = self
                .client
                .from(BLOG_POSTS)
                .select("*")
                .eq("is_published", true)
                .order("publication_date", false);
            if let Some(limit) = limit {
                q = q.limit(limit as u64);
            }
            Ok(q.fetch().await?)
        })
        .await
    }

    async fn post_by_slug(&self, slug: &str) -> GatewayResult<Option<BlogPost>> {
        timed("blog.by_slug", async {
            Ok(self
                .client
                .from(BLOG_POSTS)
                .select("*")
                .eq("slug", slug)
                .eq("is_published", true)
                .maybe_single()
                .await?)
        })
        .await
    }

    async fn all_posts(&self) -> GatewayResult<Vec<BlogPost>> {
        timed("blog.all", async {
            Ok(self
                .client
                .from(BLOG_POSTS)
                .select("*")
                .order("created_at", false)
                .fetch()
                .await?)
        })
        .await
    }

    async fn create_post(&self, post: NewBlogPost) -> GatewayResult<BlogPost> {
        checked(&post)?;
        timed("blog.create", async {
            Ok(self.client.from(BLOG_POSTS).insert(&post).await?)
        })
        .await
    }

    async fn update_post(&self, id: &PostId, update: BlogPostUpdate) -> GatewayResult<BlogPost> {
        checked(&update)?;
        let mut patch = serde_json::to_value(&update)?;
        if let Some(fields) = patch.as_object_mut() {
            fields.insert("updated_at".to_string(), json!(Utc::now()));
        }
        timed("blog.update", async {
            Ok(self.client.from(BLOG_POSTS).eq("id", id).update(&patch).await?)
        })
        .await
    }

    async fn delete_post(&self, id: &PostId) -> GatewayResult<()> {
        timed("blog.delete", async {
            Ok(self.client.from(BLOG_POSTS).eq("id", id).delete().await?)
        })
        .await
    }
}

#[async_trait]
impl ReviewGateway for RemoteGateway {
    async fn product_reviews(&self, product: &ProductId) -> GatewayResult<Vec<ProductReview>> {
        timed("reviews.list", async {
            Ok(self
                .client
                .from(PRODUCT_REVIEWS)
                .select("*")
                .eq("product_id", product)
                .order("created_at", false)
                .fetch()
                .await?)
        })
        .await
    }

    async fn add_review(&self, review: NewReview) -> GatewayResult<ProductReview> {
        checked(&review)?;
        timed("reviews.add", async {
            Ok(self.client.from(PRODUCT_REVIEWS).insert(&review).await?)
        })
        .await
    }
}

#[async_trait]
impl ProfileGateway for RemoteGateway {
    async fn all_profiles(&self) -> GatewayResult<Vec<Profile>> {
        timed("profiles.all", async {
            Ok(self
                .client
                .from(PROFILES)
                .select("*")
                .order("created_at", false)
                .fetch()
                .await?)
        })
        .await
    }

    async fn get_profile(&self, id: &UserId) -> GatewayResult<Option<Profile>> {
        timed("profiles.get", async {
            Ok(self
                .client
                .from(PROFILES)
                .select("*")
                .eq("id", id)
                .maybe_single()
                .await?)
        })
        .await
    }

    async fn set_admin(&self, id: &UserId, is_admin: bool) -> GatewayResult<Profile> {
        timed("profiles.set_admin", async {
            Ok(self
                .client
                .from(PROFILES)
                .eq("id", id)
                .update(&json!({ "is_admin": is_admin }))
                .await?)
        })
        .await
    }
}

#[async_trait]
impl NewsletterGateway for RemoteGateway {
    async fn subscribe(&self, email: &str) -> GatewayResult<NewsletterSubscription> {
        let form = NewsletterForm {
            email: email.trim().to_string(),
        };
        checked(&form)?;
        timed("newsletter.subscribe", async {
            Ok(self.client.from(NEWSLETTER).insert(&form).await?)
        })
        .await
    }
}

#[async_trait]
impl ContactGateway for RemoteGateway {
    async fn send_message(&self, message: ContactMessage) -> GatewayResult<()> {
        checked(&message)?;
        timed("contact.send", async {
            Ok(self.client.from(CONTACT_MESSAGES).insert_minimal(&message).await?)
        })
        .await
    }
}

#[async_trait]
impl DashboardGateway for RemoteGateway {
    async fn dashboard_stats(&self) -> GatewayResult<DashboardStats> {
        timed("dashboard.stats", async {
            let (total_products, total_orders, total_users, delivered) = futures::try_join!(
                self.client.from(PRODUCTS).count(),
                self.client.from(ORDERS).count(),
                self.client.from(PROFILES).count(),
                self.client
                    .from(ORDERS)
                    .select("total_price")
                    .eq("status", OrderStatus::Delivered.as_str())
                    .fetch::<RevenueRow>(),
            )?;
            let total_revenue = Money::sum(delivered.iter().map(|r| &r.total_price), STORE_CURRENCY)?;
            Ok(DashboardStats {
                total_products,
                total_orders,
                total_users,
                total_revenue,
            })
        })
        .await
    }

    async fn top_products(&self, limit: usize) -> GatewayResult<Vec<TopProduct>> {
        timed("dashboard.top_products", async {
            let items: Vec<OrderItemRecord> = self
                .client
                .from(ORDER_ITEMS)
                .select(TOP_PRODUCTS_SELECT)
                .fetch()
                .await?;
            Ok(rank_top_products(&items, limit, STORE_CURRENCY)?)
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Category;
    use crate::checkout::{NewOrderLine, ShippingAddress};
    use crate::money::Money;
    use crate::search::FilterCriteria;
    use pixel_data::{FetchError, Method, MockTransport, Response};
    use reqwest::Url;
    use std::collections::HashMap;
    use std::sync::Arc;

    const PRODUCT_ID: &str = "00000000-0000-4000-8000-000000000001";
    const CUSTOMER_ID: &str = "00000000-0000-4000-8000-0000000000c1";

    fn gateway() -> (RemoteGateway, Arc<MockTransport>) {
        let transport = Arc::new(MockTransport::new());
        let client = RestClient::new("https://demo.provider.local", "anon-key")
            .with_transport(transport.clone());
        (RemoteGateway::new(client), transport)
    }

    fn params(url: &str) -> HashMap<String, String> {
        Url::parse(url)
            .unwrap()
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect()
    }

    fn product_row() -> serde_json::Value {
        json!({
            "id": PRODUCT_ID,
            "name": "Dragão Pixel Art",
            "description": "Dragão em estilo pixel art",
            "price": "45.90",
            "stock_quantity": 8,
            "images_url": ["/logo.png"],
            "category": "decorative",
            "material": "PLA",
            "is_featured": true,
            "is_active": true,
            "created_at": "2024-01-12T10:00:00Z",
            "updated_at": "2024-01-12T10:00:00Z"
        })
    }

    fn order_row() -> serde_json::Value {
        json!({
            "id": "o-1",
            "customer_id": "c-1",
            "status": "pending",
            "total_price": "35.80",
            "payment_status": "pending",
            "created_at": "2024-02-01T12:00:00Z",
            "updated_at": "2024-02-01T12:00:00Z"
        })
    }

    fn address() -> ShippingAddress {
        ShippingAddress {
            street: "Rua Augusta".to_string(),
            number: "1500".to_string(),
            complement: None,
            neighborhood: "Consolação".to_string(),
            city: "São Paulo".to_string(),
            state: "SP".to_string(),
            zip_code: "01304-001".to_string(),
            country: "BR".to_string(),
        }
    }

    // === Products ===

    #[tokio::test]
    async fn test_listing_translates_criteria() {
        let (gateway, transport) = gateway();
        transport.push_json(200, json!([product_row()]));

        let query = ProductQuery::new(
            FilterCriteria::new()
                .with_search("drag")
                .with_category(Category::Decorative)
                .with_price_range(Some(Money::brl(1000)), None)
                .featured(),
        );
        let products = gateway.list_products(&query).await.unwrap();
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].price, Money::brl(4590));

        let sent = transport.last_request().unwrap();
        let q = params(&sent.url);
        assert_eq!(q["is_active"], "eq.true");
        assert_eq!(q["category"], "eq.decorative");
        assert_eq!(q["price"], "gte.10.00");
        assert_eq!(q["or"], "(name.ilike.*drag*,description.ilike.*drag*)");
        assert_eq!(q["is_featured"], "eq.true");
        assert_eq!(q["order"], "created_at.desc");
        assert!(!q.contains_key("limit"));
    }

    #[tokio::test]
    async fn test_listing_paging() {
        let (gateway, transport) = gateway();
        transport.push_json(200, json!([]));
        transport.push_json(200, json!([]));
        transport.push_json(200, json!([]));

        let limited = ProductQuery {
            limit: Some(8),
            ..ProductQuery::default()
        };
        gateway.list_products(&limited).await.unwrap();
        let offset_only = ProductQuery {
            offset: Some(20),
            ..ProductQuery::default()
        };
        gateway.list_products(&offset_only).await.unwrap();
        let zero_offset = ProductQuery {
            limit: Some(4),
            offset: Some(0),
            ..ProductQuery::default()
        };
        gateway.list_products(&zero_offset).await.unwrap();

        let sent = transport.requests();
        let first = params(&sent[0].url);
        assert_eq!(first["limit"], "8");
        assert!(!first.contains_key("offset"));
        let second = params(&sent[1].url);
        assert_eq!(second["offset"], "20");
        assert_eq!(second["limit"], "10");
        let third = params(&sent[2].url);
        assert_eq!(third["limit"], "4");
        assert!(!third.contains_key("offset"));
    }

    #[tokio::test]
    async fn test_inverted_price_range_skips_provider() {
        let (gateway, transport) = gateway();
        let query = ProductQuery::new(
            FilterCriteria::new().with_price_range(Some(Money::brl(5000)), Some(Money::brl(1000))),
        );
        assert!(gateway.list_products(&query).await.unwrap().is_empty());
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn test_missing_product_is_none() {
        let (gateway, transport) = gateway();
        transport.push_json(
            406,
            json!({ "code": "PGRST116", "message": "JSON object requested, multiple (or no) rows returned" }),
        );
        let found = gateway.get_product(&ProductId::new(PRODUCT_ID)).await.unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn test_provider_error_passes_through() {
        let (gateway, transport) = gateway();
        transport.push_json(500, json!({ "code": "XX000", "message": "boom" }));
        let err = gateway.list_all_products().await.unwrap_err();
        match err {
            GatewayError::Provider(inner) => assert_eq!(inner.status(), Some(500)),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_invalid_product_is_not_sent() {
        let (gateway, transport) = gateway();
        let err = gateway
            .create_product(NewProduct::new("", Money::brl(-1), 1))
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::Validation(_)));
        assert!(transport.requests().is_empty());
    }

    // === Cart ===

    #[tokio::test]
    async fn test_add_to_cart_upserts_on_user_and_product() {
        let (gateway, transport) = gateway();
        transport.push_json(
            201,
            json!({ "id": "ci-1", "user_id": "u-1", "product_id": PRODUCT_ID, "quantity": 2 }),
        );
        let row = gateway
            .add_to_cart(&UserId::new("u-1"), &ProductId::new(PRODUCT_ID), 2)
            .await
            .unwrap();
        assert_eq!(row.quantity, 2);

        let sent = transport.last_request().unwrap();
        assert_eq!(sent.method, Method::Post);
        assert_eq!(params(&sent.url)["on_conflict"], "user_id,product_id");
        assert!(sent.header("Prefer").unwrap_or_default().contains("merge-duplicates"));
    }

    #[tokio::test]
    async fn test_update_cart_item_rejects_zero() {
        let (gateway, transport) = gateway();
        let err = gateway
            .update_cart_item(&CartItemId::new("ci-1"), 0)
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::Validation(_)));
        assert!(transport.requests().is_empty());
    }

    // === Orders ===

    #[tokio::test]
    async fn test_create_order_inserts_order_then_items() {
        let (gateway, transport) = gateway();
        transport.push_json(201, order_row());
        transport.push(Response::new(201, HashMap::new(), Vec::new()));
        let mut full = order_row();
        full["order_items"] = json!([{
            "id": "oi-1",
            "order_id": "o-1",
            "product_id": PRODUCT_ID,
            "quantity": 1,
            "price_at_purchase": "19.90",
            "products": { "name": "Chaveiro Pixel" }
        }]);
        transport.push_json(200, full);

        let order = NewOrder {
            customer_id: CustomerId::new(CUSTOMER_ID),
            status: OrderStatus::Pending,
            payment_status: Default::default(),
            total_price: Money::brl(3580),
            shipping_address: address(),
            payment_method: None,
            notes: None,
            lines: vec![NewOrderLine {
                product_id: ProductId::new(PRODUCT_ID),
                quantity: 1,
                price_at_purchase: Money::brl(1990),
            }],
        };
        let stored = gateway.create_order(order).await.unwrap();
        assert_eq!(stored.item_count(), 1);
        assert_eq!(stored.order_items[0].product_name(), Some("Chaveiro Pixel"));

        let sent = transport.requests();
        assert_eq!(sent.len(), 3);
        assert!(sent[0].url.contains("/orders"));
        assert!(sent[1].url.contains("/order_items"));
        let items: serde_json::Value =
            serde_json::from_str(sent[1].body_text().unwrap_or("[]")).unwrap();
        assert_eq!(items[0]["order_id"], "o-1");
        assert_eq!(items[0]["price_at_purchase"], "19.90");
    }

    #[tokio::test]
    async fn test_user_orders_filter_by_customer() {
        let (gateway, transport) = gateway();
        transport.push_json(200, json!([order_row()]));
        let orders = gateway.user_orders(&CustomerId::new("c-1")).await.unwrap();
        assert_eq!(orders.len(), 1);
        let q = params(&transport.last_request().unwrap().url);
        assert_eq!(q["customer_id"], "eq.c-1");
        assert_eq!(q["select"], ORDER_SELECT);
    }

    #[tokio::test]
    async fn test_update_order_status_patches_status() {
        let (gateway, transport) = gateway();
        let mut shipped = order_row();
        shipped["status"] = json!("shipped");
        transport.push_json(200, shipped);

        let order = gateway
            .update_order_status(&OrderId::new("o-1"), OrderStatus::Shipped)
            .await
            .unwrap();
        assert_eq!(order.status, OrderStatus::Shipped);
        let sent = transport.last_request().unwrap();
        assert_eq!(sent.method, Method::Patch);
        let body: serde_json::Value = serde_json::from_str(sent.body_text().unwrap_or("{}")).unwrap();
        assert_eq!(body["status"], "shipped");
    }

    // === Blog, newsletter, contact ===

    #[tokio::test]
    async fn test_published_posts_order_by_publication_date() {
        let (gateway, transport) = gateway();
        transport.push_json(200, json!([]));
        gateway.published_posts(Some(3)).await.unwrap();
        let q = params(&transport.last_request().unwrap().url);
        assert_eq!(q["is_published"], "eq.true");
        assert_eq!(q["order"], "publication_date.desc");
        assert_eq!(q["limit"], "3");
    }

    #[tokio::test]
    async fn test_subscribe_validates_email() {
        let (gateway, transport) = gateway();
        assert!(matches!(
            gateway.subscribe("not-an-email").await,
            Err(GatewayError::Validation(_))
        ));
        assert!(transport.requests().is_empty());

        transport.push_json(201, json!({ "id": "n-1", "email": "ana@pixel3d.com.br" }));
        let sub = gateway.subscribe(" ana@pixel3d.com.br ").await.unwrap();
        assert_eq!(sub.email, "ana@pixel3d.com.br");
    }

    #[tokio::test]
    async fn test_duplicate_subscription_surfaces_provider_code() {
        let (gateway, transport) = gateway();
        transport.push_json(409, json!({ "code": "23505", "message": "duplicate key value" }));
        let err = gateway.subscribe("ana@pixel3d.com.br").await.unwrap_err();
        match err {
            GatewayError::Provider(FetchError::Provider { status, .. }) => assert_eq!(status, 409),
            other => panic!("unexpected error: {other}"),
        }
    }

    // === Dashboard ===

    #[tokio::test]
    async fn test_dashboard_stats_counts_and_revenue() {
        let (gateway, transport) = gateway();
        for _ in 0..4 {
            transport.push(
                Response::json_body(200, &json!([{ "total_price": "10.00" }]))
                    .with_header("Content-Range", "0-0/3"),
            );
        }
        let stats = gateway.dashboard_stats().await.unwrap();
        assert_eq!(stats.total_products, 3);
        assert_eq!(stats.total_orders, 3);
        assert_eq!(stats.total_users, 3);
        assert_eq!(stats.total_revenue, Money::brl(1000));

        let sent = transport.requests();
        assert_eq!(sent.len(), 4);
        assert_eq!(sent.iter().filter(|r| r.method == Method::Head).count(), 3);
    }

    #[tokio::test]
    async fn test_top_products_ranked_by_revenue() {
        let (gateway, transport) = gateway();
        transport.push_json(
            200,
            json!([
                { "id": "i-1", "order_id": "o-1", "product_id": "p-1", "quantity": 1,
                  "price_at_purchase": "19.90", "products": { "name": "Chaveiro" } },
                { "id": "i-2", "order_id": "o-2", "product_id": "p-2", "quantity": 2,
                  "price_at_purchase": "45.90", "products": { "name": "Dragão" } }
            ]),
        );
        let top = gateway.top_products(5).await.unwrap();
        assert_eq!(top[0].name, "Dragão");
        assert_eq!(top[0].total_revenue, Money::brl(9180));
        assert_eq!(top[1].total_sales, 1);
    }
}
