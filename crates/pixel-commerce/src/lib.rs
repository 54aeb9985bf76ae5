//! Storefront domain for a pixel-art 3D printing shop.
//!
//! This crate provides:
//!
//! - **Catalog**: Products, categories, materials, demo fixtures
//! - **Search**: Filter criteria, sort modes, the evaluator, pagination
//! - **Cart**: Lines, coupons, the cart reducer and order summaries
//! - **Checkout**: Shipping policy, addresses, order records
//! - **Store**: Catalog load state with stale-response protection
//! - **Gateway**: One async trait per entity, remote and in-memory backends
//! - **Validation**: Field rules for every payload sent to the provider
//! - **Dashboard**: Admin aggregation over fetched rows
//!
//! Amounts are integer cents; money never goes through floating point.
//!
//! # Example
//!
//! ```rust,ignore
//! use pixel_commerce::prelude::*;
//!
//! let gateway = MemoryGateway::with_demo_catalog();
//! let products = gateway.list_all_products().await?;
//!
//! let mut cart = CartState::new();
//! cart.apply(CartAction::Add { product: products[0].clone(), quantity: 2 })?;
//! let summary = cart.summary(&ShippingPolicy::default())?;
//! println!("Total: {}", summary.total);
//! ```

pub mod error;
pub mod ids;
pub mod money;

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod dashboard;
pub mod gateway;
pub mod search;
pub mod store;
pub mod validation;

pub use error::CommerceError;
pub use ids::*;
pub use money::{Currency, Money};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::CommerceError;
    pub use crate::ids::*;
    pub use crate::money::{Currency, Money};

    // Catalog
    pub use crate::catalog::{Category, Material, NewProduct, Product, ProductUpdate};

    // Search
    pub use crate::search::{evaluate, FilterCriteria, Page, PageRequest, Pagination, SortMode};

    // Cart
    pub use crate::cart::{aggregate, CartAction, CartLine, CartState, Coupon, OrderSummary};

    // Checkout
    pub use crate::checkout::{
        NewOrder, OrderRecord, OrderStatus, PaymentMethod, PaymentStatus, ShippingAddress,
        ShippingPolicy,
    };

    // Store
    pub use crate::store::{CatalogAction, CatalogStore, LoadState, RequestToken};

    // Gateways
    pub use crate::gateway::{
        GatewayError, GatewayResult, MemoryGateway, ProductGateway, ProductQuery, RemoteGateway,
        StoreGateway,
    };

    // Validation
    pub use crate::validation::{Schema, Validate, ValidationErrors};
}
