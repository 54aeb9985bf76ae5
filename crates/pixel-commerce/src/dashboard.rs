//! Admin dashboard aggregation.
//!
//! Pure helpers over rows already fetched, shared by every gateway.

use crate::catalog::Product;
use crate::checkout::{OrderItemRecord, OrderRecord};
use crate::error::CommerceError;
use crate::gateway::TopProduct;
use crate::ids::ProductId;
use crate::money::{Currency, Money};
use chrono::Datelike;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Products shown in the dashboard's top-sellers card by default.
pub const DEFAULT_TOP_PRODUCTS: usize = 5;
/// Orders shown in the recent-orders card by default.
pub const DEFAULT_RECENT_ORDERS: usize = 5;

/// Revenue counted from delivered orders only.
pub fn revenue_from(orders: &[OrderRecord], currency: Currency) -> Result<Money, CommerceError> {
    Money::sum(
        orders
            .iter()
            .filter(|o| o.is_delivered())
            .map(|o| &o.total_price),
        currency,
    )
}

/// Group order items by product and rank by revenue (price at purchase ×
/// quantity), highest first. Ties keep first-seen order.
pub fn rank_top_products(
    items: &[OrderItemRecord],
    limit: usize,
    currency: Currency,
) -> Result<Vec<TopProduct>, CommerceError> {
    let mut ranked: Vec<TopProduct> = Vec::new();
    let mut index: HashMap<ProductId, usize> = HashMap::new();

    for item in items {
        let line_total = item.line_total()?;
        let slot = match index.get(&item.product_id) {
            Some(&i) => i,
            None => {
                index.insert(item.product_id.clone(), ranked.len());
                ranked.push(TopProduct {
                    product_id: item.product_id.clone(),
                    name: item
                        .product_name()
                        .map(str::to_string)
                        .unwrap_or_else(|| item.product_id.to_string()),
                    total_sales: 0,
                    total_revenue: Money::zero(currency),
                });
                ranked.len() - 1
            }
        };
        let entry = &mut ranked[slot];
        entry.total_sales = entry
            .total_sales
            .checked_add(item.quantity)
            .ok_or(CommerceError::Overflow)?;
        entry.total_revenue = entry.total_revenue.checked_add(&line_total)?;
    }

    ranked.sort_by(|a, b| b.total_revenue.amount_cents.cmp(&a.total_revenue.amount_cents));
    ranked.truncate(limit);
    Ok(ranked)
}

/// Active products that are running low, lowest stock first.
pub fn low_stock(products: &[Product]) -> Vec<&Product> {
    let mut low: Vec<&Product> = products
        .iter()
        .filter(|p| p.is_active && p.is_low_stock())
        .collect();
    low.sort_by_key(|p| p.stock_quantity);
    low
}

/// Revenue of delivered orders per calendar month ("2024-01"), oldest first.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MonthlyRevenue {
    pub month: String,
    pub revenue: Money,
}

pub fn monthly_revenue(
    orders: &[OrderRecord],
    currency: Currency,
) -> Result<Vec<MonthlyRevenue>, CommerceError> {
    let mut months: BTreeMap<(i32, u32), Money> = BTreeMap::new();
    for order in orders.iter().filter(|o| o.is_delivered()) {
        let placed = order.order_date.unwrap_or(order.created_at);
        let slot = months
            .entry((placed.year(), placed.month()))
            .or_insert_with(|| Money::zero(currency));
        *slot = slot.checked_add(&order.total_price)?;
    }
    Ok(months
        .into_iter()
        .map(|((year, month), revenue)| MonthlyRevenue {
            month: format!("{:04}-{:02}", year, month),
            revenue,
        })
        .collect())
}

/// Product counts for the admin products page.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CatalogOverview {
    pub total: usize,
    pub active: usize,
    pub featured: usize,
    pub low_stock: usize,
    pub out_of_stock: usize,
}

impl CatalogOverview {
    pub fn of(products: &[Product]) -> Self {
        products.iter().fold(Self::default(), |mut acc, p| {
            acc.total += 1;
            if p.is_active {
                acc.active += 1;
            }
            if p.is_featured {
                acc.featured += 1;
            }
            if p.is_low_stock() {
                acc.low_stock += 1;
            }
            if p.is_out_of_stock() {
                acc.out_of_stock += 1;
            }
            acc
        })
    }
}
