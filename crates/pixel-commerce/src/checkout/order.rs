//! Order records and the payloads used to place them.

use crate::cart::{CartLine, OrderSummary};
use crate::checkout::ShippingAddress;
use crate::error::CommerceError;
use crate::ids::{CustomerId, OrderId, OrderItemId, ProductId};
use crate::money::{self, Currency, Money};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Order status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Order placed, awaiting processing.
    #[default]
    Pending,
    /// Being printed and packed.
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 5] = [
        OrderStatus::Pending,
        OrderStatus::Processing,
        OrderStatus::Shipped,
        OrderStatus::Delivered,
        OrderStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Processing => "processing",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|status| status.as_str() == s)
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "Pendente",
            OrderStatus::Processing => "Processando",
            OrderStatus::Shipped => "Enviado",
            OrderStatus::Delivered => "Entregue",
            OrderStatus::Cancelled => "Cancelado",
        }
    }

    /// Check if order is in a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }

    /// Check if order can be cancelled.
    pub fn can_cancel(&self) -> bool {
        matches!(self, OrderStatus::Pending | OrderStatus::Processing)
    }
}

/// Payment status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    #[default]
    Pending,
    Paid,
    Failed,
    Refunded,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Paid => "paid",
            PaymentStatus::Failed => "failed",
            PaymentStatus::Refunded => "refunded",
        }
    }
}

/// Accepted payment methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    CreditCard,
    DebitCard,
    Pix,
    Boleto,
}

impl PaymentMethod {
    pub const ALL: [PaymentMethod; 4] = [
        PaymentMethod::CreditCard,
        PaymentMethod::DebitCard,
        PaymentMethod::Pix,
        PaymentMethod::Boleto,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::CreditCard => "credit_card",
            PaymentMethod::DebitCard => "debit_card",
            PaymentMethod::Pix => "pix",
            PaymentMethod::Boleto => "boleto",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|method| method.as_str() == s)
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            PaymentMethod::CreditCard => "Cartão de Crédito",
            PaymentMethod::DebitCard => "Cartão de Débito",
            PaymentMethod::Pix => "PIX",
            PaymentMethod::Boleto => "Boleto",
        }
    }
}

/// Product columns embedded in an order item (`products(name, images_url)`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EmbeddedProduct {
    pub name: String,
    #[serde(default)]
    pub images_url: Option<Vec<String>>,
}

/// A row of the `orders` table, optionally with its embedded items.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderRecord {
    pub id: OrderId,
    pub customer_id: CustomerId,
    #[serde(default)]
    pub order_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub status: OrderStatus,
    #[serde(with = "money::decimal")]
    pub total_price: Money,
    #[serde(default)]
    pub shipping_address: Option<ShippingAddress>,
    #[serde(default)]
    pub payment_method: Option<PaymentMethod>,
    #[serde(default)]
    pub payment_status: PaymentStatus,
    #[serde(default)]
    pub tracking_code: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub order_items: Vec<OrderItemRecord>,
}

impl OrderRecord {
    /// Total units across the embedded items.
    pub fn item_count(&self) -> i64 {
        self.order_items.iter().map(|i| i.quantity).sum()
    }

    pub fn is_paid(&self) -> bool {
        self.payment_status == PaymentStatus::Paid
    }

    /// Counts towards revenue.
    pub fn is_delivered(&self) -> bool {
        self.status == OrderStatus::Delivered
    }
}

/// A row of the `order_items` table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderItemRecord {
    pub id: OrderItemId,
    pub order_id: OrderId,
    pub product_id: ProductId,
    pub quantity: i64,
    /// Unit price frozen when the order was placed.
    #[serde(with = "money::decimal")]
    pub price_at_purchase: Money,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(rename = "products", default, skip_serializing_if = "Option::is_none")]
    pub product: Option<EmbeddedProduct>,
}

impl OrderItemRecord {
    /// price_at_purchase × quantity.
    pub fn line_total(&self) -> Result<Money, CommerceError> {
        self.price_at_purchase.checked_mul(self.quantity)
    }

    pub fn product_name(&self) -> Option<&str> {
        self.product.as_ref().map(|p| p.name.as_str())
    }
}

/// One line of an order that has not been inserted yet.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewOrderLine {
    pub product_id: ProductId,
    pub quantity: i64,
    #[serde(with = "money::decimal")]
    pub price_at_purchase: Money,
}

impl NewOrderLine {
    pub fn from_cart_line(line: &CartLine) -> Self {
        Self {
            product_id: line.product_id.clone(),
            quantity: line.quantity,
            price_at_purchase: line.unit_price,
        }
    }

    /// Attach the id of the inserted order.
    pub fn for_order(&self, order_id: &OrderId) -> NewOrderItem {
        NewOrderItem {
            order_id: order_id.clone(),
            product_id: self.product_id.clone(),
            quantity: self.quantity,
            price_at_purchase: self.price_at_purchase,
        }
    }
}

/// Insert payload for `order_items`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewOrderItem {
    pub order_id: OrderId,
    pub product_id: ProductId,
    pub quantity: i64,
    #[serde(with = "money::decimal")]
    pub price_at_purchase: Money,
}

/// Insert payload for `orders`. The lines are written to `order_items` once
/// the order row exists.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewOrder {
    pub customer_id: CustomerId,
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
    #[serde(with = "money::decimal")]
    pub total_price: Money,
    pub shipping_address: ShippingAddress,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<PaymentMethod>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip)]
    pub lines: Vec<NewOrderLine>,
}

impl NewOrder {
    /// Build an order from the cart lines and the summary computed for them.
    pub fn from_cart(
        customer_id: CustomerId,
        lines: &[CartLine],
        summary: &OrderSummary,
        shipping_address: ShippingAddress,
    ) -> Result<Self, CommerceError> {
        if lines.is_empty() {
            return Err(CommerceError::EmptyCart);
        }
        Ok(Self {
            customer_id,
            status: OrderStatus::Pending,
            payment_status: PaymentStatus::Pending,
            total_price: summary.total,
            shipping_address,
            payment_method: None,
            notes: None,
            lines: lines.iter().map(NewOrderLine::from_cart_line).collect(),
        })
    }

    pub fn with_payment_method(mut self, method: PaymentMethod) -> Self {
        self.payment_method = Some(method);
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn currency(&self) -> Currency {
        self.total_price.currency
    }

    /// Materialise the order row once the provider has assigned an id.
    pub fn into_record(self, id: OrderId, now: DateTime<Utc>) -> OrderRecord {
        let order_items = self
            .lines
            .iter()
            .map(|line| OrderItemRecord {
                id: OrderItemId::generate(),
                order_id: id.clone(),
                product_id: line.product_id.clone(),
                quantity: line.quantity,
                price_at_purchase: line.price_at_purchase,
                created_at: Some(now),
                product: None,
            })
            .collect();
        OrderRecord {
            id,
            customer_id: self.customer_id,
            order_date: Some(now),
            status: self.status,
            total_price: self.total_price,
            shipping_address: Some(self.shipping_address),
            payment_method: self.payment_method,
            payment_status: self.payment_status,
            tracking_code: None,
            notes: self.notes,
            created_at: now,
            updated_at: now,
            order_items,
        }
    }
}
