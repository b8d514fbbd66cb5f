//! Order and line-item models.

use chrono::{DateTime, Utc};
use minicart_core::{Money, OrderId, OrderItemId, OrderStatus, ProductId, UserId};
use serde::Serialize;

/// A placed order with its captured totals.
#[derive(Debug, Clone, Serialize)]
pub struct Order {
    pub id: OrderId,
    pub user_id: UserId,
    pub total_amount: Money,
    pub shipping_amount: Money,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
}

/// A line item snapshot. `product_id` is nulled if the product was later
/// deleted; the name and price captured at purchase time are kept.
#[derive(Debug, Clone, Serialize)]
pub struct OrderItem {
    pub id: OrderItemId,
    pub product_id: Option<ProductId>,
    pub product_name: String,
    pub quantity: i64,
    pub price_at_purchase: Money,
}

/// An order together with its line items, as returned by order history.
#[derive(Debug, Clone, Serialize)]
pub struct OrderWithItems {
    #[serde(flatten)]
    pub order: Order,
    pub items: Vec<OrderItem>,
}
