//! Order storage, including the multi-statement placement transaction.

use chrono::{DateTime, Utc};
use minicart_core::{Money, OrderId, OrderItemId, OrderStatus, ProductId, UserId};
use sqlx::SqlitePool;

use super::RepositoryError;
use crate::models::{Order, OrderItem, OrderWithItems};
use crate::services::pricing::{NormalizedLine, OrderPricing};

/// Joined row for order history. Item columns are nullable because orders
/// with no surviving items still appear via the LEFT JOIN.
#[derive(Debug, sqlx::FromRow)]
struct OrderJoinRow {
    id: OrderId,
    user_id: UserId,
    total_amount: Money,
    shipping_amount: Money,
    status: OrderStatus,
    created_at: DateTime<Utc>,
    item_id: Option<OrderItemId>,
    product_id: Option<ProductId>,
    product_name: Option<String>,
    quantity: Option<i64>,
    price_at_purchase: Option<Money>,
}

/// Repository for orders and their line items.
pub struct OrderRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new repository backed by the given pool.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Place an order: insert the order header and all line items in a single
    /// transaction. If any insert fails, the transaction is rolled back on
    /// drop and no rows are persisted.
    pub async fn create(
        &self,
        user_id: UserId,
        pricing: &OrderPricing,
        lines: &[NormalizedLine],
    ) -> Result<OrderId, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let order_id = sqlx::query_scalar::<_, OrderId>(
            "INSERT INTO orders (user_id, total_amount, shipping_amount)
             VALUES (?, ?, ?)
             RETURNING id",
        )
        .bind(user_id)
        .bind(pricing.total)
        .bind(pricing.shipping)
        .fetch_one(&mut *tx)
        .await?;

        for line in lines {
            sqlx::query(
                "INSERT INTO order_items
                     (order_id, product_id, product_name, quantity, price_at_purchase)
                 VALUES (?, ?, ?, ?, ?)",
            )
            .bind(order_id)
            .bind(line.product_id)
            .bind(&line.name)
            .bind(line.quantity)
            .bind(line.unit_price)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(order_id)
    }

    /// List a user's orders with their line items, newest order first.
    pub async fn list_for_user(
        &self,
        user_id: UserId,
    ) -> Result<Vec<OrderWithItems>, RepositoryError> {
        let rows = sqlx::query_as::<_, OrderJoinRow>(
            "SELECT o.id, o.user_id, o.total_amount, o.shipping_amount, o.status,
                    o.created_at,
                    oi.id AS item_id, oi.product_id, oi.product_name,
                    oi.quantity, oi.price_at_purchase
             FROM orders o
             LEFT JOIN order_items oi ON oi.order_id = o.id
             WHERE o.user_id = ?
             ORDER BY o.id DESC, oi.id DESC",
        )
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        let mut orders: Vec<OrderWithItems> = Vec::new();
        for row in rows {
            if orders.last().is_none_or(|o| o.order.id != row.id) {
                orders.push(OrderWithItems {
                    order: Order {
                        id: row.id,
                        user_id: row.user_id,
                        total_amount: row.total_amount,
                        shipping_amount: row.shipping_amount,
                        status: row.status,
                        created_at: row.created_at,
                    },
                    items: Vec::new(),
                });
            }

            if let (Some(id), Some(product_name), Some(quantity), Some(price_at_purchase)) = (
                row.item_id,
                row.product_name,
                row.quantity,
                row.price_at_purchase,
            ) {
                if let Some(current) = orders.last_mut() {
                    current.items.push(OrderItem {
                        id,
                        product_id: row.product_id,
                        product_name,
                        quantity,
                        price_at_purchase,
                    });
                }
            }
        }

        Ok(orders)
    }
}
