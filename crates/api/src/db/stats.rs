//! Aggregate statistics for the admin dashboard.

use minicart_core::Money;
use sqlx::SqlitePool;

use super::RepositoryError;

/// Storewide aggregates. The order count and revenue exclude cancelled
/// orders; units sold counts every line item regardless of order status.
#[derive(Debug, Clone, Copy)]
pub struct StatsSummary {
    pub total_users: i64,
    pub total_products: i64,
    pub total_orders: i64,
    pub units_sold: i64,
    pub revenue: Money,
}

/// Repository for aggregate statistics.
pub struct StatsRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> StatsRepository<'a> {
    /// Create a new repository backed by the given pool.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Compute the dashboard summary.
    pub async fn summary(&self) -> Result<StatsSummary, RepositoryError> {
        let total_users = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM users WHERE role = 'user'",
        )
        .fetch_one(self.pool)
        .await?;

        let total_products =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM products")
                .fetch_one(self.pool)
                .await?;

        let (total_orders, revenue) = sqlx::query_as::<_, (i64, Money)>(
            "SELECT COUNT(*), COALESCE(SUM(total_amount), 0)
             FROM orders WHERE status != 'cancelled'",
        )
        .fetch_one(self.pool)
        .await?;

        let units_sold = sqlx::query_scalar::<_, i64>(
            "SELECT COALESCE(SUM(quantity), 0) FROM order_items",
        )
        .fetch_one(self.pool)
        .await?;

        Ok(StatsSummary {
            total_users,
            total_products,
            total_orders,
            units_sold,
            revenue,
        })
    }
}
