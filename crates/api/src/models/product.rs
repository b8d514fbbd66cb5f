//! Catalog product model.

use chrono::{DateTime, Utc};
use minicart_core::{Money, ProductId};
use serde::Serialize;

/// A catalog entry.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: Money,
    pub category: String,
    pub image: String,
    pub description: String,
    pub stock: i64,
    pub created_at: DateTime<Utc>,
}

/// Validated fields for creating or replacing a product.
#[derive(Debug, Clone)]
pub struct ProductData {
    pub name: String,
    pub price: Money,
    pub category: String,
    pub image: String,
    pub description: String,
    pub stock: i64,
}
