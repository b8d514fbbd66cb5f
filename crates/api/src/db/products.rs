//! Catalog product storage.

use minicart_core::ProductId;
use sqlx::SqlitePool;

use super::RepositoryError;
use crate::models::{Product, ProductData};

/// Repository for catalog products.
pub struct ProductRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new repository backed by the given pool.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// List all products, newest first.
    pub async fn list_all(&self) -> Result<Vec<Product>, RepositoryError> {
        let products = sqlx::query_as::<_, Product>(
            "SELECT id, name, price, category, image, description, stock, created_at
             FROM products ORDER BY id DESC",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(products)
    }

    /// Look up a product by ID.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no product matches.
    pub async fn get_by_id(&self, id: ProductId) -> Result<Product, RepositoryError> {
        sqlx::query_as::<_, Product>(
            "SELECT id, name, price, category, image, description, stock, created_at
             FROM products WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)
    }

    /// Insert a new product and return it.
    pub async fn create(&self, data: &ProductData) -> Result<Product, RepositoryError> {
        let product = sqlx::query_as::<_, Product>(
            "INSERT INTO products (name, price, category, image, description, stock)
             VALUES (?, ?, ?, ?, ?, ?)
             RETURNING id, name, price, category, image, description, stock, created_at",
        )
        .bind(&data.name)
        .bind(data.price)
        .bind(&data.category)
        .bind(&data.image)
        .bind(&data.description)
        .bind(data.stock)
        .fetch_one(self.pool)
        .await?;

        Ok(product)
    }

    /// Replace all mutable fields of a product.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the product does not exist.
    pub async fn update(
        &self,
        id: ProductId,
        data: &ProductData,
    ) -> Result<Product, RepositoryError> {
        sqlx::query_as::<_, Product>(
            "UPDATE products
             SET name = ?, price = ?, category = ?, image = ?, description = ?, stock = ?
             WHERE id = ?
             RETURNING id, name, price, category, image, description, stock, created_at",
        )
        .bind(&data.name)
        .bind(data.price)
        .bind(&data.category)
        .bind(&data.image)
        .bind(&data.description)
        .bind(data.stock)
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)
    }

    /// Delete a product. Line items referencing it keep their snapshot and
    /// have their product reference nulled by the schema.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the product does not exist.
    pub async fn delete(&self, id: ProductId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM products WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
