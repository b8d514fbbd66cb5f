//! Public catalog reads and admin-only catalog writes.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Json;
use minicart_core::{Money, ProductId};
use serde::Deserialize;
use serde_json::json;

use crate::db::{ProductRepository, RepositoryError};
use crate::error::AppError;
use crate::middleware::RequireAdmin;
use crate::models::ProductData;
use crate::state::AppState;

pub fn router() -> axum::Router<AppState> {
    axum::Router::new()
        .route("/", get(list_products).post(create_product))
        .route(
            "/{id}",
            get(get_product).put(update_product).delete(delete_product),
        )
}

async fn list_products(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let products = ProductRepository::new(state.pool()).list_all().await?;
    Ok(Json(json!({ "products": products })))
}

async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<impl IntoResponse, AppError> {
    let product = ProductRepository::new(state.pool())
        .get_by_id(id)
        .await
        .map_err(not_found)?;
    Ok(Json(json!({ "product": product })))
}

#[derive(Debug, Deserialize)]
struct ProductPayload {
    #[serde(default)]
    name: String,
    price: Option<Money>,
    #[serde(default)]
    category: String,
    #[serde(default)]
    image: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    stock: Option<i64>,
}

impl ProductPayload {
    /// Validate required fields and apply defaults for the optional ones.
    fn into_data(self) -> Result<ProductData, AppError> {
        let Some(price) = self.price else {
            return Err(missing_fields());
        };
        if self.name.is_empty() || self.category.is_empty() || self.image.is_empty() {
            return Err(missing_fields());
        }
        if price.is_negative() {
            return Err(AppError::Validation("price must not be negative".to_owned()));
        }

        Ok(ProductData {
            name: self.name,
            price,
            category: self.category,
            image: self.image,
            description: self.description,
            stock: self.stock.unwrap_or(0).max(0),
        })
    }
}

fn missing_fields() -> AppError {
    AppError::Validation("name, price, category and image are required".to_owned())
}

fn not_found(err: RepositoryError) -> AppError {
    match err {
        RepositoryError::NotFound => AppError::NotFound("Product not found".to_owned()),
        other => other.into(),
    }
}

async fn create_product(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Json(body): Json<ProductPayload>,
) -> Result<impl IntoResponse, AppError> {
    let data = body.into_data()?;
    let product = ProductRepository::new(state.pool()).create(&data).await?;

    tracing::info!(product_id = %product.id, "product created");
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Product created successfully" })),
    ))
}

async fn update_product(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<ProductId>,
    Json(body): Json<ProductPayload>,
) -> Result<impl IntoResponse, AppError> {
    let data = body.into_data()?;
    ProductRepository::new(state.pool())
        .update(id, &data)
        .await
        .map_err(not_found)?;

    Ok(Json(json!({ "message": "Product updated successfully" })))
}

async fn delete_product(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<ProductId>,
) -> Result<impl IntoResponse, AppError> {
    ProductRepository::new(state.pool())
        .delete(id)
        .await
        .map_err(not_found)?;

    tracing::info!(product_id = %id, "product deleted");
    Ok(Json(json!({ "message": "Product deleted successfully" })))
}
