//! Order placement and order history.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use crate::db::OrderRepository;
use crate::error::AppError;
use crate::middleware::RequireAuth;
use crate::services::pricing::{self, CartLine};
use crate::state::AppState;

pub fn router() -> axum::Router<AppState> {
    axum::Router::new()
        .route("/", post(place_order))
        .route("/my", get(my_orders))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlaceOrderRequest {
    #[serde(default)]
    cart_items: Vec<CartLine>,
}

async fn place_order(
    State(state): State<AppState>,
    RequireAuth(identity): RequireAuth,
    Json(body): Json<PlaceOrderRequest>,
) -> Result<impl IntoResponse, AppError> {
    if body.cart_items.is_empty() {
        return Err(AppError::Validation("cartItems is required".to_owned()));
    }

    let lines: Vec<_> = body.cart_items.iter().map(pricing::normalize_line).collect();
    let pricing = pricing::price_cart(&lines);

    let order_id = OrderRepository::new(state.pool())
        .create(identity.id, &pricing, &lines)
        .await?;

    tracing::info!(
        order_id = %order_id,
        user_id = %identity.id,
        total = %pricing.total,
        "order placed"
    );
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Order placed", "orderId": order_id })),
    ))
}

async fn my_orders(
    State(state): State<AppState>,
    RequireAuth(identity): RequireAuth,
) -> Result<impl IntoResponse, AppError> {
    let orders = OrderRepository::new(state.pool())
        .list_for_user(identity.id)
        .await?;
    Ok(Json(json!({ "orders": orders })))
}
