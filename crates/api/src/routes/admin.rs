//! Admin dashboard: statistics and user management.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Json;
use minicart_core::UserId;
use serde_json::json;

use crate::db::{RepositoryError, StatsRepository, UserRepository};
use crate::error::AppError;
use crate::middleware::RequireAdmin;
use crate::models::PublicUser;
use crate::routes::auth::create_user;
use crate::state::AppState;

pub fn router() -> axum::Router<AppState> {
    axum::Router::new()
        .route("/stats", get(stats))
        .route("/users", get(list_users).post(create_user))
        .route("/users/{id}", axum::routing::delete(delete_user))
}

async fn stats(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Result<impl IntoResponse, AppError> {
    let summary = StatsRepository::new(state.pool()).summary().await?;

    Ok(Json(json!({
        "stats": {
            "totalUsers": summary.total_users,
            "totalProducts": summary.total_products,
            "totalOrders": summary.total_orders,
            "unitsSold": summary.units_sold,
            "revenue": summary.revenue,
        }
    })))
}

async fn list_users(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Result<impl IntoResponse, AppError> {
    let users: Vec<PublicUser> = UserRepository::new(state.pool())
        .list_all()
        .await?
        .into_iter()
        .map(PublicUser::from)
        .collect();

    Ok(Json(json!({ "users": users })))
}

async fn delete_user(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<UserId>,
) -> Result<impl IntoResponse, AppError> {
    if id == admin.id {
        return Err(AppError::InvalidOperation(
            "Admin cannot delete own account.".to_owned(),
        ));
    }

    UserRepository::new(state.pool())
        .delete(id)
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound => AppError::NotFound("User not found".to_owned()),
            other => other.into(),
        })?;

    tracing::info!(user_id = %id, deleted_by = %admin.id, "user deleted");
    Ok(Json(json!({ "message": "User deleted successfully" })))
}
