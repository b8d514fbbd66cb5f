//! Registration, login, profile, and admin-created accounts.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::{Json, routing::get, routing::post};
use minicart_core::{Email, Role};
use serde::Deserialize;
use serde_json::json;

use crate::db::UserRepository;
use crate::error::AppError;
use crate::middleware::{RequireAdmin, RequireAuth};
use crate::models::PublicUser;
use crate::services::{password, tokens};
use crate::state::AppState;

pub fn router() -> axum::Router<AppState> {
    axum::Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/me", get(me))
        .route("/create-user", post(create_user))
}

#[derive(Debug, Deserialize)]
struct RegisterRequest {
    #[serde(default)]
    name: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    password: String,
}

async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<impl IntoResponse, AppError> {
    if body.name.is_empty() || body.email.is_empty() || body.password.is_empty() {
        return Err(AppError::Validation("All fields are required".to_owned()));
    }

    let email =
        Email::parse(&body.email).map_err(|e| AppError::Validation(e.to_string()))?;
    let password_hash =
        password::hash_password(&body.password).map_err(|e| AppError::Internal(e.to_string()))?;

    UserRepository::new(state.pool())
        .create(&body.name, &email, &password_hash, Role::User)
        .await?;

    tracing::info!(email = %email, "user registered");
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "User registered successfully" })),
    ))
}

#[derive(Debug, Deserialize)]
struct LoginRequest {
    #[serde(default)]
    email: String,
    #[serde(default)]
    password: String,
}

async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    if body.email.is_empty() || body.password.is_empty() {
        return Err(AppError::Validation("All fields are required".to_owned()));
    }

    let email = Email::parse(&body.email).map_err(|_| AppError::InvalidCredentials)?;

    // Unknown email and wrong password produce the same response, so the
    // login endpoint cannot be used to probe which emails are registered.
    let user = UserRepository::new(state.pool())
        .get_by_email(&email)
        .await
        .map_err(|e| match e {
            crate::db::RepositoryError::NotFound => AppError::InvalidCredentials,
            other => other.into(),
        })?;

    let matches = password::verify_password(&body.password, &user.password_hash)
        .map_err(|e| AppError::Internal(e.to_string()))?;
    if !matches {
        return Err(AppError::InvalidCredentials);
    }

    let token =
        tokens::issue(&user, state.jwt_secret()).map_err(|e| AppError::Internal(e.to_string()))?;

    tracing::info!(user_id = %user.id, "user logged in");
    Ok(Json(json!({
        "message": "Login successful",
        "token": token,
        "user": PublicUser::from(user),
    })))
}

/// Return the caller's current persisted record. The role or name may have
/// changed since the token was issued, so this reads the store rather than
/// echoing the claims.
async fn me(
    State(state): State<AppState>,
    RequireAuth(identity): RequireAuth,
) -> Result<impl IntoResponse, AppError> {
    let user = UserRepository::new(state.pool())
        .get_by_id(identity.id)
        .await
        .map_err(|e| match e {
            crate::db::RepositoryError::NotFound => {
                AppError::NotFound("User not found".to_owned())
            }
            other => other.into(),
        })?;

    Ok(Json(json!({ "user": PublicUser::from(user) })))
}

#[derive(Debug, Deserialize)]
pub(crate) struct CreateUserRequest {
    #[serde(default)]
    name: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    password: String,
    #[serde(default)]
    role: Option<String>,
}

/// Admin-only account creation. Unlike registration, the requested role is
/// honored; any value other than "admin" is coerced to the user role.
pub(crate) async fn create_user(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Json(body): Json<CreateUserRequest>,
) -> Result<impl IntoResponse, AppError> {
    if body.name.is_empty() || body.email.is_empty() || body.password.is_empty() {
        return Err(AppError::Validation(
            "name, email and password are required".to_owned(),
        ));
    }

    let email =
        Email::parse(&body.email).map_err(|e| AppError::Validation(e.to_string()))?;
    let role = Role::coerce(body.role.as_deref().unwrap_or_default());
    let password_hash =
        password::hash_password(&body.password).map_err(|e| AppError::Internal(e.to_string()))?;

    let user = UserRepository::new(state.pool())
        .create(&body.name, &email, &password_hash, role)
        .await?;

    tracing::info!(user_id = %user.id, role = %role.as_str(), "user created by admin");
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "User created successfully" })),
    ))
}
