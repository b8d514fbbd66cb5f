//! Bearer-token extractors.
//!
//! [`RequireAuth`] verifies the `Authorization: Bearer <token>` header and
//! yields the caller's [`Identity`]; [`RequireAdmin`] additionally requires
//! the admin role. Both reject with the matching status code, so handlers
//! only see authenticated requests.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use minicart_core::{Role, UserId};

use crate::error::AppError;
use crate::services::tokens::{self, Claims, TokenError};
use crate::state::AppState;

/// The authenticated caller, as carried in the token.
#[derive(Debug, Clone)]
pub struct Identity {
    pub id: UserId,
    pub email: String,
    pub role: Role,
    pub name: String,
}

impl From<Claims> for Identity {
    fn from(claims: Claims) -> Self {
        Self {
            id: UserId::new(claims.sub),
            email: claims.email,
            role: claims.role,
            name: claims.name,
        }
    }
}

/// Extractor that requires a valid bearer token.
#[derive(Debug, Clone)]
pub struct RequireAuth(pub Identity);

/// Extractor that requires a valid bearer token with the admin role.
#[derive(Debug, Clone)]
pub struct RequireAdmin(pub Identity);

/// Extract the token from an `Authorization` header value. The header must
/// be exactly `Bearer <token>`.
fn parse_bearer(header: &str) -> Option<&str> {
    let mut parts = header.split_whitespace();
    match (parts.next(), parts.next(), parts.next()) {
        (Some("Bearer"), Some(token), None) => Some(token),
        _ => None,
    }
}

fn authenticate(parts: &Parts, state: &AppState) -> Result<Identity, AppError> {
    let header = parts
        .headers
        .get(AUTHORIZATION)
        .ok_or_else(|| AppError::Unauthenticated("Access denied. No token provided.".to_owned()))?
        .to_str()
        .map_err(|_| {
            AppError::Unauthenticated("Invalid authorization header format.".to_owned())
        })?;

    let token = parse_bearer(header).ok_or_else(|| {
        AppError::Unauthenticated("Invalid authorization header format.".to_owned())
    })?;

    let claims = tokens::verify(token, state.jwt_secret()).map_err(|e| match e {
        TokenError::Expired | TokenError::Invalid => {
            AppError::Unauthenticated("Invalid or expired token".to_owned())
        }
    })?;

    Ok(Identity::from(claims))
}

impl FromRequestParts<AppState> for RequireAuth {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        authenticate(parts, state).map(Self)
    }
}

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let identity = authenticate(parts, state)?;
        if !identity.role.is_admin() {
            return Err(AppError::Forbidden(
                "Forbidden: insufficient privileges.".to_owned(),
            ));
        }
        Ok(Self(identity))
    }
}
