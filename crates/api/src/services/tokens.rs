//! Bearer token issuing and verification.
//!
//! Tokens are HS256 JWTs carrying the account's id, email, role, and name,
//! valid for 24 hours. Authorization decisions read the role from the token,
//! not from the database, so a role change takes effect on the next login.

use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use minicart_core::Role;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::User;

/// Token lifetime.
const TOKEN_TTL_HOURS: i64 = 24;

/// Claims embedded in every issued token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Account ID.
    pub sub: i64,
    pub email: String,
    pub role: Role,
    pub name: String,
    /// Issued-at, seconds since epoch.
    pub iat: i64,
    /// Expiry, seconds since epoch.
    pub exp: i64,
}

/// Token verification failures.
#[derive(Debug, Error)]
pub enum TokenError {
    #[error("token expired")]
    Expired,
    #[error("invalid token")]
    Invalid,
}

/// Issue a signed token for the given account.
///
/// # Errors
///
/// Returns an error if signing fails.
pub fn issue(user: &User, secret: &SecretString) -> Result<String, jsonwebtoken::errors::Error> {
    let now = Utc::now().timestamp();
    let claims = Claims {
        sub: user.id.as_i64(),
        email: user.email.as_str().to_owned(),
        role: user.role,
        name: user.name.clone(),
        iat: now,
        exp: now + TOKEN_TTL_HOURS * 3600,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.expose_secret().as_bytes()),
    )
}

/// Verify a token's signature and expiry and return its claims.
///
/// # Errors
///
/// Returns `TokenError::Expired` for an expired token, `TokenError::Invalid`
/// for anything else (bad signature, malformed token, wrong algorithm).
pub fn verify(token: &str, secret: &SecretString) -> Result<Claims, TokenError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.expose_secret().as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,
        _ => TokenError::Invalid,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Utc;
    use minicart_core::{Email, UserId};

    use super::*;

    fn secret() -> SecretString {
        SecretString::from("unit-test-signing-secret-32-chars!!")
    }

    fn sample_user() -> User {
        User {
            id: UserId::new(42),
            name: "Grace".to_owned(),
            email: Email::parse("grace@example.com").unwrap(),
            password_hash: "unused".to_owned(),
            role: Role::Admin,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_issue_and_verify_roundtrip() {
        let token = issue(&sample_user(), &secret()).unwrap();
        let claims = verify(&token, &secret()).unwrap();

        assert_eq!(claims.sub, 42);
        assert_eq!(claims.email, "grace@example.com");
        assert_eq!(claims.role, Role::Admin);
        assert_eq!(claims.name, "Grace");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_wrong_secret_is_invalid() {
        let token = issue(&sample_user(), &secret()).unwrap();
        let other = SecretString::from("a-completely-different-secret-32ch!");
        assert!(matches!(verify(&token, &other), Err(TokenError::Invalid)));
    }

    #[test]
    fn test_expired_token() {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: 1,
            email: "old@example.com".to_owned(),
            role: Role::User,
            name: "Old".to_owned(),
            iat: now - 7200,
            exp: now - 3600,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret().expose_secret().as_bytes()),
        )
        .unwrap();

        assert!(matches!(verify(&token, &secret()), Err(TokenError::Expired)));
    }

    #[test]
    fn test_garbage_is_invalid() {
        assert!(matches!(
            verify("not.a.token", &secret()),
            Err(TokenError::Invalid)
        ));
    }
}
