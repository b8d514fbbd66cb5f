//! Integration test harness for the minicart API.
//!
//! Tests run fully in-process: each [`TestApp`] owns an in-memory SQLite
//! database with migrations applied and drives the real router through
//! `tower::ServiceExt::oneshot`, so no server or external database is needed.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::str::FromStr;

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use http_body_util::BodyExt;
use minicart_core::{Email, Role};
use secrecy::SecretString;
use serde_json::Value;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tower::ServiceExt;

use minicart_api::config::AppConfig;
use minicart_api::db::{self, UserRepository};
use minicart_api::routes;
use minicart_api::services::{password, tokens};
use minicart_api::state::AppState;

/// Signing secret used by every test app.
pub const TEST_JWT_SECRET: &str = "integration-test-signing-secret-0123456789";

/// An in-process application instance with its own database.
pub struct TestApp {
    router: Router,
    /// Direct pool access for seeding and row-level assertions.
    pub pool: SqlitePool,
}

impl TestApp {
    /// Create a fresh app backed by an in-memory database.
    ///
    /// The pool is capped at one connection: each in-memory SQLite
    /// connection is its own database, so a larger pool would hand out
    /// empty databases.
    pub async fn spawn() -> Self {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .expect("valid connection string")
            .foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .expect("Failed to open in-memory database");

        db::MIGRATOR
            .run(&pool)
            .await
            .expect("Failed to run migrations");

        let config = AppConfig {
            database_url: SecretString::from("sqlite::memory:"),
            host: std::net::IpAddr::from([127, 0, 0, 1]),
            port: 0,
            jwt_secret: SecretString::from(TEST_JWT_SECRET),
        };
        let state = AppState::new(config, pool.clone());

        Self {
            router: routes::router(state),
            pool,
        }
    }

    /// Send a request and return the status with the parsed JSON body.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(path);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }

        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Request failed");
        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to read body")
            .to_bytes();

        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };
        (status, json)
    }

    pub async fn get(&self, path: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.request(Method::GET, path, token, None).await
    }

    pub async fn post(
        &self,
        path: &str,
        token: Option<&str>,
        body: Value,
    ) -> (StatusCode, Value) {
        self.request(Method::POST, path, token, Some(body)).await
    }

    pub async fn put(&self, path: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.request(Method::PUT, path, token, Some(body)).await
    }

    pub async fn delete(&self, path: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.request(Method::DELETE, path, token, None).await
    }

    /// Register an account and log in, returning the bearer token.
    pub async fn register_and_login(&self, name: &str, email: &str, pass: &str) -> String {
        let (status, _) = self
            .post(
                "/api/auth/register",
                None,
                serde_json::json!({ "name": name, "email": email, "password": pass }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "registration failed");

        self.login(email, pass).await
    }

    /// Log in and return the bearer token.
    pub async fn login(&self, email: &str, pass: &str) -> String {
        let (status, body) = self
            .post(
                "/api/auth/login",
                None,
                serde_json::json!({ "email": email, "password": pass }),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "login failed: {body}");
        body["token"]
            .as_str()
            .expect("login response missing token")
            .to_owned()
    }

    /// Insert an admin account directly and return a token for it.
    pub async fn seed_admin(&self, email: &str) -> String {
        let parsed = Email::parse(email).expect("valid admin email");
        let hash = password::hash_password("admin-password").expect("hashing failed");
        let user = UserRepository::new(&self.pool)
            .create("Admin", &parsed, &hash, Role::Admin)
            .await
            .expect("Failed to seed admin");

        tokens::issue(&user, &SecretString::from(TEST_JWT_SECRET)).expect("Failed to issue token")
    }

    /// Count rows in a table, for asserting on storage side effects.
    pub async fn count_rows(&self, table: &str) -> i64 {
        sqlx::query_scalar::<_, i64>(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(&self.pool)
            .await
            .expect("count query failed")
    }
}
