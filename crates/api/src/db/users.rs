//! User account storage.

use chrono::{DateTime, Utc};
use minicart_core::{Email, Role, UserId};
use sqlx::SqlitePool;

use super::RepositoryError;
use crate::models::User;

/// Raw database row for a user.
#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: UserId,
    name: String,
    email: String,
    password_hash: String,
    role: Role,
    created_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = RepositoryError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let email = Email::parse(&row.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email for user {}: {e}", row.id))
        })?;
        Ok(Self {
            id: row.id,
            name: row.name,
            email,
            password_hash: row.password_hash,
            role: row.role,
            created_at: row.created_at,
        })
    }
}

/// Repository for user accounts.
pub struct UserRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> UserRepository<'a> {
    /// Create a new repository backed by the given pool.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a new account and return it.
    ///
    /// The unique index on `email` is the source of truth for duplicates;
    /// a violation surfaces as [`RepositoryError::Conflict`].
    ///
    /// # Errors
    ///
    /// Returns `Conflict` if the email is already registered.
    pub async fn create(
        &self,
        name: &str,
        email: &Email,
        password_hash: &str,
        role: Role,
    ) -> Result<User, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(
            "INSERT INTO users (name, email, password_hash, role)
             VALUES (?, ?, ?, ?)
             RETURNING id, name, email, password_hash, role, created_at",
        )
        .bind(name)
        .bind(email.as_str())
        .bind(password_hash)
        .bind(role)
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            if e.as_database_error()
                .is_some_and(sqlx::error::DatabaseError::is_unique_violation)
            {
                RepositoryError::Conflict("User already exists".to_owned())
            } else {
                RepositoryError::Database(e)
            }
        })?;

        row.try_into()
    }

    /// Look up an account by email (case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no account matches.
    pub async fn get_by_email(&self, email: &Email) -> Result<User, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT id, name, email, password_hash, role, created_at
             FROM users WHERE email = ?",
        )
        .bind(email.as_str())
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        row.try_into()
    }

    /// Look up an account by ID.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no account matches.
    pub async fn get_by_id(&self, id: UserId) -> Result<User, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT id, name, email, password_hash, role, created_at
             FROM users WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        row.try_into()
    }

    /// List all accounts, newest first.
    pub async fn list_all(&self) -> Result<Vec<User>, RepositoryError> {
        let rows = sqlx::query_as::<_, UserRow>(
            "SELECT id, name, email, password_hash, role, created_at
             FROM users ORDER BY id DESC",
        )
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    /// Delete an account.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the account does not exist, or `Conflict` if the
    /// account still has orders referencing it.
    pub async fn delete(&self, id: UserId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await
            .map_err(|e| {
                if e.as_database_error()
                    .is_some_and(sqlx::error::DatabaseError::is_foreign_key_violation)
                {
                    RepositoryError::Conflict(
                        "User has existing orders and cannot be deleted".to_owned(),
                    )
                } else {
                    RepositoryError::Database(e)
                }
            })?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
