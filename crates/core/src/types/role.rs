//! Access roles.

use serde::{Deserialize, Serialize};

/// Access class for a user account.
///
/// A closed enumeration: the authorization gate matches on this exhaustively
/// instead of comparing free-text role strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Full access to catalog management and admin endpoints.
    Admin,
    /// Regular customer account.
    #[default]
    User,
}

impl Role {
    /// The role's canonical lowercase name, as stored in the database.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::User => "user",
        }
    }

    /// Parse a role from its stored name.
    #[must_use]
    pub fn from_str_opt(s: &str) -> Option<Self> {
        match s {
            "admin" => Some(Self::Admin),
            "user" => Some(Self::User),
            _ => None,
        }
    }

    /// Coerce an untrusted role string, treating anything but "admin" as a
    /// regular user.
    #[must_use]
    pub fn coerce(s: &str) -> Self {
        if s == "admin" { Self::Admin } else { Self::User }
    }

    /// Whether this role grants admin privileges.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// SQLx support (with sqlite feature): stored as TEXT.
#[cfg(feature = "sqlite")]
impl sqlx::Type<sqlx::Sqlite> for Role {
    fn type_info() -> sqlx::sqlite::SqliteTypeInfo {
        <&str as sqlx::Type<sqlx::Sqlite>>::type_info()
    }

    fn compatible(ty: &sqlx::sqlite::SqliteTypeInfo) -> bool {
        <&str as sqlx::Type<sqlx::Sqlite>>::compatible(ty)
    }
}

#[cfg(feature = "sqlite")]
impl<'r> sqlx::Decode<'r, sqlx::Sqlite> for Role {
    fn decode(value: sqlx::sqlite::SqliteValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <&str as sqlx::Decode<sqlx::Sqlite>>::decode(value)?;
        Self::from_str_opt(s).ok_or_else(|| format!("unknown role: {s}").into())
    }
}

#[cfg(feature = "sqlite")]
impl<'q> sqlx::Encode<'q, sqlx::Sqlite> for Role {
    fn encode_by_ref(
        &self,
        buf: &mut Vec<sqlx::sqlite::SqliteArgumentValue<'q>>,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <&str as sqlx::Encode<'q, sqlx::Sqlite>>::encode_by_ref(&self.as_str(), buf)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_names() {
        assert_eq!(Role::from_str_opt("admin"), Some(Role::Admin));
        assert_eq!(Role::from_str_opt("user"), Some(Role::User));
        assert_eq!(Role::from_str_opt("superuser"), None);
    }

    #[test]
    fn test_coerce_defaults_to_user() {
        assert_eq!(Role::coerce("admin"), Role::Admin);
        assert_eq!(Role::coerce("superadmin"), Role::User);
        assert_eq!(Role::coerce(""), Role::User);
    }

    #[test]
    fn test_serde_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"admin\"");
        let role: Role = serde_json::from_str("\"user\"").unwrap();
        assert_eq!(role, Role::User);
    }
}
