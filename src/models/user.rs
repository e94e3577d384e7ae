//! Caller identity, token claims and the user directory

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Client,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Client => "client",
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("Unknown role '{0}'")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "client" => Ok(Role::Client),
            other => Err(UnknownRole(other.to_string())),
        }
    }
}

/// Claims carried by identity tokens
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Provider user id
    pub sub: String,
    pub email: String,
    #[serde(default)]
    pub role: Option<Role>,
    pub exp: i64,
    #[serde(default)]
    pub iat: Option<i64>,
    #[serde(default)]
    pub iss: Option<String>,
}

/// Verified caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub uid: String,
    pub email: String,
    pub role: Option<Role>,
}

impl Identity {
    pub fn is_admin(&self) -> bool {
        self.role == Some(Role::Admin)
    }

    pub fn require_admin(&self) -> Result<(), AppError> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(AppError::Authorization("Admin role required".to_string()))
        }
    }

    /// Owner-or-admin rule: may this caller act on behalf of `email`?
    pub fn can_act_for(&self, email: &str) -> bool {
        self.is_admin() || self.email.eq_ignore_ascii_case(email.trim())
    }
}

/// Locally mirrored provider user with its custom role claim
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DirectoryUser {
    pub uid: String,
    pub email: String,
    /// Custom role claim; `None` means the token decides
    pub role: Option<Role>,
    pub updated_at: DateTime<Utc>,
}

/// Raw `users` row
#[derive(Debug, FromRow)]
pub struct DirectoryUserRow {
    pub uid: String,
    pub email: String,
    pub role: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<DirectoryUserRow> for DirectoryUser {
    type Error = UnknownRole;

    fn try_from(row: DirectoryUserRow) -> Result<Self, Self::Error> {
        Ok(Self {
            uid: row.uid,
            email: row.email,
            role: row.role.as_deref().map(str::parse::<Role>).transpose()?,
            updated_at: row.updated_at,
        })
    }
}

/// Set role request
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct SetUserRole {
    pub role: Role,
}
