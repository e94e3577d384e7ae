//! Audit log models (append-only)

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use super::user::Identity;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    Create,
    Update,
    Delete,
    StatusChange,
    Block,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ResourceType {
    Appointment,
    Service,
    Barber,
    User,
}

impl AuditAction {
    pub fn as_str(self) -> &'static str {
        match self {
            AuditAction::Create => "create",
            AuditAction::Update => "update",
            AuditAction::Delete => "delete",
            AuditAction::StatusChange => "status_change",
            AuditAction::Block => "block",
        }
    }
}

impl ResourceType {
    pub fn as_str(self) -> &'static str {
        match self {
            ResourceType::Appointment => "appointment",
            ResourceType::Service => "service",
            ResourceType::Barber => "barber",
            ResourceType::User => "user",
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("Unknown audit value '{0}'")]
pub struct UnknownAuditValue(pub String);

impl FromStr for AuditAction {
    type Err = UnknownAuditValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "create" => Ok(AuditAction::Create),
            "update" => Ok(AuditAction::Update),
            "delete" => Ok(AuditAction::Delete),
            "status_change" => Ok(AuditAction::StatusChange),
            "block" => Ok(AuditAction::Block),
            other => Err(UnknownAuditValue(other.to_string())),
        }
    }
}

impl FromStr for ResourceType {
    type Err = UnknownAuditValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "appointment" => Ok(ResourceType::Appointment),
            "service" => Ok(ResourceType::Service),
            "barber" => Ok(ResourceType::Barber),
            "user" => Ok(ResourceType::User),
            other => Err(UnknownAuditValue(other.to_string())),
        }
    }
}

impl TryFrom<String> for AuditAction {
    type Error = UnknownAuditValue;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl TryFrom<String> for ResourceType {
    type Error = UnknownAuditValue;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Stored audit entry; never updated or deleted
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuditLogEntry {
    pub id: Uuid,
    pub admin_email: String,
    #[sqlx(try_from = "String")]
    pub action: AuditAction,
    #[sqlx(try_from = "String")]
    pub resource_type: ResourceType,
    pub resource_id: String,
    pub resource_name: String,
    #[schema(value_type = Object)]
    pub metadata: Value,
    pub timestamp: DateTime<Utc>,
}

/// Audit entry to append
#[derive(Debug, Clone, PartialEq)]
pub struct NewAuditLogEntry {
    pub admin_email: String,
    pub action: AuditAction,
    pub resource_type: ResourceType,
    pub resource_id: String,
    pub resource_name: String,
    pub metadata: Value,
}

impl NewAuditLogEntry {
    pub fn new(
        admin: &Identity,
        action: AuditAction,
        resource_type: ResourceType,
        resource_id: impl ToString,
        resource_name: impl Into<String>,
    ) -> Self {
        Self {
            admin_email: admin.email.clone(),
            action,
            resource_type,
            resource_id: resource_id.to_string(),
            resource_name: resource_name.into(),
            metadata: Value::Null,
        }
    }

    pub fn with_metadata(mut self, metadata: Value) -> Self {
        self.metadata = metadata;
        self
    }
}

#[derive(Debug, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct AuditLogQuery {
    /// Maximum number of entries (default 100, max 500)
    pub limit: Option<i64>,
}
