//! Audit log repository (append-only)

use async_trait::async_trait;
use chrono::Utc;
use mockall::automock;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::audit_log::{AuditLogEntry, NewAuditLogEntry},
};

#[automock]
#[async_trait]
pub trait AuditStore: Send + Sync {
    async fn append(&self, entry: &NewAuditLogEntry) -> AppResult<AuditLogEntry>;

    /// Most recent entries first
    async fn list(&self, limit: i64) -> AppResult<Vec<AuditLogEntry>>;
}

#[derive(Clone)]
pub struct AuditLogsRepository {
    pool: Pool<Postgres>,
}

impl AuditLogsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuditStore for AuditLogsRepository {
    async fn append(&self, entry: &NewAuditLogEntry) -> AppResult<AuditLogEntry> {
        let row = sqlx::query_as::<_, AuditLogEntry>(
            r#"
            INSERT INTO audit_logs (
                id, admin_email, action, resource_type, resource_id, resource_name, metadata, timestamp
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&entry.admin_email)
        .bind(entry.action.as_str())
        .bind(entry.resource_type.as_str())
        .bind(&entry.resource_id)
        .bind(&entry.resource_name)
        .bind(&entry.metadata)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn list(&self, limit: i64) -> AppResult<Vec<AuditLogEntry>> {
        let rows = sqlx::query_as::<_, AuditLogEntry>(
            "SELECT * FROM audit_logs ORDER BY timestamp DESC LIMIT $1",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
