//! Audit trail for admin mutations

use std::sync::Arc;

use crate::{
    error::AppResult,
    models::{audit_log::AuditLogEntry, Identity, NewAuditLogEntry},
    repository::audit_logs::AuditStore,
};

const DEFAULT_LIMIT: i64 = 100;
const MAX_LIMIT: i64 = 500;

#[derive(Clone)]
pub struct AuditTrail {
    store: Arc<dyn AuditStore>,
}

impl AuditTrail {
    pub fn new(store: Arc<dyn AuditStore>) -> Self {
        Self { store }
    }

    /// Append an entry. The mutation it describes has already happened, so a
    /// failing store is only logged.
    pub async fn record(&self, entry: NewAuditLogEntry) {
        if let Err(e) = self.store.append(&entry).await {
            tracing::warn!(
                action = entry.action.as_str(),
                resource_type = entry.resource_type.as_str(),
                resource_id = %entry.resource_id,
                admin = %entry.admin_email,
                "Failed to write audit log entry: {}",
                e
            );
        }
    }

    /// Most recent entries first
    pub async fn list(&self, caller: &Identity, limit: Option<i64>) -> AppResult<Vec<AuditLogEntry>> {
        caller.require_admin()?;
        let limit = limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
        self.store.list(limit).await
    }
}
