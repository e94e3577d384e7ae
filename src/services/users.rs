//! Admin view of the user directory

use std::sync::Arc;

use serde_json::json;

use super::{audit::AuditTrail, identity::IdentityProvider};
use crate::{
    error::AppResult,
    models::{AuditAction, DirectoryUser, Identity, NewAuditLogEntry, ResourceType, Role},
};

#[derive(Clone)]
pub struct UsersService {
    identity: Arc<dyn IdentityProvider>,
    audit: AuditTrail,
}

impl UsersService {
    pub fn new(identity: Arc<dyn IdentityProvider>, audit: AuditTrail) -> Self {
        Self { identity, audit }
    }

    pub async fn list(&self, caller: &Identity) -> AppResult<Vec<DirectoryUser>> {
        caller.require_admin()?;
        self.identity.list_users().await
    }

    pub async fn set_role(&self, caller: &Identity, uid: &str, role: Role) -> AppResult<DirectoryUser> {
        caller.require_admin()?;
        let user = self.identity.set_role(uid, role).await?;
        tracing::info!(uid, role = role.as_str(), "User role changed");
        self.audit
            .record(
                NewAuditLogEntry::new(caller, AuditAction::Update, ResourceType::User, &user.uid, &user.email)
                    .with_metadata(json!({ "role": role })),
            )
            .await;
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::{
        error::AppError,
        services::{
            identity::MockIdentityProvider,
            test_support::{admin, client, MemoryStore},
        },
    };

    #[tokio::test]
    async fn test_set_role_is_audited() {
        let mut identity = MockIdentityProvider::new();
        identity
            .expect_set_role()
            .withf(|uid, role| uid == "uid-7" && *role == Role::Admin)
            .times(1)
            .returning(|uid, role| {
                Ok(DirectoryUser {
                    uid: uid.to_string(),
                    email: "leo@example.com".to_string(),
                    role: Some(role),
                    updated_at: Utc::now(),
                })
            });
        let store = MemoryStore::new();
        let service = UsersService::new(Arc::new(identity), AuditTrail::new(store.stores().audit_logs));

        let user = service.set_role(&admin(), "uid-7", Role::Admin).await.unwrap();
        assert_eq!(user.role, Some(Role::Admin));

        let entries = store.audit_entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].resource_type, ResourceType::User);
        assert_eq!(entries[0].metadata["role"], "admin");
    }

    #[tokio::test]
    async fn test_clients_cannot_change_roles() {
        let mut identity = MockIdentityProvider::new();
        identity.expect_set_role().times(0);
        let store = MemoryStore::new();
        let service = UsersService::new(Arc::new(identity), AuditTrail::new(store.stores().audit_logs));

        let result = service.set_role(&client("ana@example.com"), "uid-7", Role::Admin).await;
        assert!(matches!(result, Err(AppError::Authorization(_))));
    }
}
