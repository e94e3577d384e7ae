//! Service catalogue management

use std::sync::Arc;

use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use super::audit::AuditTrail;
use crate::{
    error::AppResult,
    models::{
        offering::{CreateServiceOffering, UpdateServiceOffering},
        AuditAction, Identity, NewAuditLogEntry, ResourceType, ServiceOffering,
    },
    repository::offerings::OfferingStore,
};

#[derive(Clone)]
pub struct OfferingsService {
    store: Arc<dyn OfferingStore>,
    audit: AuditTrail,
}

impl OfferingsService {
    pub fn new(store: Arc<dyn OfferingStore>, audit: AuditTrail) -> Self {
        Self { store, audit }
    }

    pub async fn list(&self) -> AppResult<Vec<ServiceOffering>> {
        self.store.list().await
    }

    pub async fn create(&self, caller: &Identity, data: CreateServiceOffering) -> AppResult<ServiceOffering> {
        caller.require_admin()?;
        data.validate()?;
        let offering = self.store.create(&data).await?;
        self.audit
            .record(
                NewAuditLogEntry::new(caller, AuditAction::Create, ResourceType::Service, offering.id, &offering.name)
                    .with_metadata(json!({ "price": offering.price })),
            )
            .await;
        Ok(offering)
    }

    pub async fn update(&self, caller: &Identity, id: Uuid, data: UpdateServiceOffering) -> AppResult<ServiceOffering> {
        caller.require_admin()?;
        data.validate()?;
        let offering = self.store.update(id, &data).await?;
        self.audit
            .record(NewAuditLogEntry::new(caller, AuditAction::Update, ResourceType::Service, offering.id, &offering.name))
            .await;
        Ok(offering)
    }

    pub async fn delete(&self, caller: &Identity, id: Uuid) -> AppResult<()> {
        caller.require_admin()?;
        let offering = self.store.get(id).await?;
        self.store.delete(id).await?;
        self.audit
            .record(NewAuditLogEntry::new(caller, AuditAction::Delete, ResourceType::Service, id, offering.name))
            .await;
        Ok(())
    }
}
