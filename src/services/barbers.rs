//! Barber management

use std::sync::Arc;

use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use super::audit::AuditTrail;
use crate::{
    error::AppResult,
    models::{
        barber::{CreateBarber, UpdateBarber},
        AuditAction, Barber, Identity, NewAuditLogEntry, ResourceType,
    },
    repository::barbers::BarberStore,
};

#[derive(Clone)]
pub struct BarbersService {
    store: Arc<dyn BarberStore>,
    audit: AuditTrail,
}

impl BarbersService {
    pub fn new(store: Arc<dyn BarberStore>, audit: AuditTrail) -> Self {
        Self { store, audit }
    }

    pub async fn list(&self) -> AppResult<Vec<Barber>> {
        self.store.list().await
    }

    pub async fn get(&self, id: Uuid) -> AppResult<Barber> {
        self.store.get(id).await
    }

    pub async fn create(&self, caller: &Identity, data: CreateBarber) -> AppResult<Barber> {
        caller.require_admin()?;
        data.validate()?;
        let barber = self.store.create(&data).await?;
        self.audit
            .record(NewAuditLogEntry::new(caller, AuditAction::Create, ResourceType::Barber, barber.id, &barber.name))
            .await;
        Ok(barber)
    }

    pub async fn update(&self, caller: &Identity, id: Uuid, data: UpdateBarber) -> AppResult<Barber> {
        caller.require_admin()?;
        data.validate()?;
        let barber = self.store.update(id, &data).await?;
        self.audit
            .record(NewAuditLogEntry::new(caller, AuditAction::Update, ResourceType::Barber, barber.id, &barber.name))
            .await;
        Ok(barber)
    }

    /// Toggle whether the barber takes new bookings
    pub async fn set_availability(&self, caller: &Identity, id: Uuid, is_available: bool) -> AppResult<Barber> {
        caller.require_admin()?;
        let barber = self.store.set_availability(id, is_available).await?;
        self.audit
            .record(
                NewAuditLogEntry::new(caller, AuditAction::Update, ResourceType::Barber, barber.id, &barber.name)
                    .with_metadata(json!({ "isAvailable": is_available })),
            )
            .await;
        Ok(barber)
    }

    pub async fn delete(&self, caller: &Identity, id: Uuid) -> AppResult<()> {
        caller.require_admin()?;
        let barber = self.store.get(id).await?;
        self.store.delete(id).await?;
        self.audit
            .record(NewAuditLogEntry::new(caller, AuditAction::Delete, ResourceType::Barber, id, barber.name))
            .await;
        Ok(())
    }
}
