//! Admin management of appointments and slot blocks

use std::sync::Arc;

use chrono::NaiveDate;
use serde_json::json;
use uuid::Uuid;

use super::audit::AuditTrail;
use crate::{
    booking::{availability::timeline, SlotCatalog, TimelineSlot},
    error::{AppError, AppResult},
    models::{
        appointment::{parse_date, BlockSlot, BLOCKED_CLIENT_NAME, BLOCKED_SERVICE_ID, BLOCKED_SERVICE_NAME},
        Appointment, AppointmentFilter, AppointmentStatus, AuditAction, Identity, NewAppointment,
        NewAuditLogEntry, ResourceType,
    },
    repository::{appointments::AppointmentStore, barbers::BarberStore},
};

#[derive(Clone)]
pub struct AppointmentsService {
    appointments: Arc<dyn AppointmentStore>,
    barbers: Arc<dyn BarberStore>,
    catalog: Arc<SlotCatalog>,
    audit: AuditTrail,
}

fn describe(appointment: &Appointment) -> String {
    format!(
        "{} {} {}",
        appointment.date, appointment.time, appointment.client_name
    )
}

impl AppointmentsService {
    pub fn new(
        appointments: Arc<dyn AppointmentStore>,
        barbers: Arc<dyn BarberStore>,
        catalog: Arc<SlotCatalog>,
        audit: AuditTrail,
    ) -> Self {
        Self {
            appointments,
            barbers,
            catalog,
            audit,
        }
    }

    pub async fn list(&self, caller: &Identity, filter: AppointmentFilter) -> AppResult<Vec<Appointment>> {
        caller.require_admin()?;
        self.appointments.list(&filter).await
    }

    /// Make a slot unbookable. Without a barber the block lands on the first
    /// barber by name.
    pub async fn block(&self, caller: &Identity, request: BlockSlot) -> AppResult<Appointment> {
        caller.require_admin()?;
        let date = parse_date(&request.date)?;
        let time = self.catalog.slot(&request.time)?;

        let barber_id = match request.barber_id {
            Some(id) => self.barbers.get(id).await?.id,
            None => self
                .barbers
                .list()
                .await?
                .into_iter()
                .next()
                .map(|b| b.id)
                .ok_or_else(|| AppError::NotFound("No barber to block a slot for".to_string()))?,
        };

        let data = NewAppointment {
            date,
            time,
            barber_id,
            service_id: BLOCKED_SERVICE_ID.to_string(),
            service_name: BLOCKED_SERVICE_NAME.to_string(),
            client_name: BLOCKED_CLIENT_NAME.to_string(),
            client_email: caller.email.clone(),
            status: AppointmentStatus::Blocked,
        };

        let blocked = self
            .appointments
            .insert_if_free(&data)
            .await?
            .ok_or_else(|| AppError::Conflict(format!("{} on {} is already taken", time, date)))?;

        tracing::info!(appointment_id = %blocked.id, %date, time = %time, %barber_id, "Slot blocked");
        self.audit
            .record(
                NewAuditLogEntry::new(caller, AuditAction::Block, ResourceType::Appointment, blocked.id, describe(&blocked))
                    .with_metadata(json!({
                        "date": blocked.date,
                        "time": blocked.time,
                        "barberId": blocked.barber_id,
                    })),
            )
            .await;
        Ok(blocked)
    }

    /// Lift a block by deleting it
    pub async fn unblock(&self, caller: &Identity, id: Uuid) -> AppResult<()> {
        caller.require_admin()?;
        let appointment = self.appointments.get(id).await?;
        if !appointment.is_blocked() {
            return Err(AppError::Validation(format!("Appointment {} is not a block", id)));
        }
        self.appointments.delete(id).await?;

        tracing::info!(appointment_id = %id, "Slot unblocked");
        self.audit
            .record(
                NewAuditLogEntry::new(caller, AuditAction::Delete, ResourceType::Appointment, id, describe(&appointment))
                    .with_metadata(json!({ "unblock": true })),
            )
            .await;
        Ok(())
    }

    /// Move a real appointment between confirmed, completed, cancelled and no-show
    pub async fn update_status(
        &self,
        caller: &Identity,
        id: Uuid,
        status: AppointmentStatus,
    ) -> AppResult<Appointment> {
        caller.require_admin()?;
        if status == AppointmentStatus::Blocked {
            return Err(AppError::Validation("Use the block endpoint to block a slot".to_string()));
        }
        let current = self.appointments.get(id).await?;
        if current.is_blocked() {
            return Err(AppError::Validation(format!(
                "Appointment {} is a block; delete it instead",
                id
            )));
        }

        let updated = self.appointments.update_status(id, status).await?;
        self.audit
            .record(
                NewAuditLogEntry::new(caller, AuditAction::StatusChange, ResourceType::Appointment, id, describe(&updated))
                    .with_metadata(json!({ "from": current.status, "to": updated.status })),
            )
            .await;
        Ok(updated)
    }

    pub async fn delete(&self, caller: &Identity, id: Uuid) -> AppResult<()> {
        caller.require_admin()?;
        let appointment = self.appointments.get(id).await?;
        self.appointments.delete(id).await?;
        self.audit
            .record(NewAuditLogEntry::new(
                caller,
                AuditAction::Delete,
                ResourceType::Appointment,
                id,
                describe(&appointment),
            ))
            .await;
        Ok(())
    }

    /// Every catalog slot of a day with the appointments on it
    pub async fn timeline(
        &self,
        caller: &Identity,
        date: NaiveDate,
        barber_id: Option<Uuid>,
    ) -> AppResult<Vec<TimelineSlot>> {
        caller.require_admin()?;
        let appointments = self.appointments.list(&AppointmentFilter::day(date, barber_id)).await?;
        Ok(timeline(&self.catalog, &appointments))
    }
}
