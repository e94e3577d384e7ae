//! Client bookings

use std::sync::Arc;

use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use crate::{
    booking::SlotCatalog,
    error::{AppError, AppResult},
    models::{
        appointment::{parse_date, CreateAppointment},
        Appointment, AppointmentFilter, AppointmentStatus, AuditAction, Identity, NewAppointment,
        NewAuditLogEntry, NewNotification, ResourceType,
    },
    repository::{
        appointments::AppointmentStore, barbers::BarberStore, notifications::NotificationStore,
        offerings::OfferingStore,
    },
    services::audit::AuditTrail,
};

#[derive(Clone)]
pub struct BookingService {
    appointments: Arc<dyn AppointmentStore>,
    barbers: Arc<dyn BarberStore>,
    offerings: Arc<dyn OfferingStore>,
    notifications: Arc<dyn NotificationStore>,
    catalog: Arc<SlotCatalog>,
    audit: AuditTrail,
}

impl BookingService {
    pub fn new(
        appointments: Arc<dyn AppointmentStore>,
        barbers: Arc<dyn BarberStore>,
        offerings: Arc<dyn OfferingStore>,
        notifications: Arc<dyn NotificationStore>,
        catalog: Arc<SlotCatalog>,
        audit: AuditTrail,
    ) -> Self {
        Self {
            appointments,
            barbers,
            offerings,
            notifications,
            catalog,
            audit,
        }
    }

    /// Book a slot for `caller` (or, for admins, on behalf of anyone)
    pub async fn create(&self, caller: &Identity, payload: CreateAppointment) -> AppResult<Appointment> {
        if !caller.can_act_for(&payload.client_email) {
            return Err(AppError::Authorization(
                "clientEmail must match the authenticated user".to_string(),
            ));
        }

        payload.validate()?;
        let date = parse_date(&payload.date)?;
        let time = self.catalog.slot(&payload.time)?;
        let barber_id = Uuid::parse_str(payload.barber_id.trim())
            .map_err(|_| AppError::Validation(format!("Invalid barberId '{}'", payload.barber_id)))?;

        let barber = match self.barbers.get(barber_id).await {
            Ok(barber) => barber,
            Err(AppError::NotFound(_)) => {
                return Err(AppError::Validation(format!("Unknown barber {}", barber_id)))
            }
            Err(e) => return Err(e),
        };
        if !barber.is_available {
            return Err(AppError::Validation(format!("{} is not taking bookings", barber.name)));
        }

        let service_name = match payload.service_name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => self.service_name(&payload.service_id).await?,
        };

        let data = NewAppointment {
            date,
            time,
            barber_id,
            service_id: payload.service_id.trim().to_string(),
            service_name,
            client_name: payload.client_name.trim().to_string(),
            client_email: payload.client_email.trim().to_string(),
            status: AppointmentStatus::Confirmed,
        };

        let appointment = self.appointments.insert_if_free(&data).await?.ok_or_else(|| {
            AppError::Conflict(format!("{} on {} is already booked", time, date))
        })?;

        tracing::info!(
            appointment_id = %appointment.id,
            %date,
            time = %time,
            barber_id = %barber_id,
            "Appointment booked"
        );

        if caller.is_admin() {
            self.audit
                .record(
                    NewAuditLogEntry::new(
                        caller,
                        AuditAction::Create,
                        ResourceType::Appointment,
                        appointment.id,
                        format!("{} {} {}", appointment.date, appointment.time, appointment.client_name),
                    )
                    .with_metadata(json!({
                        "clientEmail": appointment.client_email,
                        "barberId": appointment.barber_id,
                    })),
                )
                .await;
        }

        self.notify_booked(&appointment).await;
        Ok(appointment)
    }

    /// Appointment history: own appointments, any client's for admins, or
    /// everything when an admin gives no client
    pub async fn list_for(&self, caller: &Identity, user_id: Option<&str>) -> AppResult<Vec<Appointment>> {
        let filter = match user_id.map(str::trim).filter(|u| !u.is_empty()) {
            Some(email) if caller.can_act_for(email) => AppointmentFilter::client(email),
            Some(_) => {
                return Err(AppError::Authorization(
                    "Cannot read another client's appointments".to_string(),
                ))
            }
            None if caller.is_admin() => AppointmentFilter::default(),
            None => AppointmentFilter::client(&caller.email),
        };
        self.appointments.list(&filter).await
    }

    async fn service_name(&self, service_id: &str) -> AppResult<String> {
        let unknown = || AppError::Validation(format!("Unknown service {}", service_id));
        let id = Uuid::parse_str(service_id.trim()).map_err(|_| unknown())?;
        match self.offerings.get(id).await {
            Ok(offering) => Ok(offering.name),
            Err(AppError::NotFound(_)) => Err(unknown()),
            Err(e) => Err(e),
        }
    }

    async fn notify_booked(&self, appointment: &Appointment) {
        let notification = NewNotification {
            user_id: appointment.client_email.clone(),
            title: "Appointment confirmed".to_string(),
            message: format!(
                "Your {} is booked for {} at {}.",
                appointment.service_name, appointment.date, appointment.time
            ),
        };
        if let Err(e) = self.notifications.create(&notification).await {
            tracing::warn!(appointment_id = %appointment.id, "Failed to send booking notification: {}", e);
        }
    }
}
