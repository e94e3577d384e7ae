//! In-memory stores for service tests

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use super::Stores;
use crate::{
    error::{AppError, AppResult},
    models::{
        audit_log::AuditLogEntry,
        barber::{CreateBarber, UpdateBarber},
        offering::{CreateServiceOffering, UpdateServiceOffering},
        Appointment, AppointmentFilter, AppointmentStatus, Barber, BarberSocials, DirectoryUser,
        Identity, NewAppointment, NewAuditLogEntry, NewNotification, Notification, Role,
        ServiceOffering,
    },
    repository::{
        appointments::AppointmentStore, audit_logs::AuditStore, barbers::BarberStore,
        notifications::NotificationStore, offerings::OfferingStore, users::UserDirectory,
    },
};

#[derive(Default)]
pub struct MemoryStore {
    pub appointments: Mutex<Vec<Appointment>>,
    pub barbers: Mutex<Vec<Barber>>,
    pub offerings: Mutex<Vec<ServiceOffering>>,
    pub notifications: Mutex<Vec<Notification>>,
    pub audit: Mutex<Vec<AuditLogEntry>>,
    pub users: Mutex<Vec<DirectoryUser>>,
}

impl MemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn stores(self: &Arc<Self>) -> Stores {
        Stores {
            appointments: self.clone(),
            barbers: self.clone(),
            offerings: self.clone(),
            notifications: self.clone(),
            audit_logs: self.clone(),
            users: self.clone(),
        }
    }

    pub fn add_barber(&self, name: &str) -> Barber {
        let barber = Barber {
            id: Uuid::new_v4(),
            name: name.to_string(),
            role: "Barber".to_string(),
            image_url: None,
            portfolio_images: Vec::new(),
            socials: BarberSocials::default(),
            is_available: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        self.barbers.lock().unwrap().push(barber.clone());
        barber
    }

    pub fn add_offering(&self, name: &str, price: i64) -> ServiceOffering {
        let offering = ServiceOffering {
            id: Uuid::new_v4(),
            name: name.to_string(),
            description: String::new(),
            price: Decimal::new(price, 0),
            duration: "30 min".to_string(),
            category: "Hair".to_string(),
            image_url: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        self.offerings.lock().unwrap().push(offering.clone());
        offering
    }

    pub fn add_appointment(
        &self,
        date: NaiveDate,
        time: &str,
        barber_id: Uuid,
        service_id: &str,
        client_email: &str,
        status: AppointmentStatus,
    ) -> Appointment {
        let appointment = Appointment {
            id: Uuid::new_v4(),
            date,
            time: time.parse().unwrap(),
            barber_id,
            service_id: service_id.to_string(),
            service_name: "Service".to_string(),
            client_name: "Client".to_string(),
            client_email: client_email.to_string(),
            status,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        self.appointments.lock().unwrap().push(appointment.clone());
        appointment
    }

    pub fn appointment_count(&self) -> usize {
        self.appointments.lock().unwrap().len()
    }

    pub fn audit_entries(&self) -> Vec<AuditLogEntry> {
        self.audit.lock().unwrap().clone()
    }
}

pub fn admin() -> Identity {
    Identity {
        uid: "admin-uid".to_string(),
        email: "admin@example.com".to_string(),
        role: Some(Role::Admin),
    }
}

pub fn client(email: &str) -> Identity {
    Identity {
        uid: format!("uid-{}", email),
        email: email.to_string(),
        role: Some(Role::Client),
    }
}

fn not_found(kind: &str, id: impl std::fmt::Display) -> AppError {
    AppError::NotFound(format!("{} {} not found", kind, id))
}

#[async_trait]
impl AppointmentStore for MemoryStore {
    async fn list(&self, filter: &AppointmentFilter) -> AppResult<Vec<Appointment>> {
        let mut rows: Vec<Appointment> = self
            .appointments
            .lock()
            .unwrap()
            .iter()
            .filter(|a| filter.matches(a))
            .cloned()
            .collect();
        rows.sort_by_key(|a| (a.date, a.time, a.created_at));
        Ok(rows)
    }

    async fn get(&self, id: Uuid) -> AppResult<Appointment> {
        self.appointments
            .lock()
            .unwrap()
            .iter()
            .find(|a| a.id == id)
            .cloned()
            .ok_or_else(|| not_found("Appointment", id))
    }

    async fn insert_if_free(&self, data: &NewAppointment) -> AppResult<Option<Appointment>> {
        let mut rows = self.appointments.lock().unwrap();
        let taken = rows.iter().any(|a| {
            a.date == data.date && a.barber_id == data.barber_id && a.time == data.time && a.status.holds_slot()
        });
        if taken {
            return Ok(None);
        }
        let now = Utc::now();
        let appointment = Appointment {
            id: Uuid::new_v4(),
            date: data.date,
            time: data.time,
            barber_id: data.barber_id,
            service_id: data.service_id.clone(),
            service_name: data.service_name.clone(),
            client_name: data.client_name.clone(),
            client_email: data.client_email.clone(),
            status: data.status,
            created_at: now,
            updated_at: now,
        };
        rows.push(appointment.clone());
        Ok(Some(appointment))
    }

    async fn update_status(&self, id: Uuid, status: AppointmentStatus) -> AppResult<Appointment> {
        let mut rows = self.appointments.lock().unwrap();
        let current = rows.iter().find(|a| a.id == id).cloned().ok_or_else(|| not_found("Appointment", id))?;
        let clash = status.holds_slot()
            && rows.iter().any(|a| {
                a.id != id
                    && a.date == current.date
                    && a.barber_id == current.barber_id
                    && a.time == current.time
                    && a.status.holds_slot()
            });
        if clash {
            return Err(AppError::Conflict("slot already held".to_string()));
        }
        let row = rows.iter_mut().find(|a| a.id == id).ok_or_else(|| not_found("Appointment", id))?;
        row.status = status;
        row.updated_at = Utc::now();
        Ok(row.clone())
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let mut rows = self.appointments.lock().unwrap();
        let before = rows.len();
        rows.retain(|a| a.id != id);
        if rows.len() == before {
            return Err(not_found("Appointment", id));
        }
        Ok(())
    }
}

#[async_trait]
impl BarberStore for MemoryStore {
    async fn list(&self) -> AppResult<Vec<Barber>> {
        let mut rows = self.barbers.lock().unwrap().clone();
        rows.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(rows)
    }

    async fn get(&self, id: Uuid) -> AppResult<Barber> {
        self.barbers
            .lock()
            .unwrap()
            .iter()
            .find(|b| b.id == id)
            .cloned()
            .ok_or_else(|| not_found("Barber", id))
    }

    async fn create(&self, data: &CreateBarber) -> AppResult<Barber> {
        let barber = Barber {
            id: Uuid::new_v4(),
            name: data.name.clone(),
            role: data.role.clone(),
            image_url: data.image_url.clone(),
            portfolio_images: data.portfolio_images.clone(),
            socials: data.socials.clone(),
            is_available: data.is_available,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        self.barbers.lock().unwrap().push(barber.clone());
        Ok(barber)
    }

    async fn update(&self, id: Uuid, data: &UpdateBarber) -> AppResult<Barber> {
        let mut rows = self.barbers.lock().unwrap();
        let row = rows.iter_mut().find(|b| b.id == id).ok_or_else(|| not_found("Barber", id))?;
        if let Some(ref name) = data.name { row.name = name.clone(); }
        if let Some(ref role) = data.role { row.role = role.clone(); }
        if let Some(ref image_url) = data.image_url { row.image_url = Some(image_url.clone()); }
        if let Some(ref images) = data.portfolio_images { row.portfolio_images = images.clone(); }
        if let Some(ref socials) = data.socials { row.socials = socials.clone(); }
        row.updated_at = Utc::now();
        Ok(row.clone())
    }

    async fn set_availability(&self, id: Uuid, is_available: bool) -> AppResult<Barber> {
        let mut rows = self.barbers.lock().unwrap();
        let row = rows.iter_mut().find(|b| b.id == id).ok_or_else(|| not_found("Barber", id))?;
        row.is_available = is_available;
        Ok(row.clone())
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let mut rows = self.barbers.lock().unwrap();
        let before = rows.len();
        rows.retain(|b| b.id != id);
        if rows.len() == before {
            return Err(not_found("Barber", id));
        }
        Ok(())
    }
}

#[async_trait]
impl OfferingStore for MemoryStore {
    async fn list(&self) -> AppResult<Vec<ServiceOffering>> {
        Ok(self.offerings.lock().unwrap().clone())
    }

    async fn get(&self, id: Uuid) -> AppResult<ServiceOffering> {
        self.offerings
            .lock()
            .unwrap()
            .iter()
            .find(|o| o.id == id)
            .cloned()
            .ok_or_else(|| not_found("Service", id))
    }

    async fn create(&self, data: &CreateServiceOffering) -> AppResult<ServiceOffering> {
        let offering = ServiceOffering {
            id: Uuid::new_v4(),
            name: data.name.clone(),
            description: data.description.clone(),
            price: data.price,
            duration: data.duration.clone(),
            category: data.category.clone(),
            image_url: data.image_url.clone(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        self.offerings.lock().unwrap().push(offering.clone());
        Ok(offering)
    }

    async fn update(&self, id: Uuid, data: &UpdateServiceOffering) -> AppResult<ServiceOffering> {
        let mut rows = self.offerings.lock().unwrap();
        let row = rows.iter_mut().find(|o| o.id == id).ok_or_else(|| not_found("Service", id))?;
        if let Some(ref name) = data.name { row.name = name.clone(); }
        if let Some(price) = data.price { row.price = price; }
        row.updated_at = Utc::now();
        Ok(row.clone())
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let mut rows = self.offerings.lock().unwrap();
        let before = rows.len();
        rows.retain(|o| o.id != id);
        if rows.len() == before {
            return Err(not_found("Service", id));
        }
        Ok(())
    }
}

#[async_trait]
impl NotificationStore for MemoryStore {
    async fn create(&self, data: &NewNotification) -> AppResult<Notification> {
        let notification = Notification {
            id: Uuid::new_v4(),
            user_id: data.user_id.clone(),
            title: data.title.clone(),
            message: data.message.clone(),
            is_read: false,
            created_at: Utc::now(),
        };
        self.notifications.lock().unwrap().push(notification.clone());
        Ok(notification)
    }

    async fn list_for_user(&self, user_id: &str) -> AppResult<Vec<Notification>> {
        Ok(self
            .notifications
            .lock()
            .unwrap()
            .iter()
            .rev()
            .filter(|n| n.user_id.eq_ignore_ascii_case(user_id))
            .cloned()
            .collect())
    }

    async fn get(&self, id: Uuid) -> AppResult<Notification> {
        self.notifications
            .lock()
            .unwrap()
            .iter()
            .find(|n| n.id == id)
            .cloned()
            .ok_or_else(|| not_found("Notification", id))
    }

    async fn mark_read(&self, id: Uuid) -> AppResult<Notification> {
        let mut rows = self.notifications.lock().unwrap();
        let row = rows.iter_mut().find(|n| n.id == id).ok_or_else(|| not_found("Notification", id))?;
        row.is_read = true;
        Ok(row.clone())
    }
}

#[async_trait]
impl AuditStore for MemoryStore {
    async fn append(&self, entry: &NewAuditLogEntry) -> AppResult<AuditLogEntry> {
        let stored = AuditLogEntry {
            id: Uuid::new_v4(),
            admin_email: entry.admin_email.clone(),
            action: entry.action,
            resource_type: entry.resource_type,
            resource_id: entry.resource_id.clone(),
            resource_name: entry.resource_name.clone(),
            metadata: entry.metadata.clone(),
            timestamp: Utc::now(),
        };
        self.audit.lock().unwrap().push(stored.clone());
        Ok(stored)
    }

    async fn list(&self, limit: i64) -> AppResult<Vec<AuditLogEntry>> {
        Ok(self
            .audit
            .lock()
            .unwrap()
            .iter()
            .rev()
            .take(limit as usize)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl UserDirectory for MemoryStore {
    async fn touch(&self, uid: &str, email: &str) -> AppResult<DirectoryUser> {
        let mut rows = self.users.lock().unwrap();
        if let Some(row) = rows.iter_mut().find(|u| u.uid == uid) {
            row.email = email.to_string();
            return Ok(row.clone());
        }
        let user = DirectoryUser {
            uid: uid.to_string(),
            email: email.to_string(),
            role: None,
            updated_at: Utc::now(),
        };
        rows.push(user.clone());
        Ok(user)
    }

    async fn set_role(&self, uid: &str, role: Role) -> AppResult<DirectoryUser> {
        let mut rows = self.users.lock().unwrap();
        let row = rows.iter_mut().find(|u| u.uid == uid).ok_or_else(|| not_found("User", uid))?;
        row.role = Some(role);
        row.updated_at = Utc::now();
        Ok(row.clone())
    }

    async fn list(&self) -> AppResult<Vec<DirectoryUser>> {
        Ok(self.users.lock().unwrap().clone())
    }
}
