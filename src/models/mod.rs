//! Data models for the barbershop

pub mod appointment;
pub mod audit_log;
pub mod barber;
pub mod notification;
pub mod offering;
pub mod user;

// Re-export commonly used types
pub use appointment::{Appointment, AppointmentFilter, AppointmentStatus, NewAppointment};
pub use audit_log::{AuditAction, AuditLogEntry, NewAuditLogEntry, ResourceType};
pub use barber::{Barber, BarberSocials};
pub use notification::{NewNotification, Notification};
pub use offering::ServiceOffering;
pub use user::{DirectoryUser, Identity, Role};
