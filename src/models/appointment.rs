//! Appointment models (bookings and admin blocks)

use std::{fmt, str::FromStr};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::{booking::SlotTime, error::AppError};

/// Service id written on admin blocks
pub const BLOCKED_SERVICE_ID: &str = "blocked";
pub const BLOCKED_SERVICE_NAME: &str = "Blocked";
/// Client name written on admin blocks
pub const BLOCKED_CLIENT_NAME: &str = "Admin";

// ---------------------------------------------------------------------------
// AppointmentStatus
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum AppointmentStatus {
    Confirmed,
    Completed,
    Cancelled,
    NoShow,
    /// Admin-imposed unavailability, no real client
    Blocked,
}

impl AppointmentStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            AppointmentStatus::Confirmed => "confirmed",
            AppointmentStatus::Completed => "completed",
            AppointmentStatus::Cancelled => "cancelled",
            AppointmentStatus::NoShow => "no-show",
            AppointmentStatus::Blocked => "blocked",
        }
    }

    /// Whether an appointment in this status occupies its slot
    pub fn holds_slot(self) -> bool {
        matches!(
            self,
            AppointmentStatus::Confirmed | AppointmentStatus::Blocked | AppointmentStatus::Completed
        )
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("Unknown appointment status '{0}'")]
pub struct UnknownStatus(pub String);

impl FromStr for AppointmentStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "confirmed" => Ok(AppointmentStatus::Confirmed),
            "completed" => Ok(AppointmentStatus::Completed),
            "cancelled" => Ok(AppointmentStatus::Cancelled),
            "no-show" => Ok(AppointmentStatus::NoShow),
            "blocked" => Ok(AppointmentStatus::Blocked),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

impl TryFrom<String> for AppointmentStatus {
    type Error = UnknownStatus;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

// ---------------------------------------------------------------------------
// Appointment
// ---------------------------------------------------------------------------

/// A booked (or blocked) slot for one barber
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: Uuid,
    /// Calendar date (YYYY-MM-DD)
    pub date: NaiveDate,
    /// Slot label, e.g. "09:00 AM"
    #[sqlx(rename = "time_minutes", try_from = "i16")]
    #[schema(value_type = String, example = "09:00 AM")]
    pub time: SlotTime,
    pub barber_id: Uuid,
    pub service_id: String,
    pub service_name: String,
    pub client_name: String,
    /// Join key for client history and notifications
    pub client_email: String,
    #[sqlx(try_from = "String")]
    pub status: AppointmentStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Appointment {
    pub fn is_blocked(&self) -> bool {
        self.status == AppointmentStatus::Blocked
    }
}

/// Store input for a new appointment
#[derive(Debug, Clone, PartialEq)]
pub struct NewAppointment {
    pub date: NaiveDate,
    pub time: SlotTime,
    pub barber_id: Uuid,
    pub service_id: String,
    pub service_name: String,
    pub client_name: String,
    pub client_email: String,
    pub status: AppointmentStatus,
}

/// Equality filters over appointments; `None` matches everything
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppointmentFilter {
    pub date: Option<NaiveDate>,
    pub barber_id: Option<Uuid>,
    pub status: Option<AppointmentStatus>,
    pub client_email: Option<String>,
}

impl AppointmentFilter {
    pub fn day(date: NaiveDate, barber_id: Option<Uuid>) -> Self {
        Self {
            date: Some(date),
            barber_id,
            ..Default::default()
        }
    }

    pub fn client(email: &str) -> Self {
        Self {
            client_email: Some(email.to_string()),
            ..Default::default()
        }
    }

    pub fn matches(&self, appointment: &Appointment) -> bool {
        self.date.map_or(true, |d| appointment.date == d)
            && self.barber_id.map_or(true, |b| appointment.barber_id == b)
            && self.status.map_or(true, |s| appointment.status == s)
            && self
                .client_email
                .as_ref()
                .map_or(true, |e| appointment.client_email.eq_ignore_ascii_case(e))
    }
}

/// Parse a calendar date given as `YYYY-MM-DD`
pub fn parse_date(value: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| AppError::Validation(format!("Invalid date '{}', expected YYYY-MM-DD", value)))
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

/// Booking request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateAppointment {
    #[validate(length(min = 1, message = "barberId is required"))]
    pub barber_id: String,
    #[validate(length(min = 1, message = "serviceId is required"))]
    pub service_id: String,
    /// Looked up from the service list when omitted
    pub service_name: Option<String>,
    /// Date (YYYY-MM-DD)
    pub date: String,
    /// Slot label, e.g. "09:00 AM"
    pub time: String,
    #[validate(length(min = 1, message = "clientName is required"))]
    pub client_name: String,
    #[validate(email(message = "Invalid clientEmail"))]
    pub client_email: String,
}

/// Response to a successful booking
#[derive(Debug, Serialize, ToSchema)]
pub struct CreatedAppointment {
    pub id: Uuid,
}

/// Admin request to block a slot
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BlockSlot {
    /// Date (YYYY-MM-DD)
    pub date: String,
    /// Slot label
    pub time: String,
    /// Barber to block; the first barber by name when omitted
    pub barber_id: Option<Uuid>,
}

/// Admin status change request
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UpdateAppointmentStatus {
    pub status: AppointmentStatus,
}

/// Query parameters for client appointment history
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
#[serde(rename_all = "camelCase")]
pub struct ClientAppointmentsQuery {
    /// Client email; admins may omit it to list everything
    pub user_id: Option<String>,
}

/// Query parameters for the admin appointment list
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentQuery {
    /// Date (YYYY-MM-DD)
    pub date: Option<String>,
    pub barber_id: Option<Uuid>,
    pub status: Option<AppointmentStatus>,
}
