//! Admin endpoints (role `admin` required)

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::{
    booking::{ClientSummary, TimelineSlot},
    error::{AppError, AppResult},
    models::{
        appointment::{parse_date, AppointmentQuery, BlockSlot, UpdateAppointmentStatus},
        audit_log::{AuditLogEntry, AuditLogQuery},
        barber::{CreateBarber, SetBarberAvailability, UpdateBarber},
        offering::{CreateServiceOffering, UpdateServiceOffering},
        user::SetUserRole,
        Appointment, AppointmentFilter, Barber, DirectoryUser, ServiceOffering,
    },
    services::dashboard::DashboardSummary,
};

use super::AuthenticatedUser;

/// Day to look at, optionally for one barber
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
#[serde(rename_all = "camelCase")]
pub struct AdminDayQuery {
    /// Date (YYYY-MM-DD)
    pub date: Option<String>,
    pub barber_id: Option<Uuid>,
}

impl AdminDayQuery {
    fn date(&self) -> AppResult<chrono::NaiveDate> {
        let date = self
            .date
            .as_deref()
            .ok_or_else(|| AppError::BadRequest("date is required".to_string()))?;
        parse_date(date)
    }
}

// ---------------------------------------------------------------------------
// Blocks
// ---------------------------------------------------------------------------

/// Block a slot
#[utoipa::path(
    post,
    path = "/admin/blocks",
    tag = "admin",
    security(("bearer_auth" = [])),
    request_body = BlockSlot,
    responses(
        (status = 201, description = "Slot blocked", body = Appointment),
        (status = 403, description = "Admin role required", body = crate::error::ErrorResponse),
        (status = 404, description = "No barber to block", body = crate::error::ErrorResponse),
        (status = 409, description = "Slot already taken", body = crate::error::ErrorResponse)
    )
)]
pub async fn block_slot(
    State(state): State<crate::AppState>,
    AuthenticatedUser(caller): AuthenticatedUser,
    Json(request): Json<BlockSlot>,
) -> AppResult<(StatusCode, Json<Appointment>)> {
    let blocked = state.services.appointments.block(&caller, request).await?;
    Ok((StatusCode::CREATED, Json(blocked)))
}

/// Remove a block
#[utoipa::path(
    delete,
    path = "/admin/blocks/{id}",
    tag = "admin",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Blocked appointment ID")
    ),
    responses(
        (status = 204, description = "Block removed"),
        (status = 400, description = "Not a block", body = crate::error::ErrorResponse),
        (status = 404, description = "Appointment not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn unblock_slot(
    State(state): State<crate::AppState>,
    AuthenticatedUser(caller): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    state.services.appointments.unblock(&caller, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Appointments
// ---------------------------------------------------------------------------

/// List appointments
#[utoipa::path(
    get,
    path = "/admin/appointments",
    tag = "admin",
    security(("bearer_auth" = [])),
    params(AppointmentQuery),
    responses(
        (status = 200, description = "Appointments", body = Vec<Appointment>),
        (status = 403, description = "Admin role required", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_appointments(
    State(state): State<crate::AppState>,
    AuthenticatedUser(caller): AuthenticatedUser,
    Query(query): Query<AppointmentQuery>,
) -> AppResult<Json<Vec<Appointment>>> {
    let filter = AppointmentFilter {
        date: query.date.as_deref().map(parse_date).transpose()?,
        barber_id: query.barber_id,
        status: query.status,
        client_email: None,
    };
    Ok(Json(state.services.appointments.list(&caller, filter).await?))
}

/// Change an appointment's status
#[utoipa::path(
    put,
    path = "/admin/appointments/{id}/status",
    tag = "admin",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Appointment ID")
    ),
    request_body = UpdateAppointmentStatus,
    responses(
        (status = 200, description = "Appointment updated", body = Appointment),
        (status = 400, description = "Transition not allowed", body = crate::error::ErrorResponse),
        (status = 404, description = "Appointment not found", body = crate::error::ErrorResponse),
        (status = 409, description = "Slot held by another appointment", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_appointment_status(
    State(state): State<crate::AppState>,
    AuthenticatedUser(caller): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateAppointmentStatus>,
) -> AppResult<Json<Appointment>> {
    let updated = state
        .services
        .appointments
        .update_status(&caller, id, request.status)
        .await?;
    Ok(Json(updated))
}

/// Delete an appointment
#[utoipa::path(
    delete,
    path = "/admin/appointments/{id}",
    tag = "admin",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Appointment ID")
    ),
    responses(
        (status = 204, description = "Appointment deleted"),
        (status = 404, description = "Appointment not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_appointment(
    State(state): State<crate::AppState>,
    AuthenticatedUser(caller): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    state.services.appointments.delete(&caller, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Slots of a day with their appointments
#[utoipa::path(
    get,
    path = "/admin/timeline",
    tag = "admin",
    security(("bearer_auth" = [])),
    params(AdminDayQuery),
    responses(
        (status = 200, description = "Catalog slots in order", body = Vec<TimelineSlot>),
        (status = 400, description = "Missing or invalid date", body = crate::error::ErrorResponse)
    )
)]
pub async fn timeline(
    State(state): State<crate::AppState>,
    AuthenticatedUser(caller): AuthenticatedUser,
    Query(query): Query<AdminDayQuery>,
) -> AppResult<Json<Vec<TimelineSlot>>> {
    let date = query.date()?;
    let slots = state
        .services
        .appointments
        .timeline(&caller, date, query.barber_id)
        .await?;
    Ok(Json(slots))
}

// ---------------------------------------------------------------------------
// Dashboard and CRM
// ---------------------------------------------------------------------------

/// Revenue, bookings and clients against the previous day
#[utoipa::path(
    get,
    path = "/admin/dashboard",
    tag = "admin",
    security(("bearer_auth" = [])),
    params(AdminDayQuery),
    responses(
        (status = 200, description = "Dashboard figures", body = DashboardSummary),
        (status = 400, description = "Missing or invalid date", body = crate::error::ErrorResponse)
    )
)]
pub async fn dashboard(
    State(state): State<crate::AppState>,
    AuthenticatedUser(caller): AuthenticatedUser,
    Query(query): Query<AdminDayQuery>,
) -> AppResult<Json<DashboardSummary>> {
    let date = query.date()?;
    let summary = state
        .services
        .dashboard
        .summary(&caller, date, query.barber_id)
        .await?;
    Ok(Json(summary))
}

/// Clients aggregated from the appointment book
#[utoipa::path(
    get,
    path = "/admin/clients",
    tag = "admin",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Clients, most recent visit first", body = Vec<ClientSummary>)
    )
)]
pub async fn list_clients(
    State(state): State<crate::AppState>,
    AuthenticatedUser(caller): AuthenticatedUser,
) -> AppResult<Json<Vec<ClientSummary>>> {
    Ok(Json(state.services.dashboard.clients(&caller).await?))
}

// ---------------------------------------------------------------------------
// Barbers
// ---------------------------------------------------------------------------

/// Create a barber
#[utoipa::path(
    post,
    path = "/admin/barbers",
    tag = "admin",
    security(("bearer_auth" = [])),
    request_body = CreateBarber,
    responses(
        (status = 201, description = "Barber created", body = Barber),
        (status = 400, description = "Invalid input", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_barber(
    State(state): State<crate::AppState>,
    AuthenticatedUser(caller): AuthenticatedUser,
    Json(data): Json<CreateBarber>,
) -> AppResult<(StatusCode, Json<Barber>)> {
    let barber = state.services.barbers.create(&caller, data).await?;
    Ok((StatusCode::CREATED, Json(barber)))
}

/// Update a barber
#[utoipa::path(
    put,
    path = "/admin/barbers/{id}",
    tag = "admin",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Barber ID")
    ),
    request_body = UpdateBarber,
    responses(
        (status = 200, description = "Barber updated", body = Barber),
        (status = 404, description = "Barber not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_barber(
    State(state): State<crate::AppState>,
    AuthenticatedUser(caller): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(data): Json<UpdateBarber>,
) -> AppResult<Json<Barber>> {
    Ok(Json(state.services.barbers.update(&caller, id, data).await?))
}

/// Toggle whether a barber takes bookings
#[utoipa::path(
    put,
    path = "/admin/barbers/{id}/availability",
    tag = "admin",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Barber ID")
    ),
    request_body = SetBarberAvailability,
    responses(
        (status = 200, description = "Barber updated", body = Barber),
        (status = 404, description = "Barber not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn set_barber_availability(
    State(state): State<crate::AppState>,
    AuthenticatedUser(caller): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(request): Json<SetBarberAvailability>,
) -> AppResult<Json<Barber>> {
    let barber = state
        .services
        .barbers
        .set_availability(&caller, id, request.is_available)
        .await?;
    Ok(Json(barber))
}

/// Delete a barber
#[utoipa::path(
    delete,
    path = "/admin/barbers/{id}",
    tag = "admin",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Barber ID")
    ),
    responses(
        (status = 204, description = "Barber deleted"),
        (status = 404, description = "Barber not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_barber(
    State(state): State<crate::AppState>,
    AuthenticatedUser(caller): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    state.services.barbers.delete(&caller, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Services
// ---------------------------------------------------------------------------

/// Create a service
#[utoipa::path(
    post,
    path = "/admin/services",
    tag = "admin",
    security(("bearer_auth" = [])),
    request_body = CreateServiceOffering,
    responses(
        (status = 201, description = "Service created", body = ServiceOffering),
        (status = 400, description = "Invalid input", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_service(
    State(state): State<crate::AppState>,
    AuthenticatedUser(caller): AuthenticatedUser,
    Json(data): Json<CreateServiceOffering>,
) -> AppResult<(StatusCode, Json<ServiceOffering>)> {
    let offering = state.services.offerings.create(&caller, data).await?;
    Ok((StatusCode::CREATED, Json(offering)))
}

/// Update a service
#[utoipa::path(
    put,
    path = "/admin/services/{id}",
    tag = "admin",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Service ID")
    ),
    request_body = UpdateServiceOffering,
    responses(
        (status = 200, description = "Service updated", body = ServiceOffering),
        (status = 404, description = "Service not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_service(
    State(state): State<crate::AppState>,
    AuthenticatedUser(caller): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(data): Json<UpdateServiceOffering>,
) -> AppResult<Json<ServiceOffering>> {
    Ok(Json(state.services.offerings.update(&caller, id, data).await?))
}

/// Delete a service
#[utoipa::path(
    delete,
    path = "/admin/services/{id}",
    tag = "admin",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Service ID")
    ),
    responses(
        (status = 204, description = "Service deleted"),
        (status = 404, description = "Service not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_service(
    State(state): State<crate::AppState>,
    AuthenticatedUser(caller): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    state.services.offerings.delete(&caller, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Audit log and users
// ---------------------------------------------------------------------------

/// Recent admin actions
#[utoipa::path(
    get,
    path = "/admin/audit-logs",
    tag = "admin",
    security(("bearer_auth" = [])),
    params(AuditLogQuery),
    responses(
        (status = 200, description = "Audit entries, newest first", body = Vec<AuditLogEntry>)
    )
)]
pub async fn list_audit_logs(
    State(state): State<crate::AppState>,
    AuthenticatedUser(caller): AuthenticatedUser,
    Query(query): Query<AuditLogQuery>,
) -> AppResult<Json<Vec<AuditLogEntry>>> {
    Ok(Json(state.services.audit.list(&caller, query.limit).await?))
}

/// Directory users
#[utoipa::path(
    get,
    path = "/admin/users",
    tag = "admin",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Users", body = Vec<DirectoryUser>)
    )
)]
pub async fn list_users(
    State(state): State<crate::AppState>,
    AuthenticatedUser(caller): AuthenticatedUser,
) -> AppResult<Json<Vec<DirectoryUser>>> {
    Ok(Json(state.services.users.list(&caller).await?))
}

/// Set a user's role claim
#[utoipa::path(
    put,
    path = "/admin/users/{uid}/role",
    tag = "admin",
    security(("bearer_auth" = [])),
    params(
        ("uid" = String, Path, description = "Provider user ID")
    ),
    request_body = SetUserRole,
    responses(
        (status = 200, description = "Role updated", body = DirectoryUser),
        (status = 404, description = "User not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn set_user_role(
    State(state): State<crate::AppState>,
    AuthenticatedUser(caller): AuthenticatedUser,
    Path(uid): Path<String>,
    Json(request): Json<SetUserRole>,
) -> AppResult<Json<DirectoryUser>> {
    Ok(Json(state.services.users.set_role(&caller, &uid, request.role).await?))
}
