//! Client booking endpoints

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::{
        appointment::{ClientAppointmentsQuery, CreateAppointment, CreatedAppointment},
        Appointment,
    },
};

use super::AuthenticatedUser;

/// Book a slot
#[utoipa::path(
    post,
    path = "/citas",
    tag = "citas",
    security(("bearer_auth" = [])),
    request_body = CreateAppointment,
    responses(
        (status = 201, description = "Appointment booked", body = CreatedAppointment),
        (status = 400, description = "Invalid input", body = crate::error::ErrorResponse),
        (status = 401, description = "Not authenticated", body = crate::error::ErrorResponse),
        (status = 403, description = "Booking for someone else", body = crate::error::ErrorResponse),
        (status = 409, description = "Slot already taken", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_appointment(
    State(state): State<crate::AppState>,
    AuthenticatedUser(caller): AuthenticatedUser,
    Json(payload): Json<CreateAppointment>,
) -> AppResult<(StatusCode, Json<CreatedAppointment>)> {
    let appointment = state.services.bookings.create(&caller, payload).await?;
    Ok((StatusCode::CREATED, Json(CreatedAppointment { id: appointment.id })))
}

/// Appointment history of a client
#[utoipa::path(
    get,
    path = "/citas",
    tag = "citas",
    security(("bearer_auth" = [])),
    params(ClientAppointmentsQuery),
    responses(
        (status = 200, description = "Appointments", body = Vec<Appointment>),
        (status = 401, description = "Not authenticated", body = crate::error::ErrorResponse),
        (status = 403, description = "Another client's history", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_appointments(
    State(state): State<crate::AppState>,
    AuthenticatedUser(caller): AuthenticatedUser,
    Query(query): Query<ClientAppointmentsQuery>,
) -> AppResult<Json<Vec<Appointment>>> {
    let appointments = state
        .services
        .bookings
        .list_for(&caller, query.user_id.as_deref())
        .await?;
    Ok(Json(appointments))
}
