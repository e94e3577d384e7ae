//! OpenAPI documentation

use axum::Router;
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{admin, availability, barbers, citas, health, notifications, offerings};

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Barbershop API",
        version = "1.0.0",
        description = "Booking, availability and shop administration REST API"
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    modifiers(&BearerAuth),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Availability
        availability::list_slots,
        availability::booked_slots,
        availability::resolve_day,
        // Bookings
        citas::create_appointment,
        citas::list_appointments,
        // Catalogue
        barbers::list_barbers,
        barbers::get_barber,
        offerings::list_services,
        // Notifications
        notifications::list_notifications,
        notifications::mark_read,
        // Admin
        admin::block_slot,
        admin::unblock_slot,
        admin::list_appointments,
        admin::update_appointment_status,
        admin::delete_appointment,
        admin::timeline,
        admin::dashboard,
        admin::list_clients,
        admin::create_barber,
        admin::update_barber,
        admin::set_barber_availability,
        admin::delete_barber,
        admin::create_service,
        admin::update_service,
        admin::delete_service,
        admin::list_audit_logs,
        admin::list_users,
        admin::set_user_role,
    ),
    components(
        schemas(
            // Appointments
            crate::models::Appointment,
            crate::models::AppointmentStatus,
            crate::models::appointment::CreateAppointment,
            crate::models::appointment::CreatedAppointment,
            crate::models::appointment::BlockSlot,
            crate::models::appointment::UpdateAppointmentStatus,
            // Availability
            crate::booking::DayAvailability,
            crate::booking::SlotAvailability,
            crate::booking::UnavailableReason,
            crate::booking::TimelineSlot,
            // Barbers and services
            crate::models::Barber,
            crate::models::BarberSocials,
            crate::models::barber::CreateBarber,
            crate::models::barber::UpdateBarber,
            crate::models::barber::SetBarberAvailability,
            crate::models::ServiceOffering,
            crate::models::offering::CreateServiceOffering,
            crate::models::offering::UpdateServiceOffering,
            // Notifications
            crate::models::Notification,
            // Dashboard
            crate::services::dashboard::DashboardSummary,
            crate::booking::Comparison,
            crate::booking::DayFigures,
            crate::booking::Trends,
            crate::booking::ClientSummary,
            // Audit and users
            crate::models::AuditLogEntry,
            crate::models::AuditAction,
            crate::models::ResourceType,
            crate::models::DirectoryUser,
            crate::models::Role,
            crate::models::user::SetUserRole,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "availability", description = "Slot catalog and availability"),
        (name = "citas", description = "Client bookings"),
        (name = "barbers", description = "Barbers"),
        (name = "services", description = "Bookable services"),
        (name = "notifications", description = "Client notifications"),
        (name = "admin", description = "Shop administration")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
