//! Barbershop Server - booking and shop administration
//!
//! A Rust REST API server for a barbershop.

use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use axum::{
    routing::{delete, get, post, put},
    Router,
};
use sqlx::postgres::PgPoolOptions;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use barbershop_server::{
    api,
    config::{AppConfig, LoggingConfig},
    repository::Repository,
    services::Services,
    AppState,
};

fn init_tracing(logging: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("barbershop_server={},tower_http=debug", logging.level).into());

    let registry = tracing_subscriber::registry().with(filter);
    if logging.format == "json" {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("Failed to load configuration")?;

    init_tracing(&config.logging);

    tracing::info!("Starting Barbershop Server v{}", env!("CARGO_PKG_VERSION"));

    // Create database connection pool
    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .min_connections(config.database.min_connections)
        .connect(&config.database.url)
        .await
        .context("Failed to connect to database")?;

    tracing::info!("Connected to database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run database migrations")?;

    tracing::info!("Database migrations completed");

    let addr = SocketAddr::new(
        config.server.host.parse().context("Invalid host address")?,
        config.server.port,
    );

    // Create repository and services
    let repository = Repository::new(pool);
    let services = Services::new(repository, &config).context("Failed to create services")?;

    tracing::info!(
        slots = config.booking.slots.len(),
        utc_offset_minutes = config.booking.utc_offset_minutes,
        "Booking catalog loaded"
    );

    let state = AppState {
        services: Arc::new(services),
    };

    let app = create_router(state);

    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes
fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_v1 = Router::new()
        // Health check
        .route("/health", get(api::health::health_check))
        .route("/ready", get(api::health::readiness_check))
        // Availability
        .route("/slots", get(api::availability::list_slots))
        .route("/availability", get(api::availability::booked_slots))
        .route("/availability/slots", get(api::availability::resolve_day))
        // Bookings
        .route("/citas", post(api::citas::create_appointment))
        .route("/citas", get(api::citas::list_appointments))
        // Barbers and services
        .route("/barbers", get(api::barbers::list_barbers))
        .route("/barbers/:id", get(api::barbers::get_barber))
        .route("/services", get(api::offerings::list_services))
        // Notifications
        .route("/notifications", get(api::notifications::list_notifications))
        .route("/notifications/:id/read", put(api::notifications::mark_read))
        // Admin: slots and appointments
        .route("/admin/blocks", post(api::admin::block_slot))
        .route("/admin/blocks/:id", delete(api::admin::unblock_slot))
        .route("/admin/appointments", get(api::admin::list_appointments))
        .route("/admin/appointments/:id", delete(api::admin::delete_appointment))
        .route("/admin/appointments/:id/status", put(api::admin::update_appointment_status))
        .route("/admin/timeline", get(api::admin::timeline))
        // Admin: dashboard and CRM
        .route("/admin/dashboard", get(api::admin::dashboard))
        .route("/admin/clients", get(api::admin::list_clients))
        // Admin: barbers
        .route("/admin/barbers", post(api::admin::create_barber))
        .route("/admin/barbers/:id", put(api::admin::update_barber))
        .route("/admin/barbers/:id", delete(api::admin::delete_barber))
        .route("/admin/barbers/:id/availability", put(api::admin::set_barber_availability))
        // Admin: services
        .route("/admin/services", post(api::admin::create_service))
        .route("/admin/services/:id", put(api::admin::update_service))
        .route("/admin/services/:id", delete(api::admin::delete_service))
        // Admin: audit log and users
        .route("/admin/audit-logs", get(api::admin::list_audit_logs))
        .route("/admin/users", get(api::admin::list_users))
        .route("/admin/users/:uid/role", put(api::admin::set_user_role))
        .with_state(state);

    // OpenAPI documentation
    let openapi = api::openapi::create_openapi_router();

    Router::new()
        .nest("/api/v1", api_v1)
        .merge(openapi)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(cors),
        )
}
