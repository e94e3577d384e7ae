//! Barbershop booking server
//!
//! REST JSON API for booking barber appointments, resolving slot
//! availability and running the shop's admin dashboard.

use std::sync::Arc;

use axum::extract::FromRef;

pub mod api;
pub mod booking;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub services: Arc<services::Services>,
}

impl FromRef<AppState> for Arc<dyn services::identity::IdentityProvider> {
    fn from_ref(state: &AppState) -> Self {
        state.services.identity.clone()
    }
}
