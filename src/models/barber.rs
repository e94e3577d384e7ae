//! Barber model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Social handles shown on the barber card
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct BarberSocials {
    pub whatsapp: Option<String>,
    pub instagram: Option<String>,
    pub tiktok: Option<String>,
}

/// Barber record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Barber {
    pub id: Uuid,
    pub name: String,
    /// Job title, e.g. "Master Barber"
    pub role: String,
    pub image_url: Option<String>,
    #[sqlx(json)]
    pub portfolio_images: Vec<String>,
    #[sqlx(json)]
    pub socials: BarberSocials,
    /// Whether the barber currently takes bookings
    pub is_available: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create barber request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateBarber {
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    #[validate(length(min = 1, message = "role is required"))]
    pub role: String,
    #[validate(url(message = "Invalid imageUrl"))]
    pub image_url: Option<String>,
    #[serde(default)]
    pub portfolio_images: Vec<String>,
    #[serde(default)]
    pub socials: BarberSocials,
    #[serde(default = "default_available")]
    pub is_available: bool,
}

fn default_available() -> bool {
    true
}

/// Update barber request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBarber {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: Option<String>,
    #[validate(length(min = 1, message = "role must not be empty"))]
    pub role: Option<String>,
    #[validate(url(message = "Invalid imageUrl"))]
    pub image_url: Option<String>,
    pub portfolio_images: Option<Vec<String>>,
    pub socials: Option<BarberSocials>,
}

/// Availability toggle request
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SetBarberAvailability {
    pub is_available: bool,
}
