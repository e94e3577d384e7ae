//! Service offering model (what clients can book)

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ServiceOffering {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    /// Display duration, e.g. "45 min"
    pub duration: String,
    pub category: String,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn non_negative(price: &Decimal) -> Result<(), ValidationError> {
    if price.is_sign_negative() {
        return Err(ValidationError::new("negative_price"));
    }
    Ok(())
}

/// Create service request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateServiceOffering {
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[validate(custom(function = "non_negative"))]
    pub price: Decimal,
    #[validate(length(min = 1, message = "duration is required"))]
    pub duration: String,
    #[validate(length(min = 1, message = "category is required"))]
    pub category: String,
    #[validate(url(message = "Invalid imageUrl"))]
    pub image_url: Option<String>,
}

/// Update service request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateServiceOffering {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: Option<String>,
    pub description: Option<String>,
    #[validate(custom(function = "non_negative"))]
    pub price: Option<Decimal>,
    #[validate(length(min = 1, message = "duration must not be empty"))]
    pub duration: Option<String>,
    #[validate(length(min = 1, message = "category must not be empty"))]
    pub category: Option<String>,
    #[validate(url(message = "Invalid imageUrl"))]
    pub image_url: Option<String>,
}
