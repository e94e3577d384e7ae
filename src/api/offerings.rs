//! Public service list

use axum::{extract::State, Json};

use crate::{error::AppResult, models::ServiceOffering};

/// List bookable services
#[utoipa::path(
    get,
    path = "/services",
    tag = "services",
    responses(
        (status = 200, description = "Services", body = Vec<ServiceOffering>)
    )
)]
pub async fn list_services(State(state): State<crate::AppState>) -> AppResult<Json<Vec<ServiceOffering>>> {
    Ok(Json(state.services.offerings.list().await?))
}
