//! Slot catalog and availability endpoints (public)

use axum::{
    extract::{Query, State},
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::{
    booking::DayAvailability,
    error::{AppError, AppResult},
    models::appointment::parse_date,
};

/// Day and barber to look at
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityQuery {
    /// Date (YYYY-MM-DD)
    pub date: Option<String>,
    pub barber_id: Option<String>,
}

impl AvailabilityQuery {
    fn require(&self) -> AppResult<(NaiveDate, Uuid)> {
        let (Some(date), Some(barber_id)) = (self.date.as_deref(), self.barber_id.as_deref()) else {
            return Err(AppError::BadRequest("date and barberId are required".to_string()));
        };
        let barber_id = Uuid::parse_str(barber_id.trim())
            .map_err(|_| AppError::BadRequest(format!("Invalid barberId '{}'", barber_id)))?;
        Ok((parse_date(date)?, barber_id))
    }
}

/// Slot labels offered on a business day
#[utoipa::path(
    get,
    path = "/slots",
    tag = "availability",
    responses(
        (status = 200, description = "Ordered slot labels", body = Vec<String>)
    )
)]
pub async fn list_slots(State(state): State<crate::AppState>) -> Json<Vec<String>> {
    Json(state.services.availability.slot_labels())
}

/// Booked slot labels for a barber on a date
#[utoipa::path(
    get,
    path = "/availability",
    tag = "availability",
    params(AvailabilityQuery),
    responses(
        (status = 200, description = "Labels of taken slots", body = Vec<String>),
        (status = 400, description = "Missing or invalid parameter", body = crate::error::ErrorResponse),
        (status = 500, description = "Store unavailable", body = crate::error::ErrorResponse)
    )
)]
pub async fn booked_slots(
    State(state): State<crate::AppState>,
    Query(query): Query<AvailabilityQuery>,
) -> AppResult<Json<Vec<String>>> {
    let (date, barber_id) = query.require()?;
    let labels = state.services.availability.booked_labels(date, barber_id).await?;
    Ok(Json(labels))
}

/// Every slot of a barber's day with its bookability
#[utoipa::path(
    get,
    path = "/availability/slots",
    tag = "availability",
    params(AvailabilityQuery),
    responses(
        (status = 200, description = "Resolved day; `degraded` when appointments could not be read", body = DayAvailability),
        (status = 400, description = "Missing or invalid parameter", body = crate::error::ErrorResponse)
    )
)]
pub async fn resolve_day(
    State(state): State<crate::AppState>,
    Query(query): Query<AvailabilityQuery>,
) -> AppResult<Json<DayAvailability>> {
    let (date, barber_id) = query.require()?;
    Ok(Json(state.services.availability.resolve_day(date, barber_id).await))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_both_parameters() {
        let query = AvailabilityQuery {
            date: Some("2024-01-10".to_string()),
            barber_id: None,
        };
        assert!(matches!(query.require(), Err(AppError::BadRequest(_))));

        let query = AvailabilityQuery {
            date: Some("2024-01-10".to_string()),
            barber_id: Some(Uuid::nil().to_string()),
        };
        let (date, barber_id) = query.require().unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2024, 1, 10).unwrap());
        assert_eq!(barber_id, Uuid::nil());

        let query = AvailabilityQuery {
            date: Some("tomorrow".to_string()),
            barber_id: Some(Uuid::nil().to_string()),
        };
        assert!(matches!(query.require(), Err(AppError::Validation(_))));
    }
}
