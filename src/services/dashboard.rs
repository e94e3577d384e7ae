//! Admin dashboard figures and CRM view

use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    booking::{
        dashboard::{aggregate, client_summaries, compare},
        ClientSummary, Comparison, PriceTable,
    },
    error::AppResult,
    models::{Appointment, AppointmentFilter, Identity},
    repository::{appointments::AppointmentStore, offerings::OfferingStore},
};

/// Day-over-day figures for the shop, optionally narrowed to one barber
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub date: NaiveDate,
    #[serde(flatten)]
    pub shop: Comparison,
    /// Same figures restricted to the requested barber
    pub barber: Option<Comparison>,
    /// Set when the figures could not be computed and are all zero
    pub degraded: bool,
}

#[derive(Clone)]
pub struct DashboardService {
    appointments: Arc<dyn AppointmentStore>,
    offerings: Arc<dyn OfferingStore>,
}

impl DashboardService {
    pub fn new(appointments: Arc<dyn AppointmentStore>, offerings: Arc<dyn OfferingStore>) -> Self {
        Self {
            appointments,
            offerings,
        }
    }

    async fn price_table(&self) -> AppResult<PriceTable> {
        let offerings = self.offerings.list().await?;
        Ok(PriceTable::from_offerings(&offerings))
    }

    async fn day(&self, date: NaiveDate) -> AppResult<Vec<Appointment>> {
        self.appointments.list(&AppointmentFilter::day(date, None)).await
    }

    async fn figures(
        &self,
        date: NaiveDate,
        barber_id: Option<Uuid>,
    ) -> AppResult<(Comparison, Option<Comparison>)> {
        let prices = self.price_table().await?;
        let current = self.day(date).await?;
        let previous = match date.pred_opt() {
            Some(yesterday) => self.day(yesterday).await?,
            None => Vec::new(),
        };

        let shop = compare(aggregate(&current, &prices), aggregate(&previous, &prices));
        let barber = barber_id.map(|id| {
            let mine = |a: &&Appointment| a.barber_id == id;
            compare(
                aggregate(current.iter().filter(mine), &prices),
                aggregate(previous.iter().filter(mine), &prices),
            )
        });
        Ok((shop, barber))
    }

    /// Figures for `date` against the day before
    pub async fn summary(
        &self,
        caller: &Identity,
        date: NaiveDate,
        barber_id: Option<Uuid>,
    ) -> AppResult<DashboardSummary> {
        caller.require_admin()?;

        let summary = match self.figures(date, barber_id).await {
            Ok((shop, barber)) => DashboardSummary {
                date,
                shop,
                barber,
                degraded: false,
            },
            Err(e) => {
                tracing::warn!(%date, "Dashboard figures unavailable: {}", e);
                DashboardSummary {
                    date,
                    shop: Comparison::default(),
                    barber: barber_id.map(|_| Comparison::default()),
                    degraded: true,
                }
            }
        };
        Ok(summary)
    }

    /// Every client seen in the book, most recent visit first
    pub async fn clients(&self, caller: &Identity) -> AppResult<Vec<ClientSummary>> {
        caller.require_admin()?;
        let prices = self.price_table().await?;
        let appointments = self.appointments.list(&AppointmentFilter::default()).await?;
        Ok(client_summaries(&appointments, &prices))
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;
    use crate::{
        error::AppError,
        models::AppointmentStatus,
        repository::appointments::MockAppointmentStore,
        services::test_support::{admin, client, MemoryStore},
    };

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[tokio::test]
    async fn test_summary_compares_with_previous_day() {
        let store = MemoryStore::new();
        let cut = store.add_offering("Cut", 100);
        let beard = store.add_offering("Beard", 50);
        let leo = Uuid::new_v4();
        let today = date(2024, 1, 10);
        let yesterday = date(2024, 1, 9);

        store.add_appointment(yesterday, "09:00 AM", leo, &cut.id.to_string(), "a@example.com", AppointmentStatus::Completed);
        store.add_appointment(today, "09:00 AM", leo, &cut.id.to_string(), "a@example.com", AppointmentStatus::Confirmed);
        store.add_appointment(today, "10:00 AM", Uuid::new_v4(), &beard.id.to_string(), "b@example.com", AppointmentStatus::Confirmed);
        store.add_appointment(today, "11:00 AM", leo, "blocked", "admin@example.com", AppointmentStatus::Blocked);

        let stores = store.stores();
        let dashboard = DashboardService::new(stores.appointments, stores.offerings);
        let summary = dashboard.summary(&admin(), today, Some(leo)).await.unwrap();

        assert!(!summary.degraded);
        assert_eq!(summary.shop.current.revenue, Decimal::new(150, 0));
        assert_eq!(summary.shop.previous.revenue, Decimal::new(100, 0));
        assert_eq!(summary.shop.trend.revenue, 50.0);
        assert_eq!(summary.shop.current.bookings, 2);

        let barber = summary.barber.unwrap();
        assert_eq!(barber.current.bookings, 1);
        assert_eq!(barber.trend.bookings, 0.0);
    }

    #[tokio::test]
    async fn test_summary_degrades_on_store_error() {
        let mut appointments = MockAppointmentStore::new();
        appointments
            .expect_list()
            .returning(|_| Err(AppError::Internal("connection reset".to_string())));
        let store = MemoryStore::new();
        let dashboard = DashboardService::new(Arc::new(appointments), store.stores().offerings);

        let summary = dashboard.summary(&admin(), date(2024, 1, 10), None).await.unwrap();
        assert!(summary.degraded);
        assert_eq!(summary.shop, Comparison::default());
    }

    #[tokio::test]
    async fn test_clients_requires_admin() {
        let store = MemoryStore::new();
        let stores = store.stores();
        let dashboard = DashboardService::new(stores.appointments, stores.offerings);
        assert!(matches!(
            dashboard.clients(&client("a@example.com")).await,
            Err(AppError::Authorization(_))
        ));
    }
}
