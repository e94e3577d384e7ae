//! Slot availability for clients

use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime};
use uuid::Uuid;

use crate::{
    booking::{
        availability::{booked_times, resolve},
        DayAvailability, ShopClock, SlotCatalog,
    },
    error::AppResult,
    models::AppointmentFilter,
    repository::appointments::AppointmentStore,
};

#[derive(Clone)]
pub struct AvailabilityService {
    appointments: Arc<dyn AppointmentStore>,
    catalog: Arc<SlotCatalog>,
    clock: ShopClock,
}

impl AvailabilityService {
    pub fn new(appointments: Arc<dyn AppointmentStore>, catalog: Arc<SlotCatalog>, clock: ShopClock) -> Self {
        Self {
            appointments,
            catalog,
            clock,
        }
    }

    /// Every slot label offered on a business day
    pub fn slot_labels(&self) -> Vec<String> {
        self.catalog.labels()
    }

    /// Labels of the slots held on `date` for a barber, in chronological order.
    /// Past slots are not added here; store errors propagate.
    pub async fn booked_labels(&self, date: NaiveDate, barber_id: Uuid) -> AppResult<Vec<String>> {
        let appointments = self
            .appointments
            .list(&AppointmentFilter::day(date, Some(barber_id)))
            .await?;
        Ok(booked_times(&appointments).into_iter().map(|t| t.label()).collect())
    }

    /// Resolve a barber's day against the shop clock
    pub async fn resolve_day(&self, date: NaiveDate, barber_id: Uuid) -> DayAvailability {
        self.resolve_day_at(date, barber_id, self.clock.now()).await
    }

    /// Resolve a barber's day as seen at `now`; nothing is bookable when the
    /// store cannot be read, and the result says so.
    pub async fn resolve_day_at(&self, date: NaiveDate, barber_id: Uuid, now: NaiveDateTime) -> DayAvailability {
        match self
            .appointments
            .list(&AppointmentFilter::day(date, Some(barber_id)))
            .await
        {
            Ok(appointments) => DayAvailability {
                date,
                barber_id,
                slots: resolve(&self.catalog, date, &booked_times(&appointments), now),
                degraded: false,
            },
            Err(e) => {
                tracing::warn!(%date, %barber_id, "Failed to read appointments, offering no slots: {}", e);
                DayAvailability::degraded(&self.catalog, date, barber_id)
            }
        }
    }
}
