//! Slot availability resolution
//!
//! A slot is bookable when the catalog offers it, no appointment holding a
//! slot (confirmed, blocked or completed) sits on it, and it is not in the
//! past relative to the shop clock.

use std::collections::BTreeSet;

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use super::{SlotCatalog, SlotTime};
use crate::models::Appointment;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum UnavailableReason {
    /// An appointment already holds the slot
    Booked,
    /// The slot has already started or the day is over
    Past,
    /// The store could not be read; nothing is offered
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct SlotAvailability {
    #[schema(value_type = String, example = "09:00 AM")]
    pub time: SlotTime,
    pub available: bool,
    pub reason: Option<UnavailableReason>,
}

/// Resolved availability of one barber for one day
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DayAvailability {
    pub date: NaiveDate,
    pub barber_id: Uuid,
    pub slots: Vec<SlotAvailability>,
    /// Set when appointments could not be read; every slot is then unavailable
    pub degraded: bool,
}

impl DayAvailability {
    pub fn available(&self) -> impl Iterator<Item = SlotTime> + '_ {
        self.slots.iter().filter(|s| s.available).map(|s| s.time)
    }

    pub fn unavailable(&self) -> impl Iterator<Item = SlotTime> + '_ {
        self.slots.iter().filter(|s| !s.available).map(|s| s.time)
    }

    /// Fail-open result used when the store is unreachable
    pub fn degraded(catalog: &SlotCatalog, date: NaiveDate, barber_id: Uuid) -> Self {
        let slots = catalog
            .iter()
            .map(|time| SlotAvailability {
                time,
                available: false,
                reason: Some(UnavailableReason::Unknown),
            })
            .collect();
        Self {
            date,
            barber_id,
            slots,
            degraded: true,
        }
    }
}

/// Times held by appointments that occupy their slot
pub fn booked_times<'a>(appointments: impl IntoIterator<Item = &'a Appointment>) -> BTreeSet<SlotTime> {
    appointments
        .into_iter()
        .filter(|a| a.status.holds_slot())
        .map(|a| a.time)
        .collect()
}

/// Whether a slot on `date` can no longer be booked at `now`
pub fn is_past(date: NaiveDate, time: SlotTime, now: NaiveDateTime) -> bool {
    let today = now.date();
    if date < today {
        return true;
    }
    if date > today {
        return false;
    }
    time.as_naive_time() <= now.time()
}

/// Mark every catalog slot for `date` as available or not
pub fn resolve(
    catalog: &SlotCatalog,
    date: NaiveDate,
    booked: &BTreeSet<SlotTime>,
    now: NaiveDateTime,
) -> Vec<SlotAvailability> {
    catalog
        .iter()
        .map(|time| {
            let reason = if booked.contains(&time) {
                Some(UnavailableReason::Booked)
            } else if is_past(date, time, now) {
                Some(UnavailableReason::Past)
            } else {
                None
            };
            SlotAvailability {
                time,
                available: reason.is_none(),
                reason,
            }
        })
        .collect()
}

/// One catalog slot with every appointment sitting on it
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct TimelineSlot {
    #[schema(value_type = String, example = "09:00 AM")]
    pub time: SlotTime,
    /// No slot-holding appointment on it
    pub available: bool,
    pub appointments: Vec<Appointment>,
}

/// Group a day's appointments under the catalog slots, in catalog order.
/// Appointments at times the catalog does not offer are left out.
pub fn timeline(catalog: &SlotCatalog, appointments: &[Appointment]) -> Vec<TimelineSlot> {
    catalog
        .iter()
        .map(|time| {
            let here: Vec<Appointment> = appointments
                .iter()
                .filter(|a| a.time == time)
                .cloned()
                .collect();
            TimelineSlot {
                time,
                available: !here.iter().any(|a| a.status.holds_slot()),
                appointments: here,
            }
        })
        .collect()
}
