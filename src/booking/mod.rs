//! Booking core: slot catalog, availability and dashboard arithmetic
//!
//! Everything in here is free of I/O; services feed it appointments read
//! from the store together with the injected catalogs.

pub mod availability;
pub mod clock;
pub mod dashboard;
pub mod slots;

pub use availability::{DayAvailability, SlotAvailability, TimelineSlot, UnavailableReason};
pub use clock::ShopClock;
pub use dashboard::{ClientSummary, Comparison, DayFigures, PriceTable, Trends};
pub use slots::{SlotCatalog, SlotError, SlotTime};
