//! Shop wall clock

use chrono::{FixedOffset, NaiveDate, NaiveDateTime, Offset, Utc};

use super::SlotError;

/// Wall clock of the shop, a fixed offset from UTC
#[derive(Debug, Clone, Copy)]
pub struct ShopClock {
    offset: FixedOffset,
}

impl ShopClock {
    pub fn new(utc_offset_minutes: i32) -> Result<Self, SlotError> {
        let offset = FixedOffset::east_opt(utc_offset_minutes * 60)
            .ok_or(SlotError::OutOfRange(utc_offset_minutes))?;
        Ok(Self { offset })
    }

    pub fn utc() -> Self {
        Self { offset: Utc.fix() }
    }

    pub fn now(&self) -> NaiveDateTime {
        Utc::now().with_timezone(&self.offset).naive_local()
    }

    pub fn today(&self) -> NaiveDate {
        self.now().date()
    }
}
