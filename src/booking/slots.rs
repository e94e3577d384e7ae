//! Slot times and the slot catalog
//!
//! Slots travel over the wire as 12-hour labels (`"09:00 AM"`) but are
//! handled internally as minutes since midnight, which gives them a
//! natural ordering and makes wall-clock comparisons trivial.

use std::{fmt, str::FromStr};

use chrono::NaiveTime;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

const MINUTES_PER_DAY: u16 = 24 * 60;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SlotError {
    #[error("Invalid slot label '{0}' (expected HH:MM AM/PM)")]
    InvalidLabel(String),

    #[error("Slot value {0} is outside a day")]
    OutOfRange(i32),

    #[error("Slot '{0}' appears twice in the catalog")]
    Duplicate(String),

    #[error("Slot '{0}' is not offered")]
    NotInCatalog(String),

    #[error("Slot catalog is empty")]
    EmptyCatalog,
}

/// A time of day at minute resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SlotTime(u16);

impl SlotTime {
    /// Build from a 24-hour clock time
    pub fn from_hm(hour: u32, minute: u32) -> Result<Self, SlotError> {
        if hour > 23 || minute > 59 {
            return Err(SlotError::OutOfRange((hour * 60 + minute) as i32));
        }
        Ok(Self((hour * 60 + minute) as u16))
    }

    pub fn minutes(self) -> u16 {
        self.0
    }

    pub fn hour(self) -> u32 {
        u32::from(self.0 / 60)
    }

    pub fn minute(self) -> u32 {
        u32::from(self.0 % 60)
    }

    pub fn as_naive_time(self) -> NaiveTime {
        NaiveTime::from_hms_opt(self.hour(), self.minute(), 0).unwrap_or(NaiveTime::MIN)
    }

    /// 12-hour display label, e.g. `"01:00 PM"`
    pub fn label(self) -> String {
        let hour = self.hour();
        let (hour12, meridiem) = match hour {
            0 => (12, "AM"),
            1..=11 => (hour, "AM"),
            12 => (12, "PM"),
            _ => (hour - 12, "PM"),
        };
        format!("{:02}:{:02} {}", hour12, self.minute(), meridiem)
    }
}

impl FromStr for SlotTime {
    type Err = SlotError;

    /// Parse a `"HH:MM AM"` label (AM 12 is midnight, PM adds twelve hours except at noon)
    fn from_str(label: &str) -> Result<Self, Self::Err> {
        let invalid = || SlotError::InvalidLabel(label.to_string());

        let (clock, meridiem) = label.trim().split_once(' ').ok_or_else(invalid)?;
        let is_pm = match meridiem.trim() {
            m if m.eq_ignore_ascii_case("AM") => false,
            m if m.eq_ignore_ascii_case("PM") => true,
            _ => return Err(invalid()),
        };

        let (hours, minutes) = clock.split_once(':').ok_or_else(invalid)?;
        if hours.len() != 2 || minutes.len() != 2 {
            return Err(invalid());
        }
        let hour: u32 = hours.parse().map_err(|_| invalid())?;
        let minute: u32 = minutes.parse().map_err(|_| invalid())?;
        if !(1..=12).contains(&hour) || minute > 59 {
            return Err(invalid());
        }

        let hour24 = match (hour, is_pm) {
            (12, false) => 0,
            (12, true) => 12,
            (h, false) => h,
            (h, true) => h + 12,
        };
        SlotTime::from_hm(hour24, minute)
    }
}

impl fmt::Display for SlotTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

impl TryFrom<i16> for SlotTime {
    type Error = SlotError;

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        if !(0..MINUTES_PER_DAY as i16).contains(&value) {
            return Err(SlotError::OutOfRange(i32::from(value)));
        }
        Ok(Self(value as u16))
    }
}

impl From<SlotTime> for i16 {
    fn from(slot: SlotTime) -> Self {
        slot.0 as i16
    }
}

impl Serialize for SlotTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.label())
    }
}

impl<'de> Deserialize<'de> for SlotTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        label.parse().map_err(de::Error::custom)
    }
}

/// Ordered set of bookable slot times, shared by booking and admin views
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotCatalog {
    slots: Vec<SlotTime>,
}

impl SlotCatalog {
    /// Build a catalog from labels, keeping the given order
    pub fn from_labels<I, S>(labels: I) -> Result<Self, SlotError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut slots: Vec<SlotTime> = Vec::new();
        for label in labels {
            let slot: SlotTime = label.as_ref().parse()?;
            if slots.contains(&slot) {
                return Err(SlotError::Duplicate(slot.label()));
            }
            slots.push(slot);
        }
        if slots.is_empty() {
            return Err(SlotError::EmptyCatalog);
        }
        Ok(Self { slots })
    }

    /// Hourly slots from 09:00 AM to 09:00 PM
    pub fn business_day() -> Self {
        Self {
            slots: (9..=21).map(|hour| SlotTime((hour * 60) as u16)).collect(),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = SlotTime> + '_ {
        self.slots.iter().copied()
    }

    pub fn labels(&self) -> Vec<String> {
        self.slots.iter().map(|slot| slot.label()).collect()
    }

    pub fn contains(&self, slot: SlotTime) -> bool {
        self.slots.contains(&slot)
    }

    /// Parse a label and check that the catalog offers it
    pub fn slot(&self, label: &str) -> Result<SlotTime, SlotError> {
        let slot: SlotTime = label.parse()?;
        if !self.contains(slot) {
            return Err(SlotError::NotInCatalog(label.trim().to_string()));
        }
        Ok(slot)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_labels() {
        assert_eq!("09:00 AM".parse::<SlotTime>().unwrap().minutes(), 9 * 60);
        assert_eq!("12:00 AM".parse::<SlotTime>().unwrap().minutes(), 0);
        assert_eq!("12:30 PM".parse::<SlotTime>().unwrap().minutes(), 12 * 60 + 30);
        assert_eq!("09:00 PM".parse::<SlotTime>().unwrap().minutes(), 21 * 60);
        assert_eq!("01:15 pm".parse::<SlotTime>().unwrap().minutes(), 13 * 60 + 15);
    }

    #[test]
    fn test_reject_bad_labels() {
        for label in ["", "9:00 AM", "09:00", "13:00 PM", "00:30 AM", "09:60 AM", "09:00 XM"] {
            assert!(label.parse::<SlotTime>().is_err(), "{label} should not parse");
        }
    }

    #[test]
    fn test_label_formatting() {
        assert_eq!(SlotTime::from_hm(0, 0).unwrap().label(), "12:00 AM");
        assert_eq!(SlotTime::from_hm(12, 0).unwrap().label(), "12:00 PM");
        assert_eq!(SlotTime::from_hm(21, 0).unwrap().label(), "09:00 PM");
        assert_eq!(SlotTime::from_hm(9, 5).unwrap().to_string(), "09:05 AM");
    }

    #[test]
    fn test_serde_uses_label() {
        let slot = SlotTime::from_hm(14, 0).unwrap();
        assert_eq!(serde_json::to_string(&slot).unwrap(), "\"02:00 PM\"");
        let back: SlotTime = serde_json::from_str("\"02:00 PM\"").unwrap();
        assert_eq!(back, slot);
    }

    #[test]
    fn test_i16_bounds() {
        assert!(SlotTime::try_from(-1).is_err());
        assert!(SlotTime::try_from(1440).is_err());
        assert_eq!(i16::from(SlotTime::try_from(600).unwrap()), 600);
    }

    #[test]
    fn test_business_day_catalog() {
        let catalog = SlotCatalog::business_day();
        assert_eq!(catalog.len(), 13);
        let labels = catalog.labels();
        assert_eq!(labels.first().map(String::as_str), Some("09:00 AM"));
        assert_eq!(labels.last().map(String::as_str), Some("09:00 PM"));
        assert_eq!(SlotCatalog::from_labels(&labels).unwrap(), catalog);
    }

    #[test]
    fn test_catalog_rejects_duplicates_and_empty() {
        assert_eq!(
            SlotCatalog::from_labels(["09:00 AM", "09:00 am"]),
            Err(SlotError::Duplicate("09:00 AM".to_string()))
        );
        assert_eq!(
            SlotCatalog::from_labels(Vec::<String>::new()),
            Err(SlotError::EmptyCatalog)
        );
    }

    #[test]
    fn test_catalog_slot_lookup() {
        let catalog = SlotCatalog::from_labels(["09:00 AM", "10:00 AM"]).unwrap();
        assert_eq!(catalog.slot("10:00 AM").unwrap().hour(), 10);
        assert!(matches!(catalog.slot("11:00 AM"), Err(SlotError::NotInCatalog(_))));
        assert!(matches!(catalog.slot("ten"), Err(SlotError::InvalidLabel(_))));
    }
}
