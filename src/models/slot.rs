//! Time slot model.
//!
//! An exam session is discretized into slots: one (day, hour) pair per
//! sitting. Days run Monday through Saturday; each day offers six
//! two-hour sittings starting at 08:00.
//!
//! # Granularity
//!
//! The student "one exam per day" rule is day-granular, while professor
//! and room occupancy are slot-granular. `Slot` keeps both views cheap:
//! `day` for the former, the full pair for the latter.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

/// Sitting start hours within one exam day.
pub const SLOT_HOURS: [u32; 6] = [8, 10, 12, 14, 16, 18];

/// A specific (day, hour) pair within an exam period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Slot {
    /// Calendar day of the sitting.
    pub day: NaiveDate,
    /// Start hour (24h clock).
    pub hour: u32,
}

impl Slot {
    /// Creates a slot.
    pub fn new(day: NaiveDate, hour: u32) -> Self {
        Self { day, hour }
    }

    /// The slot containing a given timestamp.
    pub fn from_datetime(at: NaiveDateTime) -> Self {
        Self {
            day: at.date(),
            hour: at.hour(),
        }
    }

    /// Start timestamp of this slot.
    pub fn starts_at(&self) -> NaiveDateTime {
        let time = NaiveTime::from_hms_opt(self.hour, 0, 0).unwrap_or(NaiveTime::MIN);
        self.day.and_time(time)
    }
}
