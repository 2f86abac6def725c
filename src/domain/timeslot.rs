use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::ids::TimeSlotId;

/// Days on which slots can be generated.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Day {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Day {
    pub fn abbrev(&self) -> &'static str {
        match self {
            Day::Monday => "mon",
            Day::Tuesday => "tue",
            Day::Wednesday => "wed",
            Day::Thursday => "thu",
            Day::Friday => "fri",
            Day::Saturday => "sat",
            Day::Sunday => "sun",
        }
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// A fixed meeting window on a specific day.
///
/// Immutable once generated: the generator replaces the whole catalog,
/// it never edits individual slots.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct TimeSlot {
    pub id: TimeSlotId,
    pub day: Day,
    pub start: NaiveTime,
    pub end: NaiveTime,
    pub duration_minutes: u32,
    /// 24-hour display form, e.g. "08:00 - 09:30".
    pub label_24h: String,
    /// 12-hour display form, e.g. "08:00 AM - 09:30 AM".
    pub label_12h: String,
}

impl TimeSlot {
    pub fn new(id: TimeSlotId, day: Day, start: NaiveTime, end: NaiveTime, duration_minutes: u32) -> Self {
        let label_24h = format!("{} - {}", start.format("%H:%M"), end.format("%H:%M"));
        let label_12h = format!("{} - {}", start.format("%I:%M %p"), end.format("%I:%M %p"));

        TimeSlot { id, day, start, end, duration_minutes, label_24h, label_12h }
    }

    /// Display form used in conflict reasons: "Monday 08:00 - 09:30".
    pub fn describe(&self) -> String {
        format!("{} {}", self.day, self.label_24h)
    }
}
