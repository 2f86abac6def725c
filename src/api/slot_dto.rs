use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use crate::domain::timeslot::Day;
use crate::engine::slot_generator::{DaySlotPlan, SlotGroup, SlotPlan};
use crate::error::{Error, Result};

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct SlotGroupDto {
    pub duration_minutes: u32,
    pub count: u32,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct DayPlanDto {
    pub day: Day,
    pub groups: Vec<SlotGroupDto>,
}

/// Wire shape of a slot-generation request. Times come in as "HH:MM".
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct SlotPlanDto {
    pub window_start: String,
    pub window_end: String,
    pub days: Vec<DayPlanDto>,
}

fn parse_time(value: &str, field: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(value, "%H:%M").map_err(|_| Error::Validation(format!("{} is not a valid HH:MM time: '{}'", field, value)))
}

impl SlotPlanDto {
    pub fn into_plan(self) -> Result<SlotPlan> {
        Ok(SlotPlan {
            window_start: parse_time(&self.window_start, "windowStart")?,
            window_end: parse_time(&self.window_end, "windowEnd")?,
            days: self
                .days
                .into_iter()
                .map(|d| DaySlotPlan {
                    day: d.day,
                    groups: d.groups.into_iter().map(|g| SlotGroup { duration_minutes: g.duration_minutes, count: g.count }).collect(),
                })
                .collect(),
        })
    }
}
