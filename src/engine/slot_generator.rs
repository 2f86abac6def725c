use chrono::{Duration, NaiveTime};
use serde::Serialize;

use crate::domain::identity::IdentityContext;
use crate::domain::ids::TimeSlotId;
use crate::domain::timeslot::{Day, TimeSlot};
use crate::engine::SchedulingEngine;
use crate::error::{Error, Result};

/// Fixed break inserted between two consecutive generated slots.
pub const SLOT_GAP_MINUTES: u32 = 15;

/// One slot-type group: `count` slots of `duration_minutes` each.
#[derive(Debug, Clone)]
pub struct SlotGroup {
    pub duration_minutes: u32,
    pub count: u32,
}

#[derive(Debug, Clone)]
pub struct DaySlotPlan {
    pub day: Day,
    pub groups: Vec<SlotGroup>,
}

/// Input to [`SchedulingEngine::generate_slots`]: a global daily
/// window plus the slot distribution per active day.
#[derive(Debug, Clone)]
pub struct SlotPlan {
    pub window_start: NaiveTime,
    pub window_end: NaiveTime,
    pub days: Vec<DaySlotPlan>,
}

/// One day that does not fit its window. Reported as a batch so the
/// administrator can fix the whole plan in one pass.
#[derive(Debug, Clone, Serialize)]
pub struct DayShortfall {
    pub day: Day,
    pub required_minutes: u32,
    pub available_minutes: u32,
}

impl DayShortfall {
    pub fn missing_minutes(&self) -> u32 {
        self.required_minutes.saturating_sub(self.available_minutes)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SlotGenerationSummary {
    pub created: usize,
}

/// Minutes a day's plan occupies: the slots themselves plus one gap
/// between each consecutive pair.
fn required_minutes(groups: &[SlotGroup]) -> u32 {
    let slot_minutes: u32 = groups.iter().map(|g| g.duration_minutes * g.count).sum();
    let total_slots: u32 = groups.iter().map(|g| g.count).sum();
    slot_minutes + total_slots.saturating_sub(1) * SLOT_GAP_MINUTES
}

impl SchedulingEngine {
    /// Rebuilds the entire slot catalog from `plan`.
    ///
    /// Destructive and non-incremental: on success every existing slot
    /// is gone and the catalog holds exactly the newly computed slots.
    /// Refused while any reserved assignment or reservation still
    /// references the current catalog, because regeneration would
    /// orphan those rows.
    ///
    /// If any day's requirement exceeds the window the whole call
    /// fails with one [`DayShortfall`] per overflowing day and nothing
    /// is written.
    pub fn generate_slots(&self, identity: &IdentityContext, plan: &SlotPlan) -> Result<SlotGenerationSummary> {
        identity.require_admin()?;

        if plan.window_end <= plan.window_start {
            return Err(Error::Validation("The window end must lie after the window start".to_string()));
        }
        if plan.days.is_empty() {
            return Err(Error::Validation("The slot plan names no active days".to_string()));
        }
        for day_plan in &plan.days {
            if plan.days.iter().filter(|d| d.day == day_plan.day).count() > 1 {
                return Err(Error::Validation(format!("Day {} appears more than once in the slot plan", day_plan.day)));
            }
            for group in &day_plan.groups {
                if group.duration_minutes == 0 || group.count == 0 {
                    return Err(Error::Validation(format!("Day {} contains a slot group with zero duration or count", day_plan.day)));
                }
            }
        }

        let available_minutes = (plan.window_end - plan.window_start).num_minutes() as u32;

        let shortfalls: Vec<DayShortfall> = plan
            .days
            .iter()
            .map(|day_plan| DayShortfall {
                day: day_plan.day,
                required_minutes: required_minutes(&day_plan.groups),
                available_minutes,
            })
            .filter(|s| s.required_minutes > s.available_minutes)
            .collect();

        if !shortfalls.is_empty() {
            for s in &shortfalls {
                log::warn!("Slot plan overflow on {}: requires {} min, window offers {} min", s.day, s.required_minutes, s.available_minutes);
            }
            return Err(Error::WindowExceeded(shortfalls));
        }

        self.store().transaction(|inner| {
            if inner.catalog_in_use() {
                return Err(Error::State(
                    "The slot catalog is referenced by reserved bookings; release them before regenerating".to_string(),
                ));
            }

            inner.slots.clear();

            let mut created = 0;
            for day_plan in &plan.days {
                let mut cursor = plan.window_start;
                let mut index = 1;

                for group in &day_plan.groups {
                    for _ in 0..group.count {
                        let end = cursor + Duration::minutes(i64::from(group.duration_minutes));
                        let id = TimeSlotId::new(format!("ts-{}-{:02}", day_plan.day.abbrev(), index));

                        inner.slots.insert(id.clone(), TimeSlot::new(id, day_plan.day, cursor, end, group.duration_minutes));

                        cursor = end + Duration::minutes(i64::from(SLOT_GAP_MINUTES));
                        index += 1;
                        created += 1;
                    }
                }
            }

            log::info!("Slot catalog regenerated: {} slots across {} day(s)", created, plan.days.len());
            Ok(SlotGenerationSummary { created })
        })
    }
}
