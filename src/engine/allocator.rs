use serde::Serialize;

use crate::domain::catalog::{Room, Shift};
use crate::domain::identity::IdentityContext;
use crate::domain::ids::{RequestId, RoomId, SectionId, TimeSlotId};
use crate::domain::reservation::{AssignmentStatus, RoomAssignment};
use crate::domain::timeslot::TimeSlot;
use crate::engine::SchedulingEngine;
use crate::engine::conflict::ConflictChecker;
use crate::error::Result;
use crate::store::StoreInner;

/// Meetings per week a course needs, from its credit hours.
/// Anything outside the 1..=4 range falls back to two meetings.
pub fn required_slot_count(credit_hours: u8) -> usize {
    match credit_hours {
        1 => 1,
        2 => 2,
        3 => 3,
        4 => 4,
        _ => 2,
    }
}

#[derive(Serialize, Debug, Clone)]
pub struct SectionAssignment {
    pub section_id: SectionId,
    pub required: usize,
    pub assigned: usize,
}

impl SectionAssignment {
    pub fn shortfall(&self) -> usize {
        self.required.saturating_sub(self.assigned)
    }
}

/// Result of one batch auto-assign run.
#[derive(Serialize, Debug, Clone, Default)]
pub struct AutoAssignSummary {
    pub assigned: Vec<SectionAssignment>,
    pub partial: Vec<SectionAssignment>,
    pub unassigned: Vec<SectionAssignment>,
}

impl AutoAssignSummary {
    fn record(&mut self, entry: SectionAssignment) {
        if entry.assigned == entry.required {
            self.assigned.push(entry);
        } else if entry.assigned == 0 {
            self.unassigned.push(entry);
        } else {
            self.partial.push(entry);
        }
    }
}

/// Interactive room lookup: the highest-capacity room that passes the
/// room-conflict check at the slot, ignoring bookings held by
/// `exclude_request` itself during a reschedule.
///
/// Intentionally the opposite ordering of the batch policy below,
/// which prefers the smallest adequate room. The divergence is
/// inherited behavior; unifying it would change acceptance results.
pub fn find_room_for_slot(
    inner: &StoreInner,
    slot_id: &TimeSlotId,
    semester: u32,
    exclude_request: Option<&RequestId>,
) -> Option<RoomId> {
    let checker = ConflictChecker::new(inner);
    inner
        .rooms_by_capacity_desc()
        .into_iter()
        .find(|room| checker.room_conflict(&room.id, slot_id, semester, exclude_request).is_none())
        .map(|room| room.id.clone())
}

impl SchedulingEngine {
    /// Batch auto-assignment: books a (room, slot) pair per required
    /// meeting for every section of the given shift and semester.
    ///
    /// Greedy and deterministic: sections by strength descending,
    /// rooms by capacity ascending (smallest adequate room first),
    /// slots by start time ascending, ids as tie-break everywhere.
    /// The first free pair wins immediately; sections that cannot be
    /// fully placed are reported with their exact shortfall.
    pub fn auto_assign(&self, identity: &IdentityContext, shift: Shift, semester: u32) -> Result<AutoAssignSummary> {
        identity.require_admin()?;

        self.store().transaction(|inner| {
            let mut sections: Vec<_> = inner.sections.values().filter(|s| s.shift == shift && s.semester == semester).cloned().collect();
            sections.sort_by(|a, b| b.strength.cmp(&a.strength).then(a.id.cmp(&b.id)));

            let rooms: Vec<Room> = inner.rooms_by_capacity_asc().into_iter().cloned().collect();
            let slots: Vec<TimeSlot> = inner.slots_ordered().into_iter().cloned().collect();

            let mut summary = AutoAssignSummary::default();

            for section in sections {
                // The section's primary course for this semester.
                let offering = inner
                    .offerings
                    .values()
                    .filter(|o| o.section_id == section.id && o.semester == semester)
                    .min_by(|a, b| a.id.cmp(&b.id))
                    .cloned();

                let Some(offering) = offering else {
                    log::warn!("Section {} has no offering in semester {}; skipping auto-assign", section.id, semester);
                    continue;
                };

                let course = inner.course(&offering.course_id)?.clone();
                let required = required_slot_count(course.credit_hours);
                let mut assigned = 0;

                for _meeting in 0..required {
                    let placement = rooms
                        .iter()
                        .filter(|room| room.capacity >= section.strength)
                        .find_map(|room| {
                            slots
                                .iter()
                                .find(|slot| {
                                    inner.reserved_assignment_at(&room.id, &slot.id, semester).is_none()
                                        && !inner.section_occupies_slot(&section.id, &slot.id)
                                })
                                .map(|slot| (room.id.clone(), slot.id.clone()))
                        });

                    match placement {
                        Some((room_id, slot_id)) => {
                            inner.assignments.insert(RoomAssignment {
                                room_id,
                                section_id: section.id.clone(),
                                slot_id,
                                semester,
                                status: AssignmentStatus::Reserved,
                                offering_id: Some(offering.id.clone()),
                            });
                            assigned += 1;
                        }
                        None => break,
                    }
                }

                summary.record(SectionAssignment { section_id: section.id.clone(), required, assigned });
            }

            log::info!(
                "Auto-assign for {} semester {}: {} assigned, {} partial, {} unassigned",
                shift,
                semester,
                summary.assigned.len(),
                summary.partial.len(),
                summary.unassigned.len()
            );
            Ok(summary)
        })
    }
}
