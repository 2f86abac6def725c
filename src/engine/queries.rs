use crate::domain::identity::IdentityContext;
use crate::domain::ids::{InstructorId, RequestId, SectionId};
use crate::domain::timeslot::TimeSlot;
use crate::engine::SchedulingEngine;
use crate::engine::conflict::ConflictChecker;
use crate::error::Result;

impl SchedulingEngine {
    /// Slots with no section clash for `section_id`, and no instructor
    /// clash when an instructor is given. Ordered by start time.
    pub fn available_slots(&self, section_id: &SectionId, instructor_id: Option<&InstructorId>) -> Result<Vec<TimeSlot>> {
        self.store().read(|inner| {
            inner.section(section_id)?;

            let checker = ConflictChecker::new(inner);
            Ok(inner
                .slots_ordered()
                .into_iter()
                .filter(|slot| {
                    checker.section_conflict(section_id, &slot.id, None).is_none()
                        && instructor_id.map_or(true, |i| checker.instructor_conflict(i, &slot.id, None).is_none())
                })
                .cloned()
                .collect())
        })
    }

    /// Free slots from the viewpoint of one request, with the
    /// request's own reservations excluded so its currently held
    /// slots show as available for a reschedule.
    pub fn available_slots_for_request(&self, identity: &IdentityContext, request_id: &RequestId) -> Result<Vec<TimeSlot>> {
        self.store().read(|inner| {
            let request = inner.request(request_id)?;
            let instructor = request.instructor_id.clone().unwrap_or_else(|| identity.as_instructor_id());

            let checker = ConflictChecker::new(inner);
            Ok(inner
                .slots_ordered()
                .into_iter()
                .filter(|slot| {
                    checker.section_conflict(&request.section_id, &slot.id, Some(request_id)).is_none()
                        && checker.instructor_conflict(&instructor, &slot.id, Some(request_id)).is_none()
                })
                .cloned()
                .collect())
        })
    }
}
