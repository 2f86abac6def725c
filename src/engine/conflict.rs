use std::collections::HashSet;
use std::fmt;

use serde::Serialize;

use crate::domain::ids::{InstructorId, RequestId, RoomId, SectionId, TimeSlotId};
use crate::domain::reservation::{AssignmentKey, AssignmentStatus};
use crate::store::StoreInner;

/// Which of the three independent constraints failed.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictConstraint {
    Instructor,
    Section,
    Room,
}

/// A structured collision report. Carries the display name of the
/// colliding entity so the caller can resolve the clash without a
/// second query.
#[derive(Serialize, Debug, Clone)]
pub struct ConflictReason {
    pub constraint: ConflictConstraint,
    /// Human-readable slot, e.g. "Monday 08:00 - 09:30".
    pub slot: String,
    /// Display name of whatever already occupies the slot.
    pub with: String,
}

impl ConflictReason {
    /// Every room is taken at the slot. Reported as a room conflict
    /// since that is the constraint the caller must resolve.
    pub fn room_exhausted(slot: String) -> Self {
        ConflictReason { constraint: ConflictConstraint::Room, slot, with: "every room is already booked".to_string() }
    }
}

impl fmt::Display for ConflictReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.constraint {
            ConflictConstraint::Instructor => write!(f, "Instructor conflict at {}: already teaching {}", self.slot, self.with),
            ConflictConstraint::Section => write!(f, "Section conflict at {}: already scheduled for {}", self.slot, self.with),
            ConflictConstraint::Room => write!(f, "Room conflict at {}: {}", self.slot, self.with),
        }
    }
}

/// Pure read-side predicate over the reservation graph. Borrows the
/// store state it was created from; never writes.
pub struct ConflictChecker<'a> {
    inner: &'a StoreInner,
}

impl<'a> ConflictChecker<'a> {
    pub fn new(inner: &'a StoreInner) -> Self {
        ConflictChecker { inner }
    }

    fn slot_label(&self, slot_id: &TimeSlotId) -> String {
        self.inner.slots.get(slot_id).map_or_else(|| slot_id.to_string(), |s| s.describe())
    }

    /// Assignment keys the check should ignore: the probing request's
    /// own bookings, during a reschedule.
    fn excluded_assignments(&self, exclude_request: Option<&RequestId>) -> HashSet<AssignmentKey> {
        exclude_request.map(|r| self.inner.reserved_assignment_keys_for_request(r).into_iter().collect()).unwrap_or_default()
    }

    /// Another request's reserved reservation holding the instructor
    /// at the slot.
    pub fn instructor_conflict(
        &self,
        instructor_id: &InstructorId,
        slot_id: &TimeSlotId,
        exclude_request: Option<&RequestId>,
    ) -> Option<ConflictReason> {
        self.inner.instructor_reservation_at(instructor_id, slot_id, exclude_request).map(|r| ConflictReason {
            constraint: ConflictConstraint::Instructor,
            slot: self.slot_label(slot_id),
            with: self.inner.describe_request(&r.request_id),
        })
    }

    /// A reserved booking or published block already claiming the
    /// section at the slot.
    pub fn section_conflict(
        &self,
        section_id: &SectionId,
        slot_id: &TimeSlotId,
        exclude_request: Option<&RequestId>,
    ) -> Option<ConflictReason> {
        let excluded = self.excluded_assignments(exclude_request);

        let colliding = self.inner.assignments.iter().find(|(key, a)| {
            a.status == AssignmentStatus::Reserved && &a.section_id == section_id && &a.slot_id == slot_id && !excluded.contains(key)
        });
        if let Some((_, assignment)) = colliding {
            let with = assignment
                .offering_id
                .as_ref()
                .and_then(|o| self.inner.offerings.get(o))
                .and_then(|o| self.inner.courses.get(&o.course_id))
                .map_or_else(|| "an existing booking".to_string(), |c| c.code.clone());
            return Some(ConflictReason { constraint: ConflictConstraint::Section, slot: self.slot_label(slot_id), with });
        }

        // The published timetable can hold blocks for bookings made
        // before the current reservation graph; honor them too. Blocks
        // derived from the probing request's own excluded assignments
        // must not count against it.
        let excluded_slots: HashSet<&TimeSlotId> =
            excluded.iter().filter_map(|key| self.inner.assignments.get(*key)).map(|a| &a.slot_id).collect();
        self.inner
            .blocks
            .iter()
            .find(|b| &b.section_id == section_id && &b.slot_id == slot_id && !excluded_slots.contains(&b.slot_id))
            .map(|b| ConflictReason {
                constraint: ConflictConstraint::Section,
                slot: self.slot_label(slot_id),
                with: self.inner.courses.get(&b.course_id).map_or_else(|| b.course_id.to_string(), |c| c.code.clone()),
            })
    }

    /// A reserved assignment occupying the room at the slot within the
    /// semester scope.
    pub fn room_conflict(
        &self,
        room_id: &RoomId,
        slot_id: &TimeSlotId,
        semester: u32,
        exclude_request: Option<&RequestId>,
    ) -> Option<ConflictReason> {
        let excluded = self.excluded_assignments(exclude_request);

        match self.inner.reserved_assignment_at(room_id, slot_id, semester) {
            Some(key) if !excluded.contains(&key) => {
                let section_id = self.inner.assignments[key].section_id.clone();
                Some(ConflictReason {
                    constraint: ConflictConstraint::Room,
                    slot: self.slot_label(slot_id),
                    with: format!("{} is held by {}", self.inner.describe_room(room_id), self.inner.describe_section(&section_id)),
                })
            }
            _ => None,
        }
    }
}
