use std::collections::HashSet;

use serde::Serialize;

use crate::domain::identity::IdentityContext;
use crate::domain::ids::{InstructorId, RequestId, TimeSlotId};
use crate::domain::request::{CourseRequest, RequestStatus};
use crate::domain::reservation::{AssignmentStatus, ReservationStatus, RoomAssignment, SlotReservation};
use crate::engine::SchedulingEngine;
use crate::engine::allocator::find_room_for_slot;
use crate::engine::conflict::{ConflictChecker, ConflictReason};
use crate::error::{Error, Result};
use crate::store::is_scheduled;

/// The undo window: a freshly accepted request may be reverted for
/// strictly less than this many milliseconds. Exactly at the boundary
/// the undo is rejected.
pub const UNDO_WINDOW_MS: i64 = 10_000;

#[derive(Serialize, Debug, Clone)]
pub struct ScheduleOutcome {
    pub request_id: RequestId,
    pub status: RequestStatus,
    pub reserved_slots: usize,
}

fn validate_slot_selection(slot_ids: &[TimeSlotId]) -> Result<()> {
    if slot_ids.is_empty() {
        return Err(Error::Validation("At least one time slot must be selected".to_string()));
    }
    let distinct: HashSet<&TimeSlotId> = slot_ids.iter().collect();
    if distinct.len() != slot_ids.len() {
        return Err(Error::Validation("The slot selection contains duplicates".to_string()));
    }
    Ok(())
}

fn require_owner(request: &CourseRequest, caller: &InstructorId) -> Result<()> {
    match &request.instructor_id {
        Some(owner) if owner == caller => Ok(()),
        Some(_) => Err(Error::Authorization(format!("Request {} is owned by another instructor", request.id))),
        None => Err(Error::storage(format!("Request {} is scheduled but has no bound instructor", request.id))),
    }
}

impl SchedulingEngine {
    /// Accepts a pending course request for the given slot selection.
    ///
    /// Runs entirely inside one transaction: every slot must pass the
    /// instructor and section conflict checks and receive a room, or
    /// nothing is committed. On success one RoomAssignment plus one
    /// SlotReservation exists per slot, the request is `Accepted`
    /// with the acceptance timestamp recorded and the instructor
    /// bound, and the selection is kept in `preferences`.
    pub fn accept(&self, identity: &IdentityContext, request_id: &RequestId, slot_ids: &[TimeSlotId]) -> Result<ScheduleOutcome> {
        validate_slot_selection(slot_ids)?;

        let caller = identity.as_instructor_id();
        let now = self.now_ms();

        self.store().transaction(|inner| {
            let request = inner.request(request_id)?.clone();
            if request.status != RequestStatus::Pending {
                return Err(Error::State(format!("Request {} was already processed", request_id)));
            }

            let offering = inner.offering(&request.offering_id)?.clone();

            // Read-only conflict pass over the full selection; the
            // first failure aborts before anything is written.
            {
                let checker = ConflictChecker::new(inner);
                for slot_id in slot_ids {
                    inner.slot(slot_id)?;

                    if let Some(reason) = checker.instructor_conflict(&caller, slot_id, None) {
                        return Err(Error::Conflict(reason));
                    }
                    if let Some(reason) = checker.section_conflict(&request.section_id, slot_id, None) {
                        return Err(Error::Conflict(reason));
                    }
                }
            }

            for slot_id in slot_ids {
                let room_id = find_room_for_slot(inner, slot_id, offering.semester, None).ok_or_else(|| {
                    let label = inner.slots.get(slot_id).map_or_else(|| slot_id.to_string(), |s| s.describe());
                    Error::Conflict(ConflictReason::room_exhausted(label))
                })?;

                let assignment = inner.assignments.insert(RoomAssignment {
                    room_id,
                    section_id: request.section_id.clone(),
                    slot_id: slot_id.clone(),
                    semester: offering.semester,
                    status: AssignmentStatus::Reserved,
                    offering_id: Some(offering.id.clone()),
                });

                inner.reservations.insert(SlotReservation {
                    request_id: request_id.clone(),
                    instructor_id: caller.clone(),
                    slot_id: slot_id.clone(),
                    assignment,
                    status: ReservationStatus::Reserved,
                });
            }

            let request = inner.request_mut(request_id)?;
            request.transition(RequestStatus::Accepted)?;
            request.instructor_id = Some(caller.clone());
            request.accepted_at_ms = Some(now);
            request.preferences = serde_json::json!({ "slots": slot_ids.iter().map(|s| s.as_str()).collect::<Vec<_>>() });

            log::info!("Request {} accepted by {} with {} slot(s)", request_id, caller, slot_ids.len());
            Ok(ScheduleOutcome { request_id: request_id.clone(), status: RequestStatus::Accepted, reserved_slots: slot_ids.len() })
        })
    }

    /// Reverts a freshly accepted request.
    ///
    /// Only honored while less than [`UNDO_WINDOW_MS`] has elapsed
    /// since acceptance. Cancels the request's reservations, releases
    /// their room assignments back to `Available` and resets the
    /// request to `Pending` with instructor and timestamp cleared, so
    /// the freed slots are immediately claimable by anyone else.
    pub fn undo(&self, identity: &IdentityContext, request_id: &RequestId) -> Result<ScheduleOutcome> {
        let caller = identity.as_instructor_id();
        let now = self.now_ms();

        self.store().transaction(|inner| {
            let request = inner.request(request_id)?.clone();

            match request.status {
                RequestStatus::Pending => {
                    return Err(Error::State(format!("Request {} has no acceptance to undo", request_id)));
                }
                RequestStatus::Rescheduled => {
                    // The window anchors on acceptance; a reschedule
                    // is not undoable.
                    return Err(Error::State(format!("Request {} was rescheduled and can no longer be undone", request_id)));
                }
                RequestStatus::Accepted => {}
            }

            require_owner(&request, &caller)?;

            let accepted_at =
                request.accepted_at_ms.ok_or_else(|| Error::storage(format!("Request {} accepted without a timestamp", request_id)))?;
            if now - accepted_at >= UNDO_WINDOW_MS {
                return Err(Error::State(format!("Undo window expired for request {}", request_id)));
            }

            let released = inner.reserved_keys_for_request(request_id);
            for key in &released {
                let assignment = inner.reservations[*key].assignment;
                inner.reservations[*key].status = ReservationStatus::Cancelled;
                if let Some(a) = inner.assignments.get_mut(assignment) {
                    a.status = AssignmentStatus::Available;
                }
            }

            let request = inner.request_mut(request_id)?;
            request.transition(RequestStatus::Pending)?;
            request.instructor_id = None;
            request.accepted_at_ms = None;

            log::info!("Request {} undone by {}; {} reservation(s) released", request_id, caller, released.len());
            Ok(ScheduleOutcome { request_id: request_id.clone(), status: RequestStatus::Pending, reserved_slots: 0 })
        })
    }

    /// Moves an accepted request to a new slot selection.
    ///
    /// Every new slot is validated against instructor, section and
    /// room conflicts with the request's own current reservations
    /// excluded, so a kept slot does not collide with itself; the
    /// first conflict aborts the whole call and the original
    /// reservations stay in place. On success fresh rooms are
    /// allocated per new slot, the prior reservations are cancelled,
    /// and the request moves to `Rescheduled`.
    pub fn reschedule(&self, identity: &IdentityContext, request_id: &RequestId, slot_ids: &[TimeSlotId]) -> Result<ScheduleOutcome> {
        validate_slot_selection(slot_ids)?;

        let caller = identity.as_instructor_id();

        self.store().transaction(|inner| {
            let request = inner.request(request_id)?.clone();
            if !is_scheduled(request.status) {
                return Err(Error::State(format!("Request {} is not scheduled; only accepted requests can be rescheduled", request_id)));
            }

            require_owner(&request, &caller)?;

            let offering = inner.offering(&request.offering_id)?.clone();

            {
                let checker = ConflictChecker::new(inner);
                for slot_id in slot_ids {
                    inner.slot(slot_id)?;

                    if let Some(reason) = checker.instructor_conflict(&caller, slot_id, Some(request_id)) {
                        return Err(Error::Conflict(reason));
                    }
                    if let Some(reason) = checker.section_conflict(&request.section_id, slot_id, Some(request_id)) {
                        return Err(Error::Conflict(reason));
                    }
                }
            }

            // Keys of the outgoing chain, captured before any new rows
            // exist for this request.
            let old_keys = inner.reserved_keys_for_request(request_id);

            for slot_id in slot_ids {
                // The request's own bookings are excluded, so a kept
                // slot can hand its room straight to the new chain.
                let room_id = find_room_for_slot(inner, slot_id, offering.semester, Some(request_id)).ok_or_else(|| {
                    let label = inner.slots.get(slot_id).map_or_else(|| slot_id.to_string(), |s| s.describe());
                    Error::Conflict(ConflictReason::room_exhausted(label))
                })?;

                let assignment = inner.assignments.insert(RoomAssignment {
                    room_id,
                    section_id: request.section_id.clone(),
                    slot_id: slot_id.clone(),
                    semester: offering.semester,
                    status: AssignmentStatus::Reserved,
                    offering_id: Some(offering.id.clone()),
                });

                inner.reservations.insert(SlotReservation {
                    request_id: request_id.clone(),
                    instructor_id: caller.clone(),
                    slot_id: slot_id.clone(),
                    assignment,
                    status: ReservationStatus::Reserved,
                });
            }

            // Retire the old chain. Cancelled, not deleted: the rows
            // stay as the audit trail.
            for key in old_keys {
                let assignment = inner.reservations[key].assignment;
                inner.reservations[key].status = ReservationStatus::Cancelled;
                if let Some(a) = inner.assignments.get_mut(assignment) {
                    a.status = AssignmentStatus::Cancelled;
                }
            }

            let request = inner.request_mut(request_id)?;
            request.transition(RequestStatus::Rescheduled)?;
            request.preferences = serde_json::json!({ "slots": slot_ids.iter().map(|s| s.as_str()).collect::<Vec<_>>() });

            log::info!("Request {} rescheduled by {} onto {} slot(s)", request_id, caller, slot_ids.len());
            Ok(ScheduleOutcome { request_id: request_id.clone(), status: RequestStatus::Rescheduled, reserved_slots: slot_ids.len() })
        })
    }
}
