use serde::{Deserialize, Serialize};
use slotmap::new_key_type;

use crate::domain::ids::{InstructorId, OfferingId, RequestId, RoomId, SectionId, TimeSlotId};

new_key_type! {
    /// Store key for a RoomAssignment row.
    pub struct AssignmentKey;
    /// Store key for a SlotReservation row.
    pub struct ReservationKey;
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignmentStatus {
    /// The room is booked for this section at this slot.
    Reserved,
    /// Released by an undo; free to be claimed again.
    Available,
    /// Superseded by a reschedule. Kept for the audit trail, never
    /// reactivated.
    Cancelled,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReservationStatus {
    Reserved,
    Cancelled,
}

/// A specific room/slot/section booking.
///
/// Born either from batch auto-assignment (no owning request) or from
/// the acceptance of a course request (then paired with a
/// [`SlotReservation`]). Cancelled, not deleted, on undo/reschedule.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RoomAssignment {
    pub room_id: RoomId,
    pub section_id: SectionId,
    pub slot_id: TimeSlotId,
    pub semester: u32,
    pub status: AssignmentStatus,
    pub offering_id: Option<OfferingId>,
}

/// The instructor-facing half of a booking. Always points at exactly
/// one [`RoomAssignment`].
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct SlotReservation {
    pub request_id: RequestId,
    pub instructor_id: InstructorId,
    pub slot_id: TimeSlotId,
    pub assignment: AssignmentKey,
    pub status: ReservationStatus,
}
