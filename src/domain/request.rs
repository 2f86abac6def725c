use serde::{Deserialize, Serialize};

use crate::domain::ids::{CourseId, InstructorId, OfferingId, RequestId, SectionId};
use crate::error::{Error, Result};

/// Lifecycle state of a course request.
///
/// The order, from least committed to most, is:
/// 1. `Pending` — created for an offering, waiting for an instructor.
/// 2. `Accepted` — an instructor claimed it and slots are reserved.
/// 3. `Rescheduled` — accepted, then moved to a different slot set.
///
/// `Rescheduled` is treated identically to `Accepted` for timetable
/// purposes; it only records that the original slot set was replaced.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum RequestStatus {
    Pending,
    Accepted,
    Rescheduled,
}

impl RequestStatus {
    /// The closed transition table. Anything not listed here is
    /// rejected, there are no ad hoc status writes.
    ///
    /// - `Pending -> Accepted` (accept)
    /// - `Accepted -> Pending` (undo, within the window)
    /// - `Accepted -> Rescheduled` (first reschedule)
    /// - `Rescheduled -> Rescheduled` (further reschedules)
    pub fn can_transition(from: RequestStatus, to: RequestStatus) -> bool {
        use RequestStatus::*;
        matches!((from, to), (Pending, Accepted) | (Accepted, Pending) | (Accepted, Rescheduled) | (Rescheduled, Rescheduled))
    }
}

/// One schedulable claim on a course offering.
///
/// Created externally, one per offering without a live request. The
/// engine only ever transitions `status` and binds `instructor_id`;
/// the identifying fields never change.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct CourseRequest {
    pub id: RequestId,
    pub course_id: CourseId,
    pub section_id: SectionId,
    pub offering_id: OfferingId,
    pub instructor_id: Option<InstructorId>,
    pub status: RequestStatus,
    /// Set on accept, cleared on undo. Anchors the undo window.
    pub accepted_at_ms: Option<i64>,
    /// Opaque to the engine; carries the most recent slot selection.
    pub preferences: serde_json::Value,
}

impl CourseRequest {
    pub fn new(id: RequestId, course_id: CourseId, section_id: SectionId, offering_id: OfferingId) -> Self {
        CourseRequest {
            id,
            course_id,
            section_id,
            offering_id,
            instructor_id: None,
            status: RequestStatus::Pending,
            accepted_at_ms: None,
            preferences: serde_json::Value::Null,
        }
    }

    /// Moves the request to `to`, enforcing the transition table.
    pub fn transition(&mut self, to: RequestStatus) -> Result<()> {
        if !RequestStatus::can_transition(self.status, to) {
            return Err(Error::State(format!("Request {} cannot move from {:?} to {:?}", self.id, self.status, to)));
        }
        self.status = to;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transition_table_is_closed() {
        use RequestStatus::*;

        assert!(RequestStatus::can_transition(Pending, Accepted));
        assert!(RequestStatus::can_transition(Accepted, Pending));
        assert!(RequestStatus::can_transition(Accepted, Rescheduled));
        assert!(RequestStatus::can_transition(Rescheduled, Rescheduled));

        // Undo of a reschedule is not a legal move.
        assert!(!RequestStatus::can_transition(Rescheduled, Pending));
        assert!(!RequestStatus::can_transition(Pending, Rescheduled));
        assert!(!RequestStatus::can_transition(Pending, Pending));
        assert!(!RequestStatus::can_transition(Rescheduled, Accepted));
    }

    #[test]
    fn illegal_transition_is_rejected_and_leaves_status_untouched() {
        let mut request = CourseRequest::new(
            RequestId::new("req-1"),
            CourseId::new("crs-1"),
            SectionId::new("sec-1"),
            OfferingId::new("off-1"),
        );

        let result = request.transition(RequestStatus::Rescheduled);
        assert!(matches!(result, Err(Error::State(_))));
        assert_eq!(request.status, RequestStatus::Pending);
    }
}
