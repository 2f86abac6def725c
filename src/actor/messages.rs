use actix::prelude::Message;

use crate::domain::catalog::Shift;
use crate::domain::identity::IdentityContext;
use crate::domain::ids::{RequestId, TimeSlotId};
use crate::domain::timeslot::TimeSlot;
use crate::engine::allocator::AutoAssignSummary;
use crate::engine::coordinator::ScheduleOutcome;
use crate::engine::materializer::MaterializeSummary;
use crate::engine::slot_generator::{SlotGenerationSummary, SlotPlan};
use crate::error::Result;

#[derive(Message)]
#[rtype(result = "Result<SlotGenerationSummary>")]
pub struct GenerateSlots {
    pub identity: IdentityContext,
    pub plan: SlotPlan,
}

#[derive(Message)]
#[rtype(result = "Result<AutoAssignSummary>")]
pub struct AutoAssign {
    pub identity: IdentityContext,
    pub shift: Shift,
    pub semester: u32,
}

#[derive(Message)]
#[rtype(result = "Result<ScheduleOutcome>")]
pub struct AcceptRequest {
    pub identity: IdentityContext,
    pub request_id: RequestId,
    pub slot_ids: Vec<TimeSlotId>,
}

#[derive(Message)]
#[rtype(result = "Result<ScheduleOutcome>")]
pub struct UndoRequest {
    pub identity: IdentityContext,
    pub request_id: RequestId,
}

#[derive(Message)]
#[rtype(result = "Result<ScheduleOutcome>")]
pub struct RescheduleRequest {
    pub identity: IdentityContext,
    pub request_id: RequestId,
    pub slot_ids: Vec<TimeSlotId>,
}

#[derive(Message)]
#[rtype(result = "Result<MaterializeSummary>")]
pub struct Materialize {
    pub identity: IdentityContext,
}

#[derive(Message)]
#[rtype(result = "Result<Vec<TimeSlot>>")]
pub struct AvailableSlotsForRequest {
    pub identity: IdentityContext,
    pub request_id: RequestId,
}
