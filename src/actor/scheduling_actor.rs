use std::sync::Arc;

use actix::prelude::{Actor, Context, Handler};

use crate::actor::messages::{
    AcceptRequest, AutoAssign, AvailableSlotsForRequest, GenerateSlots, Materialize, RescheduleRequest, UndoRequest,
};
use crate::domain::timeslot::TimeSlot;
use crate::engine::SchedulingEngine;
use crate::engine::allocator::AutoAssignSummary;
use crate::engine::coordinator::ScheduleOutcome;
use crate::engine::materializer::MaterializeSummary;
use crate::engine::slot_generator::SlotGenerationSummary;
use crate::error::Result;
use crate::notify::{Notifier, ScheduleEvent};

/// Single-writer arbitration in front of the engine.
///
/// One actor owns all mutating traffic, so accepts, undos,
/// reschedules and materializations are processed strictly one at a
/// time. Notifications are dispatched only after the engine call has
/// committed, and always fire-and-forget.
pub struct SchedulingActor {
    engine: SchedulingEngine,
    notifier: Arc<dyn Notifier>,
}

impl SchedulingActor {
    pub fn new(engine: SchedulingEngine, notifier: Arc<dyn Notifier>) -> Self {
        SchedulingActor { engine, notifier }
    }

    /// Post-commit, best-effort. A slow or failing notifier must not
    /// hold up the next scheduling message.
    fn emit(&self, event: ScheduleEvent) {
        let notifier = Arc::clone(&self.notifier);
        actix::spawn(async move {
            notifier.notify(event).await;
        });
    }
}

impl Actor for SchedulingActor {
    type Context = Context<Self>;
}

impl Handler<GenerateSlots> for SchedulingActor {
    type Result = Result<SlotGenerationSummary>;

    fn handle(&mut self, msg: GenerateSlots, _ctx: &mut Self::Context) -> Self::Result {
        self.engine.generate_slots(&msg.identity, &msg.plan)
    }
}

impl Handler<AutoAssign> for SchedulingActor {
    type Result = Result<AutoAssignSummary>;

    fn handle(&mut self, msg: AutoAssign, _ctx: &mut Self::Context) -> Self::Result {
        self.engine.auto_assign(&msg.identity, msg.shift, msg.semester)
    }
}

impl Handler<AcceptRequest> for SchedulingActor {
    type Result = Result<ScheduleOutcome>;

    fn handle(&mut self, msg: AcceptRequest, _ctx: &mut Self::Context) -> Self::Result {
        let outcome = self.engine.accept(&msg.identity, &msg.request_id, &msg.slot_ids)?;
        self.emit(ScheduleEvent::RequestAccepted {
            request_id: outcome.request_id.clone(),
            instructor_id: msg.identity.as_instructor_id(),
            slots: outcome.reserved_slots,
        });
        Ok(outcome)
    }
}

impl Handler<UndoRequest> for SchedulingActor {
    type Result = Result<ScheduleOutcome>;

    fn handle(&mut self, msg: UndoRequest, _ctx: &mut Self::Context) -> Self::Result {
        let outcome = self.engine.undo(&msg.identity, &msg.request_id)?;
        self.emit(ScheduleEvent::RequestUndone {
            request_id: outcome.request_id.clone(),
            instructor_id: msg.identity.as_instructor_id(),
        });
        Ok(outcome)
    }
}

impl Handler<RescheduleRequest> for SchedulingActor {
    type Result = Result<ScheduleOutcome>;

    fn handle(&mut self, msg: RescheduleRequest, _ctx: &mut Self::Context) -> Self::Result {
        let outcome = self.engine.reschedule(&msg.identity, &msg.request_id, &msg.slot_ids)?;
        self.emit(ScheduleEvent::RequestRescheduled {
            request_id: outcome.request_id.clone(),
            instructor_id: msg.identity.as_instructor_id(),
            slots: outcome.reserved_slots,
        });
        Ok(outcome)
    }
}

impl Handler<Materialize> for SchedulingActor {
    type Result = Result<MaterializeSummary>;

    fn handle(&mut self, msg: Materialize, _ctx: &mut Self::Context) -> Self::Result {
        let summary = self.engine.materialize(&msg.identity)?;
        self.emit(ScheduleEvent::TimetablePublished { blocks: summary.blocks });
        Ok(summary)
    }
}

impl Handler<AvailableSlotsForRequest> for SchedulingActor {
    type Result = Result<Vec<TimeSlot>>;

    fn handle(&mut self, msg: AvailableSlotsForRequest, _ctx: &mut Self::Context) -> Self::Result {
        self.engine.available_slots_for_request(&msg.identity, &msg.request_id)
    }
}
