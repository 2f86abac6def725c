
use std::sync::Arc;

use actix::Actor;

use campus_timetable::actor::messages::{AcceptRequest, AvailableSlotsForRequest, Materialize, UndoRequest};
use campus_timetable::actor::scheduling_actor::SchedulingActor;
use campus_timetable::domain::request::RequestStatus;
use campus_timetable::error::Error;
use campus_timetable::notify::NullNotifier;

use fixtures::{admin, engine_at, instructor, ordered_slot_ids, request_for_offering, standard_campus};

#[actix_rt::test]
async fn racing_accepts_resolve_to_exactly_one_winner() {
    let (engine, _clock) = engine_at(0);
    standard_campus(&engine);

    let request = request_for_offering(&engine, "off-algo-a");
    let slots = ordered_slot_ids(&engine);

    let addr = SchedulingActor::new(engine.clone(), Arc::new(NullNotifier)).start();

    let ali = addr.send(AcceptRequest {
        identity: instructor("inst-ali"),
        request_id: request.clone(),
        slot_ids: slots[..1].to_vec(),
    });
    let sara = addr.send(AcceptRequest {
        identity: instructor("inst-sara"),
        request_id: request.clone(),
        slot_ids: slots[1..2].to_vec(),
    });

    let (first, second) = tokio::join!(ali, sara);
    let first = first.expect("mailbox");
    let second = second.expect("mailbox");

    // The actor serializes the two accepts; whichever lands second
    // sees a request that is no longer pending.
    let winners = [&first, &second].iter().filter(|r| r.is_ok()).count();
    assert_eq!(winners, 1);
    let loser = if first.is_ok() { second } else { first };
    match loser {
        Err(Error::State(message)) => assert!(message.contains("already processed"), "got: {}", message),
        other => panic!("expected State error for the loser, got {:?}", other),
    }

    engine.store().read(|inner| {
        assert_eq!(inner.requests[&request].status, RequestStatus::Accepted);
        assert!(inner.requests[&request].instructor_id.is_some());
    });
}

#[actix_rt::test]
async fn undo_through_the_actor_frees_the_booking() {
    let (engine, clock) = engine_at(0);
    standard_campus(&engine);

    let request = request_for_offering(&engine, "off-algo-a");
    let slots = ordered_slot_ids(&engine);

    let addr = SchedulingActor::new(engine.clone(), Arc::new(NullNotifier)).start();

    addr.send(AcceptRequest {
        identity: instructor("inst-ali"),
        request_id: request.clone(),
        slot_ids: slots[..2].to_vec(),
    })
    .await
    .expect("mailbox")
    .expect("accept");

    clock.advance_ms(3_000);

    let outcome = addr
        .send(UndoRequest { identity: instructor("inst-ali"), request_id: request.clone() })
        .await
        .expect("mailbox")
        .expect("undo");
    assert_eq!(outcome.status, RequestStatus::Pending);

    engine.store().read(|inner| {
        assert_eq!(inner.requests[&request].status, RequestStatus::Pending);
    });
}

#[actix_rt::test]
async fn materialize_and_slot_queries_flow_through_the_actor() {
    let (engine, _clock) = engine_at(0);
    standard_campus(&engine);

    let request = request_for_offering(&engine, "off-algo-a");
    let slots = ordered_slot_ids(&engine);

    let addr = SchedulingActor::new(engine.clone(), Arc::new(NullNotifier)).start();

    addr.send(AcceptRequest {
        identity: instructor("inst-ali"),
        request_id: request.clone(),
        slot_ids: slots[..2].to_vec(),
    })
    .await
    .expect("mailbox")
    .expect("accept");

    let summary = addr.send(Materialize { identity: admin() }).await.expect("mailbox").expect("materialize");
    assert_eq!(summary.blocks, 2);

    let open = addr
        .send(AvailableSlotsForRequest { identity: instructor("inst-ali"), request_id: request.clone() })
        .await
        .expect("mailbox")
        .expect("query");
    // The request's own slots are excluded from its conflict view, so
    // all four remain on offer for a reschedule.
    assert_eq!(open.len(), 4);
}
