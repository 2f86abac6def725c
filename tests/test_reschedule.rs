
use campus_timetable::SchedulingEngine;
use campus_timetable::domain::catalog::Shift;
use campus_timetable::domain::ids::{RequestId, TimeSlotId};
use campus_timetable::domain::request::RequestStatus;
use campus_timetable::domain::reservation::ReservationStatus;
use campus_timetable::domain::timeslot::Day;
use campus_timetable::engine::conflict::ConflictConstraint;
use campus_timetable::error::Error;

use fixtures::{
    add_course, add_offering, add_room, add_section, admin, engine_at, instructor, ordered_slot_ids, plan,
    request_for_offering, standard_campus,
};

fn reserved_slot_ids(engine: &SchedulingEngine, request_id: &RequestId) -> Vec<TimeSlotId> {
    engine.store().read(|inner| {
        let mut ids: Vec<_> = inner
            .reservations
            .values()
            .filter(|r| &r.request_id == request_id && r.status == ReservationStatus::Reserved)
            .map(|r| r.slot_id.clone())
            .collect();
        ids.sort();
        ids
    })
}

#[test]
fn reschedule_moves_the_booking_and_retires_the_old_rows() {
    let (engine, _clock) = engine_at(0);
    standard_campus(&engine);

    let request = request_for_offering(&engine, "off-algo-a");
    let slots = ordered_slot_ids(&engine);

    engine.accept(&instructor("inst-ali"), &request, &slots[..2]).expect("accept");

    let outcome = engine.reschedule(&instructor("inst-ali"), &request, &slots[2..4]).expect("reschedule");
    assert_eq!(outcome.status, RequestStatus::Rescheduled);
    assert_eq!(outcome.reserved_slots, 2);

    let mut expected = slots[2..4].to_vec();
    expected.sort();
    assert_eq!(reserved_slot_ids(&engine, &request), expected);

    engine.store().read(|inner| {
        assert_eq!(inner.requests[&request].status, RequestStatus::Rescheduled);
        let cancelled = inner.reservations.values().filter(|r| r.status == ReservationStatus::Cancelled).count();
        assert_eq!(cancelled, 2, "the old rows stay as an audit trail");
    });
}

#[test]
fn conflicting_reschedule_leaves_the_original_booking_untouched() {
    let (engine, _clock) = engine_at(0);
    standard_campus(&engine);

    let algo = request_for_offering(&engine, "off-algo-a");
    let db = request_for_offering(&engine, "off-db-b");
    let slots = ordered_slot_ids(&engine);

    // The instructor teaches both courses: algo in the first slot, the
    // database course in the second.
    engine.accept(&instructor("inst-ali"), &algo, &slots[..1]).expect("accept algo");
    engine.accept(&instructor("inst-ali"), &db, &slots[1..2]).expect("accept db");

    // Moving algo onto the second slot would double-book the instructor.
    let result = engine.reschedule(&instructor("inst-ali"), &algo, &slots[1..2]);
    match result {
        Err(Error::Conflict(reason)) => {
            assert_eq!(reason.constraint, ConflictConstraint::Instructor);
            assert!(reason.with.contains("CS-305"), "the clash names the colliding course, got: {}", reason.with);
        }
        other => panic!("expected an instructor conflict, got {:?}", other),
    }

    // Nothing moved.
    assert_eq!(reserved_slot_ids(&engine, &algo), slots[..1].to_vec());
    engine.store().read(|inner| {
        assert_eq!(inner.requests[&algo].status, RequestStatus::Accepted);
    });
}

#[test]
fn reschedule_may_overlap_the_requests_own_slots() {
    let (engine, _clock) = engine_at(0);
    standard_campus(&engine);

    let request = request_for_offering(&engine, "off-algo-a");
    let slots = ordered_slot_ids(&engine);

    engine.accept(&instructor("inst-ali"), &request, &slots[..2]).expect("accept");

    // Keeps the second slot, trades the first for the third. The
    // request's own reservations must not count as conflicts.
    engine.reschedule(&instructor("inst-ali"), &request, &slots[1..3]).expect("overlapping reschedule");

    let mut expected = slots[1..3].to_vec();
    expected.sort();
    assert_eq!(reserved_slot_ids(&engine, &request), expected);
}

#[test]
fn reschedule_reuses_its_own_room_when_it_is_the_only_one() {
    let (engine, _clock) = engine_at(0);
    add_room(&engine, "room-only", 50);
    add_section(&engine, "sec-a", 30, Shift::Morning, 5);
    add_course(&engine, "crs-1", "CS-101", 2);
    add_offering(&engine, "off-1", "crs-1", "sec-a", 5, Shift::Morning);
    engine.generate_slots(&admin(), &plan(&[(Day::Monday, 60, 2)])).unwrap();
    engine.seed_requests(&admin()).unwrap();

    let request = request_for_offering(&engine, "off-1");
    let slots = ordered_slot_ids(&engine);

    engine.accept(&instructor("inst-ali"), &request, &slots[..1]).expect("accept");

    // Growing from one slot to both keeps the first slot. Its room is
    // still held by the request's outgoing row at allocation time, so
    // only the self-exclusion makes the lone room claimable again.
    engine.reschedule(&instructor("inst-ali"), &request, &slots[..2]).expect("reschedule over own booking");

    assert_eq!(reserved_slot_ids(&engine, &request), slots[..2].to_vec());
    engine.store().read(|inner| {
        let reserved = inner.reservations.values().filter(|r| r.status == ReservationStatus::Reserved).count();
        let cancelled = inner.reservations.values().filter(|r| r.status == ReservationStatus::Cancelled).count();
        assert_eq!((reserved, cancelled), (2, 1));
    });
}

#[test]
fn repeated_reschedules_are_allowed() {
    let (engine, _clock) = engine_at(0);
    standard_campus(&engine);

    let request = request_for_offering(&engine, "off-algo-a");
    let slots = ordered_slot_ids(&engine);

    engine.accept(&instructor("inst-ali"), &request, &slots[..1]).expect("accept");
    engine.reschedule(&instructor("inst-ali"), &request, &slots[1..2]).expect("first reschedule");
    engine.reschedule(&instructor("inst-ali"), &request, &slots[2..3]).expect("second reschedule");

    assert_eq!(reserved_slot_ids(&engine, &request), slots[2..3].to_vec());
}

#[test]
fn rescheduled_requests_cannot_be_undone() {
    let (engine, clock) = engine_at(0);
    standard_campus(&engine);

    let request = request_for_offering(&engine, "off-algo-a");
    let slots = ordered_slot_ids(&engine);

    engine.accept(&instructor("inst-ali"), &request, &slots[..1]).expect("accept");
    engine.reschedule(&instructor("inst-ali"), &request, &slots[1..2]).expect("reschedule");

    // Still well inside the original window.
    clock.advance_ms(1_000);
    let result = engine.undo(&instructor("inst-ali"), &request);
    assert!(matches!(result, Err(Error::State(_))));
    assert_eq!(reserved_slot_ids(&engine, &request), slots[1..2].to_vec());
}

#[test]
fn reschedule_is_owner_only_and_needs_a_scheduled_request() {
    let (engine, _clock) = engine_at(0);
    standard_campus(&engine);

    let request = request_for_offering(&engine, "off-algo-a");
    let slots = ordered_slot_ids(&engine);

    // Pending request: nothing to move yet.
    assert!(matches!(engine.reschedule(&instructor("inst-ali"), &request, &slots[..1]), Err(Error::State(_))));

    engine.accept(&instructor("inst-ali"), &request, &slots[..1]).expect("accept");
    assert!(matches!(engine.reschedule(&instructor("inst-sara"), &request, &slots[1..2]), Err(Error::Authorization(_))));

    assert_eq!(reserved_slot_ids(&engine, &request), slots[..1].to_vec());
}
