
use campus_timetable::domain::catalog::Shift;
use campus_timetable::domain::ids::{RoomId, SectionId, TimeSlotId};
use campus_timetable::domain::timeslot::Day;
use campus_timetable::engine::conflict::{ConflictChecker, ConflictConstraint};
use campus_timetable::error::Error;

use fixtures::{
    add_course, add_offering, add_room, add_section, admin, engine_at, instructor, ordered_slot_ids, plan,
    request_for_offering, standard_campus,
};

#[test]
fn double_booking_an_instructor_names_the_colliding_course() {
    let (engine, _clock) = engine_at(0);
    standard_campus(&engine);

    let algo = request_for_offering(&engine, "off-algo-a");
    let db = request_for_offering(&engine, "off-db-b");
    let slots = ordered_slot_ids(&engine);

    engine.accept(&instructor("inst-ali"), &algo, &slots[..1]).expect("accept algo");

    // Same instructor, same slot, different section.
    let result = engine.accept(&instructor("inst-ali"), &db, &slots[..1]);
    match result {
        Err(Error::Conflict(reason)) => {
            assert_eq!(reason.constraint, ConflictConstraint::Instructor);
            assert!(reason.slot.contains("Monday"), "slot label, got: {}", reason.slot);
            assert!(reason.with.contains("CS-301"), "colliding course, got: {}", reason.with);
        }
        other => panic!("expected an instructor conflict, got {:?}", other),
    }
}

#[test]
fn sections_booked_by_auto_assign_reject_a_second_claim() {
    let (engine, _clock) = engine_at(0);
    standard_campus(&engine);

    // The batch pass books sec-a and sec-b across the Monday slots.
    engine.auto_assign(&admin(), Shift::Morning, 5).expect("auto-assign");

    let algo = request_for_offering(&engine, "off-algo-a");
    let slots = ordered_slot_ids(&engine);

    // sec-a already has an assignment in every one of these slots.
    let result = engine.accept(&instructor("inst-ali"), &algo, &slots[..1]);
    match result {
        Err(Error::Conflict(reason)) => assert_eq!(reason.constraint, ConflictConstraint::Section),
        other => panic!("expected a section conflict, got {:?}", other),
    }
}

#[test]
fn acceptance_fails_when_every_room_is_taken() {
    let (engine, _clock) = engine_at(0);
    add_room(&engine, "room-only", 50);
    add_section(&engine, "sec-a", 30, Shift::Morning, 5);
    add_section(&engine, "sec-b", 30, Shift::Morning, 5);
    add_course(&engine, "crs-1", "CS-101", 1);
    add_course(&engine, "crs-2", "CS-102", 1);
    add_offering(&engine, "off-a", "crs-1", "sec-a", 5, Shift::Morning);
    add_offering(&engine, "off-b", "crs-2", "sec-b", 5, Shift::Morning);
    engine.generate_slots(&admin(), &plan(&[(Day::Monday, 60, 2)])).unwrap();
    engine.seed_requests(&admin()).unwrap();

    let first = request_for_offering(&engine, "off-a");
    let second = request_for_offering(&engine, "off-b");
    let slots = ordered_slot_ids(&engine);

    engine.accept(&instructor("inst-ali"), &first, &slots[..1]).expect("the single room is free");

    let result = engine.accept(&instructor("inst-sara"), &second, &slots[..1]);
    match result {
        Err(Error::Conflict(reason)) => {
            assert_eq!(reason.constraint, ConflictConstraint::Room);
            assert!(reason.with.contains("booked"), "got: {}", reason.with);
        }
        other => panic!("expected room exhaustion, got {:?}", other),
    }
}

#[test]
fn room_check_names_the_holding_section_and_honors_self_exclusion() {
    let (engine, _clock) = engine_at(0);
    standard_campus(&engine);

    let algo = request_for_offering(&engine, "off-algo-a");
    let slots = ordered_slot_ids(&engine);

    // The interactive lookup prefers the largest room, so the accept
    // lands in room-b.
    engine.accept(&instructor("inst-ali"), &algo, &slots[..1]).expect("accept");

    engine.store().read(|inner| {
        let checker = ConflictChecker::new(inner);

        let reason = checker
            .room_conflict(&RoomId::new("room-b"), &slots[0], 5, None)
            .expect("room-b is booked at the first slot");
        assert_eq!(reason.constraint, ConflictConstraint::Room);
        assert!(reason.with.contains("Room ROOM-B"), "got: {}", reason.with);
        assert!(reason.with.contains("is held by"), "got: {}", reason.with);
        assert!(reason.with.contains("SEC-A"), "got: {}", reason.with);

        // The booking holder itself sees the room as free.
        assert!(checker.room_conflict(&RoomId::new("room-b"), &slots[0], 5, Some(&algo)).is_none());

        // Untouched room and slot are clear for everyone.
        assert!(checker.room_conflict(&RoomId::new("room-a"), &slots[0], 5, None).is_none());
        assert!(checker.room_conflict(&RoomId::new("room-b"), &slots[1], 5, None).is_none());
    });
}

#[test]
fn a_partially_free_selection_reserves_nothing() {
    let (engine, _clock) = engine_at(0);
    standard_campus(&engine);

    let algo = request_for_offering(&engine, "off-algo-a");
    let db = request_for_offering(&engine, "off-db-b");
    let slots = ordered_slot_ids(&engine);

    engine.accept(&instructor("inst-ali"), &algo, &slots[1..2]).expect("accept algo");

    // Slots 0 and 2 are free but slot 1 collides; all-or-nothing means
    // none of the three may be reserved.
    let result = engine.accept(&instructor("inst-ali"), &db, &slots[..3]);
    assert!(matches!(result, Err(Error::Conflict(_))));

    engine.store().read(|inner| {
        let db_rows = inner.reservations.values().filter(|r| r.request_id == db).count();
        assert_eq!(db_rows, 0, "the failed request must leave no rows behind");
    });
}

#[test]
fn available_slots_reflect_section_and_instructor_load() {
    let (engine, _clock) = engine_at(0);
    standard_campus(&engine);

    let algo = request_for_offering(&engine, "off-algo-a");
    let db = request_for_offering(&engine, "off-db-b");
    let slots = ordered_slot_ids(&engine);

    engine.accept(&instructor("inst-ali"), &algo, &slots[..2]).expect("accept algo");

    // For the db request as seen by the same instructor, the two slots
    // held for algo are off the table.
    let open: Vec<TimeSlotId> =
        engine.available_slots_for_request(&instructor("inst-ali"), &db).expect("query").iter().map(|s| s.id.clone()).collect();
    assert_eq!(open, slots[2..4].to_vec());

    // A different instructor only trips over the section constraint,
    // and sec-b has no bookings at all yet.
    let open_other: Vec<TimeSlotId> =
        engine.available_slots_for_request(&instructor("inst-sara"), &db).expect("query").iter().map(|s| s.id.clone()).collect();
    assert_eq!(open_other, slots.to_vec());

    // The plain section view sees sec-a's two bookings.
    let open_section: Vec<TimeSlotId> = engine
        .available_slots(&SectionId::new("sec-a"), None)
        .expect("query")
        .iter()
        .map(|s| s.id.clone())
        .collect();
    assert_eq!(open_section, slots[2..4].to_vec());
}

#[test]
fn a_requests_own_slots_stay_available_to_itself() {
    let (engine, _clock) = engine_at(0);
    standard_campus(&engine);

    let algo = request_for_offering(&engine, "off-algo-a");
    let slots = ordered_slot_ids(&engine);

    engine.accept(&instructor("inst-ali"), &algo, &slots[..2]).expect("accept");

    // When picking reschedule targets the request's own reservations
    // are excluded, so every slot is on offer.
    let open: Vec<TimeSlotId> =
        engine.available_slots_for_request(&instructor("inst-ali"), &algo).expect("query").iter().map(|s| s.id.clone()).collect();
    assert_eq!(open, slots.to_vec());
}
