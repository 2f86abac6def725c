//! In-memory relational store for the scheduling core.
//!
//! All tables live inside one [`StoreInner`] behind a single lock.
//! Mutations go through [`TimetableStore::transaction`], which applies
//! the closure to a working copy and swaps it in only when the closure
//! succeeds and the uniqueness invariants still hold. A failed closure
//! leaves the committed state untouched, which gives every engine
//! operation all-or-nothing semantics, and the write lock serializes
//! concurrent writers the way row locks do in the relational original.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use slotmap::SlotMap;

use crate::domain::block::{Block, SectionCourseHistory};
use crate::domain::catalog::{Course, Instructor, Offering, Room, Section};
use crate::domain::ids::{CourseId, InstructorId, OfferingId, RequestId, RoomId, SectionId, TimeSlotId};
use crate::domain::request::{CourseRequest, RequestStatus};
use crate::domain::reservation::{
    AssignmentKey, AssignmentStatus, ReservationKey, ReservationStatus, RoomAssignment, SlotReservation,
};
use crate::domain::timeslot::TimeSlot;
use crate::error::{Error, Result};

/// Every table of the scheduling core under one lock.
#[derive(Debug, Default, Clone)]
pub struct StoreInner {
    // Catalog tables: read-only input for the engine.
    pub rooms: HashMap<RoomId, Room>,
    pub sections: HashMap<SectionId, Section>,
    pub courses: HashMap<CourseId, Course>,
    pub instructors: HashMap<InstructorId, Instructor>,
    pub offerings: HashMap<OfferingId, Offering>,

    // The slot catalog. Replaced wholesale by the generator.
    pub slots: HashMap<TimeSlotId, TimeSlot>,

    // The reservation graph. Written only by the coordinator and the
    // batch allocator.
    pub requests: HashMap<RequestId, CourseRequest>,
    pub assignments: SlotMap<AssignmentKey, RoomAssignment>,
    pub reservations: SlotMap<ReservationKey, SlotReservation>,

    // Derived tables, rebuilt only by the materializer.
    pub blocks: Vec<Block>,
    pub history: Vec<SectionCourseHistory>,
}

#[derive(Debug, Clone)]
pub struct TimetableStore {
    inner: Arc<RwLock<StoreInner>>,
}

impl TimetableStore {
    pub fn new() -> Self {
        Self { inner: Arc::new(RwLock::new(StoreInner::default())) }
    }

    /// Runs a read-only closure against the committed state.
    pub fn read<R>(&self, f: impl FnOnce(&StoreInner) -> R) -> R {
        let guard = self.inner.read().expect("RwLock poisoned");
        f(&guard)
    }

    /// Runs a mutating closure with all-or-nothing semantics.
    ///
    /// The closure sees a working copy of the committed state. On `Ok`
    /// the uniqueness invariants are re-verified as a final backstop
    /// and the copy replaces the committed state; on `Err` the copy is
    /// dropped and nothing is persisted.
    pub fn transaction<R>(&self, f: impl FnOnce(&mut StoreInner) -> Result<R>) -> Result<R> {
        let mut guard = self.inner.write().expect("RwLock poisoned");
        let mut work = guard.clone();

        let outcome = f(&mut work)?;
        work.verify_uniqueness()?;

        *guard = work;
        Ok(outcome)
    }
}

impl Default for TimetableStore {
    fn default() -> Self {
        Self::new()
    }
}

impl StoreInner {
    //-----------------------
    // --- Catalog access ---
    //-----------------------

    pub fn room(&self, id: &RoomId) -> Result<&Room> {
        self.rooms.get(id).ok_or_else(|| Error::not_found("Room", id.as_str()))
    }

    pub fn section(&self, id: &SectionId) -> Result<&Section> {
        self.sections.get(id).ok_or_else(|| Error::not_found("Section", id.as_str()))
    }

    pub fn course(&self, id: &CourseId) -> Result<&Course> {
        self.courses.get(id).ok_or_else(|| Error::not_found("Course", id.as_str()))
    }

    pub fn offering(&self, id: &OfferingId) -> Result<&Offering> {
        self.offerings.get(id).ok_or_else(|| Error::not_found("Offering", id.as_str()))
    }

    pub fn slot(&self, id: &TimeSlotId) -> Result<&TimeSlot> {
        self.slots.get(id).ok_or_else(|| Error::not_found("TimeSlot", id.as_str()))
    }

    pub fn request(&self, id: &RequestId) -> Result<&CourseRequest> {
        self.requests.get(id).ok_or_else(|| Error::not_found("CourseRequest", id.as_str()))
    }

    pub fn request_mut(&mut self, id: &RequestId) -> Result<&mut CourseRequest> {
        self.requests.get_mut(id).ok_or_else(|| Error::not_found("CourseRequest", id.as_str()))
    }

    /// Slots ordered by start time, then day, then id. The id
    /// tie-break makes every allocator scan a total order.
    pub fn slots_ordered(&self) -> Vec<&TimeSlot> {
        let mut slots: Vec<&TimeSlot> = self.slots.values().collect();
        slots.sort_by(|a, b| a.start.cmp(&b.start).then(a.day.cmp(&b.day)).then(a.id.cmp(&b.id)));
        slots
    }

    /// Rooms ordered by capacity ascending, id as tie-break.
    pub fn rooms_by_capacity_asc(&self) -> Vec<&Room> {
        let mut rooms: Vec<&Room> = self.rooms.values().collect();
        rooms.sort_by(|a, b| a.capacity.cmp(&b.capacity).then(a.id.cmp(&b.id)));
        rooms
    }

    /// Rooms ordered by capacity descending, id as tie-break.
    pub fn rooms_by_capacity_desc(&self) -> Vec<&Room> {
        let mut rooms: Vec<&Room> = self.rooms.values().collect();
        rooms.sort_by(|a, b| b.capacity.cmp(&a.capacity).then(a.id.cmp(&b.id)));
        rooms
    }

    //-----------------------------
    // --- Reservation queries ---
    //-----------------------------

    /// True while any reserved row still references the slot catalog.
    /// Guards the generator's destructive regeneration.
    pub fn catalog_in_use(&self) -> bool {
        self.assignments.values().any(|a| a.status == AssignmentStatus::Reserved)
            || self.reservations.values().any(|r| r.status == ReservationStatus::Reserved)
    }

    /// Reserved room assignment occupying (room, slot, semester), if any.
    pub fn reserved_assignment_at(&self, room_id: &RoomId, slot_id: &TimeSlotId, semester: u32) -> Option<AssignmentKey> {
        self.assignments
            .iter()
            .find(|(_, a)| {
                a.status == AssignmentStatus::Reserved && &a.room_id == room_id && &a.slot_id == slot_id && a.semester == semester
            })
            .map(|(key, _)| key)
    }

    /// True if the section already holds a reserved assignment at the slot.
    pub fn section_occupies_slot(&self, section_id: &SectionId, slot_id: &TimeSlotId) -> bool {
        self.assignments
            .values()
            .any(|a| a.status == AssignmentStatus::Reserved && &a.section_id == section_id && &a.slot_id == slot_id)
    }

    /// Reserved slot reservation held by the instructor at the slot,
    /// if any, optionally ignoring one request's own reservations.
    pub fn instructor_reservation_at(
        &self,
        instructor_id: &InstructorId,
        slot_id: &TimeSlotId,
        exclude_request: Option<&RequestId>,
    ) -> Option<&SlotReservation> {
        self.reservations.values().find(|r| {
            r.status == ReservationStatus::Reserved
                && &r.instructor_id == instructor_id
                && &r.slot_id == slot_id
                && exclude_request.map_or(true, |req| &r.request_id != req)
        })
    }

    /// All reservation keys belonging to a request, reserved only.
    pub fn reserved_keys_for_request(&self, request_id: &RequestId) -> Vec<ReservationKey> {
        self.reservations
            .iter()
            .filter(|(_, r)| r.status == ReservationStatus::Reserved && &r.request_id == request_id)
            .map(|(key, _)| key)
            .collect()
    }

    /// Assignment keys backing a request's reserved reservations.
    pub fn reserved_assignment_keys_for_request(&self, request_id: &RequestId) -> Vec<AssignmentKey> {
        self.reserved_keys_for_request(request_id).into_iter().map(|key| self.reservations[key].assignment).collect()
    }

    /// The live request (pending, accepted or rescheduled) for an
    /// offering, if one exists. Used by the request seeder.
    pub fn live_request_for_offering(&self, offering_id: &OfferingId) -> Option<&CourseRequest> {
        self.requests.values().find(|r| &r.offering_id == offering_id)
    }

    //--------------------------
    // --- Uniqueness backstop ---
    //--------------------------

    /// Re-checks the two uniqueness invariants before a transaction
    /// commits, standing in for the relational unique constraints on
    /// (instructor, slot) and (room, slot, semester).
    pub fn verify_uniqueness(&self) -> Result<()> {
        let mut instructor_slots: HashMap<(&InstructorId, &TimeSlotId), u32> = HashMap::new();
        for r in self.reservations.values().filter(|r| r.status == ReservationStatus::Reserved) {
            let seen = instructor_slots.entry((&r.instructor_id, &r.slot_id)).or_insert(0);
            *seen += 1;
            if *seen > 1 {
                return Err(Error::storage(format!(
                    "Uniqueness backstop: instructor {} holds two reservations at slot {}",
                    r.instructor_id, r.slot_id
                )));
            }
        }

        let mut room_slots: HashMap<(&RoomId, &TimeSlotId, u32), u32> = HashMap::new();
        for a in self.assignments.values().filter(|a| a.status == AssignmentStatus::Reserved) {
            let seen = room_slots.entry((&a.room_id, &a.slot_id, a.semester)).or_insert(0);
            *seen += 1;
            if *seen > 1 {
                return Err(Error::storage(format!(
                    "Uniqueness backstop: room {} double-booked at slot {} in semester {}",
                    a.room_id, a.slot_id, a.semester
                )));
            }
        }

        Ok(())
    }

    //-----------------------
    // --- Catalog setup ---
    //-----------------------

    pub fn insert_room(&mut self, room: Room) {
        self.rooms.insert(room.id.clone(), room);
    }

    pub fn insert_section(&mut self, section: Section) {
        self.sections.insert(section.id.clone(), section);
    }

    pub fn insert_course(&mut self, course: Course) {
        self.courses.insert(course.id.clone(), course);
    }

    pub fn insert_instructor(&mut self, instructor: Instructor) {
        self.instructors.insert(instructor.id.clone(), instructor);
    }

    pub fn insert_offering(&mut self, offering: Offering) {
        self.offerings.insert(offering.id.clone(), offering);
    }

    pub fn insert_request(&mut self, request: CourseRequest) {
        self.requests.insert(request.id.clone(), request);
    }

    /// Human-readable label for the owner of a colliding reservation:
    /// "CS-301 (Section BSCS-5A)". Falls back to raw ids for rows
    /// whose catalog entries are gone.
    pub fn describe_request(&self, request_id: &RequestId) -> String {
        match self.request(request_id) {
            Ok(request) => {
                let code = self.courses.get(&request.course_id).map_or_else(|| request.course_id.to_string(), |c| c.code.clone());
                let section =
                    self.sections.get(&request.section_id).map_or_else(|| request.section_id.to_string(), |s| s.name.clone());
                format!("{} (Section {})", code, section)
            }
            Err(_) => request_id.to_string(),
        }
    }

    /// Label for the section holding a colliding assignment.
    pub fn describe_section(&self, section_id: &SectionId) -> String {
        self.sections.get(section_id).map_or_else(|| section_id.to_string(), |s| format!("Section {}", s.name))
    }

    /// Label for a colliding room.
    pub fn describe_room(&self, room_id: &RoomId) -> String {
        self.rooms.get(room_id).map_or_else(|| room_id.to_string(), |r| format!("Room {}", r.name))
    }
}

/// Requests in `Accepted` or `Rescheduled` count as scheduled for
/// timetable purposes.
pub fn is_scheduled(status: RequestStatus) -> bool {
    matches!(status, RequestStatus::Accepted | RequestStatus::Rescheduled)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assignment(room: &str, slot: &str, semester: u32, status: AssignmentStatus) -> RoomAssignment {
        RoomAssignment {
            room_id: RoomId::new(room),
            section_id: SectionId::new("sec-1"),
            slot_id: TimeSlotId::new(slot),
            semester,
            status,
            offering_id: None,
        }
    }

    fn reservation(instructor: &str, slot: &str, assignment: AssignmentKey, status: ReservationStatus) -> SlotReservation {
        SlotReservation {
            request_id: RequestId::new("req-1"),
            instructor_id: InstructorId::new(instructor),
            slot_id: TimeSlotId::new(slot),
            assignment,
            status,
        }
    }

    #[test]
    fn backstop_rejects_a_double_booked_room() {
        let mut inner = StoreInner::default();
        inner.assignments.insert(assignment("room-a", "ts-mon-01", 5, AssignmentStatus::Reserved));
        inner.assignments.insert(assignment("room-a", "ts-mon-01", 5, AssignmentStatus::Reserved));

        assert!(matches!(inner.verify_uniqueness(), Err(Error::Storage)));
    }

    #[test]
    fn backstop_rejects_a_double_booked_instructor() {
        let mut inner = StoreInner::default();
        let a = inner.assignments.insert(assignment("room-a", "ts-mon-01", 5, AssignmentStatus::Reserved));
        let b = inner.assignments.insert(assignment("room-b", "ts-mon-01", 5, AssignmentStatus::Reserved));
        inner.reservations.insert(reservation("inst-1", "ts-mon-01", a, ReservationStatus::Reserved));
        inner.reservations.insert(reservation("inst-1", "ts-mon-01", b, ReservationStatus::Reserved));

        assert!(matches!(inner.verify_uniqueness(), Err(Error::Storage)));
    }

    #[test]
    fn backstop_ignores_released_and_cancelled_rows() {
        let mut inner = StoreInner::default();
        let a = inner.assignments.insert(assignment("room-a", "ts-mon-01", 5, AssignmentStatus::Available));
        inner.assignments.insert(assignment("room-a", "ts-mon-01", 5, AssignmentStatus::Reserved));
        inner.reservations.insert(reservation("inst-1", "ts-mon-01", a, ReservationStatus::Cancelled));
        inner.reservations.insert(reservation("inst-1", "ts-mon-01", a, ReservationStatus::Reserved));

        assert!(inner.verify_uniqueness().is_ok());
    }

    #[test]
    fn failed_transaction_leaves_committed_state_untouched() {
        let store = TimetableStore::new();
        let result: Result<()> = store.transaction(|inner| {
            inner.assignments.insert(assignment("room-a", "ts-mon-01", 5, AssignmentStatus::Reserved));
            Err(Error::Validation("abort".to_string()))
        });

        assert!(result.is_err());
        store.read(|inner| assert!(inner.assignments.is_empty()));
    }
}
