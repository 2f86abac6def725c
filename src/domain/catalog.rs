use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::ids::{CourseId, InstructorId, OfferingId, RoomId, SectionId};

/// Coarse scheduling partition. Constrains which sections an
/// auto-assign run touches; rooms and slots are shared across shifts.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Shift {
    Morning,
    Evening,
}

impl fmt::Display for Shift {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoomType {
    Lecture,
    Lab,
    Auditorium,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CourseKind {
    Theory,
    Lab,
}

/// Read-only input from the engine's perspective.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Room {
    pub id: RoomId,
    pub name: String,
    pub capacity: u32,
    pub room_type: RoomType,
    pub building: String,
}

/// Read-only input from the engine's perspective.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Section {
    pub id: SectionId,
    pub name: String,
    /// Number of enrolled students. Drives room adequacy.
    pub strength: u32,
    pub shift: Shift,
    pub semester: u32,
    pub major: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Course {
    pub id: CourseId,
    pub code: String,
    pub title: String,
    pub credit_hours: u8,
    pub kind: CourseKind,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Instructor {
    pub id: InstructorId,
    pub name: String,
}

/// A course bound to a specific section/semester/shift. The unit a
/// course request is generated from.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Offering {
    pub id: OfferingId,
    pub course_id: CourseId,
    pub section_id: SectionId,
    pub semester: u32,
    pub shift: Shift,
}
