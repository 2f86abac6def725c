use serde::{Deserialize, Serialize};

use crate::domain::catalog::{CourseKind, Shift};
use crate::domain::ids::{CourseId, InstructorId, RoomId, SectionId, TimeSlotId};
use crate::domain::timeslot::Day;

/// One published timetable entry.
///
/// Not a source of truth: the whole table is destroyed and rebuilt by
/// the materializer from the reserved reservation graph. Nothing else
/// ever writes a Block.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Block {
    pub instructor_id: InstructorId,
    pub course_id: CourseId,
    pub section_id: SectionId,
    pub room_id: RoomId,
    pub day: Day,
    pub slot_id: TimeSlotId,
    pub shift: Shift,
    pub kind: CourseKind,
}

/// Per-(section, course) teaching history, rebuilt alongside the
/// blocks for every section a materialization run touches.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SectionCourseHistory {
    pub section_id: SectionId,
    pub course_id: CourseId,
    pub instructor_id: InstructorId,
    pub semester: u32,
}
