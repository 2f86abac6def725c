use serde::{Deserialize, Serialize};

use crate::domain::catalog::{Course, CourseKind, Instructor, Offering, Room, RoomType, Section, Shift};
use crate::domain::ids::{CourseId, InstructorId, OfferingId, RoomId, SectionId};

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct RoomDto {
    pub id: String,
    pub name: String,
    pub capacity: u32,
    pub room_type: RoomType,
    pub building: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct SectionDto {
    pub id: String,
    pub name: String,
    pub strength: u32,
    pub shift: Shift,
    pub semester: u32,
    pub major: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CourseDto {
    pub id: String,
    pub code: String,
    pub title: String,
    pub credit_hours: u8,
    pub kind: CourseKind,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct InstructorDto {
    pub id: String,
    pub name: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct OfferingDto {
    pub id: String,
    pub course_id: String,
    pub section_id: String,
    pub semester: u32,
    pub shift: Shift,
}

/// Wire shape of a campus seed file: the read-only catalog the engine
/// schedules against.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CampusDto {
    pub rooms: Vec<RoomDto>,
    pub sections: Vec<SectionDto>,
    pub courses: Vec<CourseDto>,
    #[serde(default)]
    pub instructors: Vec<InstructorDto>,
    pub offerings: Vec<OfferingDto>,
}

impl RoomDto {
    pub fn into_domain(self) -> Room {
        Room { id: RoomId::new(self.id), name: self.name, capacity: self.capacity, room_type: self.room_type, building: self.building }
    }
}

impl SectionDto {
    pub fn into_domain(self) -> Section {
        Section {
            id: SectionId::new(self.id),
            name: self.name,
            strength: self.strength,
            shift: self.shift,
            semester: self.semester,
            major: self.major,
        }
    }
}

impl CourseDto {
    pub fn into_domain(self) -> Course {
        Course { id: CourseId::new(self.id), code: self.code, title: self.title, credit_hours: self.credit_hours, kind: self.kind }
    }
}

impl InstructorDto {
    pub fn into_domain(self) -> Instructor {
        Instructor { id: InstructorId::new(self.id), name: self.name }
    }
}

impl OfferingDto {
    pub fn into_domain(self) -> Offering {
        Offering {
            id: OfferingId::new(self.id),
            course_id: CourseId::new(self.course_id),
            section_id: SectionId::new(self.section_id),
            semester: self.semester,
            shift: self.shift,
        }
    }
}
