use crate::api::campus_dto::CampusDto;
use crate::error::Result;
use crate::loader::parser::parse_json_file;
use crate::store::TimetableStore;

pub mod actor;
pub mod api;
pub mod domain;
pub mod engine;
pub mod error;
pub mod loader;
pub mod logger;
pub mod notify;
pub mod store;

pub use engine::SchedulingEngine;

/// Loads a campus seed file (rooms, sections, courses, offerings)
/// into a fresh store and returns an engine on top of it.
pub fn load_campus(file_path: &str) -> Result<SchedulingEngine> {
    let dto: CampusDto = parse_json_file::<CampusDto>(file_path)?;
    log::info!("Campus file '{}' parsed successfully.", file_path);

    let store = TimetableStore::new();
    store.transaction(|inner| {
        for room in dto.rooms {
            inner.insert_room(room.into_domain());
        }
        for section in dto.sections {
            inner.insert_section(section.into_domain());
        }
        for course in dto.courses {
            inner.insert_course(course.into_domain());
        }
        for instructor in dto.instructors {
            inner.insert_instructor(instructor.into_domain());
        }
        for offering in dto.offerings {
            inner.insert_offering(offering.into_domain());
        }
        Ok(())
    })?;

    log::info!("Campus catalog loaded.");
    Ok(SchedulingEngine::with_wall_clock(store))
}
