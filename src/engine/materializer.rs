use std::collections::HashSet;

use serde::Serialize;

use crate::domain::block::{Block, SectionCourseHistory};
use crate::domain::identity::IdentityContext;
use crate::domain::ids::{CourseId, SectionId};
use crate::domain::reservation::{AssignmentStatus, ReservationStatus};
use crate::engine::SchedulingEngine;
use crate::error::{Error, Result};
use crate::store::is_scheduled;

#[derive(Serialize, Debug, Clone)]
pub struct MaterializeSummary {
    pub blocks: usize,
    pub sections_touched: usize,
}

impl SchedulingEngine {
    /// Rebuilds the published timetable from scratch.
    ///
    /// Deletes every Block, then derives one Block per reserved
    /// reservation whose owning request is accepted or rescheduled.
    /// For the sections touched by this run the per-(section, course)
    /// history is rebuilt as well: one row per distinct pair, first
    /// instructor/semester observed wins.
    ///
    /// Running this twice against unchanged reservation state yields
    /// an identical Block set, so the operation is idempotent. It is
    /// not safe under concurrent invocation; the scheduling actor
    /// serializes it.
    pub fn materialize(&self, identity: &IdentityContext) -> Result<MaterializeSummary> {
        identity.require_admin()?;

        self.store().transaction(|inner| {
            // (Block, semester) pairs; the semester feeds the history.
            let mut rows: Vec<(Block, u32)> = Vec::new();

            for reservation in inner.reservations.values().filter(|r| r.status == ReservationStatus::Reserved) {
                let request = inner
                    .requests
                    .get(&reservation.request_id)
                    .ok_or_else(|| Error::storage(format!("Reservation points at unknown request {}", reservation.request_id)))?;
                if !is_scheduled(request.status) {
                    continue;
                }

                let assignment = inner
                    .assignments
                    .get(reservation.assignment)
                    .ok_or_else(|| Error::storage(format!("Reservation for request {} lost its room assignment", request.id)))?;
                if assignment.status != AssignmentStatus::Reserved {
                    continue;
                }

                // A reserved row pointing at a missing catalog entry is
                // corruption, not a caller mistake.
                let slot = inner
                    .slot(&reservation.slot_id)
                    .map_err(|_| Error::storage(format!("Reservation for request {} references unknown slot {}", request.id, reservation.slot_id)))?;
                let section = inner
                    .section(&assignment.section_id)
                    .map_err(|_| Error::storage(format!("Assignment references unknown section {}", assignment.section_id)))?;
                let course = inner
                    .course(&request.course_id)
                    .map_err(|_| Error::storage(format!("Request {} references unknown course {}", request.id, request.course_id)))?;

                rows.push((
                    Block {
                        instructor_id: reservation.instructor_id.clone(),
                        course_id: course.id.clone(),
                        section_id: section.id.clone(),
                        room_id: assignment.room_id.clone(),
                        day: slot.day,
                        slot_id: slot.id.clone(),
                        shift: section.shift,
                        kind: course.kind,
                    },
                    section.semester,
                ));
            }

            // Slotmap iteration order is not a contract; sort so the
            // published table and the history's first-wins rule are
            // stable across runs.
            rows.sort_by(|a, b| a.0.cmp(&b.0));

            let touched: HashSet<SectionId> = rows.iter().map(|(b, _)| b.section_id.clone()).collect();
            inner.history.retain(|h| !touched.contains(&h.section_id));

            let mut seen: HashSet<(SectionId, CourseId)> = HashSet::new();
            for (block, semester) in &rows {
                if seen.insert((block.section_id.clone(), block.course_id.clone())) {
                    inner.history.push(SectionCourseHistory {
                        section_id: block.section_id.clone(),
                        course_id: block.course_id.clone(),
                        instructor_id: block.instructor_id.clone(),
                        semester: *semester,
                    });
                }
            }

            inner.blocks = rows.into_iter().map(|(b, _)| b).collect();

            let summary = MaterializeSummary { blocks: inner.blocks.len(), sections_touched: touched.len() };
            log::info!("Timetable materialized: {} block(s) over {} section(s)", summary.blocks, summary.sections_touched);
            Ok(summary)
        })
    }
}
