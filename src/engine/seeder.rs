use serde::Serialize;
use uuid::Uuid;

use crate::domain::identity::IdentityContext;
use crate::domain::ids::RequestId;
use crate::domain::request::CourseRequest;
use crate::engine::SchedulingEngine;
use crate::error::Result;

#[derive(Serialize, Debug, Clone)]
pub struct SeedSummary {
    pub created: usize,
}

impl SchedulingEngine {
    /// Creates one pending course request per offering that has no
    /// live request yet. Offerings already covered by a pending,
    /// accepted or rescheduled request are left alone, so re-running
    /// the seeder is harmless.
    pub fn seed_requests(&self, identity: &IdentityContext) -> Result<SeedSummary> {
        identity.require_admin()?;

        self.store().transaction(|inner| {
            let mut offerings: Vec<_> = inner.offerings.values().cloned().collect();
            offerings.sort_by(|a, b| a.id.cmp(&b.id));

            let mut created = 0;
            for offering in offerings {
                if inner.live_request_for_offering(&offering.id).is_some() {
                    continue;
                }

                let request = CourseRequest::new(
                    RequestId::new(Uuid::new_v4().to_string()),
                    offering.course_id.clone(),
                    offering.section_id.clone(),
                    offering.id.clone(),
                );
                inner.insert_request(request);
                created += 1;
            }

            log::info!("Request seeding created {} pending request(s)", created);
            Ok(SeedSummary { created })
        })
    }
}
