use serde::{Deserialize, Serialize};

use crate::domain::ids::{RequestId, TimeSlotId};

/// Wire shape of an accept (select-slots) call. The acting instructor
/// comes from the caller's identity, not from the body.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct AcceptDto {
    pub request_id: String,
    pub slot_ids: Vec<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct UndoDto {
    pub request_id: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct RescheduleDto {
    pub request_id: String,
    pub slot_ids: Vec<String>,
}

impl AcceptDto {
    pub fn request_id(&self) -> RequestId {
        RequestId::new(self.request_id.clone())
    }

    pub fn slot_ids(&self) -> Vec<TimeSlotId> {
        self.slot_ids.iter().map(|s| TimeSlotId::new(s.as_str())).collect()
    }
}

impl UndoDto {
    pub fn request_id(&self) -> RequestId {
        RequestId::new(self.request_id.clone())
    }
}

impl RescheduleDto {
    pub fn request_id(&self) -> RequestId {
        RequestId::new(self.request_id.clone())
    }

    pub fn slot_ids(&self) -> Vec<TimeSlotId> {
        self.slot_ids.iter().map(|s| TimeSlotId::new(s.as_str())).collect()
    }
}
