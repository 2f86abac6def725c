use serde::{Deserialize, Serialize};

use crate::domain::catalog::Shift;

/// Wire shape of a batch auto-assign trigger.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct AutoAssignDto {
    pub shift: Shift,
    pub semester: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auto_assign_payload_parses() {
        let dto: AutoAssignDto = serde_json::from_str(r#"{ "shift": "Morning", "semester": 5 }"#).unwrap();
        assert_eq!(dto.shift, Shift::Morning);
        assert_eq!(dto.semester, 5);
    }
}
