use serde::{Deserialize, Serialize};

use crate::domain::ids::InstructorId;
use crate::error::{Error, Result};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Admin,
    Instructor,
}

/// The acting user, supplied by the external identity layer.
///
/// Authorization inside the engine is ownership-based: instructor
/// operations compare this identity against the request's bound
/// instructor; administrative operations require the Admin role.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct IdentityContext {
    pub user_id: String,
    pub role: Role,
}

impl IdentityContext {
    pub fn admin(user_id: impl Into<String>) -> Self {
        IdentityContext { user_id: user_id.into(), role: Role::Admin }
    }

    pub fn instructor(user_id: impl Into<String>) -> Self {
        IdentityContext { user_id: user_id.into(), role: Role::Instructor }
    }

    pub fn as_instructor_id(&self) -> InstructorId {
        InstructorId::new(self.user_id.clone())
    }

    pub fn require_admin(&self) -> Result<()> {
        if self.role != Role::Admin {
            return Err(Error::Authorization(format!("User {} lacks the Admin role", self.user_id)));
        }
        Ok(())
    }
}
