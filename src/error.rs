use thiserror::Error;

use crate::engine::conflict::ConflictReason;
use crate::engine::slot_generator::DayShortfall;

#[derive(Debug, Error)]
pub enum Error {
    #[error("File not found or could not be read: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse JSON input: {0}")]
    Deserialization(#[from] serde_json::Error),

    /// Malformed or missing input. Detected before any write.
    #[error("Invalid input: {0}")]
    Validation(String),

    /// A room, instructor or section collision. Carries the colliding
    /// entity so the caller can resolve it without a second query.
    #[error("{0}")]
    Conflict(ConflictReason),

    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    #[error("Not permitted: {0}")]
    Authorization(String),

    /// The operation is not valid for the entity's current status,
    /// or a time-boxed window (e.g. undo) has closed.
    #[error("{0}")]
    State(String),

    /// The requested slot plan does not fit inside the daily window.
    /// One entry per day that overflows.
    #[error("Slot plan exceeds the daily window on {} day(s)", .0.len())]
    WindowExceeded(Vec<DayShortfall>),

    /// Unexpected backing-store failure. The detail is logged at the
    /// point of creation and never surfaced to the caller.
    #[error("Internal storage error")]
    Storage,
}

impl Error {
    pub fn not_found(kind: &'static str, id: impl Into<String>) -> Self {
        Error::NotFound { kind, id: id.into() }
    }

    /// Logs the detail and returns the opaque storage variant.
    pub fn storage(detail: impl AsRef<str>) -> Self {
        log::error!("Storage failure: {}", detail.as_ref());
        Error::Storage
    }
}

pub type Result<T> = std::result::Result<T, Error>;
