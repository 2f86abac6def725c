use std::fmt::Debug;

use chrono::Utc;

/// Source of "now" for the engine. Abstracted so the undo-window
/// boundary can be driven deterministically in tests.
pub trait SystemClock: Send + Sync + Debug {
    /// Milliseconds since the Unix epoch.
    fn now_ms(&self) -> i64;

    // Required method to enable cloning of the trait object
    fn clone_box(&self) -> Box<dyn SystemClock>;
}

impl Clone for Box<dyn SystemClock> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

#[derive(Debug, Clone)]
pub struct WallClock;

impl SystemClock for WallClock {
    fn now_ms(&self) -> i64 {
        Utc::now().timestamp_millis()
    }

    fn clone_box(&self) -> Box<dyn SystemClock> {
        Box::new(self.clone())
    }
}
