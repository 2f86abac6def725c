pub mod allocator;
pub mod conflict;
pub mod coordinator;
pub mod materializer;
pub mod queries;
pub mod seeder;
pub mod slot_generator;

use crate::domain::clock::{SystemClock, WallClock};
use crate::store::TimetableStore;

/// The scheduling core. One engine per deployment; every operation is
/// a method on this struct, with the implementations split per
/// component module.
///
/// The engine itself holds no mutable state: all writes go through
/// the store's transactions, so a cloned engine shares the same
/// committed state.
#[derive(Debug)]
pub struct SchedulingEngine {
    store: TimetableStore,
    clock: Box<dyn SystemClock>,
}

impl SchedulingEngine {
    pub fn new(store: TimetableStore, clock: Box<dyn SystemClock>) -> Self {
        SchedulingEngine { store, clock }
    }

    pub fn with_wall_clock(store: TimetableStore) -> Self {
        Self::new(store, Box::new(WallClock))
    }

    pub fn store(&self) -> &TimetableStore {
        &self.store
    }

    pub(crate) fn now_ms(&self) -> i64 {
        self.clock.now_ms()
    }
}

impl Clone for SchedulingEngine {
    fn clone(&self) -> Self {
        SchedulingEngine { store: self.store.clone(), clock: self.clock.clone_box() }
    }
}
