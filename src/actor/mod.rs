pub mod messages;
pub mod scheduling_actor;
