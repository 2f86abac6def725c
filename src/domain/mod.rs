pub mod block;
pub mod catalog;
pub mod clock;
pub mod identity;
pub mod ids;
pub mod request;
pub mod reservation;
pub mod timeslot;
