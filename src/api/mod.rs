pub mod assign_dto;
pub mod campus_dto;
pub mod schedule_dto;
pub mod slot_dto;
