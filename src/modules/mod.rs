pub mod availability;
pub mod schedules;
