mod booking;
mod weekly_schedule;

pub use booking::*;
pub use weekly_schedule::*;
