//! Bookable time-slot computation.
//!
//! [`slots`] holds the pure generator; [`service`] resolves the schedule and
//! booking snapshot through the repository traits and feeds it.

pub mod dto;
pub mod service;
pub mod slots;

pub use dto::{AvailabilityQuery, AvailabilityResponse};
pub use service::AvailabilityService;
pub use slots::{compute_available_slots, SLOT_INTERVAL_MINUTES};
