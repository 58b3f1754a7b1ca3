use std::sync::Arc;

use crate::availability::AvailabilityService;
use crate::config;
use crate::db::repositories::{BookingRepository, ScheduleRepository};

#[derive(Clone)]
pub struct AppState {
    pub env: config::Config,
    pub schedules: Arc<dyn ScheduleRepository>,
    pub availability: AvailabilityService,
}

impl AppState {
    pub fn new(
        env: config::Config,
        schedules: Arc<dyn ScheduleRepository>,
        bookings: Arc<dyn BookingRepository>,
    ) -> Self {
        let availability = AvailabilityService::new(schedules.clone(), bookings);
        Self {
            env,
            schedules,
            availability,
        }
    }
}
