use std::sync::Arc;
use std::time::Instant;

use opentelemetry::KeyValue;
use time::{Duration, OffsetDateTime};
use tracing::{debug, info, instrument};
use uuid::Uuid;

use super::dto::AvailabilityResponse;
use super::slots::compute_available_slots;
use crate::db::repositories::{BookingRepository, ScheduleRepository};
use crate::error::{AppError, AppResult};
use crate::telemetry;

/// Entry point the HTTP layer uses to ask for open slots.
#[derive(Clone)]
pub struct AvailabilityService {
    schedules: Arc<dyn ScheduleRepository>,
    bookings: Arc<dyn BookingRepository>,
}

impl AvailabilityService {
    pub fn new(
        schedules: Arc<dyn ScheduleRepository>,
        bookings: Arc<dyn BookingRepository>,
    ) -> Self {
        Self { schedules, bookings }
    }

    /// Resolves the employee's schedule and that day's bookings, then runs
    /// the slot generator. A missing schedule is reported as a day without
    /// slots, not as an error.
    #[instrument(skip(self))]
    pub async fn get_available_slots(
        &self,
        employee_id: Uuid,
        business_id: Uuid,
        date: OffsetDateTime,
        service_duration_minutes: i64,
    ) -> AppResult<AvailabilityResponse> {
        if service_duration_minutes <= 0 {
            return Err(AppError::Validation(format!(
                "serviceDurationMinutes must be positive, got {service_duration_minutes}"
            )));
        }

        let Some(schedule) = self
            .schedules
            .find_weekly_schedule(employee_id, business_id)
            .await?
        else {
            debug!("No weekly schedule for employee at business");
            return Ok(AvailabilityResponse::empty(date));
        };

        let (day_start, day_end) = utc_day_window(date);
        let bookings = self
            .bookings
            .find_bookings(employee_id, day_start, day_end)
            .await?;

        let started = Instant::now();
        let available_slots =
            compute_available_slots(&schedule, &bookings, date, service_duration_minutes);

        telemetry::get_meter("availability")
            .f64_histogram("slot_generation_duration_seconds")
            .build()
            .record(
                started.elapsed().as_secs_f64(),
                &[KeyValue::new("slots", available_slots.len() as i64)],
            );

        info!(
            bookings = bookings.len(),
            slots = available_slots.len(),
            "Computed available slots"
        );

        Ok(AvailabilityResponse {
            date,
            available_slots,
        })
    }
}

/// `[00:00 UTC, next 00:00 UTC)` of the requested calendar date.
///
/// The window is always UTC, whatever offset `date` carries, so for
/// businesses far from UTC a booking near local midnight can land in the
/// neighbouring day's window. On the last representable day the end
/// saturates instead of overflowing.
pub fn utc_day_window(date: OffsetDateTime) -> (OffsetDateTime, OffsetDateTime) {
    let start = date.date().midnight().assume_utc();
    (start, start.saturating_add(Duration::DAY))
}
