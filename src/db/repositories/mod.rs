//! Read and write contracts for the aggregates availability depends on.
//!
//! Handlers and services only see the traits; [`PgScheduleRepository`] and
//! [`PgBookingRepository`] are the PostgreSQL implementations wired up in
//! `main`.

mod booking_repository;
mod schedule_repository;

use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::db::models::{ExistingBooking, UpsertWeeklySchedule, WeeklySchedule};
use crate::db::DatabaseError;

pub use booking_repository::PgBookingRepository;
pub use schedule_repository::PgScheduleRepository;

#[async_trait]
pub trait ScheduleRepository: Send + Sync {
    /// Cheap round trip used by the health endpoint.
    async fn ping(&self) -> Result<(), DatabaseError>;

    /// Active schedule for `(user_id, business_id)` with its day entries.
    async fn find_weekly_schedule(
        &self,
        user_id: Uuid,
        business_id: Uuid,
    ) -> Result<Option<WeeklySchedule>, DatabaseError>;

    /// Replaces the schedule and all of its day entries.
    async fn upsert_weekly_schedule(
        &self,
        user_id: Uuid,
        business_id: Uuid,
        payload: &UpsertWeeklySchedule,
    ) -> Result<WeeklySchedule, DatabaseError>;

    /// Soft-deletes the schedule. Returns `false` when there was none.
    async fn delete_weekly_schedule(
        &self,
        user_id: Uuid,
        business_id: Uuid,
    ) -> Result<bool, DatabaseError>;
}

#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Bookings of `employee_id` starting in `[from, to)`, each carrying the
    /// duration of its booked service.
    async fn find_bookings(
        &self,
        employee_id: Uuid,
        from: OffsetDateTime,
        to: OffsetDateTime,
    ) -> Result<Vec<ExistingBooking>, DatabaseError>;
}
