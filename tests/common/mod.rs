//! In-memory repositories and fixtures shared by the integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::net::{IpAddr, Ipv4Addr};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use booking_backend::app_state::AppState;
use booking_backend::config::{AppConfig, Config, DatabaseConfig, Environment, ServerConfig};
use booking_backend::db::models::{DaySchedule, ExistingBooking, UpsertWeeklySchedule, WeeklySchedule};
use booking_backend::db::repositories::{BookingRepository, ScheduleRepository};
use booking_backend::db::DatabaseError;
use time::{OffsetDateTime, Time};
use uuid::Uuid;

#[derive(Default)]
pub struct InMemoryScheduleRepository {
    schedules: Mutex<HashMap<(Uuid, Uuid), WeeklySchedule>>,
    lookups: Mutex<usize>,
}

impl InMemoryScheduleRepository {
    pub fn insert(&self, schedule: WeeklySchedule) {
        self.schedules
            .lock()
            .unwrap()
            .insert((schedule.user_id, schedule.business_id), schedule);
    }

    pub fn lookups(&self) -> usize {
        *self.lookups.lock().unwrap()
    }
}

#[async_trait]
impl ScheduleRepository for InMemoryScheduleRepository {
    async fn ping(&self) -> Result<(), DatabaseError> {
        Ok(())
    }

    async fn find_weekly_schedule(
        &self,
        user_id: Uuid,
        business_id: Uuid,
    ) -> Result<Option<WeeklySchedule>, DatabaseError> {
        *self.lookups.lock().unwrap() += 1;
        Ok(self.schedules.lock().unwrap().get(&(user_id, business_id)).cloned())
    }

    async fn upsert_weekly_schedule(
        &self,
        user_id: Uuid,
        business_id: Uuid,
        payload: &UpsertWeeklySchedule,
    ) -> Result<WeeklySchedule, DatabaseError> {
        let now = OffsetDateTime::now_utc();
        let mut schedules = self.schedules.lock().unwrap();
        let (id, created_at) = schedules
            .get(&(user_id, business_id))
            .map(|existing| (existing.id, existing.created_at))
            .unwrap_or_else(|| (Uuid::now_v7(), now));

        let mut day_schedules: Vec<DaySchedule> =
            payload.day_schedules.iter().map(|day| day.to_day_schedule()).collect();
        day_schedules.sort_by_key(|day| day.day_of_week);

        let schedule = WeeklySchedule {
            id,
            user_id,
            business_id,
            buffer_time_minutes: payload.buffer_time_minutes,
            vacation_from: payload.vacation_from,
            vacation_to: payload.vacation_to,
            created_at,
            updated_at: now,
            day_schedules,
        };
        schedules.insert((user_id, business_id), schedule.clone());
        Ok(schedule)
    }

    async fn delete_weekly_schedule(
        &self,
        user_id: Uuid,
        business_id: Uuid,
    ) -> Result<bool, DatabaseError> {
        Ok(self
            .schedules
            .lock()
            .unwrap()
            .remove(&(user_id, business_id))
            .is_some())
    }
}

#[derive(Default)]
pub struct InMemoryBookingRepository {
    bookings: Mutex<Vec<(Uuid, ExistingBooking)>>,
    windows: Mutex<Vec<(OffsetDateTime, OffsetDateTime)>>,
}

impl InMemoryBookingRepository {
    pub fn add(&self, employee_id: Uuid, start_time: OffsetDateTime, duration_minutes: i32) {
        self.bookings.lock().unwrap().push((
            employee_id,
            ExistingBooking {
                start_time,
                duration_minutes,
            },
        ));
    }

    /// Windows the service asked for, in call order.
    pub fn requested_windows(&self) -> Vec<(OffsetDateTime, OffsetDateTime)> {
        self.windows.lock().unwrap().clone()
    }
}

#[async_trait]
impl BookingRepository for InMemoryBookingRepository {
    async fn find_bookings(
        &self,
        employee_id: Uuid,
        from: OffsetDateTime,
        to: OffsetDateTime,
    ) -> Result<Vec<ExistingBooking>, DatabaseError> {
        self.windows.lock().unwrap().push((from, to));
        let mut found: Vec<ExistingBooking> = self
            .bookings
            .lock()
            .unwrap()
            .iter()
            .filter(|(owner, booking)| {
                *owner == employee_id && booking.start_time >= from && booking.start_time < to
            })
            .map(|(_, booking)| booking.clone())
            .collect();
        found.sort_by_key(|booking| booking.start_time);
        Ok(found)
    }
}

pub fn test_config() -> Config {
    Config {
        server: ServerConfig {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 0,
        },
        database: DatabaseConfig {
            url: "postgres://unused".to_string(),
            max_connections: Some(1),
            min_connections: Some(0),
        },
        app: AppConfig {
            name: "booking-backend-test".to_string(),
            environment: Environment::Development,
            allowed_origins: Vec::new(),
        },
    }
}

pub struct TestContext {
    pub schedules: Arc<InMemoryScheduleRepository>,
    pub bookings: Arc<InMemoryBookingRepository>,
    pub state: AppState,
}

pub fn test_context() -> TestContext {
    let schedules = Arc::new(InMemoryScheduleRepository::default());
    let bookings = Arc::new(InMemoryBookingRepository::default());
    let state = AppState::new(test_config(), schedules.clone(), bookings.clone());
    TestContext {
        schedules,
        bookings,
        state,
    }
}

pub fn working_day(day_of_week: i16, start: Time, end: Time) -> DaySchedule {
    DaySchedule {
        day_of_week,
        is_working_day: true,
        start_time: Some(start),
        end_time: Some(end),
    }
}

pub fn weekly_schedule(
    employee_id: Uuid,
    business_id: Uuid,
    buffer_time_minutes: i32,
    day_schedules: Vec<DaySchedule>,
) -> WeeklySchedule {
    let created = OffsetDateTime::now_utc();
    WeeklySchedule {
        id: Uuid::now_v7(),
        user_id: employee_id,
        business_id,
        buffer_time_minutes,
        vacation_from: None,
        vacation_to: None,
        created_at: created,
        updated_at: created,
        day_schedules,
    }
}
