use serde::{Deserialize, Serialize};
use sqlx::types::Uuid;
use time::{Date, OffsetDateTime, Time, UtcOffset, Weekday};
use validator::{Validate, ValidationError};

time::serde::format_description!(hh_mm, Time, "[hour]:[minute]");

/// Recurring weekly availability of one employee at one business.
#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklySchedule {
    pub id: Uuid,
    pub user_id: Uuid,
    pub business_id: Uuid,
    pub buffer_time_minutes: i32,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub vacation_from: Option<OffsetDateTime>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub vacation_to: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
    #[sqlx(skip)]
    #[serde(default)]
    pub day_schedules: Vec<DaySchedule>,
}

/// Working hours template for a single weekday (0 = Sunday .. 6 = Saturday).
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DaySchedule {
    pub day_of_week: i16,
    pub is_working_day: bool,
    #[serde(default, with = "hh_mm::option")]
    pub start_time: Option<Time>,
    #[serde(default, with = "hh_mm::option")]
    pub end_time: Option<Time>,
}

impl WeeklySchedule {
    pub fn day_for(&self, weekday: Weekday) -> Option<&DaySchedule> {
        let index = i16::from(weekday.number_days_from_sunday());
        self.day_schedules.iter().find(|day| day.day_of_week == index)
    }

    /// True when both vacation bounds are set and the calendar date of `date`
    /// (in its own offset) lies inside them, inclusive.
    pub fn vacation_covers(&self, date: OffsetDateTime) -> bool {
        match (self.vacation_from, self.vacation_to) {
            (Some(from), Some(to)) => {
                let day: Date = date.date();
                let first = local_date(from, date.offset());
                let last = local_date(to, date.offset());
                first <= day && day <= last
            }
            _ => false,
        }
    }
}

/// Calendar date of `instant` seen from `offset`. Bounds that cannot be
/// shifted without leaving the representable range keep their own date.
fn local_date(instant: OffsetDateTime, offset: UtcOffset) -> Date {
    instant
        .checked_to_offset(offset)
        .map_or_else(|| instant.date(), |shifted| shifted.date())
}

impl DaySchedule {
    /// Opening and closing time, or `None` when the day is off or incomplete.
    pub fn working_hours(&self) -> Option<(Time, Time)> {
        if !self.is_working_day {
            return None;
        }
        Some((self.start_time?, self.end_time?))
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_weekly_schedule"))]
pub struct UpsertWeeklySchedule {
    #[validate(range(min = 0, max = 1440, message = "Buffer time must be between 0 and 1440 minutes"))]
    #[serde(default)]
    pub buffer_time_minutes: i32,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub vacation_from: Option<OffsetDateTime>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub vacation_to: Option<OffsetDateTime>,
    #[validate(nested)]
    #[serde(default)]
    pub day_schedules: Vec<UpsertDaySchedule>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_day_schedule"))]
pub struct UpsertDaySchedule {
    #[validate(range(min = 0, max = 6, message = "Day of week must be between 0 (Sunday) and 6 (Saturday)"))]
    pub day_of_week: i16,
    pub is_working_day: bool,
    #[serde(default, with = "hh_mm::option")]
    pub start_time: Option<Time>,
    #[serde(default, with = "hh_mm::option")]
    pub end_time: Option<Time>,
}

impl UpsertDaySchedule {
    pub fn to_day_schedule(&self) -> DaySchedule {
        DaySchedule {
            day_of_week: self.day_of_week,
            is_working_day: self.is_working_day,
            start_time: self.start_time,
            end_time: self.end_time,
        }
    }
}

fn validate_weekly_schedule(payload: &UpsertWeeklySchedule) -> Result<(), ValidationError> {
    match (payload.vacation_from, payload.vacation_to) {
        (Some(from), Some(to)) if from > to => {
            return Err(ValidationError::new("vacation_range")
                .with_message("vacationFrom must not be after vacationTo".into()));
        }
        (Some(_), None) | (None, Some(_)) => {
            return Err(ValidationError::new("vacation_range")
                .with_message("vacationFrom and vacationTo must be set together".into()));
        }
        _ => {}
    }

    let mut seen = [false; 7];
    for day in &payload.day_schedules {
        // Out-of-range weekdays are reported by the nested range check.
        let Ok(index) = usize::try_from(day.day_of_week) else {
            continue;
        };
        if let Some(slot) = seen.get_mut(index) {
            if *slot {
                return Err(ValidationError::new("duplicate_weekday")
                    .with_message("Each weekday may appear at most once".into()));
            }
            *slot = true;
        }
    }

    Ok(())
}

fn validate_day_schedule(day: &UpsertDaySchedule) -> Result<(), ValidationError> {
    if !day.is_working_day {
        return Ok(());
    }
    match (day.start_time, day.end_time) {
        (Some(start), Some(end)) if start < end => Ok(()),
        (Some(_), Some(_)) => Err(ValidationError::new("working_hours")
            .with_message("startTime must be before endTime".into())),
        _ => Err(ValidationError::new("working_hours")
            .with_message("A working day needs both startTime and endTime".into())),
    }
}
