use time::{Duration, OffsetDateTime, PrimitiveDateTime};

use crate::db::models::{ExistingBooking, WeeklySchedule};

/// Spacing of the candidate grid, anchored at the day's opening time.
pub const SLOT_INTERVAL_MINUTES: i64 = 15;

const MINUTES_PER_DAY: i64 = 24 * 60;

/// Start times on `date` at which a service of `service_duration_minutes`
/// fits inside working hours without touching any booking or its buffer.
///
/// `date` supplies both the calendar day and the offset the wall-clock
/// working hours are read in. `existing_bookings` is expected to be the
/// employee's bookings for that day already; no filtering happens here.
///
/// The result is ascending and every slot sits on the
/// [`SLOT_INTERVAL_MINUTES`] grid starting at the day's opening time.
/// Every "no availability" case (vacation, day off, incomplete hours,
/// nothing fits) yields an empty list.
pub fn compute_available_slots(
    schedule: &WeeklySchedule,
    existing_bookings: &[ExistingBooking],
    date: OffsetDateTime,
    service_duration_minutes: i64,
) -> Vec<OffsetDateTime> {
    // Anything longer than a day can never fit between opening and closing.
    if service_duration_minutes <= 0 || service_duration_minutes > MINUTES_PER_DAY {
        return Vec::new();
    }

    if schedule.vacation_covers(date) {
        return Vec::new();
    }

    let day = date.date();
    let Some((opens, closes)) = schedule
        .day_for(day.weekday())
        .and_then(|day_schedule| day_schedule.working_hours())
    else {
        return Vec::new();
    };

    let opening = PrimitiveDateTime::new(day, opens).assume_offset(date.offset());
    let closing = PrimitiveDateTime::new(day, closes).assume_offset(date.offset());
    let service = Duration::minutes(service_duration_minutes);
    let step = Duration::minutes(SLOT_INTERVAL_MINUTES);
    let buffer = Duration::minutes(i64::from(schedule.buffer_time_minutes.max(0)));

    let blocked: Vec<(OffsetDateTime, OffsetDateTime)> = existing_bookings
        .iter()
        .map(|booking| booking.blocked_interval(buffer))
        .collect();

    let mut slots = Vec::new();
    let mut candidate = opening;
    while candidate < closing {
        let Some(service_end) = candidate.checked_add(service) else {
            break;
        };
        if service_end > closing {
            break;
        }

        let conflicts = blocked
            .iter()
            .any(|&(blocked_start, blocked_end)| candidate < blocked_end && service_end > blocked_start);
        if !conflicts {
            slots.push(candidate);
        }

        let Some(next) = candidate.checked_add(step) else {
            break;
        };
        candidate = next;
    }

    slots
}
