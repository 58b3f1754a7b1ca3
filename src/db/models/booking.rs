use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};

/// An already-booked appointment, reduced to what availability needs:
/// when it starts and how long the booked service lasts.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExistingBooking {
    #[serde(with = "time::serde::rfc3339")]
    pub start_time: OffsetDateTime,
    pub duration_minutes: i32,
}

impl ExistingBooking {
    /// Saturates at the edge of the representable range.
    pub fn end_time(&self) -> OffsetDateTime {
        self.start_time
            .saturating_add(Duration::minutes(i64::from(self.duration_minutes)))
    }

    /// Half-open interval the booking keeps unavailable once `buffer` is
    /// reserved on both sides.
    pub fn blocked_interval(&self, buffer: Duration) -> (OffsetDateTime, OffsetDateTime) {
        (
            self.start_time.saturating_sub(buffer),
            self.end_time().saturating_add(buffer),
        )
    }
}
