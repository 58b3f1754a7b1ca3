use async_trait::async_trait;
use sqlx::PgPool;
use time::OffsetDateTime;
use tracing::instrument;
use uuid::Uuid;

use super::BookingRepository;
use crate::db::models::ExistingBooking;
use crate::db::DatabaseError;

#[derive(Clone)]
pub struct PgBookingRepository {
    pool: PgPool,
}

impl PgBookingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookingRepository for PgBookingRepository {
    #[instrument(skip(self))]
    async fn find_bookings(
        &self,
        employee_id: Uuid,
        from: OffsetDateTime,
        to: OffsetDateTime,
    ) -> Result<Vec<ExistingBooking>, DatabaseError> {
        let bookings = sqlx::query_as::<_, ExistingBooking>(
            r#"
            SELECT b.start_time, s.duration_minutes
            FROM bookings b
            JOIN services s ON s.id = b.service_id
            WHERE b.employee_id = $1
              AND b.start_time >= $2
              AND b.start_time < $3
              AND b.deleted_at IS NULL
            ORDER BY b.start_time
            "#,
        )
        .bind(employee_id)
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;

        Ok(bookings)
    }
}
