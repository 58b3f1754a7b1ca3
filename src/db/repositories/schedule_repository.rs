use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};
use tracing::{debug, instrument};
use uuid::Uuid;

use super::ScheduleRepository;
use crate::db::models::{DaySchedule, UpsertWeeklySchedule, WeeklySchedule};
use crate::db::DatabaseError;

const WEEKLY_SCHEDULE_COLUMNS: &str = "id, user_id, business_id, buffer_time_minutes, \
     vacation_from, vacation_to, created_at, updated_at";

const SNAPSHOT_READ: &str = "SET TRANSACTION ISOLATION LEVEL REPEATABLE READ, READ ONLY";

#[derive(Clone)]
pub struct PgScheduleRepository {
    pool: PgPool,
}

impl PgScheduleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn load_days(
        tx: &mut Transaction<'_, Postgres>,
        weekly_schedule_id: Uuid,
    ) -> Result<Vec<DaySchedule>, DatabaseError> {
        let days = sqlx::query_as::<_, DaySchedule>(
            r#"
            SELECT day_of_week, is_working_day, start_time, end_time
            FROM day_schedules
            WHERE weekly_schedule_id = $1 AND deleted_at IS NULL
            ORDER BY day_of_week
            "#,
        )
        .bind(weekly_schedule_id)
        .fetch_all(&mut **tx)
        .await?;

        Ok(days)
    }

    async fn retire_days(
        tx: &mut Transaction<'_, Postgres>,
        weekly_schedule_id: Uuid,
    ) -> Result<(), DatabaseError> {
        sqlx::query(
            r#"
            UPDATE day_schedules
            SET deleted_at = NOW()
            WHERE weekly_schedule_id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(weekly_schedule_id)
        .execute(&mut **tx)
        .await?;

        Ok(())
    }
}

#[async_trait]
impl ScheduleRepository for PgScheduleRepository {
    async fn ping(&self) -> Result<(), DatabaseError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn find_weekly_schedule(
        &self,
        user_id: Uuid,
        business_id: Uuid,
    ) -> Result<Option<WeeklySchedule>, DatabaseError> {
        let query = format!(
            "SELECT {WEEKLY_SCHEDULE_COLUMNS} FROM weekly_schedules \
             WHERE user_id = $1 AND business_id = $2 AND deleted_at IS NULL"
        );
        // Schedule row and day rows must come from the same snapshot.
        let mut tx = self.pool.begin().await?;
        sqlx::query(SNAPSHOT_READ)
            .execute(&mut *tx)
            .await?;

        let schedule = sqlx::query_as::<_, WeeklySchedule>(&query)
            .bind(user_id)
            .bind(business_id)
            .fetch_optional(&mut *tx)
            .await?;

        let Some(mut schedule) = schedule else {
            tx.commit().await?;
            return Ok(None);
        };
        schedule.day_schedules = Self::load_days(&mut tx, schedule.id).await?;
        tx.commit().await?;

        Ok(Some(schedule))
    }

    #[instrument(skip(self, payload))]
    async fn upsert_weekly_schedule(
        &self,
        user_id: Uuid,
        business_id: Uuid,
        payload: &UpsertWeeklySchedule,
    ) -> Result<WeeklySchedule, DatabaseError> {
        let mut tx = self.pool.begin().await?;

        let update = format!(
            "UPDATE weekly_schedules \
             SET buffer_time_minutes = $3, vacation_from = $4, vacation_to = $5, updated_at = NOW() \
             WHERE user_id = $1 AND business_id = $2 AND deleted_at IS NULL \
             RETURNING {WEEKLY_SCHEDULE_COLUMNS}"
        );
        let updated = sqlx::query_as::<_, WeeklySchedule>(&update)
            .bind(user_id)
            .bind(business_id)
            .bind(payload.buffer_time_minutes)
            .bind(payload.vacation_from)
            .bind(payload.vacation_to)
            .fetch_optional(&mut *tx)
            .await?;

        let mut schedule = match updated {
            Some(schedule) => {
                Self::retire_days(&mut tx, schedule.id).await?;
                debug!(schedule_id = %schedule.id, "replacing existing weekly schedule");
                schedule
            }
            None => {
                let insert = format!(
                    "INSERT INTO weekly_schedules \
                     (id, user_id, business_id, buffer_time_minutes, vacation_from, vacation_to) \
                     VALUES ($1, $2, $3, $4, $5, $6) \
                     RETURNING {WEEKLY_SCHEDULE_COLUMNS}"
                );
                sqlx::query_as::<_, WeeklySchedule>(&insert)
                    .bind(Uuid::now_v7())
                    .bind(user_id)
                    .bind(business_id)
                    .bind(payload.buffer_time_minutes)
                    .bind(payload.vacation_from)
                    .bind(payload.vacation_to)
                    .fetch_one(&mut *tx)
                    .await?
            }
        };

        for day in &payload.day_schedules {
            sqlx::query(
                r#"
                INSERT INTO day_schedules
                    (id, weekly_schedule_id, day_of_week, is_working_day, start_time, end_time)
                VALUES ($1, $2, $3, $4, $5, $6)
                "#,
            )
            .bind(Uuid::now_v7())
            .bind(schedule.id)
            .bind(day.day_of_week)
            .bind(day.is_working_day)
            .bind(day.start_time)
            .bind(day.end_time)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        let mut days: Vec<DaySchedule> = payload
            .day_schedules
            .iter()
            .map(|day| day.to_day_schedule())
            .collect();
        days.sort_by_key(|day| day.day_of_week);
        schedule.day_schedules = days;

        Ok(schedule)
    }

    #[instrument(skip(self))]
    async fn delete_weekly_schedule(
        &self,
        user_id: Uuid,
        business_id: Uuid,
    ) -> Result<bool, DatabaseError> {
        let mut tx = self.pool.begin().await?;

        let retired: Option<Uuid> = sqlx::query_scalar(
            r#"
            UPDATE weekly_schedules
            SET deleted_at = NOW()
            WHERE user_id = $1 AND business_id = $2 AND deleted_at IS NULL
            RETURNING id
            "#,
        )
        .bind(user_id)
        .bind(business_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(schedule_id) = retired else {
            return Ok(false);
        };
        Self::retire_days(&mut tx, schedule_id).await?;
        tx.commit().await?;

        Ok(true)
    }
}
