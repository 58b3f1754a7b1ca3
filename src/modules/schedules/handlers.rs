use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::app_state::AppState;
use crate::db::models::{UpsertWeeklySchedule, WeeklySchedule};
use crate::error::{AppError, AppResult};

pub async fn get_schedule(
    State(state): State<AppState>,
    Path((business_id, employee_id)): Path<(Uuid, Uuid)>,
) -> AppResult<Json<WeeklySchedule>> {
    state
        .schedules
        .find_weekly_schedule(employee_id, business_id)
        .await?
        .map(Json)
        .ok_or_else(|| {
            AppError::NotFound(format!(
                "No schedule for employee {employee_id} at business {business_id}"
            ))
        })
}

pub async fn put_schedule(
    State(state): State<AppState>,
    Path((business_id, employee_id)): Path<(Uuid, Uuid)>,
    payload: Result<Json<UpsertWeeklySchedule>, JsonRejection>,
) -> AppResult<Json<WeeklySchedule>> {
    let Json(payload) = payload.map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
    payload.validate()?;

    let schedule = state
        .schedules
        .upsert_weekly_schedule(employee_id, business_id, &payload)
        .await?;

    info!(
        schedule_id = %schedule.id,
        %employee_id,
        %business_id,
        days = schedule.day_schedules.len(),
        "Saved weekly schedule"
    );

    Ok(Json(schedule))
}

pub async fn delete_schedule(
    State(state): State<AppState>,
    Path((business_id, employee_id)): Path<(Uuid, Uuid)>,
) -> AppResult<StatusCode> {
    if state
        .schedules
        .delete_weekly_schedule(employee_id, business_id)
        .await?
    {
        info!(%employee_id, %business_id, "Removed weekly schedule");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!(
            "No schedule for employee {employee_id} at business {business_id}"
        )))
    }
}
