use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};

use crate::app_state::AppState;
use crate::availability::{AvailabilityQuery, AvailabilityResponse};
use crate::error::{AppError, AppResult};

/// `GET /api/availability?employeeId=&businessId=&date=&serviceDurationMinutes=`
pub async fn get_availability(
    State(state): State<AppState>,
    query: Result<Query<AvailabilityQuery>, QueryRejection>,
) -> AppResult<Json<AvailabilityResponse>> {
    let Query(query) = query.map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;

    let response = state
        .availability
        .get_available_slots(
            query.employee_id,
            query.business_id,
            query.date,
            query.service_duration_minutes,
        )
        .await?;

    Ok(Json(response))
}
