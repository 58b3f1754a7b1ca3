use axum::{routing::get, Router};

use super::handlers::{delete_schedule, get_schedule, put_schedule};
use crate::app_state::AppState;

pub fn schedule_routes() -> Router<AppState> {
    Router::new().route(
        "/businesses/:business_id/employees/:employee_id/schedule",
        get(get_schedule).put(put_schedule).delete(delete_schedule),
    )
}
