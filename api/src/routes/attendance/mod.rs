//! `/attendance` route group.
//!
//! Student-facing routes (`/check`, `/submit`) are public; the token
//! display, record listing and export sit behind `allow_dashboard`.

use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{get, post},
};

use crate::auth::guards::allow_dashboard;
use crate::state::AppState;

mod common;
mod get;
mod post;

pub use common::{AttendanceRecordResponse, CurrentTokenResponse, RecordsListResponse};
pub use get::{check_token, export_records_csv, get_current_token, list_records};
pub use post::submit_attendance;

pub fn attendance_routes(app_state: AppState) -> Router<AppState> {
    Router::new()
        .route("/token", get(get_current_token).route_layer(from_fn_with_state(app_state.clone(), allow_dashboard)))
        .route("/check", get(check_token))
        .route("/submit", post(submit_attendance))
        .route("/records", get(list_records).route_layer(from_fn_with_state(app_state.clone(), allow_dashboard)))
        .route("/records/export", get(export_records_csv).route_layer(from_fn_with_state(app_state, allow_dashboard)))
}
