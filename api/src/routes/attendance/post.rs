use axum::{
    Form, Json,
    extract::{ConnectInfo, FromRequest, Request, State},
    http::{StatusCode, header},
};
use services::{CheckInError, SubmitAttendance};
use std::net::SocketAddr;
use tracing::error;

use crate::{response::ApiResponse, state::AppState};

use super::common::{AttendanceRecordResponse, SubmitAttendanceReq};

/// POST `/api/attendance/submit`
///
/// Records a check-in for the scanned token. The client's peer IP is the
/// duplicate-guard key: one accepted submission per origin per day.
///
/// **Body**: `{ "token": "...", "name": "Alice", "identifier": "111" }` as
/// JSON, or the same fields (`student_name`/`student_mis` also accepted)
/// form-urlencoded.
///
/// **Responses**
/// - `201 Created` with the stored record
/// - `400 Bad Request` / `415 Unsupported Media Type` body could not be read
/// - `403 Forbidden` token missing or expired (rescan)
/// - `400 Bad Request` name or identifier blank (token still usable)
/// - `409 Conflict` origin already recorded today
/// - `500 Internal Server Error` store failure
pub async fn submit_attendance(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    req: Request,
) -> (StatusCode, Json<ApiResponse<AttendanceRecordResponse>>) {
    let body = match read_submission(req).await {
        Ok(body) => body,
        Err((status, message)) => {
            return (
                status,
                Json(ApiResponse::error(format!("Invalid submission: {message}"))),
            );
        }
    };

    let now = state.now();
    let origin = addr.ip().to_string();

    let params = SubmitAttendance {
        token: body.token,
        name: body.name,
        identifier: body.identifier,
        origin: origin.clone(),
    };

    match state.checkin().submit(params, now).await {
        Ok(record) => (
            StatusCode::CREATED,
            Json(ApiResponse::success(
                AttendanceRecordResponse::from(record),
                "Attendance recorded",
            )),
        ),
        Err(e) if e.is_server_error() => {
            error!(error = %e, origin = %origin, "Attendance store failure");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error("Failed to record attendance")),
            )
        }
        Err(e) => {
            let status = match &e {
                CheckInError::ExpiredToken => StatusCode::FORBIDDEN,
                CheckInError::Validation(_) => StatusCode::BAD_REQUEST,
                CheckInError::DuplicateSubmission => StatusCode::CONFLICT,
                CheckInError::StoreWrite(_) | CheckInError::StoreRead(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            };
            (status, Json(ApiResponse::error(e.to_string())))
        }
    }
}

/// Reads the submission as a form post or JSON, depending on `Content-Type`.
async fn read_submission(req: Request) -> Result<SubmitAttendanceReq, (StatusCode, String)> {
    let is_form = req
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("application/x-www-form-urlencoded"));

    if is_form {
        Form::<SubmitAttendanceReq>::from_request(req, &())
            .await
            .map(|Form(body)| body)
            .map_err(|rejection| (rejection.status(), rejection.body_text()))
    } else {
        Json::<SubmitAttendanceReq>::from_request(req, &())
            .await
            .map(|Json(body)| body)
            .map_err(|rejection| (rejection.status(), rejection.body_text()))
    }
}
