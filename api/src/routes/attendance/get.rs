//! Read-only attendance routes: current token, token pre-check, record
//! listing and CSV export.

use axum::{
    Json,
    extract::{Query, State},
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use db::{
    csv::{HEADER, encode_record, encode_row},
    models::attendance_record::TIMESTAMP_FORMAT,
};
use services::RotationSnapshot;
use tracing::error;

use crate::{response::ApiResponse, state::AppState};

use super::common::{
    AttendanceRecordResponse, CheckTokenQuery, CheckTokenResponse, CurrentTokenResponse,
    RecordsListQuery, RecordsListResponse,
};

/// GET `/api/attendance/token`
///
/// The token the dashboard should currently render as a QR code. Reading it
/// performs any rotation that is due.
///
/// **Auth**: dashboard.
pub async fn get_current_token(
    State(state): State<AppState>,
) -> (StatusCode, Json<ApiResponse<CurrentTokenResponse>>) {
    let now = state.now();
    let rotator = state.checkin().rotator();
    let RotationSnapshot {
        token,
        next_rotation_at,
    } = rotator.snapshot(now);

    let resp = CurrentTokenResponse {
        check_in_url: state.check_in_url(&token.value),
        issued_at: token.issued_at.format(TIMESTAMP_FORMAT).to_string(),
        next_rotation_at: next_rotation_at.format(TIMESTAMP_FORMAT).to_string(),
        rotation_seconds: rotator.config().interval_seconds,
        token: token.value,
    };

    (
        StatusCode::OK,
        Json(ApiResponse::success(resp, "Current check-in token")),
    )
}

/// GET `/api/attendance/check?token=...`
///
/// Landing check for a freshly scanned QR code, so the student is told to
/// rescan before filling in the form.
///
/// **Responses**: `200 OK` if the token is accepted, `403 Forbidden` otherwise.
pub async fn check_token(
    State(state): State<AppState>,
    Query(q): Query<CheckTokenQuery>,
) -> (StatusCode, Json<ApiResponse<CheckTokenResponse>>) {
    let now = state.now();
    match q.token {
        Some(token) if state.checkin().check_token(Some(&token), now) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                CheckTokenResponse { token },
                "Token accepted",
            )),
        ),
        _ => (
            StatusCode::FORBIDDEN,
            Json(ApiResponse::error("QR code expired. Please rescan.")),
        ),
    }
}

/// GET `/api/attendance/records`
///
/// **Auth**: dashboard.
///
/// **Query**:
/// - `q` *(optional)*: case-insensitive match on name, identifier or origin
/// - `sort` *(optional)*: `timestamp` | `-timestamp` (default, newest first)
/// - `page` *(default 1)*
/// - `per_page` *(default 20, max 200)*
pub async fn list_records(
    State(state): State<AppState>,
    Query(q): Query<RecordsListQuery>,
) -> (StatusCode, Json<ApiResponse<RecordsListResponse>>) {
    let page = q.page.unwrap_or(1).max(1) as usize;
    let per_page = q.per_page.unwrap_or(20).clamp(1, 200) as usize;

    let mut records = match state.checkin().records().await {
        Ok(records) => records,
        Err(e) => {
            error!(error = %e, "Failed to read attendance records");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error("Failed to retrieve attendance records")),
            );
        }
    };

    if let Some(needle) = q
        .q
        .as_ref()
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
    {
        records.retain(|r| {
            r.name.to_lowercase().contains(&needle)
                || r.identifier.to_lowercase().contains(&needle)
                || r.origin.to_lowercase().contains(&needle)
        });
    }

    // Storage order is oldest first; a stable sort keeps append order among equal timestamps.
    match q.sort.as_deref() {
        Some("timestamp") => records.sort_by_key(|r| r.timestamp),
        _ => {
            records.reverse();
            records.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        }
    }

    let total = records.len() as i32;
    let records = records
        .into_iter()
        .skip((page - 1).saturating_mul(per_page))
        .take(per_page)
        .map(AttendanceRecordResponse::from)
        .collect();

    let resp = RecordsListResponse {
        records,
        page: page as i32,
        per_page: per_page as i32,
        total,
    };

    (
        StatusCode::OK,
        Json(ApiResponse::success(resp, "Attendance records retrieved")),
    )
}

/// GET `/api/attendance/records/export`
///
/// Export all records, in storage order, as a CSV attachment with columns
/// `Name,MIS,Timestamp,IP Address`.
///
/// **Auth**: dashboard.
///
/// **Responses**: `200 OK` `text/csv`; `404 Not Found` when nothing has been recorded.
pub async fn export_records_csv(State(state): State<AppState>) -> Response {
    let records = match state.checkin().records().await {
        Ok(records) => records,
        Err(e) => {
            error!(error = %e, "Failed to read attendance records for export");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<()>::error("Failed to export attendance records")),
            )
                .into_response();
        }
    };

    if records.is_empty() {
        return (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::<()>::error("No attendance data available to download.")),
        )
            .into_response();
    }

    let mut csv = encode_row(&HEADER);
    for record in &records {
        csv.push_str(&encode_record(record));
    }

    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/csv; charset=utf-8"),
    );
    headers.insert(
        header::CONTENT_DISPOSITION,
        HeaderValue::from_static("attachment; filename=\"attendance_records.csv\""),
    );

    (StatusCode::OK, headers, csv).into_response()
}
