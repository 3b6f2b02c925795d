use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};
use validator::Validate;

use crate::auth::generate_jwt;
use crate::response::{ApiResponse, format_validation_errors};
use crate::state::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Debug, Serialize, Default)]
pub struct LoginResponse {
    pub token: String,
    pub expires_at: String,
}

/// POST /auth/login
///
/// Exchange the shared dashboard password for a bearer token.
///
/// ### Request Body
/// ```json
/// { "password": "..." }
/// ```
///
/// ### Responses
/// - `200 OK` with `{ "token": "...", "expires_at": "2025-09-08T10:00:00+00:00" }`
/// - `400 Bad Request` when the password is empty
/// - `401 Unauthorized` when the password is wrong
/// - `500 Internal Server Error` if the token cannot be signed
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> (StatusCode, Json<ApiResponse<LoginResponse>>) {
    if let Err(validation_errors) = req.validate() {
        let error_message = format_validation_errors(&validation_errors);
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::error(error_message)),
        );
    }

    if !state.auth().password_matches(&req.password) {
        warn!("Rejected dashboard login with wrong password");
        return (
            StatusCode::UNAUTHORIZED,
            Json(ApiResponse::error("Invalid password. Please try again.")),
        );
    }

    match generate_jwt(state.auth()) {
        Ok((token, expires_at)) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                LoginResponse { token, expires_at },
                "Login successful",
            )),
        ),
        Err(e) => {
            error!(error = %e, "Failed to sign dashboard token");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error("Failed to issue token")),
            )
        }
    }
}
