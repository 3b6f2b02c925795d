//! HTTP route entry point for `/api/...`.
//!
//! Route groups:
//! - `/health` → health check (public)
//! - `/auth` → dashboard login (public)
//! - `/attendance` → token display, check-in, records and export
//!   (check-in routes public, the rest behind the dashboard guard)

use crate::routes::{attendance::attendance_routes, auth::auth_routes, health::health_routes};
use crate::state::AppState;
use axum::Router;

pub mod attendance;
pub mod auth;
pub mod health;

/// Builds the complete `/api` router with its state applied.
pub fn routes(app_state: AppState) -> Router {
    Router::new()
        .nest("/health", health_routes())
        .nest("/auth", auth_routes())
        .nest("/attendance", attendance_routes(app_state.clone()))
        .with_state(app_state)
}
