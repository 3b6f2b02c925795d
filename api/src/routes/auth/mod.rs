//! `/auth` route group.
//!
//! - `POST /auth/login` → exchange the dashboard password for a JWT

pub mod post;

use crate::state::AppState;
use axum::{Router, routing::post};

use post::login;

pub fn auth_routes() -> Router<AppState> {
    Router::new().route("/login", post(login))
}
