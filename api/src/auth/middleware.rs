use axum::{
    body::Body,
    extract::{ConnectInfo, FromRequestParts, State},
    http::{Method, Request},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::TypedHeader;
use headers::{Origin, UserAgent};
use std::net::SocketAddr;
use tracing::info;

use crate::auth::claims::AuthUser;
use crate::state::AppState;

/// Logs method, path, IP address, whether a dashboard token was presented,
/// origin, and user-agent for each incoming HTTP request. Skips CORS
/// preflight `OPTIONS` requests.
///
/// ### Usage:
/// ```ignore
/// let app = Router::new().layer(from_fn_with_state(state, log_request));
/// ```
pub async fn log_request(State(state): State<AppState>, req: Request<Body>, next: Next) -> Response {
    let (mut parts, body) = req.into_parts();

    if parts.method == Method::OPTIONS {
        return next.run(Request::from_parts(parts, body)).await;
    }

    let ip = parts
        .extensions
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".into());

    let dashboard = AuthUser::from_request_parts(&mut parts, &state)
        .await
        .is_ok_and(|AuthUser(c)| c.dashboard);

    let origin = TypedHeader::<Origin>::from_request_parts(&mut parts, &state)
        .await
        .ok()
        .map(|TypedHeader(o)| o.to_string());

    let user_agent = TypedHeader::<UserAgent>::from_request_parts(&mut parts, &state)
        .await
        .ok()
        .map(|TypedHeader(ua)| ua.to_string());

    info!(
        method = ?parts.method,
        path = %parts.uri.path(),
        ip = %ip,
        dashboard,
        origin = origin.unwrap_or_else(|| "unknown".into()),
        user_agent = user_agent.unwrap_or_else(|| "unknown".into()),
        "Incoming request"
    );

    next.run(Request::from_parts(parts, body)).await
}
