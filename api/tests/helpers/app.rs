use api::{
    routes::routes,
    state::{AppState, AuthSettings},
};
use axum::{
    Router,
    body::Body,
    extract::ConnectInfo,
    http::{Request, StatusCode},
};
use chrono::{NaiveDate, NaiveDateTime};
use db::FileStore;
use serde_json::Value;
use services::{CheckInService, Clock, ManualClock, RotationConfig, TokenRotator};
use std::{
    net::{IpAddr, Ipv4Addr, SocketAddr},
    path::PathBuf,
    sync::Arc,
};
use tempfile::TempDir;
use tower::ServiceExt;

pub const TEST_PASSWORD: &str = "letmein";

pub struct TestApp {
    pub app: Router,
    pub state: AppState,
    pub clock: Arc<ManualClock>,
    pub store_path: PathBuf,
    _tmp: TempDir,
}

/// Monday morning, 09:00:00 local.
pub fn start() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 9, 8)
        .unwrap()
        .and_hms_opt(9, 0, 0)
        .unwrap()
}

pub async fn make_test_app() -> TestApp {
    let tmp = TempDir::new().expect("failed to create tempdir");
    let store_path = tmp.path().join("attendance.csv");

    let clock = Arc::new(ManualClock::new(start()));
    let rotator = Arc::new(TokenRotator::new(RotationConfig::default(), clock.now()));
    let store = Arc::new(FileStore::open(&store_path).await.expect("open store"));
    let checkin = Arc::new(CheckInService::new(rotator, store));

    let state = AppState::new(
        checkin,
        clock.clone(),
        AuthSettings::new("test-secret", 60, TEST_PASSWORD),
        "http://attend.test/",
    );
    let app = Router::new().nest("/api", routes(state.clone()));

    TestApp {
        app,
        state,
        clock,
        store_path,
        _tmp: tmp,
    }
}

impl TestApp {
    /// Sends a request and decodes the body as JSON (`Value::Null` for non-JSON bodies).
    pub async fn send(&self, req: Request<Body>) -> (StatusCode, Value) {
        let response = self.app.clone().oneshot(req).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = serde_json::from_slice(&body).unwrap_or(Value::Null);
        (status, json)
    }

    /// Token the dashboard would currently display.
    pub fn current_token(&self) -> String {
        self.state
            .checkin()
            .rotator()
            .current_token(self.clock.now())
            .value
    }

    pub async fn dashboard_token(&self) -> String {
        let req = json_request(
            "POST",
            "/api/auth/login",
            serde_json::json!({ "password": TEST_PASSWORD }),
        );
        let (status, json) = self.send(req).await;
        assert_eq!(status, StatusCode::OK);
        json["data"]["token"].as_str().unwrap().to_string()
    }
}

pub fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn form_request(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn get_request(uri: &str, bearer: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(token) = bearer {
        builder = builder.header("Authorization", format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

/// Attaches a `ConnectInfo<SocketAddr>` the way `into_make_service_with_connect_info` would.
pub fn with_connect_info(mut req: Request<Body>, ip: [u8; 4]) -> Request<Body> {
    let addr = SocketAddr::new(IpAddr::V4(Ipv4Addr::from(ip)), 43210);
    req.extensions_mut().insert(ConnectInfo(addr));
    req
}
