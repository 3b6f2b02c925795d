//! Application state container shared across Axum route handlers.
//!
//! Holds the check-in workflow, the clock every request reads its `now` from,
//! and the dashboard auth settings. Cloning is cheap; everything is behind `Arc`.

use chrono::{NaiveDateTime, TimeDelta};
use db::{FileStore, StoreError};
use jsonwebtoken::{DecodingKey, EncodingKey};
use services::{CheckInService, Clock, RotationConfig, SystemClock, TokenRotator};
use std::sync::Arc;
use tracing::warn;
use util::config::AppConfig;

/// Longest dashboard session a token may grant.
pub const MAX_JWT_DURATION_DAYS: i64 = 366;

/// Signing keys and the shared password that unlock the dashboard.
pub struct AuthSettings {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    jwt_duration: TimeDelta,
    dashboard_password: String,
}

impl AuthSettings {
    pub fn new(jwt_secret: &str, jwt_duration_minutes: u64, dashboard_password: impl Into<String>) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(jwt_secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(jwt_secret.as_bytes()),
            jwt_duration: bounded_jwt_duration(jwt_duration_minutes),
            dashboard_password: dashboard_password.into(),
        }
    }

    pub fn encoding_key(&self) -> &EncodingKey {
        &self.encoding_key
    }

    pub fn decoding_key(&self) -> &DecodingKey {
        &self.decoding_key
    }

    pub fn jwt_duration(&self) -> TimeDelta {
        self.jwt_duration
    }

    pub fn password_matches(&self, candidate: &str) -> bool {
        self.dashboard_password == candidate
    }
}

/// Converts the configured token lifetime, capping it at
/// [`MAX_JWT_DURATION_DAYS`] so expiry arithmetic cannot overflow.
fn bounded_jwt_duration(minutes: u64) -> TimeDelta {
    let cap = TimeDelta::days(MAX_JWT_DURATION_DAYS);
    match i64::try_from(minutes).ok().and_then(TimeDelta::try_minutes) {
        Some(duration) if duration <= cap => duration,
        _ => {
            warn!(
                requested_minutes = minutes,
                max_days = MAX_JWT_DURATION_DAYS,
                "JWT duration out of range, capping"
            );
            cap
        }
    }
}

/// Central application state shared across the server.
#[derive(Clone)]
pub struct AppState {
    checkin: Arc<CheckInService>,
    clock: Arc<dyn Clock>,
    auth: Arc<AuthSettings>,
    public_url: Arc<str>,
}

impl AppState {
    pub fn new(
        checkin: Arc<CheckInService>,
        clock: Arc<dyn Clock>,
        auth: AuthSettings,
        public_url: &str,
    ) -> Self {
        Self {
            checkin,
            clock,
            auth: Arc::new(auth),
            public_url: Arc::from(public_url.trim_end_matches('/')),
        }
    }

    /// Builds the production state: system clock, flat-file store at
    /// `attendance_file`, rotator seeded at startup time.
    pub async fn from_config(config: &AppConfig) -> Result<Self, StoreError> {
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let rotator = Arc::new(TokenRotator::new(
            RotationConfig::new(config.rotation_seconds, config.token_bytes),
            clock.now(),
        ));
        let store = Arc::new(FileStore::open(&config.attendance_file).await?);
        let checkin = Arc::new(CheckInService::new(rotator, store));
        let auth = AuthSettings::new(
            &config.jwt_secret,
            config.jwt_duration_minutes,
            config.dashboard_password.clone(),
        );

        Ok(Self::new(checkin, clock, auth, &config.public_url))
    }

    pub fn checkin(&self) -> &CheckInService {
        &self.checkin
    }

    pub fn auth(&self) -> &AuthSettings {
        &self.auth
    }

    /// The single reading of the clock a request should use for both the
    /// rotation decision and any record timestamp.
    pub fn now(&self) -> NaiveDateTime {
        self.clock.now()
    }

    /// Link a student opens by scanning the QR code.
    pub fn check_in_url(&self, token: &str) -> String {
        format!("{}/check-in?token={}", self.public_url, token)
    }
}
