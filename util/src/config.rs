//! Global application configuration manager.
//!
//! `AppConfig` is a lazily initialized, globally accessible singleton containing
//! runtime configuration values loaded from environment variables. It provides
//! thread-safe access and mutation for testing or overrides in runtime environments.

use std::env;
use std::sync::{OnceLock, RwLock};

/// Represents the complete application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: String,
    pub project_name: String,
    pub log_level: String,
    pub log_file: String,
    pub log_to_stdout: bool,
    pub host: String,
    pub port: u16,
    /// Base URL students reach the service on; embedded in the QR check-in link.
    pub public_url: String,
    pub attendance_file: String,
    pub rotation_seconds: u64,
    pub token_bytes: usize,
    pub dashboard_password: String,
    pub jwt_secret: String,
    pub jwt_duration_minutes: u64,
}

/// Lazily-initialized, thread-safe singleton instance of `AppConfig`.
static CONFIG_INSTANCE: OnceLock<RwLock<AppConfig>> = OnceLock::new();

impl AppConfig {
    /// Loads the configuration from `.env` and environment variables.
    ///
    /// This method is used internally to populate the singleton. It panics
    /// if required variables are missing or improperly formatted.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".into());
        let port: u16 = env::var("PORT")
            .unwrap_or_else(|_| "5000".into())
            .parse()
            .expect("PORT must be a valid port number");
        let public_url = env::var("PUBLIC_URL").unwrap_or_else(|_| format!("http://{host}:{port}"));

        Self {
            env: env::var("APP_ENV").unwrap_or_else(|_| "development".into()),
            project_name: env::var("PROJECT_NAME").unwrap_or_else(|_| "qr-attendance".into()),
            log_level: env::var("LOG_LEVEL")
                .unwrap_or_else(|_| "api=info,services=info,db=info".into()),
            log_file: env::var("LOG_FILE").unwrap_or_else(|_| "api.log".into()),
            log_to_stdout: env::var("LOG_TO_STDOUT").unwrap_or_else(|_| "false".into()) == "true",
            host,
            port,
            public_url: public_url.trim_end_matches('/').to_string(),
            attendance_file: env::var("ATTENDANCE_FILE")
                .unwrap_or_else(|_| "data/attendance.csv".into()),
            rotation_seconds: env::var("QR_REFRESH_INTERVAL")
                .unwrap_or_else(|_| "15".into())
                .parse()
                .expect("QR_REFRESH_INTERVAL must be a number of seconds"),
            token_bytes: env::var("QR_TOKEN_BYTES")
                .unwrap_or_else(|_| "8".into())
                .parse()
                .expect("QR_TOKEN_BYTES must be a positive integer"),
            dashboard_password: env::var("DASHBOARD_PASSWORD")
                .expect("DASHBOARD_PASSWORD is required"),
            jwt_secret: env::var("JWT_SECRET").expect("JWT_SECRET is required"),
            jwt_duration_minutes: env::var("JWT_DURATION_MINUTES")
                .unwrap_or("60".into())
                .parse()
                .expect("JWT_DURATION_MINUTES must be a valid integer"),
        }
    }

    /// Returns a shared reference to the global configuration.
    ///
    /// # Panics
    /// Panics if the lock cannot be acquired.
    pub fn global() -> std::sync::RwLockReadGuard<'static, AppConfig> {
        CONFIG_INSTANCE
            .get_or_init(|| RwLock::new(AppConfig::from_env()))
            .read()
            .expect("Failed to acquire AppConfig read lock")
    }

    /// Resets the configuration by reloading from environment variables.
    ///
    /// Useful in tests to clear overrides.
    pub fn reset() {
        if let Some(lock) = CONFIG_INSTANCE.get() {
            let mut guard = lock
                .write()
                .expect("Failed to acquire AppConfig write lock");
            *guard = AppConfig::from_env();
        }
    }

    /// Generic internal setter for any field in the config.
    ///
    /// Used by public per-field setter methods.
    fn set_field<F>(setter: F)
    where
        F: FnOnce(&mut AppConfig),
    {
        let lock = CONFIG_INSTANCE.get_or_init(|| RwLock::new(AppConfig::from_env()));
        let mut guard = lock
            .write()
            .expect("Failed to acquire AppConfig write lock");
        setter(&mut guard);
    }

    // --- Per-field setters below ---

    pub fn set_port(value: u16) {
        AppConfig::set_field(|cfg| cfg.port = value);
    }

    pub fn set_attendance_file(value: impl Into<String>) {
        AppConfig::set_field(|cfg| cfg.attendance_file = value.into());
    }

    pub fn set_rotation_seconds(value: u64) {
        AppConfig::set_field(|cfg| cfg.rotation_seconds = value);
    }

    pub fn set_token_bytes(value: usize) {
        AppConfig::set_field(|cfg| cfg.token_bytes = value);
    }

    pub fn set_dashboard_password(value: impl Into<String>) {
        AppConfig::set_field(|cfg| cfg.dashboard_password = value.into());
    }
}
