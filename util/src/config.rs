//! Global application configuration.
//!
//! `AppConfig` is a lazily initialized, globally accessible singleton holding
//! runtime configuration loaded from environment variables. Per-field setters
//! exist so tests can override values without touching the process
//! environment.

use std::env;
use std::sync::{OnceLock, RwLock};

/// Runtime configuration, loaded once from `.env` / environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: String,
    pub project_name: String,
    pub log_level: String,
    pub log_file: String,
    pub log_to_stdout: bool,
    pub host: String,
    pub port: u16,
    pub database_path: String,
    pub upload_root: String,
    pub max_upload_mb: usize,
    pub jwt_secret: String,
    pub jwt_duration_minutes: i64,
}

static CONFIG_INSTANCE: OnceLock<RwLock<AppConfig>> = OnceLock::new();

impl AppConfig {
    /// Populates the configuration from `.env` and the environment.
    ///
    /// `JWT_SECRET` has no usable default; it is left empty here and the
    /// server refuses to start on an empty secret (tests inject one through
    /// [`AppConfig::set_jwt_secret`]).
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            env: env::var("APP_ENV").unwrap_or_else(|_| "development".into()),
            project_name: env::var("PROJECT_NAME").unwrap_or_else(|_| "opencourse-api".into()),
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "api=info".into()),
            log_file: env::var("LOG_FILE").unwrap_or_else(|_| "api.log".into()),
            log_to_stdout: env::var("LOG_TO_STDOUT").unwrap_or_else(|_| "false".into()) == "true",
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".into()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".into())
                .parse()
                .expect("PORT must be a valid port number"),
            database_path: env::var("DATABASE_PATH").unwrap_or_else(|_| "data/store.json".into()),
            upload_root: env::var("UPLOAD_ROOT").unwrap_or_else(|_| "public/uploads".into()),
            max_upload_mb: env::var("MAX_UPLOAD_MB")
                .unwrap_or_else(|_| "50".into())
                .parse()
                .expect("MAX_UPLOAD_MB must be a valid integer"),
            jwt_secret: env::var("JWT_SECRET").unwrap_or_default(),
            jwt_duration_minutes: env::var("JWT_DURATION_MINUTES")
                .unwrap_or_else(|_| "60".into())
                .parse()
                .expect("JWT_DURATION_MINUTES must be a valid integer"),
        }
    }

    /// Returns a read guard on the global configuration.
    pub fn global() -> std::sync::RwLockReadGuard<'static, AppConfig> {
        CONFIG_INSTANCE
            .get_or_init(|| RwLock::new(AppConfig::from_env()))
            .read()
            .expect("Failed to acquire AppConfig read lock")
    }

    /// Reloads the configuration from the environment, discarding overrides.
    pub fn reset() {
        if let Some(lock) = CONFIG_INSTANCE.get() {
            let mut guard = lock.write().unwrap();
            *guard = AppConfig::from_env();
        }
    }

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

    // --- Per-field setters, primarily for tests ---

    pub fn set_env(value: impl Into<String>) {
        AppConfig::set_field(|cfg| cfg.env = value.into());
    }

    pub fn set_log_to_stdout(value: bool) {
        AppConfig::set_field(|cfg| cfg.log_to_stdout = value);
    }

    pub fn set_host(value: impl Into<String>) {
        AppConfig::set_field(|cfg| cfg.host = value.into());
    }

    pub fn set_port(value: u16) {
        AppConfig::set_field(|cfg| cfg.port = value);
    }

    pub fn set_database_path(value: impl Into<String>) {
        AppConfig::set_field(|cfg| cfg.database_path = value.into());
    }

    pub fn set_upload_root(value: impl Into<String>) {
        AppConfig::set_field(|cfg| cfg.upload_root = value.into());
    }

    pub fn set_max_upload_mb(value: usize) {
        AppConfig::set_field(|cfg| cfg.max_upload_mb = value);
    }

    pub fn set_jwt_secret(value: impl Into<String>) {
        AppConfig::set_field(|cfg| cfg.jwt_secret = value.into());
    }

    pub fn set_jwt_duration_minutes(value: i64) {
        AppConfig::set_field(|cfg| cfg.jwt_duration_minutes = value);
    }
}

// --- Accessor functions used throughout the workspace ---

pub fn env() -> String {
    AppConfig::global().env.clone()
}

pub fn project_name() -> String {
    AppConfig::global().project_name.clone()
}

pub fn log_level() -> String {
    AppConfig::global().log_level.clone()
}

pub fn log_file() -> String {
    AppConfig::global().log_file.clone()
}

pub fn log_to_stdout() -> bool {
    AppConfig::global().log_to_stdout
}

pub fn host() -> String {
    AppConfig::global().host.clone()
}

pub fn port() -> u16 {
    AppConfig::global().port
}

pub fn database_path() -> String {
    AppConfig::global().database_path.clone()
}

pub fn upload_root() -> String {
    AppConfig::global().upload_root.clone()
}

pub fn max_upload_bytes() -> usize {
    AppConfig::global().max_upload_mb * 1024 * 1024
}

pub fn jwt_secret() -> String {
    AppConfig::global().jwt_secret.clone()
}

pub fn jwt_duration_minutes() -> i64 {
    AppConfig::global().jwt_duration_minutes
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn setters_override_loaded_values() {
        AppConfig::set_jwt_secret("unit-test-secret");
        AppConfig::set_jwt_duration_minutes(5);

        assert_eq!(jwt_secret(), "unit-test-secret");
        assert_eq!(jwt_duration_minutes(), 5);

        AppConfig::reset();
    }

    #[test]
    #[serial]
    fn upload_limit_is_reported_in_bytes() {
        AppConfig::set_max_upload_mb(2);
        assert_eq!(max_upload_bytes(), 2 * 1024 * 1024);
        AppConfig::reset();
    }
}
