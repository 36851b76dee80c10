use std::{env, path::PathBuf, time::Duration};

use thiserror::Error;

use crate::models::User;

/// ConfigError
///
/// Raised by `AppConfig::load` when a variable required by the current
/// runtime environment is missing or cannot be parsed.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set in production")]
    Missing(&'static str),
    #[error("{name} has an invalid value: {value}")]
    Invalid { name: &'static str, value: String },
}

/// AppConfig
///
/// Holds the application's entire configuration state. Immutable once loaded and
/// shared through the application state.
#[derive(Clone, Debug)]
pub struct AppConfig {
    // Runtime environment marker. Controls the log format and credential fallbacks.
    pub env: Env,
    // Socket address the HTTP server binds to.
    pub bind_addr: String,
    // Optional JSON seed file for the city repository. Embedded sample data otherwise.
    pub cities_file: Option<PathBuf>,
    // Optional directory holding the lazily loaded page templates.
    pub template_dir: Option<PathBuf>,
    // Artificial latency applied when loading embedded page modules.
    pub module_latency: Duration,
    // The single account accepted by the session gate.
    pub credentials: Credentials,
}

/// Env
///
/// Defines the runtime context: pretty logs and demo fallbacks locally,
/// JSON logs and mandatory credentials in production.
#[derive(Clone, PartialEq, Debug)]
pub enum Env {
    Local,
    Production,
}

/// Credentials
///
/// The one statically configured account. `login` succeeds only when both the
/// email and the password match exactly.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
    pub name: String,
    pub avatar: String,
}

impl Credentials {
    /// The identity stored in the session on a successful login.
    pub fn identity(&self) -> User {
        User {
            name: self.name.clone(),
            email: self.email.clone(),
            avatar: self.avatar.clone(),
        }
    }

    pub fn matches(&self, email: &str, password: &str) -> bool {
        self.email == email && self.password == password
    }
}

impl Default for Credentials {
    fn default() -> Self {
        Self {
            email: "peter@example.com".to_string(),
            password: "qwerty".to_string(),
            name: "Peter".to_string(),
            avatar: "https://i.pravatar.cc/100?u=zz".to_string(),
        }
    }
}

impl Default for AppConfig {
    /// default
    ///
    /// Provides a safe, non-failing AppConfig primarily used for test setup, so
    /// router tests do not depend on the process environment.
    fn default() -> Self {
        Self {
            env: Env::Local,
            bind_addr: "127.0.0.1:3000".to_string(),
            cities_file: None,
            template_dir: None,
            module_latency: Duration::ZERO,
            credentials: Credentials::default(),
        }
    }
}

impl AppConfig {
    /// load
    ///
    /// Reads all parameters from environment variables. In production the account
    /// email and password are mandatory; local mode falls back to the demo account.
    pub fn load() -> Result<Self, ConfigError> {
        let env_str = env::var("APP_ENV").unwrap_or_else(|_| "local".to_string());
        let env = match env_str.as_str() {
            "production" => Env::Production,
            _ => Env::Local,
        };

        let demo = Credentials::default();
        let credentials = match env {
            Env::Production => Credentials {
                email: env::var("WORLDWISE_USER_EMAIL")
                    .map_err(|_| ConfigError::Missing("WORLDWISE_USER_EMAIL"))?,
                password: env::var("WORLDWISE_USER_PASSWORD")
                    .map_err(|_| ConfigError::Missing("WORLDWISE_USER_PASSWORD"))?,
                name: env::var("WORLDWISE_USER_NAME").unwrap_or(demo.name),
                avatar: env::var("WORLDWISE_USER_AVATAR").unwrap_or(demo.avatar),
            },
            Env::Local => Credentials {
                email: env::var("WORLDWISE_USER_EMAIL").unwrap_or(demo.email),
                password: env::var("WORLDWISE_USER_PASSWORD").unwrap_or(demo.password),
                name: env::var("WORLDWISE_USER_NAME").unwrap_or(demo.name),
                avatar: env::var("WORLDWISE_USER_AVATAR").unwrap_or(demo.avatar),
            },
        };

        let module_latency = match env::var("WORLDWISE_MODULE_LATENCY_MS") {
            Ok(raw) => raw
                .parse::<u64>()
                .map(Duration::from_millis)
                .map_err(|_| ConfigError::Invalid {
                    name: "WORLDWISE_MODULE_LATENCY_MS",
                    value: raw,
                })?,
            Err(_) => Duration::ZERO,
        };

        Ok(Self {
            env,
            bind_addr: env::var("WORLDWISE_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string()),
            cities_file: env::var("WORLDWISE_CITIES_FILE").ok().map(PathBuf::from),
            template_dir: env::var("WORLDWISE_TEMPLATE_DIR").ok().map(PathBuf::from),
            module_latency,
            credentials,
        })
    }
}
