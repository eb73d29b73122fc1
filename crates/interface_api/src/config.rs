//! API configuration
//!
//! Read from `API_*` environment variables; anything unset keeps its default.

use serde::Deserialize;
use validator::{Validate, ValidationError};

use core_kernel::{Currency, Timezone};

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// API configuration
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(default)]
pub struct ApiConfig {
    #[validate(length(min = 1))]
    pub host: String,
    #[validate(range(min = 1))]
    pub port: u16,
    #[validate(length(min = 1))]
    pub database_url: String,
    /// Default filter when `RUST_LOG` is unset
    #[validate(custom(function = "validate_log_level"))]
    pub log_level: String,
    /// Currency every ledger is kept in
    pub currency: Currency,
    /// Timezone that decides what "today" is for the daily report
    pub timezone: Timezone,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            database_url: "postgres://localhost/ricemill".to_string(),
            log_level: "info".to_string(),
            currency: Currency::NGN,
            timezone: Timezone::default(),
        }
    }
}

impl ApiConfig {
    /// Loads configuration from environment
    pub fn from_env() -> Result<Self, config::ConfigError> {
        let config: Self = config::Config::builder()
            .add_source(config::Environment::with_prefix("API"))
            .build()?
            .try_deserialize()?;

        config
            .validate()
            .map_err(|e| config::ConfigError::Message(e.to_string()))?;
        Ok(config)
    }

    /// Returns the server address
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn validate_log_level(level: &str) -> Result<(), ValidationError> {
    if LOG_LEVELS.contains(&level.to_ascii_lowercase().as_str()) {
        Ok(())
    } else {
        Err(ValidationError::new("unknown_log_level"))
    }
}
