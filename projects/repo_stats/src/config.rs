//! Process configuration, read once at startup from the environment.

use std::env;
use std::time::Duration;

use thiserror::Error;
use utils_trace::LogFormat;

use crate::db::pool::PoolSettings;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("MissingVar: {key} is required but not set")]
    MissingVar { key: &'static str },

    #[error("InvalidVar: {key}='{value}': {reason}")]
    InvalidVar {
        key: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub pool: PoolSettings,
    pub log_level: String,
    pub log_format: LogFormat,
    pub expose_error_detail: bool,
}

impl AppConfig {
    /// Loads `.env` if present, then reads the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL")
            .filter(|value| !value.trim().is_empty())
            .ok_or(ConfigError::MissingVar { key: "DATABASE_URL" })?;

        let defaults = PoolSettings::default();

        let max_size = parse_var(&lookup, "DATABASE_POOL_MAX_SIZE", defaults.max_size)?;
        if max_size == 0 {
            return Err(ConfigError::InvalidVar {
                key: "DATABASE_POOL_MAX_SIZE",
                value: max_size.to_string(),
                reason: "must be greater than zero".to_owned(),
            });
        }

        let acquire_timeout_secs = parse_var(
            &lookup,
            "DATABASE_ACQUIRE_TIMEOUT_SECS",
            defaults.acquire_timeout.as_secs(),
        )?;
        if acquire_timeout_secs == 0 {
            return Err(ConfigError::InvalidVar {
                key: "DATABASE_ACQUIRE_TIMEOUT_SECS",
                value: acquire_timeout_secs.to_string(),
                reason: "must be greater than zero".to_owned(),
            });
        }

        Ok(Self {
            database_url,
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_owned()),
            port: parse_var(&lookup, "PORT", 8000u16)?,
            pool: PoolSettings {
                max_size,
                acquire_timeout: Duration::from_secs(acquire_timeout_secs),
            },
            log_level: lookup("LOG_LEVEL").unwrap_or_else(|| "info".to_owned()),
            log_format: parse_var(&lookup, "LOG_FORMAT", LogFormat::Compact)?,
            expose_error_detail: parse_var(&lookup, "EXPOSE_ERROR_DETAIL", true)?,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_var<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        None => Ok(default),
        Some(value) => {
            let parsed = value.trim().parse::<T>();
            parsed.map_err(|err| ConfigError::InvalidVar {
                key,
                reason: err.to_string(),
                value,
            })
        }
    }
}
