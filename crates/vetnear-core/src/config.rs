use thiserror::Error;

use crate::app_config::{AppConfig, Environment};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so tests can use a plain `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_addr = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        or_default(var, default)
            .parse::<SocketAddr>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        or_default(var, default)
            .parse::<usize>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_radius = |var: &str, default: &str| -> Result<f64, ConfigError> {
        let value = or_default(var, default)
            .parse::<f64>()
            .map_err(|e| invalid(var, e.to_string()))?;
        if value.is_finite() && value > 0.0 {
            Ok(value)
        } else {
            Err(invalid(var, "must be a positive number".to_string()))
        }
    };

    let require_url = |var: &str, default: &str| -> Result<String, ConfigError> {
        let value = or_default(var, default);
        if value.starts_with("http://") || value.starts_with("https://") {
            Ok(value)
        } else {
            Err(invalid(var, "must be an http(s) URL".to_string()))
        }
    };

    let env = parse_environment(&or_default("VETNEAR_ENV", "development"));
    let bind_addr = parse_addr("VETNEAR_BIND_ADDR", "0.0.0.0:3000")?;
    let log_level = or_default("VETNEAR_LOG_LEVEL", "info");

    let overpass_url = require_url(
        "VETNEAR_OVERPASS_URL",
        "https://overpass-api.de/api/interpreter",
    )?;
    let nominatim_url = require_url(
        "VETNEAR_NOMINATIM_URL",
        "https://nominatim.openstreetmap.org",
    )?;
    let user_agent = or_default("VETNEAR_USER_AGENT", "vetnear/0.1 (livestock-services)");

    let overpass_timeout_secs = parse_u64("VETNEAR_OVERPASS_TIMEOUT_SECS", "30")?;
    let nominatim_timeout_secs = parse_u64("VETNEAR_NOMINATIM_TIMEOUT_SECS", "10")?;
    let max_retries = parse_u32("VETNEAR_MAX_RETRIES", "3")?;
    let retry_initial_delay_ms = parse_u64("VETNEAR_RETRY_INITIAL_DELAY_MS", "1000")?;
    let retry_max_jitter_ms = parse_u64("VETNEAR_RETRY_MAX_JITTER_MS", "1000")?;
    let default_radius_km = parse_radius("VETNEAR_DEFAULT_RADIUS_KM", "10")?;
    let rate_limit_per_minute = parse_usize("VETNEAR_RATE_LIMIT_PER_MINUTE", "120")?;

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        overpass_url,
        nominatim_url,
        user_agent,
        overpass_timeout_secs,
        nominatim_timeout_secs,
        max_retries,
        retry_initial_delay_ms,
        retry_max_jitter_ms,
        default_radius_km,
        rate_limit_per_minute,
    })
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}
