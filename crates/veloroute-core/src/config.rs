use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files. Useful for testing
/// or when the caller manages env setup.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// This is the core parsing/validation logic, decoupled from the actual
/// environment so it can be tested with a pure `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var).map_err(|_| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_addr = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let directions_api_key = require("VELOROUTE_DIRECTIONS_API_KEY")?;

    let env = parse_environment(&or_default("VELOROUTE_ENV", "development"));
    let bind_addr = parse_addr("VELOROUTE_BIND_ADDR", "0.0.0.0:3000")?;
    let log_level = or_default("VELOROUTE_LOG_LEVEL", "info");

    let directions_base_url = or_default(
        "VELOROUTE_DIRECTIONS_BASE_URL",
        "https://graphhopper.com/api/1",
    );
    let geocode_base_url = or_default(
        "VELOROUTE_GEOCODE_BASE_URL",
        "https://nominatim.openstreetmap.org",
    );
    let region_qualifier = or_default("VELOROUTE_REGION_QUALIFIER", "Denmark");
    let geocode_min_interval_ms = parse_u64("VELOROUTE_GEOCODE_MIN_INTERVAL_MS", "1000")?;

    let http_timeout_secs = parse_u64("VELOROUTE_HTTP_TIMEOUT_SECS", "30")?;
    let http_user_agent = or_default("VELOROUTE_HTTP_USER_AGENT", "veloroute/0.1 (route-planning)");
    let provider_max_retries = parse_u32("VELOROUTE_PROVIDER_MAX_RETRIES", "1")?;
    let provider_retry_delay_ms = parse_u64("VELOROUTE_PROVIDER_RETRY_DELAY_MS", "400")?;
    let generation_timeout_secs = parse_u64("VELOROUTE_GENERATION_TIMEOUT_SECS", "120")?;

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        directions_api_key,
        directions_base_url,
        geocode_base_url,
        region_qualifier,
        geocode_min_interval_ms,
        http_timeout_secs,
        http_user_agent,
        provider_max_retries,
        provider_retry_delay_ms,
        generation_timeout_secs,
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
