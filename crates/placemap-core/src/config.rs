use crate::app_config::{Environment, ExplorerConfig, ServerConfig, StorageBackend};
use crate::ConfigError;

/// Load server configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_server_config() -> Result<ServerConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_server_config_from_env()
}

/// Load server configuration from env vars already in the process.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_server_config_from_env() -> Result<ServerConfig, ConfigError> {
    build_server_config(|key| std::env::var(key))
}

/// Load explorer (client) configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_explorer_config() -> Result<ExplorerConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_explorer_config_from_env()
}

/// Load explorer configuration from env vars already in the process.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_explorer_config_from_env() -> Result<ExplorerConfig, ConfigError> {
    build_explorer_config(|key| std::env::var(key))
}

/// Parse a debounce delay in milliseconds.
///
/// Non-numeric input and negative values both yield `0`.
#[must_use]
pub fn parse_delay_ms(raw: &str) -> i64 {
    raw.trim().parse::<i64>().map_or(0, |ms| ms.max(0))
}

fn build_server_config<F>(lookup: F) -> Result<ServerConfig, ConfigError>
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

    let env = parse_environment(&or_default("PLACEMAP_ENV", "development"));
    let bind_addr = or_default("PLACEMAP_BIND_ADDR", "0.0.0.0:3000")
        .parse::<SocketAddr>()
        .map_err(|e| invalid("PLACEMAP_BIND_ADDR", e.to_string()))?;
    let log_level = or_default("PLACEMAP_LOG_LEVEL", "info");
    let storage = parse_storage_backend(&or_default("PLACEMAP_STORAGE", "postgres"))?;

    let database_url = lookup("DATABASE_URL").ok().filter(|s| !s.trim().is_empty());
    if storage == StorageBackend::Postgres && database_url.is_none() {
        return Err(ConfigError::MissingEnvVar("DATABASE_URL".to_string()));
    }

    let db_max_connections = parse_u32("PLACEMAP_DB_MAX_CONNECTIONS", "10")?;
    let db_min_connections = parse_u32("PLACEMAP_DB_MIN_CONNECTIONS", "1")?;
    let db_acquire_timeout_secs = parse_u64("PLACEMAP_DB_ACQUIRE_TIMEOUT_SECS", "10")?;
    let seed_on_startup = parse_bool("PLACEMAP_SEED", &or_default("PLACEMAP_SEED", "false"))?;

    Ok(ServerConfig {
        env,
        bind_addr,
        log_level,
        storage,
        database_url,
        db_max_connections,
        db_min_connections,
        db_acquire_timeout_secs,
        seed_on_startup,
    })
}

fn build_explorer_config<F>(lookup: F) -> Result<ExplorerConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };
    let secret = |var: &str| lookup(var).ok().filter(|s| !s.trim().is_empty());

    let api_base_url = or_default("PLACEMAP_API_BASE_URL", "http://127.0.0.1:3000");
    if !api_base_url.starts_with("http://") && !api_base_url.starts_with("https://") {
        return Err(ConfigError::InvalidEnvVar {
            var: "PLACEMAP_API_BASE_URL".to_string(),
            reason: format!("expected an http(s) URL, got '{api_base_url}'"),
        });
    }

    Ok(ExplorerConfig {
        geoapify_api_key: secret("GEOAPIFY_ACCESS_TOKEN"),
        mapbox_access_token: secret("MAPBOX_ACCESS_TOKEN"),
        api_base_url,
        search_debounce_ms: parse_delay_ms(&or_default("PLACEMAP_SEARCH_DEBOUNCE_MS", "300")),
        user_agent: or_default("PLACEMAP_USER_AGENT", "placemap/0.1 (places-explorer)"),
        log_level: or_default("PLACEMAP_LOG_LEVEL", "info"),
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

fn parse_storage_backend(s: &str) -> Result<StorageBackend, ConfigError> {
    match s.trim().to_ascii_lowercase().as_str() {
        "postgres" | "postgresql" => Ok(StorageBackend::Postgres),
        "memory" => Ok(StorageBackend::Memory),
        other => Err(ConfigError::InvalidEnvVar {
            var: "PLACEMAP_STORAGE".to_string(),
            reason: format!("expected 'postgres' or 'memory', got '{other}'"),
        }),
    }
}

fn parse_bool(var: &str, s: &str) -> Result<bool, ConfigError> {
    match s.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Ok(true),
        "0" | "false" | "no" | "" => Ok(false),
        other => Err(ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: format!("expected a boolean, got '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
