//! Connection pool and schema migrations.

use std::time::Duration;

use placemap_core::ServerConfig;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::DbError;

// Relative to this crate's Cargo.toml: <workspace-root>/migrations/
static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../../migrations");

/// Pool sizing. Defaults match the `PLACEMAP_DB_*` env defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolConfig {
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout: Duration,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_connections: 10,
            min_connections: 1,
            acquire_timeout: Duration::from_secs(10),
        }
    }
}

impl From<&ServerConfig> for PoolConfig {
    fn from(config: &ServerConfig) -> Self {
        Self {
            max_connections: config.db_max_connections,
            min_connections: config.db_min_connections.min(config.db_max_connections),
            acquire_timeout: Duration::from_secs(config.db_acquire_timeout_secs),
        }
    }
}

/// Open a Postgres pool.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if no connection can be established.
pub async fn connect_pool(database_url: &str, config: PoolConfig) -> Result<PgPool, sqlx::Error> {
    tracing::debug!(
        max = config.max_connections,
        min = config.min_connections,
        "opening database pool"
    );
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(config.acquire_timeout)
        .connect(database_url)
        .await
}

/// Open a pool from server settings.
///
/// # Errors
///
/// [`DbError::MissingDatabaseUrl`] when the config has no URL,
/// [`DbError::Sqlx`] when connecting fails.
pub async fn connect_pool_from_config(config: &ServerConfig) -> Result<PgPool, DbError> {
    let Some(database_url) = config.database_url.as_deref() else {
        return Err(DbError::MissingDatabaseUrl);
    };
    Ok(connect_pool(database_url, PoolConfig::from(config)).await?)
}

/// Apply pending migrations and return how many ran.
///
/// # Errors
///
/// Returns [`DbError::Migration`] if a migration fails.
pub async fn run_migrations(pool: &PgPool) -> Result<usize, DbError> {
    // Missing on a fresh database, which simply means nothing is applied yet.
    let applied: Vec<i64> =
        sqlx::query_scalar("SELECT version FROM _sqlx_migrations WHERE success")
            .fetch_all(pool)
            .await
            .unwrap_or_default();

    let pending = MIGRATOR
        .iter()
        .filter(|m| !m.migration_type.is_down_migration() && !applied.contains(&m.version))
        .count();

    MIGRATOR.run(pool).await?;
    Ok(pending)
}

/// Round-trip a trivial query.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if the database is unreachable.
pub async fn ping(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use placemap_core::{Environment, StorageBackend};

    fn server_config(max: u32, min: u32) -> ServerConfig {
        ServerConfig {
            env: Environment::Test,
            bind_addr: "127.0.0.1:0".parse().unwrap(),
            log_level: "info".to_string(),
            storage: StorageBackend::Postgres,
            database_url: Some("postgres://localhost/placemap".to_string()),
            db_max_connections: max,
            db_min_connections: min,
            db_acquire_timeout_secs: 3,
            seed_on_startup: false,
        }
    }

    #[test]
    fn pool_config_follows_server_config() {
        let config = PoolConfig::from(&server_config(20, 2));

        assert_eq!(config.max_connections, 20);
        assert_eq!(config.min_connections, 2);
        assert_eq!(config.acquire_timeout, Duration::from_secs(3));
    }

    #[test]
    fn min_connections_never_exceed_max() {
        let config = PoolConfig::from(&server_config(2, 8));
        assert_eq!(config.min_connections, 2);
    }

    #[test]
    fn migrator_knows_the_places_migration() {
        assert!(MIGRATOR
            .iter()
            .any(|m| m.description.contains("create places")));
    }

    #[tokio::test]
    async fn missing_database_url_is_reported() {
        let mut config = server_config(5, 1);
        config.database_url = None;

        let err = connect_pool_from_config(&config).await.unwrap_err();
        assert!(matches!(err, DbError::MissingDatabaseUrl));
    }
}
