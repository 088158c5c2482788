//! Connection pool bootstrap.
//!
//! Pool lifecycle belongs to the caller; this is the thin helper the CLI
//! and tests use to obtain one.

use std::time::Duration;

use sqlx::pool::PoolOptions;
use tracing::info;

use crate::{Db, DbError};

/// Type alias for the shared pool handed to every repository.
pub type DbPool = sqlx::Pool<Db>;

/// Tuning knobs for [`create_pool`].
#[derive(Debug, Clone)]
pub struct PoolConfig {
    /// Connection string for the active driver.
    pub database_url: String,
    /// Pool ceiling.
    pub max_connections: u32,
    /// How long a caller waits for a free connection.
    pub acquire_timeout: Duration,
}

impl PoolConfig {
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            ..Self::default()
        }
    }
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            database_url: String::new(),
            max_connections: 10,
            acquire_timeout: Duration::from_secs(5),
        }
    }
}

/// Create a new connection pool from `config`.
pub async fn create_pool(config: &PoolConfig) -> Result<DbPool, DbError> {
    if config.database_url.is_empty() {
        return Err(DbError::Config("database URL is empty".into()));
    }
    if config.max_connections == 0 {
        return Err(DbError::Config("max_connections must be at least 1".into()));
    }

    info!(
        max_connections = config.max_connections,
        "Connecting to database"
    );
    let pool = PoolOptions::<Db>::new()
        .max_connections(config.max_connections)
        .acquire_timeout(config.acquire_timeout)
        .connect(&config.database_url)
        .await?;
    Ok(pool)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn rejects_empty_url() {
        let err = create_pool(&PoolConfig::default()).await.unwrap_err();
        assert!(matches!(err, DbError::Config(_)));
    }

    #[tokio::test]
    async fn rejects_zero_connections() {
        let config = PoolConfig {
            max_connections: 0,
            ..PoolConfig::new("sqlite::memory:")
        };
        let err = create_pool(&config).await.unwrap_err();
        assert!(matches!(err, DbError::Config(_)));
    }

    #[test]
    fn defaults_match_documented_values() {
        let config = PoolConfig::new("sqlite::memory:");
        assert_eq!(config.max_connections, 10);
        assert_eq!(config.acquire_timeout, Duration::from_secs(5));
        assert_eq!(config.database_url, "sqlite::memory:");
    }
}
