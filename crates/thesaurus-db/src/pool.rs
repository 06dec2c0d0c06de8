//! Database connection pool management.

use std::time::{Duration, Instant};

use sqlx::postgres::{PgPool, PgPoolOptions};
use tracing::{debug, info, warn};

use thesaurus_core::{Error, PoolSettings, Result};

/// Pool options handed to `PgPoolOptions`.
#[derive(Debug, Clone)]
pub struct PoolConfig {
    pub max_connections: u32,
    pub min_connections: u32,
    /// How long to wait for a free connection.
    pub connect_timeout: Duration,
    pub idle_timeout: Duration,
    pub max_lifetime: Option<Duration>,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self::from(&PoolSettings::default())
    }
}

impl From<&PoolSettings> for PoolConfig {
    fn from(settings: &PoolSettings) -> Self {
        Self {
            max_connections: settings.max_connections,
            min_connections: settings.min_connections,
            connect_timeout: Duration::from_secs(settings.connect_timeout_secs),
            idle_timeout: Duration::from_secs(settings.idle_timeout_secs),
            max_lifetime: settings.max_lifetime_secs.map(Duration::from_secs),
        }
    }
}

impl PoolConfig {
    /// Small pool for integration tests.
    pub fn for_tests() -> Self {
        Self {
            max_connections: 5,
            ..Self::default()
        }
    }
}

/// Create a vocabulary connection pool with default configuration.
pub async fn create_pool(database_url: &str) -> Result<PgPool> {
    create_pool_with_config(database_url, PoolConfig::default()).await
}

/// Create a vocabulary connection pool with custom configuration.
pub async fn create_pool_with_config(database_url: &str, config: PoolConfig) -> Result<PgPool> {
    let start = Instant::now();

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(config.connect_timeout)
        .idle_timeout(config.idle_timeout)
        .max_lifetime(config.max_lifetime)
        .connect(database_url)
        .await
        .map_err(|e| {
            warn!(
                subsystem = "database",
                component = "pool",
                op = "connect",
                error = %e,
                duration_ms = start.elapsed().as_millis() as u64,
                "Vocabulary database unreachable"
            );
            Error::Database(e)
        })?;

    info!(
        subsystem = "database",
        component = "pool",
        op = "connect",
        max_connections = config.max_connections,
        min_connections = config.min_connections,
        acquire_timeout_secs = config.connect_timeout.as_secs(),
        pool_size = pool.size(),
        duration_ms = start.elapsed().as_millis() as u64,
        "Vocabulary connection pool established"
    );
    Ok(pool)
}

/// Round-trip a trivial query and report its latency.
pub async fn ping(pool: &PgPool) -> Result<Duration> {
    let start = Instant::now();
    sqlx::query("SELECT 1")
        .execute(pool)
        .await
        .map_err(Error::Database)?;
    Ok(start.elapsed())
}

/// Connection counts at one point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolMetrics {
    pub size: u32,
    pub idle: usize,
}

impl PoolMetrics {
    /// Every open connection is checked out.
    pub fn is_saturated(&self) -> bool {
        self.size > 0 && self.idle == 0
    }
}

/// Sample the pool's connection counts, warning when it is saturated.
pub fn pool_metrics(pool: &PgPool) -> PoolMetrics {
    let metrics = PoolMetrics {
        size: pool.size(),
        idle: pool.num_idle(),
    };

    debug!(
        subsystem = "database",
        component = "pool",
        op = "metrics",
        pool_size = metrics.size,
        pool_idle = metrics.idle,
        "Pool sampled"
    );
    if metrics.is_saturated() {
        warn!(
            subsystem = "database",
            component = "pool",
            pool_size = metrics.size,
            "Connection pool has no idle connections"
        );
    }
    metrics
}
