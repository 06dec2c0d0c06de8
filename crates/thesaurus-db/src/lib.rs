//! # thesaurus-db
//!
//! PostgreSQL storage layer for the thesaurus vocabulary service.
//!
//! This crate provides:
//! - Connection pool management
//! - Repository implementations for concepts, labels and labelings
//! - SQL generation for composable labeling filters
//!
//! ## Example
//!
//! ```rust,ignore
//! use thesaurus_db::{Database, ConceptRepository};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::connect("postgres://localhost/thesaurus").await?;
//!     let (concept, created) = db.concepts.find_or_create_concept("c1").await?;
//!     println!("{} created={}", concept.id, created);
//!     Ok(())
//! }
//! ```
pub mod concepts;
pub mod labeling_filter;
pub mod labelings;
pub mod labels;
pub mod pool;

// Always compiled so integration tests (in tests/) can use DEFAULT_TEST_DATABASE_URL
pub mod test_fixtures;

// Re-export core types
pub use thesaurus_core::*;

/// Escape LIKE wildcard characters (`%`, `_`, `\`) in user input.
pub fn escape_like(input: &str) -> String {
    input
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

pub use concepts::PgConceptRepository;
pub use labeling_filter::{LabelingQueryBuilder, QueryParam};
pub use labelings::PgLabelingRepository;
pub use labels::PgLabelRepository;
pub use pool::{
    create_pool, create_pool_with_config, ping, pool_metrics, PoolConfig, PoolMetrics,
};

/// Combined database context with all repositories.
#[derive(Clone)]
pub struct Database {
    /// The underlying connection pool.
    pub pool: sqlx::Pool<sqlx::Postgres>,
    pub concepts: PgConceptRepository,
    pub labels: PgLabelRepository,
    pub labelings: PgLabelingRepository,
}

impl Database {
    /// Create a new Database instance from a connection pool.
    pub fn new(pool: sqlx::Pool<sqlx::Postgres>) -> Self {
        Self {
            concepts: PgConceptRepository::new(pool.clone()),
            labels: PgLabelRepository::new(pool.clone()),
            labelings: PgLabelingRepository::new(pool.clone()),
            pool,
        }
    }

    /// Create a new Database instance by connecting to the given URL.
    pub async fn connect(url: &str) -> Result<Self> {
        let pool = create_pool(url).await?;
        Ok(Self::new(pool))
    }

    /// Create with custom pool configuration.
    pub async fn connect_with_config(url: &str, config: PoolConfig) -> Result<Self> {
        let pool = create_pool_with_config(url, config).await?;
        Ok(Self::new(pool))
    }

    /// Run pending migrations.
    #[cfg(feature = "migrations")]
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("../../migrations")
            .run(&self.pool)
            .await
            .map_err(|e| Error::Database(sqlx::Error::Migrate(Box::new(e))))?;
        Ok(())
    }

    /// Get the underlying connection pool.
    pub fn pool(&self) -> &sqlx::Pool<sqlx::Postgres> {
        &self.pool
    }
}
