//! # Database Pool Management
//!
//! Opens the SQLite file that holds the board catalog and saved carts.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  App Startup                                                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  DbConfig::new(path) ← from [store] database_path in quiver.toml        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Database::new(config).await ← open pool, migrate                       │
//! │       │                                                                 │
//! │       ├──► db.boards()  ── BoardRepository  (catalog)                   │
//! │       └──► db.carts()   ── CartSnapshotRepository  (persisted carts)    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## WAL Mode
//! SQLite WAL mode is enabled so catalog reads never wait on a cart save.
//! A short busy timeout covers two saves landing at once.

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use crate::migrations;
use crate::repository::board::BoardRepository;
use crate::repository::cart::CartSnapshotRepository;

// =============================================================================
// Configuration
// =============================================================================

/// Where the database lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DbLocation {
    /// A file on disk, created on first open.
    File(PathBuf),
    /// A private in-memory database, gone when the pool closes.
    Memory,
}

/// Database configuration.
///
/// ## Example
/// ```rust,ignore
/// let config = DbConfig::new("/path/to/quiver.db")
///     .pool_size(4)
///     .busy_timeout(Duration::from_secs(2));
/// ```
#[derive(Debug, Clone)]
pub struct DbConfig {
    pub location: DbLocation,

    /// Upper bound on open connections. Default: 4
    pub pool_size: u32,

    /// How long a command waits for a free connection. Default: 10s
    pub acquire_timeout: Duration,

    /// How long SQLite retries a locked database before failing. Default: 5s
    pub busy_timeout: Duration,

    /// Apply pending migrations when opening. Default: true
    pub migrate: bool,
}

impl DbConfig {
    /// Configuration for the file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DbConfig {
            location: DbLocation::File(path.into()),
            pool_size: 4,
            acquire_timeout: Duration::from_secs(10),
            busy_timeout: Duration::from_secs(5),
            migrate: true,
        }
    }

    /// In-memory database for tests.
    ///
    /// Every connection to `:memory:` sees its own database, so the pool is
    /// held to a single connection.
    pub fn in_memory() -> Self {
        DbConfig {
            location: DbLocation::Memory,
            pool_size: 1,
            acquire_timeout: Duration::from_secs(5),
            busy_timeout: Duration::ZERO,
            migrate: true,
        }
    }

    pub fn pool_size(mut self, size: u32) -> Self {
        self.pool_size = size.max(1);
        self
    }

    pub fn acquire_timeout(mut self, timeout: Duration) -> Self {
        self.acquire_timeout = timeout;
        self
    }

    pub fn busy_timeout(mut self, timeout: Duration) -> Self {
        self.busy_timeout = timeout;
        self
    }

    pub fn migrate(mut self, migrate: bool) -> Self {
        self.migrate = migrate;
        self
    }

    fn connect_options(&self) -> DbResult<SqliteConnectOptions> {
        let options = match &self.location {
            DbLocation::File(path) => SqliteConnectOptions::new()
                .filename(path)
                .create_if_missing(true)
                .journal_mode(SqliteJournalMode::Wal),
            DbLocation::Memory => SqliteConnectOptions::from_str("sqlite::memory:")
                .map_err(|e| DbError::ConnectionFailed(e.to_string()))?,
        };

        Ok(options
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(self.busy_timeout)
            // Off by default in SQLite; extras rely on ON DELETE CASCADE
            .foreign_keys(true))
    }
}

// =============================================================================
// Database
// =============================================================================

/// Main database handle providing repository access.
///
/// Cheap to clone; clones share the pool.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Opens the pool and, unless disabled, migrates the schema.
    pub async fn new(config: DbConfig) -> DbResult<Self> {
        info!(location = ?config.location, "Opening database");

        let pool = SqlitePoolOptions::new()
            .max_connections(config.pool_size)
            .min_connections(1)
            .acquire_timeout(config.acquire_timeout)
            // Closing the last connection would discard an in-memory database
            .idle_timeout(None)
            .connect_with(config.connect_options()?)
            .await
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?;

        debug!(pool_size = config.pool_size, "Database pool created");

        let db = Database { pool };
        if config.migrate {
            db.run_migrations().await?;
        }

        Ok(db)
    }

    /// Runs database migrations. Idempotent.
    pub async fn run_migrations(&self) -> DbResult<()> {
        migrations::run_migrations(&self.pool).await?;
        info!("Database schema up to date");
        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Returns the board catalog repository.
    ///
    /// ## Example
    /// ```rust,ignore
    /// let board = db.boards().get_by_id("owner-kai-board-1").await?;
    /// ```
    pub fn boards(&self) -> BoardRepository {
        BoardRepository::new(self.pool.clone())
    }

    /// Returns the cart snapshot repository.
    pub fn carts(&self) -> CartSnapshotRepository {
        CartSnapshotRepository::new(self.pool.clone())
    }

    /// Closes the pool. Repository calls fail afterwards.
    pub async fn close(&self) {
        debug!("Closing database pool");
        self.pool.close().await;
    }

    /// Checks if the database can execute queries.
    pub async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_in_memory_database() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        assert!(db.health_check().await);

        let (total, applied) = migrations::migration_status(db.pool()).await.unwrap();
        assert_eq!(total, applied);
    }

    #[tokio::test]
    async fn test_closed_pool_is_unhealthy() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.close().await;
        assert!(!db.health_check().await);
    }

    #[tokio::test]
    async fn test_file_database_persists() {
        let path = std::env::temp_dir().join(format!("quiver-pool-{}.db", std::process::id()));
        let _ = std::fs::remove_file(&path);

        let db = Database::new(DbConfig::new(&path)).await.unwrap();
        assert_eq!(db.boards().count().await.unwrap(), 0);
        db.close().await;

        // Reopening runs migrations again without error
        let db = Database::new(DbConfig::new(&path)).await.unwrap();
        assert!(db.health_check().await);
        db.close().await;

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_config_builder() {
        let config = DbConfig::new("/tmp/quiver.db")
            .pool_size(0)
            .busy_timeout(Duration::from_secs(1))
            .migrate(false);

        assert_eq!(config.location, DbLocation::File(PathBuf::from("/tmp/quiver.db")));
        assert_eq!(config.pool_size, 1);
        assert_eq!(config.busy_timeout, Duration::from_secs(1));
        assert!(!config.migrate);
        assert_eq!(DbConfig::in_memory().location, DbLocation::Memory);
    }
}
