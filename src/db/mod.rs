//! Database connection and operations
//!
//! The store is an explicitly constructed handle: `main` connects once and the
//! [`Database`] is cloned into the GraphQL schema and the HTTP state.

pub mod schema_sync;
pub mod sqlite_helpers;
pub mod users;

use std::str::FromStr;

use anyhow::{Context, Result};
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};

pub use users::{CreateSavedBook, CreateUser, SavedBookRecord, UserRecord, UsersRepository};

/// bcrypt cost used when none is configured
pub const DEFAULT_PASSWORD_COST: u32 = 10;

/// Database wrapper providing connection pool access
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
    password_cost: u32,
}

impl Database {
    /// Create a new database wrapper from an existing pool
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            password_cost: DEFAULT_PASSWORD_COST,
        }
    }

    /// Connect to the SQLite database at `url`, creating the file (and its
    /// parent directory) if missing, then sync the schema.
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)
            .with_context(|| format!("Invalid database URL: {}", url))?
            .create_if_missing(true)
            .foreign_keys(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(std::time::Duration::from_secs(5));

        if let Some(parent) = options.get_filename().parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(std::time::Duration::from_secs(10))
            .connect_with(options)
            .await
            .context("Failed to open database")?;

        let db = Self::new(pool);
        db.sync_schema().await?;
        Ok(db)
    }

    /// Open a private in-memory database.
    ///
    /// Every SQLite `:memory:` connection is its own database, so the pool is
    /// pinned to a single connection that never expires.
    pub async fn in_memory() -> Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        let db = Self::new(pool);
        db.sync_schema().await?;
        Ok(db)
    }

    /// Set the bcrypt cost applied when passwords are stored
    pub fn with_password_cost(mut self, cost: u32) -> Self {
        self.password_cost = cost;
        self
    }

    async fn sync_schema(&self) -> Result<()> {
        let result = schema_sync::sync_schema(&self.pool).await?;
        if !result.tables_created.is_empty() {
            tracing::info!(tables = ?result.tables_created, "Created tables");
        }
        if let Some(err) = result.errors.first() {
            anyhow::bail!("Schema sync failed: {}", err);
        }
        Ok(())
    }

    /// Get the connection pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Get a users repository
    pub fn users(&self) -> UsersRepository {
        UsersRepository::new(self.pool.clone(), self.password_cost)
    }

    /// Close every pooled connection
    pub async fn close(&self) {
        self.pool.close().await;
    }
}
