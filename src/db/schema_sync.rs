//! Startup schema synchronization
//!
//! Creates any missing table or index. Existing tables are left untouched;
//! there is no migration history, a column change requires a fresh database.

use sqlx::SqlitePool;
use tracing::{debug, info, warn};

/// Result of a schema sync operation
#[derive(Debug, Default)]
pub struct SchemaSyncResult {
    pub tables_created: Vec<String>,
    pub errors: Vec<String>,
}

const USERS_TABLE: &str = r#"
CREATE TABLE users (
    id TEXT PRIMARY KEY NOT NULL,
    username TEXT NOT NULL UNIQUE,
    email TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
)
"#;

const SAVED_BOOKS_TABLE: &str = r#"
CREATE TABLE saved_books (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    book_id TEXT NOT NULL,
    title TEXT NOT NULL,
    description TEXT NOT NULL,
    authors TEXT NOT NULL DEFAULT '[]',
    image TEXT,
    link TEXT,
    created_at TEXT NOT NULL,
    UNIQUE (user_id, book_id)
)
"#;

/// Tables in creation order (parents before children)
const TABLES: &[(&str, &str)] = &[("users", USERS_TABLE), ("saved_books", SAVED_BOOKS_TABLE)];

const INDEXES: &[&str] =
    &["CREATE INDEX IF NOT EXISTS idx_saved_books_user_id ON saved_books (user_id, id)"];

/// Check if a table exists in the database
async fn table_exists(pool: &SqlitePool, table_name: &str) -> Result<bool, sqlx::Error> {
    let result: Option<(String,)> =
        sqlx::query_as("SELECT name FROM sqlite_master WHERE type='table' AND name = ?")
            .bind(table_name)
            .fetch_optional(pool)
            .await?;

    Ok(result.is_some())
}

/// Create every missing table and index.
pub async fn sync_schema(pool: &SqlitePool) -> Result<SchemaSyncResult, sqlx::Error> {
    let mut result = SchemaSyncResult::default();

    for &(table_name, create_sql) in TABLES {
        if table_exists(pool, table_name).await? {
            debug!(table = table_name, "Table already present");
            continue;
        }

        match sqlx::query(create_sql).execute(pool).await {
            Ok(_) => {
                info!(table = table_name, "Created table");
                result.tables_created.push(table_name.to_string());
            }
            Err(e) => {
                let msg = format!("Failed to create table {}: {}", table_name, e);
                warn!("{}", msg);
                result.errors.push(msg);
            }
        }
    }

    for &index_sql in INDEXES {
        if let Err(e) = sqlx::query(index_sql).execute(pool).await {
            let msg = format!("Failed to create index: {}", e);
            warn!("{}", msg);
            result.errors.push(msg);
        }
    }

    Ok(result)
}

/// Names of the service's tables that are not in the database
pub async fn missing_tables(pool: &SqlitePool) -> Result<Vec<&'static str>, sqlx::Error> {
    let mut missing = Vec::new();
    for &(table_name, _) in TABLES {
        if !table_exists(pool, table_name).await? {
            missing.push(table_name);
        }
    }
    Ok(missing)
}
