//! Shared database handle
//!
//! Owns the single connection pool used by the credential store. The pool is
//! established lazily on first use, checked with a ping, migrated, and then
//! reused for the lifetime of the process until [`Database::close`] is called.
//! Concurrent access from independent sessions goes through the sqlx pool.

use crate::credentials::error::DatabaseError;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, error, info};

/// Maximum number of pooled connections
const MAX_CONNECTIONS: u32 = 5;

/// Time allowed to acquire a connection (covers connect and server selection)
const ACQUIRE_TIMEOUT: Duration = Duration::from_millis(5000);

/// Lazily connected database handle
pub struct Database {
    url: String,
    pool: Mutex<Option<SqlitePool>>,
}

impl Database {
    /// Create a handle for the given connection string without connecting
    ///
    /// Accepts `sqlite:path`, `sqlite://path` or a bare file path.
    pub fn new(url: impl Into<String>) -> Self {
        let url = url.into();
        let url = if url.starts_with("sqlite:") {
            url
        } else {
            format!("sqlite:{}", url)
        };
        Self {
            url,
            pool: Mutex::new(None),
        }
    }

    /// Connection string this handle connects to
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Whether a connection is currently established
    pub async fn is_connected(&self) -> bool {
        self.pool.lock().await.is_some()
    }

    /// Get the shared pool, connecting on first use
    ///
    /// # Returns
    /// * `Ok(SqlitePool)` - Cheap clone of the shared pool
    /// * `Err(DatabaseError)` - If connecting, pinging or migrating failed.
    ///   No handle is kept in that case, so the next call tries again.
    pub async fn handle(&self) -> Result<SqlitePool, DatabaseError> {
        let mut guard = self.pool.lock().await;
        if let Some(pool) = guard.as_ref() {
            return Ok(pool.clone());
        }

        info!(url = %self.url, "Establishing new database connection...");
        let pool = self.connect().await.inspect_err(|e| {
            error!(error = %e, "Failed to connect to database");
        })?;
        info!("Successfully connected to database");

        *guard = Some(pool.clone());
        Ok(pool)
    }

    /// Close the shared pool
    ///
    /// Safe to call when no connection is open.
    pub async fn close(&self) {
        let pool = self.pool.lock().await.take();
        match pool {
            Some(pool) => {
                pool.close().await;
                info!("Database connection closed");
            }
            None => debug!("Database close requested with no open connection"),
        }
    }

    async fn connect(&self) -> Result<SqlitePool, DatabaseError> {
        if let Some(parent) = self.file_path().and_then(|p| p.parent().map(PathBuf::from)) {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(&parent).map_err(|e| {
                    DatabaseError::Connect(format!("Failed to create db directory: {}", e))
                })?;
            }
        }

        let options = SqliteConnectOptions::from_str(&self.url)
            .map_err(|e| DatabaseError::InvalidUrl(e.to_string()))?
            .create_if_missing(true);

        // Each connection to an in-memory database gets its own empty copy,
        // so the pool must hold exactly one connection and never recycle it.
        let pool_options = if self.is_in_memory() {
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(MAX_CONNECTIONS)
        };

        let pool = pool_options
            .acquire_timeout(ACQUIRE_TIMEOUT)
            .connect_with(options)
            .await
            .map_err(|e| DatabaseError::Connect(e.to_string()))?;

        // Ping
        sqlx::query("SELECT 1")
            .execute(&pool)
            .await
            .map_err(|e| DatabaseError::Connect(format!("Ping failed: {}", e)))?;

        run_migrations(&pool).await?;
        Ok(pool)
    }

    /// Whether the URL names a private in-memory database
    fn is_in_memory(&self) -> bool {
        self.url.contains(":memory:") || self.url.contains("mode=memory")
    }

    /// Filesystem path of the database file, if the URL names one
    fn file_path(&self) -> Option<PathBuf> {
        let rest = self
            .url
            .strip_prefix("sqlite://")
            .or_else(|| self.url.strip_prefix("sqlite:"))?;
        let path = rest.split('?').next().unwrap_or_default();
        if path.is_empty() || self.is_in_memory() {
            None
        } else {
            Some(PathBuf::from(path))
        }
    }
}

/// Run schema migrations against a freshly connected pool
async fn run_migrations(pool: &SqlitePool) -> Result<(), DatabaseError> {
    debug!("Running database migrations...");

    let migration_sql = include_str!("../../migrations/001_create_users.sql");

    // Strip comments before splitting into statements
    let mut cleaned_sql = String::new();
    for line in migration_sql.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with("--") {
            continue;
        }
        let without_comments = match trimmed.find("--") {
            Some(pos) => &trimmed[..pos],
            None => trimmed,
        };
        cleaned_sql.push_str(without_comments.trim());
        cleaned_sql.push(' ');
    }

    for statement in cleaned_sql.split(';').map(str::trim).filter(|s| !s.is_empty()) {
        sqlx::query(statement).execute(pool).await.map_err(|e| {
            DatabaseError::Migration(format!(
                "{} - Statement: {}",
                e,
                statement.chars().take(100).collect::<String>()
            ))
        })?;
    }

    debug!("Database migrations completed successfully");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn temp_db() -> (TempDir, Database) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("users.db");
        let db = Database::new(path.to_string_lossy().to_string());
        (dir, db)
    }

    #[test]
    fn test_new_prefixes_bare_path() {
        let db = Database::new("/tmp/users.db");
        assert_eq!(db.url(), "sqlite:/tmp/users.db");

        let db = Database::new("sqlite://data/users.db");
        assert_eq!(db.url(), "sqlite://data/users.db");
    }

    #[tokio::test]
    async fn test_handle_connects_lazily() {
        let (_dir, db) = temp_db();
        assert!(!db.is_connected().await);

        let pool = db.handle().await.unwrap();
        assert!(db.is_connected().await);

        // Migration created the users table
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count.0, 0);
    }

    #[tokio::test]
    async fn test_handle_reuses_pool() {
        let (_dir, db) = temp_db();
        let first = db.handle().await.unwrap();
        sqlx::query("INSERT INTO users (email, password_hash, created_at) VALUES ('a', x'00', 0)")
            .execute(&first)
            .await
            .unwrap();

        let second = db.handle().await.unwrap();
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(&second)
            .await
            .unwrap();
        assert_eq!(count.0, 1);
    }

    #[tokio::test]
    async fn test_close_is_idempotent() {
        let (_dir, db) = temp_db();
        db.close().await;

        db.handle().await.unwrap();
        db.close().await;
        assert!(!db.is_connected().await);
        db.close().await;

        // Reconnects after teardown
        db.handle().await.unwrap();
        assert!(db.is_connected().await);
    }

    #[tokio::test]
    async fn test_in_memory_database_is_shared_across_queries() {
        let db = Database::new("sqlite::memory:");
        let pool = db.handle().await.unwrap();

        sqlx::query("INSERT INTO users (email, password_hash, created_at) VALUES ('a', x'00', 0)")
            .execute(&pool)
            .await
            .unwrap();

        // Concurrent readers all see the migrated table and the row
        let mut handles = Vec::new();
        for _ in 0..8 {
            let pool = pool.clone();
            handles.push(tokio::spawn(async move {
                let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
                    .fetch_one(&pool)
                    .await
                    .unwrap();
                count.0
            }));
        }
        for handle in handles {
            assert_eq!(handle.await.unwrap(), 1);
        }
        assert_eq!(pool.size(), 1);
    }

    #[tokio::test]
    async fn test_connect_failure_keeps_no_handle() {
        let dir = TempDir::new().unwrap();
        // A directory cannot be opened as a database file
        let db = Database::new(dir.path().to_string_lossy().to_string());

        assert!(db.handle().await.is_err());
        assert!(!db.is_connected().await);
    }
}
