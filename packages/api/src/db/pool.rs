//! SQLite connection pool with an explicit open/close lifecycle.

use std::str::FromStr;

use sqlx::migrate::MigrateError;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

use super::SqlStore;
use crate::settings;

/// Handle to the application database. Cloning shares the pool.
#[derive(Clone, Debug)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Open a pool for the configured URL.
    pub async fn connect(settings: &settings::Database) -> Result<Self, sqlx::Error> {
        let options = SqliteConnectOptions::from_str(&settings.url)?
            .create_if_missing(true)
            .foreign_keys(true);

        // Every connection to `:memory:` is its own database, so keep exactly one alive.
        let pool = if settings.url.contains(":memory:") {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
                .connect_with(options)
                .await?
        } else {
            SqlitePoolOptions::new()
                .max_connections(settings.max_connections)
                .connect_with(options)
                .await?
        };

        tracing::info!(url = %settings.url, "Database connected");
        Ok(Self { pool })
    }

    /// A fresh, migrated in-memory database.
    pub async fn in_memory() -> Result<Self, sqlx::Error> {
        let db = Self::connect(&settings::Database {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
        })
        .await?;
        db.migrate().await?;
        Ok(db)
    }

    /// Apply pending migrations from `migrations/`.
    pub async fn migrate(&self) -> Result<(), MigrateError> {
        sqlx::migrate!("./migrations").run(&self.pool).await
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Store backed by this database.
    pub fn store(&self) -> SqlStore {
        SqlStore::new(self.pool.clone())
    }

    /// Close every connection; later queries fail.
    pub async fn close(&self) {
        self.pool.close().await;
        tracing::info!("Database closed");
    }
}
