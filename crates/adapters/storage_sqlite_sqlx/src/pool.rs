//! Opening the settings database.
//!
//! The database holds one table of per-key settings. It is created on first
//! start and brought up to date with the embedded migrations before the
//! store hands out any row.

use std::str::FromStr;
use std::time::Duration;

use sqlx::SqlitePool;
use sqlx::sqlite::SqliteConnectOptions;

use crate::error::StorageError;

/// Concurrent key presses may save at the same moment; writers wait this
/// long for the file lock instead of failing straight away.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Where the settings live.
pub struct Config {
    /// `sqlx` URL such as `sqlite:huedeck.db?mode=rwc`, or `sqlite::memory:`
    /// for a throwaway store.
    pub database_url: String,
}

impl Config {
    /// Open the database and apply pending migrations.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] for a malformed URL, an unreachable file or a
    /// failed migration.
    pub async fn build(self) -> Result<Database, StorageError> {
        Database::open(&self.database_url).await
    }
}

/// An open settings database.
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    async fn open(database_url: &str) -> Result<Self, StorageError> {
        let options = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .busy_timeout(BUSY_TIMEOUT);
        let pool = SqlitePool::connect_with(options).await?;

        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::debug!(url = database_url, "settings database ready");

        Ok(Self { pool })
    }

    /// Pool handed to [`SqliteSettingsStore`](crate::SqliteSettingsStore).
    #[must_use]
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn should_create_settings_table_when_using_memory_db() {
        let db = Config {
            database_url: "sqlite::memory:".to_string(),
        }
        .build()
        .await
        .unwrap();

        let tables: Vec<(String,)> = sqlx::query_as(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%' AND name != '_sqlx_migrations' ORDER BY name",
        )
        .fetch_all(db.pool())
        .await
        .unwrap();

        let names: Vec<&str> = tables.iter().map(|row| row.0.as_str()).collect();
        assert_eq!(names, vec!["action_settings"]);
    }

    #[tokio::test]
    async fn should_start_with_no_saved_settings() {
        let db = Config {
            database_url: "sqlite::memory:".to_string(),
        }
        .build()
        .await
        .unwrap();

        let (rows,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM action_settings")
            .fetch_one(db.pool())
            .await
            .unwrap();

        assert_eq!(rows, 0);
    }
}
