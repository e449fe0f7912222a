//! Storage-specific error type wrapping sqlx errors.

use huedeck_domain::error::HueDeckError;

/// Errors originating from the `SQLite` storage layer.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// A query or connection failed.
    #[error("database error")]
    Database(#[from] sqlx::Error),

    /// Stored settings are not a JSON object.
    #[error("JSON deserialization error")]
    Json(#[from] serde_json::Error),

    /// Failed to run migrations.
    #[error("migration error")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

impl From<StorageError> for HueDeckError {
    fn from(err: StorageError) -> Self {
        Self::Storage(Box::new(err))
    }
}
