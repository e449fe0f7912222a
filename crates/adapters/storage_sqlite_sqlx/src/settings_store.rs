//! `SQLite` implementation of [`SettingsStore`].

use std::future::Future;

use sqlx::SqlitePool;

use huedeck_app::ports::SettingsStore;
use huedeck_domain::action::ActionKind;
use huedeck_domain::error::HueDeckError;
use huedeck_domain::id::ActionContext;
use huedeck_domain::settings::Settings;
use huedeck_domain::time::now;

use crate::error::StorageError;

const UPSERT: &str = "INSERT INTO action_settings (kind, context, settings, updated_at) \
     VALUES (?, ?, ?, ?) \
     ON CONFLICT (kind, context) DO UPDATE SET settings = excluded.settings, updated_at = excluded.updated_at";
const SELECT_ONE: &str = "SELECT settings FROM action_settings WHERE kind = ? AND context = ?";

/// `SQLite`-backed settings store, one row per action kind and key.
#[derive(Clone)]
pub struct SqliteSettingsStore {
    pool: SqlitePool,
}

impl SqliteSettingsStore {
    /// Create a new store using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl SettingsStore for SqliteSettingsStore {
    fn save(
        &self,
        kind: ActionKind,
        context: &ActionContext,
        settings: &Settings,
    ) -> impl Future<Output = Result<(), HueDeckError>> + Send {
        let pool = self.pool.clone();
        let context = context.to_string();
        let encoded = serde_json::to_string(settings);
        async move {
            let encoded = encoded.map_err(StorageError::from)?;
            sqlx::query(UPSERT)
                .bind(kind.settings_key())
                .bind(&context)
                .bind(encoded)
                .bind(now().to_rfc3339())
                .execute(&pool)
                .await
                .map_err(StorageError::from)?;

            tracing::trace!(%kind, %context, "settings saved");
            Ok(())
        }
    }

    fn load(
        &self,
        kind: ActionKind,
        context: &ActionContext,
    ) -> impl Future<Output = Result<Option<Settings>, HueDeckError>> + Send {
        let pool = self.pool.clone();
        let context = context.to_string();
        async move {
            let row: Option<(String,)> = sqlx::query_as(SELECT_ONE)
                .bind(kind.settings_key())
                .bind(&context)
                .fetch_optional(&pool)
                .await
                .map_err(StorageError::from)?;

            row.map(|(raw,)| serde_json::from_str(&raw))
                .transpose()
                .map_err(|err| StorageError::from(err).into())
        }
    }
}
