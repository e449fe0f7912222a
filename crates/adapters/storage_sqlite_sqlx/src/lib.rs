//! # huedeck-adapter-storage-sqlite-sqlx
//!
//! `SQLite` persistence adapter using [sqlx](https://docs.rs/sqlx).
//!
//! ## Responsibilities
//! - Implement the [`SettingsStore`](huedeck_app::ports::SettingsStore) port
//! - Manage `SQLite` connection pool lifecycle
//! - Run database migrations (using sqlx embedded migrations)
//!
//! ## Dependency rule
//! Depends on `huedeck-app` (for port traits) and `huedeck-domain` (for domain types).
//! The `app` and `domain` crates must never reference this adapter.

mod error;
mod pool;
mod settings_store;

pub use error::StorageError;
pub use pool::{Config, Database};
pub use settings_store::SqliteSettingsStore;
