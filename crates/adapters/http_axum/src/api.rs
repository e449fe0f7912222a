//! JSON REST API handler modules.

#[allow(clippy::missing_errors_doc)]
pub mod actions;
#[allow(clippy::missing_errors_doc)]
pub mod cache;

use axum::Router;
use axum::routing::{get, post, put};

use huedeck_app::ports::{HostFeedback, LightController, SettingsStore};

use crate::state::AppState;

/// Build the `/api` sub-router.
pub fn routes<S, L, H>() -> Router<AppState<S, L, H>>
where
    S: SettingsStore + Send + Sync + 'static,
    L: LightController + Send + Sync + 'static,
    H: HostFeedback + Send + Sync + 'static,
{
    Router::new()
        // Actions
        .route(
            "/actions",
            get(actions::list::<S, L, H>).post(actions::appear::<S, L, H>),
        )
        .route(
            "/actions/{context}",
            get(actions::get::<S, L, H>).delete(actions::disappear::<S, L, H>),
        )
        .route(
            "/actions/{context}/settings",
            put(actions::set_settings::<S, L, H>),
        )
        .route("/actions/{context}/key-up", post(actions::key_up::<S, L, H>))
        // Cache
        .route(
            "/cache",
            get(cache::get::<S, L, H>).put(cache::replace::<S, L, H>),
        )
        .route(
            "/cache/bridges/{id}",
            put(cache::replace_bridge::<S, L, H>).delete(cache::remove_bridge::<S, L, H>),
        )
}
