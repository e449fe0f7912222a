//! Axum router assembly.

use axum::Router;
use axum::routing::get;
use tower_http::trace::TraceLayer;

use huedeck_app::ports::{HostFeedback, LightController, SettingsStore};

use crate::state::AppState;

/// Build the top-level axum [`Router`].
///
/// Nests API routes under `/api` and includes a [`TraceLayer`] that logs
/// each HTTP request/response at the `DEBUG` level.
pub fn build<S, L, H>(state: AppState<S, L, H>) -> Router
where
    S: SettingsStore + Send + Sync + 'static,
    L: LightController + Send + Sync + 'static,
    H: HostFeedback + Send + Sync + 'static,
{
    Router::new()
        .route("/health", get(health_check))
        .nest("/api", crate::api::routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}
