//! Shared application state for axum handlers.

use std::sync::Arc;

use huedeck_app::ports::{HostFeedback, LightController, SettingsStore};
use huedeck_app::services::action_service::ActionService;

/// Application state shared across all axum handlers.
///
/// Generic over the port implementations to avoid dynamic dispatch.
/// `Clone` is implemented manually so the service itself does not need to
/// be `Clone`; only the `Arc` is cloned.
pub struct AppState<S, L, H> {
    /// Live actions, key presses and the cache they resolve against.
    pub action_service: Arc<ActionService<S, L, H>>,
}

impl<S, L, H> Clone for AppState<S, L, H> {
    fn clone(&self) -> Self {
        Self {
            action_service: Arc::clone(&self.action_service),
        }
    }
}

impl<S, L, H> AppState<S, L, H>
where
    S: SettingsStore + Send + Sync + 'static,
    L: LightController + Send + Sync + 'static,
    H: HostFeedback + Send + Sync + 'static,
{
    /// Wrap a service for sharing across handlers.
    pub fn new(action_service: ActionService<S, L, H>) -> Self {
        Self {
            action_service: Arc::new(action_service),
        }
    }
}
