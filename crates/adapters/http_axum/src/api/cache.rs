//! JSON REST handlers for the bridge cache.
//!
//! Every write here re-runs default resolution for the live actions.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use huedeck_app::ports::{HostFeedback, LightController, SettingsStore};
use huedeck_domain::cache::{BridgeCacheEntry, CacheSnapshot};
use huedeck_domain::id::BridgeId;

use crate::error::ApiError;
use crate::state::AppState;

/// Possible responses from the cache endpoints.
pub enum CacheResponse {
    Ok(Json<CacheSnapshot>),
    NoContent,
}

impl IntoResponse for CacheResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
            Self::NoContent => StatusCode::NO_CONTENT.into_response(),
        }
    }
}

/// Possible responses from the bridge upsert endpoint.
pub enum BridgeResponse {
    Created(Json<BridgeCacheEntry>),
    Replaced(Json<BridgeCacheEntry>),
}

impl IntoResponse for BridgeResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Created(json) => (StatusCode::CREATED, json).into_response(),
            Self::Replaced(json) => json.into_response(),
        }
    }
}

/// `GET /api/cache`
pub async fn get<S, L, H>(State(state): State<AppState<S, L, H>>) -> CacheResponse
where
    S: SettingsStore + Send + Sync + 'static,
    L: LightController + Send + Sync + 'static,
    H: HostFeedback + Send + Sync + 'static,
{
    CacheResponse::Ok(Json(state.action_service.cache().snapshot()))
}

/// `PUT /api/cache`
pub async fn replace<S, L, H>(
    State(state): State<AppState<S, L, H>>,
    Json(snapshot): Json<CacheSnapshot>,
) -> CacheResponse
where
    S: SettingsStore + Send + Sync + 'static,
    L: LightController + Send + Sync + 'static,
    H: HostFeedback + Send + Sync + 'static,
{
    state.action_service.replace_cache(snapshot).await;
    CacheResponse::NoContent
}

/// `PUT /api/cache/bridges/{id}`
///
/// The path id wins over any id in the body.
pub async fn replace_bridge<S, L, H>(
    State(state): State<AppState<S, L, H>>,
    Path(id): Path<String>,
    Json(mut entry): Json<BridgeCacheEntry>,
) -> BridgeResponse
where
    S: SettingsStore + Send + Sync + 'static,
    L: LightController + Send + Sync + 'static,
    H: HostFeedback + Send + Sync + 'static,
{
    entry.id = BridgeId::from(id);
    let known = state.action_service.replace_bridge(entry.clone()).await;
    if known {
        BridgeResponse::Replaced(Json(entry))
    } else {
        BridgeResponse::Created(Json(entry))
    }
}

/// `DELETE /api/cache/bridges/{id}`
pub async fn remove_bridge<S, L, H>(
    State(state): State<AppState<S, L, H>>,
    Path(id): Path<String>,
) -> Result<CacheResponse, ApiError>
where
    S: SettingsStore + Send + Sync + 'static,
    L: LightController + Send + Sync + 'static,
    H: HostFeedback + Send + Sync + 'static,
{
    state
        .action_service
        .remove_bridge(&BridgeId::from(id))
        .await?;
    Ok(CacheResponse::NoContent)
}
