//! JSON REST handlers for live actions and key presses.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use huedeck_app::ports::{HostFeedback, LightController, SettingsStore};
use huedeck_app::services::action_service::{ActionView, KeyUp};
use huedeck_app::services::dispatcher::DispatchOutcome;
use huedeck_domain::action::ActionKind;
use huedeck_domain::command::StateCommand;
use huedeck_domain::id::{ActionContext, BridgeId, TargetId};
use huedeck_domain::settings::Settings;

use crate::error::ApiError;
use crate::state::AppState;

/// Request body for registering a key.
#[derive(Deserialize)]
pub struct AppearRequest {
    pub context: ActionContext,
    pub action: ActionKind,
    /// Settings the host already holds. Omit to load the persisted ones.
    pub settings: Option<Settings>,
}

/// Request body for a key release.
#[derive(Deserialize, Default)]
#[serde(default)]
pub struct KeyUpRequest {
    pub settings: Option<Settings>,
    pub desired_state: Option<u8>,
}

/// What was sent for an applied key press.
#[derive(Serialize)]
pub struct AppliedBody {
    pub bridge: BridgeId,
    pub light: TargetId,
    pub command: StateCommand,
}

/// Possible responses from the list endpoint.
pub enum ListResponse {
    Ok(Json<Vec<ActionView>>),
}

impl IntoResponse for ListResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from endpoints returning one action.
pub enum ViewResponse {
    Ok(Json<ActionView>),
    Created(Json<ActionView>),
}

impl IntoResponse for ViewResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
            Self::Created(json) => (StatusCode::CREATED, json).into_response(),
        }
    }
}

/// Possible responses from the delete endpoint.
pub enum DeleteResponse {
    NoContent,
}

impl IntoResponse for DeleteResponse {
    fn into_response(self) -> Response {
        match self {
            Self::NoContent => StatusCode::NO_CONTENT.into_response(),
        }
    }
}

/// Possible responses from the key-up endpoint.
pub enum KeyUpResponse {
    Applied(Json<AppliedBody>),
}

impl IntoResponse for KeyUpResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Applied(json) => json.into_response(),
        }
    }
}

/// `GET /api/actions`
pub async fn list<S, L, H>(State(state): State<AppState<S, L, H>>) -> ListResponse
where
    S: SettingsStore + Send + Sync + 'static,
    L: LightController + Send + Sync + 'static,
    H: HostFeedback + Send + Sync + 'static,
{
    ListResponse::Ok(Json(state.action_service.list().await))
}

/// `POST /api/actions`
pub async fn appear<S, L, H>(
    State(state): State<AppState<S, L, H>>,
    Json(req): Json<AppearRequest>,
) -> Result<ViewResponse, ApiError>
where
    S: SettingsStore + Send + Sync + 'static,
    L: LightController + Send + Sync + 'static,
    H: HostFeedback + Send + Sync + 'static,
{
    let view = state
        .action_service
        .will_appear(req.context, req.action, req.settings)
        .await?;
    Ok(ViewResponse::Created(Json(view)))
}

/// `GET /api/actions/{context}`
pub async fn get<S, L, H>(
    State(state): State<AppState<S, L, H>>,
    Path(context): Path<String>,
) -> Result<ViewResponse, ApiError>
where
    S: SettingsStore + Send + Sync + 'static,
    L: LightController + Send + Sync + 'static,
    H: HostFeedback + Send + Sync + 'static,
{
    let view = state
        .action_service
        .settings(&ActionContext::from(context))
        .await?;
    Ok(ViewResponse::Ok(Json(view)))
}

/// `DELETE /api/actions/{context}`
pub async fn disappear<S, L, H>(
    State(state): State<AppState<S, L, H>>,
    Path(context): Path<String>,
) -> Result<DeleteResponse, ApiError>
where
    S: SettingsStore + Send + Sync + 'static,
    L: LightController + Send + Sync + 'static,
    H: HostFeedback + Send + Sync + 'static,
{
    state
        .action_service
        .will_disappear(&ActionContext::from(context))?;
    Ok(DeleteResponse::NoContent)
}

/// `PUT /api/actions/{context}/settings`
pub async fn set_settings<S, L, H>(
    State(state): State<AppState<S, L, H>>,
    Path(context): Path<String>,
    Json(settings): Json<Settings>,
) -> Result<ViewResponse, ApiError>
where
    S: SettingsStore + Send + Sync + 'static,
    L: LightController + Send + Sync + 'static,
    H: HostFeedback + Send + Sync + 'static,
{
    let view = state
        .action_service
        .set_settings(&ActionContext::from(context), settings)
        .await?;
    Ok(ViewResponse::Ok(Json(view)))
}

/// `POST /api/actions/{context}/key-up`
///
/// Rejections answer `422`, device failures `502`; the host has already
/// been alerted in both cases.
pub async fn key_up<S, L, H>(
    State(state): State<AppState<S, L, H>>,
    Path(context): Path<String>,
    Json(req): Json<KeyUpRequest>,
) -> Result<KeyUpResponse, ApiError>
where
    S: SettingsStore + Send + Sync + 'static,
    L: LightController + Send + Sync + 'static,
    H: HostFeedback + Send + Sync + 'static,
{
    let event = KeyUp {
        settings: req.settings,
        desired_state: req.desired_state,
    };
    match state
        .action_service
        .key_up(&ActionContext::from(context), event)
        .await?
    {
        DispatchOutcome::Applied(plan) => Ok(KeyUpResponse::Applied(Json(AppliedBody {
            bridge: plan.bridge,
            light: plan.key,
            command: plan.command,
        }))),
        DispatchOutcome::Rejected(err) | DispatchOutcome::Failed(err) => Err(err.into()),
    }
}
