//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into [`HueDeckError`]
//! via `From`. The `Display` output of the configuration and staleness
//! variants is the exact diagnostic handed to the host log sink, so it names
//! the single prerequisite that failed.

use crate::id::{BridgeId, TargetId};

/// Top-level error for the huedeck workspace.
#[derive(Debug, thiserror::Error)]
pub enum HueDeckError {
    /// A required settings field is absent or unusable.
    #[error(transparent)]
    MissingConfiguration(#[from] MissingConfiguration),

    /// A settings field names something that is no longer in the cache.
    #[error(transparent)]
    StaleReference(#[from] StaleReference),

    /// The bridge reported a failure for a device command.
    #[error(transparent)]
    DeviceCommandFailure(#[from] DeviceCommandError),

    /// A looked-up item does not exist (unknown action context, …).
    #[error(transparent)]
    NotFound(#[from] NotFoundError),

    /// Persistence failed.
    #[error("storage error")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl HueDeckError {
    /// Whether this error was raised before any command reached a bridge.
    #[must_use]
    pub fn is_rejection(&self) -> bool {
        matches!(self, Self::MissingConfiguration(_) | Self::StaleReference(_))
    }
}

/// A settings field that must be present (and usable) before dispatch.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MissingConfiguration {
    #[error("No bridge configured")]
    Bridge,

    #[error("No light or group configured")]
    Light,

    /// The action-kind value field (e.g. `brightness`) is absent.
    #[error("No {field} configured")]
    Value { field: &'static str },

    /// The value field is present but cannot be interpreted.
    #[error("Invalid {field} configured: {value}")]
    InvalidValue { field: &'static str, value: String },

    /// Scenes only exist on groups.
    #[error("Scenes can only be recalled on a group")]
    GroupRequired,
}

/// A reference in settings that the current cache does not contain.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StaleReference {
    #[error("Bridge {0} not found in cache")]
    Bridge(BridgeId),

    #[error("Light or group {0} not found in cache")]
    Light(TargetId),

    #[error("Scene {0} not found in cache")]
    Scene(String),
}

/// Failure reported while sending a command to a bridge.
#[derive(Debug, thiserror::Error)]
pub enum DeviceCommandError {
    /// The bridge answered but refused the command.
    #[error("{description}")]
    Rejected {
        /// Hue error type code, when the bridge supplied one.
        code: Option<u16>,
        /// Human-readable reason from the bridge.
        description: String,
    },

    /// The bridge could not be reached or answered with garbage.
    #[error("bridge unreachable")]
    Unreachable(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Returned when a lookup finds nothing.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{entity} {id} not found")]
pub struct NotFoundError {
    pub entity: &'static str,
    pub id: String,
}
