//! Bridge client errors and their mapping onto the domain error.

use huedeck_domain::error::{DeviceCommandError, HueDeckError};

/// Errors raised while talking to a bridge.
#[derive(Debug, thiserror::Error)]
pub enum HueHttpError {
    /// The HTTP client could not be built.
    #[error("failed to build HTTP client")]
    Client(#[source] reqwest::Error),

    /// Connection, timeout or body read failure.
    #[error("bridge request failed")]
    Transport(#[from] reqwest::Error),

    /// The bridge answered with a non-success status.
    #[error("bridge responded with HTTP {0}")]
    Status(reqwest::StatusCode),

    /// The response body is not the bridge's result array.
    #[error("unexpected bridge response")]
    Decode(#[from] serde_json::Error),

    /// The bridge refused the command.
    #[error("{description}")]
    Bridge { code: u16, description: String },
}

impl From<HueHttpError> for HueDeckError {
    fn from(err: HueHttpError) -> Self {
        let failure = match err {
            HueHttpError::Bridge { code, description } => DeviceCommandError::Rejected {
                code: Some(code),
                description,
            },
            HueHttpError::Status(_) | HueHttpError::Decode(_) => DeviceCommandError::Rejected {
                code: None,
                description: err.to_string(),
            },
            HueHttpError::Client(_) | HueHttpError::Transport(_) => {
                DeviceCommandError::Unreachable(Box::new(err))
            }
        };
        failure.into()
    }
}
