//! Request and response shapes of the bridge REST API.

use serde::Deserialize;
use serde_json::{Value, json};

use huedeck_domain::command::{StateCommand, Target};
use huedeck_domain::id::TargetKind;

use crate::error::HueHttpError;

/// `{scheme}://{ip}/api/{username}/lights/{id}/state` or `.../groups/{id}/action`.
pub(crate) fn state_url(scheme: &str, target: &Target) -> String {
    let (collection, leaf) = match target.kind {
        TargetKind::Light => ("lights", "state"),
        TargetKind::Group => ("groups", "action"),
    };
    format!(
        "{scheme}://{ip}/api/{username}/{collection}/{id}/{leaf}",
        ip = target.connection.ip,
        username = target.connection.username,
        id = target.id,
    )
}

pub(crate) fn state_body(command: &StateCommand) -> Value {
    match command {
        StateCommand::Power(on) => json!({ "on": on }),
        StateCommand::Brightness(bri) => json!({ "bri": bri }),
        StateCommand::Color(xy) => json!({ "xy": xy }),
        StateCommand::Scene(scene) => json!({ "scene": scene }),
    }
}

#[derive(Debug, Deserialize)]
struct ResultItem {
    error: Option<BridgeError>,
}

#[derive(Debug, Deserialize)]
struct BridgeError {
    #[serde(rename = "type")]
    code: u16,
    description: String,
}

/// Fail on the first `error` item of the result array.
pub(crate) fn check_results(body: &[u8]) -> Result<(), HueHttpError> {
    let items: Vec<ResultItem> = serde_json::from_slice(body)?;
    match items.into_iter().find_map(|item| item.error) {
        Some(BridgeError { code, description }) => Err(HueHttpError::Bridge { code, description }),
        None => Ok(()),
    }
}
