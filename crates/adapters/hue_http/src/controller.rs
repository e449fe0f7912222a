//! [`LightController`] over the bridge REST API.

use std::future::Future;

use huedeck_app::ports::LightController;
use huedeck_domain::command::{StateCommand, Target};
use huedeck_domain::error::HueDeckError;

use crate::config::HueHttpConfig;
use crate::error::HueHttpError;
use crate::wire::{check_results, state_body, state_url};

/// Sends one `PUT` per command. No retries.
#[derive(Debug, Clone)]
pub struct HueHttpController {
    http: reqwest::Client,
    scheme: String,
}

impl HueHttpController {
    /// Build a controller with the configured timeout applied to every request.
    ///
    /// # Errors
    ///
    /// Returns [`HueHttpError::Client`] if the TLS backend cannot be initialised.
    pub fn new(config: &HueHttpConfig) -> Result<Self, HueHttpError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(HueHttpError::Client)?;
        Ok(Self {
            http,
            scheme: config.scheme.clone(),
        })
    }
}

async fn put_state(
    http: reqwest::Client,
    url: String,
    body: serde_json::Value,
) -> Result<(), HueHttpError> {
    let response = http.put(url).json(&body).send().await?;
    let status = response.status();
    let bytes = response.bytes().await?;
    if !status.is_success() {
        return Err(HueHttpError::Status(status));
    }
    check_results(&bytes)
}

impl LightController for HueHttpController {
    fn send(
        &self,
        target: &Target,
        command: &StateCommand,
    ) -> impl Future<Output = Result<(), HueDeckError>> + Send {
        let http = self.http.clone();
        let url = state_url(&self.scheme, target);
        let body = state_body(command);
        let target = target.to_string();
        async move {
            tracing::trace!(%target, %body, "PUT state");
            put_state(http, url, body).await.map_err(|err| {
                tracing::debug!(%target, error = %err, "bridge call failed");
                HueDeckError::from(err)
            })
        }
    }
}
