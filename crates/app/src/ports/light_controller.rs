//! Light controller port: the stateless command call to a bridge.

use std::future::Future;

use huedeck_domain::command::{StateCommand, Target};
use huedeck_domain::error::HueDeckError;

/// Sends state commands to lights and groups.
///
/// Each call resolves exactly once. Timeouts and transport retries belong to
/// the implementation; a failure is reported as
/// [`HueDeckError::DeviceCommandFailure`].
pub trait LightController {
    fn send(
        &self,
        target: &Target,
        command: &StateCommand,
    ) -> impl Future<Output = Result<(), HueDeckError>> + Send;
}

impl<T: LightController + Send + Sync> LightController for std::sync::Arc<T> {
    fn send(
        &self,
        target: &Target,
        command: &StateCommand,
    ) -> impl Future<Output = Result<(), HueDeckError>> + Send {
        (**self).send(target, command)
    }
}
