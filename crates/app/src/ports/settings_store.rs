//! Settings store port: durable per-key settings.

use std::future::Future;

use huedeck_domain::action::ActionKind;
use huedeck_domain::error::HueDeckError;
use huedeck_domain::id::ActionContext;
use huedeck_domain::settings::Settings;

/// Persists the settings of each key, slotted by action kind.
pub trait SettingsStore {
    /// Durably write the settings for `context`.
    ///
    /// Callers treat this as fire-and-forget: a failure is logged, never
    /// surfaced to the key.
    fn save(
        &self,
        kind: ActionKind,
        context: &ActionContext,
        settings: &Settings,
    ) -> impl Future<Output = Result<(), HueDeckError>> + Send;

    /// Read back the settings last saved for `context`.
    fn load(
        &self,
        kind: ActionKind,
        context: &ActionContext,
    ) -> impl Future<Output = Result<Option<Settings>, HueDeckError>> + Send;
}

impl<T: SettingsStore + Send + Sync> SettingsStore for std::sync::Arc<T> {
    fn save(
        &self,
        kind: ActionKind,
        context: &ActionContext,
        settings: &Settings,
    ) -> impl Future<Output = Result<(), HueDeckError>> + Send {
        (**self).save(kind, context, settings)
    }

    fn load(
        &self,
        kind: ActionKind,
        context: &ActionContext,
    ) -> impl Future<Output = Result<Option<Settings>, HueDeckError>> + Send {
        (**self).load(kind, context)
    }
}
