//! Dispatcher: validate, send one command, record the outcome.
//!
//! A key press is validated against the cache first. Any failing check
//! stops the press before the bridge is contacted and is reported to the
//! host. A command that the bridge accepts is written back into the cache
//! so the next toggle reads the new state.

use huedeck_domain::action::ActionKind;
use huedeck_domain::command::{DispatchPlan, KeyInput, plan};
use huedeck_domain::error::HueDeckError;
use huedeck_domain::id::{ActionContext, DispatchId};
use huedeck_domain::settings::Settings;
use huedeck_domain::validate::validate;

use crate::cache::SharedCache;
use crate::ports::{HostFeedback, LightController};

/// Everything a single key press needs.
#[derive(Debug, Clone)]
pub struct DispatchRequest {
    pub context: ActionContext,
    pub kind: ActionKind,
    /// The settings the action holds when the key is released.
    pub settings: Settings,
    pub input: KeyInput,
}

/// How a key press ended.
#[derive(Debug)]
pub enum DispatchOutcome {
    /// The bridge accepted the command and the cache was updated.
    Applied(DispatchPlan),
    /// Validation failed; no command was sent.
    Rejected(HueDeckError),
    /// The command was sent and failed; the cache is unchanged.
    Failed(HueDeckError),
}

impl DispatchOutcome {
    #[must_use]
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied(_))
    }

    /// The error behind a rejected or failed press.
    #[must_use]
    pub fn error(&self) -> Option<&HueDeckError> {
        match self {
            Self::Applied(_) => None,
            Self::Rejected(err) | Self::Failed(err) => Some(err),
        }
    }
}

/// Turns key presses into bridge commands.
pub struct Dispatcher<L, H> {
    controller: L,
    feedback: H,
}

impl<L, H> Dispatcher<L, H>
where
    L: LightController,
    H: HostFeedback,
{
    pub fn new(controller: L, feedback: H) -> Self {
        Self {
            controller,
            feedback,
        }
    }

    /// Handle one key press.
    ///
    /// The cache lock is only held while planning. The command is sent
    /// with the lock released and the result is written under a fresh
    /// write lock.
    pub async fn dispatch(&self, cache: &SharedCache, request: DispatchRequest) -> DispatchOutcome {
        let dispatch_id = DispatchId::new();
        let DispatchRequest {
            context,
            kind,
            settings,
            input,
        } = request;

        let planned = cache.read(|snapshot| {
            validate(kind, &settings, snapshot).map(|validated| plan(&validated, input))
        });
        let plan = match planned {
            Ok(plan) => plan,
            Err(err) => {
                tracing::warn!(
                    %dispatch_id,
                    %context,
                    %kind,
                    error = %err,
                    "key press rejected"
                );
                self.report(&context, &err);
                return DispatchOutcome::Rejected(err);
            }
        };

        tracing::debug!(
            %dispatch_id,
            %context,
            target = %plan.target,
            command = %plan.command,
            "sending command"
        );
        match self.controller.send(&plan.target, &plan.command).await {
            Ok(()) => {
                if !cache.apply(&plan.bridge, &plan.key, &plan.command) {
                    tracing::debug!(
                        %dispatch_id,
                        target = %plan.target,
                        "target left the cache before the command completed"
                    );
                }
                tracing::info!(
                    %dispatch_id,
                    %context,
                    target = %plan.target,
                    command = %plan.command,
                    "command applied"
                );
                DispatchOutcome::Applied(plan)
            }
            Err(err) => {
                tracing::warn!(
                    %dispatch_id,
                    %context,
                    target = %plan.target,
                    error = %err,
                    "command failed"
                );
                self.report(&context, &err);
                DispatchOutcome::Failed(err)
            }
        }
    }

    fn report(&self, context: &ActionContext, err: &HueDeckError) {
        self.feedback.log_message(&err.to_string());
        self.feedback.show_alert(context);
    }
}
