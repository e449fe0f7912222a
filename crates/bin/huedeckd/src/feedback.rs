//! Host feedback written to the `host` tracing target.
//!
//! The daemon has no key surface of its own; whatever fronts it (a plugin
//! shim, a CLI) tails these events.

use huedeck_app::ports::HostFeedback;
use huedeck_domain::id::ActionContext;

/// [`HostFeedback`] that logs instead of drawing.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogFeedback;

impl HostFeedback for LogFeedback {
    fn log_message(&self, message: &str) {
        tracing::info!(target: "host", "{message}");
    }

    fn show_alert(&self, context: &ActionContext) {
        tracing::warn!(target: "host", %context, "alert");
    }
}
