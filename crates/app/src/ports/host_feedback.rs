//! Host feedback port: what the key surface shows when something fails.

use huedeck_domain::id::ActionContext;

/// Diagnostic and visual feedback on the host surface. Fire-and-forget.
pub trait HostFeedback {
    /// Write a plain diagnostic line to the host log.
    fn log_message(&self, message: &str);

    /// Mark the key as failed.
    fn show_alert(&self, context: &ActionContext);
}

impl<T: HostFeedback> HostFeedback for std::sync::Arc<T> {
    fn log_message(&self, message: &str) {
        (**self).log_message(message);
    }

    fn show_alert(&self, context: &ActionContext) {
        (**self).show_alert(context);
    }
}
