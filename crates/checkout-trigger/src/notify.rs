//! User-facing notifications (toasts)

/// Shows short status messages to the user
pub trait Notifier: Send + Sync {
    fn success(&self, message: &str);

    fn error(&self, message: &str);
}

/// Notifier that only records toasts as log events
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn success(&self, message: &str) {
        tracing::info!(toast = message, "success");
    }

    fn error(&self, message: &str) {
        tracing::warn!(toast = message, "error");
    }
}
