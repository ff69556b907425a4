//! Signals sent to other processes after data changes
//!
//! The store asks the widget to reload its timeline after every mutation; the
//! widget process additionally pokes the app so a foregrounded app reloads.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Default widget kind whose timeline is reloaded
pub const DEFAULT_WIDGET_KIND: &str = "HabitWidget";

/// Outbound refresh signals
pub trait RefreshSignal: Send + Sync {
    /// Reload the timeline of one widget kind (not every widget)
    fn reload_widget_timeline(&self, kind: &str);

    /// Tell a running app that the shared data changed underneath it
    fn notify_app(&self) {}
}

/// Signal that only records the request in the log
///
/// Used by the CLI, where there is no widget system to poke.
#[derive(Debug, Default)]
pub struct TracingSignal;

impl RefreshSignal for TracingSignal {
    fn reload_widget_timeline(&self, kind: &str) {
        tracing::info!("Requested timeline reload for widget kind '{}'", kind);
    }

    fn notify_app(&self) {
        tracing::info!("Notified app of external data change");
    }
}

/// Signal that counts requests, for tests
#[derive(Debug, Default)]
pub struct RecordingSignal {
    reloads: Mutex<Vec<String>>,
    app_notifications: AtomicUsize,
}

impl RecordingSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Widget kinds reloaded so far, in order
    pub fn reloads(&self) -> Vec<String> {
        self.reloads
            .lock()
            .map(|kinds| kinds.clone())
            .unwrap_or_default()
    }

    pub fn app_notifications(&self) -> usize {
        self.app_notifications.load(Ordering::SeqCst)
    }
}

impl RefreshSignal for RecordingSignal {
    fn reload_widget_timeline(&self, kind: &str) {
        if let Ok(mut kinds) = self.reloads.lock() {
            kinds.push(kind.to_string());
        }
    }

    fn notify_app(&self) {
        self.app_notifications.fetch_add(1, Ordering::SeqCst);
    }
}

impl<T: RefreshSignal + ?Sized> RefreshSignal for std::sync::Arc<T> {
    fn reload_widget_timeline(&self, kind: &str) {
        (**self).reload_widget_timeline(kind)
    }

    fn notify_app(&self) {
        (**self).notify_app()
    }
}
