//! Busy-indicator capability handed to long-running operations.
//!
//! Operations never reach for a process-wide overlay; they receive a
//! [`ProgressReporter`] and call `show`/`hide` on it.

use std::sync::{Arc, Mutex};

use serde::Serialize;

pub trait ProgressReporter: Send + Sync {
    fn show(&self, message: &str, detail: Option<&str>);
    fn hide(&self);
}

/// Reporter that discards every call.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn show(&self, _message: &str, _detail: Option<&str>) {}
    fn hide(&self) {}
}

/// Reporter that turns overlay transitions into tracing events.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingProgress;

impl ProgressReporter for TracingProgress {
    fn show(&self, message: &str, detail: Option<&str>) {
        tracing::info!(detail = detail.unwrap_or(""), "{message}");
    }

    fn hide(&self) {
        tracing::debug!("busy indicator dismissed");
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OverlaySnapshot {
    pub visible: bool,
    pub message: String,
    pub detail: String,
}

impl Default for OverlaySnapshot {
    fn default() -> Self {
        Self {
            visible: false,
            message: "Loading...".to_string(),
            detail: String::new(),
        }
    }
}

/// Single overlay shared by every holder of the handle.
///
/// Calls are idempotent: `show` replaces the text and makes the overlay
/// visible, `hide` makes it invisible no matter how many `show` calls came
/// before it.
#[derive(Debug, Default, Clone)]
pub struct BusyOverlay {
    state: Arc<Mutex<OverlaySnapshot>>,
}

impl BusyOverlay {
    pub fn snapshot(&self) -> OverlaySnapshot {
        self.state
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }

    pub fn is_visible(&self) -> bool {
        self.snapshot().visible
    }
}

impl ProgressReporter for BusyOverlay {
    fn show(&self, message: &str, detail: Option<&str>) {
        if let Ok(mut guard) = self.state.lock() {
            guard.visible = true;
            guard.message = if message.is_empty() {
                "Loading...".to_string()
            } else {
                message.to_string()
            };
            guard.detail = detail.unwrap_or_default().to_string();
        }
    }

    fn hide(&self) {
        if let Ok(mut guard) = self.state.lock() {
            guard.visible = false;
        }
    }
}

/// Hides the reporter when dropped so early returns cannot leave the overlay up.
pub(crate) struct ProgressGuard<'a> {
    reporter: &'a dyn ProgressReporter,
}

impl<'a> ProgressGuard<'a> {
    pub(crate) fn show(reporter: &'a dyn ProgressReporter, message: &str) -> Self {
        reporter.show(message, None);
        Self { reporter }
    }
}

impl Drop for ProgressGuard<'_> {
    fn drop(&mut self) {
        self.reporter.hide();
    }
}
