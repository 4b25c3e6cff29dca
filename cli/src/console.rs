//! Terminal rendering of notifications.

#[cfg(test)]
#[path = "console_test.rs"]
mod console_test;

use std::io::Write;
use std::sync::Mutex;

use client::{Notification, Notifier, NotifyLevel};

/// Writes one line per notification. Keyed loading lines are followed by
/// their outcome under the same key, mirroring a toast being replaced.
pub(crate) struct ConsoleNotifier {
    out: Mutex<Box<dyn Write + Send>>,
}

impl ConsoleNotifier {
    pub(crate) fn stderr() -> Self {
        Self::new(Box::new(std::io::stderr()))
    }

    pub(crate) fn new(out: Box<dyn Write + Send>) -> Self {
        Self { out: Mutex::new(out) }
    }
}

impl Notifier for ConsoleNotifier {
    fn notify(&self, notification: Notification) {
        let line = format_line(&notification);
        let mut out = match self.out.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Err(error) = writeln!(out, "{line}") {
            tracing::debug!(%error, "notification dropped");
        }
    }
}

pub(crate) fn format_line(notification: &Notification) -> String {
    let marker = match notification.level {
        NotifyLevel::Success => "ok",
        NotifyLevel::Error => "error",
        NotifyLevel::Loading => "...",
        NotifyLevel::Info => "info",
    };
    match notification.key {
        Some(key) => format!("[{key}] {marker}: {}", notification.message),
        None => format!("{marker}: {}", notification.message),
    }
}
