//! Transient user-facing notifications ("toasts").
//!
//! Failures never crash a view: they are turned into a [`Notification`] and
//! handed to whatever [`Notifier`] the application installed.

use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NotifyLevel {
    Success,
    Error,
    /// A long-running action started; a later notification with the same key
    /// replaces it.
    Loading,
    Info,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notification {
    pub level: NotifyLevel,
    pub message: String,
    /// Groups a loading notification with its outcome (`"export"`, `"deploy"`).
    pub key: Option<&'static str>,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self { level: NotifyLevel::Success, message: message.into(), key: None }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self { level: NotifyLevel::Error, message: message.into(), key: None }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self { level: NotifyLevel::Info, message: message.into(), key: None }
    }

    pub fn loading(key: &'static str, message: impl Into<String>) -> Self {
        Self { level: NotifyLevel::Loading, message: message.into(), key: Some(key) }
    }

    #[must_use]
    pub fn keyed(mut self, key: &'static str) -> Self {
        self.key = Some(key);
        self
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Sink for notifications.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Routes notifications into `tracing` events; useful for headless runs.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, n: Notification) {
        let key = n.key.unwrap_or("-");
        match n.level {
            NotifyLevel::Error => tracing::warn!(key, message = %n.message, "notification"),
            NotifyLevel::Success | NotifyLevel::Loading | NotifyLevel::Info => {
                tracing::info!(key, message = %n.message, "notification");
            }
        }
    }
}
