//! User-facing notifications raised by the client.
//!
//! The HTTP layer reports every failed request once through the shared
//! [`Notifier`]; services only add success notifications for mutations.

use std::sync::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Success,
    Info,
    Warning,
    Error,
}

pub trait Notifier: Send + Sync {
    fn notify(&self, level: NotificationLevel, message: &str);
}

/// Forwards notifications to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, level: NotificationLevel, message: &str) {
        match level {
            NotificationLevel::Success | NotificationLevel::Info => {
                tracing::info!(notification = ?level, "{}", message)
            }
            NotificationLevel::Warning => tracing::warn!(notification = ?level, "{}", message),
            NotificationLevel::Error => tracing::error!(notification = ?level, "{}", message),
        }
    }
}

/// Keeps every notification so a UI can drain and display them.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    entries: Mutex<Vec<(NotificationLevel, String)>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<(NotificationLevel, String)> {
        self.entries
            .lock()
            .map(|entries| entries.clone())
            .unwrap_or_default()
    }

    pub fn count(&self, level: NotificationLevel) -> usize {
        self.entries()
            .iter()
            .filter(|(entry_level, _)| *entry_level == level)
            .count()
    }

    pub fn drain(&self) -> Vec<(NotificationLevel, String)> {
        self.entries
            .lock()
            .map(|mut entries| std::mem::take(&mut *entries))
            .unwrap_or_default()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, level: NotificationLevel, message: &str) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.push((level, message.to_string()));
        }
    }
}
