//! Notification sink that writes to the tracing log.
//!
//! Useful for headless embedders that have no toast surface.

use crate::traits::{Notification, NotificationSink, Severity};

/// Forwards notifications to `tracing` at a level matching their severity.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl TracingNotifier {
    pub fn new() -> Self {
        Self
    }
}

impl NotificationSink for TracingNotifier {
    fn notify(&self, notification: Notification) {
        let Notification {
            title,
            description,
            severity,
        } = notification;
        match severity {
            Severity::Error => tracing::error!(%title, %description, "User notification"),
            Severity::Warning => tracing::warn!(%title, %description, "User notification"),
            Severity::Info => tracing::info!(%title, %description, "User notification"),
        }
    }
}
