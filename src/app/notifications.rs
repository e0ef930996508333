//! Dismissable notifications raised by the chat flow.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::ChatApp;
use crate::error::ChatError;

/// Severity of a notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Error,
}

/// A message for the user that stays until dismissed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub id: String,
    pub level: NotificationLevel,
    pub message: String,
    /// What the user can do about it
    pub hint: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl Notification {
    pub fn new(level: NotificationLevel, message: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            level,
            message: message.into(),
            hint: None,
            timestamp: Utc::now(),
        }
    }

    /// An error notification carrying the recovery hint for `err`.
    pub fn for_error(message: impl Into<String>, err: &ChatError) -> Self {
        let hint = err.recovery_hint();
        Self {
            hint: (!hint.is_empty()).then(|| hint.to_string()),
            ..Self::error(message)
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Info, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Error, message)
    }
}

impl ChatApp {
    /// Pending notifications, oldest first.
    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    /// Log `err` and raise an error notification prefixed with `context`.
    pub(super) fn notify_error(&mut self, context: &str, err: &ChatError) {
        tracing::warn!(
            error = %err,
            code = err.error_code(),
            category = %err.category(),
            retryable = err.is_retryable(),
            "{}", context
        );
        self.notify(Notification::for_error(
            format!("{}: {}", context, err.user_message()),
            err,
        ));
    }

    pub(super) fn notify(&mut self, notification: Notification) {
        tracing::debug!(
            level = ?notification.level,
            message = %notification.message,
            "Notification"
        );
        self.notifications.push(notification);
    }

    /// Remove a notification. Returns false if no notification has `id`.
    pub fn dismiss_notification(&mut self, id: &str) -> bool {
        let before = self.notifications.len();
        self.notifications.retain(|n| n.id != id);
        self.notifications.len() != before
    }

    pub fn clear_notifications(&mut self) {
        self.notifications.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{AuthError, NetworkError};

    #[test]
    fn test_notification_ids_are_unique() {
        let a = Notification::error("one");
        let b = Notification::error("one");
        assert_ne!(a.id, b.id);
        assert_eq!(a.level, NotificationLevel::Error);
        assert_eq!(Notification::info("x").level, NotificationLevel::Info);
    }

    #[test]
    fn test_error_notification_carries_hint() {
        let auth = Notification::for_error("Failed", &ChatError::Auth(AuthError::NotAuthenticated));
        assert_eq!(auth.level, NotificationLevel::Error);
        assert!(auth.hint.unwrap().contains("ragchat login"));

        let cancelled = Notification::for_error(
            "Request cancelled",
            &ChatError::Network(NetworkError::Cancelled),
        );
        assert!(cancelled.hint.is_none());
    }
}
