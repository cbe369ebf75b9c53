//! Port for transient user notifications (toasts).

use std::fmt;

/// Severity of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotificationLevel {
    /// The action succeeded.
    Success,
    /// The action failed.
    Error,
}

/// A short message shown to the user after an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Severity.
    pub level: NotificationLevel,
    /// Human-readable text.
    pub message: String,
}

impl Notification {
    /// Creates a success notification.
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Success,
            message: message.into(),
        }
    }

    /// Creates an error notification.
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Error,
            message: message.into(),
        }
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.level {
            NotificationLevel::Success => write!(f, "success: {}", self.message),
            NotificationLevel::Error => write!(f, "error: {}", self.message),
        }
    }
}

/// Notification sink.
#[cfg_attr(test, mockall::automock)]
pub trait Notifier: Send + Sync {
    /// Presents a notification. Presentation is fire-and-forget.
    fn notify(&self, notification: Notification);
}
