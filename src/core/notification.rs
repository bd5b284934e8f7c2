//! Short-lived notices shown above the input line.
//!
//! Notifications never enter the conversation. A new notification replaces
//! the one on screen; each expires after the configured time to live.

use crate::core::constants::DEFAULT_NOTIFICATION_SECONDS;
use std::time::{Duration, Instant};

pub const EMPTY_INPUT_WARNING: &str = "Please enter a message.";
pub const BUSY_WARNING: &str = "Please wait for the current reply.";
pub const TURN_FAILED_ERROR: &str = "Failed to get a response from the chatbot.";

/// Severity of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
pub struct Notification {
    pub level: NotificationLevel,
    pub text: String,
    pub raised_at: Instant,
}

#[derive(Debug, Clone)]
pub struct Notifications {
    current: Option<Notification>,
    ttl: Duration,
}

impl Default for Notifications {
    fn default() -> Self {
        Self::new(Duration::from_secs(DEFAULT_NOTIFICATION_SECONDS))
    }
}

impl Notifications {
    pub fn new(ttl: Duration) -> Self {
        Self {
            current: None,
            ttl,
        }
    }

    pub fn raise<S: Into<String>>(&mut self, level: NotificationLevel, text: S) {
        self.current = Some(Notification {
            level,
            text: text.into(),
            raised_at: Instant::now(),
        });
    }

    pub fn info<S: Into<String>>(&mut self, text: S) {
        self.raise(NotificationLevel::Info, text);
    }

    pub fn warning<S: Into<String>>(&mut self, text: S) {
        self.raise(NotificationLevel::Warning, text);
    }

    pub fn error<S: Into<String>>(&mut self, text: S) {
        self.raise(NotificationLevel::Error, text);
    }

    pub fn current(&self) -> Option<&Notification> {
        self.current.as_ref()
    }

    /// Drop the current notification if it has outlived its time to live.
    /// Returns true when something was removed.
    pub fn expire(&mut self, now: Instant) -> bool {
        let expired = self
            .current
            .as_ref()
            .is_some_and(|n| now.saturating_duration_since(n.raised_at) >= self.ttl);
        if expired {
            self.current = None;
        }
        expired
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newest_notification_replaces_previous() {
        let mut notifications = Notifications::default();
        notifications.warning(EMPTY_INPUT_WARNING);
        notifications.error(TURN_FAILED_ERROR);

        let current = notifications.current().expect("notification");
        assert_eq!(current.level, NotificationLevel::Error);
        assert_eq!(current.text, TURN_FAILED_ERROR);
    }

    #[test]
    fn expire_respects_ttl() {
        let mut notifications = Notifications::new(Duration::from_secs(3));
        notifications.info("saved");
        let raised_at = notifications.current().expect("notification").raised_at;

        assert!(!notifications.expire(raised_at + Duration::from_secs(1)));
        assert!(notifications.current().is_some());
        assert!(notifications.expire(raised_at + Duration::from_secs(3)));
        assert!(notifications.current().is_none());
    }

    #[test]
    fn expire_without_notification_is_noop() {
        let mut notifications = Notifications::default();
        assert!(!notifications.expire(Instant::now()));
    }
}
