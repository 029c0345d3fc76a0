//! User-visible error notification with timed auto-clear.
//!
//! At most one message is shown. Raising while visible replaces the message
//! and restarts the timer. Every raise and dismiss bumps `version`; an expiry
//! only clears the notification it was armed for.

use crate::types::TodoAction;
use chrono::{DateTime, Utc};
use std::time::Duration;
use todo_sync_core::delay;
use todo_sync_core::effect::{Effect, EffectId};

/// Effect id of the auto-clear timer
pub const NOTIFICATION_TIMER: EffectId = EffectId::new("todos.notification.auto_clear");

/// How long a notification stays visible unless superseded or dismissed
pub const DEFAULT_NOTIFICATION_TIMEOUT: Duration = Duration::from_millis(3000);

/// Current notification
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NotificationState {
    message: Option<String>,
    visible: bool,
    version: u64,
    raised_at: Option<DateTime<Utc>>,
}

impl NotificationState {
    /// Show `message`, replacing any visible one
    ///
    /// Returns the new version, which the auto-clear timer must carry.
    pub fn raise(&mut self, message: impl Into<String>, now: DateTime<Utc>) -> u64 {
        self.version += 1;
        self.message = Some(message.into());
        self.visible = true;
        self.raised_at = Some(now);
        self.version
    }

    /// Hide immediately; any armed timer becomes stale
    pub fn dismiss(&mut self) {
        self.version += 1;
        self.hide();
    }

    /// Hide if `version` is still current
    ///
    /// Returns whether the notification was cleared.
    pub fn expire(&mut self, version: u64) -> bool {
        if version != self.version || !self.visible {
            return false;
        }
        self.hide();
        true
    }

    fn hide(&mut self) {
        self.visible = false;
        self.message = None;
        self.raised_at = None;
    }

    /// Visible message, if any
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        if self.visible {
            self.message.as_deref()
        } else {
            None
        }
    }

    /// Whether a message is shown
    #[must_use]
    pub const fn is_visible(&self) -> bool {
        self.visible
    }

    /// Version of the latest raise or dismiss
    #[must_use]
    pub const fn version(&self) -> u64 {
        self.version
    }

    /// When the visible message was raised
    #[must_use]
    pub const fn raised_at(&self) -> Option<DateTime<Utc>> {
        self.raised_at
    }
}

/// Timer that clears notification `version` after `timeout`
///
/// Arming it aborts any timer still running, so only the latest one can fire.
#[must_use]
pub fn auto_clear(version: u64, timeout: Duration) -> Effect<TodoAction> {
    delay! {
        duration: timeout,
        action: TodoAction::NotificationExpired { version }
    }
    .cancellable(NOTIFICATION_TIMER, true)
}

/// Abort the running auto-clear timer
#[must_use]
pub const fn cancel_auto_clear() -> Effect<TodoAction> {
    Effect::Cancel(NOTIFICATION_TIMER)
}

#[cfg(test)]
mod tests {
    use super::*;
    use todo_sync_testing::test_clock;
    use todo_sync_core::environment::Clock;

    #[test]
    fn raise_shows_message_and_bumps_version() {
        let now = test_clock().now();
        let mut notification = NotificationState::default();
        assert!(!notification.is_visible());

        let first = notification.raise("Unable to load todos", now);
        let second = notification.raise("Unable to add a todo", now);

        assert!(second > first);
        assert_eq!(notification.message(), Some("Unable to add a todo"));
        assert_eq!(notification.raised_at(), Some(now));
    }

    #[test]
    fn stale_expiry_is_ignored() {
        let now = test_clock().now();
        let mut notification = NotificationState::default();
        let first = notification.raise("first", now);
        let second = notification.raise("second", now);

        assert!(!notification.expire(first));
        assert_eq!(notification.message(), Some("second"));

        assert!(notification.expire(second));
        assert_eq!(notification.message(), None);
        assert!(!notification.expire(second));
    }

    #[test]
    fn dismiss_invalidates_armed_timer() {
        let mut notification = NotificationState::default();
        let version = notification.raise("oops", test_clock().now());

        notification.dismiss();

        assert!(!notification.is_visible());
        assert!(notification.version() > version);
        assert!(!notification.expire(version));
    }

    #[test]
    fn auto_clear_is_a_cancellable_delay() {
        let effect = auto_clear(4, DEFAULT_NOTIFICATION_TIMEOUT);

        assert!(matches!(
            effect,
            Effect::Cancellable { id, cancel_in_flight: true, ref effect }
                if id == NOTIFICATION_TIMER
                    && matches!(
                        **effect,
                        Effect::Delay { duration, ref action }
                            if duration == Duration::from_secs(3)
                                && **action == TodoAction::NotificationExpired { version: 4 }
                    )
        ));
        assert!(matches!(cancel_auto_clear(), Effect::Cancel(id) if id == NOTIFICATION_TIMER));
    }
}
