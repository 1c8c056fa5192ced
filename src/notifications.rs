//! Notifications
//!
//! Short-lived user-facing messages. Each notification schedules its own
//! removal after a fixed display lifetime, independent of every other
//! notification; removals are keyed so they only ever target their own
//! entry.

use slotmap::{SlotMap, new_key_type};

use crate::schedule::{Scheduler, TaskKey};

/// Default notification display lifetime in milliseconds.
pub const DEFAULT_LIFETIME_MS: u64 = 3_000;

new_key_type! {
    /// Key identifying a live notification.
    pub struct NotificationKey;
}

/// Notification severity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NotificationKind {
    /// A mutation succeeded.
    #[default]
    Success,

    /// A mutation was rejected.
    Error,

    /// Something needs the user's attention.
    Warning,
}

/// A user-facing notification message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    message: String,
    kind: NotificationKind,
}

impl Notification {
    /// The message text.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The severity.
    pub fn kind(&self) -> NotificationKind {
        self.kind
    }
}

#[derive(Debug)]
struct Entry {
    notification: Notification,
    expiry: TaskKey,
}

/// Holds the live notifications and their expiry timers.
///
/// Time moves through [`NotificationCenter::advance`], driven by the same
/// logical clock as the rest of the storefront.
#[derive(Debug)]
pub struct NotificationCenter {
    lifetime_ms: u64,
    entries: SlotMap<NotificationKey, Entry>,
    order: Vec<NotificationKey>,
    scheduler: Scheduler<NotificationKey>,
}

impl NotificationCenter {
    /// Creates a center with the default display lifetime.
    #[must_use]
    pub fn new() -> Self {
        Self::with_lifetime(DEFAULT_LIFETIME_MS)
    }

    /// Creates a center with a custom display lifetime.
    #[must_use]
    pub fn with_lifetime(lifetime_ms: u64) -> Self {
        Self {
            lifetime_ms,
            entries: SlotMap::with_key(),
            order: Vec::new(),
            scheduler: Scheduler::new(),
        }
    }

    /// Pushes a notification and schedules its removal.
    pub fn push(&mut self, message: impl Into<String>, kind: NotificationKind) -> NotificationKey {
        let notification = Notification {
            message: message.into(),
            kind,
        };

        let key = self.entries.insert(Entry {
            notification,
            expiry: TaskKey::default(),
        });

        let expiry = self.scheduler.schedule(self.lifetime_ms, key);

        if let Some(entry) = self.entries.get_mut(key) {
            entry.expiry = expiry;
        }

        self.order.push(key);

        key
    }

    /// Advances the clock, removing every notification whose lifetime
    /// elapsed. Each expiry removes only its own entry.
    pub fn advance(&mut self, delta_ms: u64) {
        for key in self.scheduler.advance(delta_ms) {
            self.entries.remove(key);
        }

        self.order.retain(|key| self.entries.contains_key(*key));
    }

    /// Dismisses a notification ahead of its scheduled expiry.
    pub fn dismiss(&mut self, key: NotificationKey) -> Option<Notification> {
        let entry = self.entries.remove(key)?;

        self.scheduler.cancel(entry.expiry);
        self.order.retain(|k| *k != key);

        Some(entry.notification)
    }

    /// Looks up a live notification.
    pub fn get(&self, key: NotificationKey) -> Option<&Notification> {
        self.entries.get(key).map(|entry| &entry.notification)
    }

    /// Iterates over live notifications in display (push) order.
    pub fn iter(&self) -> impl Iterator<Item = (NotificationKey, &Notification)> {
        self.order
            .iter()
            .filter_map(|key| self.entries.get(*key).map(|entry| (*key, &entry.notification)))
    }

    /// Number of live notifications.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no notifications are live.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for NotificationCenter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pushed_notifications_are_live_until_their_lifetime_elapses() {
        let mut center = NotificationCenter::new();

        let key = center.push("장바구니에 담았습니다", NotificationKind::Success);

        center.advance(2_999);
        assert!(center.get(key).is_some());

        center.advance(1);
        assert!(center.get(key).is_none());
        assert!(center.is_empty());
    }

    #[test]
    fn each_notification_expires_independently() {
        let mut center = NotificationCenter::new();

        let first = center.push("first", NotificationKind::Success);
        center.advance(1_000);
        let second = center.push("second", NotificationKind::Error);

        center.advance(2_000);

        assert!(center.get(first).is_none());
        assert!(center.get(second).is_some());
    }

    #[test]
    fn dismiss_removes_only_its_own_entry() {
        let mut center = NotificationCenter::new();

        let first = center.push("first", NotificationKind::Success);
        let second = center.push("second", NotificationKind::Warning);

        let dismissed = center.dismiss(first);

        assert_eq!(dismissed.map(|n| n.kind()), Some(NotificationKind::Success));
        assert!(center.get(second).is_some());
        assert_eq!(center.len(), 1);
    }

    #[test]
    fn dismissing_twice_is_a_stale_no_op() {
        let mut center = NotificationCenter::new();

        let key = center.push("once", NotificationKind::Success);

        assert!(center.dismiss(key).is_some());
        assert!(center.dismiss(key).is_none());
    }

    #[test]
    fn iter_yields_display_order() {
        let mut center = NotificationCenter::new();

        center.push("first", NotificationKind::Success);
        center.push("second", NotificationKind::Error);

        let messages: Vec<&str> = center.iter().map(|(_, n)| n.message()).collect();

        assert_eq!(messages, vec!["first", "second"]);
    }
}
