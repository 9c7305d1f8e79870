//! Transient on-screen notifications.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

/// How long a notification stays on screen.
pub const NOTIFICATION_DURATION: Duration = Duration::from_secs(3);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NotificationLevel {
    Success,
    Warning,
    Error,
}

impl NotificationLevel {
    pub fn class(self) -> &'static str {
        match self {
            NotificationLevel::Success => "success",
            NotificationLevel::Warning => "warning",
            NotificationLevel::Error => "error",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Notification {
    pub id: u64,
    pub message: String,
    pub level: NotificationLevel,
    pub expires_at: Instant,
}

#[derive(Default)]
struct Queue {
    next_id: u64,
    entries: Vec<Notification>,
}

#[derive(Clone, Default)]
pub struct Notifier {
    queue: Arc<Mutex<Queue>>,
}

impl Notifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn success(&self, message: impl Into<String>) -> u64 {
        self.push(message, NotificationLevel::Success)
    }

    pub fn warning(&self, message: impl Into<String>) -> u64 {
        self.push(message, NotificationLevel::Warning)
    }

    pub fn error(&self, message: impl Into<String>) -> u64 {
        self.push(message, NotificationLevel::Error)
    }

    pub fn push(&self, message: impl Into<String>, level: NotificationLevel) -> u64 {
        self.push_at(message, level, Instant::now())
    }

    pub fn push_at(
        &self,
        message: impl Into<String>,
        level: NotificationLevel,
        now: Instant,
    ) -> u64 {
        let message = message.into();
        tracing::debug!(level = level.class(), %message, "notification");
        let mut queue = self.queue.lock().unwrap_or_else(PoisonError::into_inner);
        queue.next_id += 1;
        let id = queue.next_id;
        queue.entries.push(Notification {
            id,
            message,
            level,
            expires_at: now + NOTIFICATION_DURATION,
        });
        id
    }

    /// Notifications still on screen at `now`, oldest first.
    pub fn active(&self, now: Instant) -> Vec<Notification> {
        let queue = self.queue.lock().unwrap_or_else(PoisonError::into_inner);
        queue
            .entries
            .iter()
            .filter(|entry| entry.expires_at > now)
            .cloned()
            .collect()
    }

    /// Drops expired notifications and returns how many were removed.
    pub fn prune(&self, now: Instant) -> usize {
        let mut queue = self.queue.lock().unwrap_or_else(PoisonError::into_inner);
        let before = queue.entries.len();
        queue.entries.retain(|entry| entry.expires_at > now);
        before - queue.entries.len()
    }

    pub fn dismiss(&self, id: u64) {
        let mut queue = self.queue.lock().unwrap_or_else(PoisonError::into_inner);
        queue.entries.retain(|entry| entry.id != id);
    }
}
