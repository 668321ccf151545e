//! In-memory suppression of repeated notifications.

use std::collections::HashSet;

/// Whether identical messages may be delivered more than once per process.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum DedupPolicy {
    /// Deliver each distinct message text at most once (default).
    #[default]
    SuppressRepeats,
    /// Deliver every rendered message, every cycle.
    SendAlways,
}

impl DedupPolicy {
    pub fn from_flag(dedupe: bool) -> Self {
        if dedupe {
            Self::SuppressRepeats
        } else {
            Self::SendAlways
        }
    }
}

/// Tracks messages already delivered during this process lifetime.
///
/// The set only grows; nothing is persisted across restarts.
#[derive(Debug, Default)]
pub struct NotificationDeduper {
    policy: DedupPolicy,
    sent: HashSet<String>,
}

impl NotificationDeduper {
    pub fn new(policy: DedupPolicy) -> Self {
        Self {
            policy,
            sent: HashSet::new(),
        }
    }

    pub fn policy(&self) -> DedupPolicy {
        self.policy
    }

    /// Whether `message` should be delivered now.
    pub fn should_send(&self, message: &str) -> bool {
        match self.policy {
            DedupPolicy::SuppressRepeats => !self.sent.contains(message),
            DedupPolicy::SendAlways => true,
        }
    }

    /// Record `message` as delivered.
    pub fn mark_sent(&mut self, message: &str) {
        self.sent.insert(message.to_string());
    }

    /// Number of distinct messages delivered so far.
    pub fn sent_count(&self) -> usize {
        self.sent.len()
    }
}
