use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// A transient user-facing message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub posted_at: Instant,
}

/// Queue of messages that expire after a fixed time to live.
#[derive(Debug, Clone)]
pub struct Notifications {
    queue: VecDeque<Notification>,
    ttl: Duration,
}

impl Notifications {
    pub fn new(ttl: Duration) -> Self {
        Self {
            queue: VecDeque::new(),
            ttl,
        }
    }

    pub fn push(&mut self, message: impl Into<String>) {
        self.push_at(message, Instant::now());
    }

    fn push_at(&mut self, message: impl Into<String>, now: Instant) {
        self.queue.push_back(Notification {
            message: message.into(),
            posted_at: now,
        });
    }

    /// Messages still within their time to live, oldest first.
    pub fn active(&mut self) -> Vec<String> {
        self.active_at(Instant::now())
    }

    fn active_at(&mut self, now: Instant) -> Vec<String> {
        let ttl = self.ttl;
        self.queue
            .retain(|n| now.saturating_duration_since(n.posted_at) < ttl);
        self.queue.iter().map(|n| n.message.clone()).collect()
    }

    pub fn clear(&mut self) {
        self.queue.clear();
    }
}
