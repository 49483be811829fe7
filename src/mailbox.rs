//! Per-client mailbox
//!
//! A bounded FIFO of pending display lines for one client. Producers never
//! block: a push into a full mailbox loses a message instead of waiting.

use std::collections::VecDeque;

/// Default number of lines a mailbox holds between two polls
pub const DEFAULT_MAILBOX_CAPACITY: usize = 10;

/// What a full mailbox does with an incoming line
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OverflowPolicy {
    /// Discard the incoming line, keep the queue untouched
    #[default]
    DropNewest,
    /// Evict the oldest queued line to make room for the incoming one
    DropOldest,
}

/// Bounded queue of undelivered broadcast lines
#[derive(Debug)]
pub struct Mailbox {
    queue: VecDeque<String>,
    capacity: usize,
    policy: OverflowPolicy,
    /// Lines lost to overflow since creation
    dropped: u64,
}

impl Mailbox {
    /// Create an empty mailbox with an explicit overflow policy
    pub fn with_policy(capacity: usize, policy: OverflowPolicy) -> Self {
        Self {
            queue: VecDeque::with_capacity(capacity),
            capacity,
            policy,
            dropped: 0,
        }
    }

    /// Append a line without blocking
    ///
    /// Returns true if `message` is now queued. Under `DropNewest` a full
    /// mailbox is left unchanged and false is returned. Under `DropOldest`
    /// the head is evicted first, so the push succeeds unless capacity is 0.
    pub fn try_push(&mut self, message: String) -> bool {
        if self.queue.len() < self.capacity {
            self.queue.push_back(message);
            return true;
        }

        self.dropped += 1;
        match self.policy {
            OverflowPolicy::DropNewest => false,
            OverflowPolicy::DropOldest => {
                if self.queue.pop_front().is_none() {
                    return false;
                }
                self.queue.push_back(message);
                true
            }
        }
    }

    /// Remove and return every queued line in FIFO order
    pub fn drain_all(&mut self) -> Vec<String> {
        self.queue.drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of lines lost to overflow, evictions included
    pub fn dropped(&self) -> u64 {
        self.dropped
    }
}
