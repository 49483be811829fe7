//! Message dispatch
//!
//! Fan-out of display lines into every mailbox but the sender's, and
//! drain of a single client's mailbox.

use tracing::debug;

use crate::error::AppError;
use crate::registry::ClientRegistry;
use crate::types::ClientId;

/// What a broadcast announces on behalf of its sender
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice<'a> {
    /// The sender just joined
    Joined,
    /// The sender said something
    Said(&'a str),
}

impl Notice<'_> {
    /// Render the display line attributed to `sender`
    pub fn render(&self, sender: ClientId) -> String {
        match self {
            Notice::Joined => format!("User {} joined", sender),
            Notice::Said(text) => format!("User {}: {}", sender, text),
        }
    }
}

/// Outcome of one broadcast, for logging only
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BroadcastReport {
    /// Mailboxes the line was offered to
    pub recipients: usize,
    /// Mailboxes that lost a line, either this one or an evicted one
    pub dropped: usize,
}

/// Broadcast and drain over the client registry
#[derive(Debug)]
pub struct Dispatcher {
    registry: ClientRegistry,
}

impl Dispatcher {
    pub fn new(registry: ClientRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &ClientRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut ClientRegistry {
        &mut self.registry
    }

    /// Offer the rendered notice to every client except `sender`
    ///
    /// Full mailboxes lose the line silently; nothing is retried.
    pub fn broadcast(&mut self, sender: ClientId, notice: Notice<'_>) -> BroadcastReport {
        let line = notice.render(sender);
        let mut report = BroadcastReport::default();

        self.registry.for_each_except(sender, |_, mailbox| {
            report.recipients += 1;
            // Evictions under DropOldest succeed but still lose a line
            let before = mailbox.dropped();
            mailbox.try_push(line.clone());
            if mailbox.dropped() > before {
                report.dropped += 1;
            }
        });

        if report.dropped > 0 {
            debug!(
                "Broadcast from {} dropped at {} of {} mailboxes",
                sender, report.dropped, report.recipients
            );
        }

        report
    }

    /// Take everything currently queued for `id`
    pub fn drain(&mut self, id: ClientId) -> Result<Vec<String>, AppError> {
        Ok(self.registry.mailbox_of(id)?.drain_all())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mailbox::{OverflowPolicy, DEFAULT_MAILBOX_CAPACITY};

    fn dispatcher() -> Dispatcher {
        Dispatcher::new(ClientRegistry::new(
            DEFAULT_MAILBOX_CAPACITY,
            OverflowPolicy::DropNewest,
        ))
    }

    #[test]
    fn test_notice_render() {
        assert_eq!(Notice::Joined.render(ClientId(3)), "User 3 joined");
        assert_eq!(Notice::Said("hi").render(ClientId(1)), "User 1: hi");
    }

    #[test]
    fn test_broadcast_excludes_sender() {
        let mut dispatcher = dispatcher();
        let a = dispatcher.registry_mut().register();
        let b = dispatcher.registry_mut().register();
        let c = dispatcher.registry_mut().register();

        let report = dispatcher.broadcast(a, Notice::Said("hello"));

        assert_eq!(report, BroadcastReport { recipients: 2, dropped: 0 });
        assert!(dispatcher.drain(a).unwrap().is_empty());
        assert_eq!(dispatcher.drain(b).unwrap(), vec!["User 1: hello"]);
        assert_eq!(dispatcher.drain(c).unwrap(), vec!["User 1: hello"]);
    }

    #[test]
    fn test_broadcast_from_unregistered_sender_reaches_everyone() {
        let mut dispatcher = dispatcher();
        let a = dispatcher.registry_mut().register();

        let report = dispatcher.broadcast(ClientId(77), Notice::Said("ghost"));

        assert_eq!(report.recipients, 1);
        assert_eq!(dispatcher.drain(a).unwrap(), vec!["User 77: ghost"]);
    }

    #[test]
    fn test_broadcast_reports_full_mailboxes() {
        let mut dispatcher = dispatcher();
        let sender = dispatcher.registry_mut().register();
        let idle = dispatcher.registry_mut().register();

        for i in 0..DEFAULT_MAILBOX_CAPACITY {
            dispatcher.broadcast(sender, Notice::Said(&i.to_string()));
        }
        let report = dispatcher.broadcast(sender, Notice::Said("overflow"));

        assert_eq!(report, BroadcastReport { recipients: 1, dropped: 1 });
        let lines = dispatcher.drain(idle).unwrap();
        assert_eq!(lines.len(), DEFAULT_MAILBOX_CAPACITY);
        assert_eq!(lines[0], "User 1: 0");
    }

    #[test]
    fn test_broadcast_reports_evictions_under_drop_oldest() {
        let mut dispatcher = Dispatcher::new(ClientRegistry::new(2, OverflowPolicy::DropOldest));
        let sender = dispatcher.registry_mut().register();
        let idle = dispatcher.registry_mut().register();

        dispatcher.broadcast(sender, Notice::Said("a"));
        dispatcher.broadcast(sender, Notice::Said("b"));
        let report = dispatcher.broadcast(sender, Notice::Said("c"));

        assert_eq!(report, BroadcastReport { recipients: 1, dropped: 1 });
        assert_eq!(
            dispatcher.drain(idle).unwrap(),
            vec!["User 1: b", "User 1: c"]
        );
    }

    #[test]
    fn test_drain_unknown_client() {
        let mut dispatcher = dispatcher();
        let err = dispatcher.drain(ClientId(1)).unwrap_err();
        assert!(matches!(err, AppError::ClientNotFound(ClientId(1))));
    }

    #[test]
    fn test_drain_twice() {
        let mut dispatcher = dispatcher();
        let a = dispatcher.registry_mut().register();
        let b = dispatcher.registry_mut().register();

        dispatcher.broadcast(a, Notice::Said("once"));

        assert_eq!(dispatcher.drain(b).unwrap().len(), 1);
        assert!(dispatcher.drain(b).unwrap().is_empty());
        assert_eq!(dispatcher.registry().len(), 2);
    }
}
