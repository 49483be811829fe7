//! Client registry
//!
//! Maps every issued `ClientId` to its mailbox and mints new identifiers.
//! Owned by the `ChatServer` actor, so all access is already serialized.

use std::collections::HashMap;

use tracing::debug;

use crate::error::AppError;
use crate::mailbox::{Mailbox, OverflowPolicy};
use crate::types::ClientId;

/// Registry of connected clients
///
/// Invariant: `next_id` only grows, and every key is in `1..next_id`.
/// Entries are never removed.
#[derive(Debug)]
pub struct ClientRegistry {
    /// ClientId -> Mailbox
    mailboxes: HashMap<ClientId, Mailbox>,
    /// Identifier handed out by the next `register` call
    next_id: u64,
    /// Capacity of each new mailbox
    capacity: usize,
    /// Overflow policy of each new mailbox
    policy: OverflowPolicy,
}

impl ClientRegistry {
    pub fn new(capacity: usize, policy: OverflowPolicy) -> Self {
        Self {
            mailboxes: HashMap::new(),
            next_id: ClientId::FIRST.get(),
            capacity,
            policy,
        }
    }

    /// Mint the next identifier and give it an empty mailbox
    pub fn register(&mut self) -> ClientId {
        let id = ClientId(self.next_id);
        self.next_id += 1;
        self.mailboxes
            .insert(id, Mailbox::with_policy(self.capacity, self.policy));
        debug!("Registered client {} ({} total)", id, self.mailboxes.len());
        id
    }

    /// Look up a client's mailbox
    pub fn mailbox_of(&mut self, id: ClientId) -> Result<&mut Mailbox, AppError> {
        self.mailboxes
            .get_mut(&id)
            .ok_or(AppError::ClientNotFound(id))
    }

    /// Call `f` for every registered client except `exclude`
    ///
    /// Iteration order is unspecified.
    pub fn for_each_except<F>(&mut self, exclude: ClientId, mut f: F)
    where
        F: FnMut(ClientId, &mut Mailbox),
    {
        for (id, mailbox) in self.mailboxes.iter_mut() {
            if *id != exclude {
                f(*id, mailbox);
            }
        }
    }

    pub fn contains(&self, id: ClientId) -> bool {
        self.mailboxes.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.mailboxes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mailboxes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mailbox::DEFAULT_MAILBOX_CAPACITY;

    fn registry() -> ClientRegistry {
        ClientRegistry::new(DEFAULT_MAILBOX_CAPACITY, OverflowPolicy::DropNewest)
    }

    #[test]
    fn test_register_sequential_ids() {
        let mut registry = registry();
        assert!(registry.is_empty());

        let ids: Vec<ClientId> = (0..5).map(|_| registry.register()).collect();

        assert_eq!(ids, (1..=5).map(ClientId).collect::<Vec<_>>());
        assert_eq!(registry.len(), 5);
    }

    #[test]
    fn test_new_mailbox_is_empty_with_configured_capacity() {
        let mut registry = ClientRegistry::new(3, OverflowPolicy::DropOldest);
        let id = registry.register();

        let mailbox = registry.mailbox_of(id).unwrap();
        assert!(mailbox.is_empty());
        assert_eq!(mailbox.capacity(), 3);

        for line in ["a", "b", "c", "d"] {
            mailbox.try_push(line.to_string());
        }
        assert_eq!(mailbox.drain_all(), vec!["b", "c", "d"]);
    }

    #[test]
    fn test_mailbox_of_unknown_id() {
        let mut registry = registry();
        registry.register();

        let err = registry.mailbox_of(ClientId(2)).unwrap_err();
        assert!(matches!(err, AppError::ClientNotFound(ClientId(2))));
        assert!(!registry.contains(ClientId(0)));
    }

    #[test]
    fn test_for_each_except_skips_excluded() {
        let mut registry = registry();
        let a = registry.register();
        let b = registry.register();
        let c = registry.register();

        let mut visited = Vec::new();
        registry.for_each_except(b, |id, _| visited.push(id));
        visited.sort();

        assert_eq!(visited, vec![a, c]);
    }

    #[test]
    fn test_for_each_except_unknown_visits_all() {
        let mut registry = registry();
        registry.register();
        registry.register();

        let mut count = 0;
        registry.for_each_except(ClientId(99), |_, _| count += 1);
        assert_eq!(count, 2);
    }
}
