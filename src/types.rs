//! Basic type definitions for the chat server
//!
//! Provides the `ClientId` newtype used as the registry key and on the wire.

use serde::{Deserialize, Serialize};

/// Unique client identifier (newtype pattern)
///
/// Positive integer minted by the registry in strictly increasing order,
/// starting at 1. Never reused for the lifetime of the server process.
/// Serialized as a bare integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClientId(pub u64);

impl ClientId {
    /// The first identifier handed out by a fresh registry
    pub const FIRST: ClientId = ClientId(1);

    /// Raw integer value
    pub fn get(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for ClientId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
