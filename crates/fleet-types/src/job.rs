//! Relay job model: one unit of pending broadcast work

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Which identities a relay job addresses.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BroadcastScope {
    /// Every configured identity rebroadcasts the message.
    AllIdentities,
    /// Only the named identity rebroadcasts the message.
    SingleIdentity(String),
}

impl BroadcastScope {
    /// True if the scope addresses the given identity.
    pub fn addresses(&self, identity: &str) -> bool {
        match self {
            Self::AllIdentities => true,
            Self::SingleIdentity(name) => name == identity,
        }
    }

    /// Number of identities that must process a job with this scope
    /// before it retires, given the total identity count.
    pub fn required_count(&self, n_identities: usize) -> u32 {
        match self {
            Self::AllIdentities => n_identities as u32,
            Self::SingleIdentity(_) => 1,
        }
    }
}

/// A pending broadcast: created on a validated inbound message, appended
/// to the relay queue, mutated only by dispatch passes (incrementing
/// `processed_count`), removed once every addressed identity has
/// processed it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RelayJob {
    /// Unique job ID; never reused; the sole append/remove key.
    pub id: Uuid,
    /// Validated message body (trimmed, non-empty, bounded length).
    pub content: String,
    /// Addressed identities.
    pub scope: BroadcastScope,
    /// Number of identities that have completed delivery. Monotonically
    /// non-decreasing; never exceeds `scope.required_count(..)`.
    pub processed_count: u32,
}

impl RelayJob {
    /// Create a new job with a fresh ID and a zero processed count.
    pub fn new(content: impl Into<String>, scope: BroadcastScope) -> Self {
        Self {
            id: Uuid::new_v4(),
            content: content.into(),
            scope,
            processed_count: 0,
        }
    }
}
