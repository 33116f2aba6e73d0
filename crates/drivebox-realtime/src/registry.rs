//! Registry of active view subscriptions.

use std::fmt;

use dashmap::DashMap;
use uuid::Uuid;

use drivebox_core::types::OwnerId;

/// Identifier of one live view subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(Uuid);

impl SubscriptionId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Descriptor of one registered subscription.
#[derive(Debug, Clone)]
pub struct SubscriptionInfo {
    /// The owner whose entries the view projects.
    pub owner: OwnerId,
    /// View label, for logs and diagnostics.
    pub view: &'static str,
}

/// Tracks every live subscription so teardown can be verified and leaks
/// show up as a nonzero active count.
#[derive(Debug, Default)]
pub struct SubscriptionRegistry {
    /// Subscription id → descriptor.
    subscriptions: DashMap<SubscriptionId, SubscriptionInfo>,
}

impl SubscriptionRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new subscription and returns its id.
    pub fn register(&self, owner: OwnerId, view: &'static str) -> SubscriptionId {
        let id = SubscriptionId::new();
        self.subscriptions.insert(id, SubscriptionInfo { owner, view });
        id
    }

    /// Removes a subscription. Removing an unknown id is a no-op.
    pub fn deregister(&self, id: &SubscriptionId) {
        self.subscriptions.remove(id);
    }

    /// Number of live subscriptions.
    pub fn active(&self) -> usize {
        self.subscriptions.len()
    }

    /// Number of live subscriptions for one owner.
    pub fn active_for(&self, owner: &OwnerId) -> usize {
        self.subscriptions
            .iter()
            .filter(|s| &s.value().owner == owner)
            .count()
    }
}
