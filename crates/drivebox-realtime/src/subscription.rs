//! RAII handle for a live view subscription.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::debug;

use crate::registry::{SubscriptionId, SubscriptionRegistry};

/// Handle that keeps one projection task alive.
///
/// Dropping the handle aborts the background task and deregisters the
/// subscription; the paired watch receiver then stops updating. There is
/// no detach: an unheld subscription must not keep querying.
#[derive(Debug)]
pub struct ViewSubscription {
    id: SubscriptionId,
    registry: Arc<SubscriptionRegistry>,
    task: JoinHandle<()>,
}

impl ViewSubscription {
    pub(crate) fn new(
        id: SubscriptionId,
        registry: Arc<SubscriptionRegistry>,
        task: JoinHandle<()>,
    ) -> Self {
        Self { id, registry, task }
    }

    /// The subscription's registry id.
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    /// Tears the subscription down explicitly. Equivalent to dropping.
    pub fn unsubscribe(self) {}
}

impl Drop for ViewSubscription {
    fn drop(&mut self) {
        self.task.abort();
        self.registry.deregister(&self.id);
        debug!(subscription_id = %self.id, "View subscription closed");
    }
}
