//! Live projections over the record store.
//!
//! Each subscription runs one background task: capture the change stream,
//! publish an initial snapshot, then re-run the full view query on every
//! committed mutation. Change events are never diffed against the current
//! snapshot; the store query is the single source of truth and a full
//! re-query keeps the projection correct even after a lagged stream.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{broadcast, watch};
use tokio::time::sleep;
use tracing::{debug, warn};

use drivebox_core::events::EntryChange;
use drivebox_core::result::AppResult;
use drivebox_core::types::OwnerId;
use drivebox_entity::entry::Entry;
use drivebox_entity::view::ViewContext;
use drivebox_store::EntryStore;

use crate::registry::SubscriptionRegistry;
use crate::subscription::ViewSubscription;

/// Delay before retrying a failed view query.
const QUERY_RETRY_DELAY: Duration = Duration::from_millis(200);

/// One materialized state of a view.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewSnapshot {
    /// The context the snapshot was taken for.
    pub context: ViewContext,
    /// Matching entries in store order.
    pub entries: Vec<Entry>,
}

/// Spawns and tracks live view subscriptions.
#[derive(Debug, Clone)]
pub struct Projector {
    /// Record store the projections query.
    records: Arc<dyn EntryStore>,
    /// Live-subscription accounting.
    registry: Arc<SubscriptionRegistry>,
}

impl Projector {
    /// Creates a projector over the given record store.
    pub fn new(records: Arc<dyn EntryStore>) -> Self {
        Self {
            records,
            registry: Arc::new(SubscriptionRegistry::new()),
        }
    }

    /// The subscription registry, for diagnostics and leak checks.
    pub fn registry(&self) -> &Arc<SubscriptionRegistry> {
        &self.registry
    }

    /// Opens a live subscription on a view.
    ///
    /// Returns the snapshot receiver (seeded with the current state) and
    /// the RAII handle keeping the projection running. The change stream
    /// is captured before the seed query so a mutation landing between
    /// the two is observed rather than lost.
    pub async fn subscribe(
        &self,
        owner: OwnerId,
        context: ViewContext,
    ) -> AppResult<(watch::Receiver<ViewSnapshot>, ViewSubscription)> {
        let changes = self.records.changes();
        let entries = self.records.query(&context.filter(&owner)).await?;
        let (tx, rx) = watch::channel(ViewSnapshot { context, entries });

        let id = self.registry.register(owner.clone(), context.label());
        debug!(subscription_id = %id, owner = %owner, view = context.label(), "View subscription opened");

        let records = self.records.clone();
        let task = tokio::spawn(run_view(records, owner, context, changes, tx));
        Ok((rx, ViewSubscription::new(id, self.registry.clone(), task)))
    }

    /// Opens a live subscription on the owner's total used bytes.
    ///
    /// The value is the sum of sizes of all non-deleted files; records
    /// with a missing or zero size are logged and excluded rather than
    /// failing the aggregation.
    pub async fn subscribe_usage(
        &self,
        owner: OwnerId,
    ) -> AppResult<(watch::Receiver<u64>, ViewSubscription)> {
        let context = ViewContext::UsageFiles;
        let changes = self.records.changes();
        let entries = self.records.query(&context.filter(&owner)).await?;
        let (tx, rx) = watch::channel(sum_usage(&entries));

        let id = self.registry.register(owner.clone(), "usage");
        debug!(subscription_id = %id, owner = %owner, "Usage subscription opened");

        let records = self.records.clone();
        let task = tokio::spawn(run_usage(records, owner, changes, tx));
        Ok((rx, ViewSubscription::new(id, self.registry.clone(), task)))
    }
}

/// Total bytes across file entries, excluding defective sizes.
fn sum_usage(entries: &[Entry]) -> u64 {
    let mut total = 0u64;
    for entry in entries {
        match entry.valid_size() {
            Some(size) => total += size,
            None => warn!(
                entry_id = %entry.id,
                name = %entry.name,
                "File entry has missing or invalid size; excluded from usage"
            ),
        }
    }
    total
}

/// Waits for the next store mutation. Returns `false` when the store's
/// change channel is closed and the projection should stop. A lagged
/// receiver is fine; the caller re-queries the whole view anyway.
async fn next_change(changes: &mut broadcast::Receiver<EntryChange>) -> bool {
    match changes.recv().await {
        Ok(_) => true,
        Err(broadcast::error::RecvError::Lagged(skipped)) => {
            debug!(skipped, "Change stream lagged; forcing resync");
            true
        }
        Err(broadcast::error::RecvError::Closed) => false,
    }
}

async fn run_view(
    records: Arc<dyn EntryStore>,
    owner: OwnerId,
    context: ViewContext,
    mut changes: broadcast::Receiver<EntryChange>,
    tx: watch::Sender<ViewSnapshot>,
) {
    while next_change(&mut changes).await {
        loop {
            match records.query(&context.filter(&owner)).await {
                Ok(entries) => {
                    if tx.send(ViewSnapshot { context, entries }).is_err() {
                        return;
                    }
                    break;
                }
                Err(e) => {
                    warn!(view = context.label(), error = %e, "View re-query failed; retrying");
                    sleep(QUERY_RETRY_DELAY).await;
                }
            }
        }
    }
}

async fn run_usage(
    records: Arc<dyn EntryStore>,
    owner: OwnerId,
    mut changes: broadcast::Receiver<EntryChange>,
    tx: watch::Sender<u64>,
) {
    let filter = ViewContext::UsageFiles.filter(&owner);
    while next_change(&mut changes).await {
        loop {
            match records.query(&filter).await {
                Ok(entries) => {
                    if tx.send(sum_usage(&entries)).is_err() {
                        return;
                    }
                    break;
                }
                Err(e) => {
                    warn!(owner = %owner, error = %e, "Usage re-query failed; retrying");
                    sleep(QUERY_RETRY_DELAY).await;
                }
            }
        }
    }
}
