//! # drivebox-realtime
//!
//! Live view projections: each subscription binds one owner and one
//! [`ViewContext`](drivebox_entity::view::ViewContext) to a background
//! task that re-queries the record store on every committed mutation and
//! publishes fresh snapshots through a watch channel. Subscriptions are
//! RAII handles; dropping one tears its task down.
//!
//! Also hosts the in-process [`WatchIdentity`] provider used to track the
//! signed-in principal.

pub mod identity;
pub mod projector;
pub mod registry;
pub mod subscription;

pub use identity::{owner_of, WatchIdentity};
pub use projector::{Projector, ViewSnapshot};
pub use registry::{SubscriptionId, SubscriptionRegistry};
pub use subscription::ViewSubscription;
