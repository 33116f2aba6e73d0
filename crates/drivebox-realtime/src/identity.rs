//! In-process identity provider backed by a watch channel.

use tokio::sync::watch;
use tracing::info;

use drivebox_core::error::AppError;
use drivebox_core::result::AppResult;
use drivebox_core::traits::{IdentityProvider, Principal};
use drivebox_core::types::OwnerId;

/// Identity provider fed by the surrounding application.
///
/// The application pushes sign-in and sign-out transitions in; consumers
/// observe them through the [`IdentityProvider`] trait. Starts signed out.
#[derive(Debug)]
pub struct WatchIdentity {
    tx: watch::Sender<Option<Principal>>,
}

impl WatchIdentity {
    /// Creates a provider with no principal.
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self { tx }
    }

    /// Creates a provider already signed in as the given principal.
    pub fn signed_in(principal: Principal) -> Self {
        let provider = Self::new();
        provider.set(principal);
        provider
    }

    /// Records a sign-in or principal change.
    pub fn set(&self, principal: Principal) {
        info!(owner = %principal.id, verified = principal.verified, "Principal signed in");
        self.tx.send_replace(Some(principal));
    }

    /// Records a sign-out.
    pub fn clear(&self) {
        if self.tx.send_replace(None).is_some() {
            info!("Principal signed out");
        }
    }
}

impl Default for WatchIdentity {
    fn default() -> Self {
        Self::new()
    }
}

impl IdentityProvider for WatchIdentity {
    fn current(&self) -> Option<Principal> {
        self.tx.borrow().clone()
    }

    fn watch(&self) -> watch::Receiver<Option<Principal>> {
        self.tx.subscribe()
    }
}

/// The owner id of the current principal.
///
/// Fails with an authentication error when no one is signed in; callers
/// gate every store operation on this.
pub fn owner_of(provider: &dyn IdentityProvider) -> AppResult<OwnerId> {
    provider
        .current()
        .map(|p| p.id)
        .ok_or_else(|| AppError::authentication("No authenticated principal"))
}
