//! Identity provider trait.

use tokio::sync::watch;

use crate::types::OwnerId;

/// The authenticated principal as reported by the external identity
/// provider.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Principal {
    /// Opaque principal identifier.
    pub id: OwnerId,
    /// Display name for the surrounding application.
    pub display_name: String,
    /// Whether the provider has verified this principal. Write policy for
    /// unverified principals is enforced by the surrounding application,
    /// not by this crate.
    pub verified: bool,
}

/// Trait for the external identity provider.
///
/// The provider may report no principal at all (signed out, still
/// loading); every consumer must tolerate `None`.
pub trait IdentityProvider: Send + Sync + 'static {
    /// The currently authenticated principal, if any.
    fn current(&self) -> Option<Principal>;

    /// A change-notification stream carrying the principal as it changes.
    fn watch(&self) -> watch::Receiver<Option<Principal>>;
}
