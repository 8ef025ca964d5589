//! Permission collaborator contract.
//!
//! The core relays OS permission outcomes to the front-end and makes no policy
//! decisions of its own. A denial is a normal outcome, not an error.

use crate::{error::Result, platform::PlatformSendSync};

/// Host permission capability (e.g. microphone or media library access).
#[async_trait::async_trait]
pub trait PermissionGate: PlatformSendSync {
    /// Synchronously report whether the permission is currently granted.
    fn check_granted(&self) -> bool;

    /// Ask the OS for the permission and resolve with the grant outcome.
    ///
    /// # Errors
    ///
    /// Returns an error only when the request could not be issued at all
    /// (e.g. no foreground surface to host the dialog).
    async fn request(&self) -> Result<bool>;

    /// Navigate to the OS settings page for this application.
    ///
    /// Fire-and-forget: failures are the host's concern.
    fn open_system_settings(&self);
}
