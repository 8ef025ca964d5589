//! Desktop Permission Gate
//!
//! Desktop platforms do not gate media playback behind a runtime permission,
//! so the gate reports a fixed status. Opening settings is logged only.

use async_trait::async_trait;
use bridge_traits::{error::Result, permission::PermissionGate};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::info;

/// Permission gate with a host-controlled grant status.
#[derive(Debug)]
pub struct DesktopPermissionGate {
    granted: AtomicBool,
}

impl DesktopPermissionGate {
    /// Gate that always reports the permission as granted.
    pub fn new() -> Self {
        Self::with_status(true)
    }

    pub fn with_status(granted: bool) -> Self {
        Self {
            granted: AtomicBool::new(granted),
        }
    }

    /// Change the reported status, e.g. when the user revokes access.
    pub fn set_granted(&self, granted: bool) {
        self.granted.store(granted, Ordering::SeqCst);
    }
}

impl Default for DesktopPermissionGate {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PermissionGate for DesktopPermissionGate {
    fn check_granted(&self) -> bool {
        self.granted.load(Ordering::SeqCst)
    }

    async fn request(&self) -> Result<bool> {
        Ok(self.check_granted())
    }

    fn open_system_settings(&self) {
        info!("System settings requested; no settings page on desktop");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_default_is_granted() {
        let gate = DesktopPermissionGate::default();
        assert!(gate.check_granted());
        assert!(gate.request().await.unwrap());
    }

    #[tokio::test]
    async fn test_status_can_change() {
        let gate = DesktopPermissionGate::with_status(false);
        assert!(!gate.request().await.unwrap());

        gate.set_granted(true);
        assert!(gate.check_granted());
        gate.open_system_settings();
    }
}
