//! # Host Bridge Traits
//!
//! Platform abstraction traits that each host shell implements.
//!
//! ## Overview
//!
//! This crate defines the contract between the native audio core and the
//! platform it runs on. The core never touches audio devices, OS permission
//! dialogs or the web view directly; it talks to these traits.
//!
//! ## Traits
//!
//! ### Media
//! - [`MediaEngine`](media::MediaEngine) - Prepares opaque sources into handles
//! - [`MediaHandle`](media::MediaHandle) - Start/pause/seek/volume on one prepared source
//!
//! ### Platform Integration
//! - [`PermissionGate`](permission::PermissionGate) - OS permission check/request/settings
//! - [`FrontendSink`](frontend::FrontendSink) - Delivers named events to the web front-end
//! - [`HostChrome`](frontend::HostChrome) - Status/title bar theme
//!
//! ### Utilities
//! - [`LoggerSink`](logging::LoggerSink) - Forward structured logs to host logging
//!
//! ## Platform Requirements
//!
//! | Platform | Implementation Crate | Status |
//! |----------|---------------------|--------|
//! | Desktop  | `bridge-desktop`    | ✅ Available |
//! | iOS      | TBD                 | 📋 Planned |
//! | Android  | TBD                 | 📋 Planned |
//!
//! ## Fail-Fast Strategy
//!
//! The core fails with a descriptive error when a required capability is
//! missing rather than silently degrading:
//!
//! ```ignore
//! let media_engine = config.media_engine
//!     .ok_or_else(|| CoreError::CapabilityMissing {
//!         capability: "MediaEngine".to_string(),
//!         message: "No media engine provided. \
//!                  Desktop: enable the desktop-shims feature. \
//!                  Mobile: inject the platform player adapter.".to_string()
//!     })?;
//! ```
//!
//! ## Error Handling
//!
//! All bridge traits use [`BridgeError`](error::BridgeError). Media failures
//! carry the engine's diagnostic code in [`BridgeError::Media`] so it can be
//! surfaced to the front-end unchanged.
//!
//! ## Thread Safety
//!
//! Shared bridges require `Send + Sync`. A [`MediaHandle`](media::MediaHandle)
//! is only `Send`: it is owned and driven by a single controller task.

pub mod error;
pub mod frontend;
pub mod logging;
pub mod media;
pub mod permission;
pub mod platform;

pub use error::BridgeError;

// Re-export commonly used types
pub use frontend::{FrontendEvent, FrontendSink, HostChrome};
pub use logging::{ConsoleLogger, LogEntry, LogLevel, LoggerSink};
pub use media::{MediaEngine, MediaEventListener, MediaHandle, MediaHandleEvent};
pub use permission::PermissionGate;
pub use platform::{PlatformSend, PlatformSendSync};
