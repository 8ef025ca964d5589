//! # Desktop Bridge Implementations
//!
//! Default implementations of bridge traits for desktop platforms
//! (macOS, Windows, Linux).
//!
//! ## Overview
//!
//! - `MediaEngine` probing local files with `symphonia`; position is
//!   clock-driven and completion is timer-driven (no device output)
//! - `PermissionGate` that reports a host-controlled status
//! - `FrontendSink` as a script evaluator or an in-process channel
//! - `HostChrome` that records the requested theme
//!
//! ## Usage
//!
//! ```ignore
//! use bridge_desktop::{ChannelFrontendSink, DesktopMediaEngine, DesktopPermissionGate};
//!
//! #[tokio::main]
//! async fn main() {
//!     let engine = DesktopMediaEngine::new();
//!     let gate = DesktopPermissionGate::new();
//!     let (sink, events) = ChannelFrontendSink::new();
//!
//!     // Use in core configuration
//! }
//! ```

mod frontend;
mod media;
mod permission;

pub use frontend::{ChannelFrontendSink, DesktopHostChrome, ScriptFrontendSink};
pub use media::{is_audio_file, DesktopMediaEngine, DesktopMediaHandle};
pub use permission::DesktopPermissionGate;
