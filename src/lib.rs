//! Workspace placeholder crate.
//!
//! This crate exists to expose shared feature flags that map to the individual
//! workspace crates (`core-service`, `core-playback`). Host shells can depend
//! on `audio-host-workspace` and enable the documented features without wiring
//! each crate individually.
//!
//! - `desktop-shims` (default): desktop media engine, permission gate and
//!   front-end sinks are injected automatically.
//! - `headless`: only the core crates; every bridge must be supplied by the host.

#[cfg(any(feature = "desktop-shims", feature = "headless"))]
pub use core_service::{CoreService, CoreServiceBuilder};

#[cfg(feature = "headless")]
pub use core_playback::{PlaybackState, PlayerConfig};
