//! # Core Configuration Module
//!
//! Provides bridge wiring and runtime settings for the audio host core.
//!
//! ## Overview
//!
//! The configuration system uses a builder pattern to construct a `CoreConfig`
//! holding every host bridge the core needs. It enforces fail-fast validation so
//! a missing capability is reported at startup rather than on the first
//! playback request.
//!
//! ## Required Dependencies
//!
//! - `FrontendSink` - Delivers events to the web front-end (always host-provided)
//! - `MediaEngine` - Prepares media handles (desktop default: Symphonia probe)
//! - `PermissionGate` - OS permission status (desktop default: always granted)
//!
//! ## Optional Dependencies
//!
//! - `HostChrome` - Status/title bar theming
//!
//! When the `desktop-shims` feature is enabled, desktop defaults for
//! `MediaEngine` and `PermissionGate` are injected automatically if not provided.
//!
//! ## Usage
//!
//! ```ignore
//! use core_runtime::config::CoreConfig;
//! use std::sync::Arc;
//!
//! let config = CoreConfig::builder()
//!     .frontend_sink(Arc::new(MyWebViewSink::new(webview)))
//!     .media_engine(Arc::new(MyPlayerEngine))
//!     .permission_gate(Arc::new(MyPermissionGate))
//!     .host_chrome(Arc::new(MyWindowChrome))
//!     .build()?;
//! ```

use crate::error::{Error, Result};
use crate::events::DEFAULT_EVENT_BUFFER_SIZE;
use bridge_traits::{FrontendSink, HostChrome, MediaEngine, PermissionGate};
use std::sync::Arc;

/// Upper bound for the event bus buffer.
pub const MAX_EVENT_BUFFER_SIZE: usize = 10_000;

/// Core configuration for the audio host.
///
/// Use [`CoreConfigBuilder`] to construct instances.
#[derive(Clone)]
pub struct CoreConfig {
    /// Platform media engine
    pub media_engine: Arc<dyn MediaEngine>,

    /// OS permission collaborator
    pub permission_gate: Arc<dyn PermissionGate>,

    /// Front-end event delivery
    pub frontend_sink: Arc<dyn FrontendSink>,

    /// Window chrome (optional)
    pub host_chrome: Option<Arc<dyn HostChrome>>,

    /// Capacity of the in-process event bus
    pub event_buffer_size: usize,
}

impl std::fmt::Debug for CoreConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CoreConfig")
            .field("media_engine", &"MediaEngine { ... }")
            .field("permission_gate", &"PermissionGate { ... }")
            .field("frontend_sink", &"FrontendSink { ... }")
            .field(
                "host_chrome",
                &self.host_chrome.as_ref().map(|_| "HostChrome { ... }"),
            )
            .field("event_buffer_size", &self.event_buffer_size)
            .finish()
    }
}

impl CoreConfig {
    pub fn builder() -> CoreConfigBuilder {
        CoreConfigBuilder::default()
    }

    /// Validates runtime settings.
    pub fn validate(&self) -> Result<()> {
        if self.event_buffer_size == 0 {
            return Err(Error::Config(
                "Event buffer size must be greater than 0".to_string(),
            ));
        }

        if self.event_buffer_size > MAX_EVENT_BUFFER_SIZE {
            return Err(Error::Config(format!(
                "Event buffer size exceeds maximum of {}",
                MAX_EVENT_BUFFER_SIZE
            )));
        }

        Ok(())
    }
}

fn frontend_sink_missing_error() -> Error {
    Error::capability_missing(
        "FrontendSink",
        "FrontendSink implementation is required to deliver events to the front-end. \
         Desktop: wrap the web view with ScriptFrontendSink or use ChannelFrontendSink. \
         Mobile: inject a sink that evaluates scripts in the platform web view.",
    )
}

#[cfg(not(feature = "desktop-shims"))]
fn media_engine_missing_error() -> Error {
    Error::capability_missing(
        "MediaEngine",
        "MediaEngine implementation is required for audio playback. \
         Desktop: ensure the 'desktop-shims' feature is enabled to use the default DesktopMediaEngine. \
         Mobile: inject the platform media player adapter (AVPlayer/MediaPlayer).",
    )
}

#[cfg(not(feature = "desktop-shims"))]
fn permission_gate_missing_error() -> Error {
    Error::capability_missing(
        "PermissionGate",
        "PermissionGate implementation is required to relay permission requests. \
         Desktop: ensure the 'desktop-shims' feature is enabled to use the default DesktopPermissionGate. \
         Mobile: inject the platform permission adapter.",
    )
}

#[cfg(feature = "desktop-shims")]
fn provide_default_media_engine() -> Result<Arc<dyn MediaEngine>> {
    use bridge_desktop::DesktopMediaEngine;

    let engine: Arc<dyn MediaEngine> = Arc::new(DesktopMediaEngine::new());
    Ok(engine)
}

#[cfg(not(feature = "desktop-shims"))]
fn provide_default_media_engine() -> Result<Arc<dyn MediaEngine>> {
    Err(media_engine_missing_error())
}

#[cfg(feature = "desktop-shims")]
fn provide_default_permission_gate() -> Result<Arc<dyn PermissionGate>> {
    use bridge_desktop::DesktopPermissionGate;

    let gate: Arc<dyn PermissionGate> = Arc::new(DesktopPermissionGate::new());
    Ok(gate)
}

#[cfg(not(feature = "desktop-shims"))]
fn provide_default_permission_gate() -> Result<Arc<dyn PermissionGate>> {
    Err(permission_gate_missing_error())
}

/// Builder for [`CoreConfig`].
#[derive(Default)]
pub struct CoreConfigBuilder {
    media_engine: Option<Arc<dyn MediaEngine>>,
    permission_gate: Option<Arc<dyn PermissionGate>>,
    frontend_sink: Option<Arc<dyn FrontendSink>>,
    host_chrome: Option<Arc<dyn HostChrome>>,
    event_buffer_size: Option<usize>,
}

impl CoreConfigBuilder {
    pub fn media_engine(mut self, engine: Arc<dyn MediaEngine>) -> Self {
        self.media_engine = Some(engine);
        self
    }

    pub fn permission_gate(mut self, gate: Arc<dyn PermissionGate>) -> Self {
        self.permission_gate = Some(gate);
        self
    }

    pub fn frontend_sink(mut self, sink: Arc<dyn FrontendSink>) -> Self {
        self.frontend_sink = Some(sink);
        self
    }

    pub fn host_chrome(mut self, chrome: Arc<dyn HostChrome>) -> Self {
        self.host_chrome = Some(chrome);
        self
    }

    /// Sets the event bus capacity (default: 100).
    pub fn event_buffer_size(mut self, size: usize) -> Self {
        self.event_buffer_size = Some(size);
        self
    }

    /// Builds and validates the configuration.
    ///
    /// # Errors
    ///
    /// - [`Error::CapabilityMissing`] if a required bridge is absent and no
    ///   platform default is available
    /// - [`Error::Config`] if a setting is out of range
    pub fn build(self) -> Result<CoreConfig> {
        let frontend_sink = self.frontend_sink.ok_or_else(frontend_sink_missing_error)?;

        let media_engine = match self.media_engine {
            Some(engine) => engine,
            None => provide_default_media_engine()?,
        };

        let permission_gate = match self.permission_gate {
            Some(gate) => gate,
            None => provide_default_permission_gate()?,
        };

        let config = CoreConfig {
            media_engine,
            permission_gate,
            frontend_sink,
            host_chrome: self.host_chrome,
            event_buffer_size: self.event_buffer_size.unwrap_or(DEFAULT_EVENT_BUFFER_SIZE),
        };

        config.validate()?;

        Ok(config)
    }
}
