//! Core service façade exposed to the host shell.
//!
//! The front-end has no direct platform access: every control call it makes
//! lands on [`CoreService`], which forwards it to the playback controller or
//! the permission gate and reports outcomes back as front-end events
//! (`permission-result`, `audio-progress`, `audio-ended`, `audio-error`).
//!
//! Desktop apps typically enable the `desktop-shims` feature (which depends on
//! `bridge-desktop`) so only a [`FrontendSink`](bridge_traits::FrontendSink)
//! needs to be supplied. Mobile hosts inject their own media engine and
//! permission gate through [`CoreConfig`].
//!
//! ```ignore
//! let config = CoreConfig::builder()
//!     .frontend_sink(Arc::new(ScriptFrontendSink::new(move |script| webview.eval(&script))))
//!     .build()?;
//! let core = CoreService::builder().core_config(config).build()?;
//!
//! core.play_audio("/music/a.mp3").await;
//! core.request_permission();
//! ```
//!
//! Every method is safe to call repeatedly and in any order. After
//! [`CoreService::shutdown`], controls are no-ops and queries return defaults.

pub mod error;

pub use error::{CoreError, Result};

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use core_playback::{EventBridge, PlaybackController, PlayerConfig, PlayerSnapshot};
use core_runtime::config::CoreConfig;
use core_runtime::events::{CoreEvent, EventBus, EventStream, PermissionEvent, UiEvent};
use core_runtime::logging::{init_logging, LoggingConfig};
use tracing::{debug, info, warn};

/// Builder for [`CoreService`].
#[derive(Default)]
pub struct CoreServiceBuilder {
    core: Option<CoreConfig>,
    player: PlayerConfig,
    logging: Option<LoggingConfig>,
}

impl CoreServiceBuilder {
    pub fn core_config(mut self, config: CoreConfig) -> Self {
        self.core = Some(config);
        self
    }

    pub fn player_config(mut self, config: PlayerConfig) -> Self {
        self.player = config;
        self
    }

    /// Install the global tracing subscriber while building.
    pub fn logging(mut self, config: LoggingConfig) -> Self {
        self.logging = Some(config);
        self
    }

    /// Start the playback controller and assemble the service.
    ///
    /// Must be called from within an async runtime.
    pub fn build(self) -> Result<CoreService> {
        if let Some(logging) = self.logging {
            init_logging(logging)?;
        }

        let config = self.core.ok_or_else(|| {
            CoreError::InitializationFailed("CoreConfig is required".to_string())
        })?;
        config.validate()?;

        let bus = EventBus::new(config.event_buffer_size);
        let bridge = EventBridge::new(config.frontend_sink.clone(), bus.clone());
        let player =
            PlaybackController::spawn(config.media_engine.clone(), bridge.clone(), self.player)?;

        info!(
            event_buffer_size = config.event_buffer_size,
            host_chrome = config.host_chrome.is_some(),
            "Core service started"
        );

        Ok(CoreService {
            inner: Arc::new(Inner {
                config,
                bus,
                bridge,
                player,
                closed: AtomicBool::new(false),
            }),
        })
    }
}

struct Inner {
    config: CoreConfig,
    bus: EventBus,
    bridge: EventBridge,
    player: PlaybackController,
    closed: AtomicBool,
}

/// Primary façade exposed to host applications. Cheap to clone.
#[derive(Clone)]
pub struct CoreService {
    inner: Arc<Inner>,
}

impl CoreService {
    pub fn builder() -> CoreServiceBuilder {
        CoreServiceBuilder::default()
    }

    /// Create a service with the default player configuration.
    pub fn new(config: CoreConfig) -> Result<Self> {
        Self::builder().core_config(config).build()
    }

    fn is_closed(&self) -> bool {
        self.inner.closed.load(Ordering::Acquire)
    }

    // ------------------------------------------------------------------------
    // Window chrome
    // ------------------------------------------------------------------------

    /// Match host chrome (status/title bar) to the page theme.
    pub fn set_theme(&self, is_dark: bool) {
        if self.is_closed() {
            return;
        }
        match &self.inner.config.host_chrome {
            Some(chrome) => chrome.apply_theme(is_dark),
            None => debug!(is_dark, "No host chrome; theme change is cosmetic only"),
        }
        self.inner
            .bridge
            .publish(CoreEvent::Ui(UiEvent::ThemeChanged { dark: is_dark }));
    }

    // ------------------------------------------------------------------------
    // Permissions
    // ------------------------------------------------------------------------

    /// Ask the OS for the media permission.
    ///
    /// Returns immediately; the outcome arrives as a `permission-result`
    /// event. A failing request is reported as denied.
    pub fn request_permission(&self) {
        if self.is_closed() {
            return;
        }

        let gate = self.inner.config.permission_gate.clone();
        let bridge = self.inner.bridge.clone();
        core_async::spawn(async move {
            let granted = match gate.request().await {
                Ok(granted) => granted,
                Err(err) => {
                    warn!(error = %err, "Permission request failed");
                    false
                }
            };
            info!(granted, "Permission request finished");
            bridge.emit_permission_result(granted);
        });
    }

    pub fn check_permission(&self) -> bool {
        if self.is_closed() {
            return false;
        }
        self.inner.config.permission_gate.check_granted()
    }

    /// Open the OS settings page for this app.
    pub fn open_settings(&self) {
        if self.is_closed() {
            return;
        }
        self.inner.config.permission_gate.open_system_settings();
        self.inner
            .bridge
            .publish(CoreEvent::Permission(PermissionEvent::SettingsOpened));
    }

    // ------------------------------------------------------------------------
    // Playback
    // ------------------------------------------------------------------------

    pub async fn play_audio(&self, path: &str) {
        if self.is_closed() {
            return;
        }
        self.control("play", self.inner.player.play(path).await);
    }

    pub async fn pause_audio(&self) {
        if self.is_closed() {
            return;
        }
        self.control("pause", self.inner.player.pause().await);
    }

    pub async fn resume_audio(&self) {
        if self.is_closed() {
            return;
        }
        self.control("resume", self.inner.player.resume().await);
    }

    pub async fn stop_audio(&self) {
        if self.is_closed() {
            return;
        }
        self.control("stop", self.inner.player.stop().await);
    }

    pub async fn seek_audio(&self, seconds: f64) {
        if self.is_closed() {
            return;
        }
        self.control("seek", self.inner.player.seek(seconds).await);
    }

    pub async fn set_volume(&self, level: f32) {
        if self.is_closed() {
            return;
        }
        self.control("set_volume", self.inner.player.set_volume(level).await);
    }

    pub async fn is_playing(&self) -> bool {
        self.snapshot().await.is_playing
    }

    /// Playback position in seconds.
    pub async fn get_current_position(&self) -> f64 {
        self.snapshot().await.position
    }

    /// Media duration in seconds; `0.0` while unknown.
    pub async fn get_duration(&self) -> f64 {
        self.snapshot().await.duration
    }

    pub async fn snapshot(&self) -> PlayerSnapshot {
        if self.is_closed() {
            return PlayerSnapshot::default();
        }
        self.inner.player.snapshot().await
    }

    // ------------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------------

    /// Stream of in-process events mirroring everything sent to the front-end.
    pub fn subscribe(&self) -> EventStream {
        EventStream::new(self.inner.bus.subscribe())
    }

    /// Release the active resource and stop the playback controller.
    pub async fn shutdown(&self) {
        if self.inner.closed.swap(true, Ordering::AcqRel) {
            return;
        }
        self.inner.player.shutdown().await;
        info!("Core service shut down");
    }

    fn control(&self, operation: &'static str, result: core_playback::Result<()>) {
        if let Err(err) = result {
            debug!(operation, error = %err, "Playback control dropped");
        }
    }
}

impl std::fmt::Debug for CoreService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CoreService")
            .field("config", &self.inner.config)
            .field("closed", &self.is_closed())
            .finish()
    }
}
