//! # Playback Controller
//!
//! Owns the single active [`MediaResource`] and drives the playback state
//! machine.
//!
//! ## Architecture
//!
//! The controller is an actor: one task holds all mutable state and drains
//! two queues.
//!
//! ```text
//!  PlaybackController ──Command──> ┌─────────────┐ ──> MediaHandle
//!      (clonable)      (bounded)   │ PlayerActor │
//!                                  │             │ ──> EventBridge
//!  prepare task ─┐                 └─────────────┘
//!  media listener├──Signal───────────────^
//!  ticker ───────┘  (unbounded)
//! ```
//!
//! Preparation is the only work done off the actor; its outcome is posted
//! back as a signal tagged with the resource generation. Signals from a
//! superseded resource are dropped, and a late prepared handle is released
//! immediately.
//!
//! ## Usage
//!
//! ```ignore
//! let controller = PlaybackController::spawn(engine, bridge, PlayerConfig::default())?;
//! controller.play("/music/a.mp3").await?;
//! controller.seek(30.0).await?;
//! assert!(controller.is_playing().await);
//! controller.shutdown().await;
//! ```

use crate::bridge::EventBridge;
use crate::config::PlayerConfig;
use crate::error::{PlaybackError, Result};
use crate::resource::{clamp_volume, MediaResource};
use crate::scheduler::ProgressScheduler;
use crate::state::{PlaybackState, PlayerSnapshot, ProgressSample};
use bridge_traits::{MediaEngine, MediaEventListener, MediaHandle, MediaHandleEvent};
use core_async::runtime;
use core_async::sync::{mpsc, oneshot, CancellationToken, DropGuard};
use core_async::time::{sleep, Duration};
use core_runtime::events::{CoreEvent, PlaybackEvent};
use core_runtime::logging::strip_path;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

// ============================================================================
// Messages
// ============================================================================

enum Command {
    Play { source: String },
    Pause,
    Resume,
    Stop,
    Seek { seconds: f64 },
    SetVolume { level: f32 },
    Snapshot { reply: oneshot::Sender<PlayerSnapshot> },
    Shutdown { ack: oneshot::Sender<()> },
}

enum Signal {
    Prepared {
        generation: u64,
        result: Result<Box<dyn MediaHandle>>,
    },
    PrepareTimedOut {
        generation: u64,
    },
    Media {
        generation: u64,
        event: MediaHandleEvent,
    },
    Tick {
        epoch: u64,
    },
}

// ============================================================================
// Handle
// ============================================================================

/// Cloneable handle to the playback actor.
///
/// Control methods only fail with [`PlaybackError::ControllerClosed`].
/// Invalid requests (pausing while idle, seeking before media is ready) are
/// ignored. Queries return defaults once the controller is closed.
#[derive(Clone)]
pub struct PlaybackController {
    commands: mpsc::Sender<Command>,
}

impl PlaybackController {
    /// Validate `config` and start the actor on the current runtime.
    pub fn spawn(
        engine: Arc<dyn MediaEngine>,
        bridge: EventBridge,
        config: PlayerConfig,
    ) -> Result<Self> {
        config.validate()?;
        if !runtime::in_runtime() {
            return Err(PlaybackError::RuntimeUnavailable);
        }

        let (commands, command_rx) = mpsc::channel(config.mailbox_capacity);
        let (signals, signal_rx) = mpsc::unbounded_channel();
        let actor = PlayerActor::new(engine, bridge, config, signals);
        core_async::spawn(actor.run(command_rx, signal_rx));

        Ok(Self { commands })
    }

    /// Load and play `source`, or restart it if it is already loaded.
    pub async fn play(&self, source: impl Into<String>) -> Result<()> {
        self.send(Command::Play {
            source: source.into(),
        })
        .await
    }

    /// Pause playback. Ignored unless playing.
    pub async fn pause(&self) -> Result<()> {
        self.send(Command::Pause).await
    }

    /// Continue a paused resource. Ignored unless paused or ready.
    pub async fn resume(&self) -> Result<()> {
        self.send(Command::Resume).await
    }

    /// Release the loaded resource and return to `Idle`.
    pub async fn stop(&self) -> Result<()> {
        self.send(Command::Stop).await
    }

    /// Move to `seconds` without changing play/pause state. Ignored until
    /// media is ready and for negative or non-finite positions.
    pub async fn seek(&self, seconds: f64) -> Result<()> {
        self.send(Command::Seek { seconds }).await
    }

    /// Set the output volume. Remembered for the next resource.
    pub async fn set_volume(&self, level: f32) -> Result<()> {
        self.send(Command::SetVolume { level }).await
    }

    pub async fn snapshot(&self) -> PlayerSnapshot {
        let (reply, response) = oneshot::channel();
        if self.send(Command::Snapshot { reply }).await.is_err() {
            return PlayerSnapshot::default();
        }
        response.await.unwrap_or_default()
    }

    pub async fn state(&self) -> PlaybackState {
        self.snapshot().await.state
    }

    pub async fn is_playing(&self) -> bool {
        self.snapshot().await.is_playing
    }

    /// Position in seconds; `0.0` with nothing loaded.
    pub async fn current_position(&self) -> f64 {
        self.snapshot().await.position
    }

    /// Duration in seconds; `0.0` while unknown.
    pub async fn duration(&self) -> f64 {
        self.snapshot().await.duration
    }

    /// Release everything and stop the actor. Waits for teardown.
    pub async fn shutdown(&self) {
        let (ack, done) = oneshot::channel();
        if self.send(Command::Shutdown { ack }).await.is_ok() {
            let _ = done.await;
        }
    }

    pub fn is_closed(&self) -> bool {
        self.commands.is_closed()
    }

    async fn send(&self, command: Command) -> Result<()> {
        self.commands
            .send(command)
            .await
            .map_err(|_| PlaybackError::ControllerClosed)
    }
}

impl std::fmt::Debug for PlaybackController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlaybackController")
            .field("closed", &self.is_closed())
            .finish()
    }
}

// ============================================================================
// Actor
// ============================================================================

struct PlayerActor {
    engine: Arc<dyn MediaEngine>,
    bridge: EventBridge,
    config: PlayerConfig,
    signals: mpsc::UnboundedSender<Signal>,
    state: PlaybackState,
    resource: Option<MediaResource>,
    generation: u64,
    volume: f32,
    scheduler: ProgressScheduler,
    watchdog: Option<DropGuard>,
}

impl PlayerActor {
    fn new(
        engine: Arc<dyn MediaEngine>,
        bridge: EventBridge,
        config: PlayerConfig,
        signals: mpsc::UnboundedSender<Signal>,
    ) -> Self {
        Self {
            engine,
            bridge,
            volume: config.initial_volume,
            scheduler: ProgressScheduler::new(config.progress_interval),
            config,
            signals,
            state: PlaybackState::Idle,
            resource: None,
            generation: 0,
            watchdog: None,
        }
    }

    async fn run(
        mut self,
        mut commands: mpsc::Receiver<Command>,
        mut signals: mpsc::UnboundedReceiver<Signal>,
    ) {
        info!(
            progress_interval_ms = self.scheduler.period().as_millis() as u64,
            "Playback controller started"
        );

        loop {
            tokio::select! {
                biased;

                Some(signal) = signals.recv() => self.handle_signal(signal),
                command = commands.recv() => match command {
                    Some(Command::Shutdown { ack }) => {
                        self.teardown();
                        let _ = ack.send(());
                        break;
                    }
                    Some(command) => self.handle_command(command),
                    None => {
                        self.teardown();
                        break;
                    }
                },
            }
        }

        info!("Playback controller stopped");
    }

    fn handle_command(&mut self, command: Command) {
        match command {
            Command::Play { source } => self.play(source),
            Command::Pause => self.pause(),
            Command::Resume => self.resume(),
            Command::Stop => self.stop(),
            Command::Seek { seconds } => self.seek(seconds),
            Command::SetVolume { level } => self.set_volume(level),
            Command::Snapshot { reply } => {
                let _ = reply.send(self.snapshot());
            }
            // Handled by the run loop.
            Command::Shutdown { .. } => {}
        }
    }

    fn handle_signal(&mut self, signal: Signal) {
        match signal {
            Signal::Prepared { generation, result } => self.on_prepared(generation, result),
            Signal::PrepareTimedOut { generation } => {
                if self.is_current(generation) && self.state == PlaybackState::Preparing {
                    let timeout = self.config.prepare_timeout.unwrap_or_default();
                    self.fail(PlaybackError::PrepareFailed {
                        code: "timeout".to_string(),
                        detail: format!("media not ready after {:?}", timeout),
                    });
                }
            }
            Signal::Media { generation, event } => {
                if !self.is_current(generation) {
                    debug!(generation, ?event, "Dropping event from superseded resource");
                    return;
                }
                match event {
                    MediaHandleEvent::Completed => self.on_completed(),
                    MediaHandleEvent::Error { code, detail } => {
                        self.fail(PlaybackError::PlaybackFailed { code, detail })
                    }
                }
            }
            Signal::Tick { epoch } => {
                if !self.scheduler.accepts(epoch) {
                    return;
                }
                if let Some(resource) = self.resource.as_ref().filter(|r| r.is_active()) {
                    self.bridge.emit_progress(resource.source(), resource.progress());
                }
            }
        }
    }

    // ------------------------------------------------------------------------
    // Operations
    // ------------------------------------------------------------------------

    #[instrument(skip(self, source), fields(source = %strip_path(&source)))]
    fn play(&mut self, source: String) {
        let loaded = self
            .resource
            .as_ref()
            .map_or(false, |resource| resource.source() == source);

        if loaded {
            match self.state {
                PlaybackState::Playing | PlaybackState::Preparing => {
                    debug!("Source already active; ignoring");
                    return;
                }
                PlaybackState::Ready | PlaybackState::Paused => {
                    self.start_playback();
                    return;
                }
                PlaybackState::Ended => {
                    if let Some(resource) = self.resource.as_mut() {
                        if let Err(err) = resource.seek_to(0.0) {
                            self.fail(err);
                            return;
                        }
                    }
                    self.start_playback();
                    return;
                }
                _ => {}
            }
        }

        self.release_resource();
        self.generation += 1;
        let generation = self.generation;

        let resource = MediaResource::new(source.clone(), generation);
        let prepare = resource.prepare_async(self.engine.clone(), self.listener(generation));
        let signals = self.signals.clone();
        core_async::spawn(async move {
            let result = prepare.await;
            if let Err(unsent) = signals.send(Signal::Prepared { generation, result }) {
                if let Signal::Prepared {
                    result: Ok(mut handle),
                    ..
                } = unsent.0
                {
                    handle.release();
                }
            }
        });

        info!(resource_id = %resource.id(), generation, "Preparing media");
        self.resource = Some(resource);
        self.set_state(PlaybackState::Preparing);
        self.arm_watchdog(generation);
        self.bridge
            .publish(CoreEvent::Playback(PlaybackEvent::Preparing { source }));
    }

    fn pause(&mut self) {
        if self.state != PlaybackState::Playing {
            self.ignore("pause");
            return;
        }
        let Some(resource) = self.resource.as_mut() else {
            return;
        };

        if let Err(err) = resource.pause() {
            self.fail(err);
            return;
        }

        let event = PlaybackEvent::Paused {
            source: resource.source().to_string(),
            position_ms: resource.position().as_millis() as u64,
        };
        self.scheduler.stop();
        self.set_state(PlaybackState::Paused);
        self.bridge.publish(CoreEvent::Playback(event));
    }

    fn resume(&mut self) {
        match self.state {
            PlaybackState::Paused | PlaybackState::Ready => self.start_playback(),
            _ => self.ignore("resume"),
        }
    }

    fn stop(&mut self) {
        if self.state == PlaybackState::Idle && self.resource.is_none() {
            debug!("Stop while idle");
            return;
        }

        let source = self.release_resource();
        self.set_state(PlaybackState::Idle);
        self.bridge
            .publish(CoreEvent::Playback(PlaybackEvent::Stopped { source }));
    }

    fn seek(&mut self, seconds: f64) {
        let Some(resource) = self.resource.as_mut() else {
            self.ignore("seek");
            return;
        };

        match resource.seek_to(seconds) {
            // The next tick reports the new position.
            Ok(position) => debug!(position_ms = position.as_millis() as u64, "Seeked"),
            Err(err) if err.is_resource_failure() => self.fail(err),
            Err(err) => debug!(error = %err, "Seek ignored"),
        }
    }

    fn set_volume(&mut self, level: f32) {
        let level = match clamp_volume(level) {
            Ok(level) => level,
            Err(err) => {
                debug!(error = %err, "Volume ignored");
                return;
            }
        };
        self.volume = level;

        if let Some(resource) = self.resource.as_mut() {
            if let Err(err) = resource.set_volume(level) {
                self.fail(err);
            }
        }
    }

    fn snapshot(&self) -> PlayerSnapshot {
        let resource = self.resource.as_ref();
        PlayerSnapshot {
            state: self.state.clone(),
            source: resource.map(|r| r.source().to_string()),
            resource_id: resource.map(|r| r.id()),
            is_playing: self.state.is_playing(),
            position: resource.map_or(0.0, |r| r.progress().current_time),
            duration: resource.map_or(0.0, |r| r.progress().duration),
            volume: self.volume,
        }
    }

    // ------------------------------------------------------------------------
    // Resource callbacks
    // ------------------------------------------------------------------------

    fn on_prepared(&mut self, generation: u64, result: Result<Box<dyn MediaHandle>>) {
        if !self.is_current(generation) || self.state != PlaybackState::Preparing {
            debug!(generation, "Dropping superseded preparation result");
            if let Ok(mut handle) = result {
                handle.release();
            }
            return;
        }
        self.watchdog = None;

        let handle = match result {
            Ok(handle) => handle,
            Err(err) => {
                self.fail(err);
                return;
            }
        };

        let volume = self.volume;
        let Some(resource) = self.resource.as_mut() else {
            return;
        };
        if let Err(err) = resource.attach(handle, volume) {
            self.fail(err);
            return;
        }
        self.set_state(PlaybackState::Ready);

        let Some(resource) = self.resource.as_mut() else {
            return;
        };
        if let Err(err) = resource.start() {
            self.fail(err);
            return;
        }

        let duration = resource.duration();
        let source = resource.source().to_string();
        self.set_state(PlaybackState::Playing);
        self.bridge
            .emit_progress(&source, ProgressSample::new(Duration::ZERO, duration));
        self.start_scheduler();

        info!(
            duration_ms = duration.map(|d| d.as_millis() as u64),
            "Playback started"
        );
        self.bridge
            .publish(CoreEvent::Playback(PlaybackEvent::Started {
                source,
                duration_ms: duration.map_or(0, |d| d.as_millis() as u64),
            }));
    }

    fn on_completed(&mut self) {
        if !matches!(
            self.state,
            PlaybackState::Playing | PlaybackState::Paused | PlaybackState::Ready
        ) {
            return;
        }
        let Some(resource) = self.resource.as_mut() else {
            return;
        };

        // Park the handle at the end so a later seek does not restart it.
        if let Err(err) = resource.pause() {
            debug!(error = %err, "Pausing finished media failed");
        }
        let source = resource.source().to_string();
        self.scheduler.stop();
        self.set_state(PlaybackState::Ended);
        info!("Playback completed");
        self.bridge.emit_ended(&source);
    }

    // ------------------------------------------------------------------------
    // Helpers
    // ------------------------------------------------------------------------

    /// Start or continue the loaded resource and arm the ticker.
    fn start_playback(&mut self) {
        let Some(resource) = self.resource.as_mut() else {
            return;
        };
        if let Err(err) = resource.start() {
            self.fail(err);
            return;
        }

        let resumed = self.state == PlaybackState::Paused;
        let event = PlaybackEvent::Resumed {
            source: resource.source().to_string(),
            position_ms: resource.position().as_millis() as u64,
        };
        self.set_state(PlaybackState::Playing);
        self.start_scheduler();
        if resumed {
            self.bridge.publish(CoreEvent::Playback(event));
        }
    }

    fn start_scheduler(&mut self) {
        let signals = self.signals.clone();
        self.scheduler
            .start(move |epoch| signals.send(Signal::Tick { epoch }).is_ok());
    }

    fn arm_watchdog(&mut self, generation: u64) {
        let Some(timeout) = self.config.prepare_timeout else {
            return;
        };

        let token = CancellationToken::new();
        let cancelled = token.clone();
        let signals = self.signals.clone();
        core_async::spawn(async move {
            tokio::select! {
                _ = cancelled.cancelled() => {}
                _ = sleep(timeout) => {
                    let _ = signals.send(Signal::PrepareTimedOut { generation });
                }
            }
        });
        self.watchdog = Some(token.drop_guard());
    }

    fn listener(&self, generation: u64) -> MediaEventListener {
        let signals = self.signals.clone();
        Arc::new(move |event| {
            let _ = signals.send(Signal::Media { generation, event });
        })
    }

    fn is_current(&self, generation: u64) -> bool {
        self.resource
            .as_ref()
            .map_or(false, |resource| resource.generation() == generation)
    }

    /// Move to `Failed`, release the resource and notify the front-end.
    fn fail(&mut self, error: PlaybackError) {
        warn!(error = %error, code = error.code(), "Playback failed");
        let source = self.release_resource();
        self.set_state(PlaybackState::Failed {
            reason: error.to_string(),
        });
        self.bridge.emit_error(source.as_deref(), &error);
    }

    /// Disarm timers and drop the loaded resource. Returns its source.
    fn release_resource(&mut self) -> Option<String> {
        self.scheduler.stop();
        self.watchdog = None;
        self.resource.take().map(|mut resource| {
            resource.release();
            resource.source().to_string()
        })
    }

    fn teardown(&mut self) {
        self.release_resource();
        self.set_state(PlaybackState::Idle);
    }

    fn set_state(&mut self, state: PlaybackState) {
        if self.state != state {
            debug!(from = %self.state, to = %state, "Playback state changed");
            self.state = state;
        }
    }

    fn ignore(&self, operation: &'static str) {
        let err = PlaybackError::InvalidStateTransition {
            operation,
            state: self.state.name().to_string(),
        };
        debug!(error = %err, "Ignoring request");
    }
}
