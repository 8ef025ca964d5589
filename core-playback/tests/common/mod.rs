//! Shared fakes for controller integration tests.
//!
//! `FakeEngine` serves scripted sources and hands out `FakeHandle`s whose
//! position follows the Tokio clock, so tests run under
//! `#[tokio::test(start_paused = true)]` and step time with [`advance`].

#![allow(dead_code)]

use async_trait::async_trait;
use bridge_traits::error::{BridgeError, Result as BridgeResult};
use bridge_traits::{
    FrontendEvent, FrontendSink, MediaEngine, MediaEventListener, MediaHandle, MediaHandleEvent,
};
use core_playback::{EventBridge, PlaybackController, PlayerConfig};
use core_runtime::events::EventBus;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tokio::time::Instant;

// ============================================================================
// Fake Media Engine
// ============================================================================

#[derive(Clone)]
struct Track {
    duration: Duration,
    failure: Option<(String, String)>,
    gate: Option<Arc<Notify>>,
}

#[derive(Default)]
pub struct FakeEngine {
    tracks: Mutex<HashMap<String, Track>>,
    listeners: Mutex<HashMap<String, MediaEventListener>>,
    prepares: AtomicUsize,
    releases: Arc<AtomicUsize>,
    last_volume: Arc<Mutex<Option<f32>>>,
}

impl FakeEngine {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Register a playable source.
    pub fn add_track(&self, source: &str, duration: Duration) {
        self.insert(source, duration, None, None);
    }

    /// Register a source that exists but cannot be decoded.
    pub fn add_broken(&self, source: &str, code: &str) {
        self.insert(
            source,
            Duration::ZERO,
            Some((code.to_string(), format!("cannot decode {}", source))),
            None,
        );
    }

    /// Register a playable source whose preparation waits for the returned gate.
    pub fn add_gated(&self, source: &str, duration: Duration) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.insert(source, duration, None, Some(gate.clone()));
        gate
    }

    /// Register an undecodable source whose failure waits for the returned gate.
    pub fn add_gated_broken(&self, source: &str, code: &str) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.insert(
            source,
            Duration::ZERO,
            Some((code.to_string(), "late failure".to_string())),
            Some(gate.clone()),
        );
        gate
    }

    fn insert(
        &self,
        source: &str,
        duration: Duration,
        failure: Option<(String, String)>,
        gate: Option<Arc<Notify>>,
    ) {
        self.tracks.lock().unwrap().insert(
            source.to_string(),
            Track {
                duration,
                failure,
                gate,
            },
        );
    }

    pub fn prepare_count(&self) -> usize {
        self.prepares.load(Ordering::SeqCst)
    }

    pub fn release_count(&self) -> usize {
        self.releases.load(Ordering::SeqCst)
    }

    pub fn last_volume(&self) -> Option<f32> {
        *self.last_volume.lock().unwrap()
    }

    /// Raise a handle event through the listener registered for `source`.
    pub fn emit(&self, source: &str, event: MediaHandleEvent) {
        let listener = self.listeners.lock().unwrap().get(source).cloned();
        if let Some(listener) = listener {
            listener(event);
        }
    }
}

#[async_trait]
impl MediaEngine for FakeEngine {
    async fn source_exists(&self, source: &str) -> bool {
        self.tracks.lock().unwrap().contains_key(source)
    }

    async fn prepare(
        &self,
        source: &str,
        listener: MediaEventListener,
    ) -> BridgeResult<Box<dyn MediaHandle>> {
        self.prepares.fetch_add(1, Ordering::SeqCst);
        let track = self
            .tracks
            .lock()
            .unwrap()
            .get(source)
            .cloned()
            .ok_or_else(|| BridgeError::NotFound(source.to_string()))?;

        if let Some(gate) = &track.gate {
            gate.notified().await;
        }

        if let Some((code, detail)) = track.failure {
            return Err(BridgeError::media(code, detail));
        }

        self.listeners
            .lock()
            .unwrap()
            .insert(source.to_string(), listener.clone());

        Ok(Box::new(FakeHandle {
            duration: track.duration,
            offset: Duration::ZERO,
            started_at: None,
            listener,
            completion: None,
            releases: self.releases.clone(),
            volume: self.last_volume.clone(),
            released: false,
        }))
    }
}

// ============================================================================
// Fake Media Handle
// ============================================================================

/// Handle whose position advances with the Tokio clock while started.
pub struct FakeHandle {
    duration: Duration,
    offset: Duration,
    started_at: Option<Instant>,
    listener: MediaEventListener,
    completion: Option<JoinHandle<()>>,
    releases: Arc<AtomicUsize>,
    volume: Arc<Mutex<Option<f32>>>,
    released: bool,
}

impl FakeHandle {
    fn cancel_completion(&mut self) {
        if let Some(task) = self.completion.take() {
            task.abort();
        }
    }

    fn arm_completion(&mut self) {
        self.cancel_completion();
        let remaining = self.duration.saturating_sub(self.offset);
        let listener = self.listener.clone();
        self.completion = Some(tokio::spawn(async move {
            tokio::time::sleep(remaining).await;
            listener(MediaHandleEvent::Completed);
        }));
    }

    fn ensure_live(&self) -> BridgeResult<()> {
        if self.released {
            return Err(BridgeError::OperationFailed("handle released".to_string()));
        }
        Ok(())
    }
}

impl MediaHandle for FakeHandle {
    fn start(&mut self) -> BridgeResult<()> {
        self.ensure_live()?;
        if self.started_at.is_none() {
            self.started_at = Some(Instant::now());
            self.arm_completion();
        }
        Ok(())
    }

    fn pause(&mut self) -> BridgeResult<()> {
        self.ensure_live()?;
        self.offset = self.position();
        self.started_at = None;
        self.cancel_completion();
        Ok(())
    }

    fn stop(&mut self) {
        self.offset = Duration::ZERO;
        self.started_at = None;
        self.cancel_completion();
    }

    fn seek_to(&mut self, position: Duration) -> BridgeResult<()> {
        self.ensure_live()?;
        self.offset = position.min(self.duration);
        if self.started_at.is_some() {
            self.started_at = Some(Instant::now());
            self.arm_completion();
        }
        Ok(())
    }

    fn set_volume(&mut self, level: f32) -> BridgeResult<()> {
        self.ensure_live()?;
        *self.volume.lock().unwrap() = Some(level);
        Ok(())
    }

    fn position(&self) -> Duration {
        let elapsed = self
            .started_at
            .map(|started| started.elapsed())
            .unwrap_or_default();
        (self.offset + elapsed).min(self.duration)
    }

    fn duration(&self) -> Option<Duration> {
        Some(self.duration)
    }

    fn is_playing(&self) -> bool {
        self.started_at.is_some() && self.position() < self.duration
    }

    fn release(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        self.cancel_completion();
        self.releases.fetch_add(1, Ordering::SeqCst);
    }
}

// ============================================================================
// Recording Front-end Sink
// ============================================================================

#[derive(Default)]
pub struct RecordingSink {
    events: Mutex<Vec<FrontendEvent>>,
}

impl RecordingSink {
    pub fn events(&self) -> Vec<FrontendEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn names(&self) -> Vec<String> {
        self.events().into_iter().map(|event| event.name).collect()
    }

    pub fn details(&self, name: &str) -> Vec<Value> {
        self.events()
            .into_iter()
            .filter(|event| event.name == name)
            .map(|event| event.detail)
            .collect()
    }

    /// `(currentTime, duration)` pairs from `audio-progress` events.
    pub fn progress(&self) -> Vec<(f64, f64)> {
        self.details("audio-progress")
            .into_iter()
            .map(|detail| {
                (
                    detail["currentTime"].as_f64().unwrap_or(-1.0),
                    detail["duration"].as_f64().unwrap_or(-1.0),
                )
            })
            .collect()
    }

    pub fn clear(&self) {
        self.events.lock().unwrap().clear();
    }
}

impl FrontendSink for RecordingSink {
    fn deliver(&self, event: FrontendEvent) -> BridgeResult<()> {
        self.events.lock().unwrap().push(event);
        Ok(())
    }
}

// ============================================================================
// Harness
// ============================================================================

pub struct Harness {
    pub controller: PlaybackController,
    pub engine: Arc<FakeEngine>,
    pub sink: Arc<RecordingSink>,
    pub bus: EventBus,
}

pub fn harness() -> Harness {
    harness_with(PlayerConfig::default())
}

pub fn harness_with(config: PlayerConfig) -> Harness {
    let engine = FakeEngine::new();
    let sink = Arc::new(RecordingSink::default());
    let bus = EventBus::new(256);
    let bridge = EventBridge::new(sink.clone(), bus.clone());
    let controller = PlaybackController::spawn(engine.clone(), bridge, config)
        .expect("controller should spawn inside a runtime");

    Harness {
        controller,
        engine,
        sink,
        bus,
    }
}

/// Let spawned tasks and the controller drain their queues.
pub async fn settle() {
    for _ in 0..32 {
        tokio::task::yield_now().await;
    }
}

/// Drain queued commands at the current instant, move the paused clock
/// forward, then settle again.
pub async fn advance(duration: Duration) {
    settle().await;
    tokio::time::advance(duration).await;
    settle().await;
}

/// Step the clock in `step` increments until `total` has elapsed.
pub async fn advance_by_steps(total: Duration, step: Duration) {
    let mut elapsed = Duration::ZERO;
    while elapsed < total {
        advance(step).await;
        elapsed += step;
    }
}

pub fn secs(seconds: u64) -> Duration {
    Duration::from_secs(seconds)
}

pub fn millis(ms: u64) -> Duration {
    Duration::from_millis(ms)
}
