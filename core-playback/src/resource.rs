//! # Media Resource
//!
//! Wraps the single platform [`MediaHandle`] the controller owns.
//!
//! A resource is created in the unprepared state when playback of a new
//! source is requested. [`MediaResource::prepare_async`] produces a detached
//! future that the controller runs off its task; the resulting handle is
//! handed back through [`MediaResource::attach`].
//!
//! Dropping a resource releases its handle.

use crate::error::{PlaybackError, Result};
use crate::state::ProgressSample;
use bridge_traits::{MediaEngine, MediaEventListener, MediaHandle};
use core_async::time::duration_from_secs_f64;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;
use uuid::Uuid;

/// Unique identity of a loaded resource instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceId(Uuid);

impl ResourceId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ResourceId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One loaded audio source and its platform handle.
pub struct MediaResource {
    id: ResourceId,
    generation: u64,
    source: String,
    handle: Option<Box<dyn MediaHandle>>,
    released: bool,
}

impl MediaResource {
    pub fn new(source: impl Into<String>, generation: u64) -> Self {
        Self {
            id: ResourceId::new(),
            generation,
            source: source.into(),
            handle: None,
            released: false,
        }
    }

    pub fn id(&self) -> ResourceId {
        self.id
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// `true` once a prepared handle is attached.
    pub fn is_prepared(&self) -> bool {
        self.handle.is_some()
    }

    /// Build the preparation future for this resource.
    ///
    /// The future owns everything it needs so it can run on another task.
    /// It resolves exactly once: with a handle, or with
    /// [`PlaybackError::SourceNotFound`] / [`PlaybackError::PrepareFailed`].
    pub fn prepare_async(
        &self,
        engine: Arc<dyn MediaEngine>,
        listener: MediaEventListener,
    ) -> impl Future<Output = Result<Box<dyn MediaHandle>>> + Send + 'static {
        let source = self.source.clone();
        async move {
            if !engine.source_exists(&source).await {
                return Err(PlaybackError::SourceNotFound(source));
            }

            engine
                .prepare(&source, listener)
                .await
                .map_err(PlaybackError::from_prepare)
        }
    }

    /// Install the prepared handle and apply the remembered volume.
    pub fn attach(&mut self, mut handle: Box<dyn MediaHandle>, volume: f32) -> Result<()> {
        if self.released {
            handle.release();
            return Err(PlaybackError::InvalidStateTransition {
                operation: "attach",
                state: "released".to_string(),
            });
        }

        let applied = handle.set_volume(volume).map_err(PlaybackError::from_handle);
        self.handle = Some(handle);
        applied
    }

    pub fn start(&mut self) -> Result<()> {
        self.handle_mut("start")?
            .start()
            .map_err(PlaybackError::from_handle)
    }

    pub fn pause(&mut self) -> Result<()> {
        self.handle_mut("pause")?
            .pause()
            .map_err(PlaybackError::from_handle)
    }

    /// Halt output and rewind. The handle stays attached.
    pub fn stop(&mut self) {
        if let Some(handle) = self.handle.as_mut() {
            handle.stop();
        }
    }

    /// Move to `seconds`, clamped to the known duration.
    ///
    /// Rejected before the resource is prepared and for negative or
    /// non-finite positions. Returns the applied position.
    pub fn seek_to(&mut self, seconds: f64) -> Result<Duration> {
        if self.handle.is_none() {
            debug!(seconds, "Seek before media is ready; ignoring");
            return Err(PlaybackError::InvalidStateTransition {
                operation: "seek",
                state: "Preparing".to_string(),
            });
        }

        let requested = duration_from_secs_f64(seconds).ok_or_else(|| {
            PlaybackError::InvalidArgument(format!("seek position {} is not valid", seconds))
        })?;

        let duration = self.duration();
        let handle = self.handle_mut("seek")?;
        let target = match duration {
            Some(duration) => requested.min(duration),
            None => requested,
        };

        handle
            .seek_to(target)
            .map_err(PlaybackError::from_handle)?;
        Ok(target)
    }

    /// Apply a volume level clamped to `0.0..=1.0`. Returns the applied level.
    ///
    /// Without a prepared handle the level is only validated.
    pub fn set_volume(&mut self, level: f32) -> Result<f32> {
        let level = clamp_volume(level)?;
        if let Some(handle) = self.handle.as_mut() {
            handle
                .set_volume(level)
                .map_err(PlaybackError::from_handle)?;
        }
        Ok(level)
    }

    pub fn position(&self) -> Duration {
        self.handle
            .as_ref()
            .map(|handle| handle.position())
            .unwrap_or_default()
    }

    /// Total duration; `None` until prepared or when the engine cannot tell.
    pub fn duration(&self) -> Option<Duration> {
        self.handle.as_ref().and_then(|handle| handle.duration())
    }

    /// `true` while the handle is rendering audio.
    pub fn is_active(&self) -> bool {
        self.handle
            .as_ref()
            .map(|handle| handle.is_playing())
            .unwrap_or(false)
    }

    /// Current position and duration as a front-end sample.
    pub fn progress(&self) -> ProgressSample {
        ProgressSample::new(self.position(), self.duration())
    }

    /// Release the platform handle. Idempotent.
    pub fn release(&mut self) {
        if self.released {
            return;
        }
        self.released = true;

        self.stop();
        if let Some(mut handle) = self.handle.take() {
            handle.release();
            debug!(resource_id = %self.id, "Released media handle");
        }
    }

    fn handle_mut(&mut self, operation: &'static str) -> Result<&mut Box<dyn MediaHandle>> {
        self.handle
            .as_mut()
            .ok_or(PlaybackError::InvalidStateTransition {
                operation,
                state: "Preparing".to_string(),
            })
    }
}

impl Drop for MediaResource {
    fn drop(&mut self) {
        self.release();
    }
}

impl fmt::Debug for MediaResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MediaResource")
            .field("id", &self.id)
            .field("generation", &self.generation)
            .field("source", &self.source)
            .field("prepared", &self.handle.is_some())
            .field("released", &self.released)
            .finish()
    }
}

/// Clamp a volume level to `0.0..=1.0`, rejecting NaN and infinities.
pub fn clamp_volume(level: f32) -> Result<f32> {
    if !level.is_finite() {
        return Err(PlaybackError::InvalidArgument(format!(
            "volume {} is not a finite number",
            level
        )));
    }
    Ok(level.clamp(0.0, 1.0))
}
