//! Platform media engine contracts.
//!
//! The core never decodes or renders audio itself. A host supplies a
//! [`MediaEngine`] that turns an opaque source identifier (file path or URI)
//! into a prepared [`MediaHandle`]. The core owns at most one handle at a time
//! and drives it from a single task.
//!
//! Handles report asynchronous conditions (natural end of media, runtime
//! failures) through the [`MediaEventListener`] passed to
//! [`MediaEngine::prepare`]. Listeners may be invoked from any thread and must
//! return quickly.

use crate::{
    error::Result,
    platform::{PlatformSend, PlatformSendSync},
};
use std::sync::Arc;
use std::time::Duration;

/// Asynchronous notifications raised by a prepared handle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaHandleEvent {
    /// Playback reached the natural end of the media.
    Completed,
    /// Playback failed after preparation (I/O interruption, device loss, ...).
    Error {
        /// Engine-specific diagnostic code.
        code: String,
        /// Human-readable detail.
        detail: String,
    },
}

/// Callback through which a handle reports [`MediaHandleEvent`]s.
pub type MediaEventListener = Arc<dyn Fn(MediaHandleEvent) + Send + Sync>;

/// Factory for platform media handles.
#[async_trait::async_trait]
pub trait MediaEngine: PlatformSendSync {
    /// Returns `true` if `source` resolves to a readable resource.
    ///
    /// Called before preparation starts so that a missing file is reported as
    /// such rather than as a decode failure.
    async fn source_exists(&self, source: &str) -> bool;

    /// Prepare a handle for `source`.
    ///
    /// Implementations may probe containers, open devices or pre-buffer. The
    /// returned handle is paused at position zero.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::Media`](crate::error::BridgeError::Media) with a
    /// diagnostic code when the source cannot be decoded, or
    /// [`BridgeError::NotFound`](crate::error::BridgeError::NotFound) when it
    /// disappeared between the existence check and preparation.
    async fn prepare(
        &self,
        source: &str,
        listener: MediaEventListener,
    ) -> Result<Box<dyn MediaHandle>>;
}

/// A prepared, controllable playback handle.
///
/// All methods are called from the owning controller task. Implementations
/// must tolerate `release` being called more than once.
pub trait MediaHandle: PlatformSend {
    /// Begin or continue playback from the current position.
    fn start(&mut self) -> Result<()>;

    /// Pause playback, keeping the current position.
    fn pause(&mut self) -> Result<()>;

    /// Halt playback and rewind to the start.
    fn stop(&mut self);

    /// Move to an absolute position. Callers clamp to the known duration.
    fn seek_to(&mut self, position: Duration) -> Result<()>;

    /// Apply a normalized volume in `0.0..=1.0`.
    fn set_volume(&mut self, level: f32) -> Result<()>;

    /// Current playback position.
    fn position(&self) -> Duration;

    /// Total duration, when the engine knows it.
    fn duration(&self) -> Option<Duration>;

    /// `true` while audio is actively being rendered.
    fn is_playing(&self) -> bool;

    /// Release native resources. Idempotent.
    fn release(&mut self);
}
