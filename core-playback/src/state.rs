//! # Playback State Types
//!
//! The controller state machine and the values it reports.
//!
//! ```text
//!            play(x)             prepared
//!   Idle ─────────────> Preparing ───────> Ready ──> Playing <──> Paused
//!    ^                      │                          │
//!    │ stop()               │ error                    │ completed
//!    │ (from any state)     v                          v
//!    └─────────────────  Failed                      Ended
//! ```

use crate::resource::ResourceId;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Controller state.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "state")]
pub enum PlaybackState {
    /// No resource loaded.
    #[default]
    Idle,
    /// Resource loading; not yet controllable.
    Preparing,
    /// Prepared and about to start.
    Ready,
    Playing,
    Paused,
    /// Reached the natural end; the resource is kept for replay.
    Ended,
    /// Loading or playback failed; the resource has been released.
    Failed { reason: String },
}

impl PlaybackState {
    pub fn name(&self) -> &'static str {
        match self {
            PlaybackState::Idle => "Idle",
            PlaybackState::Preparing => "Preparing",
            PlaybackState::Ready => "Ready",
            PlaybackState::Playing => "Playing",
            PlaybackState::Paused => "Paused",
            PlaybackState::Ended => "Ended",
            PlaybackState::Failed { .. } => "Failed",
        }
    }

    pub fn is_playing(&self) -> bool {
        matches!(self, PlaybackState::Playing)
    }
}

impl fmt::Display for PlaybackState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlaybackState::Failed { reason } => write!(f, "Failed ({})", reason),
            other => f.write_str(other.name()),
        }
    }
}

/// Point-in-time position reading, serialized as `{currentTime, duration}`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressSample {
    /// Seconds from the start of the media.
    pub current_time: f64,
    /// Total seconds; `0.0` while unknown.
    pub duration: f64,
}

impl ProgressSample {
    /// Build a sample, clamping the position to a known duration.
    pub fn new(position: Duration, duration: Option<Duration>) -> Self {
        match duration {
            Some(duration) => Self {
                current_time: position.min(duration).as_secs_f64(),
                duration: duration.as_secs_f64(),
            },
            None => Self {
                current_time: position.as_secs_f64(),
                duration: 0.0,
            },
        }
    }
}

/// Full read-only view of the controller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerSnapshot {
    pub state: PlaybackState,
    /// Identifier of the loaded source.
    pub source: Option<String>,
    pub resource_id: Option<ResourceId>,
    pub is_playing: bool,
    pub position: f64,
    pub duration: f64,
    /// Last requested volume.
    pub volume: f32,
}

impl Default for PlayerSnapshot {
    fn default() -> Self {
        Self {
            state: PlaybackState::Idle,
            source: None,
            resource_id: None,
            is_playing: false,
            position: 0.0,
            duration: 0.0,
            volume: 1.0,
        }
    }
}
