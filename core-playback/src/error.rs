//! # Playback Error Types
//!
//! Errors raised while loading and controlling the active media resource.
//!
//! Resource-originated failures ([`SourceNotFound`](PlaybackError::SourceNotFound),
//! [`PrepareFailed`](PlaybackError::PrepareFailed),
//! [`PlaybackFailed`](PlaybackError::PlaybackFailed)) never escape the
//! controller as `Err`: they move it to `Failed` and are reported to the
//! front-end as an `audio-error` event.

use bridge_traits::BridgeError;
use thiserror::Error;

/// Errors that can occur during playback operations.
#[derive(Error, Debug)]
pub enum PlaybackError {
    // ========================================================================
    // Resource Errors
    // ========================================================================
    /// The source identifier does not resolve to a readable resource.
    #[error("Source not found: {0}")]
    SourceNotFound(String),

    /// The platform could not prepare the source.
    #[error("Failed to prepare media [{code}]: {detail}")]
    PrepareFailed { code: String, detail: String },

    /// The prepared handle failed during playback.
    #[error("Playback failed [{code}]: {detail}")]
    PlaybackFailed { code: String, detail: String },

    // ========================================================================
    // Control Errors
    // ========================================================================
    /// Operation is not valid in the current state. Logged and ignored.
    #[error("Cannot {operation} while {state}")]
    InvalidStateTransition {
        operation: &'static str,
        state: String,
    },

    /// Argument outside the accepted domain (negative seek, NaN volume).
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    // ========================================================================
    // Plumbing Errors
    // ========================================================================
    /// The controller task has shut down.
    #[error("Playback controller is closed")]
    ControllerClosed,

    /// No async runtime is available to host the controller.
    #[error("Playback controller requires an async runtime")]
    RuntimeUnavailable,

    #[error("Invalid player configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Bridge(#[from] BridgeError),
}

impl PlaybackError {
    /// Map a bridge failure raised while preparing a source.
    pub fn from_prepare(err: BridgeError) -> Self {
        match err {
            BridgeError::NotFound(source) => PlaybackError::SourceNotFound(source),
            BridgeError::Media { code, detail } => PlaybackError::PrepareFailed { code, detail },
            other => PlaybackError::PrepareFailed {
                code: other.code().to_string(),
                detail: other.to_string(),
            },
        }
    }

    /// Map a bridge failure raised by a prepared handle.
    pub fn from_handle(err: BridgeError) -> Self {
        match err {
            BridgeError::Media { code, detail } => PlaybackError::PlaybackFailed { code, detail },
            other => PlaybackError::PlaybackFailed {
                code: other.code().to_string(),
                detail: other.to_string(),
            },
        }
    }

    /// Machine-readable diagnostic code.
    pub fn code(&self) -> &str {
        match self {
            PlaybackError::SourceNotFound(_) => "not_found",
            PlaybackError::PrepareFailed { code, .. } => code,
            PlaybackError::PlaybackFailed { code, .. } => code,
            PlaybackError::InvalidStateTransition { .. } => "invalid_state",
            PlaybackError::InvalidArgument(_) => "invalid_argument",
            PlaybackError::ControllerClosed => "closed",
            PlaybackError::RuntimeUnavailable => "no_runtime",
            PlaybackError::InvalidConfig(_) => "invalid_config",
            PlaybackError::Bridge(err) => err.code(),
        }
    }

    /// `true` for failures that originate from the media resource and move
    /// the controller to `Failed`.
    pub fn is_resource_failure(&self) -> bool {
        matches!(
            self,
            PlaybackError::SourceNotFound(_)
                | PlaybackError::PrepareFailed { .. }
                | PlaybackError::PlaybackFailed { .. }
        )
    }
}

/// Result type for playback operations.
pub type Result<T> = std::result::Result<T, PlaybackError>;
