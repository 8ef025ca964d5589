//! # Player Configuration
//!
//! Tuning for the playback controller.

use crate::error::{PlaybackError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Shortest accepted progress period.
pub const MIN_PROGRESS_INTERVAL: Duration = Duration::from_millis(10);

/// Playback controller configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerConfig {
    /// Period between progress samples while playing.
    ///
    /// Default: 250 ms.
    #[serde(default = "default_progress_interval")]
    pub progress_interval: Duration,

    /// Fail preparation that has not completed within this duration.
    ///
    /// Default: disabled.
    #[serde(default)]
    pub prepare_timeout: Option<Duration>,

    /// Capacity of the control command mailbox.
    ///
    /// Callers wait when the mailbox is full.
    ///
    /// Default: 64.
    #[serde(default = "default_mailbox_capacity")]
    pub mailbox_capacity: usize,

    /// Volume applied to the first resource, in `0.0..=1.0`.
    ///
    /// Default: 1.0.
    #[serde(default = "default_initial_volume")]
    pub initial_volume: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            progress_interval: default_progress_interval(),
            prepare_timeout: None,
            mailbox_capacity: default_mailbox_capacity(),
            initial_volume: default_initial_volume(),
        }
    }
}

impl PlayerConfig {
    pub fn with_progress_interval(mut self, interval: Duration) -> Self {
        self.progress_interval = interval;
        self
    }

    pub fn with_prepare_timeout(mut self, timeout: Duration) -> Self {
        self.prepare_timeout = Some(timeout);
        self
    }

    pub fn with_initial_volume(mut self, volume: f32) -> Self {
        self.initial_volume = volume;
        self
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<()> {
        if self.progress_interval < MIN_PROGRESS_INTERVAL {
            return Err(PlaybackError::InvalidConfig(format!(
                "progress_interval must be at least {:?}",
                MIN_PROGRESS_INTERVAL
            )));
        }

        if self.prepare_timeout == Some(Duration::ZERO) {
            return Err(PlaybackError::InvalidConfig(
                "prepare_timeout must be > 0 when set".to_string(),
            ));
        }

        if self.mailbox_capacity == 0 {
            return Err(PlaybackError::InvalidConfig(
                "mailbox_capacity must be > 0".to_string(),
            ));
        }

        if !(0.0..=1.0).contains(&self.initial_volume) {
            return Err(PlaybackError::InvalidConfig(
                "initial_volume must be between 0.0 and 1.0".to_string(),
            ));
        }

        Ok(())
    }
}

// ============================================================================
// Default Functions (for serde)
// ============================================================================

fn default_progress_interval() -> Duration {
    Duration::from_millis(250)
}

fn default_mailbox_capacity() -> usize {
    64
}

fn default_initial_volume() -> f32 {
    1.0
}
