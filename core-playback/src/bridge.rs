//! # Event Bridge
//!
//! Delivers playback and permission notifications to the front-end and
//! mirrors each one onto the in-process [`EventBus`].
//!
//! | Event               | Detail                                  |
//! |---------------------|-----------------------------------------|
//! | `permission-result` | `{ "granted": bool }`                   |
//! | `audio-progress`    | `{ "currentTime": f64, "duration": f64 }` |
//! | `audio-ended`       | `{}`                                    |
//! | `audio-error`       | `{ "message": string }`                 |
//!
//! Delivery is fire-and-forget. A sink failure (web view gone) is logged at
//! debug level and dropped.

use crate::error::PlaybackError;
use crate::state::ProgressSample;
use bridge_traits::{FrontendEvent, FrontendSink};
use core_runtime::events::{CoreEvent, EventBus, PermissionEvent, PlaybackEvent};
use serde_json::json;
use std::sync::Arc;
use tracing::debug;

pub const PERMISSION_RESULT: &str = "permission-result";
pub const AUDIO_PROGRESS: &str = "audio-progress";
pub const AUDIO_ENDED: &str = "audio-ended";
pub const AUDIO_ERROR: &str = "audio-error";

#[derive(Clone)]
pub struct EventBridge {
    sink: Arc<dyn FrontendSink>,
    bus: EventBus,
}

impl EventBridge {
    pub fn new(sink: Arc<dyn FrontendSink>, bus: EventBus) -> Self {
        Self { sink, bus }
    }

    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    pub fn emit_progress(&self, source: &str, sample: ProgressSample) {
        self.deliver(FrontendEvent::new(
            AUDIO_PROGRESS,
            json!({ "currentTime": sample.current_time, "duration": sample.duration }),
        ));
        self.publish(CoreEvent::Playback(PlaybackEvent::Progress {
            source: source.to_string(),
            position_ms: secs_to_millis(sample.current_time),
            duration_ms: secs_to_millis(sample.duration),
        }));
    }

    pub fn emit_ended(&self, source: &str) {
        self.deliver(FrontendEvent::new(AUDIO_ENDED, json!({})));
        self.publish(CoreEvent::Playback(PlaybackEvent::Completed {
            source: source.to_string(),
        }));
    }

    pub fn emit_error(&self, source: Option<&str>, error: &PlaybackError) {
        let message = error.to_string();
        self.deliver(FrontendEvent::new(AUDIO_ERROR, json!({ "message": message })));
        self.publish(CoreEvent::Playback(PlaybackEvent::Error {
            source: source.map(str::to_string),
            code: error.code().to_string(),
            message,
        }));
    }

    pub fn emit_permission_result(&self, granted: bool) {
        self.deliver(FrontendEvent::new(
            PERMISSION_RESULT,
            json!({ "granted": granted }),
        ));
        self.publish(CoreEvent::Permission(PermissionEvent::Result { granted }));
    }

    /// Publish to native observers only.
    pub fn publish(&self, event: CoreEvent) {
        // No subscribers is not an error.
        let _ = self.bus.emit(event);
    }

    fn deliver(&self, event: FrontendEvent) {
        let name = event.name.clone();
        if let Err(err) = self.sink.deliver(event) {
            debug!(event = %name, error = %err, "Front-end delivery dropped");
        }
    }
}

impl std::fmt::Debug for EventBridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBridge")
            .field("sink", &"FrontendSink { ... }")
            .field("bus", &self.bus)
            .finish()
    }
}

fn secs_to_millis(seconds: f64) -> u64 {
    (seconds * 1000.0).round() as u64
}
