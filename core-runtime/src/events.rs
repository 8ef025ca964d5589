//! # Event Bus System
//!
//! In-process event distribution for native-side observers, built on
//! `tokio::sync::broadcast`.
//!
//! ## Overview
//!
//! Everything the core sends to the front-end is also published here as a
//! typed [`CoreEvent`], so native code (tests, host shells, diagnostics) can
//! observe playback without going through the web view.
//!
//! - **Event Types**: Strongly-typed enums per domain
//! - **EventBus**: Central broadcast channel for publishing events
//! - **EventStream**: Wrapper for consuming events with filtering
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────┐  emit   ┌───────────┐  subscribe  ┌────────────┐
//! │ Playback control ├────────>│           ├────────────>│ Subscriber │
//! └──────────────────┘         │ EventBus  │             └────────────┘
//!                              │ (broadcast│
//! ┌──────────────────┐  emit   │  channel) │  subscribe  ┌────────────┐
//! │ Permission relay ├────────>│           ├────────────>│ Subscriber │
//! └──────────────────┘         └───────────┘             └────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use core_runtime::events::{CoreEvent, EventBus, PlaybackEvent};
//!
//! # #[tokio::main]
//! # async fn main() {
//! let bus = EventBus::new(100);
//! let mut rx = bus.subscribe();
//!
//! bus.emit(CoreEvent::Playback(PlaybackEvent::Completed {
//!     source: "/music/a.mp3".to_string(),
//! }))
//! .ok();
//!
//! let event = rx.recv().await.unwrap();
//! assert_eq!(event.description(), "Playback completed");
//! # }
//! ```
//!
//! ## Error Handling
//!
//! - **`RecvError::Lagged(n)`**: Subscriber was too slow and missed `n` events.
//!   Non-fatal; the subscriber continues with newer events.
//! - **`RecvError::Closed`**: All senders have been dropped (shutdown).
//!
//! Emitting with no subscribers returns an error which publishers ignore.

use core_async::sync::broadcast;
use serde::{Deserialize, Serialize};
use std::fmt;

// Re-export commonly used types
pub use core_async::sync::broadcast::error::{RecvError, SendError};
pub use core_async::sync::broadcast::Receiver;

pub const DEFAULT_EVENT_BUFFER_SIZE: usize = 100;

// ============================================================================
// Core Event Types
// ============================================================================

/// Top-level event published on the bus.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "payload")]
pub enum CoreEvent {
    Playback(PlaybackEvent),
    Permission(PermissionEvent),
    Ui(UiEvent),
}

impl CoreEvent {
    /// Human-readable description
    pub fn description(&self) -> &str {
        match self {
            CoreEvent::Playback(e) => e.description(),
            CoreEvent::Permission(e) => e.description(),
            CoreEvent::Ui(e) => e.description(),
        }
    }

    /// Severity used by diagnostics subscribers.
    pub fn severity(&self) -> EventSeverity {
        match self {
            CoreEvent::Playback(PlaybackEvent::Error { .. }) => EventSeverity::Error,
            CoreEvent::Permission(PermissionEvent::Result { granted: false }) => {
                EventSeverity::Warning
            }
            CoreEvent::Playback(PlaybackEvent::Started { .. })
            | CoreEvent::Playback(PlaybackEvent::Completed { .. })
            | CoreEvent::Permission(PermissionEvent::Result { granted: true }) => {
                EventSeverity::Info
            }
            _ => EventSeverity::Debug,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EventSeverity {
    Debug,
    Info,
    Warning,
    Error,
}

// ============================================================================
// Playback Events
// ============================================================================

/// Playback lifecycle events. Positions are in milliseconds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "event")]
pub enum PlaybackEvent {
    Preparing {
        source: String,
    },
    Started {
        source: String,
        duration_ms: u64,
    },
    Paused {
        source: String,
        position_ms: u64,
    },
    Resumed {
        source: String,
        position_ms: u64,
    },
    Stopped {
        source: Option<String>,
    },
    Progress {
        source: String,
        position_ms: u64,
        duration_ms: u64,
    },
    Completed {
        source: String,
    },
    Error {
        source: Option<String>,
        code: String,
        message: String,
    },
}

impl PlaybackEvent {
    fn description(&self) -> &str {
        match self {
            PlaybackEvent::Preparing { .. } => "Preparing media",
            PlaybackEvent::Started { .. } => "Playback started",
            PlaybackEvent::Paused { .. } => "Playback paused",
            PlaybackEvent::Resumed { .. } => "Playback resumed",
            PlaybackEvent::Stopped { .. } => "Playback stopped",
            PlaybackEvent::Progress { .. } => "Playback progress",
            PlaybackEvent::Completed { .. } => "Playback completed",
            PlaybackEvent::Error { .. } => "Playback error",
        }
    }
}

// ============================================================================
// Permission Events
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "event")]
pub enum PermissionEvent {
    Result { granted: bool },
    SettingsOpened,
}

impl PermissionEvent {
    fn description(&self) -> &str {
        match self {
            PermissionEvent::Result { granted: true } => "Permission granted",
            PermissionEvent::Result { granted: false } => "Permission denied",
            PermissionEvent::SettingsOpened => "System settings opened",
        }
    }
}

// ============================================================================
// UI Events
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "event")]
pub enum UiEvent {
    ThemeChanged { dark: bool },
}

impl UiEvent {
    fn description(&self) -> &str {
        match self {
            UiEvent::ThemeChanged { .. } => "Theme changed",
        }
    }
}

// ============================================================================
// Event Bus
// ============================================================================

/// Central event bus. Cheap to clone; all clones share one channel.
#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<CoreEvent>,
}

impl EventBus {
    /// Create a bus retaining up to `capacity` events per lagging subscriber.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event. Returns the number of subscribers reached.
    pub fn emit(&self, event: CoreEvent) -> Result<usize, SendError<CoreEvent>> {
        self.sender.send(event)
    }

    pub fn subscribe(&self) -> Receiver<CoreEvent> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_BUFFER_SIZE)
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("subscriber_count", &self.subscriber_count())
            .finish()
    }
}

// ============================================================================
// Event Stream Wrapper
// ============================================================================

type EventFilter = Box<dyn Fn(&CoreEvent) -> bool + Send + Sync>;

/// Receiver wrapper with optional filtering.
pub struct EventStream {
    receiver: Receiver<CoreEvent>,
    filter: Option<EventFilter>,
}

impl EventStream {
    pub fn new(receiver: Receiver<CoreEvent>) -> Self {
        Self {
            receiver,
            filter: None,
        }
    }

    /// Only yield events matching `predicate`.
    pub fn filter<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&CoreEvent) -> bool + Send + Sync + 'static,
    {
        self.filter = Some(Box::new(predicate));
        self
    }

    fn matches(&self, event: &CoreEvent) -> bool {
        self.filter.as_ref().map_or(true, |filter| filter(event))
    }

    /// Receive the next matching event.
    pub async fn recv(&mut self) -> Result<CoreEvent, RecvError> {
        loop {
            let event = self.receiver.recv().await?;
            if self.matches(&event) {
                return Ok(event);
            }
        }
    }

    /// Non-blocking receive. `None` when no matching event is queued.
    pub fn try_recv(&mut self) -> Option<Result<CoreEvent, RecvError>> {
        loop {
            match self.receiver.try_recv() {
                Ok(event) => {
                    if self.matches(&event) {
                        return Some(Ok(event));
                    }
                }
                Err(broadcast::error::TryRecvError::Empty) => return None,
                Err(broadcast::error::TryRecvError::Lagged(n)) => {
                    return Some(Err(RecvError::Lagged(n)))
                }
                Err(broadcast::error::TryRecvError::Closed) => return Some(Err(RecvError::Closed)),
            }
        }
    }
}

impl fmt::Debug for EventStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventStream")
            .field("has_filter", &self.filter.is_some())
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn progress(position_ms: u64) -> CoreEvent {
        CoreEvent::Playback(PlaybackEvent::Progress {
            source: "/music/a.mp3".to_string(),
            position_ms,
            duration_ms: 10_000,
        })
    }

    #[tokio::test]
    async fn test_event_bus_subscription() {
        let bus = EventBus::new(10);
        assert_eq!(bus.subscriber_count(), 0);
        let _sub1 = bus.subscribe();
        let _sub2 = bus.subscribe();
        assert_eq!(bus.subscriber_count(), 2);
    }

    #[tokio::test]
    async fn test_event_emission_no_subscribers() {
        let bus = EventBus::new(10);
        assert!(bus.emit(progress(0)).is_err());
    }

    #[tokio::test]
    async fn test_multiple_subscribers_receive_same_event() {
        let bus = EventBus::new(10);
        let mut sub1 = bus.subscribe();
        let mut sub2 = bus.subscribe();

        let event = CoreEvent::Permission(PermissionEvent::Result { granted: true });
        assert_eq!(bus.emit(event.clone()).unwrap(), 2);

        assert_eq!(sub1.recv().await.unwrap(), event);
        assert_eq!(sub2.recv().await.unwrap(), event);
    }

    #[tokio::test]
    async fn test_event_stream_with_filter() {
        let bus = EventBus::new(10);
        let mut stream = EventStream::new(bus.subscribe())
            .filter(|event| matches!(event, CoreEvent::Permission(_)));

        bus.emit(progress(250)).ok();
        let permission = CoreEvent::Permission(PermissionEvent::Result { granted: false });
        bus.emit(permission.clone()).ok();

        assert_eq!(stream.recv().await.unwrap(), permission);
    }

    #[tokio::test]
    async fn test_lagged_subscriber() {
        let bus = EventBus::new(2);
        let mut sub = bus.subscribe();

        for i in 0..5 {
            bus.emit(progress(i * 250)).ok();
        }

        let result = sub.recv().await;
        assert!(matches!(result, Err(RecvError::Lagged(_))));
    }

    #[test]
    fn test_event_severity() {
        let error = CoreEvent::Playback(PlaybackEvent::Error {
            source: Some("/music/missing.mp3".to_string()),
            code: "not_found".to_string(),
            message: "Source not found".to_string(),
        });
        assert_eq!(error.severity(), EventSeverity::Error);

        let denied = CoreEvent::Permission(PermissionEvent::Result { granted: false });
        assert_eq!(denied.severity(), EventSeverity::Warning);

        let started = CoreEvent::Playback(PlaybackEvent::Started {
            source: "/music/a.mp3".to_string(),
            duration_ms: 10_000,
        });
        assert_eq!(started.severity(), EventSeverity::Info);

        assert_eq!(progress(0).severity(), EventSeverity::Debug);
    }

    #[test]
    fn test_event_description() {
        let event = CoreEvent::Ui(UiEvent::ThemeChanged { dark: true });
        assert_eq!(event.description(), "Theme changed");
        assert_eq!(progress(0).description(), "Playback progress");
    }

    #[test]
    fn test_event_serialization_shape() {
        let event = CoreEvent::Playback(PlaybackEvent::Stopped { source: None });
        let json = serde_json::to_value(&event).unwrap();

        assert_eq!(json["type"], "Playback");
        assert_eq!(json["payload"]["event"], "Stopped");

        let back: CoreEvent = serde_json::from_value(json).unwrap();
        assert_eq!(back, event);
    }

    #[tokio::test]
    async fn test_try_recv_empty_and_closed() {
        let bus = EventBus::new(10);
        let mut stream = EventStream::new(bus.subscribe());
        assert!(stream.try_recv().is_none());

        drop(bus);
        assert!(matches!(stream.try_recv(), Some(Err(RecvError::Closed))));
    }
}
