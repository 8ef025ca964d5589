//! Time-related abstractions.
//!
//! `Instant` is Tokio's instant rather than `std`'s so that code measuring
//! elapsed playback time follows the paused test clock
//! (`#[tokio::test(start_paused = true)]`).
//!
//! # Examples
//!
//! ```rust
//! use core_async::time::{sleep, Duration, Instant};
//!
//! async fn example() {
//!     let start = Instant::now();
//!     sleep(Duration::from_millis(5)).await;
//!     assert!(start.elapsed() >= Duration::from_millis(5));
//! }
//! ```

pub use tokio::time::{
    interval, interval_at, sleep, sleep_until, timeout, Instant, Interval, MissedTickBehavior,
    Sleep, Timeout,
};

pub use tokio::time::error::Elapsed;

pub use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Returns the current wall-clock time as milliseconds since UNIX_EPOCH.
pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Converts a floating point number of seconds into a `Duration`.
///
/// Negative and non-finite inputs map to `None`.
pub fn duration_from_secs_f64(seconds: f64) -> Option<Duration> {
    if seconds.is_finite() && seconds >= 0.0 {
        Duration::try_from_secs_f64(seconds).ok()
    } else {
        None
    }
}
