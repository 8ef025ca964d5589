//! Runtime facade for the audio host core.
//!
//! Every `core-*` and `bridge-*` crate spawns tasks, arms timers and builds
//! channels through this crate instead of naming Tokio directly. That keeps the
//! executor choice in one place and lets tests drive time with Tokio's paused
//! clock.
//!
//! # Modules
//!
//! - `task`: Task spawning and join handles
//! - `time`: Sleep, intervals, timeouts and a pausable `Instant`
//! - `sync`: Channels, locks and cancellation tokens
//! - `runtime`: Runtime handles and `block_on`
//!
//! # Examples
//!
//! ```rust
//! use core_async::task;
//! use core_async::time::{sleep, Duration};
//!
//! async fn example() {
//!     let handle = task::spawn(async {
//!         sleep(Duration::from_millis(10)).await;
//!         42
//!     });
//!     assert_eq!(handle.await.unwrap(), 42);
//! }
//! ```

pub mod runtime;
pub mod sync;
pub mod task;
pub mod time;

pub use task::spawn;
pub use time::{sleep, Duration, Instant};
