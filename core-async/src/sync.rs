//! Synchronization primitives.
//!
//! All primitives are async-aware and `Send + Sync`.
//!
//! # Examples
//!
//! ```rust
//! use core_async::sync::{mpsc, CancellationToken};
//!
//! async fn example() {
//!     let (tx, mut rx) = mpsc::channel::<u32>(8);
//!     let token = CancellationToken::new();
//!     tx.send(1).await.unwrap();
//!     token.cancel();
//!     assert_eq!(rx.recv().await, Some(1));
//!     assert!(token.is_cancelled());
//! }
//! ```

pub use tokio::sync::{
    broadcast, mpsc, oneshot, watch, Mutex, MutexGuard, Notify, RwLock, RwLockReadGuard,
    RwLockWriteGuard,
};

pub use tokio_util::sync::{CancellationToken, DropGuard, WaitForCancellationFuture};
