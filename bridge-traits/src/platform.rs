//! Marker traits that keep bridge trait bounds in one place.
//!
//! Bridge implementations are shared between the controller task, timer tasks
//! and host threads, so every bridge object must be `Send + Sync`. Media
//! handles are owned by a single task and only need `Send`.

/// Marker trait for bridge objects shared across tasks.
pub trait PlatformSendSync: Send + Sync {}

impl<T> PlatformSendSync for T where T: Send + Sync {}

/// Marker trait for bridge objects moved between tasks but never shared.
pub trait PlatformSend: Send {}

impl<T> PlatformSend for T where T: Send {}
