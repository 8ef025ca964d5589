//! Runtime utilities that abstract over the underlying async executor.
//!
//! Downstream crates use these wrappers so they never depend on Tokio's
//! runtime module directly.

pub use tokio::runtime::{Builder, Handle, Runtime};

/// Runs the provided future to completion on a throwaway current-thread runtime.
///
/// Intended for host shells that call into the core from synchronous code.
/// Must not be called from inside an async context.
pub fn block_on<F>(future: F) -> F::Output
where
    F: std::future::Future,
{
    Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("core_async::runtime::block_on: failed to build Tokio runtime")
        .block_on(future)
}

/// Returns `true` when called from within a runtime context.
pub fn in_runtime() -> bool {
    Handle::try_current().is_ok()
}
