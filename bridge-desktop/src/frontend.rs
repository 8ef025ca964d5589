//! Desktop Front-end Sinks
//!
//! Two ways for a desktop shell to receive front-end events:
//! - [`ScriptFrontendSink`] hands the ready-made dispatch script to a web view
//!   (e.g. an `evaluate_script` call)
//! - [`ChannelFrontendSink`] forwards structured events over a channel for
//!   shells that marshal events themselves

use bridge_traits::{
    error::{BridgeError, Result},
    frontend::{FrontendEvent, FrontendSink, HostChrome},
};
use core_async::sync::mpsc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, trace};

type ScriptEvaluator = Arc<dyn Fn(String) -> Result<()> + Send + Sync>;

/// Sink that evaluates `window.dispatchEvent(...)` scripts in a web view.
#[derive(Clone)]
pub struct ScriptFrontendSink {
    evaluate: ScriptEvaluator,
}

impl ScriptFrontendSink {
    pub fn new<F>(evaluate: F) -> Self
    where
        F: Fn(String) -> Result<()> + Send + Sync + 'static,
    {
        Self {
            evaluate: Arc::new(evaluate),
        }
    }
}

impl std::fmt::Debug for ScriptFrontendSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScriptFrontendSink").finish_non_exhaustive()
    }
}

impl FrontendSink for ScriptFrontendSink {
    fn deliver(&self, event: FrontendEvent) -> Result<()> {
        trace!(event = %event.name, "Dispatching front-end script");
        (self.evaluate)(event.to_dispatch_script())
    }
}

/// Sink that forwards events over an unbounded channel.
#[derive(Debug, Clone)]
pub struct ChannelFrontendSink {
    tx: mpsc::UnboundedSender<FrontendEvent>,
}

impl ChannelFrontendSink {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<FrontendEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl FrontendSink for ChannelFrontendSink {
    fn deliver(&self, event: FrontendEvent) -> Result<()> {
        self.tx.send(event).map_err(|_| BridgeError::Disconnected)
    }
}

/// Window chrome stand-in that records the requested theme.
#[derive(Debug, Default)]
pub struct DesktopHostChrome {
    dark: AtomicBool,
}

impl DesktopHostChrome {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_dark(&self) -> bool {
        self.dark.load(Ordering::SeqCst)
    }
}

impl HostChrome for DesktopHostChrome {
    fn apply_theme(&self, dark: bool) {
        debug!(dark, "Applying window theme");
        self.dark.store(dark, Ordering::SeqCst);
    }
}
