//! Front-end delivery contracts.
//!
//! The core notifies the web front-end by evaluating a small script in the
//! host's web view that dispatches a DOM `CustomEvent` on `window`. The script
//! text is produced here so that every host builds it identically; the host only
//! needs to run it on its UI surface.
//!
//! ## Event names
//!
//! Event names are a public contract with the front-end and are defined by the
//! playback crate. This module is name-agnostic.
//!
//! ## Escaping
//!
//! The JSON detail is embedded as a JavaScript literal. JSON is almost a subset
//! of JavaScript; the remaining hazards are the line separators U+2028/U+2029
//! and sequences such as `</script>` when the host injects through an HTML
//! context. [`escape_for_script`] rewrites those as unicode escapes.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{error::Result, platform::PlatformSendSync};

/// A named notification with a JSON-compatible detail payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrontendEvent {
    /// DOM event name, e.g. `audio-progress`.
    pub name: String,
    /// Event detail, exposed as `event.detail` on the page.
    pub detail: Value,
}

impl FrontendEvent {
    pub fn new(name: impl Into<String>, detail: Value) -> Self {
        Self {
            name: name.into(),
            detail,
        }
    }

    /// Compact JSON text of the detail payload.
    pub fn detail_json(&self) -> String {
        self.detail.to_string()
    }

    /// Build the script that dispatches this event on `window`.
    ///
    /// ```
    /// use bridge_traits::frontend::FrontendEvent;
    /// use serde_json::json;
    ///
    /// let event = FrontendEvent::new("audio-ended", json!({}));
    /// assert_eq!(
    ///     event.to_dispatch_script(),
    ///     "window.dispatchEvent(new CustomEvent(\"audio-ended\", { detail: {} }));"
    /// );
    /// ```
    pub fn to_dispatch_script(&self) -> String {
        let name = Value::String(self.name.clone()).to_string();
        format!(
            "window.dispatchEvent(new CustomEvent({}, {{ detail: {} }}));",
            escape_for_script(&name),
            escape_for_script(&self.detail_json())
        )
    }
}

/// Escape characters in JSON text that are unsafe inside an inline script.
pub fn escape_for_script(json: &str) -> String {
    let mut out = String::with_capacity(json.len());
    for ch in json.chars() {
        match ch {
            '<' => out.push_str("\\u003c"),
            '>' => out.push_str("\\u003e"),
            '&' => out.push_str("\\u0026"),
            '\u{2028}' => out.push_str("\\u2028"),
            '\u{2029}' => out.push_str("\\u2029"),
            other => out.push(other),
        }
    }
    out
}

/// Host surface that receives front-end events.
///
/// Implementations marshal delivery onto the UI thread if required. Delivery is
/// best-effort; an error means the surface is gone or not yet attached.
pub trait FrontendSink: PlatformSendSync {
    fn deliver(&self, event: FrontendEvent) -> Result<()>;
}

/// Native window chrome controlled by the front-end.
pub trait HostChrome: PlatformSendSync {
    /// Switch status bar / title bar appearance between dark and light.
    fn apply_theme(&self, dark: bool);
}
