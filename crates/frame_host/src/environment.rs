//! Embedded-frame detection from document environment signals.

use serde::{Deserialize, Serialize};

/// Substrings identifying the host client in referrers and user agents.
pub const DEFAULT_HOST_MARKERS: &[&str] = &["farcaster", "warpcast"];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Environment signals read from a browser document.
///
/// Every field is optional; a non-browser build produces the default value, which detects as
/// not embedded.
pub struct EnvironmentSignals {
    /// Whether the document is loaded inside another document's frame.
    pub in_child_frame: Option<bool>,
    /// `document.referrer`.
    pub referrer: Option<String>,
    /// `navigator.userAgent`.
    pub user_agent: Option<String>,
    /// First ancestor origin, when the browser exposes it.
    pub parent_origin: Option<String>,
    /// Viewport width and height in CSS pixels.
    pub viewport: Option<(u32, u32)>,
}

/// Returns whether `signals` describe a document embedded in a host frame.
pub fn is_embedded_with(signals: &EnvironmentSignals) -> bool {
    is_embedded_with_markers(signals, DEFAULT_HOST_MARKERS)
}

/// Like [`is_embedded_with`] with a custom host marker list.
pub fn is_embedded_with_markers(signals: &EnvironmentSignals, markers: &[&str]) -> bool {
    if signals.in_child_frame == Some(true) {
        return true;
    }

    let mentions_host = |value: &Option<String>| {
        value.as_deref().is_some_and(|raw| {
            let raw = raw.to_ascii_lowercase();
            markers
                .iter()
                .any(|marker| raw.contains(&marker.to_ascii_lowercase()))
        })
    };

    mentions_host(&signals.referrer) || mentions_host(&signals.user_agent)
}
