//! Embedded-frame detection for the current browser document.

use frame_host::{is_embedded_with, EnvironmentSignals};

use crate::bridge;

/// Reads the embedded-frame signals of the current document.
///
/// Returns default (empty) signals outside a browser.
pub fn current_environment_signals() -> EnvironmentSignals {
    bridge::environment_signals()
}

/// Returns whether the current document runs embedded inside a host frame.
///
/// Evaluated on every call; `false` outside a browser.
pub fn is_embedded() -> bool {
    is_embedded_with(&current_environment_signals())
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;

    #[test]
    fn native_builds_are_never_embedded() {
        assert_eq!(current_environment_signals(), EnvironmentSignals::default());
        assert!(!is_embedded());
    }
}
