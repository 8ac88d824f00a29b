//! Host entry-point availability and the service bundle injected into the frame runtime.

use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::{FrameScheduler, HostSdkAdapter};

/// Stable host strategy selected for the current build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostStrategy {
    /// JS host SDK bound through the browser window.
    Browser,
    /// Placeholder adapters with no host behind them.
    Stub,
    /// In-memory adapters used by tests and headless tooling.
    Memory,
}

impl HostStrategy {
    /// Returns a stable string token for diagnostics.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Browser => "browser",
            Self::Stub => "stub",
            Self::Memory => "memory",
        }
    }
}

/// Which host SDK entry points exist in the current build of the embedding host.
///
/// This is a static property of the host SDK version, not of the session. The capability
/// resolver combines it with the connection status and host context.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HostEntryPoints {
    /// `addToHost` is callable.
    pub add_to_host: bool,
    /// `openUrl` is callable.
    pub open_url: bool,
    /// `close` is callable.
    pub close: bool,
    /// `sendNotification` is callable.
    pub send_notification: bool,
    /// `viewProfile` is callable.
    pub view_profile: bool,
    /// `setPrimaryAction`/`clearPrimaryAction` are callable.
    pub primary_action: bool,
    /// A wallet provider is exposed.
    pub wallet: bool,
}

impl HostEntryPoints {
    /// Every entry point present.
    pub const fn all() -> Self {
        Self {
            add_to_host: true,
            open_url: true,
            close: true,
            send_notification: true,
            view_profile: true,
            primary_action: true,
            wallet: true,
        }
    }

    /// No entry point present.
    pub const fn none() -> Self {
        Self {
            add_to_host: false,
            open_url: false,
            close: false,
            send_notification: false,
            view_profile: false,
            primary_action: false,
            wallet: false,
        }
    }
}

/// Host adapters selected before they cross into the frame runtime.
#[derive(Clone)]
pub struct FrameHost {
    /// Host SDK adapter.
    pub sdk: Rc<dyn HostSdkAdapter>,
    /// Timer and task scheduler for the current event loop.
    pub scheduler: Rc<dyn FrameScheduler>,
    /// Strategy identifier for diagnostics.
    pub strategy: HostStrategy,
}

impl FrameHost {
    /// Bundles an adapter pair under `strategy`.
    pub fn new(
        sdk: Rc<dyn HostSdkAdapter>,
        scheduler: Rc<dyn FrameScheduler>,
        strategy: HostStrategy,
    ) -> Self {
        Self {
            sdk,
            scheduler,
            strategy,
        }
    }
}

impl std::fmt::Debug for FrameHost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameHost")
            .field("strategy", &self.strategy)
            .field("entry_points", &self.sdk.entry_points())
            .finish()
    }
}
