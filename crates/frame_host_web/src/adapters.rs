use std::rc::Rc;

use frame_host::{
    AddToHostResult, FrameHost, HostContext, HostEntryPoints, HostSdkAdapter, HostSdkFuture,
    HostStrategy, HostUserId, NoopHostSdk, NotificationConfig, PrimaryActionCallback,
    PrimaryActionConfig,
};

use crate::{WebHostSdk, WebScheduler};

/// Returns the compile-time selected host strategy for the active build.
pub const fn selected_host_strategy() -> HostStrategy {
    #[cfg(feature = "host-stub")]
    {
        HostStrategy::Stub
    }

    #[cfg(not(feature = "host-stub"))]
    {
        HostStrategy::Browser
    }
}

/// Returns the selected host strategy as a stable string token.
pub fn host_strategy_name() -> &'static str {
    selected_host_strategy().as_str()
}

/// Adapter enum that erases the concrete host SDK backend behind [`HostSdkAdapter`].
#[derive(Debug, Clone, Copy)]
pub enum HostSdkAdapterKind {
    /// JS host SDK bound through the page window.
    Browser(WebHostSdk),
    /// No-op fallback used when the host is intentionally stubbed.
    Stub(NoopHostSdk),
}

impl HostSdkAdapter for HostSdkAdapterKind {
    fn report_ready(&self) -> Result<(), String> {
        match self {
            Self::Browser(sdk) => sdk.report_ready(),
            Self::Stub(sdk) => sdk.report_ready(),
        }
    }

    fn is_host_ready(&self) -> bool {
        match self {
            Self::Browser(sdk) => sdk.is_host_ready(),
            Self::Stub(sdk) => sdk.is_host_ready(),
        }
    }

    fn host_context(&self) -> Option<HostContext> {
        match self {
            Self::Browser(sdk) => sdk.host_context(),
            Self::Stub(sdk) => sdk.host_context(),
        }
    }

    fn entry_points(&self) -> HostEntryPoints {
        match self {
            Self::Browser(sdk) => sdk.entry_points(),
            Self::Stub(sdk) => sdk.entry_points(),
        }
    }

    fn add_to_host<'a>(&'a self) -> HostSdkFuture<'a, Result<Option<AddToHostResult>, String>> {
        match self {
            Self::Browser(sdk) => sdk.add_to_host(),
            Self::Stub(sdk) => sdk.add_to_host(),
        }
    }

    fn open_url<'a>(&'a self, url: &'a str) -> HostSdkFuture<'a, Result<(), String>> {
        match self {
            Self::Browser(sdk) => sdk.open_url(url),
            Self::Stub(sdk) => sdk.open_url(url),
        }
    }

    fn close(&self) -> Result<(), String> {
        match self {
            Self::Browser(sdk) => sdk.close(),
            Self::Stub(sdk) => sdk.close(),
        }
    }

    fn send_notification<'a>(
        &'a self,
        config: &'a NotificationConfig,
    ) -> HostSdkFuture<'a, Result<(), String>> {
        match self {
            Self::Browser(sdk) => sdk.send_notification(config),
            Self::Stub(sdk) => sdk.send_notification(config),
        }
    }

    fn view_profile<'a>(
        &'a self,
        user: Option<HostUserId>,
    ) -> HostSdkFuture<'a, Result<(), String>> {
        match self {
            Self::Browser(sdk) => sdk.view_profile(user),
            Self::Stub(sdk) => sdk.view_profile(user),
        }
    }

    fn set_primary_action(
        &self,
        config: &PrimaryActionConfig,
        on_click: PrimaryActionCallback,
    ) -> Result<(), String> {
        match self {
            Self::Browser(sdk) => sdk.set_primary_action(config, on_click),
            Self::Stub(sdk) => sdk.set_primary_action(config, on_click),
        }
    }

    fn clear_primary_action(&self) -> Result<(), String> {
        match self {
            Self::Browser(sdk) => sdk.clear_primary_action(),
            Self::Stub(sdk) => sdk.clear_primary_action(),
        }
    }
}

/// Builds the host SDK adapter for the selected strategy.
pub fn host_sdk() -> HostSdkAdapterKind {
    match selected_host_strategy() {
        HostStrategy::Stub => HostSdkAdapterKind::Stub(NoopHostSdk),
        HostStrategy::Browser | HostStrategy::Memory => {
            HostSdkAdapterKind::Browser(WebHostSdk::default())
        }
    }
}

/// Builds the browser scheduler.
pub fn scheduler() -> WebScheduler {
    WebScheduler
}

/// Assembles the host bundle consumed by the frame runtime.
pub fn build_frame_host() -> FrameHost {
    FrameHost::new(
        Rc::new(host_sdk()),
        Rc::new(scheduler()),
        selected_host_strategy(),
    )
}
