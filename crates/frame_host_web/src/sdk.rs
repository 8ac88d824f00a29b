//! Host SDK adapter bound to a JS host SDK installed on the page window.

use frame_host::{
    AddToHostResult, HostContext, HostEntryPoints, HostSdkAdapter, HostSdkFuture, HostUserId,
    NotificationConfig, PrimaryActionCallback, PrimaryActionConfig,
};

use crate::bridge;

/// Window property the host SDK is read from unless configured otherwise.
pub const DEFAULT_HOST_GLOBAL: &str = "__FRAME_HOST__";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Browser host adapter backed by the bridge interop layer.
///
/// The host SDK object is looked up on every call, so an SDK injected after startup is picked
/// up without rebuilding the adapter.
pub struct WebHostSdk {
    global: &'static str,
}

impl Default for WebHostSdk {
    fn default() -> Self {
        Self::new(DEFAULT_HOST_GLOBAL)
    }
}

impl WebHostSdk {
    /// Binds to the host SDK stored at `window[global]`.
    pub const fn new(global: &'static str) -> Self {
        Self { global }
    }

    /// Window property this adapter reads.
    pub const fn global(&self) -> &'static str {
        self.global
    }
}

impl HostSdkAdapter for WebHostSdk {
    fn report_ready(&self) -> Result<(), String> {
        bridge::report_ready(self.global)
    }

    fn is_host_ready(&self) -> bool {
        bridge::is_host_ready(self.global)
    }

    fn host_context(&self) -> Option<HostContext> {
        bridge::host_context(self.global)
    }

    fn entry_points(&self) -> HostEntryPoints {
        bridge::entry_points(self.global)
    }

    fn add_to_host<'a>(&'a self) -> HostSdkFuture<'a, Result<Option<AddToHostResult>, String>> {
        Box::pin(async move { bridge::add_to_host(self.global).await })
    }

    fn open_url<'a>(&'a self, url: &'a str) -> HostSdkFuture<'a, Result<(), String>> {
        Box::pin(async move { bridge::open_url(self.global, url).await })
    }

    fn close(&self) -> Result<(), String> {
        bridge::close(self.global)
    }

    fn send_notification<'a>(
        &'a self,
        config: &'a NotificationConfig,
    ) -> HostSdkFuture<'a, Result<(), String>> {
        Box::pin(async move { bridge::send_notification(self.global, config).await })
    }

    fn view_profile<'a>(
        &'a self,
        user: Option<HostUserId>,
    ) -> HostSdkFuture<'a, Result<(), String>> {
        Box::pin(async move { bridge::view_profile(self.global, user).await })
    }

    fn set_primary_action(
        &self,
        config: &PrimaryActionConfig,
        on_click: PrimaryActionCallback,
    ) -> Result<(), String> {
        bridge::set_primary_action(self.global, config, on_click)
    }

    fn clear_primary_action(&self) -> Result<(), String> {
        bridge::clear_primary_action(self.global)
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use futures::executor::block_on;

    use super::*;

    #[test]
    fn native_builds_report_no_host() {
        let sdk = WebHostSdk::default();
        assert_eq!(sdk.global(), DEFAULT_HOST_GLOBAL);
        assert!(!sdk.is_host_ready());
        assert_eq!(sdk.host_context(), None);
        assert_eq!(sdk.entry_points(), HostEntryPoints::none());
        assert!(sdk.report_ready().is_err());
        assert!(block_on(sdk.open_url("https://example.com")).is_err());
    }
}
