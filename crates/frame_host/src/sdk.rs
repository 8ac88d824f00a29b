//! Host SDK adapter contract and no-op adapter.

use std::{future::Future, pin::Pin};

use crate::{
    AddToHostResult, HostContext, HostEntryPoints, HostUserId, NotificationConfig,
    PrimaryActionCallback, PrimaryActionConfig,
};

/// Object-safe boxed future used by [`HostSdkAdapter`] async methods.
pub type HostSdkFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// Narrow interface over the embedding host's SDK.
///
/// Any host can be substituted by implementing this trait. Readiness and context are plain
/// reads so the runtime can poll them; actions are async because hosts answer them through
/// promises.
pub trait HostSdkAdapter {
    /// Signals that the app finished its own startup.
    fn report_ready(&self) -> Result<(), String>;

    /// Returns whether the host currently reports the frame as ready.
    fn is_host_ready(&self) -> bool;

    /// Returns the latest host context snapshot, if the host shared one.
    fn host_context(&self) -> Option<HostContext>;

    /// Returns which entry points the host SDK exposes in this build.
    fn entry_points(&self) -> HostEntryPoints;

    /// Asks the host to add this app to the user's app list.
    ///
    /// `Ok(None)` means the host completed the request without adding the app.
    fn add_to_host<'a>(&'a self) -> HostSdkFuture<'a, Result<Option<AddToHostResult>, String>>;

    /// Opens `url` through the host.
    fn open_url<'a>(&'a self, url: &'a str) -> HostSdkFuture<'a, Result<(), String>>;

    /// Asks the host to close the frame.
    fn close(&self) -> Result<(), String>;

    /// Delivers a notification through the host.
    fn send_notification<'a>(
        &'a self,
        config: &'a NotificationConfig,
    ) -> HostSdkFuture<'a, Result<(), String>>;

    /// Opens a profile view; `None` targets the session's own identity.
    fn view_profile<'a>(
        &'a self,
        user: Option<HostUserId>,
    ) -> HostSdkFuture<'a, Result<(), String>>;

    /// Installs the host-rendered primary action button, replacing any previous one.
    fn set_primary_action(
        &self,
        config: &PrimaryActionConfig,
        on_click: PrimaryActionCallback,
    ) -> Result<(), String>;

    /// Removes the primary action button.
    fn clear_primary_action(&self) -> Result<(), String>;
}

#[derive(Debug, Clone, Copy, Default)]
/// No-op host adapter for builds without an embedding host.
///
/// It never reports ready and exposes no entry points, so every capability stays off.
pub struct NoopHostSdk;

impl HostSdkAdapter for NoopHostSdk {
    fn report_ready(&self) -> Result<(), String> {
        Ok(())
    }

    fn is_host_ready(&self) -> bool {
        false
    }

    fn host_context(&self) -> Option<HostContext> {
        None
    }

    fn entry_points(&self) -> HostEntryPoints {
        HostEntryPoints::none()
    }

    fn add_to_host<'a>(&'a self) -> HostSdkFuture<'a, Result<Option<AddToHostResult>, String>> {
        Box::pin(async { Ok(None) })
    }

    fn open_url<'a>(&'a self, _url: &'a str) -> HostSdkFuture<'a, Result<(), String>> {
        Box::pin(async { Ok(()) })
    }

    fn close(&self) -> Result<(), String> {
        Ok(())
    }

    fn send_notification<'a>(
        &'a self,
        _config: &'a NotificationConfig,
    ) -> HostSdkFuture<'a, Result<(), String>> {
        Box::pin(async { Ok(()) })
    }

    fn view_profile<'a>(
        &'a self,
        _user: Option<HostUserId>,
    ) -> HostSdkFuture<'a, Result<(), String>> {
        Box::pin(async { Ok(()) })
    }

    fn set_primary_action(
        &self,
        _config: &PrimaryActionConfig,
        _on_click: PrimaryActionCallback,
    ) -> Result<(), String> {
        Ok(())
    }

    fn clear_primary_action(&self) -> Result<(), String> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;

    use super::*;

    #[test]
    fn noop_sdk_is_never_ready_and_exposes_nothing() {
        let sdk = NoopHostSdk;
        let sdk_obj: &dyn HostSdkAdapter = &sdk;

        sdk_obj.report_ready().expect("report");
        assert!(!sdk_obj.is_host_ready());
        assert_eq!(sdk_obj.host_context(), None);
        assert_eq!(sdk_obj.entry_points(), HostEntryPoints::none());
        assert_eq!(block_on(sdk_obj.add_to_host()).expect("add"), None);
        block_on(sdk_obj.open_url("https://example.com")).expect("open");
    }
}
