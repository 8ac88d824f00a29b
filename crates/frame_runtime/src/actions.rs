//! Capability-gated host actions.

use std::rc::Rc;

use frame_host::{AddToHostResult, HostUserId, NotificationConfig, PrimaryActionConfig};
use leptos::logging;
use serde_json::json;

use crate::{error::FrameActionError, event_bus::FrameEventType, runtime::FrameRuntime};

#[derive(Clone, Debug)]
/// Host actions bound to a [`FrameRuntime`].
///
/// Each action checks the current capability set first. Denied or failed actions return a
/// sentinel (`None`/`false`) and never change state, except [`send_notification`](Self::send_notification),
/// which reports why delivery was refused.
pub struct FrameActions {
    runtime: FrameRuntime,
}

impl FrameActions {
    /// Binds the facade to `runtime`.
    pub fn new(runtime: FrameRuntime) -> Self {
        Self { runtime }
    }

    /// Asks the host to add the app. Returns the host's notification credentials on success.
    pub async fn add_to_host(&self) -> Option<AddToHostResult> {
        if !self.runtime.capabilities().can_add_to_host {
            self.runtime.debug_log("add to host unavailable");
            return None;
        }

        match self.runtime.sdk().add_to_host().await {
            Ok(Some(result)) => {
                self.runtime.mark_added();
                self.runtime
                    .publish(FrameEventType::FrameAdded, Some(json!({ "result": result })));
                Some(result)
            }
            Ok(None) => {
                self.runtime.debug_log("host did not add the app");
                None
            }
            Err(err) => {
                logging::warn!("add to host failed: {err}");
                None
            }
        }
    }

    /// Opens an absolute `url` through the host. Malformed URLs are rejected before any host call.
    pub async fn open_url(&self, url: &str) -> bool {
        if let Err(err) = url::Url::parse(url) {
            logging::warn!("refusing to open invalid url `{url}`: {err}");
            return false;
        }
        if !self.runtime.capabilities().can_open_url {
            self.runtime.debug_log("open url unavailable");
            return false;
        }

        match self.runtime.sdk().open_url(url).await {
            Ok(()) => {
                self.runtime.record_activity();
                true
            }
            Err(err) => {
                logging::warn!("open url failed for `{url}`: {err}");
                false
            }
        }
    }

    /// Publishes `frame_removed` and asks the host to close the frame.
    pub fn close_frame(&self) {
        self.runtime.record_activity();
        self.runtime.publish(FrameEventType::FrameRemoved, None);
        if let Err(err) = self.runtime.sdk().close() {
            logging::warn!("close frame failed: {err}");
        }
    }

    /// Delivers a notification through the host.
    ///
    /// # Errors
    ///
    /// Returns [`FrameActionError::NotificationsUnavailable`] unless the app is ready and added,
    /// and [`FrameActionError::Host`] when the host rejects delivery.
    pub async fn send_notification(
        &self,
        config: NotificationConfig,
    ) -> Result<(), FrameActionError> {
        if !self.runtime.capabilities().can_notify {
            return Err(FrameActionError::NotificationsUnavailable);
        }

        self.runtime
            .sdk()
            .send_notification(&config)
            .await
            .map_err(|err| {
                logging::warn!("notification dispatch failed: {err}");
                FrameActionError::Host(err)
            })?;
        self.runtime.record_activity();
        Ok(())
    }

    /// Shows a profile; `None` targets the signed-in user.
    pub async fn view_profile(&self, user: Option<HostUserId>) -> bool {
        let snapshot = self.runtime.snapshot();
        if !snapshot.capabilities.can_view_profile {
            self.runtime.debug_log("view profile unavailable");
            return false;
        }

        let target = user.or_else(|| snapshot.user_info.map(|info| info.id));
        match self.runtime.sdk().view_profile(target).await {
            Ok(()) => {
                self.runtime.record_activity();
                true
            }
            Err(err) => {
                logging::warn!("view profile failed: {err}");
                false
            }
        }
    }

    /// Installs the host primary action button. A later call replaces the earlier one.
    pub fn set_primary_action(
        &self,
        config: PrimaryActionConfig,
        on_click: impl Fn() + 'static,
    ) -> bool {
        if !self.runtime.capabilities().supports_primary_action {
            self.runtime.debug_log("primary action unavailable");
            return false;
        }

        match self
            .runtime
            .sdk()
            .set_primary_action(&config, Rc::new(on_click))
        {
            Ok(()) => {
                self.runtime.set_primary_action_state(Some(config));
                true
            }
            Err(err) => {
                logging::warn!("set primary action failed: {err}");
                false
            }
        }
    }

    /// Removes the primary action button.
    pub fn clear_primary_action(&self) -> bool {
        if !self.runtime.capabilities().supports_primary_action {
            return false;
        }

        match self.runtime.sdk().clear_primary_action() {
            Ok(()) => {
                self.runtime.set_primary_action_state(None);
                true
            }
            Err(err) => {
                logging::warn!("clear primary action failed: {err}");
                false
            }
        }
    }

    /// Manual reconnect; see [`FrameRuntime::refresh_frame`].
    pub async fn refresh_frame(&self) {
        self.runtime.refresh_frame().await;
    }
}
