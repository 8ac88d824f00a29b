//! In-memory host SDK adapter that records calls and replays scripted host behavior.

use std::{cell::RefCell, rc::Rc};

use crate::{
    AddToHostResult, HostContext, HostEntryPoints, HostSdkAdapter, HostSdkFuture, HostUserId,
    NotificationConfig, PrimaryActionCallback, PrimaryActionConfig,
};

#[derive(Debug, Clone, PartialEq, Eq)]
/// One call observed by [`MemoryHostSdk`].
pub enum HostCall {
    /// `report_ready`
    ReportReady,
    /// `add_to_host`
    AddToHost,
    /// `open_url`
    OpenUrl(String),
    /// `close`
    Close,
    /// `send_notification`
    SendNotification(NotificationConfig),
    /// `view_profile`
    ViewProfile(Option<HostUserId>),
    /// `set_primary_action`
    SetPrimaryAction(PrimaryActionConfig),
    /// `clear_primary_action`
    ClearPrimaryAction,
}

struct MemoryHostState {
    ready: bool,
    ready_on_report: bool,
    report_error: Option<String>,
    context: Option<HostContext>,
    entry_points: HostEntryPoints,
    add_result: Result<Option<AddToHostResult>, String>,
    notification_error: Option<String>,
    primary_action: Option<(PrimaryActionConfig, PrimaryActionCallback)>,
    calls: Vec<HostCall>,
}

impl Default for MemoryHostState {
    fn default() -> Self {
        Self {
            ready: false,
            ready_on_report: false,
            report_error: None,
            context: None,
            entry_points: HostEntryPoints::all(),
            add_result: Ok(Some(AddToHostResult::default())),
            notification_error: None,
            primary_action: None,
            calls: Vec::new(),
        }
    }
}

#[derive(Clone, Default)]
/// Scriptable host adapter backed by shared in-memory state.
///
/// Clones share state, so a test can keep one handle while the runtime owns another. All entry
/// points are present by default and the host starts not ready.
pub struct MemoryHostSdk {
    inner: Rc<RefCell<MemoryHostState>>,
}

impl MemoryHostSdk {
    /// Sets the readiness flag the host reports.
    pub fn set_ready(&self, ready: bool) {
        self.inner.borrow_mut().ready = ready;
    }

    /// Makes the host become ready as soon as the app reports ready.
    pub fn set_ready_on_report(&self, ready_on_report: bool) {
        self.inner.borrow_mut().ready_on_report = ready_on_report;
    }

    /// Makes `report_ready` fail with `message`.
    pub fn fail_report_ready(&self, message: impl Into<String>) {
        self.inner.borrow_mut().report_error = Some(message.into());
    }

    /// Replaces the host context snapshot.
    pub fn set_context(&self, context: Option<HostContext>) {
        self.inner.borrow_mut().context = context;
    }

    /// Replaces the exposed entry points.
    pub fn set_entry_points(&self, entry_points: HostEntryPoints) {
        self.inner.borrow_mut().entry_points = entry_points;
    }

    /// Scripts the outcome of the next `add_to_host` calls.
    pub fn set_add_result(&self, result: Result<Option<AddToHostResult>, String>) {
        self.inner.borrow_mut().add_result = result;
    }

    /// Makes notification delivery fail with `message`.
    pub fn fail_notifications(&self, message: impl Into<String>) {
        self.inner.borrow_mut().notification_error = Some(message.into());
    }

    /// Returns every call observed so far, oldest first.
    pub fn calls(&self) -> Vec<HostCall> {
        self.inner.borrow().calls.clone()
    }

    /// Returns the installed primary action configuration, if any.
    pub fn primary_action(&self) -> Option<PrimaryActionConfig> {
        self.inner
            .borrow()
            .primary_action
            .as_ref()
            .map(|(config, _)| config.clone())
    }

    /// Simulates the user pressing the primary action button.
    ///
    /// Returns `false` when no button is installed.
    pub fn press_primary_action(&self) -> bool {
        let callback = self
            .inner
            .borrow()
            .primary_action
            .as_ref()
            .map(|(_, callback)| callback.clone());
        match callback {
            Some(callback) => {
                callback();
                true
            }
            None => false,
        }
    }

    fn record(&self, call: HostCall) {
        self.inner.borrow_mut().calls.push(call);
    }
}

impl HostSdkAdapter for MemoryHostSdk {
    fn report_ready(&self) -> Result<(), String> {
        self.record(HostCall::ReportReady);
        let mut state = self.inner.borrow_mut();
        if let Some(err) = state.report_error.clone() {
            return Err(err);
        }
        if state.ready_on_report {
            state.ready = true;
        }
        Ok(())
    }

    fn is_host_ready(&self) -> bool {
        self.inner.borrow().ready
    }

    fn host_context(&self) -> Option<HostContext> {
        self.inner.borrow().context.clone()
    }

    fn entry_points(&self) -> HostEntryPoints {
        self.inner.borrow().entry_points
    }

    fn add_to_host<'a>(&'a self) -> HostSdkFuture<'a, Result<Option<AddToHostResult>, String>> {
        Box::pin(async move {
            self.record(HostCall::AddToHost);
            self.inner.borrow().add_result.clone()
        })
    }

    fn open_url<'a>(&'a self, url: &'a str) -> HostSdkFuture<'a, Result<(), String>> {
        Box::pin(async move {
            self.record(HostCall::OpenUrl(url.to_string()));
            Ok(())
        })
    }

    fn close(&self) -> Result<(), String> {
        self.record(HostCall::Close);
        Ok(())
    }

    fn send_notification<'a>(
        &'a self,
        config: &'a NotificationConfig,
    ) -> HostSdkFuture<'a, Result<(), String>> {
        Box::pin(async move {
            self.record(HostCall::SendNotification(config.clone()));
            match self.inner.borrow().notification_error.clone() {
                Some(err) => Err(err),
                None => Ok(()),
            }
        })
    }

    fn view_profile<'a>(
        &'a self,
        user: Option<HostUserId>,
    ) -> HostSdkFuture<'a, Result<(), String>> {
        Box::pin(async move {
            self.record(HostCall::ViewProfile(user));
            Ok(())
        })
    }

    fn set_primary_action(
        &self,
        config: &PrimaryActionConfig,
        on_click: PrimaryActionCallback,
    ) -> Result<(), String> {
        self.record(HostCall::SetPrimaryAction(config.clone()));
        self.inner.borrow_mut().primary_action = Some((config.clone(), on_click));
        Ok(())
    }

    fn clear_primary_action(&self) -> Result<(), String> {
        self.record(HostCall::ClearPrimaryAction);
        self.inner.borrow_mut().primary_action = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use futures::executor::block_on;

    use super::*;

    #[test]
    fn ready_on_report_flips_readiness() {
        let sdk = MemoryHostSdk::default();
        sdk.set_ready_on_report(true);
        assert!(!sdk.is_host_ready());

        sdk.report_ready().expect("report");
        assert!(sdk.is_host_ready());
        assert_eq!(sdk.calls(), vec![HostCall::ReportReady]);
    }

    #[test]
    fn scripted_failures_surface_as_errors() {
        let sdk = MemoryHostSdk::default();
        sdk.fail_report_ready("host rejected ready");
        sdk.fail_notifications("delivery refused");

        assert_eq!(sdk.report_ready(), Err("host rejected ready".to_string()));
        let err = block_on(sdk.send_notification(&NotificationConfig::new("t", "b")))
            .expect_err("notification should fail");
        assert_eq!(err, "delivery refused");
    }

    #[test]
    fn primary_action_press_invokes_latest_callback() {
        let sdk = MemoryHostSdk::default();
        let presses = Rc::new(Cell::new(0));

        assert!(!sdk.press_primary_action());

        let first = presses.clone();
        sdk.set_primary_action(
            &PrimaryActionConfig::new("first"),
            Rc::new(move || first.set(first.get() + 1)),
        )
        .expect("set first");
        let second = presses.clone();
        sdk.set_primary_action(
            &PrimaryActionConfig::new("second"),
            Rc::new(move || second.set(second.get() + 10)),
        )
        .expect("set second");

        assert!(sdk.press_primary_action());
        assert_eq!(presses.get(), 10);
        assert_eq!(sdk.primary_action(), Some(PrimaryActionConfig::new("second")));

        sdk.clear_primary_action().expect("clear");
        assert_eq!(sdk.primary_action(), None);
    }
}
