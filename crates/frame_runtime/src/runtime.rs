//! Frame runtime orchestration.
//!
//! [`FrameRuntime`] drives the [`ConnectionStateMachine`] against a host SDK adapter and a
//! scheduler. It runs the readiness handshake, schedules backoff retries, applies out-of-band host
//! signals, and fans state changes out to observers, event listeners, and snapshot watchers.
//! All state lives behind `RefCell`s that are never borrowed across an await or a callback.

use std::{
    cell::{Cell, RefCell},
    rc::Rc,
};

use frame_host::{
    FrameHost, FrameScheduler, HostContext, HostSdkAdapter, HostStrategy, PrimaryActionConfig,
};
use futures::future::{self, AbortHandle, Either};
use leptos::logging;
use serde_json::{json, Value};

use crate::{
    actions::FrameActions,
    capabilities::{resolve_capabilities, CapabilitySet},
    config::FrameConfig,
    connection::{Attempt, ConnectionState, ConnectionStateMachine, FrameStatus, Transition},
    error::{codes, FrameConfigError, FrameError},
    event_bus::{EventBus, EventSubscription, FrameEvent, FrameEventType},
    snapshot::{FrameSnapshot, SessionState},
};

/// Status-change callback.
pub type StatusObserver = Rc<dyn Fn(FrameStatus)>;
/// Callback for entering `Ready` from a non-ready state.
pub type ReadyObserver = Rc<dyn Fn()>;
/// Error callback.
pub type ErrorObserver = Rc<dyn Fn(&FrameError)>;
/// Snapshot watcher invoked after every observable change.
pub type SnapshotWatcher = Rc<dyn Fn(&FrameSnapshot)>;

#[derive(Clone, Default)]
/// Lifecycle callbacks fixed at construction.
pub struct FrameObservers {
    status_change: Vec<StatusObserver>,
    ready: Vec<ReadyObserver>,
    error: Vec<ErrorObserver>,
}

impl FrameObservers {
    /// Adds a status-change callback.
    pub fn on_status_change(mut self, observer: impl Fn(FrameStatus) + 'static) -> Self {
        self.status_change.push(Rc::new(observer));
        self
    }

    /// Adds a ready callback.
    pub fn on_ready(mut self, observer: impl Fn() + 'static) -> Self {
        self.ready.push(Rc::new(observer));
        self
    }

    /// Adds an error callback.
    pub fn on_error(mut self, observer: impl Fn(&FrameError) + 'static) -> Self {
        self.error.push(Rc::new(observer));
        self
    }
}

struct RuntimeInner {
    config: FrameConfig,
    host: FrameHost,
    machine: RefCell<ConnectionStateMachine>,
    events: EventBus,
    observers: FrameObservers,
    watchers: RefCell<Vec<(u64, SnapshotWatcher)>>,
    next_watcher_id: Cell<u64>,
    session: RefCell<SessionState>,
    pending_retry: RefCell<Option<AbortHandle>>,
    shut_down: Cell<bool>,
}

#[derive(Clone)]
/// Shared handle to the frame runtime. Clones refer to the same runtime.
pub struct FrameRuntime {
    inner: Rc<RuntimeInner>,
}

impl FrameRuntime {
    /// Validates `config` and builds a runtime over `host`.
    ///
    /// # Errors
    ///
    /// Returns the first configuration problem found by [`FrameConfig::validate`].
    pub fn new(config: FrameConfig, host: FrameHost) -> Result<Self, FrameConfigError> {
        Self::with_observers(config, host, FrameObservers::default())
    }

    /// Like [`Self::new`], registering lifecycle `observers`.
    ///
    /// # Errors
    ///
    /// Returns the first configuration problem found by [`FrameConfig::validate`].
    pub fn with_observers(
        config: FrameConfig,
        host: FrameHost,
        observers: FrameObservers,
    ) -> Result<Self, FrameConfigError> {
        config.validate()?;

        let clock = host.scheduler.clone();
        let events = EventBus::new(move || clock.now_ms());
        let machine = ConnectionStateMachine::new(config.retry_policy());
        let session = SessionState {
            host_context: host.sdk.host_context(),
            ..SessionState::default()
        };

        Ok(Self {
            inner: Rc::new(RuntimeInner {
                config,
                host,
                machine: RefCell::new(machine),
                events,
                observers,
                watchers: RefCell::new(Vec::new()),
                next_watcher_id: Cell::new(0),
                session: RefCell::new(session),
                pending_retry: RefCell::new(None),
                shut_down: Cell::new(false),
            }),
        })
    }

    /// Active configuration.
    pub fn config(&self) -> &FrameConfig {
        &self.inner.config
    }

    /// Host strategy the adapters were selected with.
    pub fn strategy(&self) -> HostStrategy {
        self.inner.host.strategy
    }

    /// Event bus the runtime publishes on.
    pub fn events(&self) -> &EventBus {
        &self.inner.events
    }

    /// Action facade bound to this runtime.
    pub fn actions(&self) -> FrameActions {
        FrameActions::new(self.clone())
    }

    /// Current connection state.
    pub fn connection(&self) -> ConnectionState {
        self.inner.machine.borrow().state().clone()
    }

    /// Current status.
    pub fn status(&self) -> FrameStatus {
        self.inner.machine.borrow().state().status
    }

    /// Whether an automatic retry is waiting on its timer.
    pub fn has_pending_retry(&self) -> bool {
        self.inner.pending_retry.borrow().is_some()
    }

    /// Capabilities derived from the current state.
    pub fn capabilities(&self) -> CapabilitySet {
        let status = self.status();
        let context = self.inner.session.borrow().effective_context();
        resolve_capabilities(status, context.as_ref(), self.inner.host.sdk.entry_points())
    }

    /// Point-in-time view for the presentational layer.
    pub fn snapshot(&self) -> FrameSnapshot {
        let connection = self.connection();
        let session = self.inner.session.borrow().clone();
        let capabilities = resolve_capabilities(
            connection.status,
            session.effective_context().as_ref(),
            self.inner.host.sdk.entry_points(),
        );
        FrameSnapshot::assemble(connection, &session, capabilities)
    }

    /// Registers `listener` for `event_type` on the runtime's event bus.
    pub fn subscribe(
        &self,
        event_type: FrameEventType,
        listener: impl Fn(&FrameEvent) + 'static,
    ) -> EventSubscription {
        self.inner.events.subscribe(event_type, listener)
    }

    /// Registers a watcher that receives a fresh snapshot after every observable change.
    ///
    /// Returns an id for [`Self::remove_state_watcher`].
    pub fn add_state_watcher(&self, watcher: impl Fn(&FrameSnapshot) + 'static) -> u64 {
        let id = self.inner.next_watcher_id.get();
        self.inner.next_watcher_id.set(id + 1);
        self.inner
            .watchers
            .borrow_mut()
            .push((id, Rc::new(watcher)));
        id
    }

    /// Removes a watcher registered with [`Self::add_state_watcher`].
    pub fn remove_state_watcher(&self, id: u64) {
        self.inner
            .watchers
            .borrow_mut()
            .retain(|(watcher_id, _)| *watcher_id != id);
    }

    /// Mount hook: spawns [`Self::initialize`] when auto-initialize is on, otherwise goes idle.
    pub fn start(&self) {
        if self.inner.config.auto_initialize {
            self.debug_log("auto-initializing");
            let runtime = self.clone();
            self.inner.host.scheduler.spawn_local(Box::pin(async move {
                runtime.initialize().await;
            }));
            return;
        }

        let transition = self.inner.machine.borrow_mut().idle();
        if let Some(transition) = transition {
            self.after_transition(&transition);
        }
    }

    /// Runs the first readiness handshake. Later calls do nothing; use
    /// [`Self::refresh_frame`] to reconnect.
    ///
    /// Failures are recorded in the connection state and broadcast, never returned.
    pub async fn initialize(&self) {
        let attempt = self.inner.machine.borrow_mut().begin_initial();
        match attempt {
            Some(attempt) => self.run_attempt(attempt).await,
            None => self.debug_log("initialization already attempted"),
        }
    }

    /// Manual reconnect: cancels any pending retry, resets the retry counter, and runs a fresh
    /// handshake.
    pub async fn refresh_frame(&self) {
        self.debug_log("manual refresh requested");
        self.cancel_pending_retry();
        let transition = self.inner.machine.borrow_mut().reset_for_refresh();
        self.after_transition(&transition);

        let attempt = self.inner.machine.borrow_mut().begin_retry();
        self.run_attempt(attempt).await;
    }

    /// Spawns [`Self::refresh_frame`] on the scheduler, for synchronous callers such as UI
    /// click handlers.
    pub fn request_refresh(&self) {
        let runtime = self.clone();
        self.inner.host.scheduler.spawn_local(Box::pin(async move {
            runtime.refresh_frame().await;
        }));
    }

    /// Applies a readiness signal the host raised outside a handshake attempt.
    ///
    /// Forces `Ready` from any other status, cancels the pending retry, and makes the in-flight
    /// attempt stale so its timeout cannot undo the transition.
    pub fn handle_host_ready(&self) {
        let now_ms = self.inner.host.scheduler.now_ms();
        let transition = self.inner.machine.borrow_mut().force_ready(now_ms);
        let Some(transition) = transition else {
            return;
        };

        self.debug_log("host reported ready out of band");
        self.cancel_pending_retry();
        self.after_transition(&transition);
        self.inner
            .events
            .publish(FrameEventType::ConnectionRestored, None);
        self.sync_host_context();
    }

    /// Records that the host dropped a ready connection.
    pub fn handle_host_lost(&self, reason: &str) {
        let transition = self.inner.machine.borrow_mut().mark_disconnected(reason);
        let Some(transition) = transition else {
            return;
        };

        logging::warn!("frame host connection lost: {reason}");
        self.after_transition(&transition);
        self.inner.events.publish(
            FrameEventType::ConnectionLost,
            Some(json!({ "code": codes::CONNECTION_LOST, "reason": reason })),
        );
    }

    /// Re-reads the host context from the adapter.
    pub fn sync_host_context(&self) {
        let context = self.inner.host.sdk.host_context();
        self.handle_context_change(context);
    }

    /// Stores a new host context snapshot.
    ///
    /// A changed context is authoritative for `added` and drops the flag set by a successful
    /// [`FrameActions::add_to_host`]. Publishes `frame_added` when the app becomes added, and
    /// notifies watchers on any change.
    pub fn handle_context_change(&self, context: Option<HostContext>) {
        let newly_added = {
            let mut session = self.inner.session.borrow_mut();
            if session.host_context == context {
                return;
            }
            let was_added = session.added_to_host();
            session.host_context = context.clone();
            session.added_locally = false;
            !was_added && session.added_to_host()
        };

        self.debug_log("host context updated");
        if newly_added {
            self.inner.events.publish(
                FrameEventType::FrameAdded,
                Some(json!({ "context": context })),
            );
        }
        self.notify_watchers();
    }

    /// Publishes `visibility_change` followed by `blur` (hidden) or `focus` (visible).
    pub fn handle_visibility_change(&self, hidden: bool) {
        self.debug_log(format!("visibility changed, hidden={hidden}"));
        self.inner.events.publish(
            FrameEventType::VisibilityChange,
            Some(json!({ "hidden": hidden })),
        );
        let follow_up = if hidden {
            FrameEventType::Blur
        } else {
            FrameEventType::Focus
        };
        self.inner.events.publish(follow_up, None);
    }

    /// Polls the host for readiness and context changes until [`Self::shutdown`].
    ///
    /// Readiness seen here goes through [`Self::handle_host_ready`].
    pub fn spawn_host_monitor(&self) {
        let runtime = self.clone();
        let interval_ms = self.inner.config.ready_poll_interval_ms;
        self.inner.host.scheduler.spawn_local(Box::pin(async move {
            while !runtime.inner.shut_down.get() {
                if runtime.inner.host.sdk.is_host_ready() && !runtime.connection().is_ready {
                    runtime.handle_host_ready();
                }
                runtime.sync_host_context();
                runtime.inner.host.scheduler.sleep(interval_ms).await;
            }
        }));
    }

    /// Unmount hook: cancels the pending retry, invalidates in-flight attempts, and drops every
    /// listener and watcher.
    pub fn shutdown(&self) {
        self.debug_log("shutting down");
        self.inner.shut_down.set(true);
        self.cancel_pending_retry();
        self.inner.machine.borrow_mut().invalidate_attempt();
        self.inner.events.clear();
        self.inner.watchers.borrow_mut().clear();
    }

    pub(crate) fn sdk(&self) -> Rc<dyn HostSdkAdapter> {
        self.inner.host.sdk.clone()
    }

    pub(crate) fn publish(&self, event_type: FrameEventType, data: Option<Value>) {
        self.inner.events.publish(event_type, data);
    }

    pub(crate) fn record_activity(&self) {
        let now_ms = self.inner.host.scheduler.now_ms();
        self.inner.session.borrow_mut().last_activity = Some(now_ms);
        self.notify_watchers();
    }

    pub(crate) fn mark_added(&self) {
        let now_ms = self.inner.host.scheduler.now_ms();
        {
            let mut session = self.inner.session.borrow_mut();
            session.added_locally = true;
            session.last_activity = Some(now_ms);
        }
        self.notify_watchers();
    }

    pub(crate) fn set_primary_action_state(&self, config: Option<PrimaryActionConfig>) {
        self.inner.session.borrow_mut().primary_action = config;
        self.notify_watchers();
    }

    pub(crate) fn debug_log(&self, message: impl AsRef<str>) {
        if self.inner.config.debug {
            logging::log!("[frame] {}", message.as_ref());
        }
    }

    async fn run_attempt(&self, attempt: Attempt) {
        self.debug_log(format!("attempt {} connecting", attempt.id));
        self.after_transition(&attempt.transition);
        self.inner.events.publish(FrameEventType::FrameReady, None);

        let sdk = self.sdk();
        if !sdk.is_host_ready() {
            if let Err(err) = sdk.report_ready() {
                logging::warn!("frame ready report failed: {err}");
                self.fail_attempt(attempt.id, codes::INIT_FAILED, err);
                return;
            }
        }

        if self.wait_for_host_ready().await {
            self.complete_attempt(attempt.id);
        } else {
            logging::warn!(
                "frame readiness not signalled within {}ms",
                self.inner.config.ready_timeout_ms
            );
            self.fail_attempt(
                attempt.id,
                codes::INIT_TIMEOUT,
                "Frame initialization timeout".to_string(),
            );
        }
    }

    async fn wait_for_host_ready(&self) -> bool {
        let scheduler: Rc<dyn FrameScheduler> = self.inner.host.scheduler.clone();
        let sdk = self.sdk();
        let interval_ms = self.inner.config.ready_poll_interval_ms;
        let timeout = scheduler.sleep(self.inner.config.ready_timeout_ms);
        let poll = Box::pin(async move {
            while !sdk.is_host_ready() {
                scheduler.sleep(interval_ms).await;
            }
        });

        matches!(future::select(poll, timeout).await, Either::Left(_))
    }

    fn complete_attempt(&self, attempt_id: u64) {
        let now_ms = self.inner.host.scheduler.now_ms();
        let transition = self
            .inner
            .machine
            .borrow_mut()
            .mark_ready(attempt_id, now_ms);
        let Some(transition) = transition else {
            self.debug_log(format!("ignoring readiness of stale attempt {attempt_id}"));
            return;
        };

        self.debug_log("frame ready");
        self.after_transition(&transition);
        self.inner
            .events
            .publish(FrameEventType::ConnectionRestored, None);
        self.sync_host_context();
    }

    fn fail_attempt(&self, attempt_id: u64, code: &'static str, message: String) {
        let failure = self
            .inner
            .machine
            .borrow_mut()
            .fail(attempt_id, message.clone());
        let Some(failure) = failure else {
            self.debug_log(format!("ignoring failure of stale attempt {attempt_id}"));
            return;
        };

        let max_attempts = self.inner.config.retry_attempts;
        let error = FrameError::retryable(code, message.clone()).with_context(json!({
            "retryCount": failure.transition.current.retry_count,
            "maxAttempts": max_attempts,
            "nextRetryMs": failure.retry_delay_ms,
        }));

        self.after_transition(&failure.transition);
        self.inner.events.publish(
            FrameEventType::Error,
            Some(json!({ "error": message, "code": code })),
        );
        for observer in &self.inner.observers.error {
            observer(&error);
        }

        match failure.retry_delay_ms {
            Some(delay_ms) => self.schedule_retry(delay_ms),
            None => self.debug_log("max retry attempts reached"),
        }
    }

    fn schedule_retry(&self, delay_ms: u64) {
        self.cancel_pending_retry();
        self.debug_log(format!("scheduling retry in {delay_ms}ms"));

        let weak = Rc::downgrade(&self.inner);
        let sleep = self.inner.host.scheduler.sleep(delay_ms);
        let (task, handle) = future::abortable(async move {
            sleep.await;
            let Some(inner) = weak.upgrade() else {
                return;
            };
            let runtime = FrameRuntime { inner };
            runtime.inner.pending_retry.borrow_mut().take();
            let attempt = runtime.inner.machine.borrow_mut().begin_retry();
            runtime.run_attempt(attempt).await;
        });

        self.inner.pending_retry.borrow_mut().replace(handle);
        self.inner.host.scheduler.spawn_local(Box::pin(async move {
            let _ = task.await;
        }));
    }

    fn cancel_pending_retry(&self) {
        let pending = self.inner.pending_retry.borrow_mut().take();
        if let Some(handle) = pending {
            self.debug_log("cancelling pending retry");
            handle.abort();
        }
    }

    fn after_transition(&self, transition: &Transition) {
        if transition.status_changed() {
            self.debug_log(format!(
                "status {} -> {}",
                transition.previous.status.as_str(),
                transition.current.status.as_str()
            ));
            for observer in &self.inner.observers.status_change {
                observer(transition.current.status);
            }
        }
        if transition.became_ready() {
            for observer in &self.inner.observers.ready {
                observer();
            }
        }
        self.notify_watchers();
    }

    fn notify_watchers(&self) {
        let watchers: Vec<SnapshotWatcher> = self
            .inner
            .watchers
            .borrow()
            .iter()
            .map(|(_, watcher)| watcher.clone())
            .collect();
        if watchers.is_empty() {
            return;
        }

        let snapshot = self.snapshot();
        for watcher in watchers {
            watcher(&snapshot);
        }
    }
}

impl std::fmt::Debug for FrameRuntime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameRuntime")
            .field("strategy", &self.inner.host.strategy)
            .field("connection", &self.connection())
            .field("pending_retry", &self.has_pending_retry())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use frame_host::{AddToHostResult, HostCall, HostUser, ManualScheduler, MemoryHostSdk};
    use futures::executor::block_on;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::event_bus::EventHistory;

    struct Harness {
        runtime: FrameRuntime,
        sdk: MemoryHostSdk,
        scheduler: ManualScheduler,
        history: EventHistory,
        statuses: Rc<RefCell<Vec<FrameStatus>>>,
        errors: Rc<RefCell<Vec<FrameError>>>,
        ready_calls: Rc<Cell<u32>>,
    }

    fn harness_with(config: FrameConfig) -> Harness {
        let sdk = MemoryHostSdk::default();
        let scheduler = ManualScheduler::default();
        let host = FrameHost::new(
            Rc::new(sdk.clone()),
            Rc::new(scheduler.clone()),
            HostStrategy::Memory,
        );

        let statuses = Rc::new(RefCell::new(Vec::new()));
        let errors = Rc::new(RefCell::new(Vec::new()));
        let ready_calls = Rc::new(Cell::new(0));
        let observers = {
            let statuses = statuses.clone();
            let errors = errors.clone();
            let ready_calls = ready_calls.clone();
            FrameObservers::default()
                .on_status_change(move |status| statuses.borrow_mut().push(status))
                .on_error(move |error| errors.borrow_mut().push(error.clone()))
                .on_ready(move || ready_calls.set(ready_calls.get() + 1))
        };

        let runtime = FrameRuntime::with_observers(config, host, observers).expect("runtime");
        let history = EventHistory::attach_all(runtime.events());
        Harness {
            runtime,
            sdk,
            scheduler,
            history,
            statuses,
            errors,
            ready_calls,
        }
    }

    fn harness() -> Harness {
        harness_with(FrameConfig::with_api_key("test-key"))
    }

    fn assert_ready_invariant(runtime: &FrameRuntime) {
        let connection = runtime.connection();
        assert_eq!(connection.is_ready, connection.status == FrameStatus::Ready);
    }

    #[test]
    fn rejects_invalid_configuration() {
        let host = FrameHost::new(
            Rc::new(MemoryHostSdk::default()),
            Rc::new(ManualScheduler::default()),
            HostStrategy::Memory,
        );
        let err = FrameRuntime::new(FrameConfig::default(), host).expect_err("must fail");
        assert_eq!(err.field, "apiKey");
    }

    #[test]
    fn ready_host_connects_on_first_poll() {
        let h = harness();
        h.sdk.set_ready_on_report(true);
        h.sdk
            .set_context(Some(HostContext::for_user(HostUser::new(3)).with_added(true)));

        h.runtime.start();
        h.scheduler.run_until_stalled();

        let snapshot = h.runtime.snapshot();
        assert_eq!(snapshot.status, FrameStatus::Ready);
        assert_eq!(snapshot.connection.last_connected, Some(0));
        assert!(snapshot.capabilities.can_notify);
        assert_eq!(snapshot.user_info, Some(HostUser::new(3)));
        assert_eq!(*h.statuses.borrow(), vec![FrameStatus::Connecting, FrameStatus::Ready]);
        assert_eq!(h.ready_calls.get(), 1);
        assert_eq!(
            h.history.event_types(),
            vec![
                FrameEventType::FrameReady,
                FrameEventType::ConnectionRestored,
                FrameEventType::FrameAdded,
            ]
        );
        assert_eq!(h.sdk.calls(), vec![HostCall::ReportReady]);
    }

    #[test]
    fn initialize_runs_once() {
        let h = harness();
        h.sdk.set_ready(true);
        h.runtime.start();
        h.scheduler.run_until_stalled();

        block_on(h.runtime.initialize());
        assert_eq!(h.statuses.borrow().len(), 2);
        assert_eq!(h.history.len(), 2);
    }

    #[test]
    fn already_ready_host_skips_ready_report() {
        let h = harness();
        h.sdk.set_ready(true);
        h.runtime.start();
        h.scheduler.run_until_stalled();

        assert_eq!(h.runtime.status(), FrameStatus::Ready);
        assert!(h.sdk.calls().is_empty());
    }

    #[test]
    fn auto_initialize_off_leaves_runtime_idle() {
        let h = harness_with(FrameConfig {
            auto_initialize: false,
            ..FrameConfig::with_api_key("test-key")
        });

        h.runtime.start();
        h.scheduler.advance(60_000);

        assert_eq!(h.runtime.status(), FrameStatus::Disconnected);
        assert!(h.sdk.calls().is_empty());
        assert!(h.history.is_empty());
    }

    #[test]
    fn timeouts_retry_with_exponential_backoff_until_max() {
        let h = harness();
        h.runtime.start();
        h.scheduler.run_until_stalled();
        assert_eq!(h.runtime.status(), FrameStatus::Connecting);

        h.scheduler.advance(10_000);
        assert_eq!(h.runtime.status(), FrameStatus::Error);
        assert_eq!(h.runtime.connection().retry_count, 1);
        assert_eq!(h.scheduler.next_deadline(), Some(12_000));
        assert_ready_invariant(&h.runtime);

        h.scheduler.advance(2_000);
        assert_eq!(h.runtime.status(), FrameStatus::Connecting);
        assert_eq!(h.runtime.connection().error, None);

        h.scheduler.advance(10_000);
        assert_eq!(h.runtime.connection().retry_count, 2);
        assert_eq!(h.scheduler.next_deadline(), Some(26_000));

        h.scheduler.advance(4_000);
        assert_eq!(h.runtime.status(), FrameStatus::Connecting);
        h.scheduler.advance(10_000);

        let connection = h.runtime.connection();
        assert_eq!(connection.status, FrameStatus::Error);
        assert_eq!(connection.retry_count, 3);
        assert_eq!(
            connection.error.as_deref(),
            Some("Frame initialization timeout")
        );
        assert!(!h.runtime.has_pending_retry());
        assert_eq!(h.scheduler.next_deadline(), None);

        h.scheduler.advance(120_000);
        assert_eq!(h.runtime.connection().retry_count, 3);
        assert_eq!(
            *h.statuses.borrow(),
            vec![
                FrameStatus::Connecting,
                FrameStatus::Error,
                FrameStatus::Connecting,
                FrameStatus::Error,
                FrameStatus::Connecting,
                FrameStatus::Error,
            ]
        );
        assert_eq!(
            h.sdk
                .calls()
                .iter()
                .filter(|call| **call == HostCall::ReportReady)
                .count(),
            3
        );
    }

    #[test]
    fn error_callbacks_carry_retry_context() {
        let h = harness();
        h.runtime.start();
        h.scheduler.advance(10_000);

        let errors = h.errors.borrow();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].code, codes::INIT_TIMEOUT);
        assert_eq!(
            errors[0].context,
            Some(json!({"retryCount": 1, "maxAttempts": 3, "nextRetryMs": 2000}))
        );
        assert_eq!(
            h.history.event_types(),
            vec![FrameEventType::FrameReady, FrameEventType::Error]
        );
    }

    #[test]
    fn rejected_ready_report_fails_immediately() {
        let h = harness();
        h.sdk.fail_report_ready("host refused");
        h.runtime.start();
        h.scheduler.run_until_stalled();

        let connection = h.runtime.connection();
        assert_eq!(connection.status, FrameStatus::Error);
        assert_eq!(connection.error.as_deref(), Some("host refused"));
        assert_eq!(h.errors.borrow()[0].code, codes::INIT_FAILED);
        assert!(h.runtime.has_pending_retry());
        assert_eq!(h.scheduler.next_deadline(), Some(2_000));
    }

    #[test]
    fn refresh_cancels_pending_retry_and_starts_fresh_attempt() {
        let h = harness();
        h.runtime.start();
        h.scheduler.advance(10_000);
        h.scheduler.advance(2_000);
        h.scheduler.advance(10_000);
        assert_eq!(h.runtime.connection().retry_count, 2);
        assert!(h.runtime.has_pending_retry());

        h.runtime.request_refresh();
        h.scheduler.run_until_stalled();

        let connection = h.runtime.connection();
        assert_eq!(connection.status, FrameStatus::Connecting);
        assert_eq!(connection.retry_count, 0);
        assert_eq!(connection.error, None);
        assert!(!h.runtime.has_pending_retry());

        h.sdk.set_ready(true);
        h.scheduler.advance(100);
        assert_eq!(h.runtime.status(), FrameStatus::Ready);

        h.scheduler.advance(30_000);
        assert_eq!(h.runtime.status(), FrameStatus::Ready);
        assert!(h
            .statuses
            .borrow()
            .ends_with(&[FrameStatus::Initializing, FrameStatus::Connecting, FrameStatus::Ready]));
    }

    #[test]
    fn late_readiness_cancels_retry_and_wins() {
        let h = harness();
        h.runtime.start();
        h.scheduler.advance(10_000);
        assert!(h.runtime.has_pending_retry());

        h.runtime.handle_host_ready();

        let connection = h.runtime.connection();
        assert_eq!(connection.status, FrameStatus::Ready);
        assert_eq!(connection.retry_count, 0);
        assert_eq!(connection.last_connected, Some(10_000));
        assert!(!h.runtime.has_pending_retry());

        h.scheduler.advance(60_000);
        assert_eq!(h.runtime.status(), FrameStatus::Ready);
        assert_eq!(h.sdk.calls(), vec![HostCall::ReportReady]);
        assert_eq!(h.ready_calls.get(), 1);
    }

    #[test]
    fn late_readiness_makes_in_flight_timeout_stale() {
        let h = harness();
        h.runtime.start();
        h.scheduler.advance(5_000);

        h.runtime.handle_host_ready();
        h.scheduler.advance(10_000);

        assert_eq!(h.runtime.status(), FrameStatus::Ready);
        assert!(h.errors.borrow().is_empty());
        assert_eq!(
            h.history.event_types(),
            vec![FrameEventType::FrameReady, FrameEventType::ConnectionRestored]
        );
    }

    #[test]
    fn host_monitor_picks_up_readiness() {
        let h = harness_with(FrameConfig {
            auto_initialize: false,
            ..FrameConfig::with_api_key("test-key")
        });
        h.runtime.start();
        h.runtime.spawn_host_monitor();
        h.scheduler.advance(300);
        assert_eq!(h.runtime.status(), FrameStatus::Disconnected);

        h.sdk.set_ready(true);
        h.scheduler.advance(100);
        assert_eq!(h.runtime.status(), FrameStatus::Ready);

        h.runtime.shutdown();
        h.scheduler.advance(100);
        assert_eq!(h.scheduler.pending_timers(), 0);
    }

    #[test]
    fn lost_connection_moves_to_disconnected() {
        let h = harness();
        h.sdk.set_ready(true);
        h.runtime.start();
        h.scheduler.run_until_stalled();

        h.runtime.handle_host_lost("host navigated away");

        let snapshot = h.runtime.snapshot();
        assert_eq!(snapshot.status, FrameStatus::Disconnected);
        assert_eq!(snapshot.capabilities, CapabilitySet::none());
        assert_eq!(
            h.history.event_types().last(),
            Some(&FrameEventType::ConnectionLost)
        );
    }

    #[test]
    fn added_flag_change_flips_notify_and_publishes_once() {
        let h = harness();
        h.sdk.set_ready(true);
        h.sdk
            .set_context(Some(HostContext::for_user(HostUser::new(5))));
        h.runtime.start();
        h.scheduler.run_until_stalled();
        let before = h.runtime.capabilities();
        assert!(!before.can_notify);

        let added = HostContext::for_user(HostUser::new(5)).with_added(true);
        h.runtime.handle_context_change(Some(added.clone()));
        h.runtime.handle_context_change(Some(added));

        let after = h.runtime.capabilities();
        assert_eq!(
            after,
            CapabilitySet {
                can_notify: true,
                ..before
            }
        );
        let added_events = h
            .history
            .event_types()
            .into_iter()
            .filter(|event_type| *event_type == FrameEventType::FrameAdded)
            .count();
        assert_eq!(added_events, 1);
    }

    #[test]
    fn host_context_overrides_locally_confirmed_add() {
        let h = harness();
        h.sdk.set_ready(true);
        h.sdk
            .set_context(Some(HostContext::for_user(HostUser::new(5))));
        h.runtime.start();
        h.scheduler.run_until_stalled();

        h.sdk.set_add_result(Ok(Some(AddToHostResult::default())));
        assert!(block_on(h.runtime.actions().add_to_host()).is_some());
        assert!(h.runtime.capabilities().can_notify);

        h.runtime.handle_context_change(Some(
            HostContext::for_user(HostUser::new(5)).with_added(true),
        ));
        assert!(h.runtime.snapshot().added_to_host);

        h.runtime.handle_context_change(Some(
            HostContext::for_user(HostUser::new(5)).with_added(false),
        ));
        let snapshot = h.runtime.snapshot();
        assert!(!snapshot.added_to_host);
        assert!(!snapshot.capabilities.can_notify);
        assert_eq!(
            snapshot.host_context.map(|context| context.added),
            Some(false)
        );
        let added_events = h
            .history
            .event_types()
            .into_iter()
            .filter(|event_type| *event_type == FrameEventType::FrameAdded)
            .count();
        assert_eq!(added_events, 1);
    }

    #[test]
    fn successful_handshake_releases_its_timeout_timer() {
        let h = harness();
        h.runtime.start();
        h.scheduler.run_until_stalled();
        assert_eq!(h.scheduler.next_deadline(), Some(100));

        h.sdk.set_ready(true);
        h.scheduler.advance(100);
        assert!(h.runtime.connection().is_ready);
        assert_eq!(h.scheduler.pending_timers(), 0);
    }

    #[test]
    fn visibility_change_publishes_follow_up_event() {
        let h = harness();
        h.runtime.handle_visibility_change(true);
        h.runtime.handle_visibility_change(false);

        assert_eq!(
            h.history.event_types(),
            vec![
                FrameEventType::VisibilityChange,
                FrameEventType::Blur,
                FrameEventType::VisibilityChange,
                FrameEventType::Focus,
            ]
        );
        assert_eq!(h.history.events()[0].data, Some(json!({"hidden": true})));
    }

    #[test]
    fn state_watchers_see_every_transition() {
        let h = harness();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        let id = h
            .runtime
            .add_state_watcher(move |snapshot| sink.borrow_mut().push(snapshot.status));

        h.runtime.start();
        h.scheduler.advance(10_000);
        assert_eq!(*seen.borrow(), vec![FrameStatus::Connecting, FrameStatus::Error]);

        h.runtime.remove_state_watcher(id);
        h.scheduler.advance(2_000);
        assert_eq!(seen.borrow().len(), 2);
    }

    #[test]
    fn shutdown_cancels_retry_and_drops_listeners() {
        let h = harness();
        h.runtime.start();
        h.scheduler.advance(10_000);
        assert!(h.runtime.has_pending_retry());

        h.runtime.shutdown();
        assert!(!h.runtime.has_pending_retry());
        assert_eq!(h.runtime.events().listener_count(FrameEventType::Error), 0);

        h.scheduler.advance(60_000);
        assert_eq!(h.runtime.status(), FrameStatus::Error);
        assert_eq!(h.runtime.connection().retry_count, 1);
    }
}
