//! Connection lifecycle state and its pure transition functions.
//!
//! [`ConnectionStateMachine`] owns the only [`ConnectionState`] instance. Every transition is a
//! method that returns the previous and current state, so the orchestrating runtime can decide
//! which callbacks and events follow without re-reading shared state. Handshake attempts carry an
//! id; results reported for a superseded attempt are rejected.

use serde::{Deserialize, Serialize};

use crate::retry::RetryPolicy;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
/// Connection lifecycle status.
pub enum FrameStatus {
    /// Initial state, and the state a manual refresh restarts from.
    Initializing,
    /// Waiting for the host readiness signal.
    Connecting,
    /// The host acknowledged the app.
    Ready,
    /// The last attempt failed.
    Error,
    /// Idle: auto-initialize is off or the host dropped the connection.
    Disconnected,
}

impl FrameStatus {
    /// Stable lowercase token.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Initializing => "initializing",
            Self::Connecting => "connecting",
            Self::Ready => "ready",
            Self::Error => "error",
            Self::Disconnected => "disconnected",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Observable connection state.
pub struct ConnectionState {
    /// Lifecycle status.
    pub status: FrameStatus,
    /// Mirrors `status == Ready`.
    pub is_ready: bool,
    /// Message of the last failure, cleared when a new attempt starts or readiness arrives.
    pub error: Option<String>,
    /// Failed attempts in the current automatic cycle.
    pub retry_count: u32,
    /// Unix milliseconds of the last transition into `Ready`.
    pub last_connected: Option<u64>,
}

impl Default for ConnectionState {
    fn default() -> Self {
        Self {
            status: FrameStatus::Initializing,
            is_ready: false,
            error: None,
            retry_count: 0,
            last_connected: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// State before and after one transition.
pub struct Transition {
    /// State before the transition.
    pub previous: ConnectionState,
    /// State after the transition.
    pub current: ConnectionState,
}

impl Transition {
    /// Whether the status value changed.
    pub fn status_changed(&self) -> bool {
        self.previous.status != self.current.status
    }

    /// Whether the runtime entered `Ready` from a non-ready state.
    pub fn became_ready(&self) -> bool {
        !self.previous.is_ready && self.current.is_ready
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// A started handshake attempt.
pub struct Attempt {
    /// Id the attempt's outcome must be reported with.
    pub id: u64,
    /// Transition into `Connecting`.
    pub transition: Transition,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Outcome of a failed attempt.
pub struct Failure {
    /// Transition into `Error`.
    pub transition: Transition,
    /// Delay before the next automatic retry, when one is allowed.
    pub retry_delay_ms: Option<u64>,
}

#[derive(Debug, Clone)]
/// Pure connection state machine.
pub struct ConnectionStateMachine {
    state: ConnectionState,
    policy: RetryPolicy,
    attempt_id: u64,
    attempted: bool,
}

impl ConnectionStateMachine {
    /// Creates a machine in `Initializing`.
    pub fn new(policy: RetryPolicy) -> Self {
        Self {
            state: ConnectionState::default(),
            policy,
            attempt_id: 0,
            attempted: false,
        }
    }

    /// Current state.
    pub fn state(&self) -> &ConnectionState {
        &self.state
    }

    /// Retry policy in effect.
    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    /// Whether an initial attempt was already started.
    pub fn has_attempted(&self) -> bool {
        self.attempted
    }

    /// Whether `attempt_id` is the live attempt.
    pub fn is_current(&self, attempt_id: u64) -> bool {
        self.attempt_id == attempt_id
    }

    /// Starts the first attempt. Returns `None` once any attempt has been made.
    pub fn begin_initial(&mut self) -> Option<Attempt> {
        if self.attempted {
            return None;
        }
        Some(self.begin())
    }

    /// Starts an attempt regardless of earlier ones. Used by retries and manual refresh.
    pub fn begin_retry(&mut self) -> Attempt {
        self.begin()
    }

    fn begin(&mut self) -> Attempt {
        self.attempted = true;
        self.attempt_id += 1;
        let transition = self.apply(|state| {
            state.error = None;
            set_status(state, FrameStatus::Connecting);
        });
        Attempt {
            id: self.attempt_id,
            transition,
        }
    }

    /// Completes `attempt_id` successfully. Stale attempts yield `None`.
    pub fn mark_ready(&mut self, attempt_id: u64, now_ms: u64) -> Option<Transition> {
        if !self.is_current(attempt_id) {
            return None;
        }
        Some(self.enter_ready(now_ms))
    }

    /// Fails `attempt_id`, bumps the retry counter and computes the next backoff delay.
    ///
    /// The counter stops at the policy maximum; once there, no retry delay is returned.
    /// Stale attempts yield `None`.
    pub fn fail(&mut self, attempt_id: u64, message: impl Into<String>) -> Option<Failure> {
        if !self.is_current(attempt_id) {
            return None;
        }
        let policy = self.policy;
        let message = message.into();
        let transition = self.apply(|state| {
            if policy.allows_retry(state.retry_count) {
                state.retry_count += 1;
            }
            state.error = Some(message);
            set_status(state, FrameStatus::Error);
        });
        let retry_count = transition.current.retry_count;
        let retry_delay_ms = policy
            .allows_retry(retry_count)
            .then(|| policy.delay_for_attempt(retry_count));
        Some(Failure {
            transition,
            retry_delay_ms,
        })
    }

    /// Resets for a manual refresh: invalidates the live attempt, clears the error and the
    /// retry counter, and returns to `Initializing`.
    pub fn reset_for_refresh(&mut self) -> Transition {
        self.invalidate_attempt();
        self.apply(|state| {
            state.error = None;
            state.retry_count = 0;
            set_status(state, FrameStatus::Initializing);
        })
    }

    /// Applies an out-of-band readiness signal. Returns `None` when already ready.
    ///
    /// Any in-flight attempt is invalidated so its late timeout cannot overwrite `Ready`.
    pub fn force_ready(&mut self, now_ms: u64) -> Option<Transition> {
        if self.state.is_ready {
            return None;
        }
        self.attempted = true;
        self.invalidate_attempt();
        Some(self.enter_ready(now_ms))
    }

    /// Moves to `Disconnected` when auto-initialize is off. No-op after an attempt started.
    pub fn idle(&mut self) -> Option<Transition> {
        if self.attempted || self.state.status == FrameStatus::Disconnected {
            return None;
        }
        Some(self.apply(|state| set_status(state, FrameStatus::Disconnected)))
    }

    /// Records that the host dropped a ready connection.
    pub fn mark_disconnected(&mut self, reason: impl Into<String>) -> Option<Transition> {
        if !self.state.is_ready {
            return None;
        }
        self.invalidate_attempt();
        let reason = reason.into();
        Some(self.apply(|state| {
            state.error = Some(reason);
            set_status(state, FrameStatus::Disconnected);
        }))
    }

    /// Makes every outstanding attempt stale.
    pub fn invalidate_attempt(&mut self) {
        self.attempt_id += 1;
    }

    fn enter_ready(&mut self, now_ms: u64) -> Transition {
        self.apply(|state| {
            state.error = None;
            state.retry_count = 0;
            state.last_connected = Some(now_ms);
            set_status(state, FrameStatus::Ready);
        })
    }

    fn apply(&mut self, update: impl FnOnce(&mut ConnectionState)) -> Transition {
        let previous = self.state.clone();
        update(&mut self.state);
        Transition {
            previous,
            current: self.state.clone(),
        }
    }
}

fn set_status(state: &mut ConnectionState, status: FrameStatus) {
    state.status = status;
    state.is_ready = status == FrameStatus::Ready;
}
