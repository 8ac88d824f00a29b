//! Error types raised by the frame runtime.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Stable error codes carried by [`FrameError`].
pub mod codes {
    /// The readiness signal did not arrive before the timeout.
    pub const INIT_TIMEOUT: &str = "frame_init_timeout";
    /// The host rejected the ready report.
    pub const INIT_FAILED: &str = "frame_init_failed";
    /// The host reported the connection as lost.
    pub const CONNECTION_LOST: &str = "frame_connection_lost";
}

/// Startup configuration problem detected while building the runtime.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid frame configuration `{field}`: {message}")]
pub struct FrameConfigError {
    /// Configuration field at fault.
    pub field: &'static str,
    /// Human-readable message.
    pub message: String,
    /// Whether the app can keep running with degraded behavior.
    pub recoverable: bool,
}

impl FrameConfigError {
    /// Error the app can run past.
    pub fn recoverable(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
            recoverable: true,
        }
    }

    /// Error that must stop startup.
    pub fn fatal(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
            recoverable: false,
        }
    }
}

/// Structured connection error delivered to error callbacks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Error)]
#[serde(rename_all = "camelCase")]
#[error("{code}: {message}")]
pub struct FrameError {
    /// Stable machine-readable code from [`codes`].
    pub code: String,
    /// Human-readable message.
    pub message: String,
    /// Whether the runtime can return to `ready` without a reload.
    pub recoverable: bool,
    /// Whether another attempt may succeed.
    pub retryable: bool,
    /// Extra diagnostic fields.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<Value>,
}

impl FrameError {
    /// Builds a recoverable, retryable error.
    pub fn retryable(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            recoverable: true,
            retryable: true,
            context: None,
        }
    }

    /// Attaches diagnostic context.
    pub fn with_context(mut self, context: Value) -> Self {
        self.context = Some(context);
        self
    }
}

/// Failure of an action that callers must tell apart from "nothing happened".
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FrameActionError {
    /// The app is not connected or not added to the host, so it cannot notify.
    #[error("notifications are not available; the app must be ready and added to the host")]
    NotificationsUnavailable,
    /// The host SDK rejected the call.
    #[error("host call failed: {0}")]
    Host(String),
}
