//! Embedded-host frame runtime.
//!
//! This crate owns the connection lifecycle between a web app and the social-feed host that embeds
//! it: readiness handshake with timeout and exponential backoff, capability resolution, a typed
//! lifecycle event bus, and a capability-gated action facade. Host access goes through
//! [`frame_host`] contracts so the whole lifecycle runs deterministically under test adapters.
//!
//! - [`config`]: startup configuration and validation
//! - [`connection`]: the pure connection state machine
//! - [`runtime`]: orchestration over host adapters and the scheduler
//! - [`actions`]: host actions gated by capabilities
//! - [`context`]: leptos context wiring
//! - [`boot`]: browser entry point

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

pub mod actions;
pub mod boot;
pub mod capabilities;
pub mod config;
pub mod connection;
pub mod context;
pub mod error;
pub mod event_bus;
pub mod retry;
pub mod runtime;
pub mod snapshot;

pub use actions::FrameActions;
pub use boot::boot_frame_runtime;
pub use capabilities::{resolve_capabilities, CapabilitySet};
pub use config::{environment_warnings, FrameConfig};
pub use connection::{ConnectionState, ConnectionStateMachine, FrameStatus};
pub use context::{
    frame_snapshot_signal, provide_frame_runtime, use_frame_runtime, FrameRuntimeContext,
};
pub use error::{FrameActionError, FrameConfigError, FrameError};
pub use event_bus::{
    EventBus, EventHistory, EventSubscription, FrameEvent, FrameEventType, MAX_HISTORY_EVENTS,
};
pub use retry::RetryPolicy;
pub use runtime::{FrameObservers, FrameRuntime};
pub use snapshot::{ConnectionStatus, FrameSnapshot};
