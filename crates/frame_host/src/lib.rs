//! Typed host-domain contracts shared by the frame runtime and its browser adapters.
//!
//! This crate is the API-first boundary to the embedding host. It defines the host SDK adapter
//! trait, the host context and action payload models, entry-point availability, embedded-frame
//! detection, and the scheduler contract, while concrete browser bindings live in
//! `frame_host_web`.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

pub mod actions;
pub mod context;
pub mod environment;
pub mod host;
pub mod memory;
pub mod scheduler;
pub mod sdk;
pub mod time;

pub use actions::{
    AddToHostResult, NotificationConfig, PrimaryActionCallback, PrimaryActionConfig,
};
pub use context::{HostContext, HostUser, HostUserId};
pub use environment::{
    is_embedded_with, is_embedded_with_markers, EnvironmentSignals, DEFAULT_HOST_MARKERS,
};
pub use host::{FrameHost, HostEntryPoints, HostStrategy};
pub use memory::{HostCall, MemoryHostSdk};
pub use scheduler::{FrameScheduler, ManualScheduler};
pub use sdk::{HostSdkAdapter, HostSdkFuture, NoopHostSdk};
pub use time::unix_time_ms_now;
