//! Browser (`wasm32`) implementations of [`frame_host`] contracts.
//!
//! This crate binds the frame runtime to a JS host SDK installed on the page window, schedules
//! timers through `setTimeout`, and reads embedded-frame signals from the document.
//!
//! Bridge bindings are split by domain under `bridge/`:
//! - `bridge::sdk`
//! - `bridge::timers`
//! - `bridge::environment`
//! - `bridge::interop` (shared wasm/non-wasm transport glue)

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

/// Compile-time host-strategy selection and adapter factories for runtime wiring.
pub mod adapters;
mod bridge;
pub mod environment;
pub mod scheduler;
pub mod sdk;

pub use adapters::{
    build_frame_host, host_sdk, host_strategy_name, scheduler, selected_host_strategy,
    HostSdkAdapterKind,
};
pub use environment::{current_environment_signals, is_embedded};
pub use scheduler::WebScheduler;
pub use sdk::{WebHostSdk, DEFAULT_HOST_GLOBAL};
