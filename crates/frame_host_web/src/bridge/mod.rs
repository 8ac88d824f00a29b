//! Browser capability bridge implementations for `frame_host_web` adapters.
//!
//! This module is organized by host domain (`sdk`, `timers`, `environment`) while preserving a
//! stable crate-internal API for the adapters.

mod environment;
mod interop;
mod sdk;
mod timers;

pub(crate) use environment::environment_signals;
pub(crate) use sdk::{
    add_to_host, clear_primary_action, close, entry_points, host_context, is_host_ready,
    open_url, report_ready, send_notification, set_primary_action, view_profile,
};
pub(crate) use timers::{sleep_ms, spawn_local};
