//! Shared transport interop for browser bridge domains.
//!
//! This module routes calls to target-specific implementations while preserving a uniform API
//! for higher-level bridge domain modules.

use frame_host::{
    AddToHostResult, EnvironmentSignals, HostContext, HostEntryPoints, HostUserId,
    NotificationConfig, PrimaryActionCallback, PrimaryActionConfig,
};
use futures::future::LocalBoxFuture;

#[cfg(not(target_arch = "wasm32"))]
mod non_wasm;
#[cfg(target_arch = "wasm32")]
mod wasm;

#[cfg(not(target_arch = "wasm32"))]
use non_wasm as imp;
#[cfg(target_arch = "wasm32")]
use wasm as imp;

pub fn environment_signals() -> EnvironmentSignals {
    imp::environment_signals()
}

pub fn sleep_ms(duration_ms: u64) -> LocalBoxFuture<'static, ()> {
    imp::sleep_ms(duration_ms)
}

pub fn spawn_local(task: LocalBoxFuture<'static, ()>) {
    imp::spawn_local(task)
}

pub fn report_ready(global: &str) -> Result<(), String> {
    imp::report_ready(global)
}

pub fn is_host_ready(global: &str) -> bool {
    imp::is_host_ready(global)
}

pub fn host_context(global: &str) -> Option<HostContext> {
    imp::host_context(global)
}

pub fn entry_points(global: &str) -> HostEntryPoints {
    imp::entry_points(global)
}

pub async fn add_to_host(global: &str) -> Result<Option<AddToHostResult>, String> {
    imp::add_to_host(global).await
}

pub async fn open_url(global: &str, url: &str) -> Result<(), String> {
    imp::open_url(global, url).await
}

pub fn close(global: &str) -> Result<(), String> {
    imp::close(global)
}

pub async fn send_notification(global: &str, config: &NotificationConfig) -> Result<(), String> {
    imp::send_notification(global, config).await
}

pub async fn view_profile(global: &str, user: Option<HostUserId>) -> Result<(), String> {
    imp::view_profile(global, user).await
}

pub fn set_primary_action(
    global: &str,
    config: &PrimaryActionConfig,
    on_click: PrimaryActionCallback,
) -> Result<(), String> {
    imp::set_primary_action(global, config, on_click)
}

pub fn clear_primary_action(global: &str) -> Result<(), String> {
    imp::clear_primary_action(global)
}
