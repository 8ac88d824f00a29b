use frame_host::{
    AddToHostResult, HostContext, HostEntryPoints, HostUserId, NotificationConfig,
    PrimaryActionCallback, PrimaryActionConfig,
};

use super::interop;

pub(crate) fn report_ready(global: &str) -> Result<(), String> {
    interop::report_ready(global)
}

pub(crate) fn is_host_ready(global: &str) -> bool {
    interop::is_host_ready(global)
}

pub(crate) fn host_context(global: &str) -> Option<HostContext> {
    interop::host_context(global)
}

pub(crate) fn entry_points(global: &str) -> HostEntryPoints {
    interop::entry_points(global)
}

pub(crate) async fn add_to_host(global: &str) -> Result<Option<AddToHostResult>, String> {
    interop::add_to_host(global).await
}

pub(crate) async fn open_url(global: &str, url: &str) -> Result<(), String> {
    interop::open_url(global, url).await
}

pub(crate) fn close(global: &str) -> Result<(), String> {
    interop::close(global)
}

pub(crate) async fn send_notification(
    global: &str,
    config: &NotificationConfig,
) -> Result<(), String> {
    interop::send_notification(global, config).await
}

pub(crate) async fn view_profile(global: &str, user: Option<HostUserId>) -> Result<(), String> {
    interop::view_profile(global, user).await
}

pub(crate) fn set_primary_action(
    global: &str,
    config: &PrimaryActionConfig,
    on_click: PrimaryActionCallback,
) -> Result<(), String> {
    interop::set_primary_action(global, config, on_click)
}

pub(crate) fn clear_primary_action(global: &str) -> Result<(), String> {
    interop::clear_primary_action(global)
}
