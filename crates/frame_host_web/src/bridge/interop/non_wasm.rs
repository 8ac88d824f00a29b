use super::*;

fn unsupported() -> String {
    "Host SDK bindings are only available when compiled for wasm32".to_string()
}

pub fn environment_signals() -> EnvironmentSignals {
    EnvironmentSignals::default()
}

pub fn sleep_ms(_duration_ms: u64) -> LocalBoxFuture<'static, ()> {
    Box::pin(futures::future::pending())
}

pub fn spawn_local(_task: LocalBoxFuture<'static, ()>) {}

pub fn report_ready(_global: &str) -> Result<(), String> {
    Err(unsupported())
}

pub fn is_host_ready(_global: &str) -> bool {
    false
}

pub fn host_context(_global: &str) -> Option<HostContext> {
    None
}

pub fn entry_points(_global: &str) -> HostEntryPoints {
    HostEntryPoints::none()
}

pub async fn add_to_host(_global: &str) -> Result<Option<AddToHostResult>, String> {
    Err(unsupported())
}

pub async fn open_url(_global: &str, _url: &str) -> Result<(), String> {
    Err(unsupported())
}

pub fn close(_global: &str) -> Result<(), String> {
    Err(unsupported())
}

pub async fn send_notification(_global: &str, _config: &NotificationConfig) -> Result<(), String> {
    Err(unsupported())
}

pub async fn view_profile(_global: &str, _user: Option<HostUserId>) -> Result<(), String> {
    Err(unsupported())
}

pub fn set_primary_action(
    _global: &str,
    _config: &PrimaryActionConfig,
    _on_click: PrimaryActionCallback,
) -> Result<(), String> {
    Err(unsupported())
}

pub fn clear_primary_action(_global: &str) -> Result<(), String> {
    Err(unsupported())
}
