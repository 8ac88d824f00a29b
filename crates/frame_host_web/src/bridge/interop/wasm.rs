use std::cell::RefCell;

use futures::channel::oneshot;
use js_sys::{Array, Function, Object, Promise, Reflect};
use serde::Deserialize;
use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;

use super::*;

thread_local! {
    static PRIMARY_ACTION_HANDLER: RefCell<Option<Closure<dyn Fn()>>> = const { RefCell::new(None) };
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawClient {
    #[serde(default)]
    added: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawUser {
    fid: u64,
    #[serde(default)]
    username: Option<String>,
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default)]
    pfp_url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawHostContext {
    #[serde(default)]
    client: RawClient,
    #[serde(default)]
    user: Option<RawUser>,
}

impl From<RawHostContext> for HostContext {
    fn from(raw: RawHostContext) -> Self {
        Self {
            added: raw.client.added,
            user: raw.user.map(|user| frame_host::HostUser {
                id: HostUserId(user.fid),
                username: user.username,
                display_name: user.display_name,
                pfp_url: user.pfp_url,
            }),
        }
    }
}

fn js_error(context: &str, err: JsValue) -> String {
    let detail = err.as_string().unwrap_or_else(|| format!("{err:?}"));
    format!("{context}: {detail}")
}

fn host_sdk(global: &str) -> Result<JsValue, String> {
    let window = web_sys::window().ok_or_else(|| "window is unavailable".to_string())?;
    let sdk = Reflect::get(&window, &JsValue::from_str(global))
        .map_err(|err| js_error("read host sdk", err))?;
    if sdk.is_undefined() || sdk.is_null() {
        return Err(format!("host sdk `{global}` is not installed"));
    }
    Ok(sdk)
}

fn host_actions(global: &str) -> Result<JsValue, String> {
    let sdk = host_sdk(global)?;
    let actions = Reflect::get(&sdk, &JsValue::from_str("actions"))
        .map_err(|err| js_error("read host actions", err))?;
    if actions.is_undefined() || actions.is_null() {
        return Err(format!("host sdk `{global}` exposes no actions"));
    }
    Ok(actions)
}

fn has_action(actions: &JsValue, name: &str) -> bool {
    Reflect::get(actions, &JsValue::from_str(name))
        .map(|value| value.is_function())
        .unwrap_or(false)
}

fn call_action(global: &str, name: &str, args: &[JsValue]) -> Result<JsValue, String> {
    let actions = host_actions(global)?;
    let function = Reflect::get(&actions, &JsValue::from_str(name))
        .map_err(|err| js_error(name, err))?
        .dyn_into::<Function>()
        .map_err(|_| format!("host action `{name}` is unavailable"))?;
    let arguments = Array::new();
    for arg in args {
        arguments.push(arg);
    }
    function
        .apply(&actions, &arguments)
        .map_err(|err| js_error(name, err))
}

async fn settle(name: &str, value: JsValue) -> Result<JsValue, String> {
    match value.dyn_into::<Promise>() {
        Ok(promise) => JsFuture::from(promise)
            .await
            .map_err(|err| js_error(name, err)),
        Err(value) => Ok(value),
    }
}

pub fn environment_signals() -> EnvironmentSignals {
    let Some(window) = web_sys::window() else {
        return EnvironmentSignals::default();
    };

    let in_child_frame = window
        .parent()
        .ok()
        .flatten()
        .map(|parent| !Object::is(&window, &parent));
    let referrer = window
        .document()
        .map(|document| document.referrer())
        .filter(|referrer| !referrer.is_empty());
    let user_agent = window.navigator().user_agent().ok();
    let parent_origin = window
        .location()
        .ancestor_origins()
        .ok()
        .and_then(|origins| origins.item(0));
    let dimension = |value: Result<JsValue, JsValue>| {
        value
            .ok()
            .and_then(|value| value.as_f64())
            .map(|value| value.max(0.0) as u32)
    };
    let viewport = dimension(window.inner_width()).zip(dimension(window.inner_height()));

    EnvironmentSignals {
        in_child_frame,
        referrer,
        user_agent,
        parent_origin,
        viewport,
    }
}

pub fn sleep_ms(duration_ms: u64) -> LocalBoxFuture<'static, ()> {
    let Some(window) = web_sys::window() else {
        return Box::pin(futures::future::pending());
    };
    let (wake, fired) = oneshot::channel::<()>();
    let callback = Closure::once_into_js(move || {
        let _ = wake.send(());
    });
    let timeout = duration_ms.min(i32::MAX as u64) as i32;
    let Ok(handle) = window
        .set_timeout_with_callback_and_timeout_and_arguments_0(callback.unchecked_ref(), timeout)
    else {
        return Box::pin(futures::future::pending());
    };
    let timer = PendingTimeout { window, handle };
    Box::pin(async move {
        let _ = fired.await;
        drop(timer);
    })
}

/// Clears its `setTimeout` handle when the sleeping future is dropped.
struct PendingTimeout {
    window: web_sys::Window,
    handle: i32,
}

impl Drop for PendingTimeout {
    fn drop(&mut self) {
        self.window.clear_timeout_with_handle(self.handle);
    }
}

pub fn spawn_local(task: LocalBoxFuture<'static, ()>) {
    wasm_bindgen_futures::spawn_local(task);
}

pub fn report_ready(global: &str) -> Result<(), String> {
    call_action(global, "ready", &[]).map(|_| ())
}

pub fn is_host_ready(global: &str) -> bool {
    host_sdk(global)
        .ok()
        .and_then(|sdk| Reflect::get(&sdk, &JsValue::from_str("isReady")).ok())
        .and_then(|value| value.as_bool())
        .unwrap_or(false)
}

pub fn host_context(global: &str) -> Option<HostContext> {
    let sdk = host_sdk(global).ok()?;
    let raw = Reflect::get(&sdk, &JsValue::from_str("context")).ok()?;
    if raw.is_undefined() || raw.is_null() {
        return None;
    }
    serde_wasm_bindgen::from_value::<RawHostContext>(raw)
        .ok()
        .map(HostContext::from)
}

pub fn entry_points(global: &str) -> HostEntryPoints {
    let Ok(actions) = host_actions(global) else {
        return HostEntryPoints::none();
    };
    let wallet = host_sdk(global)
        .ok()
        .and_then(|sdk| Reflect::get(&sdk, &JsValue::from_str("wallet")).ok())
        .is_some_and(|wallet| !wallet.is_undefined() && !wallet.is_null());

    HostEntryPoints {
        add_to_host: has_action(&actions, "addToHost"),
        open_url: has_action(&actions, "openUrl"),
        close: has_action(&actions, "close"),
        send_notification: has_action(&actions, "sendNotification"),
        view_profile: has_action(&actions, "viewProfile"),
        primary_action: has_action(&actions, "setPrimaryAction"),
        wallet,
    }
}

pub async fn add_to_host(global: &str) -> Result<Option<AddToHostResult>, String> {
    let pending = call_action(global, "addToHost", &[])?;
    let value = settle("addToHost", pending).await?;
    if value.is_undefined() || value.is_null() {
        return Ok(None);
    }
    serde_wasm_bindgen::from_value::<AddToHostResult>(value)
        .map(Some)
        .map_err(|err| format!("decode addToHost result: {err}"))
}

pub async fn open_url(global: &str, url: &str) -> Result<(), String> {
    let pending = call_action(global, "openUrl", &[JsValue::from_str(url)])?;
    settle("openUrl", pending).await.map(|_| ())
}

pub fn close(global: &str) -> Result<(), String> {
    call_action(global, "close", &[]).map(|_| ())
}

pub async fn send_notification(global: &str, config: &NotificationConfig) -> Result<(), String> {
    let payload = serde_wasm_bindgen::to_value(config)
        .map_err(|err| format!("encode notification: {err}"))?;
    let pending = call_action(global, "sendNotification", &[payload])?;
    settle("sendNotification", pending).await.map(|_| ())
}

pub async fn view_profile(global: &str, user: Option<HostUserId>) -> Result<(), String> {
    let args = match user {
        Some(user) => {
            let target = Object::new();
            Reflect::set(
                &target,
                &JsValue::from_str("fid"),
                &JsValue::from_f64(user.0 as f64),
            )
            .map_err(|err| js_error("viewProfile", err))?;
            vec![target.into()]
        }
        None => Vec::new(),
    };
    let pending = call_action(global, "viewProfile", &args)?;
    settle("viewProfile", pending).await.map(|_| ())
}

pub fn set_primary_action(
    global: &str,
    config: &PrimaryActionConfig,
    on_click: PrimaryActionCallback,
) -> Result<(), String> {
    let payload = serde_wasm_bindgen::to_value(config)
        .map_err(|err| format!("encode primary action: {err}"))?;
    let handler = Closure::<dyn Fn()>::new(move || on_click());
    call_action(
        global,
        "setPrimaryAction",
        &[payload, handler.as_ref().clone()],
    )?;
    PRIMARY_ACTION_HANDLER.with(|slot| {
        slot.borrow_mut().replace(handler);
    });
    Ok(())
}

pub fn clear_primary_action(global: &str) -> Result<(), String> {
    let result = call_action(global, "clearPrimaryAction", &[]).map(|_| ());
    PRIMARY_ACTION_HANDLER.with(|slot| {
        slot.borrow_mut().take();
    });
    result
}
