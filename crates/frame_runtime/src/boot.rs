//! Browser entry point: builds the runtime over the selected host adapters and wires page
//! signals into it.

use leptos::logging;

use crate::{
    config::FrameConfig,
    error::FrameConfigError,
    runtime::{FrameObservers, FrameRuntime},
};

/// Builds a runtime over the compile-time selected host adapters, installs the page visibility
/// listener, starts the handshake, and begins monitoring the host.
///
/// # Errors
///
/// Returns the configuration error when `config` is invalid.
pub fn boot_frame_runtime(
    config: FrameConfig,
    observers: FrameObservers,
) -> Result<FrameRuntime, FrameConfigError> {
    let runtime = FrameRuntime::with_observers(config, frame_host_web::build_frame_host(), observers)?;

    let embedded = frame_host_web::is_embedded();
    runtime.debug_log(format!(
        "booting with {} host strategy, embedded={embedded}",
        frame_host_web::host_strategy_name()
    ));
    if !embedded {
        logging::log!("frame runtime is not embedded in a host; capabilities stay unavailable");
    }

    install_visibility_listener(&runtime);
    runtime.start();
    runtime.spawn_host_monitor();
    Ok(runtime)
}

fn install_visibility_listener(runtime: &FrameRuntime) {
    #[cfg(target_arch = "wasm32")]
    {
        use wasm_bindgen::{closure::Closure, JsCast};

        let Some(document) = web_sys::window().and_then(|window| window.document()) else {
            return;
        };
        let runtime = runtime.clone();
        let target = document.clone();
        let listener = Closure::<dyn Fn()>::new(move || {
            runtime.handle_visibility_change(target.hidden());
        });
        if let Err(err) = document
            .add_event_listener_with_callback("visibilitychange", listener.as_ref().unchecked_ref())
        {
            logging::warn!("visibility listener install failed: {err:?}");
            return;
        }
        listener.forget();
    }
    #[cfg(not(target_arch = "wasm32"))]
    let _ = runtime;
}
