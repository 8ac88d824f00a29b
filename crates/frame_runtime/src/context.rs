//! Leptos context wiring for the frame runtime.

use leptos::*;

use crate::{actions::FrameActions, runtime::FrameRuntime, snapshot::FrameSnapshot};

#[derive(Clone)]
/// Leptos context carrying the runtime, its action facade, and a reactive snapshot.
pub struct FrameRuntimeContext {
    /// Shared runtime handle.
    pub runtime: FrameRuntime,
    /// Action facade bound to `runtime`.
    pub actions: FrameActions,
    /// Snapshot signal updated after every runtime change.
    pub snapshot: RwSignal<FrameSnapshot>,
}

/// Creates a signal seeded with the current snapshot and kept in sync through a state watcher.
///
/// The watcher is removed when the owning reactive scope is cleaned up.
pub fn frame_snapshot_signal(runtime: &FrameRuntime) -> RwSignal<FrameSnapshot> {
    let snapshot = create_rw_signal(runtime.snapshot());
    let watcher_id = runtime.add_state_watcher(move |next| {
        if snapshot.try_set(next.clone()).is_some() {
            logging::warn!("frame snapshot signal disposed before its watcher");
        }
    });

    let runtime = runtime.clone();
    on_cleanup(move || runtime.remove_state_watcher(watcher_id));
    snapshot
}

/// Places a [`FrameRuntimeContext`] for `runtime` into the current reactive owner.
pub fn provide_frame_runtime(runtime: FrameRuntime) -> FrameRuntimeContext {
    let context = FrameRuntimeContext {
        actions: runtime.actions(),
        snapshot: frame_snapshot_signal(&runtime),
        runtime,
    };
    provide_context(context.clone());
    context
}

/// Returns the current [`FrameRuntimeContext`].
///
/// # Panics
///
/// Panics if called outside a scope where [`provide_frame_runtime`] ran.
pub fn use_frame_runtime() -> FrameRuntimeContext {
    use_context::<FrameRuntimeContext>().expect("FrameRuntimeContext not provided")
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use frame_host::{FrameHost, HostStrategy, ManualScheduler, MemoryHostSdk};
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{config::FrameConfig, connection::FrameStatus};

    #[test]
    fn snapshot_signal_follows_runtime_transitions() {
        let _ = leptos::create_runtime();
        let sdk = MemoryHostSdk::default();
        let scheduler = ManualScheduler::default();
        let host = FrameHost::new(
            Rc::new(sdk.clone()),
            Rc::new(scheduler.clone()),
            HostStrategy::Memory,
        );
        let runtime =
            FrameRuntime::new(FrameConfig::with_api_key("test-key"), host).expect("runtime");

        let snapshot = frame_snapshot_signal(&runtime);
        assert_eq!(snapshot.get_untracked().status, FrameStatus::Initializing);

        runtime.start();
        scheduler.run_until_stalled();
        assert_eq!(snapshot.get_untracked().status, FrameStatus::Connecting);

        sdk.set_ready(true);
        scheduler.advance(100);
        let current = snapshot.get_untracked();
        assert!(current.is_ready);
        assert_eq!(current, runtime.snapshot());
    }
}
