//! Event-loop scheduler backed by browser timers.

use frame_host::{unix_time_ms_now, FrameScheduler};
use futures::future::LocalBoxFuture;

use crate::bridge;

#[derive(Debug, Clone, Copy, Default)]
/// Browser scheduler using `setTimeout` for sleeps and the microtask queue for tasks.
pub struct WebScheduler;

impl FrameScheduler for WebScheduler {
    fn now_ms(&self) -> u64 {
        unix_time_ms_now()
    }

    fn sleep(&self, duration_ms: u64) -> LocalBoxFuture<'static, ()> {
        bridge::sleep_ms(duration_ms)
    }

    fn spawn_local(&self, task: LocalBoxFuture<'static, ()>) {
        bridge::spawn_local(task);
    }
}
