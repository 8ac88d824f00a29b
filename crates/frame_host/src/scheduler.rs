//! Timer and task scheduling contracts for single-threaded event loops.

use std::{
    cell::{Cell, RefCell},
    rc::Rc,
};

use futures::{
    channel::oneshot,
    executor::{LocalPool, LocalSpawner},
    future::LocalBoxFuture,
    task::LocalSpawnExt,
};

/// Clock, timer, and task spawner for the event loop the runtime lives on.
///
/// Browser builds back this with `setTimeout` and the microtask queue; tests use
/// [`ManualScheduler`] to move time explicitly.
pub trait FrameScheduler {
    /// Current time in unix milliseconds.
    fn now_ms(&self) -> u64;

    /// Future that resolves after `duration_ms` milliseconds.
    ///
    /// Dropping the future before it resolves cancels the timer.
    fn sleep(&self, duration_ms: u64) -> LocalBoxFuture<'static, ()>;

    /// Runs `task` to completion on the current event loop.
    fn spawn_local(&self, task: LocalBoxFuture<'static, ()>);
}

struct PendingTimer {
    deadline_ms: u64,
    seq: u64,
    wake: oneshot::Sender<()>,
}

struct ManualSchedulerInner {
    now_ms: Cell<u64>,
    next_seq: Cell<u64>,
    timers: RefCell<Vec<PendingTimer>>,
    pool: RefCell<LocalPool>,
    spawner: LocalSpawner,
}

#[derive(Clone)]
/// Virtual-clock scheduler driven by explicit [`advance`](ManualScheduler::advance) calls.
///
/// Spawned tasks run on an internal `LocalPool` only when the owner calls
/// [`run_until_stalled`](ManualScheduler::run_until_stalled) or `advance`. Timers fire in
/// deadline order, and the pool is drained after each firing so tasks observe the exact
/// virtual time of their own deadline.
pub struct ManualScheduler {
    inner: Rc<ManualSchedulerInner>,
}

impl Default for ManualScheduler {
    fn default() -> Self {
        Self::starting_at(0)
    }
}

impl ManualScheduler {
    /// Creates a scheduler whose clock starts at `now_ms`.
    pub fn starting_at(now_ms: u64) -> Self {
        let pool = LocalPool::new();
        let spawner = pool.spawner();
        Self {
            inner: Rc::new(ManualSchedulerInner {
                now_ms: Cell::new(now_ms),
                next_seq: Cell::new(0),
                timers: RefCell::new(Vec::new()),
                pool: RefCell::new(pool),
                spawner,
            }),
        }
    }

    /// Polls spawned tasks until none can make progress without time moving.
    pub fn run_until_stalled(&self) {
        self.inner.pool.borrow_mut().run_until_stalled();
    }

    /// Moves the clock forward by `duration_ms`, firing due timers in deadline order.
    pub fn advance(&self, duration_ms: u64) {
        let target = self.inner.now_ms.get().saturating_add(duration_ms);
        self.run_until_stalled();

        while let Some(deadline) = self.next_deadline_within(target) {
            self.inner.now_ms.set(deadline);
            let mut due = {
                let mut timers = self.inner.timers.borrow_mut();
                let (due, pending): (Vec<_>, Vec<_>) = timers
                    .drain(..)
                    .partition(|timer| timer.deadline_ms <= deadline);
                *timers = pending;
                due
            };
            due.sort_by_key(|timer| timer.seq);
            for timer in due {
                // A dropped receiver means the sleeper was cancelled.
                let _ = timer.wake.send(());
            }
            self.run_until_stalled();
        }

        self.inner.now_ms.set(target);
        self.run_until_stalled();
    }

    /// Number of timers whose sleeper is still waiting.
    pub fn pending_timers(&self) -> usize {
        self.prune_cancelled();
        self.inner.timers.borrow().len()
    }

    /// Deadline of the earliest live timer.
    pub fn next_deadline(&self) -> Option<u64> {
        self.prune_cancelled();
        self.inner
            .timers
            .borrow()
            .iter()
            .map(|timer| timer.deadline_ms)
            .min()
    }

    fn next_deadline_within(&self, target: u64) -> Option<u64> {
        self.next_deadline().filter(|deadline| *deadline <= target)
    }

    fn prune_cancelled(&self) {
        self.inner
            .timers
            .borrow_mut()
            .retain(|timer| !timer.wake.is_canceled());
    }
}

impl FrameScheduler for ManualScheduler {
    fn now_ms(&self) -> u64 {
        self.inner.now_ms.get()
    }

    fn sleep(&self, duration_ms: u64) -> LocalBoxFuture<'static, ()> {
        let (wake, fired) = oneshot::channel();
        let seq = self.inner.next_seq.get();
        self.inner.next_seq.set(seq + 1);
        self.inner.timers.borrow_mut().push(PendingTimer {
            deadline_ms: self.inner.now_ms.get().saturating_add(duration_ms),
            seq,
            wake,
        });
        Box::pin(async move {
            let _ = fired.await;
        })
    }

    fn spawn_local(&self, task: LocalBoxFuture<'static, ()>) {
        // The pool lives as long as the spawner, so spawning cannot observe a shut-down pool.
        let _ = self.inner.spawner.spawn_local(task);
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;

    type TickLog = Rc<RefCell<Vec<(u64, &'static str)>>>;

    fn record_after(scheduler: &ManualScheduler, log: &TickLog, delay: u64, label: &'static str) {
        let sleeper = scheduler.sleep(delay);
        let clock = scheduler.clone();
        let log = log.clone();
        scheduler.spawn_local(Box::pin(async move {
            sleeper.await;
            log.borrow_mut().push((clock.now_ms(), label));
        }));
    }

    #[test]
    fn timers_fire_in_deadline_order_at_their_own_time() {
        let scheduler = ManualScheduler::starting_at(1_000);
        let log = Rc::new(RefCell::new(Vec::new()));

        record_after(&scheduler, &log, 300, "late");
        record_after(&scheduler, &log, 100, "early");
        scheduler.advance(50);
        assert!(log.borrow().is_empty());

        scheduler.advance(500);
        assert_eq!(*log.borrow(), vec![(1_100, "early"), (1_300, "late")]);
        assert_eq!(scheduler.now_ms(), 1_550);
    }

    #[test]
    fn dropped_sleepers_do_not_count_as_pending() {
        let scheduler = ManualScheduler::default();
        let kept = scheduler.sleep(10);
        let dropped = scheduler.sleep(20);
        drop(dropped);

        assert_eq!(scheduler.pending_timers(), 1);
        assert_eq!(scheduler.next_deadline(), Some(10));
        drop(kept);
        assert_eq!(scheduler.pending_timers(), 0);
    }

    #[test]
    fn chained_sleeps_inside_one_advance_observe_each_deadline() {
        let scheduler = ManualScheduler::default();
        let ticks = Rc::new(RefCell::new(Vec::new()));
        let clock = scheduler.clone();
        let seen = ticks.clone();
        scheduler.spawn_local(Box::pin(async move {
            for _ in 0..3 {
                clock.sleep(100).await;
                seen.borrow_mut().push(clock.now_ms());
            }
        }));

        scheduler.advance(1_000);
        assert_eq!(*ticks.borrow(), vec![100, 200, 300]);
    }
}
