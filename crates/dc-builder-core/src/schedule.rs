//! Cancellable delayed tasks and the debounced trigger built on them.
//!
//! Only the delay is cancellable. Once a task has started it runs to
//! completion, so an in-flight pricing request is never aborted.

use futures::future::LocalBoxFuture;
use std::cell::{Cell, RefCell};
use std::future::Future;
use std::rc::Rc;
use std::time::Duration;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TaskState {
    Pending,
    Cancelled,
    Started,
}

/// Handle to a task waiting on its delay.
#[derive(Clone, Debug)]
pub struct ScheduledTask {
    state: Rc<Cell<TaskState>>,
}

impl ScheduledTask {
    /// Pair a handle with the future an executor should drive: await `delay`,
    /// then run `task` unless the handle was cancelled in the meantime.
    pub fn deferred<D>(
        delay: D,
        task: LocalBoxFuture<'static, ()>,
    ) -> (Self, LocalBoxFuture<'static, ()>)
    where
        D: Future<Output = ()> + 'static,
    {
        let state = Rc::new(Cell::new(TaskState::Pending));
        let handle = Self {
            state: Rc::clone(&state),
        };
        let run: LocalBoxFuture<'static, ()> = Box::pin(async move {
            delay.await;
            if state.get() != TaskState::Pending {
                return;
            }
            state.set(TaskState::Started);
            task.await;
        });
        (handle, run)
    }

    /// Cancel if still waiting. No effect once started.
    pub fn cancel(&self) {
        if self.state.get() == TaskState::Pending {
            self.state.set(TaskState::Cancelled);
        }
    }

    pub fn state(&self) -> TaskState {
        self.state.get()
    }
}

/// Runs a future after a delay on the host's single-threaded executor.
pub trait Scheduler {
    fn schedule(&self, delay: Duration, task: LocalBoxFuture<'static, ()>) -> ScheduledTask;
}

/// Scheduler for native hosts. Must be used inside a `tokio::task::LocalSet`.
#[cfg(not(target_arch = "wasm32"))]
#[derive(Clone, Copy, Debug, Default)]
pub struct TokioScheduler;

#[cfg(not(target_arch = "wasm32"))]
impl Scheduler for TokioScheduler {
    fn schedule(&self, delay: Duration, task: LocalBoxFuture<'static, ()>) -> ScheduledTask {
        let (handle, run) = ScheduledTask::deferred(tokio::time::sleep(delay), task);
        tokio::task::spawn_local(run);
        handle
    }
}

/// Coalesces bursts of triggers: only the last one within `delay` runs.
pub struct Debouncer {
    scheduler: Rc<dyn Scheduler>,
    delay: Duration,
    pending: RefCell<Option<ScheduledTask>>,
}

impl Debouncer {
    pub fn new(scheduler: Rc<dyn Scheduler>, delay: Duration) -> Self {
        Self {
            scheduler,
            delay,
            pending: RefCell::new(None),
        }
    }

    /// Supersede any waiting task and schedule `task` from zero.
    pub fn trigger(&self, task: LocalBoxFuture<'static, ()>) {
        self.cancel();
        let handle = self.scheduler.schedule(self.delay, task);
        *self.pending.borrow_mut() = Some(handle);
    }

    pub fn cancel(&self) {
        if let Some(task) = self.pending.borrow_mut().take() {
            task.cancel();
        }
    }

    /// True while a scheduled task is still waiting on its delay.
    pub fn is_pending(&self) -> bool {
        self.pending
            .borrow()
            .as_ref()
            .is_some_and(|task| task.state() == TaskState::Pending)
    }
}
